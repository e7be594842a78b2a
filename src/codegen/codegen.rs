use std::collections::{HashMap, VecDeque};

use crate::codegen::tiny::{register_name, TinyInstruction};
use crate::errors::errors::CompileError;
use crate::ir::instruction::{is_temporary, ArithOp, IrInstruction, ValueKind};

/// Lowers a three-address instruction sequence to tiny assembly in one
/// in-order pass with one instruction of lookahead.
pub fn convert_to_assembly(
    ir: Vec<IrInstruction>,
) -> Result<Vec<TinyInstruction>, CompileError> {
    let mut converter = Converter::new(ir);
    converter.run()?;
    Ok(converter.assembly)
}

/// Same conversion, starting from the line-oriented textual IR form.
pub fn convert_text(source: &str) -> Result<Vec<TinyInstruction>, CompileError> {
    let ir = source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<IrInstruction>, CompileError>>()?;
    convert_to_assembly(ir)
}

struct Converter {
    queue: VecDeque<IrInstruction>,
    assembly: Vec<TinyInstruction>,
    // Register number -> value currently held. Registers are allocated
    // naively from a conceptually infinite file and never freed.
    registers: HashMap<u32, String>,
    // Variable or temporary -> last known concrete value, consulted to
    // detect compile-time constants.
    values: HashMap<String, String>,
    // Temporary -> the register that materialized it. A temporary may be
    // consumed more than once (shared literals) or later than the next
    // instruction (operator chains).
    temporaries: HashMap<String, u32>,
    register_counter: u32,
}

impl Converter {
    fn new(ir: Vec<IrInstruction>) -> Self {
        Converter {
            queue: VecDeque::from(ir),
            assembly: vec![],
            registers: HashMap::new(),
            values: HashMap::new(),
            temporaries: HashMap::new(),
            register_counter: 0,
        }
    }

    fn run(&mut self) -> Result<(), CompileError> {
        while let Some(instruction) = self.queue.pop_front() {
            match instruction {
                // The tiny form has no label syntax; frame markers produce
                // no output.
                IrInstruction::Label { .. } | IrInstruction::Link | IrInstruction::Return => {}
                IrInstruction::Var { name } => {
                    self.assembly.push(TinyInstruction::Var { name });
                }
                IrInstruction::StringDecl { name, value } => {
                    self.assembly.push(TinyInstruction::Str { name, value });
                }
                IrInstruction::Read { kind, target } => {
                    self.assembly.push(TinyInstruction::SysRead { kind, target });
                }
                IrInstruction::Write { kind, target } => {
                    self.assembly.push(TinyInstruction::SysWrite { kind, target });
                }
                IrInstruction::Store { source, target, .. } => {
                    self.convert_store(source, target);
                }
                IrInstruction::Arith {
                    op,
                    kind,
                    left,
                    right,
                    target,
                } => {
                    self.convert_arithmetic(op, kind, left, right, target)?;
                }
            }
        }

        self.assembly.push(TinyInstruction::SysHalt);
        Ok(())
    }

    fn convert_store(&mut self, source: String, target: String) {
        if is_temporary(&source) {
            // Store to memory: the temporary's register is the one that
            // materialized it, or the one implied by the current counter
            // for a load finished in the previous step.
            let register = self
                .temporaries
                .get(&source)
                .copied()
                .unwrap_or(self.register_counter);

            self.emit_move(register_name(register), target.clone());

            // The destination's value is whatever the register held.
            if let Some(held) = self.registers.get(&register).cloned() {
                self.values.insert(target.clone(), held);
            }
            self.registers.insert(register, target);
            self.register_counter += 1;
        } else {
            // Load into a register.
            let register = self.register_counter;
            self.emit_move(source.clone(), register_name(register));
            self.registers.insert(register, source.clone());
            self.values.insert(target.clone(), source);
            if is_temporary(&target) {
                self.temporaries.insert(target.clone(), register);
            }

            // A load immediately consumed by a store of the same
            // destination shares the register; otherwise move on.
            let paired = matches!(
                self.queue.front(),
                Some(IrInstruction::Store { source, .. }) if *source == target
            );
            if !paired {
                self.register_counter += 1;
            }
        }
    }

    fn convert_arithmetic(
        &mut self,
        op: ArithOp,
        kind: ValueKind,
        left: String,
        right: String,
        target: String,
    ) -> Result<(), CompileError> {
        // Constant folding: both operands resolve to literals of the
        // instruction's kind.
        if let Some(folded) = self.try_fold(op, kind, &left, &right) {
            log::debug!("folded {:?} {} {} -> {}", op, left, right, folded);
            let register = self.register_counter;
            self.emit_move(folded.clone(), register_name(register));
            return self.finish_arithmetic(register, target, Some(folded));
        }

        // Reuse rule 1: an operand already occupies a register. For
        // commutative operations the second operand may take that role.
        let (mut destination, mut operand) = match self.register_of(&left) {
            Some(register) => (Some(register), right.clone()),
            None if op.is_commutative() => match self.register_of(&right) {
                Some(register) => (Some(register), left.clone()),
                None => (None, right.clone()),
            },
            None => (None, right.clone()),
        };

        // Reuse rule 2: temporaries chain through the registers that
        // materialized them.
        if destination.is_some() {
            if is_temporary(&operand) {
                operand = register_name(self.temporary_register(&operand, 1)?);
            }
        } else {
            let left_is_temporary = is_temporary(&left);
            let right_is_temporary = is_temporary(&right);

            if left_is_temporary && right_is_temporary {
                destination = Some(self.temporary_register(&left, 2)?);
                operand = register_name(self.temporary_register(&right, 1)?);
            } else if left_is_temporary {
                destination = Some(self.temporary_register(&left, 1)?);
                operand = right.clone();
            } else if right_is_temporary {
                if op.is_commutative() {
                    destination = Some(self.temporary_register(&right, 1)?);
                    operand = left.clone();
                } else {
                    // The temporary must stay the second operand; rewrite
                    // it to its register and materialize the left operand.
                    operand = register_name(self.temporary_register(&right, 1)?);
                }
            }
        }

        let result_register = match destination {
            Some(register) => {
                self.assembly.push(TinyInstruction::Arith {
                    op,
                    kind,
                    operand,
                    register: register_name(register),
                });
                register
            }
            None => {
                let register = self.register_counter;
                self.emit_move(left.clone(), register_name(register));
                self.assembly.push(TinyInstruction::Arith {
                    op,
                    kind,
                    operand,
                    register: register_name(register),
                });
                register
            }
        };

        self.finish_arithmetic(result_register, target, None)
    }

    /// Consumes the store of an arithmetic result when it is the next
    /// queued instruction; otherwise the result temporary keeps its
    /// register binding for a later consumer.
    fn finish_arithmetic(
        &mut self,
        result_register: u32,
        target: String,
        folded: Option<String>,
    ) -> Result<(), CompileError> {
        self.temporaries.insert(target.clone(), result_register);

        let paired = matches!(
            self.queue.front(),
            Some(IrInstruction::Store { source, .. }) if *source == target
        );

        if paired {
            let destination = match self.queue.pop_front() {
                Some(IrInstruction::Store { target, .. }) => target,
                _ => {
                    return Err(CompileError::inconsistency(
                        "arithmetic result store vanished from the queue",
                    ))
                }
            };

            self.emit_move(register_name(result_register), destination.clone());
            self.registers.insert(result_register, destination.clone());
            self.values.insert(
                destination,
                folded.unwrap_or_else(|| register_name(result_register)),
            );
        } else {
            self.registers.insert(result_register, target.clone());
            self.values.insert(
                target,
                folded.unwrap_or_else(|| register_name(result_register)),
            );
        }

        self.register_counter += 1;
        Ok(())
    }

    fn try_fold(
        &self,
        op: ArithOp,
        kind: ValueKind,
        left: &str,
        right: &str,
    ) -> Option<String> {
        let left_value = self.values.get(left)?;
        let right_value = self.values.get(right)?;

        match kind {
            ValueKind::Integer => {
                let left = left_value.parse::<i64>().ok()?;
                let right = right_value.parse::<i64>().ok()?;
                Some(op.checked_integer(left, right)?.to_string())
            }
            ValueKind::Float => {
                let left = left_value.parse::<f64>().ok()?;
                let right = right_value.parse::<f64>().ok()?;
                if op == ArithOp::Div && right == 0.0 {
                    return None;
                }
                Some(op.apply_float(left, right).to_string())
            }
        }
    }

    /// The register currently holding `value`, preferring the most recent
    /// binding.
    fn register_of(&self, value: &str) -> Option<u32> {
        self.registers
            .iter()
            .filter(|(_, held)| held.as_str() == value)
            .map(|(register, _)| *register)
            .max()
    }

    /// The register a temporary lives in: its recorded binding, or the
    /// register `back` allocations before the counter, where temporaries
    /// land by construction.
    fn temporary_register(&self, name: &str, back: u32) -> Result<u32, CompileError> {
        if let Some(register) = self.temporaries.get(name) {
            return Ok(*register);
        }
        self.register_counter.checked_sub(back).ok_or_else(|| {
            CompileError::inconsistency(format!("temporary {} was never materialized", name))
        })
    }

    fn emit_move(&mut self, source: String, target: String) {
        self.assembly.push(TinyInstruction::Move { source, target });
    }
}
