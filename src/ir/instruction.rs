use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::errors::errors::CompileError;
use crate::symbols::table::SymbolKind;

lazy_static! {
    /// Operator symbols of the source language mapped to their opcodes.
    pub static ref OPERATOR_LOOKUP: HashMap<&'static str, ArithOp> = {
        let mut map = HashMap::new();
        map.insert("+", ArithOp::Add);
        map.insert("-", ArithOp::Sub);
        map.insert("*", ArithOp::Mul);
        map.insert("/", ArithOp::Div);
        map
    };

    /// Shape of a generator-introduced temporary name.
    static ref TEMPORARY: Regex = Regex::new(r"^\$T\d+$").unwrap();
}

pub fn temporary_name(number: u32) -> String {
    format!("$T{}", number)
}

pub fn is_temporary(name: &str) -> bool {
    TEMPORARY.is_match(name)
}

/// Numeric kind of a type-sensitive instruction, spelled `I` or `F` in the
/// textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
}

impl ValueKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            ValueKind::Integer => "I",
            ValueKind::Float => "F",
        }
    }

    /// The numeric kind a symbol's declared kind lowers to. Anything that
    /// is not an integer stores as a float.
    pub fn for_symbol(kind: SymbolKind) -> ValueKind {
        match kind {
            SymbolKind::Integer => ValueKind::Integer,
            _ => ValueKind::Float,
        }
    }
}

/// The four binary arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            ArithOp::Add => "ADD",
            ArithOp::Sub => "SUB",
            ArithOp::Mul => "MUL",
            ArithOp::Div => "DIV",
        }
    }

    pub fn is_commutative(&self) -> bool {
        matches!(self, ArithOp::Add | ArithOp::Mul)
    }

    /// Integer folding result, or `None` when the operation would divide
    /// by zero or overflow and has to happen at runtime.
    pub fn checked_integer(&self, left: i64, right: i64) -> Option<i64> {
        match self {
            ArithOp::Add => left.checked_add(right),
            ArithOp::Sub => left.checked_sub(right),
            ArithOp::Mul => left.checked_mul(right),
            ArithOp::Div => left.checked_div(right),
        }
    }

    pub fn apply_float(&self, left: f64, right: f64) -> f64 {
        match self {
            ArithOp::Add => left + right,
            ArithOp::Sub => left - right,
            ArithOp::Mul => left * right,
            ArithOp::Div => left / right,
        }
    }
}

/// One three-address instruction. `Display` and `FromStr` implement the
/// line-oriented textual form that sits between the generator and the
/// lowering stage.
#[derive(Debug, Clone, PartialEq)]
pub enum IrInstruction {
    Label {
        name: String,
    },
    Link,
    Return,
    Var {
        name: String,
    },
    StringDecl {
        name: String,
        value: String,
    },
    Store {
        kind: ValueKind,
        source: String,
        target: String,
    },
    Read {
        kind: ValueKind,
        target: String,
    },
    Write {
        kind: SymbolKind,
        target: String,
    },
    Arith {
        op: ArithOp,
        kind: ValueKind,
        left: String,
        right: String,
        target: String,
    },
}

impl Display for IrInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrInstruction::Label { name } => write!(f, "LABEL {}", name),
            IrInstruction::Link => write!(f, "LINK"),
            IrInstruction::Return => write!(f, "RETURN"),
            IrInstruction::Var { name } => write!(f, "VAR {}", name),
            IrInstruction::StringDecl { name, value } => {
                write!(f, "STRING {} {}", name, value)
            }
            IrInstruction::Store {
                kind,
                source,
                target,
            } => write!(f, "STORE{} {} {}", kind.suffix(), source, target),
            IrInstruction::Read { kind, target } => {
                write!(f, "READ{} {}", kind.suffix(), target)
            }
            IrInstruction::Write { kind, target } => {
                // The write suffix is the first letter of the declared
                // kind, so strings are writable.
                let suffix = &kind.as_str()[..1];
                write!(f, "WRITE{} {}", suffix, target)
            }
            IrInstruction::Arith {
                op,
                kind,
                left,
                right,
                target,
            } => write!(
                f,
                "{}{} {} {} {}",
                op.mnemonic(),
                kind.suffix(),
                left,
                right,
                target
            ),
        }
    }
}

impl FromStr for IrInstruction {
    type Err = CompileError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let bad = |reason: &str| CompileError::inconsistency(format!("{}: {:?}", reason, line));

        let mut fields = line.split_whitespace();
        let opcode = fields.next().ok_or_else(|| bad("empty IR line"))?;
        let operands: Vec<&str> = fields.collect();

        let unary = |operands: &[&str]| -> Result<String, CompileError> {
            match operands {
                [single] => Ok(single.to_string()),
                _ => Err(bad("wrong operand count")),
            }
        };
        let binary = |operands: &[&str]| -> Result<(String, String), CompileError> {
            match operands {
                [first, second] => Ok((first.to_string(), second.to_string())),
                _ => Err(bad("wrong operand count")),
            }
        };

        match opcode {
            "LABEL" => Ok(IrInstruction::Label {
                name: unary(&operands)?,
            }),
            "LINK" => Ok(IrInstruction::Link),
            "RETURN" => Ok(IrInstruction::Return),
            "VAR" => Ok(IrInstruction::Var {
                name: unary(&operands)?,
            }),
            "STRING" => {
                // The value is the remainder of the line; string literals
                // may contain spaces.
                let name = operands.first().ok_or_else(|| bad("wrong operand count"))?;
                let value = line
                    .splitn(3, char::is_whitespace)
                    .nth(2)
                    .ok_or_else(|| bad("wrong operand count"))?;
                Ok(IrInstruction::StringDecl {
                    name: name.to_string(),
                    value: value.to_string(),
                })
            }
            "STOREI" | "STOREF" => {
                let (source, target) = binary(&operands)?;
                Ok(IrInstruction::Store {
                    kind: kind_from_suffix(opcode),
                    source,
                    target,
                })
            }
            "READI" | "READF" => Ok(IrInstruction::Read {
                kind: kind_from_suffix(opcode),
                target: unary(&operands)?,
            }),
            "WRITEI" | "WRITEF" | "WRITES" => {
                let kind = match opcode {
                    "WRITEI" => SymbolKind::Integer,
                    "WRITEF" => SymbolKind::Float,
                    _ => SymbolKind::String,
                };
                Ok(IrInstruction::Write {
                    kind,
                    target: unary(&operands)?,
                })
            }
            "ADDI" | "ADDF" | "SUBI" | "SUBF" | "MULI" | "MULF" | "DIVI" | "DIVF" => {
                let op = match &opcode[..3] {
                    "ADD" => ArithOp::Add,
                    "SUB" => ArithOp::Sub,
                    "MUL" => ArithOp::Mul,
                    _ => ArithOp::Div,
                };
                match operands.as_slice() {
                    [left, right, target] => Ok(IrInstruction::Arith {
                        op,
                        kind: kind_from_suffix(opcode),
                        left: left.to_string(),
                        right: right.to_string(),
                        target: target.to_string(),
                    }),
                    _ => Err(bad("wrong operand count")),
                }
            }
            _ => Err(bad("unknown IR opcode")),
        }
    }
}

fn kind_from_suffix(opcode: &str) -> ValueKind {
    if opcode.ends_with('I') {
        ValueKind::Integer
    } else {
        ValueKind::Float
    }
}
