use std::fmt::Display;

use crate::ir::instruction::{ArithOp, ValueKind};
use crate::symbols::table::SymbolKind;

pub fn register_name(number: u32) -> String {
    format!("r{}", number)
}

/// One tiny-machine instruction. The arithmetic opcodes are 2-operand and
/// destructive: the register operand receives the result.
#[derive(Debug, Clone, PartialEq)]
pub enum TinyInstruction {
    Var {
        name: String,
    },
    Str {
        name: String,
        value: String,
    },
    Move {
        source: String,
        target: String,
    },
    Arith {
        op: ArithOp,
        kind: ValueKind,
        operand: String,
        register: String,
    },
    SysRead {
        kind: ValueKind,
        target: String,
    },
    SysWrite {
        kind: SymbolKind,
        target: String,
    },
    SysHalt,
}

impl Display for TinyInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TinyInstruction::Var { name } => write!(f, "var {}", name),
            TinyInstruction::Str { name, value } => write!(f, "str {} {}", name, value),
            TinyInstruction::Move { source, target } => {
                write!(f, "move {} {}", source, target)
            }
            TinyInstruction::Arith {
                op,
                kind,
                operand,
                register,
            } => {
                let mnemonic = match op {
                    ArithOp::Add => "add",
                    ArithOp::Sub => "sub",
                    ArithOp::Mul => "mul",
                    ArithOp::Div => "div",
                };
                // Tiny spells the float kind `r` (real).
                let suffix = match kind {
                    ValueKind::Integer => "i",
                    ValueKind::Float => "r",
                };
                write!(f, "{}{} {} {}", mnemonic, suffix, operand, register)
            }
            TinyInstruction::SysRead { kind, target } => {
                let suffix = match kind {
                    ValueKind::Integer => "i",
                    ValueKind::Float => "f",
                };
                write!(f, "sys read{} {}", suffix, target)
            }
            TinyInstruction::SysWrite { kind, target } => {
                // Unlike read, write spells floats `r`; strings are
                // writable.
                let suffix = match kind {
                    SymbolKind::Integer => "i",
                    SymbolKind::Float => "r",
                    SymbolKind::String => "s",
                };
                write!(f, "sys write{} {}", suffix, target)
            }
            TinyInstruction::SysHalt => write!(f, "sys halt"),
        }
    }
}
