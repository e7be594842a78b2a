//! Code lowering for the tiny target machine.
//!
//! This module turns the three-address IR into tiny instructions. It
//! handles:
//!
//! - Naive register allocation over a conceptually infinite register file
//!   (no spilling, registers are never freed)
//! - Peephole register reuse: operands already sitting in a register, and
//!   temporaries chained between adjacent instructions
//! - Constant folding of arithmetic whose operands have compile-time known
//!   values, with division by zero and integer overflow left to runtime
//! - The tiny instruction model and its textual form

pub mod codegen;
pub mod tiny;
