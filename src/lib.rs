#![allow(clippy::module_inception)]

//! Back half of a compiler for the Little toy language.
//!
//! The grammar front end (tokenizing, parsing, event emission) is an
//! external collaborator: it drives [`builder::builder::ProgramBuilder`]
//! with an ordered stream of semantic events. From the structures the
//! builder produces, [`ir::generator::generate_ir`] emits three-address
//! code and [`codegen::codegen::convert_to_assembly`] lowers it to tiny
//! machine instructions, allocating registers and performing peephole
//! register reuse and constant folding along the way.
//!
//! The whole pipeline is single-threaded and batch-oriented; the first
//! error aborts the compilation with no partial output.

pub mod ast;
pub mod builder;
pub mod codegen;
pub mod errors;
pub mod ir;
pub mod symbols;

use crate::builder::builder::ProgramBuilder;
use crate::codegen::codegen::convert_to_assembly;
use crate::codegen::tiny::TinyInstruction;
use crate::errors::errors::CompileError;
use crate::ir::generator::generate_ir;
use crate::ir::instruction::IrInstruction;

/// The result of a full back-end run: the three-address code and the tiny
/// instruction stream lowered from it.
#[derive(Debug)]
pub struct Compilation {
    pub ir: Vec<IrInstruction>,
    pub assembly: Vec<TinyInstruction>,
}

impl Compilation {
    /// The line-oriented textual IR form.
    pub fn ir_listing(&self) -> String {
        self.ir
            .iter()
            .map(|instruction| instruction.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The tiny assembly listing.
    pub fn assembly_listing(&self) -> String {
        self.assembly
            .iter()
            .map(|instruction| instruction.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Runs IR generation and lowering over a fully built program.
pub fn compile(builder: ProgramBuilder) -> Result<Compilation, CompileError> {
    let (mut registry, mut forest) = builder.finish();
    let ir = generate_ir(&mut registry, &mut forest)?;
    let assembly = convert_to_assembly(ir.clone())?;
    Ok(Compilation { ir, assembly })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::table::{SymbolAttributes, SymbolKind};

    #[test]
    fn test_listings_are_line_oriented() {
        let mut builder = ProgramBuilder::new();
        builder.enter_scope("GLOBAL");
        builder
            .declare("x", SymbolAttributes::variable(SymbolKind::Integer))
            .unwrap();
        builder.enter_scope("main");
        builder.begin_assignment("x");
        builder.operand("1");
        builder.exit_scope();

        let compilation = compile(builder).unwrap();
        assert_eq!(
            compilation.ir_listing(),
            "VAR x\nLABEL main\nLINK\nSTOREI 1 $T1\nSTOREI $T1 x\nRETURN"
        );
        assert!(compilation.assembly_listing().ends_with("sys halt"));
    }
}
