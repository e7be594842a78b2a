//! Unit tests for the IR model and the generator.

use crate::builder::builder::ProgramBuilder;
use crate::ir::generator::generate_ir;
use crate::ir::instruction::{is_temporary, IrInstruction, ValueKind};
use crate::symbols::table::{SymbolAttributes, SymbolKind};

fn generate(builder: ProgramBuilder) -> Result<Vec<String>, crate::errors::errors::CompileError> {
    let (mut registry, mut forest) = builder.finish();
    let code = generate_ir(&mut registry, &mut forest)?;
    Ok(code.iter().map(|i| i.to_string()).collect())
}

#[test]
fn test_temporary_names() {
    assert!(is_temporary("$T1"));
    assert!(is_temporary("$T42"));
    assert!(!is_temporary("x"));
    assert!(!is_temporary("$T"));
    assert!(!is_temporary("a$T1"));
}

#[test]
fn test_instruction_textual_forms() {
    let store = IrInstruction::Store {
        kind: ValueKind::Integer,
        source: "5".to_string(),
        target: "$T1".to_string(),
    };
    assert_eq!(store.to_string(), "STOREI 5 $T1");

    let write = IrInstruction::Write {
        kind: SymbolKind::String,
        target: "banner".to_string(),
    };
    assert_eq!(write.to_string(), "WRITES banner");

    let read = IrInstruction::Read {
        kind: ValueKind::Float,
        target: "f".to_string(),
    };
    assert_eq!(read.to_string(), "READF f");
}

#[test]
fn test_instruction_parsing() {
    let parsed: IrInstruction = "ADDF a b $T2".parse().unwrap();
    assert_eq!(
        parsed,
        IrInstruction::Arith {
            op: crate::ir::instruction::ArithOp::Add,
            kind: ValueKind::Float,
            left: "a".to_string(),
            right: "b".to_string(),
            target: "$T2".to_string(),
        }
    );

    let parsed: IrInstruction = "STRING greeting \"hello world\"".parse().unwrap();
    assert_eq!(
        parsed,
        IrInstruction::StringDecl {
            name: "greeting".to_string(),
            value: "\"hello world\"".to_string(),
        }
    );

    assert!("FROB x y".parse::<IrInstruction>().is_err());
    assert!("STOREI 5".parse::<IrInstruction>().is_err());
}

#[test]
fn test_literal_assignment() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    builder
        .declare("x", SymbolAttributes::variable(SymbolKind::Integer))
        .unwrap();
    builder.enter_scope("main");
    builder.begin_assignment("x");
    builder.operand("5");
    builder.exit_scope();

    let code = generate(builder).unwrap();
    assert_eq!(
        code,
        vec![
            "VAR x",
            "LABEL main",
            "LINK",
            "STOREI 5 $T1",
            "STOREI $T1 x",
            "RETURN",
        ]
    );
}

#[test]
fn test_float_literals_use_the_float_store() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    builder
        .declare("f", SymbolAttributes::variable(SymbolKind::Float))
        .unwrap();
    builder.enter_scope("main");
    builder.begin_assignment("f");
    builder.operand("3.14");
    builder.exit_scope();

    let code = generate(builder).unwrap();
    assert!(code.contains(&"STOREF 3.14 $T1".to_string()));
    assert!(code.contains(&"STOREF $T1 f".to_string()));
}

#[test]
fn test_repeated_literals_share_one_temporary() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    for name in ["x", "y"] {
        builder
            .declare(name, SymbolAttributes::variable(SymbolKind::Integer))
            .unwrap();
    }
    builder.enter_scope("main");
    builder.begin_assignment("x");
    builder.operand("5");
    builder.begin_assignment("y");
    builder.operand("5");
    builder.exit_scope();

    let code = generate(builder).unwrap();
    let literal_stores = code.iter().filter(|l| l.starts_with("STOREI 5 ")).count();
    assert_eq!(literal_stores, 1);
    assert!(code.contains(&"STOREI $T1 x".to_string()));
    assert!(code.contains(&"STOREI $T1 y".to_string()));
}

#[test]
fn test_arithmetic_kind_comes_from_the_left_operand() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    builder
        .declare("f", SymbolAttributes::variable(SymbolKind::Float))
        .unwrap();
    builder
        .declare("x", SymbolAttributes::variable(SymbolKind::Float))
        .unwrap();
    builder
        .declare("n", SymbolAttributes::variable(SymbolKind::Integer))
        .unwrap();
    builder.enter_scope("main");
    builder.begin_assignment("x");
    builder.operand("f");
    builder.operator("+");
    builder.operand("n");
    builder.exit_scope();

    let code = generate(builder).unwrap();
    assert!(code.contains(&"ADDF f n $T1".to_string()));
}

#[test]
fn test_chained_operators_consume_temporaries() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    for name in ["x", "a", "b", "c"] {
        builder
            .declare(name, SymbolAttributes::variable(SymbolKind::Integer))
            .unwrap();
    }
    builder.enter_scope("main");
    builder.begin_assignment("x");
    builder.operand("a");
    builder.operator("+");
    builder.operand("b");
    builder.operator("+");
    builder.operand("c");
    builder.exit_scope();

    let code = generate(builder).unwrap();
    assert!(code.contains(&"ADDI a b $T1".to_string()));
    assert!(code.contains(&"ADDI $T1 c $T2".to_string()));
    assert!(code.contains(&"STOREI $T2 x".to_string()));
}

#[test]
fn test_malformed_literal_aborts() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    builder
        .declare("x", SymbolAttributes::variable(SymbolKind::Integer))
        .unwrap();
    builder.enter_scope("main");
    builder.begin_assignment("x");
    builder.operand("12abc");
    builder.exit_scope();

    let error = generate(builder).unwrap_err();
    assert_eq!(error.name(), "MalformedLiteral");
}

#[test]
fn test_undeclared_assignment_target_aborts() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    builder.enter_scope("main");
    builder.begin_assignment("ghost");
    builder.operand("5");
    builder.exit_scope();

    let error = generate(builder).unwrap_err();
    assert_eq!(error.name(), "UndeclaredSymbol");
}

#[test]
fn test_read_rejects_string_symbols() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    builder
        .declare("banner", SymbolAttributes::string("\"hi\""))
        .unwrap();
    builder.enter_scope("main");
    builder.read_statement("banner");
    builder.exit_scope();

    let error = generate(builder).unwrap_err();
    assert_eq!(error.name(), "StringRead");
}

#[test]
fn test_write_accepts_string_symbols() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    builder
        .declare("banner", SymbolAttributes::string("\"hi\""))
        .unwrap();
    builder.enter_scope("main");
    builder.write_statement("banner");
    builder.exit_scope();

    let code = generate(builder).unwrap();
    assert!(code.contains(&"WRITES banner".to_string()));
}

#[test]
fn test_read_and_write_expand_comma_lists() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    builder
        .declare("a", SymbolAttributes::variable(SymbolKind::Integer))
        .unwrap();
    builder
        .declare("b", SymbolAttributes::variable(SymbolKind::Float))
        .unwrap();
    builder.enter_scope("main");
    builder.read_statement("a,b");
    builder.write_statement("b,a");
    builder.exit_scope();

    let code = generate(builder).unwrap();
    let body: Vec<&String> = code
        .iter()
        .filter(|l| l.starts_with("READ") || l.starts_with("WRITE"))
        .collect();
    assert_eq!(body, vec!["READI a", "READF b", "WRITEF b", "WRITEI a"]);
}

#[test]
fn test_declarations_skip_the_previous_scope_redeclaration() {
    let mut builder = ProgramBuilder::new();
    builder.enter_scope("GLOBAL");
    builder
        .declare("x", SymbolAttributes::variable(SymbolKind::Integer))
        .unwrap();
    builder.enter_scope("main");
    builder
        .declare("x", SymbolAttributes::variable(SymbolKind::Integer))
        .unwrap();
    builder
        .declare("y", SymbolAttributes::variable(SymbolKind::Integer))
        .unwrap();
    builder.exit_scope();

    let code = generate(builder).unwrap();
    let declarations: Vec<&String> = code.iter().filter(|l| l.starts_with("VAR")).collect();
    assert_eq!(declarations, vec!["VAR x", "VAR y"]);
}

#[test]
fn test_generation_is_deterministic() {
    let build = || {
        let mut builder = ProgramBuilder::new();
        builder.enter_scope("GLOBAL");
        for name in ["x", "y"] {
            builder
                .declare(name, SymbolAttributes::variable(SymbolKind::Integer))
                .unwrap();
        }
        builder.enter_scope("main");
        builder.begin_assignment("x");
        builder.operand("2");
        builder.operator("+");
        builder.operand("3");
        builder.begin_assignment("y");
        builder.operand("x");
        builder.operator("*");
        builder.operand("2");
        builder.exit_scope();
        generate(builder).unwrap()
    };

    assert_eq!(build(), build());
}
