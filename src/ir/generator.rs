use std::collections::HashMap;

use crate::ast::ast::{NodeId, NodeKind, SyntaxForest};
use crate::errors::errors::CompileError;
use crate::ir::instruction::{temporary_name, IrInstruction, ValueKind, OPERATOR_LOOKUP};
use crate::symbols::table::{ScopeRegistry, SymbolAttributes, SymbolKind};

const GLOBAL_SCOPE: &str = "GLOBAL";

/// Generates the three-address instruction sequence from the scope
/// registry and syntax forest.
///
/// Identical inputs always produce the identical sequence, including
/// temporary numbering.
pub fn generate_ir(
    registry: &mut ScopeRegistry,
    forest: &mut SyntaxForest,
) -> Result<Vec<IrInstruction>, CompileError> {
    let mut generator = IrGenerator::new();
    generator.run(registry, forest)?;
    Ok(generator.code)
}

struct IrGenerator {
    code: Vec<IrInstruction>,
    // No limit on the number of temporaries in use.
    temporary_counter: u32,
    // Literal text already hoisted into a temporary, for the lifetime of
    // the compilation.
    literal_temporaries: HashMap<String, String>,
}

impl IrGenerator {
    fn new() -> Self {
        IrGenerator {
            code: vec![],
            temporary_counter: 0,
            literal_temporaries: HashMap::new(),
        }
    }

    fn run(
        &mut self,
        registry: &mut ScopeRegistry,
        forest: &mut SyntaxForest,
    ) -> Result<(), CompileError> {
        for index in 0..registry.scopes().len() {
            let scope_name = registry.scopes()[index].scope().to_string();

            // Every executable scope gets a label, a frame link, the code
            // for the statement forest and a return marker, ahead of its
            // own declarations.
            if scope_name != GLOBAL_SCOPE {
                log::debug!("generating code for scope {}", scope_name);
                self.code.push(IrInstruction::Label { name: scope_name });
                self.code.push(IrInstruction::Link);
                self.walk_forest(registry, forest)?;
                self.code.push(IrInstruction::Return);
            }

            self.emit_declarations(registry, index);
        }

        Ok(())
    }

    /// Emits variable and string declarations for one scope in declaration
    /// order. A symbol is skipped when the immediately preceding scope in
    /// creation order declared the same name; the look-back is a single
    /// scope, not transitive.
    fn emit_declarations(&mut self, registry: &ScopeRegistry, index: usize) {
        let scopes = registry.scopes();

        for name in scopes[index].names() {
            if index > 0 && scopes[index - 1].contains(name) {
                continue;
            }

            let attributes = scopes[index].get(name).expect("declared name missing");
            match attributes.kind {
                SymbolKind::String => self.code.push(IrInstruction::StringDecl {
                    name: name.clone(),
                    value: attributes.value.clone().unwrap_or_default(),
                }),
                _ => self.code.push(IrInstruction::Var { name: name.clone() }),
            }
        }
    }

    fn walk_forest(
        &mut self,
        registry: &mut ScopeRegistry,
        forest: &mut SyntaxForest,
    ) -> Result<(), CompileError> {
        for root in forest.roots().to_vec() {
            self.post_order(root, registry, forest)?;
        }
        Ok(())
    }

    /// Post-order walk: left subtree, right subtree, then the node itself.
    fn post_order(
        &mut self,
        id: NodeId,
        registry: &mut ScopeRegistry,
        forest: &mut SyntaxForest,
    ) -> Result<(), CompileError> {
        if let Some(left) = forest.node(id).left {
            self.post_order(left, registry, forest)?;
        }
        if let Some(right) = forest.node(id).right {
            self.post_order(right, registry, forest)?;
        }

        match forest.node(id).kind {
            // L-values are consumed by their parent operator, temporaries
            // are already resolved.
            NodeKind::LValue | NodeKind::Temporary => Ok(()),
            NodeKind::RValue => self.process_rvalue(id, registry, forest),
            NodeKind::Operator => self.process_operator(id, registry, forest),
            NodeKind::Read => self.process_read(id, registry, forest),
            NodeKind::Write => self.process_write(id, registry, forest),
        }
    }

    /// Resolves an r-value leaf. Identifiers pass through untouched;
    /// literals are classified, stored into a fresh temporary and the node
    /// is rewritten to that temporary so parent operators consume it.
    fn process_rvalue(
        &mut self,
        id: NodeId,
        registry: &mut ScopeRegistry,
        forest: &mut SyntaxForest,
    ) -> Result<(), CompileError> {
        let text = forest.node(id).text.clone();

        if let Some(temporary) = self.literal_temporaries.get(&text) {
            let node = forest.node_mut(id);
            node.kind = NodeKind::Temporary;
            node.text = temporary.clone();
            return Ok(());
        }

        if registry.lookup(&text).is_some() {
            return Ok(());
        }

        let kind = classify_literal(&text)?;
        let temporary = self.next_temporary();

        self.code.push(IrInstruction::Store {
            kind,
            source: text.clone(),
            target: temporary.clone(),
        });

        let symbol_kind = match kind {
            ValueKind::Integer => SymbolKind::Integer,
            ValueKind::Float => SymbolKind::Float,
        };
        registry
            .global_mut()
            .declare(&temporary, SymbolAttributes::variable(symbol_kind))?;

        self.literal_temporaries.insert(text, temporary.clone());

        let node = forest.node_mut(id);
        node.kind = NodeKind::Temporary;
        node.text = temporary;
        Ok(())
    }

    fn process_operator(
        &mut self,
        id: NodeId,
        registry: &mut ScopeRegistry,
        forest: &mut SyntaxForest,
    ) -> Result<(), CompileError> {
        let symbol = forest.node(id).text.clone();
        let left = forest.node(id).left.expect("operator without a left child");
        let right = forest
            .node(id)
            .right
            .expect("operator without a right child");
        let left_text = forest.node(left).text.clone();
        let right_text = forest.node(right).text.clone();

        // Assignment stores the right subtree's resolved value into the
        // target, typed by the target's declared kind.
        if symbol == ":=" {
            let target_kind = self.lookup_kind(registry, &left_text)?;
            self.code.push(IrInstruction::Store {
                kind: ValueKind::for_symbol(target_kind),
                source: right_text,
                target: left_text,
            });
            return Ok(());
        }

        let op = *OPERATOR_LOOKUP
            .get(symbol.as_str())
            .unwrap_or_else(|| panic!("unknown operator {:?}", symbol));

        // The operation's kind comes from the left operand.
        let operand_kind = self.lookup_kind(registry, &left_text)?;
        let temporary = self.next_temporary();

        self.code.push(IrInstruction::Arith {
            op,
            kind: ValueKind::for_symbol(operand_kind),
            left: left_text,
            right: right_text,
            target: temporary.clone(),
        });

        // Result temporaries carry the operand kind so a chained operator
        // can resolve the kind of a temporary left operand.
        registry
            .global_mut()
            .declare(&temporary, SymbolAttributes::variable(operand_kind))?;

        let node = forest.node_mut(id);
        node.kind = NodeKind::Temporary;
        node.text = temporary;
        Ok(())
    }

    fn process_read(
        &mut self,
        id: NodeId,
        registry: &mut ScopeRegistry,
        forest: &mut SyntaxForest,
    ) -> Result<(), CompileError> {
        let list = forest.node(id).text.clone();

        for name in list.split(',') {
            let kind = self.lookup_kind(registry, name)?;
            if kind == SymbolKind::String {
                return Err(CompileError::StringRead {
                    symbol: name.to_string(),
                });
            }
            self.code.push(IrInstruction::Read {
                kind: ValueKind::for_symbol(kind),
                target: name.to_string(),
            });
        }
        Ok(())
    }

    fn process_write(
        &mut self,
        id: NodeId,
        registry: &mut ScopeRegistry,
        forest: &mut SyntaxForest,
    ) -> Result<(), CompileError> {
        let list = forest.node(id).text.clone();

        for name in list.split(',') {
            let kind = self.lookup_kind(registry, name)?;
            self.code.push(IrInstruction::Write {
                kind,
                target: name.to_string(),
            });
        }
        Ok(())
    }

    fn lookup_kind(
        &self,
        registry: &ScopeRegistry,
        name: &str,
    ) -> Result<SymbolKind, CompileError> {
        registry
            .lookup(name)
            .map(|attributes| attributes.kind)
            .ok_or_else(|| CompileError::UndeclaredSymbol {
                symbol: name.to_string(),
            })
    }

    fn next_temporary(&mut self) -> String {
        self.temporary_counter += 1;
        temporary_name(self.temporary_counter)
    }
}

/// Classifies a literal, trying an integer parse before a float parse.
fn classify_literal(text: &str) -> Result<ValueKind, CompileError> {
    if text.parse::<i64>().is_ok() {
        return Ok(ValueKind::Integer);
    }
    if text.parse::<f64>().is_ok() {
        return Ok(ValueKind::Float);
    }
    Err(CompileError::MalformedLiteral {
        literal: text.to_string(),
    })
}
