use std::collections::HashMap;
use std::fmt::Display;

use crate::errors::errors::CompileError;

/// The declared kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Integer,
    Float,
    String,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Integer => "INT",
            SymbolKind::Float => "FLOAT",
            SymbolKind::String => "STRING",
        }
    }
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attributes attached to a declared symbol. Only STRING symbols carry a
/// compile-time value; INT and FLOAT values exist at runtime only.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolAttributes {
    pub kind: SymbolKind,
    pub value: Option<String>,
}

impl SymbolAttributes {
    pub fn variable(kind: SymbolKind) -> Self {
        SymbolAttributes { kind, value: None }
    }

    pub fn string(value: impl Into<String>) -> Self {
        SymbolAttributes {
            kind: SymbolKind::String,
            value: Some(value.into()),
        }
    }
}

/// One scope's symbol table. The map holds the symbol data while the name
/// list preserves declaration order.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scope: String,
    symbols: HashMap<String, SymbolAttributes>,
    order: Vec<String>,
}

impl SymbolTable {
    pub fn new(scope: impl Into<String>) -> Self {
        SymbolTable {
            scope: scope.into(),
            symbols: HashMap::new(),
            order: vec![],
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Declares a symbol in this scope. Redeclaring a name already present
    /// here is a fatal error.
    pub fn declare(
        &mut self,
        name: &str,
        attributes: SymbolAttributes,
    ) -> Result<(), CompileError> {
        if self.symbols.contains_key(name) {
            return Err(CompileError::DuplicateDeclaration {
                symbol: name.to_string(),
                scope: self.scope.clone(),
            });
        }

        self.symbols.insert(name.to_string(), attributes);
        self.order.push(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SymbolAttributes> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Symbol names in the order they were declared.
    pub fn names(&self) -> &[String] {
        &self.order
    }
}

/// Every scope created during a compilation, in creation order, plus the
/// stack of scopes that are still open. Exited scopes are popped from the
/// stack but stay in the registry for declaration emission and lookup.
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    scopes: Vec<SymbolTable>,
    active: Vec<usize>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        ScopeRegistry::default()
    }

    /// Opens a new scope and makes it current. Returns its stable index
    /// in the registry.
    pub fn enter(&mut self, name: &str) -> usize {
        let index = self.scopes.len();
        self.scopes.push(SymbolTable::new(name));
        self.active.push(index);
        index
    }

    /// Closes the current scope. The scope stays in the registry.
    pub fn exit(&mut self) {
        self.active
            .pop()
            .expect("scope exit without a matching enter");
    }

    pub fn current(&self) -> &SymbolTable {
        let index = *self.active.last().expect("no active scope");
        &self.scopes[index]
    }

    pub fn current_mut(&mut self) -> &mut SymbolTable {
        let index = *self.active.last().expect("no active scope");
        &mut self.scopes[index]
    }

    /// The first scope ever opened. Temporaries are registered here.
    pub fn global_mut(&mut self) -> &mut SymbolTable {
        self.scopes.first_mut().expect("no global scope")
    }

    /// Declares a symbol in the current scope.
    pub fn declare(
        &mut self,
        name: &str,
        attributes: SymbolAttributes,
    ) -> Result<(), CompileError> {
        self.current_mut().declare(name, attributes)
    }

    /// Looks a symbol up across every scope, in creation order.
    pub fn lookup(&self, name: &str) -> Option<&SymbolAttributes> {
        self.scopes.iter().find_map(|table| table.get(name))
    }

    pub fn scopes(&self) -> &[SymbolTable] {
        &self.scopes
    }

    pub fn depth(&self) -> usize {
        self.active.len()
    }
}
