use crate::ast::ast::{NodeKind, SyntaxForest};
use crate::errors::errors::CompileError;
use crate::symbols::table::{ScopeRegistry, SymbolAttributes};

/// Builds the scope registry and syntax forest from the front end's
/// semantic events. One builder instance corresponds to one compilation
/// unit.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    registry: ScopeRegistry,
    forest: SyntaxForest,
    block_counter: u32,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        ProgramBuilder::default()
    }

    /// Opens a named scope (the program's global scope or a function body).
    pub fn enter_scope(&mut self, name: &str) {
        self.registry.enter(name);
    }

    /// Opens a synthetic block scope for an if/else branch or a loop body.
    /// Blocks are numbered in the order they are encountered.
    pub fn enter_block(&mut self) {
        self.block_counter += 1;
        let name = format!("BLOCK {}", self.block_counter);
        self.registry.enter(&name);
    }

    pub fn exit_scope(&mut self) {
        self.registry.exit();
    }

    /// Declares a symbol in the current scope.
    pub fn declare(
        &mut self,
        name: &str,
        attributes: SymbolAttributes,
    ) -> Result<(), CompileError> {
        self.registry.declare(name, attributes)
    }

    /// Starts an assignment statement: an `:=` operator root whose left
    /// child is the target l-value. The value subtree grows under the root
    /// as operand/operator events arrive.
    pub fn begin_assignment(&mut self, target: &str) {
        let root = self.forest.alloc(NodeKind::Operator, ":=");
        let lvalue = self.forest.alloc(NodeKind::LValue, target);
        self.forest.set_left(root, lvalue);
        self.forest.push_root(root);
    }

    /// Appends a read statement. The leaf carries the raw comma-joined
    /// variable list; no expression subtree is built.
    pub fn read_statement(&mut self, id_list: &str) {
        let root = self.forest.alloc(NodeKind::Read, id_list);
        self.forest.push_root(root);
    }

    /// Appends a write statement, mirroring `read_statement`.
    pub fn write_statement(&mut self, id_list: &str) {
        let root = self.forest.alloc(NodeKind::Write, id_list);
        self.forest.push_root(root);
    }

    /// Attaches an operand (identifier or literal) at the next open
    /// right-child slot of the statement under construction.
    pub fn operand(&mut self, text: &str) {
        let root = self
            .forest
            .last_root()
            .expect("operand event outside a statement");

        let mut walker = root;
        while let Some(right) = self.forest.node(walker).right {
            walker = right;
        }

        let leaf = self.forest.alloc(NodeKind::RValue, text);
        self.forest.set_right(walker, leaf);
    }

    /// Splices a binary operator into the statement under construction.
    ///
    /// The walk runs down the right spine below the statement root and
    /// remembers the deepest node with both children populated; if no such
    /// node exists the bottom of the spine (the operand just attached) is
    /// taken instead. The chosen subtree becomes the new operator's left
    /// child and the operator takes over its former slot, so operators that
    /// arrive later sit higher in the tree.
    pub fn operator(&mut self, symbol: &str) {
        let root = self
            .forest
            .last_root()
            .expect("operator event outside a statement");

        let mut walker = self
            .forest
            .node(root)
            .right
            .expect("operator event before any operand");
        let mut saturated = None;

        loop {
            if self.forest.is_saturated(walker) {
                saturated = Some(walker);
            }
            match self.forest.node(walker).right {
                Some(next) => walker = next,
                None => break,
            }
        }

        let detached = saturated.unwrap_or(walker);
        let parent = self
            .forest
            .node(detached)
            .parent
            .expect("spliced node has no parent");

        let operator = self.forest.alloc(NodeKind::Operator, symbol);
        self.forest.set_left(operator, detached);
        self.forest.set_right(parent, operator);
    }

    pub fn registry(&self) -> &ScopeRegistry {
        &self.registry
    }

    pub fn forest(&self) -> &SyntaxForest {
        &self.forest
    }

    /// Hands the finished structures to the IR generator.
    pub fn finish(self) -> (ScopeRegistry, SyntaxForest) {
        (self.registry, self.forest)
    }
}
