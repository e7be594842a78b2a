/// AST (Abstract Syntax Tree) module
/// Contains the syntax forest built from the front end's event stream
///
/// Submodules:
/// - ast: the tagged binary node, the node arena and the statement roots
pub mod ast;

#[cfg(test)]
mod tests;
