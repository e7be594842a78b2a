use thiserror::Error;

/// Fatal compilation errors. Any of these aborts the current run; partial
/// IR or assembly already produced is discarded by the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("declaration error: {symbol:?} already declared in scope {scope:?}")]
    DuplicateDeclaration { symbol: String, scope: String },
    #[error("symbol {symbol:?} not declared")]
    UndeclaredSymbol { symbol: String },
    #[error("malformed literal: {literal:?} is neither an integer nor a float")]
    MalformedLiteral { literal: String },
    #[error("cannot read into {symbol:?}: string reads are unsupported")]
    StringRead { symbol: String },
    #[error("internal consistency fault: {message}")]
    Inconsistency { message: String },
}

impl CompileError {
    pub fn name(&self) -> &str {
        match self {
            CompileError::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            CompileError::UndeclaredSymbol { .. } => "UndeclaredSymbol",
            CompileError::MalformedLiteral { .. } => "MalformedLiteral",
            CompileError::StringRead { .. } => "StringRead",
            CompileError::Inconsistency { .. } => "Inconsistency",
        }
    }

    /// Whether the error reports a mistake in the source program, as
    /// opposed to a broken invariant inside the compiler itself.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, CompileError::Inconsistency { .. })
    }

    pub(crate) fn inconsistency(message: impl Into<String>) -> Self {
        CompileError::Inconsistency {
            message: message.into(),
        }
    }
}
