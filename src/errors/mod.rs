//! Error types and error handling for the compiler back end.
//!
//! This module defines the error type shared by every stage of the
//! pipeline. It includes:
//!
//! - The fatal user-facing error kinds (duplicate declaration, undeclared
//!   symbol, malformed literal, string read)
//! - An internal-consistency kind for broken lowering invariants, kept
//!   separate from the user-facing errors
//!
//! Every error aborts the compilation; there is no recovery or partial
//! output mode.

pub mod errors;
