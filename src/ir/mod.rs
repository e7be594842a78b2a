//! Three-address intermediate representation.
//!
//! This module defines the IR produced from the syntax forest and consumed
//! by the lowering stage. It handles:
//!
//! - The instruction model and its exact line-oriented textual form
//!   (`STOREI 5 $T1`, `ADDF a b $T2`, ...), in both directions
//! - Temporary naming (`$T<n>`, unique per compilation, never reused)
//! - The IR generator: a post-order walk of the whole forest per
//!   executable scope, plus declaration emission in scope-creation order
//!   with the single-scope look-back dedup rule

pub mod generator;
pub mod instruction;

#[cfg(test)]
mod tests;
