//! Semantic-event consumer for the excluded grammar front end.
//!
//! This module receives the front end's ordered callback stream and builds
//! the two structures the rest of the pipeline runs on. It handles:
//!
//! - Scope tracking (enter/exit events, synthetic block scope names)
//! - Symbol declaration with duplicate detection
//! - Statement roots for assignments, reads and writes
//! - Incremental, precedence-correct assembly of expression trees by
//!   reparenting along the open statement's right spine
//!
//! Events must arrive in the order the front end emits them; unbalanced or
//! out-of-place events are a front-end bug, not a source-program error.

pub mod builder;
