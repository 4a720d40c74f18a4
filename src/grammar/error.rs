//! Grammar construction errors.
//!
//! Almost everything that can go wrong while compiling a grammar is a
//! diagnostic, not an error: conflicting prec2 cells are recorded and the
//! first writer wins, malformed BNF shapes are skipped with a warning.
//! The one fatal case is a constraint cycle in the level solver.

use thiserror::Error;

/// Errors raised while compiling a grammar into a level table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The inequality constraints contain a cycle, so the prec2 table
    /// cannot be flattened into integer levels.
    #[error("cannot resolve precedence table to levels: cycle involving `{token}`")]
    Cycle { token: String },
}
