//! Grammar compilation: declarations -> prec2 relations -> integer levels.
//!
//! A language describes its operators either as a restricted BNF
//! ([`bnf_to_prec2`]) or as ordered precedence groups ([`precs_to_prec2`]).
//! Both produce a [`Prec2`] relation table; [`prec2_to_levels`] flattens
//! that table into the [`LevelTable`] the scanner navigates with. All of
//! this runs once at language-mode setup; the resulting tables are
//! immutable.

mod bnf;
mod error;
mod levels;
mod prec2;
mod precs;

pub use bnf::{bnf_to_prec2, Production};
pub use error::GrammarError;
pub use levels::{prec2_to_levels, LevelTable, OpLevels};
pub use prec2::{merge_prec2s, Conflict, Prec2, Relation};
pub use precs::{precs_to_prec2, Assoc, PrecGroup};

#[cfg(test)]
mod tests;
