//! The two-dimensional precedence relation table.
//!
//! A prec2 table maps ordered token pairs to a [`Relation`]. It is the
//! intermediate representation between grammar declarations and the
//! one-dimensional level table: both input forms (BNF and precedence
//! lists) compile into it, tables can be merged, and the solver reads it
//! back out cell by cell.

use indexmap::IndexMap;

use crate::core::{Interner, Token};

/// Relation between two tokens `X` and `Y` appearing as `a X b Y c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `X` binds looser than `Y`: `Y` opens a construct nested under `X`.
    Lt,
    /// `X` and `Y` delimit the same construct (`if` / `then`).
    Eq,
    /// `X` binds tighter than `Y`.
    Gt,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Lt => "<",
            Relation::Eq => "=",
            Relation::Gt => ">",
        }
    }
}

/// A contradictory write recorded while building a table.
///
/// Conflicts never abort the build; they are kept for language authors to
/// inspect. `kept` is the value the cell ended up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub left: Token,
    pub right: Token,
    pub kept: Relation,
    pub rejected: Relation,
    /// True when an override table decided the cell.
    pub overridden: bool,
}

/// Mapping from ordered token pairs to their precedence relation.
///
/// Writes are monotonic with conflict detection: once a cell holds a
/// value, a disagreeing write is either resolved by an override table or
/// rejected, and either way the disagreement lands in the conflict
/// ledger.
#[derive(Debug, Default, Clone)]
pub struct Prec2 {
    cells: IndexMap<(Token, Token), Relation>,
    conflicts: Vec<Conflict>,
    interner: Interner,
}

impl Prec2 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relation of the `(left, right)` cell, if declared.
    pub fn get(&self, left: &str, right: &str) -> Option<Relation> {
        self.cells
            .get(&(Token::from(left), Token::from(right)))
            .copied()
    }

    /// Write a cell, keeping the existing value on conflict.
    pub fn set(&mut self, left: &str, right: &str, rel: Relation) {
        self.set_with(left, right, rel, None);
    }

    /// Write a cell; on conflict, an override table wins if it covers the
    /// cell, otherwise the existing value stays. The disagreement is
    /// recorded either way.
    pub(crate) fn set_with(
        &mut self,
        left: &str,
        right: &str,
        rel: Relation,
        overrides: Option<&Prec2>,
    ) {
        let key = (self.interner.intern(left), self.interner.intern(right));
        match self.cells.get(&key).copied() {
            None => {
                self.cells.insert(key, rel);
            }
            Some(old) if old == rel => {}
            Some(old) => match overrides.and_then(|t| t.get(left, right)) {
                Some(decided) => {
                    tracing::debug!(
                        left,
                        right,
                        old = old.as_str(),
                        new = rel.as_str(),
                        decided = decided.as_str(),
                        "precedence conflict resolved by override"
                    );
                    self.conflicts.push(Conflict {
                        left: key.0.clone(),
                        right: key.1.clone(),
                        kept: decided,
                        rejected: if decided == old { rel } else { old },
                        overridden: true,
                    });
                    self.cells.insert(key, decided);
                }
                None => {
                    tracing::warn!(
                        left,
                        right,
                        kept = old.as_str(),
                        rejected = rel.as_str(),
                        "conflicting precedence relation"
                    );
                    self.conflicts.push(Conflict {
                        left: key.0.clone(),
                        right: key.1.clone(),
                        kept: old,
                        rejected: rel,
                        overridden: false,
                    });
                }
            },
        }
    }

    /// Iterate all declared cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Token, &Token, Relation)> + '_ {
        self.cells.iter().map(|((l, r), rel)| (l, r, *rel))
    }

    /// Disagreements recorded while the table was built.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Merge tables into one, first writer wins on conflicting cells.
pub fn merge_prec2s(tables: impl IntoIterator<Item = Prec2>) -> Prec2 {
    let mut merged = Prec2::new();
    for table in tables {
        merged.conflicts.extend(table.conflicts.iter().cloned());
        for (left, right, rel) in table.iter() {
            merged.set(left.as_str(), right.as_str(), rel);
        }
    }
    merged
}
