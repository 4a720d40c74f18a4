//! Precedence-list grammar input.
//!
//! The lightweight way to declare a language: an ordered sequence of
//! operator groups, loosest binding first, tightest last (so `+` comes
//! before `*`). Each group carries the associativity shared by its
//! operators.

use super::prec2::{Prec2, Relation};

/// Operator associativity within one precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    NonAssoc,
    /// Fully associative: members chain as siblings of one construct.
    Assoc,
}

/// One precedence group: an associativity plus the operators sharing it.
#[derive(Debug, Clone)]
pub struct PrecGroup {
    pub assoc: Assoc,
    pub ops: Vec<String>,
}

impl PrecGroup {
    pub fn new(assoc: Assoc, ops: &[&str]) -> Self {
        Self {
            assoc,
            ops: ops.iter().map(|op| (*op).to_owned()).collect(),
        }
    }

    pub fn left(ops: &[&str]) -> Self {
        Self::new(Assoc::Left, ops)
    }

    pub fn right(ops: &[&str]) -> Self {
        Self::new(Assoc::Right, ops)
    }

    pub fn non_assoc(ops: &[&str]) -> Self {
        Self::new(Assoc::NonAssoc, ops)
    }

    pub fn assoc(ops: &[&str]) -> Self {
        Self::new(Assoc::Assoc, ops)
    }
}

/// Compile an ordered precedence list into a prec2 table.
///
/// Within a group every ordered pair (including a token against itself)
/// gets the relation implied by the associativity tag; across groups the
/// earlier (looser) token is `Lt` the later (tighter) one, with the
/// mirrored cell `Gt`.
pub fn precs_to_prec2(groups: &[PrecGroup]) -> Prec2 {
    let mut table = Prec2::new();
    for (i, group) in groups.iter().enumerate() {
        let self_rel = match group.assoc {
            Assoc::Left => Some(Relation::Gt),
            Assoc::Right => Some(Relation::Lt),
            Assoc::Assoc => Some(Relation::Eq),
            Assoc::NonAssoc => None,
        };
        for op in &group.ops {
            if let Some(rel) = self_rel {
                for other in &group.ops {
                    table.set(op, other, rel);
                }
            }
            for (j, other_group) in groups.iter().enumerate() {
                if j == i {
                    continue;
                }
                // j < i: `other` is in a looser group than `op`
                let (rel, mirror) = if j < i {
                    (Relation::Gt, Relation::Lt)
                } else {
                    (Relation::Lt, Relation::Gt)
                };
                for other in &other_group.ops {
                    table.set(op, other, rel);
                    table.set(other, op, mirror);
                }
            }
        }
    }
    table
}
