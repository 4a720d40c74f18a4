//! The level solver: prec2 relations -> integer levels per token.
//!
//! Every token owns a level variable with a left and a right slot.
//! Equality cells alias slots through a union-find; the remaining strict
//! orderings are solved by repeatedly assigning values to variables with
//! no pending predecessor. A variable no constraint ever touches stays
//! unassigned, which is exactly what marks openers (no left level) and
//! closers (no right level).

use indexmap::{IndexMap, IndexSet};

use super::error::GrammarError;
use super::prec2::{Prec2, Relation};
use crate::core::Token;

/// Solved precedence levels of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpLevels {
    /// Binding level toward what precedes the token; `None` for openers.
    pub left: Option<u16>,
    /// Binding level toward what follows the token; `None` for closers.
    pub right: Option<u16>,
}

impl OpLevels {
    pub fn is_opener(&self) -> bool {
        self.left.is_none()
    }

    pub fn is_closer(&self) -> bool {
        self.right.is_none()
    }
}

/// Token -> levels mapping produced by [`prec2_to_levels`].
#[derive(Debug, Clone, Default)]
pub struct LevelTable {
    entries: IndexMap<Token, OpLevels>,
}

impl LevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, token: &str) -> Option<OpLevels> {
        self.entries.get(token).copied()
    }

    /// Insert or replace an entry; for hand-built tables.
    pub fn insert(&mut self, token: &str, levels: OpLevels) {
        self.entries.insert(Token::from(token), levels);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, OpLevels)> + '_ {
        self.entries.iter().map(|(t, l)| (t, *l))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Union-find with path compression over level-variable ids.
struct VarSets {
    parent: Vec<usize>,
}

impl VarSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Solve a prec2 table into per-token levels.
///
/// The only failure is a cycle among the ordering constraints; every
/// other oddity of the input has already been reduced to diagnostics.
pub fn prec2_to_levels(table: &Prec2) -> Result<LevelTable, GrammarError> {
    let mut tokens: IndexSet<Token> = IndexSet::new();
    for (l, r, _) in table.iter() {
        tokens.insert(l.clone());
        tokens.insert(r.clone());
    }
    // variable ids: left of token i = 2i, right = 2i + 1
    let left_var = |i: usize| 2 * i;
    let right_var = |i: usize| 2 * i + 1;

    let mut sets = VarSets::new(2 * tokens.len());
    let mut orderings: Vec<(usize, usize)> = Vec::new();
    for (l, r, rel) in table.iter() {
        let x = tokens.get_index_of(l).unwrap();
        let y = tokens.get_index_of(r).unwrap();
        match rel {
            Relation::Eq => sets.union(right_var(x), left_var(y)),
            Relation::Lt => orderings.push((right_var(x), left_var(y))),
            Relation::Gt => orderings.push((left_var(y), right_var(x))),
        }
    }

    // normalize orderings to representatives; a self-edge is already a cycle
    let mut edges: IndexSet<(usize, usize)> = IndexSet::new();
    for (a, b) in orderings {
        let (ra, rb) = (sets.find(a), sets.find(b));
        if ra == rb {
            return Err(GrammarError::Cycle {
                token: tokens.get_index(a / 2).unwrap().to_string(),
            });
        }
        edges.insert((ra, rb));
    }

    let mut pending: IndexSet<usize> = edges.iter().flat_map(|&(a, b)| [a, b]).collect();
    let mut assigned: IndexMap<usize, u16> = IndexMap::new();
    let mut next: u16 = 0;
    while !pending.is_empty() {
        let blocked: IndexSet<usize> = edges.iter().map(|&(_, b)| b).collect();
        let ready: Vec<usize> = pending
            .iter()
            .copied()
            .filter(|v| !blocked.contains(v))
            .collect();
        if ready.is_empty() {
            let stuck = *pending.first().unwrap();
            return Err(GrammarError::Cycle {
                token: tokens.get_index(stuck / 2).unwrap().to_string(),
            });
        }
        for v in &ready {
            // one value per variable: only declared equalities end up equal
            assigned.insert(*v, next);
            next += 1;
            pending.shift_remove(v);
        }
        edges.retain(|&(a, _)| !ready.contains(&a));
    }

    let mut result = LevelTable::new();
    for (i, tok) in tokens.iter().enumerate() {
        let left = assigned.get(&sets.find(left_var(i))).copied();
        let right = assigned.get(&sets.find(right_var(i))).copied();
        result.entries.insert(tok.clone(), OpLevels { left, right });
    }
    Ok(result)
}
