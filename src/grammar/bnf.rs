//! BNF grammar input.
//!
//! The richer way to declare a language: productions over literal
//! operators and non-terminals, assumed to form an operator grammar (no
//! two adjacent non-terminals). The compiler derives, for every
//! non-terminal, the sets of operators that can open or close one of its
//! derivations, then records a relation for every adjacent pair in every
//! alternative. Precedence lists can be passed along to arbitrate the
//! conflicts a sloppy grammar produces.

use indexmap::{IndexMap, IndexSet};

use super::prec2::{merge_prec2s, Prec2, Relation};
use super::precs::{precs_to_prec2, PrecGroup};

/// One production: a non-terminal and its alternatives.
///
/// A symbol is a non-terminal iff it is the left-hand side of some
/// production in the grammar; everything else is a literal operator.
#[derive(Debug, Clone)]
pub struct Production {
    pub lhs: String,
    pub alternatives: Vec<Vec<String>>,
}

impl Production {
    pub fn new(lhs: &str, alternatives: &[&[&str]]) -> Self {
        Self {
            lhs: lhs.to_owned(),
            alternatives: alternatives
                .iter()
                .map(|alt| alt.iter().map(|sym| (*sym).to_owned()).collect())
                .collect(),
        }
    }
}

/// Compile a BNF grammar into a prec2 table.
///
/// `resolvers` are precedence lists pre-merged into a single override
/// table that arbitrates conflicting cells during compilation; they
/// contribute no cells of their own.
pub fn bnf_to_prec2(bnf: &[Production], resolvers: &[Vec<PrecGroup>]) -> Prec2 {
    let overrides = if resolvers.is_empty() {
        None
    } else {
        Some(merge_prec2s(
            resolvers.iter().map(|groups| precs_to_prec2(groups)),
        ))
    };

    let nts: IndexSet<&str> = bnf.iter().map(|p| p.lhs.as_str()).collect();
    let first_ops = op_sets(bnf, &nts, true);
    let last_ops = op_sets(bnf, &nts, false);

    let mut table = Prec2::new();
    for prod in bnf {
        for alt in &prod.alternatives {
            for i in 0..alt.len().saturating_sub(1) {
                let a = alt[i].as_str();
                let b = alt[i + 1].as_str();
                match (nts.contains(a), nts.contains(b)) {
                    (false, false) => {
                        table.set_with(a, b, Relation::Eq, overrides.as_ref());
                    }
                    (true, false) => {
                        if let Some(lasts) = last_ops.get(a) {
                            for last in lasts {
                                table.set_with(last, b, Relation::Gt, overrides.as_ref());
                            }
                        }
                    }
                    (false, true) => {
                        if let Some(firsts) = first_ops.get(b) {
                            for first in firsts {
                                table.set_with(a, first, Relation::Lt, overrides.as_ref());
                            }
                        }
                        // bracket equality: `if E then` makes (if, then) =
                        if let Some(c) = alt.get(i + 2) {
                            if !nts.contains(c.as_str()) {
                                table.set_with(a, c, Relation::Eq, overrides.as_ref());
                            }
                        }
                    }
                    (true, true) => {
                        tracing::warn!(
                            lhs = %prod.lhs,
                            left = a,
                            right = b,
                            "adjacent non-terminals; not an operator grammar, pair skipped"
                        );
                    }
                }
            }
        }
    }
    table
}

/// FIRST-OPS (`from_start`) or LAST-OPS sets per non-terminal.
///
/// Seeded from each alternative's boundary symbol (or the literal next to
/// it when the boundary is a non-terminal), then closed by propagating
/// along alternatives that start (end) with a non-terminal until nothing
/// changes.
fn op_sets(
    bnf: &[Production],
    nts: &IndexSet<&str>,
    from_start: bool,
) -> IndexMap<String, IndexSet<String>> {
    let mut sets: IndexMap<String, IndexSet<String>> = bnf
        .iter()
        .map(|p| (p.lhs.clone(), IndexSet::new()))
        .collect();
    let mut edges: Vec<(String, String)> = Vec::new();

    for prod in bnf {
        for alt in &prod.alternatives {
            if alt.is_empty() {
                continue;
            }
            let (head, adjacent) = if from_start {
                (&alt[0], alt.get(1))
            } else {
                (&alt[alt.len() - 1], (alt.len() >= 2).then(|| &alt[alt.len() - 2]))
            };
            if nts.contains(head.as_str()) {
                edges.push((head.clone(), prod.lhs.clone()));
                if let Some(adj) = adjacent {
                    if !nts.contains(adj.as_str()) {
                        sets.get_mut(&prod.lhs).unwrap().insert(adj.clone());
                    }
                }
            } else {
                sets.get_mut(&prod.lhs).unwrap().insert(head.clone());
            }
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for (src, dst) in &edges {
            if src == dst {
                continue;
            }
            let add: Vec<String> = match sets.get(src) {
                Some(set) => set.iter().cloned().collect(),
                None => continue,
            };
            let target = sets.get_mut(dst).unwrap();
            for op in add {
                changed |= target.insert(op);
            }
        }
    }
    sets
}
