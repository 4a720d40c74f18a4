//! The per-language indentation rule table.
//!
//! The recognized key shapes are typed fields rather than stringly keys:
//! offsets after a token (with an optional hanging variant), offsets of a
//! token relative to its enclosing parent (exact or wildcard), the set of
//! list-intro tokens, and the basic/argument steps.

use indexmap::{IndexMap, IndexSet};

/// An offset supplied by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    /// Add this many columns.
    Cols(i32),
    /// Sentinel: leave the line as it is.
    Keep,
}

/// Offsets applying to the line after a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AfterRule {
    pub offset: Offset,
    /// Used instead of `offset` when the token hangs at its line end.
    pub hanging: Option<Offset>,
}

/// Typed rule table, immutable once the language is set up.
#[derive(Debug, Clone, Default)]
pub struct IndentRules {
    after: IndexMap<String, AfterRule>,
    within: IndexMap<(String, String), Offset>,
    within_any: IndexMap<String, Offset>,
    list_intro: IndexSet<String>,
    basic: Option<Offset>,
    args: Option<Offset>,
}

impl IndentRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset for lines following `token`.
    pub fn with_after(mut self, token: &str, offset: i32) -> Self {
        self.after.insert(
            token.to_owned(),
            AfterRule {
                offset: Offset::Cols(offset),
                hanging: None,
            },
        );
        self
    }

    /// Offset for lines following `token`, with a distinct offset when
    /// the token hangs.
    pub fn with_after_hanging(mut self, token: &str, offset: i32, hanging: i32) -> Self {
        self.after.insert(
            token.to_owned(),
            AfterRule {
                offset: Offset::Cols(offset),
                hanging: Some(Offset::Cols(hanging)),
            },
        );
        self
    }

    /// Leave lines following `token` untouched.
    pub fn with_after_keep(mut self, token: &str) -> Self {
        self.after.insert(
            token.to_owned(),
            AfterRule {
                offset: Offset::Keep,
                hanging: None,
            },
        );
        self
    }

    /// Offset of `token` relative to the `parent` construct it sits in.
    pub fn with_within(mut self, parent: &str, token: &str, offset: i32) -> Self {
        self.within
            .insert((parent.to_owned(), token.to_owned()), Offset::Cols(offset));
        self
    }

    /// Offset of `token` relative to its parent, whatever the parent is.
    pub fn with_within_any(mut self, token: &str, offset: i32) -> Self {
        self.within_any
            .insert(token.to_owned(), Offset::Cols(offset));
        self
    }

    /// Tokens after which a sequence of expressions follows rather than a
    /// function-call argument list.
    pub fn with_list_intro(mut self, tokens: &[&str]) -> Self {
        for token in tokens {
            self.list_intro.insert((*token).to_owned());
        }
        self
    }

    /// Basic step, overriding the configured default.
    pub fn with_basic(mut self, offset: i32) -> Self {
        self.basic = Some(Offset::Cols(offset));
        self
    }

    /// Offset for function arguments relative to the function.
    pub fn with_args(mut self, offset: i32) -> Self {
        self.args = Some(Offset::Cols(offset));
        self
    }

    pub(crate) fn after(&self, token: &str) -> Option<AfterRule> {
        self.after.get(token).copied()
    }

    pub(crate) fn within(&self, parent: &str, token: &str) -> Option<Offset> {
        self.within
            .get(&(parent.to_owned(), token.to_owned()))
            .copied()
    }

    pub(crate) fn within_any(&self, token: &str) -> Option<Offset> {
        self.within_any.get(token).copied()
    }

    pub(crate) fn is_list_intro(&self, token: &str) -> bool {
        self.list_intro.contains(token)
    }

    pub(crate) fn basic(&self) -> Option<Offset> {
        self.basic
    }

    pub(crate) fn args(&self) -> Option<Offset> {
        self.args
    }
}
