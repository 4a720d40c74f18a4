//! Language context and per-invocation engine.
//!
//! Mode setup binds a level table and a rule table for the current
//! editing context; that binding is an explicit [`Language`] value
//! instead of ambient mode-local state. An [`Engine`] is the short-lived
//! pairing of a language with a host cursor; it holds no state of its
//! own beyond a recursion guard.

use crate::grammar::LevelTable;
use crate::host::Host;
use crate::indent::{IndentOptions, IndentRules};

/// Immutable per-language context: solved operator levels, indentation
/// rules and configuration.
#[derive(Debug, Clone, Default)]
pub struct Language {
    pub levels: LevelTable,
    pub rules: IndentRules,
    pub options: IndentOptions,
}

impl Language {
    pub fn new(levels: LevelTable, rules: IndentRules) -> Self {
        Self {
            levels,
            rules,
            options: IndentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: IndentOptions) -> Self {
        self.options = options;
        self
    }
}

/// A language bound to a host cursor for one command.
pub struct Engine<'a, H: Host> {
    pub(crate) lang: &'a Language,
    pub(crate) host: &'a mut H,
    pub(crate) depth: u32,
}

impl<'a, H: Host> Engine<'a, H> {
    pub fn new(lang: &'a Language, host: &'a mut H) -> Self {
        Self {
            lang,
            host,
            depth: 0,
        }
    }

    pub fn host(&mut self) -> &mut H {
        self.host
    }
}
