//! Indentation configuration.

/// Per-language indentation configuration.
#[derive(Debug, Clone)]
pub struct IndentOptions {
    /// Column step used when no rule provides an offset.
    pub basic: i32,
}

impl Default for IndentOptions {
    fn default() -> Self {
        Self { basic: 4 }
    }
}
