pub mod core;
pub mod engine;
pub mod grammar;
pub mod host;
pub mod indent;
pub mod scan;

// Re-export the setup and runtime surface
pub use engine::{Engine, Language};
pub use grammar::{bnf_to_prec2, merge_prec2s, prec2_to_levels, precs_to_prec2};
pub use host::{Host, SourceBuffer};
pub use indent::{Indent, IndentOptions, IndentRules, Offset, Virtual};
pub use scan::Scan;
