pub mod interner;

pub use interner::{Interner, Token};
