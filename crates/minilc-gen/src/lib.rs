//! Lowers optimized quads to a small stack-machine assembly text format.

mod asm;

pub use asm::{generate, validate_labels};
