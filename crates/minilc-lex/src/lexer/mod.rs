//! Lexer module: the `core` submodule holds the dispatch loop, kept
//! separate from the crate root so `lib.rs` stays a thin re-export surface.

mod core;

pub use core::Lexer;
