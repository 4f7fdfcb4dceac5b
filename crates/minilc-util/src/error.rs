//! The single error type shared by every stage of the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Every user-facing or internal failure that can surface while compiling
/// a source file, from lexing through codegen.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Error {line}:{col}: {message}")]
    Lex {
        line: u32,
        col: u32,
        message: String,
    },

    #[error("Error {line}:{col}: Expected {expected}, but got {found}")]
    Parse {
        line: u32,
        col: u32,
        expected: String,
        found: String,
    },

    /// Only ever produced while computing the table generator's own
    /// fixed-grammar tables; see the table generator's unit tests for the
    /// toy-grammar case that exercises this variant.
    #[error("{report}")]
    GrammarConflict { report: String },

    #[error("Error: undefined label {name}")]
    UndefinedLabel { name: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Error: failed to read input file: {path} does not exist")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

impl CompileError {
    pub fn internal(message: impl Into<String>) -> Self {
        CompileError::Internal {
            message: message.into(),
        }
    }
}

/// Result type alias used throughout every pipeline crate.
pub type CompileResult<T> = std::result::Result<T, CompileError>;
