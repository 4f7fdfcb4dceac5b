//! The memoized, process-wide table bundle consumers actually reach for.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use minilc_util::CompileError;

use crate::grammar::{EOF, NONTERMINALS, TERMINALS};
use crate::lalr::{generate_tables, Action, LalrState};

pub struct GrammarTables {
    pub states: Vec<LalrState>,
    pub action: BTreeMap<usize, BTreeMap<&'static str, Action>>,
    pub goto: BTreeMap<usize, BTreeMap<&'static str, usize>>,
}

impl GrammarTables {
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn terminals_ordered() -> Vec<&'static str> {
        let mut terminals: Vec<&'static str> = TERMINALS.iter().copied().filter(|&t| t != EOF).collect();
        terminals.sort();
        terminals.push(EOF);
        terminals
    }

    pub fn nonterminals_ordered() -> Vec<&'static str> {
        let mut nonterminals: Vec<&'static str> = NONTERMINALS.iter().copied().filter(|&n| n != "S'").collect();
        nonterminals.sort();
        nonterminals
    }
}

static TABLES: OnceLock<Result<GrammarTables, CompileError>> = OnceLock::new();

/// Returns the LALR(1) tables for the fixed MiniLang grammar, computing
/// them exactly once per process.
pub fn tables() -> Result<&'static GrammarTables, CompileError> {
    match TABLES.get_or_init(|| {
        let (states, built) = generate_tables()?;
        Ok(GrammarTables {
            states,
            action: built.action,
            goto: built.goto,
        })
    }) {
        Ok(t) => Ok(t),
        Err(e) => Err(clone_error(e)),
    }
}

fn clone_error(e: &CompileError) -> CompileError {
    match e {
        CompileError::GrammarConflict { report } => CompileError::GrammarConflict {
            report: report.clone(),
        },
        other => CompileError::internal(other.to_string()),
    }
}
