//! The pipeline stages a driver invocation can target.

use std::path::PathBuf;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Stage {
    Lex,
    Table,
    Parse,
    Ir,
    Opt,
    Codegen,
    All,
}

impl Stage {
    /// Stages are totally ordered by the pipeline's data dependencies;
    /// running a stage implies running (and writing the artifacts of)
    /// every stage before it.
    const ORDER: [Stage; 6] =
        [Stage::Lex, Stage::Table, Stage::Parse, Stage::Ir, Stage::Opt, Stage::Codegen];

    /// The effective last stage to run: `All` means "run everything".
    fn terminal(self) -> Stage {
        match self {
            Stage::All => Stage::Codegen,
            other => other,
        }
    }

    fn index(self) -> usize {
        Self::ORDER.iter().position(|&s| s == self).expect("terminal stage is always in ORDER")
    }

    pub fn includes(self, other: Stage) -> bool {
        other.index() <= self.terminal().index()
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Lex => "lex",
            Stage::Table => "table",
            Stage::Parse => "parse",
            Stage::Ir => "ir",
            Stage::Opt => "opt",
            Stage::Codegen => "codegen",
            Stage::All => "all",
        }
    }
}

/// What a `run_stage` call produced.
#[derive(Debug)]
pub struct StageReport {
    pub stage: Stage,
    pub output_dir: PathBuf,
    pub generated: Vec<PathBuf>,
}
