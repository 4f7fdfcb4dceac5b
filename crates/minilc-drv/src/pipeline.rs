//! Orchestrates the compiler phases and decides which artifacts a given
//! `Stage` request needs written.

use std::path::{Path, PathBuf};

use minilc_util::CompileError;

use crate::artifacts;
use crate::stage::{Stage, StageReport};

/// Runs the pipeline far enough to satisfy `stage`, writing every
/// artifact belonging to it and to the stages it transitively depends on.
pub fn run_stage(stage: Stage, input: &Path) -> Result<StageReport, CompileError> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let output_dir = PathBuf::from("out").join(stem);
    std::fs::create_dir_all(&output_dir)
        .map_err(|source| CompileError::Io { source, path: output_dir.clone() })?;

    let mut generated = Vec::new();

    if stage.includes(Stage::Table) {
        tracing::debug!(stage = "table", "building LALR(1) tables");
        generated.extend(artifacts::write_table_artifacts(&output_dir)?);
    }

    if !stage.includes(Stage::Lex) {
        return Ok(StageReport { stage, output_dir, generated });
    }

    let source = std::fs::read_to_string(input)
        .map_err(|source| CompileError::Io { source, path: input.to_path_buf() })?;

    tracing::debug!(stage = "lex", "tokenizing source");
    let tokens = minilc_lex::Lexer::tokenize(&source)?;
    generated.push(artifacts::write_tokens_csv(&output_dir, &tokens)?);
    if !stage.includes(Stage::Parse) {
        return Ok(StageReport { stage, output_dir, generated });
    }

    tracing::debug!(stage = "parse", token_count = tokens.len(), "parsing token stream");
    let parsed = minilc_parse::parse(&tokens)?;
    generated.push(artifacts::write_parse_trace(&output_dir, &parsed.trace)?);
    if !stage.includes(Stage::Ir) {
        return Ok(StageReport { stage, output_dir, generated });
    }

    tracing::debug!(stage = "ir", "lowering AST to quads");
    let quads = minilc_ir::generate(&parsed.program);
    generated.push(artifacts::write_ir_quad(&output_dir, &quads)?);
    if !stage.includes(Stage::Opt) {
        return Ok(StageReport { stage, output_dir, generated });
    }

    tracing::debug!(stage = "opt", quad_count = quads.len(), "running block-local optimizer");
    let opt = minilc_opt::optimize(quads)?;
    generated.extend(artifacts::write_opt_artifacts(&output_dir, &opt.quads, &opt.report)?);
    if !stage.includes(Stage::Codegen) {
        return Ok(StageReport { stage, output_dir, generated });
    }

    tracing::debug!(stage = "codegen", "emitting stack-machine assembly");
    let asm = minilc_gen::generate(&opt.quads)?;
    generated.push(artifacts::write_target_asm(&output_dir, &asm)?);

    Ok(StageReport { stage, output_dir, generated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(stem: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("{stem}.ml"));
        std::fs::File::create(&path).unwrap().write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    /// Each test's fixture gets its own stem so the `out/<stem>` directories
    /// these tests write to (relative to the package root, since `run_stage`
    /// resolves output paths against the process cwd) never collide when
    /// tests run concurrently.
    fn cleanup(stem: &str) {
        let _ = std::fs::remove_dir_all(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("out").join(stem));
    }

    #[test]
    fn lex_stage_only_writes_tokens_csv() {
        let (_dir, path) = fixture("unit_lex_only", "x = 1;");
        let report = run_stage(Stage::Lex, &path).unwrap();
        assert_eq!(report.generated.len(), 1);
        assert!(report.generated[0].ends_with("tokens.csv"));
        cleanup("unit_lex_only");
    }

    #[test]
    fn codegen_stage_writes_every_artifact() {
        let (_dir, path) = fixture("unit_codegen_all", "x = 1 + 2;");
        let report = run_stage(Stage::Codegen, &path).unwrap();
        let names: Vec<String> =
            report.generated.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        for expected in [
            "productions.txt",
            "symbols.txt",
            "action_goto.csv",
            "tokens.csv",
            "parse_trace.tsv",
            "ir.quad",
            "ir_opt.quad",
            "opt_report.txt",
            "target.asm",
        ] {
            assert!(names.contains(&expected.to_string()), "missing {expected}");
        }
        cleanup("unit_codegen_all");
    }

    #[test]
    fn table_stage_does_not_require_a_readable_input_file() {
        let report = run_stage(Stage::Table, Path::new("/nonexistent/does-not-matter.ml")).unwrap();
        assert_eq!(report.generated.len(), 3);
        cleanup("does-not-matter");
    }

    #[test]
    fn a_missing_input_file_is_an_io_error() {
        let err = run_stage(Stage::Lex, Path::new("/nonexistent/missing.ml")).unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
    }
}
