use std::io::Write;
use std::path::PathBuf;

use minilc_drv::{run_stage, Stage};

fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::File::create(&path).unwrap().write_all(contents.as_bytes()).unwrap();
    path
}

/// `run_stage` resolves its output directory relative to the process's
/// current directory, which cargo sets to the package root for
/// integration test binaries.
fn package_out_dir(stem: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("out").join(stem)
}

#[test]
fn a_while_loop_program_survives_the_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(&dir, "pipeline_loop_fixture.ml", "i = 0;\nwhile (i < 10) {\n  i = i + 1;\n}\n");
    let report = run_stage(Stage::All, &input).unwrap();
    assert_eq!(report.generated.len(), 9);

    let out_dir = package_out_dir("pipeline_loop_fixture");
    let asm = std::fs::read_to_string(out_dir.join("target.asm")).unwrap();
    assert!(asm.trim_end().ends_with("HALT"));
    assert!(asm.contains("JNZ"));
    std::fs::remove_dir_all(out_dir).ok();
}

#[test]
fn a_constant_program_is_folded_down_in_the_opt_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(&dir, "pipeline_const_fixture.ml", "x = 2 + 3;\n");
    run_stage(Stage::Opt, &input).unwrap();

    let out_dir = package_out_dir("pipeline_const_fixture");
    let ir_opt = std::fs::read_to_string(out_dir.join("ir_opt.quad")).unwrap();
    assert!(ir_opt.contains("(ASSIGN, 5, -, x)"));
    std::fs::remove_dir_all(out_dir).ok();
}
