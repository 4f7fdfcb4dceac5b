use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_fixture(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("prog.ml");
    std::fs::File::create(&path).unwrap().write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn missing_input_flag_exits_with_code_two() {
    Command::cargo_bin("minilc").unwrap().assert().failure().code(2);
}

#[test]
fn a_clean_program_runs_the_whole_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(&dir, "x = 1 + 2;\nif (x > 0) { x = x - 1; }\n");
    Command::cargo_bin("minilc")
        .unwrap()
        .current_dir(dir.path())
        .args(["--input", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stage 'all' finished"))
        .stdout(predicate::str::contains("target.asm"));
}

#[test]
fn a_lex_error_exits_with_code_one_and_prints_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(&dir, "x === 1;\n");
    Command::cargo_bin("minilc")
        .unwrap()
        .current_dir(dir.path())
        .args(["--input", input.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn requesting_a_single_stage_only_generates_that_stage_and_its_prerequisites() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(&dir, "x = 1;\n");
    Command::cargo_bin("minilc")
        .unwrap()
        .current_dir(dir.path())
        .args(["--input", input.to_str().unwrap(), "--stage", "ir"])
        .assert()
        .success();
    assert!(dir.path().join("out/prog/ir.quad").exists());
    assert!(!dir.path().join("out/prog/target.asm").exists());
}
