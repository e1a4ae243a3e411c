//! CLI end-to-end tests for `hadronc`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// `hadronc` started in `dir`, so no stray `hadron.toml` is picked up.
fn hadronc(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hadronc").expect("binary should build");
    cmd.current_dir(dir.path())
        .env_remove("HADRON_CONFIG")
        .env_remove("HADRON_VERBOSE")
        .env_remove("RUST_LOG");
    cmd
}

/// Compile `fixture` into `dir` and return the `.hbc` path.
fn compile_fixture(dir: &TempDir, fixture: &str) -> PathBuf {
    hadronc(dir)
        .arg("-o")
        .arg(dir.path())
        .arg(fixtures_dir().join(fixture))
        .assert()
        .success();
    let stem = fixture.trim_end_matches(".hd");
    dir.path().join(format!("{}.hbc", stem))
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage").and(predicate::str::contains("--keep-going")))
        .stdout(predicate::str::contains("--interpret").not());
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("hadronc "));
}

#[test]
fn test_compile_prints_listing() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .arg("-o")
        .arg(dir.path())
        .arg(fixtures_dir().join("arithmetic.hd"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("=== arithmetic ===\n"))
        .stdout(predicate::str::contains("MUL"))
        .stdout(predicate::str::contains("RET"));
    assert!(dir.path().join("arithmetic.hbc").exists());
}

#[test]
fn test_run_compiled_unit() {
    let dir = TempDir::new().unwrap();
    let compiled = compile_fixture(&dir, "arithmetic.hd");
    hadronc(&dir).arg(&compiled).assert().success().stdout("9\n");
}

#[test]
fn test_run_power_and_declaration() {
    let dir = TempDir::new().unwrap();
    let power = compile_fixture(&dir, "power.hd");
    let declaration = compile_fixture(&dir, "declaration.hd");
    hadronc(&dir)
        .arg(&power)
        .arg(&declaration)
        .assert()
        .success()
        .stdout("512\n19\n");
}

#[test]
fn test_disassemble_compiled_unit() {
    let dir = TempDir::new().unwrap();
    let compiled = compile_fixture(&dir, "answer.hd");
    hadronc(&dir)
        .arg("--disassemble")
        .arg(&compiled)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("=== answer ===\n"))
        .stdout(predicate::str::contains("MOVE #0 42"));
}

#[test]
fn test_lex_error_exits_one() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .arg("-o")
        .arg(dir.path())
        .arg(fixtures_dir().join("unterminated.hd"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "error[E0102]: unterminated string literal at 1:1",
        ));
    assert!(!dir.path().join("unterminated.hbc").exists());
}

#[test]
fn test_strict_mode_stops_at_first_failure() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .arg("-o")
        .arg(dir.path())
        .arg(fixtures_dir().join("unterminated.hd"))
        .arg(fixtures_dir().join("answer.hd"))
        .assert()
        .code(1);
    assert!(!dir.path().join("answer.hbc").exists());
}

#[test]
fn test_keep_going_processes_later_units() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .arg("--keep-going")
        .arg("-o")
        .arg(dir.path())
        .arg(fixtures_dir().join("unterminated.hd"))
        .arg(fixtures_dir().join("answer.hd"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("=== answer ==="));
    assert!(dir.path().join("answer.hbc").exists());
}

#[test]
fn test_repl() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .write_stdin("1 + 2\n- -3\n")
        .assert()
        .success()
        .stdout("> 3\n> 3\n> \n");
}

#[test]
fn test_repl_error_exits_one() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .write_stdin("1 ..\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[E0201]"));
}

#[test]
fn test_string_statement_underflows() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .write_stdin("\"abc\"\n")
        .assert()
        .code(1)
        .stdout("> ")
        .stderr(predicate::str::contains(
            "error[E0401]: stack underflow in RET\n  = note: at offset 0x0000",
        ));
}

#[test]
fn test_empty_function_body_underflows() {
    let dir = TempDir::new().unwrap();
    let compiled = compile_fixture(&dir, "empty_body.hd");
    hadronc(&dir)
        .arg(&compiled)
        .assert()
        .code(1)
        .stdout("")
        .stderr(
            predicate::str::contains("error[E0401]: stack underflow in RET")
                .and(predicate::str::contains("at offset 0x0002"))
                .and(predicate::str::contains("empty_body.hbc")),
        );
}

#[test]
fn test_runaway_nesting_is_a_diagnostic() {
    let dir = TempDir::new().unwrap();
    let source = format!("{}1{}\n", "(".repeat(100_000), ")".repeat(100_000));
    hadronc(&dir)
        .write_stdin(source)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[E0208]: expression nested too deeply"));
}

#[test]
fn test_lang_dumps_tokens() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .arg("-l")
        .arg("-o")
        .arg(dir.path())
        .arg(fixtures_dir().join("answer.hd"))
        .assert()
        .success()
        .stdout(predicate::str::contains("decimal number 42"))
        .stdout(predicate::str::contains("=== answer ==="));
}

#[test]
fn test_deprecated_interpret_runs_source() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .arg("-i")
        .arg("--no-color")
        .arg(fixtures_dir().join("power.hd"))
        .assert()
        .success()
        .stdout("512\n")
        .stderr(predicate::str::contains(
            "warning: --interpret is deprecated: compile to .hbc and run that instead",
        ));
}

#[test]
fn test_config_limits_apply() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("tight.toml");
    std::fs::write(&config, "[limits]\nchunk_capacity = 12\n").unwrap();
    hadronc(&dir)
        .arg("--config")
        .arg(&config)
        .arg("-o")
        .arg(dir.path())
        .arg(fixtures_dir().join("arithmetic.hd"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[E0301]: chunk capacity exceeded"));
}

#[test]
fn test_config_in_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("hadron.toml"), "[limits]\nstack_capacity = 1\n").unwrap();
    hadronc(&dir)
        .write_stdin("1 + 2\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[E0402]: stack overflow"));
}

#[test]
fn test_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("zero.toml");
    std::fs::write(&config, "[limits]\narena_bytes = 0\n").unwrap();
    hadronc(&dir)
        .env("HADRON_CONFIG", &config)
        .write_stdin("1\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("limit 'arena_bytes' must be greater than zero"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    hadronc(&dir)
        .arg("missing.hd")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[E0501]: cannot read 'missing.hd'"));
}
