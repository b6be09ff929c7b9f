use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// Stands in for the interpreter: records the script and its arguments
const PYTHON_STUB: &str = r#"
printf '%s\n' "$@" > python-args.txt
exit "${PYTHON_EXIT:-0}"
"#;

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let python = dir.path().join("python.sh");
    fs::write(&python, PYTHON_STUB).unwrap();
    fs::write(
        dir.path().join("oprun.yaml"),
        format!(
            "injector:\n  program: sh\n  args: ['-c', 'exit 7']\ntargets:\n  lambda:\n    program: sh\n    args: ['{}', run_lambda_handler.py]\n",
            python.display()
        ),
    )
    .unwrap();
    dir
}

fn run_lambda(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("run-lambda").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("OPRUN_CONFIG")
        .env_remove("OPRUN_REFERENCE_FILE")
        .env_remove("OPRUN_INJECTOR")
        .env_remove("PYTHON_EXIT");
    cmd
}

#[test]
fn runs_handler_script_with_forwarded_args() {
    let dir = project();

    run_lambda(&dir)
        .args(["--event", "fixtures/s3_put.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: .env.op not found"));

    let args = fs::read_to_string(dir.path().join("python-args.txt")).unwrap();
    assert_eq!(args, "run_lambda_handler.py\n--event\nfixtures/s3_put.json\n");
}

#[test]
fn handler_failure_is_exit_code() {
    let dir = project();

    run_lambda(&dir).env("PYTHON_EXIT", "1").assert().code(1);
}

#[test]
fn injector_exit_code_wins_when_reference_present() {
    let dir = project();
    fs::write(dir.path().join(".env.op"), "OPENAI_API_KEY=op://dev/openai/key\n").unwrap();

    // The injector stub exits 7 without running the handler
    run_lambda(&dir)
        .assert()
        .code(7)
        .stderr(predicate::str::contains("warning").not());

    assert!(!dir.path().join("python-args.txt").exists());
}
