use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn runs_api_target_directly_without_reference() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("oprun.yaml"),
        "targets:\n  api:\n    program: sh\n    args: ['-c', 'echo \"serving on $0\"; exit 4']\n",
    )
    .unwrap();

    Command::cargo_bin("run-api")
        .unwrap()
        .current_dir(dir.path())
        .env_remove("OPRUN_CONFIG")
        .env_remove("OPRUN_REFERENCE_FILE")
        .arg("127.0.0.1:8000")
        .assert()
        .code(4)
        .stdout(predicate::str::contains("serving on 127.0.0.1:8000"))
        .stderr(predicate::str::contains("warning: .env.op not found"));
}
