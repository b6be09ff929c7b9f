//! run-lambda - Run the Lambda handler locally with secrets injected
//!
//! Runs `python3 run_lambda_handler.py [ARGS...]`, under
//! `op run --env-file=.env.op --` when the reference file exists.

use oprun_core::{wrapper, TargetKind};

fn main() {
    wrapper::main_for(TargetKind::Lambda)
}
