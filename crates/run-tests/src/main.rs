//! run-tests - Run the test suite with secrets injected
//!
//! With a `.env.op` in the working directory:
//!     op run --env-file=.env.op -- pytest [ARGS...]
//! Without one, a warning and then:
//!     pytest [ARGS...]
//!
//! No flags of its own. Every argument, `--help` and `--` included, goes
//! to pytest unchanged. The exit code is pytest's (or op's, if op fails).

use oprun_core::{wrapper, TargetKind};

fn main() {
    wrapper::main_for(TargetKind::Tests)
}
