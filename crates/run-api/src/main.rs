//! run-api - Run the local HTTP API with secrets injected

use oprun_core::{wrapper, TargetKind};

fn main() {
    wrapper::main_for(TargetKind::Api)
}
