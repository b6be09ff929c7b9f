//! Entry point shared by the wrapper binaries

use std::ffi::OsString;

use crate::config::Config;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::logging;
use crate::paths::Paths;
use crate::target::TargetKind;

/// Run a wrapper binary for `target`, forwarding every argument after argv[0].
/// Never returns.
pub fn main_for(target: TargetKind) -> ! {
    logging::init();

    let forwarded: Vec<OsString> = std::env::args_os().skip(1).collect();
    let code = run(target, forwarded);

    std::process::exit(code);
}

/// Dispatch `target` from the current directory and return the exit code
/// the wrapper should exit with. Wrapper errors are reported on stderr.
pub fn run(target: TargetKind, forwarded: Vec<OsString>) -> i32 {
    match dispatch(target, forwarded) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
    }
}

fn dispatch(target: TargetKind, forwarded: Vec<OsString>) -> Result<i32, DispatchError> {
    let paths = Paths::new();
    let loaded = Config::load(&paths)?;
    let dispatcher = Dispatcher::new(loaded.config, paths);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(DispatchError::Runtime)?;

    runtime.block_on(dispatcher.run(target, forwarded))
}
