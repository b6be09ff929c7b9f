//! Process execution
//!
//! One child, inherited stdio, and the child's exit code passed through.
//! While the child runs, SIGTERM and SIGHUP sent to the wrapper are relayed
//! to it. SIGINT and SIGQUIT already reach the child through the terminal's
//! process group, so the wrapper only has to survive them.

use std::ffi::{OsStr, OsString};
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use tokio::process::Command;
use tokio::signal::unix::{signal, SignalKind};
use tracing::debug;

use crate::dispatch::DispatchError;

/// A fully resolved command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl AsRef<OsStr>, args: Vec<OsString>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args,
        }
    }

    /// Render as a shell-quoted command line (for display only)
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| shell_quote(part))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Spawn the command and wait for it, returning its exit code
    pub async fn execute(&self) -> Result<i32, DispatchError> {
        let program = self.program.to_string_lossy().into_owned();

        // Handlers go in before the spawn so the wrapper can't be killed in between
        let mut sigterm = signal(SignalKind::terminate()).map_err(DispatchError::Signals)?;
        let mut sighup = signal(SignalKind::hangup()).map_err(DispatchError::Signals)?;
        let mut sigint = signal(SignalKind::interrupt()).map_err(DispatchError::Signals)?;
        let mut sigquit = signal(SignalKind::quit()).map_err(DispatchError::Signals)?;

        debug!(command = %self.command_line(), "spawning");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|e| DispatchError::spawn(&program, e))?;

        let pid = child.id();

        loop {
            tokio::select! {
                status = child.wait() => {
                    let status = status.map_err(|source| DispatchError::Wait {
                        program: program.clone(),
                        source,
                    })?;
                    debug!(%status, "child exited");
                    return Ok(exit_code(status));
                }
                Some(()) = sigterm.recv() => relay(pid, libc::SIGTERM),
                Some(()) = sighup.recv() => relay(pid, libc::SIGHUP),
                Some(()) = sigint.recv() => debug!("interrupt received, waiting for child"),
                Some(()) = sigquit.recv() => debug!("quit received, waiting for child"),
            }
        }
    }
}

/// Exit code for a finished child, shell style: killed by signal N gives 128 + N
pub fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(sig)) => 128 + sig,
        (None, None) => 1,
    }
}

/// Map a spawn failure to the shell's conventions
pub(crate) fn spawn_exit_code(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::NotFound => 127,
        io::ErrorKind::PermissionDenied => 126,
        _ => 1,
    }
}

fn relay(pid: Option<u32>, sig: libc::c_int) {
    let Some(pid) = pid else {
        return;
    };
    debug!(pid, sig, "relaying signal to child");
    unsafe {
        libc::kill(pid as libc::pid_t, sig);
    }
}

fn shell_quote(part: &OsStr) -> String {
    let s = part.to_string_lossy();
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@%+,".contains(c));

    if plain {
        s.into_owned()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh", vec![OsString::from("-c"), OsString::from(script)])
    }

    #[test]
    fn test_command_line_quoting() {
        let invocation = Invocation::new(
            "op",
            vec![
                OsString::from("run"),
                OsString::from("--env-file=.env.op"),
                OsString::from("--"),
                OsString::from("pytest"),
                OsString::from("-k"),
                OsString::from("parser and not slow"),
                OsString::from("it's"),
                OsString::from(""),
            ],
        );

        assert_eq!(
            invocation.command_line(),
            "op run --env-file=.env.op -- pytest -k 'parser and not slow' 'it'\\''s' ''"
        );
    }

    #[tokio::test]
    async fn test_exit_code_passthrough() -> Result<(), DispatchError> {
        assert_eq!(sh("exit 0").execute().await?, 0);
        assert_eq!(sh("exit 2").execute().await?, 2);
        assert_eq!(sh("exit 42").execute().await?, 42);
        Ok(())
    }

    #[tokio::test]
    async fn test_killed_by_signal() -> Result<(), DispatchError> {
        assert_eq!(sh("kill -KILL $$").execute().await?, 128 + libc::SIGKILL);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_program() {
        let invocation = Invocation::new("oprun-test-no-such-program", vec![]);
        let err = invocation.execute().await.unwrap_err();
        assert!(matches!(err, DispatchError::NotFound { .. }));
        assert_eq!(err.exit_code(), 127);
    }

    #[test]
    fn test_spawn_exit_codes() {
        assert_eq!(spawn_exit_code(io::ErrorKind::NotFound), 127);
        assert_eq!(spawn_exit_code(io::ErrorKind::PermissionDenied), 126);
        assert_eq!(spawn_exit_code(io::ErrorKind::Other), 1);
    }
}
