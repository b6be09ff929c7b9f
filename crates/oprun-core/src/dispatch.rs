//! Dispatch - decide how a target runs, then run it
//!
//! The whole decision is one file check:
//! - reference file present: run the target under the injection tool
//! - reference file absent: warn, then run the target directly
//!
//! Either way exactly one process is spawned and its exit code is returned.

use serde::Serialize;
use std::ffi::OsString;
use std::io;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, ConfigError};
use crate::paths::Paths;
use crate::process::{spawn_exit_code, Invocation};
use crate::reference::ReferenceFile;
use crate::target::TargetKind;

/// Errors raised by the wrapper itself. Failures of the child are not
/// errors - they come back as its exit code.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("`{program}` not found - is it installed and on PATH?")]
    NotFound { program: String },

    #[error("`{program}` is not executable")]
    NotExecutable { program: String },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl DispatchError {
    pub(crate) fn spawn(program: &str, source: io::Error) -> Self {
        let program = program.to_string();
        // exec(2) refuses files without a shebang or a known binary format
        if source.raw_os_error() == Some(libc::ENOEXEC) {
            return Self::NotExecutable { program };
        }
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { program },
            io::ErrorKind::PermissionDenied => Self::NotExecutable { program },
            _ => Self::Spawn { program, source },
        }
    }

    /// Exit code the wrapper should terminate with
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => spawn_exit_code(io::ErrorKind::NotFound),
            Self::NotExecutable { .. } => spawn_exit_code(io::ErrorKind::PermissionDenied),
            _ => 1,
        }
    }
}

/// How the target will be run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Under the injection tool, with secrets in the environment
    Injected,
    /// Directly, with the inherited environment only
    Direct,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Injected => "injected",
            Self::Direct => "direct",
        }
    }
}

/// Everything decided before anything is spawned
#[derive(Debug, Clone)]
pub struct Plan {
    pub target: TargetKind,
    pub mode: Mode,
    pub reference: ReferenceFile,
    pub invocation: Invocation,
}

pub struct Dispatcher {
    config: Config,
    paths: Paths,
}

impl Dispatcher {
    pub fn new(config: Config, paths: Paths) -> Self {
        Self { config, paths }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check the reference file and resolve the command line
    pub fn plan(&self, target: TargetKind, forwarded: Vec<OsString>) -> Plan {
        let reference = ReferenceFile::check(&self.paths, &self.config.reference_file);
        let spec = self.config.targets.get(target);

        let (mode, invocation) = if reference.is_present() {
            let invocation = self.config.injector.wrap(&reference.path, spec, &forwarded);
            (Mode::Injected, invocation)
        } else {
            let mut args: Vec<OsString> = spec.args.iter().map(OsString::from).collect();
            args.extend(forwarded);
            (Mode::Direct, Invocation::new(&spec.program, args))
        };

        debug!(
            name = target.name(),
            reference = %reference.resolved.display(),
            mode = mode.as_str(),
            "planned dispatch"
        );

        Plan {
            target,
            mode,
            reference,
            invocation,
        }
    }

    /// Run a target, returning the exit code of whatever was executed
    pub async fn run(&self, target: TargetKind, forwarded: Vec<OsString>) -> Result<i32, DispatchError> {
        let plan = self.plan(target, forwarded);

        if plan.mode == Mode::Direct {
            eprintln!("{}", plan.reference.missing_warning());
        }

        let code = plan.invocation.execute().await?;
        info!(name = target.name(), code, "finished");
        Ok(code)
    }
}
