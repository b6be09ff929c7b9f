//! The secrets-injection tool
//!
//! oprun doesn't resolve secrets itself. It hands the target to a tool that
//! does, by default 1Password's CLI:
//!
//!   op run --env-file=.env.op -- <program> <args...>
//!
//! The tool resolves the references, exports them to the child it spawns,
//! and exits with the child's exit code.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::process::Invocation;
use crate::target::TargetSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// Injection tool executable
    #[serde(default = "default_program")]
    pub program: PathBuf,
    /// Arguments before the env-file flag (the `run` in `op run`)
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Flag that takes the reference file, passed as `<flag>=<path>`
    #[serde(default = "default_env_file_flag")]
    pub env_file_flag: String,
}

fn default_program() -> PathBuf {
    PathBuf::from("op")
}

fn default_args() -> Vec<String> {
    vec!["run".to_string()]
}

fn default_env_file_flag() -> String {
    "--env-file".to_string()
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            env_file_flag: default_env_file_flag(),
        }
    }
}

impl InjectorConfig {
    /// Wrap a target so it runs under the injection tool
    pub fn wrap(&self, reference: &Path, target: &TargetSpec, forwarded: &[OsString]) -> Invocation {
        let mut env_file = OsString::from(&self.env_file_flag);
        env_file.push("=");
        env_file.push(reference.as_os_str());

        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.push(env_file);
        args.push(OsString::from("--"));
        args.push(OsString::from(&target.program));
        args.extend(target.args.iter().map(OsString::from));
        args.extend(forwarded.iter().cloned());

        Invocation::new(&self.program, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_op_run() {
        let injector = InjectorConfig::default();
        let target = TargetSpec::new("python3", &["run_lambda_handler.py"]);
        let forwarded = vec![OsString::from("--verbose"), OsString::from("event.json")];

        let invocation = injector.wrap(Path::new(".env.op"), &target, &forwarded);

        assert_eq!(invocation.program, OsString::from("op"));
        assert_eq!(
            invocation.args,
            vec![
                "run",
                "--env-file=.env.op",
                "--",
                "python3",
                "run_lambda_handler.py",
                "--verbose",
                "event.json",
            ]
            .into_iter()
            .map(OsString::from)
            .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_wrap_custom_tool() {
        let injector = InjectorConfig {
            program: PathBuf::from("secrets-run"),
            args: vec![],
            env_file_flag: "--refs".to_string(),
        };
        let target = TargetSpec::new("pytest", &[]);

        let invocation = injector.wrap(Path::new("config/dev.env.op"), &target, &[]);

        assert_eq!(invocation.program, OsString::from("secrets-run"));
        assert_eq!(
            invocation.args,
            vec![
                OsString::from("--refs=config/dev.env.op"),
                OsString::from("--"),
                OsString::from("pytest"),
            ]
        );
    }

    #[test]
    fn test_wrap_keeps_raw_program_path() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"/opt/t\xf6ols/op".to_vec());
        let injector = InjectorConfig {
            program: PathBuf::from(raw.clone()),
            ..InjectorConfig::default()
        };

        let invocation = injector.wrap(Path::new(".env.op"), &TargetSpec::new("pytest", &[]), &[]);
        assert_eq!(invocation.program, raw);
    }
}
