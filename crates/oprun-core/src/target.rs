//! Targets - the commands the wrappers exist to run

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Run the Lambda handler locally
    Lambda,
    /// Run the test suite
    Tests,
    /// Run the local HTTP API
    Api,
}

impl TargetKind {
    pub const ALL: [TargetKind; 3] = [TargetKind::Lambda, TargetKind::Tests, TargetKind::Api];

    /// Get the name of the target
    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::Lambda => "lambda",
            TargetKind::Tests => "tests",
            TargetKind::Api => "api",
        }
    }

    /// Create from name string
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "lambda" | "handler" => Some(TargetKind::Lambda),
            "tests" | "test" | "pytest" => Some(TargetKind::Tests),
            "api" | "server" => Some(TargetKind::Api),
            _ => None,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|t| t.name()).collect();
            format!("unknown target '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

/// A command line: program plus the arguments that always precede
/// whatever the caller forwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl TargetSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// The target table, one entry per [`TargetKind`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default = "default_lambda")]
    pub lambda: TargetSpec,
    #[serde(default = "default_tests")]
    pub tests: TargetSpec,
    #[serde(default = "default_api")]
    pub api: TargetSpec,
}

fn default_lambda() -> TargetSpec {
    TargetSpec::new("python3", &["run_lambda_handler.py"])
}

fn default_tests() -> TargetSpec {
    TargetSpec::new("pytest", &[])
}

fn default_api() -> TargetSpec {
    TargetSpec::new("python3", &["run_api.py"])
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
            tests: default_tests(),
            api: default_api(),
        }
    }
}

impl Targets {
    pub fn get(&self, kind: TargetKind) -> &TargetSpec {
        match kind {
            TargetKind::Lambda => &self.lambda,
            TargetKind::Tests => &self.tests,
            TargetKind::Api => &self.api,
        }
    }
}
