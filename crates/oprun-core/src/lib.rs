//! oprun Core - Shared dispatch logic for the oprun wrappers
//!
//! "Secrets when you have them. A warning when you don't."
//!
//! Every wrapper does the same thing: look for a reference file in the
//! working directory, and either hand the target command to the injection
//! tool (`op run --env-file=.env.op -- ...`) or run it directly. The exit
//! code of whatever ran is the exit code of the wrapper.

pub mod config;
pub mod dispatch;
pub mod injector;
pub mod logging;
pub mod paths;
pub mod process;
pub mod reference;
pub mod target;
pub mod wrapper;

pub use config::{Config, ConfigError, ConfigSource, LoadedConfig};
pub use dispatch::{DispatchError, Dispatcher, Mode, Plan};
pub use injector::InjectorConfig;
pub use paths::Paths;
pub use process::Invocation;
pub use reference::{Presence, ReferenceFile};
pub use target::{TargetKind, TargetSpec, Targets};
