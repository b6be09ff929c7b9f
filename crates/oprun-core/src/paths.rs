//! Standard paths used by oprun

use std::path::{Path, PathBuf};

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG: &str = "oprun.yaml";

/// Standard oprun paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Working directory the wrapper was started in
    pub workdir: PathBuf,
    /// Config directory (~/.config/oprun)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let workdir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("oprun");

        Self { workdir, config }
    }

    /// Paths rooted at an explicit working and config directory
    pub fn at(workdir: &Path, config: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            config: config.to_path_buf(),
        }
    }

    /// Project config (./oprun.yaml)
    pub fn project_config(&self) -> PathBuf {
        self.workdir.join(PROJECT_CONFIG)
    }

    /// Global config (~/.config/oprun/config.yaml)
    pub fn global_config(&self) -> PathBuf {
        self.config.join("config.yaml")
    }

    /// Resolve a possibly-relative path against the working directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_locations() {
        let paths = Paths::at(Path::new("/work/project"), Path::new("/home/me/.config/oprun"));
        assert_eq!(paths.project_config(), PathBuf::from("/work/project/oprun.yaml"));
        assert_eq!(
            paths.global_config(),
            PathBuf::from("/home/me/.config/oprun/config.yaml")
        );
    }

    #[test]
    fn test_resolve() {
        let paths = Paths::at(Path::new("/work/project"), Path::new("/cfg"));
        assert_eq!(paths.resolve(Path::new(".env.op")), PathBuf::from("/work/project/.env.op"));
        assert_eq!(paths.resolve(Path::new("/etc/app.env")), PathBuf::from("/etc/app.env"));
    }
}
