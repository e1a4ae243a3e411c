//! `hadron.toml` loading.
//!
//! ```toml
//! keep_going = false
//! verbose = false
//!
//! [limits]
//! chunk_capacity = 1024
//! stack_capacity = 256
//! symbol_slots = 256
//! arena_bytes = 2048
//! max_depth = 256
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::io;
use std::path::{Path, PathBuf};

use dirs::config_dir;
use hadron_util::{Limits, LimitsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "hadron.toml";

/// Error loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly named file does not exist
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read
    #[error("cannot read configuration '{}': {source}", path.display())]
    Read {
        /// The file
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },

    /// The file is not valid TOML for [`Config`]
    #[error("failed to parse configuration '{}': {source}", path.display())]
    Parse {
        /// The file
        path: PathBuf,
        /// Parser failure
        source: toml::de::Error,
    },

    /// A limit is unusable
    #[error("invalid configuration: {0}")]
    Invalid(#[from] LimitsError),
}

/// Settings read from `hadron.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Resource ceilings for every unit.
    #[serde(default)]
    pub limits: Limits,

    /// Keep going after a failing unit.
    #[serde(default)]
    pub keep_going: bool,

    /// Debug-level logging.
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Load the configuration that applies to this run.
    ///
    /// `explicit` (from `--config`) must exist. Otherwise `./hadron.toml`
    /// and then `<config dir>/hadron/hadron.toml` are tried, and the
    /// defaults are used when neither exists. Returns the file that was
    /// used, if any.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file(),
        };
        match path {
            Some(path) => Ok((Self::load_from_path(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Load and validate one file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration text.
    ///
    /// # Examples
    ///
    /// ```
    /// use hadron_drv::config::Config;
    ///
    /// let config = Config::from_toml("keep_going = true\n[limits]\nstack_capacity = 32").unwrap();
    /// assert!(config.keep_going);
    /// assert_eq!(config.limits.stack_capacity, 32);
    /// assert_eq!(config.limits.chunk_capacity, 1024);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.limits.validate()?;
        Ok(config)
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_user_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("hadron").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config().or_else(Self::check_user_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.keep_going);
        assert!(!config.verbose);
        assert_eq!(config.limits, Limits::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "verbose = true\n[limits]\nsymbol_slots = 64\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert!(config.verbose);
        assert_eq!(config.limits.symbol_slots, 64);

        let (resolved, used) = Config::resolve(Some(&path)).unwrap();
        assert_eq!(resolved, config);
        assert_eq!(used, Some(path));
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let err = Config::from_toml("[limits]\nchunk_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(LimitsError::Zero { .. })));
    }

    #[test]
    fn test_oversized_limit_is_invalid() {
        let err = Config::from_toml("[limits]\nchunk_capacity = 1000000000").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(LimitsError::TooLarge {
                name: "chunk_capacity",
                ..
            })
        ));
        let deep = Config::from_toml("[limits]\nmax_depth = 64").unwrap();
        assert_eq!(deep.limits.max_depth, 64);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "limits = 3").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = Config::resolve(Some(Path::new("/nonexistent/path/hadron.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
