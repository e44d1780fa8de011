//! Default values for fetch and remote operations, loaded from `gitget.toml`.
//!
//! Example:
//!
//! ```toml
//! account = "InstituteforDiseaseModeling"
//! repository = "DtkTrunk"
//! reference = "master"
//! host = "github.com"
//! ```

mod paths;

pub use paths::{CONFIG_ENV, config_path_in, default_config_path};

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::git::DEFAULT_HOST;

pub const DEFAULT_ACCOUNT: &str = "InstituteforDiseaseModeling";
pub const DEFAULT_REPOSITORY: &str = "DtkTrunk";
pub const DEFAULT_REFERENCE: &str = "master";

/// Defaults applied when a command line flag is not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Account that owns the repository
    pub account: String,
    /// Repository name
    pub repository: String,
    /// Branch, tag, or commit hash
    pub reference: String,
    /// Hosting service domain
    pub host: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            account: DEFAULT_ACCOUNT.to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            reference: DEFAULT_REFERENCE.to_string(),
            host: DEFAULT_HOST.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::parse(&content).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Load from [`default_config_path`], or the defaults if there is none.
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|err| err.to_string())
    }
}
