//! Config path resolution helpers.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "GITGET_CONFIG";

const CONFIG_FILE: &str = "gitget.toml";

/// Config file inside a global config directory.
pub fn config_path_in(global_dir: &Path) -> PathBuf {
    global_dir.join(CONFIG_FILE)
}

/// Default config file location: `$GITGET_CONFIG`, else the platform config dir.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| config_path_in(&dir.join("gitget")))
}
