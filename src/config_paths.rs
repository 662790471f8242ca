//! Configuration locations for capl-outline
//!
//! - Unix/macOS: `$XDG_CONFIG_HOME/capl-outline/` or `~/.config/capl-outline/`
//! - Windows: `%APPDATA%\capl-outline\`

use std::{env, path::PathBuf};

const APP_DIR: &str = "capl-outline";

pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/capl-outline/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_is_yaml_under_app_dir() {
        if let Some(path) = config_file() {
            assert!(path.ends_with("capl-outline/config.yaml") || path.ends_with("capl-outline\\config.yaml"));
        }
    }
}
