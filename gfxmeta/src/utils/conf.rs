use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    magic::{DEFAULT_SUBCOMPILER_LIBRARY, ENV_SUBCOMPILER_PATH, SUBCOMPILER_CONFIG_FILE},
    utils::error::{MetaError, MetaResult},
};

/// Where the sub-compiler library lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Path (or bare file name, resolved by the platform loader) of the library.
    pub library_path: PathBuf,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            library_path: DEFAULT_SUBCOMPILER_LIBRARY.into(),
        }
    }
}

impl LoaderConfig {
    /// Resolve the configuration from the environment.
    ///
    /// [`ENV_SUBCOMPILER_PATH`] wins when set. Otherwise the configuration
    /// file at [`LoaderConfig::default_path`] is read if it exists, and the
    /// platform default library name is used as a last resort. A configuration
    /// file that cannot be parsed is logged and ignored.
    pub fn resolve() -> Self {
        if let Ok(path) = std::env::var(ENV_SUBCOMPILER_PATH) {
            debug!("sub-compiler path taken from {ENV_SUBCOMPILER_PATH}: {path}");
            return Self {
                library_path: path.into(),
            };
        }

        let config_path = Self::default_path();
        if config_path.is_file() {
            match Self::load_from_toml(&config_path) {
                Ok(config) => return config,
                Err(e) => debug!("ignoring loader configuration: {e}"),
            }
        }

        Self::default()
    }

    /// Get the default path to the loader configuration file.
    pub fn default_path() -> PathBuf {
        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            } else {
                // Fallback to current directory if HOME is not set
            }
        }

        path.push("gfxmeta");
        path.push(SUBCOMPILER_CONFIG_FILE);
        path
    }

    pub fn from_toml_str(toml_str: &str, file: &str) -> MetaResult<Self> {
        toml::from_str(toml_str).map_err(|e| MetaError::ConfigParseError {
            source: e,
            file: file.to_string(),
        })
    }

    /// Load a `LoaderConfig` from a TOML file.
    pub fn load_from_toml(path: &Path) -> MetaResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_library_path() {
        let config =
            LoaderConfig::from_toml_str(r#"library_path = "/opt/cmc/libcmc.so""#, "inline")
                .unwrap();
        assert_eq!(config.library_path, PathBuf::from("/opt/cmc/libcmc.so"));
    }

    #[test]
    fn reports_file_on_parse_failure() {
        let err = LoaderConfig::from_toml_str("library_path = 3", "broken.toml").unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn default_path_ends_with_config_file() {
        assert!(LoaderConfig::default_path().ends_with("gfxmeta/subcompiler.toml"));
    }
}
