use std::{env, path::PathBuf, time::Duration};

use directories::{BaseDirs, ProjectDirs};
use lazy_static::lazy_static;
use serde::Deserialize;

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    pub user_agent: String,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub download_dir: PathBuf,
    pub notice_timeout_secs: u64,
    pub tick_rate_ms: u64,
    #[serde(default)]
    pub theme: ThemeName,
    /// Optional JSON key binding table replacing the defaults
    #[serde(default)]
    pub keybindings_file: Option<PathBuf>,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Embedded defaults, then the user file, then `DATADASH_*` variables
    ///
    /// An explicitly given path must exist; the default location is optional.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let (user_file, required) = match config_path {
            Some(p) => (expand_tilde(p), true),
            None => (get_config_dir().join("config.json5"), false),
        };

        let cfg = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5))
            .add_source(
                config::File::from(user_file)
                    .format(config::FileFormat::Json5)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(&PROJECT_NAME)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut cfg: Self = cfg.try_deserialize()?;
        cfg.download_dir = expand_tilde(&cfg.download_dir);
        Ok(cfg)
    }

    pub fn notice_timeout(&self) -> Duration {
        Duration::from_secs(self.notice_timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        // The embedded file is part of the binary; a parse failure is a build defect.
        json5::from_str(CONFIG).unwrap_or_else(|e| panic!("embedded config is invalid: {e}"))
    }
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let Some(s) = path.to_str() {
        if s.starts_with('~') {
            if let Some(base) = BaseDirs::new() {
                return PathBuf::from(s.replacen('~', base.home_dir().to_str().unwrap_or(""), 1));
            }
        }
    }
    path.clone()
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(dirs) = ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
        dirs.config_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

/// Directory for the log file
pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(dirs) = ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
        dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_embedded_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.base_url, "http://127.0.0.1:8080");
        assert_eq!(cfg.notice_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.theme, ThemeName::Dark);
        assert_eq!(cfg.keybindings_file, None);
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json5");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "{{ server: {{ base_url: 'http://analysis.local:9000' }}, notice_timeout_secs: 8, theme: 'light' }}"
        )
        .unwrap();
        drop(file);

        let cfg = Config::from_path(Some(&path)).unwrap();
        assert_eq!(cfg.server.base_url, "http://analysis.local:9000");
        // Untouched keys keep their defaults
        assert_eq!(cfg.server.user_agent, Config::default().server.user_agent);
        assert_eq!(cfg.notice_timeout_secs, 8);
        assert_eq!(cfg.theme, ThemeName::Light);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json5");
        assert!(Config::from_path(Some(&path)).is_err());
    }

    #[test]
    fn test_tick_rate_never_zero() {
        let mut cfg = Config::default();
        cfg.tick_rate_ms = 0;
        assert_eq!(cfg.tick_rate(), Duration::from_millis(1));
    }
}
