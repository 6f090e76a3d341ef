use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `$XDG_CONFIG_HOME/twdeck/config.toml` (or the platform equivalent)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("twdeck").join("config.toml"))
}

/// Load the config. An explicitly requested file must exist; a missing
/// default file just means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(Config::default()),
        },
    };

    if !required && !path.exists() {
        return Ok(Config::default());
    }

    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    parse_config(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r##"log_file = "/tmp/twdeck.log"

[task]
command = "/usr/local/bin/task"
args = ["rc.context=none"]

[ui]
show_key_hints = false

[ui.colors]
highlight = "#FF0000"
"##
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(sample_config()).unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/twdeck.log")));
        assert_eq!(config.task.command, "/usr/local/bin/task");
        assert_eq!(config.task.args, vec!["rc.context=none"]);
        assert!(!config.ui.show_key_hints);
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#FF0000");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.task.command, "task");
        assert!(config.task.args.is_empty());
        assert!(config.ui.show_key_hints);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, sample_config()).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.task.command, "/usr/local/bin/task");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn malformed_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[task\ncommand = ").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
