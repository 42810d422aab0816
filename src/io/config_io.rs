use std::fs;
use std::path::Path;

use chrono::Utc;

use crate::io::recovery::{RecoveryEntry, log_recovery};
use crate::model::config::Config;

const CONFIG_FILE: &str = "config.toml";

/// Load config.toml from the data directory. A missing file yields the
/// defaults; a malformed one fails closed to the defaults, preserves the text
/// in the recovery log, and returns a warning for the status row.
pub fn load_config(dir: &Path) -> (Config, Option<String>) {
    let path = dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => return (Config::default(), None),
    };

    match toml::from_str::<Config>(&text) {
        Ok(config) => (config, None),
        Err(_) => {
            log_recovery(
                dir,
                RecoveryEntry {
                    timestamp: Utc::now(),
                    description: "config.toml could not be parsed".into(),
                    body: text,
                },
            );
            (
                Config::default(),
                Some("config.toml could not be parsed; using defaults".to_string()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::recovery_log_path;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults_silently() {
        let dir = TempDir::new().unwrap();
        let (config, warning) = load_config(dir.path());
        assert!(config.ui.show_key_hints);
        assert!(warning.is_none());
    }

    #[test]
    fn valid_file_parses() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[ui]\nshow_key_hints = false\n",
        )
        .unwrap();
        let (config, warning) = load_config(dir.path());
        assert!(!config.ui.show_key_hints);
        assert!(warning.is_none());
    }

    #[test]
    fn malformed_file_fails_closed_with_warning() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[ui\nbroken").unwrap();

        let (config, warning) = load_config(dir.path());
        assert!(config.ui.show_key_hints);
        assert!(warning.is_some());

        let log = fs::read_to_string(recovery_log_path(dir.path())).unwrap();
        assert!(log.contains("config.toml could not be parsed"));
    }
}
