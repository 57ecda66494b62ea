use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::FundoConfig;

pub const CONFIG_FILE: &str = "fundo.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse fundo.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Read `fundo.toml` from `dir`. A missing file yields the defaults.
pub fn read_config(dir: &Path) -> Result<FundoConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(FundoConfig::default());
        }
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{MAX_DEBOUNCE_MS, MAX_INTERVAL_SECS};
    use crate::parse::TagMode;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert!(config.autosave.enabled);
        assert_eq!(config.autosave.interval(), Duration::from_secs(60));
        assert_eq!(config.persist.debounce(), Duration::from_millis(500));
        assert_eq!(config.storage.data_dir, None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[autosave]\ninterval_secs = 15\n\n[storage]\ndata_dir = \"/tmp/fundo\"\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.autosave.interval(), Duration::from_secs(15));
        assert!(config.autosave.enabled);
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/fundo")));
        assert_eq!(config.export.default_filename, "fundo-backup.json");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[autosave\nenabled = ").unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn oversized_timers_are_clamped() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            format!(
                "[autosave]\ninterval_secs = {max}\n\n[persist]\ndebounce_ms = {max}\n",
                max = i64::MAX
            ),
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(
            config.autosave.interval(),
            Duration::from_secs(MAX_INTERVAL_SECS)
        );
        assert_eq!(
            config.persist.debounce(),
            Duration::from_millis(MAX_DEBOUNCE_MS)
        );
    }

    #[test]
    fn tag_mode_is_read() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[input]\ntag_mode = \"legacy-single\"\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.input.tag_mode, TagMode::LegacySingle);
        assert_eq!(FundoConfig::default().input.tag_mode, TagMode::Multi);
    }
}
