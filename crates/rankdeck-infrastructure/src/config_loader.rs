//! TOML config file loading.

use std::fs;
use std::path::Path;

use rankdeck_core::config::RankdeckConfig;
use rankdeck_core::error::Result;

/// Loads a [`RankdeckConfig`] from a TOML file.
///
/// Missing keys fall back to their defaults; a missing or malformed file is
/// an error.
pub fn load_config(path: impl AsRef<Path>) -> Result<RankdeckConfig> {
    let raw = fs::read_to_string(path.as_ref())?;
    let config = toml::from_str(&raw)?;
    tracing::debug!(
        "[ConfigLoader] Loaded configuration from {}",
        path.as_ref().display()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rankdeck.toml");
        fs::write(&path, "deck_size = 6\nk_factor = 24.0\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.deck_size, 6);
        assert_eq!(config.k_factor, 24.0);
        // Unspecified keys keep their defaults.
        assert_eq!(config.aggregation_batch_size, 100);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, rankdeck_core::RankdeckError::Io { .. }));
    }

    #[test]
    fn test_malformed_toml_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "deck_size = \"many\"").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(
            err,
            rankdeck_core::RankdeckError::Serialization { .. }
        ));
    }
}
