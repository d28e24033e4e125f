//! Config file persistence (JSON)

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{ScanConfig, SqueezeConfig};

/// Default location looked up by the CLI when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "squeeze_scanner.json";

/// The on-disk shape: both blueprints, each optional field falling back to its default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub squeeze: SqueezeConfig,
    pub scan: ScanConfig,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&text)
            .with_context(|| format!("Malformed config file {}", path.display()))?;
        file.validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        Ok(file)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {}; using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.squeeze.validate()?;
        self.scan.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryPeriod;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{ "squeeze": { "trend_period": 50 }, "scan": { "period": "2y" } }"#;
        let file: ConfigFile = serde_json::from_str(json).expect("parse");
        assert_eq!(file.squeeze.trend_period, 50);
        assert_eq!(file.squeeze.bollinger.period, 20);
        assert_eq!(file.scan.period, HistoryPeriod::TwoYears);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let path = std::env::temp_dir().join(format!(
            "squeeze_scanner_cfg_{}.json",
            std::process::id()
        ));
        let mut file = ConfigFile::default();
        file.squeeze.forward_horizons = vec![3, 7];
        file.scan.workers = 3;
        file.save(&path).expect("save");

        let loaded = ConfigFile::load(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, file);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = Path::new("definitely/not/here.json");
        let file = ConfigFile::load_or_default(path).expect("defaults");
        assert_eq!(file, ConfigFile::default());
    }
}
