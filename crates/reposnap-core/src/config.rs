use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ReposnapError;
use crate::models::policy::{BareSecondaryPolicy, SecondaryNaming};

/// Top-level reposnap configuration, stored at `~/.reposnap/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReposnapConfig {
    /// Directory scanned by `backup` when `--dir` is not given.
    #[serde(default = "default_scan_dir")]
    pub default_scan_dir: PathBuf,

    /// Snapshot file used when `--config` is not given.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Version-control executable to invoke.
    #[serde(default = "default_git_program")]
    pub git_program: String,

    /// Maximum concurrent clones during restore. 1 restores sequentially.
    #[serde(default = "default_concurrency")]
    pub restore_concurrency: usize,

    #[serde(default)]
    pub bare_secondary: BareSecondaryPolicy,

    #[serde(default)]
    pub secondary_naming: SecondaryNaming,

    /// Skip secondary remotes whose URL was already attached.
    #[serde(default)]
    pub skip_duplicate_secondaries: bool,
}

fn default_scan_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("repos_config.json")
}

fn default_git_program() -> String {
    "git".to_string()
}

fn default_concurrency() -> usize {
    1
}

impl Default for ReposnapConfig {
    fn default() -> Self {
        Self {
            default_scan_dir: default_scan_dir(),
            snapshot_path: default_snapshot_path(),
            git_program: default_git_program(),
            restore_concurrency: default_concurrency(),
            bare_secondary: BareSecondaryPolicy::default(),
            secondary_naming: SecondaryNaming::default(),
            skip_duplicate_secondaries: false,
        }
    }
}

impl ReposnapConfig {
    /// Returns the reposnap home directory (`~/.reposnap/`).
    pub fn home_dir() -> Result<PathBuf, ReposnapError> {
        let base = dirs::home_dir().ok_or_else(|| ReposnapError::Config {
            message: "could not determine home directory".into(),
        })?;
        Ok(base.join(".reposnap"))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Result<PathBuf, ReposnapError> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load config from the default location, or return defaults if not found.
    pub fn load() -> Result<Self, ReposnapError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ReposnapError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ReposnapError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ReposnapError> {
        if self.restore_concurrency == 0 {
            return Err(ReposnapError::Config {
                message: "restore_concurrency must be at least 1".into(),
            });
        }
        if self.git_program.trim().is_empty() {
            return Err(ReposnapError::Config {
                message: "git_program must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<(), ReposnapError> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ReposnapError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReposnapError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Initialize the reposnap home directory with default config.
    pub fn init() -> Result<PathBuf, ReposnapError> {
        let home = Self::home_dir()?;
        std::fs::create_dir_all(&home)?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            Self::default().save_to(&config_path)?;
        }

        Ok(home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let config = ReposnapConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: ReposnapConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(config.snapshot_path, deserialized.snapshot_path);
        assert_eq!(config.bare_secondary, deserialized.bare_secondary);
        assert_eq!(config.secondary_naming, deserialized.secondary_naming);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ReposnapConfig = toml::from_str("secondary_naming = \"numbered\"\n").unwrap();
        assert_eq!(config.secondary_naming, SecondaryNaming::Numbered);
        assert_eq!(config.bare_secondary, BareSecondaryPolicy::Halt);
        assert_eq!(config.snapshot_path, PathBuf::from("repos_config.json"));
        assert_eq!(config.git_program, "git");
        assert_eq!(config.restore_concurrency, 1);
    }

    #[test]
    fn test_load_from_rejects_zero_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "restore_concurrency = 0\n").unwrap();
        let err = ReposnapConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ReposnapError::Config { .. }));
    }

    #[test]
    fn test_save_to_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = ReposnapConfig::default();
        config.bare_secondary = BareSecondaryPolicy::Continue;
        config.save_to(&path).unwrap();

        let loaded = ReposnapConfig::load_from(&path).unwrap();
        assert_eq!(loaded.bare_secondary, BareSecondaryPolicy::Continue);
    }
}
