//! Process-wide configuration, loaded once at startup from TOML.
//!
//! ```toml
//! data_dir = "/home/me/.local/share/leetstack"
//!
//! [scheduler]
//! variant = "stage"
//! steps_seconds = [86400, 259200, 604800]
//! easy_step = 1
//! medium_step = 1
//!
//! [chunker]
//! target_size = 500
//! overlap_blocks = 2
//! max_group_tokens = 3000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunker::{ChunkOptions, DEFAULT_OVERLAP_BLOCKS, DEFAULT_TARGET_SIZE};
use crate::scheduler::{ReviewScheduler, SchedulerConfig, SchedulerError, SchedulerVariant};

const APP_DIR: &str = "leetstack";
const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid scheduler config: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Could not determine the {0} directory")]
    NoPlatformDir(&'static str),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Scheduler policy plus its tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub variant: SchedulerVariant,
    #[serde(flatten)]
    pub config: SchedulerConfig,
}

impl SchedulerSettings {
    pub fn build(&self) -> std::result::Result<Box<dyn ReviewScheduler + Send + Sync>, SchedulerError> {
        self.variant.build(self.config.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerSettings {
    pub target_size: usize,
    pub overlap_blocks: usize,
    /// Token budget per group sent to the text-generation call
    pub max_group_tokens: usize,
}

impl Default for ChunkerSettings {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            overlap_blocks: DEFAULT_OVERLAP_BLOCKS,
            max_group_tokens: 3000,
        }
    }
}

impl ChunkerSettings {
    pub fn chunk_options(&self) -> ChunkOptions {
        ChunkOptions {
            target_size: self.target_size,
            overlap_blocks: self.overlap_blocks,
            anchor: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where card records live; defaults to the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub scheduler: SchedulerSettings,
    pub chunker: ChunkerSettings,
}

impl AppConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(source)?;
        config.scheduler.config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&source)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from `path`, or from the default location when `None`.
    /// A missing file means defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            Self::load(&path)
        } else {
            log::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// `<config dir>/leetstack/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoPlatformDir("config"))
    }

    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(ConfigError::NoPlatformDir("data")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_document_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.scheduler.variant, SchedulerVariant::Stage);
    }

    #[test]
    fn test_full_document() {
        let config = AppConfig::from_toml(
            r#"
            data_dir = "/tmp/leetstack"

            [scheduler]
            variant = "learning-steps"
            steps_seconds = [60, 600]
            easy_bonus = 1.5

            [chunker]
            target_size = 800
            max_group_tokens = 1200
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/leetstack")));
        assert_eq!(config.scheduler.variant, SchedulerVariant::LearningSteps);
        assert_eq!(config.scheduler.config.steps_seconds, vec![60, 600]);
        assert_eq!(config.scheduler.config.easy_bonus, 1.5);
        assert_eq!(config.scheduler.config.min_ease_factor, 1.3);
        assert_eq!(config.chunker.target_size, 800);
        assert_eq!(config.chunker.overlap_blocks, DEFAULT_OVERLAP_BLOCKS);
        assert_eq!(config.chunker.max_group_tokens, 1200);

        let scheduler = config.scheduler.build().unwrap();
        assert_eq!(scheduler.initial_interval_seconds(), 60);
    }

    #[test]
    fn test_invalid_steps_fail_at_load() {
        let err = AppConfig::from_toml("[scheduler]\nsteps_seconds = []").unwrap_err();
        assert!(matches!(err, ConfigError::Scheduler(SchedulerError::EmptySteps)));

        let err = AppConfig::from_toml("[scheduler]\nsteps_seconds = [20, 0]").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Scheduler(SchedulerError::NonPositiveStep { index: 1 })
        ));

        assert!(matches!(
            AppConfig::from_toml("[scheduler]\nsteps_seconds = [-5]").unwrap_err(),
            ConfigError::Toml(_)
        ));
    }

    #[test]
    fn test_unknown_variant() {
        assert!(AppConfig::from_toml("[scheduler]\nvariant = \"fsrs\"").is_err());
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(AppConfig::load_or_default(Some(&missing)).unwrap(), AppConfig::default());

        let path = dir.path().join("config.toml");
        fs::write(&path, "[chunker]\noverlap_blocks = 0\n").unwrap();
        let config = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.chunker.overlap_blocks, 0);
        assert_eq!(config.chunker.chunk_options().overlap_blocks, 0);
    }
}
