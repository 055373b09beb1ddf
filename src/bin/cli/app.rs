use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use leetstack_lib::config::AppConfig;
use leetstack_lib::review::{JsonSnapshotStore, ReviewService, SystemClock};

/// Configuration loaded once at startup and shared by every command
pub struct App {
    pub config: AppConfig,
}

impl App {
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = AppConfig::load_or_default(config_path)
            .context("Failed to load configuration")?;
        if data_dir.is_some() {
            config.data_dir = data_dir;
        }
        Ok(Self { config })
    }

    /// Review service over the on-disk card store
    pub fn review_service(&self) -> Result<ReviewService<JsonSnapshotStore, SystemClock>> {
        let scheduler = self
            .config
            .scheduler
            .build()
            .context("Invalid scheduler configuration")?;
        let data_dir = self
            .config
            .resolved_data_dir()
            .context("Failed to get data directory")?;
        let store = JsonSnapshotStore::open(data_dir.clone())
            .with_context(|| format!("Failed to open card store in {}", data_dir.display()))?;
        Ok(ReviewService::new(scheduler, store, SystemClock))
    }
}

/// Read a file, or stdin for "-"
pub fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))
    }
}
