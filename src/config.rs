use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub ingest: IngestConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Watch directory scanned for new image files.
    pub consume_dir: PathBuf,
    /// Flat directory the archived files are copied into.
    pub archive_dir: PathBuf,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Optional wall-clock limit for one ingestion batch. When it elapses,
    /// remaining files are reported as cancelled rather than processed.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

fn default_workers() -> usize {
    3
}

fn default_include_globs() -> Vec<String> {
    vec![
        "**/*.jpg".to_string(),
        "**/*.jpeg".to_string(),
        "**/*.png".to_string(),
        "**/*.gif".to_string(),
        "**/*.webp".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.ingest.workers == 0 {
        anyhow::bail!("ingest.workers must be >= 1");
    }

    if config.ingest.consume_dir.as_os_str().is_empty() {
        anyhow::bail!("ingest.consume_dir must not be empty");
    }

    if config.ingest.archive_dir.as_os_str().is_empty() {
        anyhow::bail!("ingest.archive_dir must not be empty");
    }

    if let Some(secs) = config.ingest.timeout_secs {
        if secs == 0 {
            anyhow::bail!("ingest.timeout_secs must be >= 1 when set");
        }
    }

    if config.server.bind.is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}
