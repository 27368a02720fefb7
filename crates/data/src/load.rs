use crate::schema::FarkleConfig;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub fn load_config(path: &Path) -> anyhow::Result<FarkleConfig> {
    let config: FarkleConfig = load_json(path)?;
    validate_config(&config).with_context(|| format!("validate {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(raw: &str) -> anyhow::Result<FarkleConfig> {
    let config: FarkleConfig = serde_json::from_str(raw).context("parse config")?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &FarkleConfig) -> anyhow::Result<()> {
    config.game.validate().context("game section")?;
    config.search.validate().context("search section")?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
