// Preview settings and document loading for the host stand-in binary
use crate::application::localization::DEFAULT_LANGUAGE;
use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct PreviewConfig {
    pub preview: PreviewSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreviewSettings {
    /// Card configuration document (JSON)
    pub card: String,
    /// Entity state snapshot (JSON list or map)
    pub states: String,
    #[serde(default)]
    pub devices: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    /// Brand template to apply before rendering
    #[serde(default)]
    pub brand: Option<String>,
    /// Directory of extra brand templates replacing the built-in ones
    #[serde(default)]
    pub brand_dir: Option<String>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// `config/preview.*` overlaid with `CHARGER_CARD__PREVIEW__*` variables.
pub fn load_preview_config() -> anyhow::Result<PreviewConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/preview"))
        .add_source(config::Environment::with_prefix("CHARGER_CARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn read_json(path: &str) -> anyhow::Result<Value> {
    let text = read_text(path)?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path))
}

pub fn read_text(path: &str) -> anyhow::Result<String> {
    fs::read_to_string(Path::new(path)).with_context(|| format!("Failed to read {}", path))
}
