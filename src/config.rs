//! Analysis settings loaded from TOML.
//!
//! Every field has a default, so a settings file only needs the keys it
//! changes. With no file at all, the embedded `default.config.toml` is used.

use std::sync::OnceLock;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use thiserror::Error;

use crate::model::types::{Element, ElementPair};

const DEFAULT_CONFIG_TOML: &str = include_str!("../resources/default.config.toml");

static DEFAULT_CONFIG: OnceLock<AnalysisConfig> = OnceLock::new();

/// Errors that can occur while loading analysis settings.
#[derive(Debug, Error)]
pub enum Error {
    /// The settings file is not valid TOML or has wrongly typed keys.
    #[error("failed to parse analysis settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is well-formed but out of range.
    #[error("invalid analysis setting '{key}': {detail}")]
    Invalid { key: &'static str, detail: String },
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub curve: CurveSettings,
    #[serde(default)]
    pub matrix: MatrixSettings,
}

/// Settings for the attention-by-distance curve.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurveSettings {
    #[serde(default = "default_pair", deserialize_with = "deserialize_pair")]
    pub pair: ElementPair,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_bins")]
    pub bins: usize,
}

fn default_pair() -> ElementPair {
    ElementPair::new(Element::H, Element::C)
}
fn default_window() -> usize {
    1000
}
fn default_bins() -> usize {
    70
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            pair: default_pair(),
            window: default_window(),
            bins: default_bins(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatrixSettings {
    #[serde(default)]
    pub normalize_attention: bool,
}

fn deserialize_pair<'de, D>(deserializer: D) -> Result<ElementPair, D::Error>
where
    D: Deserializer<'de>,
{
    let [a, b] = <[String; 2]>::deserialize(deserializer)?;
    let a: Element = a.parse().map_err(de::Error::custom)?;
    let b: Element = b.parse().map_err(de::Error::custom)?;
    Ok(ElementPair::new(a, b))
}

impl AnalysisConfig {
    /// Parses and validates settings from a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        let config: AnalysisConfig = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.curve.window == 0 {
            return Err(Error::Invalid {
                key: "curve.window",
                detail: "must be at least 1".to_string(),
            });
        }
        if self.curve.bins == 0 {
            return Err(Error::Invalid {
                key: "curve.bins",
                detail: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads settings from `custom_toml`, or the embedded defaults for `None`.
pub fn load_config(custom_toml: Option<&str>) -> Result<AnalysisConfig, Error> {
    match custom_toml {
        Some(toml) => AnalysisConfig::from_toml(toml),
        None => Ok(default_config().clone()),
    }
}

pub fn default_config() -> &'static AnalysisConfig {
    DEFAULT_CONFIG.get_or_init(|| {
        AnalysisConfig::from_toml(DEFAULT_CONFIG_TOML)
            .expect("Failed to parse embedded default settings. This is a library bug.")
    })
}
