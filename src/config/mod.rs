//! Configuration structures and loading logic.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::LayoutOptions;

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub text: TextConfig,
    pub font: FontConfig,
    pub pipeline: PipelineConfig,
}

/// Defaults applied to newly formatted text blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub pixel_scale: f32,
    pub centered: bool,
    /// Straight (non-premultiplied) RGBA.
    pub color: [f32; 4],
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            pixel_scale: 1.0,
            centered: false,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl TextConfig {
    /// Layout options seeded from this section.
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            centered: self.centered,
            pixel_scale: self.pixel_scale,
            color: self.color,
        }
    }
}

/// Font loading configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Advance in em used for characters the font does not cover.
    /// When unset, the font's space advance (or half an em) is used.
    pub fallback_advance: Option<f32>,
}

/// Depth comparison used when the pipeline has a depth attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthCompare {
    #[default]
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Always,
}

impl DepthCompare {
    pub fn to_wgpu(self) -> wgpu::CompareFunction {
        match self {
            Self::Less => wgpu::CompareFunction::Less,
            Self::LessEqual => wgpu::CompareFunction::LessEqual,
            Self::Greater => wgpu::CompareFunction::Greater,
            Self::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
            Self::Always => wgpu::CompareFunction::Always,
        }
    }
}

/// Render pipeline state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub depth_compare: DepthCompare,
    /// Text is blended, so depth writes are off unless asked for.
    pub depth_write: bool,
}

impl Config {
    /// Parses a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Loads config from `path`, preserving the distinction between an
    /// unreadable file and a parse error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("config: loaded from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
