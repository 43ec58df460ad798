//! Shared configuration for Digitpad
//!
//! This crate provides the single source of truth for the drawing surface
//! dimensions, brush defaults, per-source input offsets and the input contract
//! of the digit classifier. All other crates read their settings from
//! [`PipelineConfig`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default drawing surface width in pixels
pub const DEFAULT_SURFACE_WIDTH: u32 = 280;

/// Default drawing surface height in pixels
pub const DEFAULT_SURFACE_HEIGHT: u32 = 280;

/// Spatial size (width and height) of the classifier input
pub const DEFAULT_TARGET_SIZE: u32 = 32;

/// Default stroke width in pixels
pub const DEFAULT_LINE_WIDTH: f32 = 5.0;

/// Default ink color (white on a transparent surface)
pub const DEFAULT_INK_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Vertical letterbox between the page origin and the surface for touch input
pub const DEFAULT_TOUCH_OFFSET_Y: f32 = 150.0;

/// Number of digit classes produced by the model
pub const DEFAULT_NUM_CLASSES: usize = 10;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which RGBA channel of a snapshot is used as the model's intensity input.
///
/// The classifier was fed the blue channel during development, so that stays
/// the default. Picking another channel changes the numbers the model sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityChannel {
    Red,
    Green,
    #[default]
    Blue,
    Alpha,
}

impl IntensityChannel {
    /// Index of the channel inside an RGBA pixel
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Alpha => 3,
        }
    }

    /// Parse from a config/env string ("red", "green", "blue", "alpha")
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "red" | "r" | "0" => Some(Self::Red),
            "green" | "g" | "1" => Some(Self::Green),
            "blue" | "b" | "2" => Some(Self::Blue),
            "alpha" | "a" | "3" => Some(Self::Alpha),
            _ => None,
        }
    }
}

/// Resampling used when the surface is reduced to the model's input size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Nearest-neighbour sampling
    Nearest,
    /// Bilinear (triangle) filtering
    #[default]
    Bilinear,
}

impl ResampleFilter {
    /// Parse from a config/env string ("nearest", "bilinear")
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nearest" => Some(Self::Nearest),
            "bilinear" | "triangle" => Some(Self::Bilinear),
            _ => None,
        }
    }
}

/// Drawing surface dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

/// Brush defaults applied at pipeline construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Stroke width in pixels
    pub line_width: f32,
    /// Ink color as RGBA in 0.0-1.0
    pub color: [f32; 4],
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            color: DEFAULT_INK_COLOR,
        }
    }
}

/// Fixed offsets subtracted from raw device coordinates, per input source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOffsets {
    /// Offset for pointer (mouse/pen) events, which arrive surface-relative
    pub pointer: [f32; 2],
    /// Offset for touch events, which arrive in page coordinates
    pub touch: [f32; 2],
}

impl Default for InputOffsets {
    fn default() -> Self {
        Self {
            pointer: [0.0, 0.0],
            touch: [0.0, DEFAULT_TOUCH_OFFSET_Y],
        }
    }
}

/// Shape and encoding of the classifier input and output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInputConfig {
    /// Snapshot width fed to the model
    pub target_width: u32,
    /// Snapshot height fed to the model
    pub target_height: u32,
    /// Channel extracted as intensity
    pub channel: IntensityChannel,
    /// Resampling filter for the snapshot
    pub filter: ResampleFilter,
    /// Number of classes the model scores
    pub num_classes: usize,
    /// Whether predictions carry the full score distribution
    pub include_distribution: bool,
}

impl Default for ModelInputConfig {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_SIZE,
            target_height: DEFAULT_TARGET_SIZE,
            channel: IntensityChannel::default(),
            filter: ResampleFilter::default(),
            num_classes: DEFAULT_NUM_CLASSES,
            include_distribution: true,
        }
    }
}

/// Complete configuration for one drawing-to-prediction pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub surface: SurfaceConfig,
    pub brush: BrushConfig,
    pub input: InputOffsets,
    pub model: ModelInputConfig,
}

impl PipelineConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `DIGITPAD_*` environment overrides applied, validated
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from `lookup` applied, validated
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self::default().with_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup. Unparseable values are ignored.
    ///
    /// Recognised keys: `DIGITPAD_SURFACE_WIDTH`, `DIGITPAD_SURFACE_HEIGHT`,
    /// `DIGITPAD_TARGET_SIZE`, `DIGITPAD_LINE_WIDTH`, `DIGITPAD_CHANNEL`,
    /// `DIGITPAD_FILTER`, `DIGITPAD_TOUCH_OFFSET_Y`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).map(|v| v.trim().to_string());

        if let Some(width) = parsed("DIGITPAD_SURFACE_WIDTH").and_then(|v| v.parse().ok()) {
            self.surface.width = width;
        }
        if let Some(height) = parsed("DIGITPAD_SURFACE_HEIGHT").and_then(|v| v.parse().ok()) {
            self.surface.height = height;
        }
        if let Some(size) = parsed("DIGITPAD_TARGET_SIZE").and_then(|v| v.parse().ok()) {
            self.model.target_width = size;
            self.model.target_height = size;
        }
        if let Some(width) = parsed("DIGITPAD_LINE_WIDTH").and_then(|v| v.parse().ok()) {
            self.brush.line_width = width;
        }
        if let Some(channel) = parsed("DIGITPAD_CHANNEL").and_then(|v| IntensityChannel::parse(&v)) {
            self.model.channel = channel;
        }
        if let Some(filter) = parsed("DIGITPAD_FILTER").and_then(|v| ResampleFilter::parse(&v)) {
            self.model.filter = filter;
        }
        if let Some(offset) = parsed("DIGITPAD_TOUCH_OFFSET_Y").and_then(|v| v.parse().ok()) {
            self.input.touch[1] = offset;
        }

        self
    }

    /// Reject configurations no pipeline can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "surface must be non-empty, got {}x{}",
                self.surface.width, self.surface.height
            )));
        }
        if self.model.target_width == 0 || self.model.target_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "model input must be non-empty, got {}x{}",
                self.model.target_width, self.model.target_height
            )));
        }
        if self.model.num_classes == 0 {
            return Err(ConfigError::Invalid("num_classes must be at least 1".into()));
        }
        if !(self.brush.line_width.is_finite() && self.brush.line_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "line_width must be positive, got {}",
                self.brush.line_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.surface.width, DEFAULT_SURFACE_WIDTH);
        assert_eq!(config.surface.height, DEFAULT_SURFACE_HEIGHT);
        assert_eq!(config.model.target_width, 32);
        assert_eq!(config.model.channel, IntensityChannel::Blue);
        assert_eq!(config.model.channel.index(), 2);
        assert_eq!(config.model.filter, ResampleFilter::Bilinear);
        assert_eq!(config.input.touch, [0.0, 150.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{ "surface": { "width": 400 }, "model": { "channel": "red" } }"#,
        )
        .unwrap();
        assert_eq!(config.surface.width, 400);
        assert_eq!(config.surface.height, DEFAULT_SURFACE_HEIGHT);
        assert_eq!(config.model.channel, IntensityChannel::Red);
        assert_eq!(config.brush.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            PipelineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{ "model": { "target_width": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DIGITPAD_TARGET_SIZE", "28"),
            ("DIGITPAD_CHANNEL", "alpha"),
            ("DIGITPAD_FILTER", "nearest"),
            ("DIGITPAD_TOUCH_OFFSET_Y", " 90 "),
            ("DIGITPAD_LINE_WIDTH", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config =
            PipelineConfig::default().with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.model.target_width, 28);
        assert_eq!(config.model.target_height, 28);
        assert_eq!(config.model.channel, IntensityChannel::Alpha);
        assert_eq!(config.model.filter, ResampleFilter::Nearest);
        assert_eq!(config.input.touch[1], 90.0);
        // Unparseable value falls back to the default
        assert_eq!(config.brush.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_overrides_are_validated() {
        let zero_width = |key: &str| (key == "DIGITPAD_SURFACE_WIDTH").then(|| "0".to_string());
        assert!(matches!(
            PipelineConfig::from_lookup(zero_width),
            Err(ConfigError::Invalid(_))
        ));

        let config = PipelineConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!(IntensityChannel::parse("B"), Some(IntensityChannel::Blue));
        assert_eq!(IntensityChannel::parse("0"), Some(IntensityChannel::Red));
        assert_eq!(IntensityChannel::parse("luma"), None);
    }
}
