//! Crop tool configuration.
//!
//! The host application may pass a JSON blob; every field is optional and
//! falls back to its default.
//!
//! ```json
//! { "filter": "lanczos3", "handleRadius": 30, "magnifier": { "zoom": 3 } }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::redress::{InterpolationFilter, RedressOptions};

/// Errors from loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("Invalid crop configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range.
    #[error("Invalid crop configuration: {field} {reason}")]
    OutOfRange { field: &'static str, reason: &'static str },
}

/// Loupe shown under the finger while a corner is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MagnifierConfig {
    /// Side length of the rendered loupe in pixels.
    pub size: u32,
    /// Magnification relative to source pixels.
    pub zoom: f64,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            size: 96,
            zoom: 2.0,
        }
    }
}

/// Settings for a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    /// Resampling filter for the redress warp.
    pub filter: InterpolationFilter,
    /// Longest output edge in pixels.
    pub max_output_edge: u32,
    /// Hit radius of a corner handle, in container units.
    pub handle_radius: f64,
    /// Drag loupe settings.
    pub magnifier: MagnifierConfig,
    /// JPEG quality used when the result is stored.
    pub jpeg_quality: u8,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            filter: InterpolationFilter::Bilinear,
            max_output_edge: 8192,
            handle_radius: 22.0,
            magnifier: MagnifierConfig::default(),
            jpeg_quality: 90,
        }
    }
}

impl CropConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: CropConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_output_edge == 0 {
            return Err(ConfigError::OutOfRange {
                field: "maxOutputEdge",
                reason: "must be at least 1",
            });
        }
        if !(self.handle_radius.is_finite() && self.handle_radius >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "handleRadius",
                reason: "must be a non-negative number",
            });
        }
        if self.magnifier.size == 0 {
            return Err(ConfigError::OutOfRange {
                field: "magnifier.size",
                reason: "must be at least 1",
            });
        }
        if !(self.magnifier.zoom.is_finite() && self.magnifier.zoom > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "magnifier.zoom",
                reason: "must be positive",
            });
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::OutOfRange {
                field: "jpegQuality",
                reason: "must be between 1 and 100",
            });
        }
        Ok(())
    }

    pub fn redress_options(&self) -> RedressOptions {
        RedressOptions {
            filter: self.filter,
            max_output_edge: self.max_output_edge,
        }
    }
}
