use std::path::Path;

use serde::{Deserialize, Serialize};

use rgbdcloud_3d::camera::PinholeCamera;
use rgbdcloud_assoc::AssociationConfig;

/// Error types for the configuration module.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read the configuration file")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`RgbdConfig`]
    #[error(transparent)]
    SerializationError(#[from] serde_json::Error),

    /// The camera intrinsics cannot back-project pixels
    #[error("Invalid camera intrinsics: {0:?}")]
    InvalidCamera(PinholeCamera),
}

/// The immutable settings of a run: camera model and association thresholds.
///
/// Missing keys take their default values, so an empty JSON object yields the
/// default configuration of the Freiburg sequences.
///
/// Example:
///
/// ```
/// use rgbdcloud::config::RgbdConfig;
///
/// let config: RgbdConfig =
///     serde_json::from_str(r#"{"camera": {"depth_scale": 1000.0}}"#).unwrap();
/// assert_eq!(config.camera.depth_scale, 1000.0);
/// assert_eq!(config.camera.focal_length, (525.0, 525.0));
/// assert_eq!(config.association.max_difference, 0.02);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RgbdConfig {
    /// The pinhole intrinsics and depth scale of the sensor.
    pub camera: PinholeCamera,
    /// The thresholds used to associate the streams.
    pub association: AssociationConfig,
}

impl RgbdConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidCamera`] if a focal length or the depth scale is
    /// not positive and finite, or the principal point is not finite.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        if !config.camera.is_valid() {
            return Err(ConfigError::InvalidCamera(config.camera));
        }
        log::debug!("loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }
}
