//! Pager configuration: the initial viewport, zoom and display toggles.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Initial pager state. Every field can later be changed through the
/// matching `Pager` setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Viewport width in device pixels
    pub viewport_width: f64,
    /// Viewport height in device pixels
    pub viewport_height: f64,
    /// Device dots per inch
    pub dpi: f64,
    /// Zoom factor applied to the staff space
    pub scale: f64,
    /// Show two facing pages per step
    pub two_sided: bool,
    pub show_instrument_names: bool,
    pub show_lyrics: bool,
    pub concert_pitch: bool,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1920.0,
            viewport_height: 1080.0,
            dpi: 96.0,
            scale: 1.0,
            two_sided: true,
            show_instrument_names: true,
            show_lyrics: true,
            concert_pitch: false,
        }
    }
}

impl PagerConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale <= 0.0 {
            return Err(ConfigError::NonPositiveScale(self.scale));
        }
        if self.dpi <= 0.0 {
            return Err(ConfigError::NonPositiveDpi(self.dpi));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PagerConfig::from_json(r#"{ "scale": 1.5, "two_sided": false }"#).unwrap();
        assert_eq!(
            config,
            PagerConfig {
                scale: 1.5,
                two_sided: false,
                ..PagerConfig::default()
            }
        );
    }

    #[test]
    fn rejects_non_positive_scale() {
        let err = PagerConfig::from_json(r#"{ "scale": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveScale(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            PagerConfig::from_json("{ scale: }"),
            Err(ConfigError::Json(_))
        ));
    }
}
