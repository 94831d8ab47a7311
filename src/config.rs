//! Engine configuration supplied by the host.
//!
//! The host passes a JSON object (usually persisted alongside user
//! preferences); every key is optional and falls back to the defaults in
//! [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{BACKGROUND_COLOR, DEFAULT_INK, HIGHLIGHTER_ALPHA, HISTORY_LIMIT, ZOOM_STEP};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Surface fill and eraser paint.
    pub background: String,
    /// Draw the world grid behind elements.
    pub show_grid: bool,
    /// Maximum undo snapshots retained.
    pub history_limit: usize,
    /// Scale multiplier per wheel notch; must exceed 1.
    pub zoom_step: f64,
    /// Opacity of highlighter strokes, in `(0, 1]`.
    pub highlighter_alpha: f64,
    /// Ink substituted when the chosen color matches the background.
    pub default_ink: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            background: BACKGROUND_COLOR.to_owned(),
            show_grid: true,
            history_limit: HISTORY_LIMIT,
            zoom_step: ZOOM_STEP,
            highlighter_alpha: HIGHLIGHTER_ALPHA,
            default_ink: DEFAULT_INK.to_owned(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a host-supplied JSON object.
    ///
    /// # Errors
    ///
    /// Returns `Json` for unparseable text and `Invalid` for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be at least 1".into()));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::Invalid(format!("zoom_step must be > 1, got {}", self.zoom_step)));
        }
        if !(self.highlighter_alpha > 0.0 && self.highlighter_alpha <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "highlighter_alpha must be in (0, 1], got {}",
                self.highlighter_alpha
            )));
        }
        if self.background.trim().is_empty() || self.default_ink.trim().is_empty() {
            return Err(ConfigError::Invalid("colors must not be empty".into()));
        }
        Ok(())
    }

    /// Whether `color` would be invisible against the background.
    #[must_use]
    pub fn matches_background(&self, color: &str) -> bool {
        color.trim().eq_ignore_ascii_case(self.background.trim())
    }
}
