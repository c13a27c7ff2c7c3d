use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every tunable of the scroll choreography.
///
/// Missing fields take their defaults, so a config file only needs to name
/// what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Scroll offset past which the navigation bar morphs into its pill form.
    pub nav_threshold_px: f64,
    /// Viewports narrower than this use the reduced choreography.
    pub mobile_breakpoint_px: f64,
    /// Hero pin length in viewport heights.
    pub hero_pin_viewports: f64,
    /// Progress after which the hero reports `exiting` instead of `active`.
    pub hero_exit_threshold: f64,
    pub about_pin_viewports: f64,
    pub track_pin_viewports: f64,
    /// Distance from the viewport center at which a card reaches its
    /// minimum emphasis.
    pub track_focus_radius_px: f64,
    /// Extra horizontal travel past the last card.
    pub track_end_padding_px: f64,
    /// Pinned scroll per stacked card on narrow viewports, in viewport heights.
    pub stack_viewports_per_card: f64,
    pub smooth_scroll_duration_s: f64,
    pub nav_jump_duration_s: f64,
    pub boot: BootTimings,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            nav_threshold_px: 100.0,
            mobile_breakpoint_px: 768.0,
            hero_pin_viewports: 2.5,
            hero_exit_threshold: 0.8,
            about_pin_viewports: 3.0,
            track_pin_viewports: 3.0,
            track_focus_radius_px: 800.0,
            track_end_padding_px: 0.0,
            stack_viewports_per_card: 3.0,
            smooth_scroll_duration_s: 1.2,
            nav_jump_duration_s: 1.5,
            boot: BootTimings::default(),
        }
    }
}

/// Delays between boot-sequence steps, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootTimings {
    /// Delay after each log line before the next step.
    pub line_delays_ms: Vec<u64>,
    /// Fade of the log text before loading clears.
    pub text_fade_ms: u64,
    /// Time the loader overlay stays mounted after loading clears.
    pub unmount_delay_ms: u64,
}

impl Default for BootTimings {
    fn default() -> Self {
        Self {
            line_delays_ms: vec![200, 300, 200],
            text_fade_ms: 200,
            unmount_delay_ms: 800,
        }
    }
}

impl MotionConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: MotionConfig = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("mobile_breakpoint_px", self.mobile_breakpoint_px),
            ("hero_pin_viewports", self.hero_pin_viewports),
            ("about_pin_viewports", self.about_pin_viewports),
            ("track_pin_viewports", self.track_pin_viewports),
            ("track_focus_radius_px", self.track_focus_radius_px),
            ("stack_viewports_per_card", self.stack_viewports_per_card),
            ("smooth_scroll_duration_s", self.smooth_scroll_duration_s),
            ("nav_jump_duration_s", self.nav_jump_duration_s),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }
        for (field, value) in [
            ("nav_threshold_px", self.nav_threshold_px),
            ("track_end_padding_px", self.track_end_padding_px),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be non-negative, got {value}"),
                });
            }
        }
        if !(self.hero_exit_threshold > 0.0 && self.hero_exit_threshold < 1.0) {
            return Err(ConfigError::Invalid {
                field: "hero_exit_threshold",
                reason: format!("must lie in (0, 1), got {}", self.hero_exit_threshold),
            });
        }
        Ok(())
    }
}
