use serde::{Deserialize, Serialize};

use crate::keys::ElementKey;

/// Named numeric style channels for one animated element.
///
/// Renderers bind these to whatever styling mechanism they have (CSS
/// transforms, canvas state, terminal attributes). `Default` is the neutral,
/// untransformed state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleChannels {
    pub opacity: f64,
    pub scale: f64,
    /// Horizontal offset in pixels.
    pub translate_x: f64,
    /// Vertical offset in pixels.
    pub translate_y: f64,
    pub translate_z: f64,
    /// Gaussian blur radius in pixels.
    pub blur: f64,
    /// Brightness multiplier, `1.0` = unchanged.
    pub brightness: f64,
    pub z_index: i32,
}

impl Default for StyleChannels {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            translate_z: 0.0,
            blur: 0.0,
            brightness: 1.0,
            z_index: 0,
        }
    }
}

impl StyleChannels {
    /// Fully transparent, otherwise neutral.
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..Self::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// A single, stateless style instruction produced during a frame's write phase.
///
/// Controllers append to a [`StyleBatch`] per frame; renderers apply it in
/// order. Each command carries everything it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StyleCommand {
    /// Replace all style channels of an element.
    SetStyle {
        target: ElementKey,
        style: StyleChannels,
    },

    /// Lock (or release) an element at the top of the viewport.
    SetPinned { target: ElementKey, pinned: bool },

    /// Swap an element's text with a short cross-fade.
    SwapText {
        target: ElementKey,
        text: String,
        /// Font size in viewport-width units chosen to fit the new text;
        /// `None` keeps the current size.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size_vw: Option<f64>,
        fade_out_s: f64,
        fade_in_s: f64,
    },
}

/// One frame's worth of style instructions.
pub type StyleBatch = Vec<StyleCommand>;

impl StyleCommand {
    pub fn target(&self) -> &ElementKey {
        match self {
            StyleCommand::SetStyle { target, .. }
            | StyleCommand::SetPinned { target, .. }
            | StyleCommand::SwapText { target, .. } => target,
        }
    }
}
