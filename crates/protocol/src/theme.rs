use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Brand palette, in skill-category order.
    Primary,
    Secondary,
    Accent,
    Violet,
    Crimson,

    Background,
    Surface,
    Border,

    TextPrimary,
    TextMuted,

    // Graph links
    LinkNeutral,
}

impl ThemeToken {
    /// Category palette cycled by the skills graph.
    pub const PALETTE: [ThemeToken; 5] = [
        ThemeToken::Primary,
        ThemeToken::Secondary,
        ThemeToken::Accent,
        ThemeToken::Violet,
        ThemeToken::Crimson,
    ];
}
