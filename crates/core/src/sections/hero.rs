//! The hero: two halves part to reveal the content, the spline fades, then
//! content and background zoom out at different rates.

use scrollwork_protocol::{ElementKey, SectionStatus, StyleChannels, Viewport};

use crate::controllers::{PhaseScript, VisualState, late_exit};
use crate::ease::{Ease, lerp, segment};
use crate::timeline::{PhaseTable, TimelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroPhase {
    Split,
    Reveal,
    Exit,
}

/// Timeline length in beats; `p` is scaled onto this.
const BEATS: f64 = 3.7;
const SPLIT: (f64, f64) = (0.0, 2.0);
const REVEAL: (f64, f64) = (1.0, 2.5);
const SPLINE: (f64, f64) = (1.0, 2.0);
const EXIT: (f64, f64) = (2.7, 3.7);

pub fn hero_phases() -> Result<PhaseTable<HeroPhase>, TimelineError> {
    PhaseTable::sequential(&[
        (HeroPhase::Split, REVEAL.0),
        (HeroPhase::Reveal, EXIT.0 - REVEAL.0),
        (HeroPhase::Exit, BEATS - EXIT.0),
    ])
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroKeys {
    pub top_half: ElementKey,
    pub bottom_half: ElementKey,
    pub content: ElementKey,
    pub background: ElementKey,
    pub spline: ElementKey,
}

impl HeroKeys {
    pub fn under(root: &ElementKey) -> Self {
        Self {
            top_half: root.child("top-half"),
            bottom_half: root.child("bottom-half"),
            content: root.child("content"),
            background: root.child("background"),
            spline: root.child("spline"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeroScript {
    table: PhaseTable<HeroPhase>,
    keys: HeroKeys,
    exit_threshold: f64,
}

impl HeroScript {
    pub fn new(keys: HeroKeys, exit_threshold: f64) -> Result<Self, TimelineError> {
        Ok(Self {
            table: hero_phases()?,
            keys,
            exit_threshold,
        })
    }

    pub fn keys(&self) -> &HeroKeys {
        &self.keys
    }
}

fn window(t: f64, (start, end): (f64, f64)) -> f64 {
    segment(t, start, end)
}

impl PhaseScript for HeroScript {
    type Phase = HeroPhase;

    fn phases(&self) -> &PhaseTable<HeroPhase> {
        &self.table
    }

    fn visual_state(&self, p: f64, viewport: Viewport) -> VisualState {
        let t = p * BEATS;
        let split = Ease::Power2InOut.apply(window(t, SPLIT));
        let reveal = Ease::ExpoOut.apply(window(t, REVEAL));
        let spline = Ease::Power1In.apply(window(t, SPLINE));
        let exit = Ease::Power1In.apply(window(t, EXIT));
        let half = viewport.height / 2.0;

        let mut state = VisualState::new();
        let halves = StyleChannels::default().with_opacity(1.0 - exit);
        state.set(
            &self.keys.top_half,
            StyleChannels {
                translate_y: -half * split,
                ..halves
            },
        );
        state.set(
            &self.keys.bottom_half,
            StyleChannels {
                translate_y: half * split,
                ..halves
            },
        );
        state.set(
            &self.keys.content,
            StyleChannels {
                opacity: 1.0 - exit,
                scale: lerp(lerp(0.8, 1.0, reveal), 1.5, exit),
                blur: 10.0 * (1.0 - reveal),
                ..StyleChannels::default()
            },
        );
        state.set(
            &self.keys.background,
            StyleChannels {
                opacity: 1.0 - exit,
                scale: lerp(1.0, 1.1, exit),
                ..StyleChannels::default()
            },
        );
        state.set(
            &self.keys.spline,
            StyleChannels::default().with_opacity(1.0 - spline),
        );
        state
    }

    fn status_at(&self, p: f64) -> SectionStatus {
        late_exit(p, self.exit_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> HeroScript {
        HeroScript::new(HeroKeys::under(&ElementKey::from("hero")), 0.8)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    fn style(state: &VisualState, key: &str) -> StyleChannels {
        state.get(key).copied().unwrap_or_default()
    }

    #[test]
    fn phase_windows_follow_beats() {
        let s = script();
        let w = s.phases().windows();
        assert_eq!(w.len(), 3);
        assert!((w[1].start - 1.0 / 3.7).abs() < 1e-12);
        assert!((w[2].start - 2.7 / 3.7).abs() < 1e-12);
        assert_eq!(s.locate(0.1).phase, HeroPhase::Split);
        assert_eq!(s.locate(0.5).phase, HeroPhase::Reveal);
        assert_eq!(s.locate(0.9).phase, HeroPhase::Exit);
    }

    #[test]
    fn halves_part_by_half_a_viewport() {
        let s = script();
        let vp = Viewport::new(1280.0, 800.0);
        let closed = s.visual_state(0.0, vp);
        assert_eq!(style(&closed, "hero/top-half").translate_y, 0.0);
        assert_eq!(style(&closed, "hero/content").blur, 10.0);

        let open = s.visual_state(2.0 / 3.7, vp);
        assert!((style(&open, "hero/top-half").translate_y + 400.0).abs() < 1e-9);
        assert!((style(&open, "hero/bottom-half").translate_y - 400.0).abs() < 1e-9);
        assert!(style(&open, "hero/spline").opacity < 1e-9);
    }

    #[test]
    fn content_is_fully_revealed_before_exit() {
        let s = script();
        let state = s.visual_state(2.6 / 3.7, Viewport::new(1280.0, 800.0));
        let content = style(&state, "hero/content");
        assert!((content.scale - 1.0).abs() < 1e-9);
        assert!(content.blur.abs() < 1e-9);
        assert_eq!(content.opacity, 1.0);
    }

    #[test]
    fn everything_hidden_at_end() {
        let s = script();
        let state = s.visual_state(1.0, Viewport::new(1280.0, 800.0));
        assert_eq!(state.len(), 5);
        assert!(state.max_opacity() < 1e-3);
        assert!((style(&state, "hero/content").scale - 1.5).abs() < 1e-9);
        assert!((style(&state, "hero/background").scale - 1.1).abs() < 1e-9);
    }

    #[test]
    fn reports_exiting_late() {
        let s = script();
        assert_eq!(s.status_at(0.79), SectionStatus::Active);
        assert_eq!(s.status_at(0.85), SectionStatus::Exiting);
    }
}
