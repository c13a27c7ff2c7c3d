//! A synthetic document layout for the portfolio page.
//!
//! Pinned sections reserve their pin distance as spacing after themselves,
//! the way a pin spacer pushes the rest of the page down.

use scrollwork_protocol::{Rect, Viewport};

use super::{MotionProfile, SectionKind};
use crate::config::MotionConfig;
use crate::layout::StaticLayout;

const CARD_WIDTH_VW: f64 = 0.6;
const CARD_GAP_PX: f64 = 48.0;

/// Lay out every section of the page top to bottom for `viewport`.
pub fn page_layout(
    profile: MotionProfile,
    cards: usize,
    viewport: Viewport,
    config: &MotionConfig,
) -> StaticLayout {
    let vw = viewport.width;
    let vh = viewport.height;
    let mut layout = StaticLayout::new();
    let mut top = 0.0;

    for kind in SectionKind::ALL {
        let (height, spacer) = match (kind, profile) {
            (SectionKind::Hero, MotionProfile::Full) => (vh, config.hero_pin_viewports * vh),
            (SectionKind::About, MotionProfile::Full) => (vh, config.about_pin_viewports * vh),
            (SectionKind::Experience, MotionProfile::Full) => {
                (vh, config.track_pin_viewports * vh)
            }
            (SectionKind::Experience, MotionProfile::Reduced) => {
                let slots = cards.saturating_sub(1).max(1) as f64;
                (vh, slots * config.stack_viewports_per_card * vh)
            }
            (SectionKind::Skills, _) => (1.2 * vh, 0.0),
            (SectionKind::Contact, _) => (0.8 * vh, 0.0),
            (_, MotionProfile::Reduced) => (vh, 0.0),
        };
        let rect = Rect::new(0.0, top, vw, height);
        layout.insert(kind.root(), rect);
        layout.insert(kind.content(), rect);

        if kind == SectionKind::Experience {
            let root = kind.root();
            match profile {
                MotionProfile::Full => {
                    let card_w = CARD_WIDTH_VW * vw;
                    // First card starts centered.
                    let lead = (vw - card_w) / 2.0;
                    let gaps = cards.saturating_sub(1) as f64 * CARD_GAP_PX;
                    let track_w = 2.0 * lead + cards as f64 * card_w + gaps;
                    layout.insert(root.child("track"), Rect::new(0.0, top, track_w, height));
                    for i in 0..cards {
                        let x = lead + i as f64 * (card_w + CARD_GAP_PX);
                        layout.insert(
                            root.child(&format!("card-{i}")),
                            Rect::new(x, top + 0.15 * vh, card_w, 0.7 * vh),
                        );
                    }
                }
                MotionProfile::Reduced => {
                    for i in 0..cards {
                        layout.insert(
                            root.child(&format!("card-{i}")),
                            Rect::new(0.05 * vw, top + 0.2 * vh, 0.9 * vw, 0.6 * vh),
                        );
                    }
                }
            }
        }
        top += height + spacer;
    }
    layout
}
