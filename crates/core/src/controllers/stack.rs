//! Narrow-viewport experience variant: cards slide up and stack while the
//! section is pinned.

use scrollwork_protocol::{
    ElementKey, Rect, SectionId, SectionStatus, StyleChannels, StyleCommand, Viewport,
};

use crate::ease::{lerp, segment};
use crate::layout::LayoutProbe;
use crate::registry::SectionRegistry;
use crate::scene::SectionController;
use crate::scroll::ScrollFrame;
use crate::trigger::{ScrubTrigger, TriggerEvent, TriggerRange};

use super::track::LabelSwap;

/// Card styles at progress `p` for a stack of `n` cards.
///
/// The timeline runs over `n - 1` card slots: card `i > 0` slides up from
/// below the viewport during slot `i - 1`, then recedes (shrinks and dims)
/// during slot `i` as the next card covers it. The last card never recedes.
pub fn stack_styles(p: f64, n: usize, viewport_height: f64) -> Vec<StyleChannels> {
    let t = p * n.saturating_sub(1) as f64;
    let recede = |style: &mut StyleChannels, amount: f64| {
        style.scale = lerp(1.0, 0.9, amount);
        style.brightness = lerp(1.0, 0.6, amount);
    };
    (0..n)
        .map(|i| {
            let mut style = StyleChannels {
                z_index: i as i32 + 1,
                ..StyleChannels::default()
            };
            let slot = i as f64;
            if i > 0 {
                let rise = segment(t, slot - 1.0, slot);
                style.translate_y = lerp(1.1 * viewport_height, 0.0, rise);
            }
            if i == 0 || i + 1 < n {
                recede(&mut style, segment(t, slot, slot + 1.0));
            }
            style
        })
        .collect()
}

/// Index of the card currently on top.
pub fn top_card(p: f64, n: usize) -> usize {
    (p * n.saturating_sub(1) as f64).round().max(0.0) as usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackKeys {
    pub section: ElementKey,
    pub cards: Vec<ElementKey>,
    /// Label showing the top card's period.
    pub year: ElementKey,
}

impl StackKeys {
    pub fn under(root: &ElementKey, cards: usize) -> Self {
        Self {
            section: root.clone(),
            cards: (0..cards).map(|i| root.child(&format!("card-{i}"))).collect(),
            year: root.child("year"),
        }
    }
}

#[derive(Debug)]
pub struct StackedCards {
    id: SectionId,
    keys: StackKeys,
    viewports_per_card: f64,
    year: LabelSwap,
    trigger: ScrubTrigger,
    measured: Option<(Rect, Viewport)>,
    written: Vec<StyleChannels>,
}

impl StackedCards {
    pub fn new(
        id: impl Into<SectionId>,
        keys: StackKeys,
        periods: Vec<String>,
        viewports_per_card: f64,
    ) -> Self {
        let year = LabelSwap::new(keys.year.clone(), periods, 0.15, 0.15);
        Self {
            id: id.into(),
            keys,
            viewports_per_card,
            year,
            trigger: ScrubTrigger::new(TriggerRange::new(0.0, 0.0)),
            measured: None,
            written: Vec::new(),
        }
    }

    pub fn pin_range(&self) -> TriggerRange {
        self.trigger.range()
    }

    pub fn top_card(&self) -> Option<usize> {
        self.year.shown()
    }

    fn pin_distance(&self, viewport_height: f64) -> f64 {
        let slots = self.keys.cards.len().saturating_sub(1).max(1) as f64;
        slots * self.viewports_per_card * viewport_height
    }
}

impl SectionController for StackedCards {
    fn section_id(&self) -> &SectionId {
        &self.id
    }

    fn measure(&mut self, probe: &dyn LayoutProbe, frame: &ScrollFrame) -> bool {
        let Some(section) = probe.rect(&self.keys.section) else {
            return false;
        };
        if self.keys.cards.iter().any(|k| probe.rect(k).is_none()) {
            return false;
        }
        let section = section.offset_y(frame.scroll_y);
        if self.measured != Some((section, frame.viewport)) {
            let distance = self.pin_distance(frame.viewport.height);
            self.trigger.set_range(TriggerRange::pin(&section, distance));
            self.measured = Some((section, frame.viewport));
            self.written.clear();
        }
        true
    }

    fn apply(
        &mut self,
        frame: &ScrollFrame,
        registry: &mut SectionRegistry,
        out: &mut Vec<StyleCommand>,
    ) {
        let mut moved = self.written.is_empty();
        for event in self.trigger.update(frame.scroll_y) {
            match event {
                TriggerEvent::Toggle(active) => {
                    let status = if active {
                        SectionStatus::Active
                    } else {
                        SectionStatus::Idle
                    };
                    registry.update_status(&self.id, status, self.trigger.progress());
                    out.push(StyleCommand::SetPinned {
                        target: self.keys.section.clone(),
                        pinned: active,
                    });
                }
                TriggerEvent::Update(p) => {
                    if self.trigger.is_active() {
                        registry.update_status(&self.id, SectionStatus::Active, p);
                    }
                    moved = true;
                }
                _ => {}
            }
        }
        if !moved {
            return;
        }

        let p = self.trigger.progress();
        let n = self.keys.cards.len();
        let styles = stack_styles(p, n, frame.viewport.height);
        for (i, style) in styles.iter().enumerate() {
            if self.written.get(i) != Some(style) {
                out.push(StyleCommand::SetStyle {
                    target: self.keys.cards[i].clone(),
                    style: *style,
                });
            }
        }
        self.written = styles;
        if n > 0 {
            self.year.update(top_card(p, n), out);
        }
    }

    fn kind(&self) -> &'static str {
        "stacked-cards"
    }

    fn detail(&self) -> Option<String> {
        self.top_card()
            .map(|i| format!("card {} of {}", i + 1, self.keys.cards.len()))
    }
}
