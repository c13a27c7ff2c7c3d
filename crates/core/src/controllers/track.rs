//! Experience tracks: the wide-viewport horizontal strip and the shared
//! debounced label swap.

use scrollwork_protocol::{
    ElementKey, Rect, SectionId, SectionStatus, StyleChannels, StyleCommand, Viewport,
};

use crate::config::MotionConfig;
use crate::ease::lerp;
use crate::layout::LayoutProbe;
use crate::registry::SectionRegistry;
use crate::scene::SectionController;
use crate::scroll::{ScrollDirection, ScrollFrame};
use crate::trigger::{ScrubTrigger, TriggerEvent, TriggerRange};

use super::transition::{TransitionEngine, TransitionFlags};

/// Font size in `vw` that lets `text` span roughly 90% of the viewport.
pub fn watermark_font_vw(text: &str) -> f64 {
    let chars = text.chars().count().max(1) as f64;
    (90.0 / (chars * 0.6)).clamp(4.0, 18.0)
}

/// Swaps a label element's text when the focused index changes, and only then.
#[derive(Debug, Clone)]
pub struct LabelSwap {
    target: ElementKey,
    labels: Vec<String>,
    fit_width: bool,
    fade_out_s: f64,
    fade_in_s: f64,
    shown: Option<usize>,
}

impl LabelSwap {
    pub fn new(target: ElementKey, labels: Vec<String>, fade_out_s: f64, fade_in_s: f64) -> Self {
        Self {
            target,
            labels,
            fit_width: false,
            fade_out_s,
            fade_in_s,
            shown: None,
        }
    }

    /// Resize the text to fill the viewport width on every swap.
    pub fn fit_width(mut self) -> Self {
        self.fit_width = true;
        self
    }

    pub fn shown(&self) -> Option<usize> {
        self.shown
    }

    pub fn update(&mut self, index: usize, out: &mut Vec<StyleCommand>) {
        if self.shown == Some(index) {
            return;
        }
        let Some(text) = self.labels.get(index).or_else(|| self.labels.first()) else {
            return;
        };
        self.shown = Some(index);
        out.push(StyleCommand::SwapText {
            target: self.target.clone(),
            text: text.clone(),
            font_size_vw: self.fit_width.then(|| watermark_font_vw(text)),
            fade_out_s: self.fade_out_s,
            fade_in_s: self.fade_in_s,
        });
    }
}

/// Emphasis by horizontal distance from the viewport center.
///
/// Returns one style per card plus the index of the closest card (first one
/// wins ties).
pub fn focus_pass(
    centers: &[f64],
    viewport_center: f64,
    radius: f64,
) -> (Vec<StyleChannels>, Option<usize>) {
    let mut closest: Option<(usize, f64)> = None;
    let styles = centers
        .iter()
        .enumerate()
        .map(|(i, &center)| {
            let dist = (viewport_center - center).abs();
            if closest.is_none_or(|(_, best)| dist < best) {
                closest = Some((i, dist));
            }
            let n = if radius > 0.0 { (dist / radius).min(1.0) } else { 1.0 };
            StyleChannels {
                scale: lerp(1.05, 0.92, n),
                opacity: lerp(1.0, 0.5, n),
                brightness: lerp(1.0, 0.6, n),
                z_index: 10 - (n * 10.0).floor() as i32,
                ..StyleChannels::default()
            }
        })
        .collect();
    (styles, closest.map(|(i, _)| i))
}

/// Element keys of a track section.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackKeys {
    /// Scroll trigger and pinned element.
    pub section: ElementKey,
    /// The strip translated horizontally.
    pub track: ElementKey,
    pub cards: Vec<ElementKey>,
    /// Large background label showing the focused card's period.
    pub watermark: ElementKey,
}

impl TrackKeys {
    pub fn under(root: &ElementKey, cards: usize) -> Self {
        Self {
            section: root.clone(),
            track: root.child("track"),
            cards: (0..cards).map(|i| root.child(&format!("card-{i}"))).collect(),
            watermark: root.child("watermark"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSettings {
    pub pin_viewports: f64,
    pub focus_radius_px: f64,
    pub end_padding_px: f64,
}

impl TrackSettings {
    pub fn from_config(config: &MotionConfig) -> Self {
        Self {
            pin_viewports: config.track_pin_viewports,
            focus_radius_px: config.track_focus_radius_px,
            end_padding_px: config.track_end_padding_px,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TrackGeometry {
    section: Rect,
    viewport: Viewport,
    track_width: f64,
    /// Card center relative to the track's left edge.
    card_centers: Vec<f64>,
}

/// Pinned horizontal scroll of experience cards with a focus lens.
#[derive(Debug)]
pub struct HorizontalTrack {
    id: SectionId,
    keys: TrackKeys,
    settings: TrackSettings,
    watermark: LabelSwap,
    entry: Option<TransitionEngine>,
    trigger: ScrubTrigger,
    geometry: Option<TrackGeometry>,
    cards: Vec<StyleChannels>,
    offset: Option<f64>,
}

impl HorizontalTrack {
    pub fn new(
        id: impl Into<SectionId>,
        keys: TrackKeys,
        periods: Vec<String>,
        settings: TrackSettings,
    ) -> Self {
        let watermark = LabelSwap::new(keys.watermark.clone(), periods, 0.2, 0.4).fit_width();
        Self {
            id: id.into(),
            keys,
            settings,
            watermark,
            entry: None,
            trigger: ScrubTrigger::new(TriggerRange::new(0.0, 0.0)),
            geometry: None,
            cards: Vec::new(),
            offset: None,
        }
    }

    /// Fade the track in while the section approaches its pin.
    pub fn with_entry(mut self) -> Self {
        let flags = TransitionFlags {
            enable_entry: true,
            enable_exit: false,
            is_pinned: true,
        };
        self.entry = Some(TransitionEngine::new(
            self.id.clone(),
            self.keys.section.clone(),
            self.keys.track.clone(),
            flags,
        ));
        self
    }

    pub fn focused(&self) -> Option<usize> {
        self.watermark.shown()
    }

    pub fn pin_range(&self) -> TriggerRange {
        self.trigger.range()
    }

    /// Horizontal travel at full progress.
    pub fn travel(&self) -> f64 {
        self.geometry.as_ref().map_or(0.0, |g| {
            (g.track_width - g.viewport.width).max(0.0) + self.settings.end_padding_px
        })
    }

    fn run(
        &mut self,
        frame: &ScrollFrame,
        registry: &mut SectionRegistry,
        out: &mut Vec<StyleCommand>,
    ) {
        let mut moved = self.offset.is_none();
        for event in self.trigger.update(frame.scroll_y) {
            match event {
                TriggerEvent::Toggle(active) => {
                    let status = if active { SectionStatus::Active } else { SectionStatus::Idle };
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
        if moved {
            self.write(frame.viewport, out);
        }
    }

    fn write(&mut self, viewport: Viewport, out: &mut Vec<StyleCommand>) {
        let Some(geometry) = &self.geometry else {
            return;
        };
        let offset = -self.travel() * self.trigger.progress();
        let entry_owns_track = self.entry.is_some() && self.trigger.progress() <= 0.0;
        if self.offset != Some(offset) && !entry_owns_track {
            out.push(StyleCommand::SetStyle {
                target: self.keys.track.clone(),
                style: StyleChannels {
                    translate_x: offset,
                    ..StyleChannels::default()
                },
            });
        }
        self.offset = Some(offset);

        let left = geometry.section.x + offset;
        let centers: Vec<f64> = geometry.card_centers.iter().map(|c| left + c).collect();
        let (styles, closest) =
            focus_pass(&centers, viewport.center_x(), self.settings.focus_radius_px);
        for (i, style) in styles.iter().enumerate() {
            if self.cards.get(i) != Some(style) {
                out.push(StyleCommand::SetStyle {
                    target: self.keys.cards[i].clone(),
                    style: *style,
                });
            }
        }
        self.cards = styles;
        if let Some(index) = closest {
            self.watermark.update(index, out);
        }
    }
}

impl SectionController for HorizontalTrack {
    fn section_id(&self) -> &SectionId {
        &self.id
    }

    fn measure(&mut self, probe: &dyn LayoutProbe, frame: &ScrollFrame) -> bool {
        let (Some(section), Some(track)) =
            (probe.rect(&self.keys.section), probe.rect(&self.keys.track))
        else {
            return false;
        };
        let mut card_centers = Vec::with_capacity(self.keys.cards.len());
        for key in &self.keys.cards {
            let Some(card) = probe.rect(key) else {
                return false;
            };
            card_centers.push(card.x - track.x + card.w / 2.0);
        }
        if let Some(entry) = &mut self.entry {
            if !entry.measure(probe, frame) {
                return false;
            }
        }

        let geometry = TrackGeometry {
            section: section.offset_y(frame.scroll_y),
            viewport: frame.viewport,
            track_width: track.w,
            card_centers,
        };
        if self.geometry.as_ref() != Some(&geometry) {
            let distance = self.settings.pin_viewports * frame.viewport.height;
            self.trigger.set_range(TriggerRange::pin(&geometry.section, distance));
            self.geometry = Some(geometry);
            self.offset = None;
        }
        true
    }

    fn apply(
        &mut self,
        frame: &ScrollFrame,
        registry: &mut SectionRegistry,
        out: &mut Vec<StyleCommand>,
    ) {
        match frame.direction {
            ScrollDirection::Forward => {
                if let Some(entry) = &mut self.entry {
                    entry.apply(frame, registry, out);
                }
                self.run(frame, registry, out);
            }
            ScrollDirection::Backward => {
                self.run(frame, registry, out);
                if let Some(entry) = &mut self.entry {
                    entry.apply(frame, registry, out);
                }
            }
        }
    }

    fn kind(&self) -> &'static str {
        "horizontal-track"
    }

    fn detail(&self) -> Option<String> {
        self.focused().map(|i| format!("card {} of {}", i + 1, self.keys.cards.len()))
    }
}
