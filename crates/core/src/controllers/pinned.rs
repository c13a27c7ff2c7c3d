//! Pinned sections driven by a phase script.
//!
//! The section is locked at the top of the viewport for a fixed scroll
//! distance. Across that distance the scroll position maps to `p ∈ [0, 1]`,
//! and a [`PhaseScript`] turns `p` into the style of every animated element.
//! Scripts are pure functions of `p`: fast scrolls may skip phases without
//! leaving anything half-animated.

use std::fmt;

use scrollwork_protocol::{
    ElementKey, Rect, SectionId, SectionStatus, StyleChannels, StyleCommand, Viewport,
};

use crate::layout::LayoutProbe;
use crate::registry::SectionRegistry;
use crate::scene::SectionController;
use crate::scroll::{ScrollDirection, ScrollFrame};
use crate::timeline::{PhaseSample, PhaseTable};
use crate::trigger::{ScrubTrigger, TriggerEvent, TriggerRange};

use super::transition::{TransitionEngine, TransitionFlags};

/// Styles of every element a script animates, in a stable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualState {
    elements: Vec<(ElementKey, StyleChannels)>,
}

impl VisualState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &ElementKey, style: StyleChannels) {
        match self.elements.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = style,
            None => self.elements.push((key.clone(), style)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&StyleChannels> {
        self.elements
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, s)| s)
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleChannels> {
        let index = self.elements.iter().position(|(k, _)| k.as_str() == key)?;
        Some(self.elements.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementKey, &StyleChannels)> {
        self.elements.iter().map(|(k, s)| (k, s))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Largest opacity of any element; `0` means fully hidden.
    pub fn max_opacity(&self) -> f64 {
        self.elements
            .iter()
            .map(|(_, s)| s.opacity)
            .fold(0.0, f64::max)
    }
}

/// A section's multi-phase choreography as a pure function of progress.
pub trait PhaseScript {
    type Phase: Copy + PartialEq + fmt::Debug;

    fn phases(&self) -> &PhaseTable<Self::Phase>;

    /// Style of every animated element at progress `p`.
    ///
    /// At `p = 1` every element must be hidden.
    fn visual_state(&self, p: f64, viewport: Viewport) -> VisualState;

    /// Status reported while pinned.
    fn status_at(&self, _p: f64) -> SectionStatus {
        SectionStatus::Active
    }

    fn locate(&self, p: f64) -> PhaseSample<Self::Phase> {
        self.phases().locate(p)
    }
}

/// Reports `exiting` once progress passes `threshold`, `active` before.
pub fn late_exit(p: f64, threshold: f64) -> SectionStatus {
    if p > threshold {
        SectionStatus::Exiting
    } else {
        SectionStatus::Active
    }
}

pub struct PinnedTimeline<S: PhaseScript> {
    id: SectionId,
    section: ElementKey,
    script: S,
    pin_viewports: f64,
    entry: Option<TransitionEngine>,
    trigger: ScrubTrigger,
    measured: Option<(Rect, Viewport)>,
    written: Option<VisualState>,
    sample: Option<PhaseSample<S::Phase>>,
}

impl<S: PhaseScript> fmt::Debug for PinnedTimeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinnedTimeline")
            .field("id", &self.id)
            .field("pin_viewports", &self.pin_viewports)
            .field("range", &self.trigger.range())
            .field("sample", &self.sample)
            .finish_non_exhaustive()
    }
}

impl<S: PhaseScript> PinnedTimeline<S> {
    /// Pin `section` for `pin_viewports` viewport heights of scroll.
    pub fn new(
        id: impl Into<SectionId>,
        section: impl Into<ElementKey>,
        script: S,
        pin_viewports: f64,
    ) -> Self {
        Self {
            id: id.into(),
            section: section.into(),
            script,
            pin_viewports,
            entry: None,
            trigger: ScrubTrigger::new(TriggerRange::new(0.0, 0.0)),
            measured: None,
            written: None,
            sample: None,
        }
    }

    /// Fade `content` in while the section approaches the pin, then hand the
    /// content over to the script.
    pub fn with_entry(mut self, content: impl Into<ElementKey>) -> Self {
        let flags = TransitionFlags {
            enable_entry: true,
            enable_exit: false,
            is_pinned: true,
        };
        self.entry = Some(TransitionEngine::new(
            self.id.clone(),
            self.section.clone(),
            content,
            flags,
        ));
        self
    }

    pub fn script(&self) -> &S {
        &self.script
    }

    pub fn pin_range(&self) -> TriggerRange {
        self.trigger.range()
    }

    pub fn progress(&self) -> f64 {
        self.trigger.progress()
    }

    /// Phase and local fraction as of the last write.
    pub fn current(&self) -> Option<PhaseSample<S::Phase>> {
        self.sample
    }

    fn run_pin(
        &mut self,
        frame: &ScrollFrame,
        registry: &mut SectionRegistry,
        out: &mut Vec<StyleCommand>,
    ) {
        let mut moved = self.written.is_none();
        for event in self.trigger.update(frame.scroll_y) {
            match event {
                TriggerEvent::Toggle(pinned) => out.push(StyleCommand::SetPinned {
                    target: self.section.clone(),
                    pinned,
                }),
                TriggerEvent::Update(p) => {
                    registry.update_status(&self.id, self.script.status_at(p), p);
                    moved = true;
                }
                _ => {}
            }
        }
        if moved {
            self.write_state(frame.viewport, out);
        }
    }

    fn write_state(&mut self, viewport: Viewport, out: &mut Vec<StyleCommand>) {
        let p = self.trigger.progress();
        let mut state = self.script.visual_state(p, viewport);
        // Before the pin starts the entry engine owns the content element.
        let before_pin = !self.trigger.is_active() && p <= 0.0;
        if let Some(entry) = self.entry.as_ref().filter(|_| before_pin) {
            state.remove(entry.content().as_str());
        }
        for (key, style) in state.iter() {
            let unchanged = self
                .written
                .as_ref()
                .and_then(|w| w.get(key.as_str()))
                .is_some_and(|prev| prev == style);
            if !unchanged {
                out.push(StyleCommand::SetStyle {
                    target: key.clone(),
                    style: *style,
                });
            }
        }
        self.sample = Some(self.script.locate(p));
        self.written = Some(state);
    }
}

impl<S: PhaseScript> SectionController for PinnedTimeline<S> {
    fn section_id(&self) -> &SectionId {
        &self.id
    }

    fn measure(&mut self, probe: &dyn LayoutProbe, frame: &ScrollFrame) -> bool {
        let Some(rect) = probe.rect(&self.section) else {
            return false;
        };
        if let Some(entry) = &mut self.entry {
            if !entry.measure(probe, frame) {
                return false;
            }
        }
        let rect = rect.offset_y(frame.scroll_y);
        if self.measured != Some((rect, frame.viewport)) {
            let distance = self.pin_viewports * frame.viewport.height;
            self.trigger.set_range(TriggerRange::pin(&rect, distance));
            self.measured = Some((rect, frame.viewport));
            // Viewport-relative styles must be recomputed.
            self.written = None;
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
                self.run_pin(frame, registry, out);
            }
            ScrollDirection::Backward => {
                self.run_pin(frame, registry, out);
                if let Some(entry) = &mut self.entry {
                    entry.apply(frame, registry, out);
                }
            }
        }
    }

    fn kind(&self) -> &'static str {
        "pinned-timeline"
    }

    fn detail(&self) -> Option<String> {
        self.sample
            .map(|s| format!("{:?} {:.0}%", s.phase, s.local * 100.0))
    }
}
