//! Scroll-linked trigger: maps a document scroll offset onto `[0, 1]`
//! progress over a fixed range and reports range-edge crossings.

use scrollwork_protocol::Rect;

use crate::ease::clamp01;

/// A scroll range in document pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerRange {
    pub start: f64,
    pub end: f64,
}

impl TriggerRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Section top travels from the viewport bottom to the viewport top.
    pub fn entry(section: &Rect, viewport_height: f64) -> Self {
        Self::new(section.top() - viewport_height, section.top())
    }

    /// Section bottom travels from the viewport bottom to the viewport top.
    pub fn exit(section: &Rect, viewport_height: f64) -> Self {
        Self::new(section.bottom() - viewport_height, section.bottom())
    }

    /// Section top locked at the viewport top for `distance` pixels.
    pub fn pin(section: &Rect, distance: f64) -> Self {
        Self::new(section.top(), section.top() + distance.max(0.0))
    }

    /// Section top at the viewport top until its bottom reaches the top.
    pub fn span(section: &Rect) -> Self {
        Self::new(section.top(), section.bottom())
    }

    /// Clamped progress of `y`. A zero-length range is a step at `start`.
    pub fn progress(&self, y: f64) -> f64 {
        if self.end <= self.start {
            return if y >= self.start { 1.0 } else { 0.0 };
        }
        clamp01((y - self.start) / (self.end - self.start))
    }

    fn zone(&self, y: f64) -> Zone {
        if y < self.start {
            Zone::Before
        } else if y > self.end.max(self.start) {
            Zone::After
        } else {
            Zone::Inside
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Before,
    Inside,
    After,
}

/// Callback-style notifications from one trigger update.
///
/// Within one update, `Enter`/`EnterBack` precede `Update` and
/// `Leave`/`LeaveBack` follow it, so the last event always describes where
/// the scroll position ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerEvent {
    Enter,
    EnterBack,
    Update(f64),
    Leave,
    LeaveBack,
    Toggle(bool),
}

#[derive(Debug, Clone)]
pub struct ScrubTrigger {
    range: TriggerRange,
    zone: Option<Zone>,
    progress: f64,
}

impl ScrubTrigger {
    pub fn new(range: TriggerRange) -> Self {
        Self {
            range,
            zone: None,
            progress: 0.0,
        }
    }

    pub fn range(&self) -> TriggerRange {
        self.range
    }

    /// Re-measure the range (layout change) without losing the crossing state.
    pub fn set_range(&mut self, range: TriggerRange) {
        self.range = range;
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_active(&self) -> bool {
        self.zone == Some(Zone::Inside)
    }

    /// Forget crossing history; the next update behaves like a first update.
    pub fn reset(&mut self) {
        self.zone = None;
        self.progress = 0.0;
    }

    /// Feed a new scroll position.
    ///
    /// The first update treats the previous position as "before the range",
    /// so a page loaded mid-scroll still receives `Enter` (and `Leave`).
    pub fn update(&mut self, y: f64) -> Vec<TriggerEvent> {
        let mut events = Vec::new();
        let first = self.zone.is_none();
        let previous = self.zone.unwrap_or(Zone::Before);
        let zone = self.range.zone(y);
        let progress = self.range.progress(y);
        self.zone = Some(zone);

        let crossed = previous != zone;
        match (previous, zone) {
            (Zone::Before, Zone::Inside) | (Zone::Before, Zone::After) => {
                events.push(TriggerEvent::Enter)
            }
            (Zone::After, Zone::Inside) | (Zone::After, Zone::Before) => {
                events.push(TriggerEvent::EnterBack)
            }
            _ => {}
        }
        if zone == Zone::Inside && previous != Zone::Inside {
            events.push(TriggerEvent::Toggle(true));
        }

        let moved = progress != self.progress || (first && zone == Zone::Inside);
        if (zone == Zone::Inside || crossed) && moved {
            events.push(TriggerEvent::Update(progress));
        }
        self.progress = progress;

        match (previous, zone) {
            (Zone::Inside, Zone::After) | (Zone::Before, Zone::After) => {
                events.push(TriggerEvent::Leave)
            }
            (Zone::Inside, Zone::Before) | (Zone::After, Zone::Before) => {
                events.push(TriggerEvent::LeaveBack)
            }
            _ => {}
        }
        if previous == Zone::Inside && zone != Zone::Inside {
            events.push(TriggerEvent::Toggle(false));
        }
        events
    }
}
