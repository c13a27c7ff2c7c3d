//! Geometry reads. Controllers only ever look at the page through
//! [`LayoutProbe`], and only during a frame's read phase.

use std::collections::HashMap;

use scrollwork_protocol::{ElementKey, Rect};

/// Measures elements the way a browser's bounding client rect does:
/// relative to the viewport, in the element's un-pinned flow position.
///
/// `None` means the element is not mounted (yet, or any more).
pub trait LayoutProbe {
    fn rect(&self, key: &ElementKey) -> Option<Rect>;
}

/// Fixed document layout scrolled by a single offset.
///
/// Used by tests and the terminal preview in place of a real DOM.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    elements: HashMap<ElementKey, Rect>,
    scroll_y: f64,
}

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an element at `rect`, in document coordinates.
    pub fn insert(&mut self, key: impl Into<ElementKey>, rect: Rect) -> &mut Self {
        self.elements.insert(key.into(), rect);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Rect> {
        self.elements.remove(key)
    }

    pub fn set_scroll(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }

    pub fn document_rect(&self, key: &str) -> Option<Rect> {
        self.elements.get(key).copied()
    }

    /// Bottom edge of the lowest element.
    pub fn document_height(&self) -> f64 {
        self.elements
            .values()
            .map(Rect::bottom)
            .fold(0.0, f64::max)
    }
}

impl LayoutProbe for StaticLayout {
    fn rect(&self, key: &ElementKey) -> Option<Rect> {
        self.elements.get(key).map(|r| r.offset_y(-self.scroll_y))
    }
}
