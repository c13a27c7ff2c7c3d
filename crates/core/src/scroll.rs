//! The single authoritative scroll position, optionally smoothed.

use scrollwork_protocol::Viewport;

use crate::ease::smooth_scroll_ease;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// Toward the end of the page.
    #[default]
    Forward,
    Backward,
}

/// Everything a controller needs to know about the scroll state for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFrame {
    /// Document offset of the viewport's top edge.
    pub scroll_y: f64,
    pub viewport: Viewport,
    pub direction: ScrollDirection,
}

impl ScrollFrame {
    pub fn new(scroll_y: f64, viewport: Viewport) -> Self {
        Self {
            scroll_y,
            viewport,
            direction: ScrollDirection::Forward,
        }
    }
}

/// Result of moving the scroll source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollUpdate {
    pub frame: ScrollFrame,
    pub direction_changed: bool,
}

#[derive(Debug, Clone)]
pub struct ScrollSource {
    position: f64,
    viewport: Viewport,
    direction: ScrollDirection,
}

impl ScrollSource {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            position: 0.0,
            viewport,
            direction: ScrollDirection::Forward,
        }
    }

    pub fn frame(&self) -> ScrollFrame {
        ScrollFrame {
            scroll_y: self.position,
            viewport: self.viewport,
            direction: self.direction,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Move to `y`. Returns `None` if the position did not change.
    pub fn set_position(&mut self, y: f64) -> Option<ScrollUpdate> {
        if !y.is_finite() || y == self.position {
            return None;
        }
        let direction = if y > self.position {
            ScrollDirection::Forward
        } else {
            ScrollDirection::Backward
        };
        let direction_changed = direction != self.direction;
        self.direction = direction;
        self.position = y;
        Some(ScrollUpdate {
            frame: self.frame(),
            direction_changed,
        })
    }

    pub fn resize(&mut self, viewport: Viewport) -> ScrollFrame {
        self.viewport = viewport;
        self.frame()
    }
}

#[derive(Debug, Clone, Copy)]
struct Glide {
    from: f64,
    to: f64,
    elapsed_s: f64,
    duration_s: f64,
}

/// Virtualized scroll that eases toward its target instead of jumping.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    current: f64,
    limit: f64,
    default_duration_s: f64,
    glide: Option<Glide>,
}

impl SmoothScroll {
    pub fn new(default_duration_s: f64) -> Self {
        Self {
            current: 0.0,
            limit: f64::INFINITY,
            default_duration_s,
            glide: None,
        }
    }

    /// Largest reachable scroll offset (document height minus viewport).
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        self.current = self.current.min(self.limit);
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    /// Where the scroll will come to rest.
    pub fn target(&self) -> f64 {
        self.glide.map_or(self.current, |g| g.to)
    }

    pub fn is_animating(&self) -> bool {
        self.glide.is_some()
    }

    /// Relative scroll (wheel, keys); accumulates onto an in-flight target.
    pub fn scroll_by(&mut self, delta: f64) {
        let target = self.target() + delta;
        self.scroll_to(target, None);
    }

    pub fn scroll_to(&mut self, target: f64, duration_s: Option<f64>) {
        let to = target.clamp(0.0, self.limit);
        let duration_s = duration_s.unwrap_or(self.default_duration_s);
        if duration_s <= 0.0 {
            self.jump_to(to);
            return;
        }
        self.glide = Some(Glide {
            from: self.current,
            to,
            elapsed_s: 0.0,
            duration_s,
        });
    }

    /// Move immediately, cancelling any glide.
    pub fn jump_to(&mut self, y: f64) {
        self.current = y.clamp(0.0, self.limit);
        self.glide = None;
    }

    /// Advance the glide by `dt_s` seconds and return the new position.
    pub fn advance(&mut self, dt_s: f64) -> f64 {
        let Some(mut glide) = self.glide else {
            return self.current;
        };
        glide.elapsed_s += dt_s.max(0.0);
        let t = glide.elapsed_s / glide.duration_s;
        if t >= 1.0 {
            self.current = glide.to;
            self.glide = None;
        } else {
            self.current = glide.from + (glide.to - glide.from) * smooth_scroll_ease(t);
            self.glide = Some(glide);
        }
        self.current
    }
}
