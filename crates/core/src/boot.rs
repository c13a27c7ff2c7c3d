//! The boot-log loader shown on first visit.
//!
//! Everything is a function of elapsed time, so any frame clock can drive it
//! and tests can sample arbitrary instants.

use serde::Serialize;

use crate::config::BootTimings;

pub const BOOT_LINES: [&str; 3] = [
    "> INITIALIZING KERNEL...",
    "> LOADING ANDROID RUNTIME...",
    "> HYDRATING REACT ROOT...",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BootState {
    /// Number of log lines revealed.
    pub lines: usize,
    pub text_visible: bool,
    /// The page is still behind the loader; scroll stays locked.
    pub loading: bool,
    /// The loader overlay is still in the tree (fading out once `loading`
    /// clears).
    pub mounted: bool,
}

impl BootState {
    pub const COMPLETE: BootState = BootState {
        lines: BOOT_LINES.len(),
        text_visible: false,
        loading: false,
        mounted: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct BootSequence {
    timings: BootTimings,
    returning_visitor: bool,
}

impl BootSequence {
    /// Returning visitors (already booted this session) skip the loader.
    pub fn new(timings: BootTimings, returning_visitor: bool) -> Self {
        Self {
            timings,
            returning_visitor,
        }
    }

    fn line_count(&self) -> usize {
        self.timings.line_delays_ms.len().min(BOOT_LINES.len())
    }

    /// When line `i` appears.
    pub fn line_at(&self, i: usize) -> u64 {
        self.timings.line_delays_ms.iter().take(i).sum()
    }

    pub fn text_hidden_at(&self) -> u64 {
        self.line_at(self.line_count())
    }

    pub fn loaded_at(&self) -> u64 {
        self.text_hidden_at() + self.timings.text_fade_ms
    }

    pub fn unmount_at(&self) -> u64 {
        self.loaded_at() + self.timings.unmount_delay_ms
    }

    pub fn state_at(&self, elapsed_ms: u64) -> BootState {
        if self.returning_visitor {
            return BootState::COMPLETE;
        }
        let lines = (0..self.line_count())
            .filter(|&i| elapsed_ms >= self.line_at(i))
            .count();
        BootState {
            lines,
            text_visible: elapsed_ms < self.text_hidden_at(),
            loading: elapsed_ms < self.loaded_at(),
            mounted: elapsed_ms < self.unmount_at(),
        }
    }

    pub fn is_complete(&self, elapsed_ms: u64) -> bool {
        !self.state_at(elapsed_ms).mounted
    }
}
