//! Section controllers: every implementation of [`SectionController`] the
//! page mounts.
//!
//! [`SectionController`]: crate::scene::SectionController

pub mod pinned;
pub mod stack;
pub mod track;
pub mod transition;

pub use pinned::{PhaseScript, PinnedTimeline, VisualState, late_exit};
pub use stack::{StackKeys, StackedCards};
pub use track::{HorizontalTrack, LabelSwap, TrackKeys, TrackSettings, focus_pass};
pub use transition::{TransitionEngine, TransitionFlags};
