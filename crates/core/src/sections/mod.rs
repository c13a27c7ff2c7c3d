//! The portfolio page: which controller drives which section, per motion
//! profile.
//!
//! Narrow viewports and reduced-motion users get [`MotionProfile::Reduced`],
//! which swaps every spatial choreography for a plain entry/exit fade (or,
//! for the experience section, the stacked-card variant). The choice is made
//! once per mount; a breakpoint change swaps the whole scope.

pub mod architecture;
pub mod hero;
pub mod page;

use scrollwork_protocol::{ElementKey, SectionId};
use serde::Deserialize;

use crate::config::MotionConfig;
use crate::controllers::{
    HorizontalTrack, PinnedTimeline, StackKeys, StackedCards, TrackKeys, TrackSettings,
    TransitionEngine, TransitionFlags,
};
use crate::scene::SectionController;
use crate::timeline::TimelineError;

pub use architecture::{ArchitectureKeys, ArchitecturePhase, ArchitectureScript};
pub use hero::{HeroKeys, HeroPhase, HeroScript};
pub use page::page_layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionProfile {
    Full,
    Reduced,
}

impl MotionProfile {
    pub fn classify(
        viewport_width: f64,
        prefers_reduced_motion: bool,
        config: &MotionConfig,
    ) -> Self {
        if prefers_reduced_motion || viewport_width < config.mobile_breakpoint_px {
            MotionProfile::Reduced
        } else {
            MotionProfile::Full
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Hero,
    About,
    Experience,
    Skills,
    Contact,
}

impl SectionKind {
    /// Page order.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Hero,
        SectionKind::About,
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::About => "about",
            SectionKind::Experience => "experience",
            SectionKind::Skills => "skills",
            SectionKind::Contact => "contact",
        }
    }

    pub fn id(&self) -> SectionId {
        SectionId::from(self.as_str())
    }

    /// Root element key; every other element of the section lives under it.
    pub fn root(&self) -> ElementKey {
        ElementKey::from(self.as_str())
    }

    pub fn content(&self) -> ElementKey {
        self.root().child("content")
    }
}

/// Static page data the controllers need.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageContent {
    /// One period label per experience card, in card order.
    pub experience_periods: Vec<String>,
}

fn fade(kind: SectionKind, enable_entry: bool, enable_exit: bool) -> Box<dyn SectionController> {
    let flags = TransitionFlags {
        enable_entry,
        enable_exit,
        is_pinned: false,
    };
    Box::new(TransitionEngine::new(
        kind.id(),
        kind.root(),
        kind.content(),
        flags,
    ))
}

/// Build the controller for one section.
pub fn controller_for(
    kind: SectionKind,
    profile: MotionProfile,
    content: &PageContent,
    config: &MotionConfig,
) -> Result<Box<dyn SectionController>, TimelineError> {
    let root = kind.root();
    let cards = content.experience_periods.len();
    let controller: Box<dyn SectionController> = match (kind, profile) {
        (SectionKind::Hero, MotionProfile::Full) => {
            let script = HeroScript::new(HeroKeys::under(&root), config.hero_exit_threshold)?;
            Box::new(PinnedTimeline::new(kind.id(), root, script, config.hero_pin_viewports))
        }
        // Already on screen at load: nothing to enter.
        (SectionKind::Hero, MotionProfile::Reduced) => fade(kind, false, true),

        (SectionKind::About, MotionProfile::Full) => {
            let script = ArchitectureScript::new(ArchitectureKeys::under(&root))?;
            Box::new(
                PinnedTimeline::new(kind.id(), root, script, config.about_pin_viewports)
                    .with_entry(kind.content()),
            )
        }
        (SectionKind::About, MotionProfile::Reduced) => fade(kind, true, true),

        (SectionKind::Experience, MotionProfile::Full) => Box::new(
            HorizontalTrack::new(
                kind.id(),
                TrackKeys::under(&root, cards),
                content.experience_periods.clone(),
                TrackSettings::from_config(config),
            )
            .with_entry(),
        ),
        (SectionKind::Experience, MotionProfile::Reduced) => Box::new(StackedCards::new(
            kind.id(),
            StackKeys::under(&root, cards),
            content.experience_periods.clone(),
            config.stack_viewports_per_card,
        )),

        (SectionKind::Skills, _) => fade(kind, true, true),
        (SectionKind::Contact, _) => fade(kind, true, false),
    };
    Ok(controller)
}

/// One controller per section, in page order.
pub fn page_controllers(
    profile: MotionProfile,
    content: &PageContent,
    config: &MotionConfig,
) -> Result<Vec<Box<dyn SectionController>>, TimelineError> {
    SectionKind::ALL
        .iter()
        .map(|&kind| controller_for(kind, profile, content, config))
        .collect()
}
