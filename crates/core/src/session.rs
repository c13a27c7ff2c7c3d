//! One mounted portfolio page: scroll, scene, registry and nav bar wired
//! together the way a host (browser bridge or terminal preview) drives them.

use scrollwork_protocol::{StyleBatch, Viewport};
use serde::Serialize;
use thiserror::Error;

use crate::config::MotionConfig;
use crate::layout::LayoutProbe;
use crate::nav::{ActiveLinkStrategy, NavCoordinator, NavEvent, NavLink, jump_target};
use crate::registry::SectionRegistry;
use crate::scene::{SceneError, ScopeId, ScrollScene};
use crate::scroll::{ScrollFrame, ScrollSource, SmoothScroll};
use crate::sections::{MotionProfile, PageContent, page_controllers};
use crate::timeline::TimelineError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// What one frame produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameOutput {
    pub styles: StyleBatch,
    pub nav: Vec<NavEvent>,
}

pub struct PageSession {
    config: MotionConfig,
    content: PageContent,
    prefers_reduced_motion: bool,
    profile: MotionProfile,
    scene: ScrollScene,
    scope: ScopeId,
    registry: SectionRegistry,
    source: ScrollSource,
    smooth: SmoothScroll,
    nav: NavCoordinator,
    locked: bool,
}

impl std::fmt::Debug for PageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSession")
            .field("profile", &self.profile)
            .field("scene", &self.scene)
            .field("position", &self.source.position())
            .finish_non_exhaustive()
    }
}

impl PageSession {
    /// Mount every section for `viewport`.
    pub fn new(
        viewport: Viewport,
        prefers_reduced_motion: bool,
        content: PageContent,
        config: MotionConfig,
    ) -> Result<Self, SessionError> {
        let profile = MotionProfile::classify(viewport.width, prefers_reduced_motion, &config);
        let mut scene = ScrollScene::new();
        let scope = scene.new_scope();
        let mut registry = SectionRegistry::new();
        for controller in page_controllers(profile, &content, &config)? {
            scene.mount(scope, controller, &mut registry)?;
        }
        let nav = NavCoordinator::new(NavLink::portfolio(), ActiveLinkStrategy::Registry, &config);
        tracing::info!(?profile, sections = scene.len(), "page mounted");
        Ok(Self {
            smooth: SmoothScroll::new(config.smooth_scroll_duration_s),
            config,
            content,
            prefers_reduced_motion,
            profile,
            scene,
            scope,
            registry,
            source: ScrollSource::new(viewport),
            nav,
            locked: false,
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn profile(&self) -> MotionProfile {
        self.profile
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SectionRegistry {
        &mut self.registry
    }

    pub fn scene(&self) -> &ScrollScene {
        &self.scene
    }

    pub fn nav(&self) -> &NavCoordinator {
        &self.nav
    }

    pub fn frame(&self) -> ScrollFrame {
        self.source.frame()
    }

    pub fn is_gliding(&self) -> bool {
        self.smooth.is_animating()
    }

    /// Hold the scroll in place, e.g. while the boot loader is up.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Document height minus the viewport; glides stop there.
    pub fn set_scroll_limit(&mut self, limit: f64) {
        self.smooth.set_limit(limit);
    }

    /// Wheel or key scroll, smoothed.
    pub fn scroll_by(&mut self, delta: f64) {
        if !self.locked {
            self.smooth.scroll_by(delta);
        }
    }

    /// Move immediately. Returns the position the scroll ended up at.
    pub fn jump_to(&mut self, y: f64) -> f64 {
        if !self.locked {
            self.smooth.jump_to(y);
            self.source.set_position(self.smooth.current());
        }
        self.source.position()
    }

    /// Advance any glide by `dt_s`. Returns the new position if it moved;
    /// the host scrolls its layout there, then calls [`render`](Self::render).
    pub fn advance(&mut self, dt_s: f64) -> Option<f64> {
        let y = self.smooth.advance(dt_s);
        self.source.set_position(y).map(|update| update.frame.scroll_y)
    }

    /// Run a frame at the current position without moving.
    pub fn render(&mut self, probe: &dyn LayoutProbe) -> FrameOutput {
        let frame = self.source.frame();
        let styles = self.scene.tick(probe, &frame, &mut self.registry);
        let nav = self.nav.update(&frame, &self.registry, probe);
        FrameOutput { styles, nav }
    }

    /// Click nav link `index`; starts the glide unless the menu defers it.
    pub fn follow_link(&mut self, index: usize, probe: &dyn LayoutProbe) -> Vec<NavEvent> {
        let events = self.nav.click(index);
        for event in &events {
            self.start_jump(event, probe);
        }
        events
    }

    pub fn toggle_menu(&mut self) -> NavEvent {
        self.nav.toggle_menu()
    }

    /// The mobile menu finished closing.
    pub fn menu_closed(&mut self, probe: &dyn LayoutProbe) -> Option<NavEvent> {
        let event = self.nav.menu_closed()?;
        self.start_jump(&event, probe);
        Some(event)
    }

    fn start_jump(&mut self, event: &NavEvent, probe: &dyn LayoutProbe) {
        let NavEvent::ScrollTo { anchor, duration_s } = event else {
            return;
        };
        if self.locked {
            return;
        }
        match jump_target(probe, &self.source.frame(), anchor) {
            Some(target) => self.smooth.scroll_to(target, Some(*duration_s)),
            None => tracing::warn!(%anchor, "nav anchor is not mounted"),
        }
    }

    /// Apply a viewport change. A motion-profile change remounts the whole
    /// page; returns whether that happened.
    pub fn resize(
        &mut self,
        viewport: Viewport,
        prefers_reduced_motion: bool,
    ) -> Result<bool, SessionError> {
        self.source.resize(viewport);
        self.prefers_reduced_motion = prefers_reduced_motion;
        let profile = MotionProfile::classify(viewport.width, prefers_reduced_motion, &self.config);
        if profile == self.profile {
            return Ok(false);
        }
        let controllers = page_controllers(profile, &self.content, &self.config)?;
        self.scene.swap_scope(self.scope, controllers, &mut self.registry)?;
        tracing::info!(from = ?self.profile, to = ?profile, "motion profile changed");
        self.profile = profile;
        Ok(true)
    }

    /// Re-classify with the current viewport, e.g. when the reduced-motion
    /// preference flips.
    pub fn set_prefers_reduced_motion(&mut self, prefers: bool) -> Result<bool, SessionError> {
        self.resize(self.source.viewport(), prefers)
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.prefers_reduced_motion
    }

    /// Release every controller; later frames write nothing.
    pub fn teardown(&mut self) -> usize {
        self.scene.revoke(self.scope)
    }
}
