//! Preview state: one page session over a synthetic layout, driven by a
//! frame clock and key actions.

use anyhow::Result;
use scrollwork_core::{
    BootSequence, BootState, MotionConfig, NavEvent, PageContent, PageSession, StaticLayout,
    page_layout,
};
use scrollwork_protocol::Viewport;

use crate::renderer::StyleSheet;

pub const DESKTOP: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};

pub const PHONE: Viewport = Viewport {
    width: 390.0,
    height: 844.0,
};

/// Time the mobile menu takes to close before a deferred jump starts.
const MENU_CLOSE_S: f64 = 0.3;

pub fn demo_content() -> PageContent {
    PageContent {
        experience_periods: vec![
            "April 2023 - Present".into(),
            "February 2017 - March 2023".into(),
            "June 2016 - December 2016".into(),
            "May 2015 - April 2016".into(),
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Relative scroll in viewport heights.
    ScrollBy(f64),
    Top,
    Bottom,
    Link(usize),
    ToggleMenu,
    ToggleBreakpoint,
    ToggleReducedMotion,
    Quit,
}

pub struct App {
    pub session: PageSession,
    pub layout: StaticLayout,
    pub sheet: StyleSheet,
    pub viewport: Viewport,
    /// Commands in the most recent non-empty batch.
    pub last_batch: usize,
    pub quit: bool,
    boot: BootSequence,
    boot_ms: f64,
    cards: usize,
    reduced_motion: bool,
    menu_closing: Option<f64>,
}

impl App {
    pub fn new(config: MotionConfig, narrow: bool, reduced_motion: bool) -> Result<Self> {
        let viewport = if narrow { PHONE } else { DESKTOP };
        let content = demo_content();
        let cards = content.experience_periods.len();
        let boot = BootSequence::new(config.boot.clone(), false);
        let session = PageSession::new(viewport, reduced_motion, content, config)?;
        let mut app = Self {
            session,
            layout: StaticLayout::new(),
            sheet: StyleSheet::default(),
            viewport,
            last_batch: 0,
            quit: false,
            boot,
            boot_ms: 0.0,
            cards,
            reduced_motion,
            menu_closing: None,
        };
        app.relayout();
        Ok(app)
    }

    pub fn boot_state(&self) -> BootState {
        self.boot.state_at(self.boot_ms as u64)
    }

    pub fn max_scroll(&self) -> f64 {
        (self.layout.document_height() - self.viewport.height).max(0.0)
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Rebuild the synthetic document for the current viewport and profile.
    fn relayout(&mut self) {
        self.layout = page_layout(
            self.session.profile(),
            self.cards,
            self.viewport,
            self.session.config(),
        );
        let max = self.max_scroll();
        self.session.set_scroll_limit(max);
        let y = self.session.frame().scroll_y.min(max);
        let y = self.session.jump_to(y);
        self.layout.set_scroll(y);
    }

    /// Advance every clock by `dt_s` and run one frame.
    pub fn step(&mut self, dt_s: f64) {
        self.boot_ms += dt_s * 1000.0;
        self.session.set_locked(self.boot_state().loading);

        if let Some(left) = self.menu_closing.as_mut() {
            *left -= dt_s;
            if *left <= 0.0 {
                self.menu_closing = None;
                if let Some(event) = self.session.menu_closed(&self.layout) {
                    tracing::debug!(?event, "deferred nav jump released");
                }
            }
        }

        if let Some(y) = self.session.advance(dt_s) {
            self.layout.set_scroll(y);
        }
        let out = self.session.render(&self.layout);
        if !out.styles.is_empty() {
            self.last_batch = out.styles.len();
            self.sheet.apply(&out.styles);
        }
        for event in &out.nav {
            tracing::debug!(?event, "nav");
        }
    }

    pub fn handle(&mut self, action: Action) -> Result<()> {
        match action {
            Action::ScrollBy(viewports) => {
                self.session.scroll_by(viewports * self.viewport.height);
            }
            Action::Top => {
                let y = self.session.jump_to(0.0);
                self.layout.set_scroll(y);
            }
            Action::Bottom => {
                let max = self.max_scroll();
                let y = self.session.jump_to(max);
                self.layout.set_scroll(y);
            }
            Action::Link(index) => {
                let events = self.session.follow_link(index, &self.layout);
                if events.contains(&NavEvent::MenuToggled { open: false }) {
                    self.menu_closing = Some(MENU_CLOSE_S);
                }
            }
            Action::ToggleMenu => {
                self.session.toggle_menu();
            }
            Action::ToggleBreakpoint => {
                self.viewport = if self.viewport == DESKTOP { PHONE } else { DESKTOP };
                let swapped = self.session.resize(self.viewport, self.reduced_motion)?;
                self.remount(swapped);
            }
            Action::ToggleReducedMotion => {
                self.reduced_motion = !self.reduced_motion;
                let swapped = self.session.set_prefers_reduced_motion(self.reduced_motion)?;
                self.remount(swapped);
            }
            Action::Quit => self.quit = true,
        }
        Ok(())
    }

    fn remount(&mut self, swapped: bool) {
        if swapped {
            // New markup: nothing the old controllers wrote applies.
            self.sheet.clear();
        }
        self.relayout();
    }
}
