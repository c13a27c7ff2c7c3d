//! Navigation bar state: scroll-threshold morph, active link, and the
//! deferred scroll of the mobile menu.

use scrollwork_protocol::{ElementKey, SectionId, SectionStatus};
use serde::Serialize;

use crate::config::MotionConfig;
use crate::layout::LayoutProbe;
use crate::registry::SectionRegistry;
use crate::scroll::ScrollFrame;

#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub label: String,
    pub section: SectionId,
    /// Element scrolled to when the link is followed.
    pub anchor: ElementKey,
}

impl NavLink {
    pub fn new(label: impl Into<String>, section: &str) -> Self {
        Self {
            label: label.into(),
            section: SectionId::from(section),
            anchor: ElementKey::from(section),
        }
    }

    pub fn portfolio() -> Vec<NavLink> {
        vec![
            NavLink::new("About", "about"),
            NavLink::new("Experience", "experience"),
            NavLink::new("Skills", "skills"),
            NavLink::new("Contact", "contact"),
        ]
    }
}

/// How the active link is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveLinkStrategy {
    /// Trust the section registry.
    #[default]
    Registry,
    /// Recompute from element geometry: the section under a probe line a
    /// third of the way down the viewport.
    Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavEvent {
    /// Crossed the scroll threshold.
    Morphed { scrolled: bool },
    ActiveChanged { section: Option<SectionId> },
    MenuToggled { open: bool },
    /// Smooth-scroll to `anchor`.
    ScrollTo { anchor: ElementKey, duration_s: f64 },
}

#[derive(Debug, Clone)]
pub struct NavCoordinator {
    links: Vec<NavLink>,
    strategy: ActiveLinkStrategy,
    threshold: f64,
    jump_duration_s: f64,
    scrolled: bool,
    active: Option<SectionId>,
    menu_open: bool,
    pending: Option<ElementKey>,
}

impl NavCoordinator {
    pub fn new(links: Vec<NavLink>, strategy: ActiveLinkStrategy, config: &MotionConfig) -> Self {
        Self {
            links,
            strategy,
            threshold: config.nav_threshold_px,
            jump_duration_s: config.nav_jump_duration_s,
            scrolled: false,
            active: None,
            menu_open: false,
            pending: None,
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn strategy(&self) -> ActiveLinkStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: ActiveLinkStrategy) {
        self.strategy = strategy;
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// Re-evaluate after a frame. Returns only what changed.
    pub fn update(
        &mut self,
        frame: &ScrollFrame,
        registry: &SectionRegistry,
        probe: &dyn LayoutProbe,
    ) -> Vec<NavEvent> {
        let mut events = Vec::new();
        let scrolled = frame.scroll_y > self.threshold;
        if scrolled != self.scrolled {
            self.scrolled = scrolled;
            events.push(NavEvent::Morphed { scrolled });
        }

        let active = match self.strategy {
            ActiveLinkStrategy::Registry => self.active_from_registry(registry),
            ActiveLinkStrategy::Geometry => self.active_from_geometry(frame, probe),
        };
        if active != self.active {
            let section = active.as_ref().map(SectionId::as_str);
            tracing::debug!(?section, "active nav link changed");
            self.active = active.clone();
            events.push(NavEvent::ActiveChanged { section: active });
        }
        events
    }

    /// Entering or active sections; active ranks above entering, then the
    /// most recent status change wins, then link order.
    fn active_from_registry(&self, registry: &SectionRegistry) -> Option<SectionId> {
        let rank = |status: SectionStatus| match status {
            SectionStatus::Active => Some(1),
            SectionStatus::Entering => Some(0),
            _ => None,
        };
        let mut best: Option<(i32, u64, &NavLink)> = None;
        for link in &self.links {
            let Some(r) = rank(registry.status(link.section.as_str())) else {
                continue;
            };
            let changed = registry.last_change(link.section.as_str()).unwrap_or(0);
            if best.is_none_or(|(br, bc, _)| (r, changed) > (br, bc)) {
                best = Some((r, changed, link));
            }
        }
        best.map(|(_, _, link)| link.section.clone())
    }

    fn active_from_geometry(
        &self,
        frame: &ScrollFrame,
        probe: &dyn LayoutProbe,
    ) -> Option<SectionId> {
        let line = frame.viewport.height / 3.0;
        self.links
            .iter()
            .find(|link| probe.rect(&link.anchor).is_some_and(|r| r.contains_y(line)))
            .map(|link| link.section.clone())
    }

    pub fn toggle_menu(&mut self) -> NavEvent {
        self.menu_open = !self.menu_open;
        NavEvent::MenuToggled {
            open: self.menu_open,
        }
    }

    /// Follow link `index`. With the mobile menu open the scroll waits for
    /// [`menu_closed`](Self::menu_closed), so the menu's exit animation does
    /// not fight the scroll.
    pub fn click(&mut self, index: usize) -> Vec<NavEvent> {
        let Some(link) = self.links.get(index) else {
            return Vec::new();
        };
        let anchor = link.anchor.clone();
        if self.menu_open {
            self.pending = Some(anchor);
            self.menu_open = false;
            return vec![NavEvent::MenuToggled { open: false }];
        }
        vec![self.jump(anchor)]
    }

    /// The menu finished closing; release a deferred scroll, if any.
    pub fn menu_closed(&mut self) -> Option<NavEvent> {
        let anchor = self.pending.take()?;
        Some(self.jump(anchor))
    }

    fn jump(&self, anchor: ElementKey) -> NavEvent {
        NavEvent::ScrollTo {
            anchor,
            duration_s: self.jump_duration_s,
        }
    }
}

/// Document offset that brings `anchor` to the top of the viewport.
pub fn jump_target(
    probe: &dyn LayoutProbe,
    frame: &ScrollFrame,
    anchor: &ElementKey,
) -> Option<f64> {
    probe.rect(anchor).map(|r| r.top() + frame.scroll_y)
}
