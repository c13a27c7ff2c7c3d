//! Integration test: mount the whole portfolio page, scroll through it, and
//! check what the registry, nav bar, and style stream see.

use scrollwork_core::controllers::{PinnedTimeline, TransitionEngine, TransitionFlags};
use scrollwork_core::nav::{NavCoordinator, NavEvent, NavLink, jump_target};
use scrollwork_core::sections::{
    ArchitectureKeys, ArchitecturePhase, ArchitectureScript, MotionProfile, PageContent,
    SectionKind, page_controllers, page_layout,
};
use scrollwork_core::{
    ActiveLinkStrategy, LayoutProbe, MotionConfig, ScopeId, ScrollScene, ScrollSource,
    SectionController, SectionRegistry, StaticLayout,
};
use scrollwork_protocol::{Rect, SectionId, SectionSnapshot, SectionStatus, StyleCommand, Viewport};

const DESKTOP: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};

fn content() -> PageContent {
    PageContent {
        experience_periods: vec![
            "April 2023 - Present".into(),
            "February 2017 - March 2023".into(),
            "June 2016 - December 2016".into(),
            "May 2015 - April 2016".into(),
        ],
    }
}

/// A mounted page driven by a plain scroll source.
struct Page {
    config: MotionConfig,
    layout: StaticLayout,
    scene: ScrollScene,
    registry: SectionRegistry,
    source: ScrollSource,
    scope: ScopeId,
}

impl Page {
    fn mount(profile: MotionProfile, viewport: Viewport) -> Self {
        let config = MotionConfig::default();
        let content = content();
        let layout = page_layout(profile, content.experience_periods.len(), viewport, &config);
        let mut scene = ScrollScene::new();
        let mut registry = SectionRegistry::new();
        let scope = scene.new_scope();
        let controllers =
            page_controllers(profile, &content, &config).expect("page controllers build");
        for controller in controllers {
            scene
                .mount(scope, controller, &mut registry)
                .expect("sections are unique");
        }
        Self {
            config,
            layout,
            scene,
            registry,
            source: ScrollSource::new(viewport),
            scope,
        }
    }

    fn top(&self, kind: SectionKind) -> f64 {
        self.layout
            .document_rect(kind.as_str())
            .map(|r| r.y)
            .expect("section is laid out")
    }

    fn max_scroll(&self) -> f64 {
        (self.layout.document_height() - self.source.viewport().height).max(0.0)
    }

    fn tick(&mut self) -> Vec<StyleCommand> {
        self.layout.set_scroll(self.source.position());
        let frame = self.source.frame();
        self.scene.tick(&self.layout, &frame, &mut self.registry)
    }

    fn scroll_to(&mut self, y: f64) -> Vec<StyleCommand> {
        self.source.set_position(y);
        self.tick()
    }
}

fn assert_styles_in_range(commands: &[StyleCommand]) {
    for command in commands {
        if let StyleCommand::SetStyle { target, style } = command {
            assert!(
                (-1e-9..=1.0 + 1e-9).contains(&style.opacity),
                "{target}: opacity {} out of range",
                style.opacity
            );
            assert!(style.scale.is_finite(), "{target}: scale not finite");
        }
    }
}

#[test]
fn registered_section_reads_idle_zero() {
    let mut registry = SectionRegistry::new();
    registry.register(&SectionId::from("hero"));
    assert_eq!(
        registry.snapshot("hero"),
        SectionSnapshot::new(SectionStatus::Idle, 0.0)
    );
}

#[test]
fn entry_only_fade_reports_midpoint_then_settles() {
    let mut layout = StaticLayout::new();
    layout.insert("about", Rect::new(0.0, 2000.0, 1280.0, 1000.0));
    layout.insert("about/content", Rect::new(0.0, 2000.0, 1280.0, 1000.0));
    let flags = TransitionFlags {
        enable_entry: true,
        enable_exit: false,
        is_pinned: false,
    };
    let mut engine = TransitionEngine::new("about", "about", "about/content", flags);
    let mut registry = SectionRegistry::new();
    let mut source = ScrollSource::new(DESKTOP);

    let mut drive = |y: f64, registry: &mut SectionRegistry| {
        source.set_position(y);
        layout.set_scroll(source.position());
        let frame = source.frame();
        let mut out = Vec::new();
        if engine.measure(&layout, &frame) {
            engine.apply(&frame, registry, &mut out);
        }
    };

    // Entry range runs from 1200 (top at viewport bottom) to 2000.
    drive(100.0, &mut registry);
    assert_eq!(registry.status("about"), SectionStatus::Idle);

    drive(1600.0, &mut registry);
    let mid = registry.snapshot("about");
    assert_eq!(mid.status, SectionStatus::Entering);
    assert!((mid.progress - 0.5).abs() < 1e-9);

    drive(2400.0, &mut registry);
    assert_eq!(
        registry.snapshot("about"),
        SectionSnapshot::new(SectionStatus::Active, 1.0)
    );
}

#[test]
fn architecture_pin_reports_focus_hardware_at_three_tenths() {
    let root = SectionKind::About.root();
    let script = ArchitectureScript::new(ArchitectureKeys::under(&root)).expect("valid phases");
    let mut timeline = PinnedTimeline::new("about", root, script, 3.0);

    let mut layout = StaticLayout::new();
    layout.insert("about", Rect::new(0.0, 1000.0, 1280.0, 800.0));
    let mut registry = SectionRegistry::new();
    let mut source = ScrollSource::new(DESKTOP);

    // Pin spans 3 * 800 = 2400px from the section top.
    source.set_position(1000.0 + 0.3 * 2400.0);
    layout.set_scroll(source.position());
    let frame = source.frame();
    assert!(timeline.measure(&layout, &frame));
    let mut out = Vec::new();
    timeline.apply(&frame, &mut registry, &mut out);

    let sample = timeline.current().expect("timeline wrote a state");
    assert_eq!(sample.phase, ArchitecturePhase::FocusHardware);
    assert!((sample.local - 0.5).abs() < 1e-6, "local = {}", sample.local);
    assert_eq!(registry.status("about"), SectionStatus::Active);
    assert!((registry.progress("about") - 0.3).abs() < 1e-9);
    assert!(out.iter().any(|c| matches!(c, StyleCommand::SetPinned { pinned: true, .. })));
}

#[test]
fn revoked_section_stops_reporting() {
    let mut page = Page::mount(MotionProfile::Full, DESKTOP);
    let about = page.top(SectionKind::About);
    page.tick();
    page.scroll_to(about + 600.0);
    let writes = page.registry.writes("about");
    assert!(writes > 0);

    assert_eq!(page.scene.revoke(page.scope), SectionKind::ALL.len());
    for step in 1..=20 {
        let out = page.scroll_to(about + 600.0 + step as f64 * 50.0);
        assert!(out.is_empty());
    }
    assert_eq!(page.registry.writes("about"), writes);
}

#[test]
fn full_page_sweep_keeps_progress_and_styles_in_range() {
    let mut page = Page::mount(MotionProfile::Full, DESKTOP);
    assert_styles_in_range(&page.tick());
    assert_eq!(page.registry.status("hero"), SectionStatus::Active);

    let end = page.max_scroll();
    let mut y = 0.0;
    while y < end {
        y = (y + 37.0).min(end);
        let out = page.scroll_to(y);
        assert_styles_in_range(&out);
        for id in page.registry.ids() {
            let p = page.registry.progress(id.as_str());
            assert!((0.0..=1.0).contains(&p), "{id}: progress {p}");
        }
    }

    assert_eq!(page.registry.status("hero"), SectionStatus::Exiting);
    assert_eq!(page.registry.status("about"), SectionStatus::Exiting);
    assert_eq!(page.registry.status("skills"), SectionStatus::Exiting);
    assert!(page.registry.status("contact").is_visible());
}

#[test]
fn sweeping_back_returns_hero_to_active() {
    let mut page = Page::mount(MotionProfile::Full, DESKTOP);
    page.tick();
    let about = page.top(SectionKind::About);
    let mut y = 0.0;
    while y < about {
        y += 50.0;
        page.scroll_to(y);
    }
    assert_eq!(page.registry.status("hero"), SectionStatus::Exiting);
    while y > 0.0 {
        y = (y - 50.0).max(0.0);
        page.scroll_to(y);
    }
    assert_eq!(
        page.registry.snapshot("hero"),
        SectionSnapshot::new(SectionStatus::Active, 0.0)
    );
    assert_eq!(page.registry.status("about"), SectionStatus::Idle);
}

#[test]
fn nav_follows_the_registry() {
    let mut page = Page::mount(MotionProfile::Full, DESKTOP);
    let mut nav = NavCoordinator::new(
        NavLink::portfolio(),
        ActiveLinkStrategy::Registry,
        &page.config,
    );
    page.tick();
    let events = nav.update(&page.source.frame(), &page.registry, &page.layout);
    assert!(events.is_empty(), "hero is not a nav link: {events:?}");

    let about = page.top(SectionKind::About);
    page.scroll_to(about + 0.3 * 3.0 * DESKTOP.height);
    let events = nav.update(&page.source.frame(), &page.registry, &page.layout);
    assert!(events.contains(&NavEvent::Morphed { scrolled: true }));
    assert!(events.contains(&NavEvent::ActiveChanged {
        section: Some(SectionId::from("about"))
    }));
    assert_eq!(nav.active().map(SectionId::as_str), Some("about"));
}

#[test]
fn nav_jump_lands_on_the_section() {
    let mut page = Page::mount(MotionProfile::Full, DESKTOP);
    page.tick();
    let mut nav = NavCoordinator::new(
        NavLink::portfolio(),
        ActiveLinkStrategy::Geometry,
        &page.config,
    );
    let Some(NavEvent::ScrollTo { anchor, .. }) = nav.click(1).into_iter().next() else {
        panic!("clicking a link scrolls");
    };
    let target = jump_target(&page.layout, &page.source.frame(), &anchor).expect("anchor exists");
    assert_eq!(target, page.top(SectionKind::Experience));

    page.scroll_to(target);
    nav.update(&page.source.frame(), &page.registry, &page.layout);
    assert_eq!(nav.active().map(SectionId::as_str), Some("experience"));
    assert!(page.layout.rect(&anchor).is_some_and(|r| r.y.abs() < 1e-9));
}

#[test]
fn breakpoint_change_swaps_the_whole_page() {
    let mut page = Page::mount(MotionProfile::Full, DESKTOP);
    page.tick();
    page.scroll_to(page.top(SectionKind::Experience) + 400.0);

    let phone = Viewport::new(390.0, 844.0);
    let profile = MotionProfile::classify(phone.width, false, &page.config);
    assert_eq!(profile, MotionProfile::Reduced);

    let content = content();
    let controllers =
        page_controllers(profile, &content, &page.config).expect("page controllers build");
    let swapped = page
        .scene
        .swap_scope(page.scope, controllers, &mut page.registry)
        .expect("no clash with other scopes");
    assert_eq!(swapped, SectionKind::ALL.len());
    assert_eq!(page.scene.len(), SectionKind::ALL.len());
    let kinds: Vec<&str> = page.scene.controllers().map(|c| c.kind()).collect();
    assert!(kinds.contains(&"stacked-cards"));
    assert!(!kinds.contains(&"pinned-timeline"));

    page.layout = page_layout(profile, content.experience_periods.len(), phone, &page.config);
    page.source.resize(phone);
    page.scroll_to(0.0);
    let end = page.max_scroll();
    let mut y = 0.0;
    while y < end {
        y = (y + 61.0).min(end);
        assert_styles_in_range(&page.scroll_to(y));
    }
    assert_eq!(page.registry.status("skills"), SectionStatus::Exiting);
}
