use scrollwork_protocol::{
    ElementKey, Rect, SectionId, SectionStatus, StyleChannels, StyleCommand, Viewport,
};

use crate::ease::{Ease, lerp};
use crate::layout::LayoutProbe;
use crate::registry::SectionRegistry;
use crate::scene::SectionController;
use crate::scroll::{ScrollDirection, ScrollFrame};
use crate::trigger::{ScrubTrigger, TriggerEvent, TriggerRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionFlags {
    pub enable_entry: bool,
    pub enable_exit: bool,
    /// Another controller pins this section and owns the content's style
    /// once entry completes.
    pub is_pinned: bool,
}

impl Default for TransitionFlags {
    fn default() -> Self {
        Self {
            enable_entry: true,
            enable_exit: true,
            is_pinned: false,
        }
    }
}

/// Content style for the given entry and exit progress.
///
/// Entry fades `0 → 1` and grows `0.8 → 1`; exit fades `1 → 0` and grows
/// `1 → 1.2`. Exit takes precedence once it has started.
pub fn content_style(entry: Option<f64>, exit: Option<f64>) -> StyleChannels {
    if let Some(e) = exit.filter(|e| *e > 0.0) {
        let t = Ease::Power1In.apply(e);
        return StyleChannels::default()
            .with_opacity(1.0 - t)
            .with_scale(lerp(1.0, 1.2, t));
    }
    match entry {
        Some(p) => {
            let t = Ease::Power1Out.apply(p);
            StyleChannels::default()
                .with_opacity(t)
                .with_scale(lerp(0.8, 1.0, t))
        }
        None => StyleChannels::default(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Measured {
    section: Rect,
    viewport: Viewport,
}

/// Scroll-linked entry/exit fade for one section's content.
///
/// The exit range never starts before the entry range ends, so for sections
/// shorter than the viewport the two ranges run back to back instead of
/// overlapping: the content always reaches full opacity before it begins to
/// fade out, and only one range ever writes the section's progress.
#[derive(Debug, Clone)]
pub struct TransitionEngine {
    id: SectionId,
    section: ElementKey,
    content: ElementKey,
    flags: TransitionFlags,
    entry: ScrubTrigger,
    exit: ScrubTrigger,
    measured: Option<Measured>,
    announced: bool,
    entry_progress: f64,
    exit_progress: f64,
    last_style: Option<StyleChannels>,
}

impl TransitionEngine {
    pub fn new(
        id: impl Into<SectionId>,
        section: impl Into<ElementKey>,
        content: impl Into<ElementKey>,
        flags: TransitionFlags,
    ) -> Self {
        let empty = TriggerRange::new(0.0, 0.0);
        Self {
            id: id.into(),
            section: section.into(),
            content: content.into(),
            flags,
            entry: ScrubTrigger::new(empty),
            exit: ScrubTrigger::new(empty),
            measured: None,
            announced: false,
            entry_progress: 0.0,
            exit_progress: 0.0,
            last_style: None,
        }
    }

    pub fn content(&self) -> &ElementKey {
        &self.content
    }

    pub fn flags(&self) -> TransitionFlags {
        self.flags
    }

    pub fn entry_range(&self) -> TriggerRange {
        self.entry.range()
    }

    pub fn exit_range(&self) -> TriggerRange {
        self.exit.range()
    }

    /// Progress reported once the section is fully settled on screen.
    fn settled_progress(&self) -> f64 {
        if self.flags.enable_entry { 1.0 } else { 0.0 }
    }

    fn refresh(&mut self, section: Rect, viewport: Viewport) {
        let m = Measured { section, viewport };
        if self.measured == Some(m) {
            return;
        }
        let entry = TriggerRange::entry(&section, viewport.height);
        let mut exit = TriggerRange::exit(&section, viewport.height);
        exit.start = exit.start.max(entry.end);
        self.entry.set_range(entry);
        self.exit.set_range(exit);
        self.measured = Some(m);
    }

    fn run_entry(&mut self, y: f64, registry: &mut SectionRegistry) -> bool {
        let mut moved = false;
        for event in self.entry.update(y) {
            match event {
                TriggerEvent::Update(p) => {
                    registry.update_status(&self.id, SectionStatus::Entering, p);
                    self.entry_progress = p;
                    moved = true;
                }
                TriggerEvent::Leave => {
                    registry.update_status(&self.id, SectionStatus::Active, 1.0);
                }
                TriggerEvent::EnterBack => {
                    registry.update_status(&self.id, SectionStatus::Entering, 1.0);
                }
                TriggerEvent::LeaveBack => {
                    registry.update_status(&self.id, SectionStatus::Idle, 0.0);
                }
                TriggerEvent::Enter | TriggerEvent::Toggle(_) => {}
            }
        }
        moved
    }

    fn run_exit(&mut self, y: f64, registry: &mut SectionRegistry) -> bool {
        let mut moved = false;
        for event in self.exit.update(y) {
            match event {
                TriggerEvent::Update(p) => {
                    if p > 0.0 {
                        registry.update_status(&self.id, SectionStatus::Exiting, p);
                    } else {
                        let settled = self.settled_progress();
                        registry.update_status(&self.id, SectionStatus::Active, settled);
                    }
                    self.exit_progress = p;
                    moved = true;
                }
                TriggerEvent::EnterBack => {
                    registry.update_status(&self.id, SectionStatus::Exiting, 1.0);
                }
                TriggerEvent::LeaveBack => {
                    let settled = self.settled_progress();
                    registry.update_status(&self.id, SectionStatus::Active, settled);
                }
                TriggerEvent::Enter | TriggerEvent::Leave | TriggerEvent::Toggle(_) => {}
            }
        }
        moved
    }

    fn current_style(&self) -> StyleChannels {
        let entry = self.flags.enable_entry.then_some(self.entry_progress);
        let exit = self.flags.enable_exit.then_some(self.exit_progress);
        content_style(entry, exit)
    }

    /// Whether the content's style is currently ours to write.
    fn owns_content(&self) -> bool {
        if !(self.flags.enable_entry || self.flags.enable_exit) {
            return false;
        }
        !self.flags.is_pinned || self.entry_progress < 1.0 || self.entry.is_active()
    }
}

impl SectionController for TransitionEngine {
    fn section_id(&self) -> &SectionId {
        &self.id
    }

    fn measure(&mut self, probe: &dyn LayoutProbe, frame: &ScrollFrame) -> bool {
        let Some(section) = probe.rect(&self.section) else {
            return false;
        };
        if probe.rect(&self.content).is_none() {
            return false;
        }
        self.refresh(section.offset_y(frame.scroll_y), frame.viewport);
        true
    }

    fn apply(
        &mut self,
        frame: &ScrollFrame,
        registry: &mut SectionRegistry,
        out: &mut Vec<StyleCommand>,
    ) {
        if !self.flags.enable_entry && !self.announced {
            registry.update_status(&self.id, SectionStatus::Active, 0.0);
            self.announced = true;
        }

        let y = frame.scroll_y;
        // The range the scroll is moving into reports last.
        let moved = match frame.direction {
            ScrollDirection::Forward => {
                let a = self.flags.enable_entry && self.run_entry(y, registry);
                let b = self.flags.enable_exit && self.run_exit(y, registry);
                a || b
            }
            ScrollDirection::Backward => {
                let b = self.flags.enable_exit && self.run_exit(y, registry);
                let a = self.flags.enable_entry && self.run_entry(y, registry);
                a || b
            }
        };

        if !self.owns_content() {
            return;
        }
        let style = self.current_style();
        if moved || self.last_style.is_none() {
            if self.last_style != Some(style) {
                out.push(StyleCommand::SetStyle {
                    target: self.content.clone(),
                    style,
                });
            }
            self.last_style = Some(style);
        }
    }

    fn kind(&self) -> &'static str {
        "transition"
    }

    fn detail(&self) -> Option<String> {
        Some(format!(
            "entry {:.2} / exit {:.2}",
            self.entry_progress, self.exit_progress
        ))
    }
}

#[cfg(test)]
mod tests {
    use scrollwork_protocol::SectionSnapshot;

    use super::*;
    use crate::layout::StaticLayout;
    use crate::scroll::ScrollSource;

    const VH: f64 = 800.0;

    fn layout(top: f64, height: f64) -> StaticLayout {
        let mut layout = StaticLayout::new();
        layout.insert("about", Rect::new(0.0, top, 1280.0, height));
        layout.insert("about/content", Rect::new(0.0, top, 1280.0, height));
        layout
    }

    fn drive(
        engine: &mut TransitionEngine,
        layout: &mut StaticLayout,
        source: &mut ScrollSource,
        registry: &mut SectionRegistry,
        y: f64,
    ) -> Vec<StyleCommand> {
        source.set_position(y);
        layout.set_scroll(source.position());
        let frame = source.frame();
        let mut out = Vec::new();
        if engine.measure(layout, &frame) {
            engine.apply(&frame, registry, &mut out);
        }
        out
    }

    fn engine(flags: TransitionFlags) -> TransitionEngine {
        TransitionEngine::new("about", "about", "about/content", flags)
    }

    #[test]
    fn entry_reports_entering_then_active() {
        let mut layout = layout(1600.0, 1600.0);
        let mut source = ScrollSource::new(Viewport::new(1280.0, VH));
        let mut registry = SectionRegistry::new();
        let mut e = engine(TransitionFlags {
            enable_exit: false,
            ..TransitionFlags::default()
        });

        drive(&mut e, &mut layout, &mut source, &mut registry, 0.0);
        assert_eq!(registry.snapshot("about"), SectionSnapshot::default());

        // Entry range is 800..1600.
        drive(&mut e, &mut layout, &mut source, &mut registry, 1200.0);
        let snap = registry.snapshot("about");
        assert_eq!(snap.status, SectionStatus::Entering);
        assert!((snap.progress - 0.5).abs() < 1e-9);

        drive(&mut e, &mut layout, &mut source, &mut registry, 2000.0);
        assert_eq!(
            registry.snapshot("about"),
            SectionSnapshot::new(SectionStatus::Active, 1.0)
        );
    }

    #[test]
    fn scrolling_back_reenters_reversibly() {
        let mut layout = layout(1600.0, 1600.0);
        let mut source = ScrollSource::new(Viewport::new(1280.0, VH));
        let mut registry = SectionRegistry::new();
        let mut e = engine(TransitionFlags {
            enable_exit: false,
            ..TransitionFlags::default()
        });
        drive(&mut e, &mut layout, &mut source, &mut registry, 2000.0);
        assert_eq!(registry.status("about"), SectionStatus::Active);

        drive(&mut e, &mut layout, &mut source, &mut registry, 1600.0);
        assert_eq!(
            registry.snapshot("about"),
            SectionSnapshot::new(SectionStatus::Entering, 1.0)
        );

        drive(&mut e, &mut layout, &mut source, &mut registry, 0.0);
        assert_eq!(registry.status("about"), SectionStatus::Idle);
    }

    #[test]
    fn exit_reports_exiting_fraction() {
        let mut layout = layout(1600.0, 1600.0);
        let mut source = ScrollSource::new(Viewport::new(1280.0, VH));
        let mut registry = SectionRegistry::new();
        let mut e = engine(TransitionFlags::default());

        // Exit range is 2400..3200.
        drive(&mut e, &mut layout, &mut source, &mut registry, 2000.0);
        let out = drive(&mut e, &mut layout, &mut source, &mut registry, 2600.0);
        let snap = registry.snapshot("about");
        assert_eq!(snap.status, SectionStatus::Exiting);
        assert!((snap.progress - 0.25).abs() < 1e-9);
        let Some(StyleCommand::SetStyle { style, .. }) = out.last() else {
            panic!("expected a style write, got {out:?}");
        };
        assert!(style.opacity < 1.0 && style.scale > 1.0);

        drive(&mut e, &mut layout, &mut source, &mut registry, 2000.0);
        assert_eq!(
            registry.snapshot("about"),
            SectionSnapshot::new(SectionStatus::Active, 1.0)
        );
    }

    #[test]
    fn disabled_entry_reports_active_zero_without_styling() {
        let mut layout = layout(1600.0, 1600.0);
        let mut source = ScrollSource::new(Viewport::new(1280.0, VH));
        let mut registry = SectionRegistry::new();
        let mut e = engine(TransitionFlags {
            enable_entry: false,
            enable_exit: false,
            is_pinned: true,
        });
        let out = drive(&mut e, &mut layout, &mut source, &mut registry, 0.0);
        assert!(out.is_empty());
        assert_eq!(
            registry.snapshot("about"),
            SectionSnapshot::new(SectionStatus::Active, 0.0)
        );
        let out = drive(&mut e, &mut layout, &mut source, &mut registry, 1200.0);
        assert!(out.is_empty());
        assert_eq!(registry.writes("about"), 1);
    }

    #[test]
    fn short_sections_run_entry_and_exit_back_to_back() {
        // 300px tall section in an 800px viewport.
        let mut layout = layout(2000.0, 300.0);
        let mut source = ScrollSource::new(Viewport::new(1280.0, VH));
        let mut registry = SectionRegistry::new();
        let mut e = engine(TransitionFlags::default());
        drive(&mut e, &mut layout, &mut source, &mut registry, 0.0);

        let entry = e.entry_range();
        let exit = e.exit_range();
        assert_eq!(entry, TriggerRange::new(1200.0, 2000.0));
        assert_eq!(exit.start, entry.end);

        // Where the raw exit range would have started, entry still owns progress.
        drive(&mut e, &mut layout, &mut source, &mut registry, 1700.0);
        assert_eq!(registry.status("about"), SectionStatus::Entering);

        drive(&mut e, &mut layout, &mut source, &mut registry, 2150.0);
        let snap = registry.snapshot("about");
        assert_eq!(snap.status, SectionStatus::Exiting);
        assert!((snap.progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn pinned_engine_hands_over_content_after_entry() {
        let mut layout = layout(1600.0, 1600.0);
        let mut source = ScrollSource::new(Viewport::new(1280.0, VH));
        let mut registry = SectionRegistry::new();
        let mut e = engine(TransitionFlags {
            enable_exit: false,
            is_pinned: true,
            ..TransitionFlags::default()
        });
        assert!(!drive(&mut e, &mut layout, &mut source, &mut registry, 1200.0).is_empty());
        assert!(drive(&mut e, &mut layout, &mut source, &mut registry, 2500.0).is_empty());
        assert_eq!(registry.status("about"), SectionStatus::Active);
    }

    #[test]
    fn missing_content_skips_the_frame() {
        let mut layout = layout(1600.0, 1600.0);
        layout.remove("about/content");
        let mut source = ScrollSource::new(Viewport::new(1280.0, VH));
        let mut registry = SectionRegistry::new();
        let mut e = engine(TransitionFlags::default());
        let out = drive(&mut e, &mut layout, &mut source, &mut registry, 1200.0);
        assert!(out.is_empty());
        assert_eq!(registry.writes("about"), 0);
    }

    #[test]
    fn content_style_endpoints() {
        let hidden = content_style(Some(0.0), None);
        assert_eq!(hidden.opacity, 0.0);
        assert_eq!(hidden.scale, 0.8);
        let shown = content_style(Some(1.0), Some(0.0));
        assert_eq!(shown.opacity, 1.0);
        assert_eq!(shown.scale, 1.0);
        let gone = content_style(Some(1.0), Some(1.0));
        assert_eq!(gone.opacity, 0.0);
        assert!((gone.scale - 1.2).abs() < 1e-12);
    }
}
