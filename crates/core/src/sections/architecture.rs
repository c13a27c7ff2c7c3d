//! The about section: a three-layer system stack that expands, focuses each
//! layer in turn with its caption, then collapses and fades out.

use scrollwork_protocol::{ElementKey, SectionStatus, StyleChannels, Viewport};

use crate::controllers::{PhaseScript, VisualState, late_exit};
use crate::ease::{Ease, lerp, segment};
use crate::timeline::{PhaseTable, PhaseWindow, TimelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchitecturePhase {
    Expand,
    FocusHardware,
    FocusMiddleware,
    FocusCloud,
    Exit,
}

impl ArchitecturePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchitecturePhase::Expand => "expand",
            ArchitecturePhase::FocusHardware => "focus-hardware",
            ArchitecturePhase::FocusMiddleware => "focus-middleware",
            ArchitecturePhase::FocusCloud => "focus-cloud",
            ArchitecturePhase::Exit => "exit",
        }
    }
}

pub fn architecture_phases() -> Result<PhaseTable<ArchitecturePhase>, TimelineError> {
    use ArchitecturePhase::*;
    PhaseTable::new(vec![
        PhaseWindow::new(Expand, 0.0, 0.2),
        PhaseWindow::new(FocusHardware, 0.2, 0.4),
        PhaseWindow::new(FocusMiddleware, 0.4, 0.6),
        PhaseWindow::new(FocusCloud, 0.6, 0.8),
        PhaseWindow::new(Exit, 0.8, 1.0),
    ])
}

const LAYER_NAMES: [&str; 3] = ["hardware", "middleware", "cloud"];
/// Exploded offsets per layer, bottom to top.
const SPREAD_Y: [f64; 3] = [150.0, 0.0, -150.0];
const SPREAD_Z: [f64; 3] = [0.0, 50.0, 100.0];
const DIMMED: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct ArchitectureKeys {
    /// Bottom to top: hardware, middleware, cloud.
    pub layers: [ElementKey; 3],
    pub captions: [ElementKey; 3],
    pub pipes: ElementKey,
    /// Wrapper faded as a whole on exit.
    pub content: ElementKey,
}

impl ArchitectureKeys {
    pub fn under(root: &ElementKey) -> Self {
        Self {
            layers: LAYER_NAMES.map(|n| root.child(&format!("layer-{n}"))),
            captions: LAYER_NAMES.map(|n| root.child(&format!("caption-{n}"))),
            pipes: root.child("pipes"),
            content: root.child("content"),
        }
    }
}

/// Local fractions of every window at `p`.
struct Progress {
    expand: f64,
    /// Focus windows for the three layers, then the exit window.
    focus: [f64; 4],
}

impl Progress {
    fn at(table: &PhaseTable<ArchitecturePhase>, p: f64) -> Self {
        let w = table.windows();
        let local = |i: usize| segment(p, w[i].start, w[i].end);
        Self {
            expand: local(0),
            focus: [local(1), local(2), local(3), local(4)],
        }
    }

    fn exit(&self) -> f64 {
        self.focus[3]
    }

    /// How much layer `i` is highlighted. It ramps up in the third sixth of
    /// its own window and back down in the second sixth of the next one.
    fn highlight(&self, i: usize) -> f64 {
        let rise = segment(self.focus[i], 2.0 / 6.0, 3.0 / 6.0);
        let fall = segment(self.focus[i + 1], 1.0 / 6.0, 2.0 / 6.0);
        rise - fall
    }

    /// Caption `i` follows its layer's highlight, and leaves first.
    fn caption(&self, i: usize) -> (f64, f64) {
        let shown = segment(self.focus[i], 3.0 / 6.0, 4.0 / 6.0);
        let hidden = segment(self.focus[i + 1], 0.0, 1.0 / 6.0);
        (shown, hidden)
    }

    /// Layers other than the focused one dim once focusing begins.
    fn dim(&self) -> f64 {
        segment(self.focus[0], 1.0 / 6.0, 2.0 / 6.0)
    }

    fn collapse(&self) -> f64 {
        Ease::Power2In.apply(segment(self.exit(), 1.0 / 6.0, 4.0 / 6.0))
    }
}

#[derive(Debug, Clone)]
pub struct ArchitectureScript {
    table: PhaseTable<ArchitecturePhase>,
    keys: ArchitectureKeys,
    exit_threshold: f64,
}

impl ArchitectureScript {
    pub fn new(keys: ArchitectureKeys) -> Result<Self, TimelineError> {
        Ok(Self {
            table: architecture_phases()?,
            keys,
            exit_threshold: 0.8,
        })
    }

    pub fn keys(&self) -> &ArchitectureKeys {
        &self.keys
    }

    fn layer(&self, i: usize, at: &Progress) -> StyleChannels {
        let stagger = 0.1 * i as f64;
        let expand = Ease::Power2Out.apply(segment(at.expand, stagger, stagger + 0.5));
        let spread = Ease::Power2InOut.apply(segment(at.expand, 0.4, 1.0));
        let collapse = at.collapse();
        let highlight = at.highlight(i);

        let resting = lerp(1.0, DIMMED, at.dim());
        let focus_opacity = lerp(resting, 1.0, highlight);
        let scale = lerp(0.8, 1.0, expand) + 0.1 * highlight;

        StyleChannels {
            opacity: expand * focus_opacity * (1.0 - collapse),
            scale: lerp(scale, 0.8, collapse),
            translate_y: SPREAD_Y[i] * spread * (1.0 - collapse),
            translate_z: SPREAD_Z[i] * spread * (1.0 - collapse),
            blur: 10.0 * (1.0 - expand),
            brightness: 1.0 + 0.5 * highlight,
            z_index: 10 * (i as i32 + 1),
            ..StyleChannels::default()
        }
    }

    fn caption(&self, i: usize, at: &Progress) -> StyleChannels {
        let (shown, hidden) = at.caption(i);
        let translate_x = if hidden > 0.0 {
            -20.0 * hidden
        } else {
            lerp(-50.0, 0.0, shown)
        };
        StyleChannels {
            opacity: shown - hidden,
            translate_x,
            ..StyleChannels::default()
        }
    }
}

impl PhaseScript for ArchitectureScript {
    type Phase = ArchitecturePhase;

    fn phases(&self) -> &PhaseTable<ArchitecturePhase> {
        &self.table
    }

    fn visual_state(&self, p: f64, _viewport: Viewport) -> VisualState {
        let at = Progress::at(&self.table, p);
        let mut state = VisualState::new();
        for i in 0..3 {
            state.set(&self.keys.layers[i], self.layer(i, &at));
        }
        for i in 0..3 {
            state.set(&self.keys.captions[i], self.caption(i, &at));
        }
        let pipes = segment(at.expand, 0.7, 1.0) * (1.0 - at.collapse());
        state.set(&self.keys.pipes, StyleChannels::default().with_opacity(pipes));

        let fade = Ease::Power1In.apply(at.exit());
        state.set(
            &self.keys.content,
            StyleChannels {
                opacity: 1.0 - fade,
                scale: lerp(1.0, 1.2, fade),
                blur: 10.0 * fade,
                ..StyleChannels::default()
            },
        );
        state
    }

    fn status_at(&self, p: f64) -> SectionStatus {
        late_exit(p, self.exit_threshold)
    }
}
