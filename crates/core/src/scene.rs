//! Frame scheduling for mounted section controllers.
//!
//! A tick runs in two passes: every controller measures first, then every
//! controller that measured successfully writes. No controller can observe
//! layout after another has written styles in the same frame.

use scrollwork_protocol::{SectionId, StyleCommand};
use thiserror::Error;

use crate::layout::LayoutProbe;
use crate::registry::SectionRegistry;
use crate::scroll::ScrollFrame;

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("section `{id}` already has a mounted controller")]
    AlreadyMounted { id: SectionId },
}

/// Scroll-driven controller owning one section id.
pub trait SectionController {
    fn section_id(&self) -> &SectionId;

    /// Read phase: refresh geometry. Return `false` if a required element is
    /// not mounted; the controller is then skipped for this frame and asked
    /// again next frame.
    fn measure(&mut self, probe: &dyn LayoutProbe, frame: &ScrollFrame) -> bool;

    /// Write phase: report status and append style commands.
    fn apply(
        &mut self,
        frame: &ScrollFrame,
        registry: &mut SectionRegistry,
        out: &mut Vec<StyleCommand>,
    );

    /// Short name of the controller flavour, for diagnostics.
    fn kind(&self) -> &'static str;

    /// Human-readable internal state (current phase, focused card, ...).
    fn detail(&self) -> Option<String> {
        None
    }
}

/// Owner of a group of bindings that are released together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

struct Mounted {
    scope: ScopeId,
    controller: Box<dyn SectionController>,
    measured: bool,
}

#[derive(Default)]
pub struct ScrollScene {
    mounted: Vec<Mounted>,
    next_scope: u32,
}

impl std::fmt::Debug for ScrollScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.mounted
                    .iter()
                    .map(|m| (m.scope, m.controller.section_id().as_str(), m.controller.kind())),
            )
            .finish()
    }
}

impl ScrollScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_scope(&mut self) -> ScopeId {
        let scope = ScopeId(self.next_scope);
        self.next_scope += 1;
        scope
    }

    /// Mount `controller` under `scope` and register its section.
    ///
    /// Each section id has at most one writer.
    pub fn mount(
        &mut self,
        scope: ScopeId,
        controller: Box<dyn SectionController>,
        registry: &mut SectionRegistry,
    ) -> Result<(), SceneError> {
        let id = controller.section_id();
        if self.is_mounted(id.as_str()) {
            return Err(SceneError::AlreadyMounted { id: id.clone() });
        }
        registry.register(id);
        tracing::debug!(section = %id, kind = controller.kind(), "mounted controller");
        self.mounted.push(Mounted {
            scope,
            controller,
            measured: false,
        });
        Ok(())
    }

    /// Release every binding owned by `scope`. Returns how many were dropped.
    pub fn revoke(&mut self, scope: ScopeId) -> usize {
        let before = self.mounted.len();
        self.mounted.retain(|m| m.scope != scope);
        let revoked = before - self.mounted.len();
        tracing::debug!(?scope, revoked, "revoked scope");
        revoked
    }

    /// Replace everything owned by `scope` with `controllers`, e.g. on a
    /// breakpoint change. Nothing changes if any new controller would clash
    /// with a section mounted by another scope.
    pub fn swap_scope(
        &mut self,
        scope: ScopeId,
        controllers: Vec<Box<dyn SectionController>>,
        registry: &mut SectionRegistry,
    ) -> Result<usize, SceneError> {
        for (i, c) in controllers.iter().enumerate() {
            let id = c.section_id();
            let clashes_elsewhere = self
                .mounted
                .iter()
                .any(|m| m.scope != scope && m.controller.section_id() == id);
            let duplicated = controllers[..i].iter().any(|o| o.section_id() == id);
            if clashes_elsewhere || duplicated {
                return Err(SceneError::AlreadyMounted { id: id.clone() });
            }
        }
        self.revoke(scope);
        let count = controllers.len();
        for controller in controllers {
            self.mount(scope, controller, registry)?;
        }
        Ok(count)
    }

    pub fn clear(&mut self) {
        self.mounted.clear();
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.mounted
            .iter()
            .any(|m| m.controller.section_id() == id)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    pub fn controllers(&self) -> impl Iterator<Item = &dyn SectionController> {
        self.mounted.iter().map(|m| m.controller.as_ref())
    }

    /// Run one frame: all reads, then all writes.
    pub fn tick(
        &mut self,
        probe: &dyn LayoutProbe,
        frame: &ScrollFrame,
        registry: &mut SectionRegistry,
    ) -> Vec<StyleCommand> {
        for m in &mut self.mounted {
            m.measured = m.controller.measure(probe, frame);
            if !m.measured {
                tracing::debug!(
                    section = %m.controller.section_id(),
                    "geometry unavailable, skipping frame"
                );
            }
        }

        let mut out = Vec::new();
        for m in self.mounted.iter_mut().filter(|m| m.measured) {
            m.controller.apply(frame, registry, &mut out);
        }
        out
    }
}
