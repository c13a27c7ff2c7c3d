//! Process-wide store of section lifecycle status and progress.
//!
//! Status and progress are kept apart: `status` changes a handful
//! of times per page and is pushed to subscribers, while `progress` changes on
//! every scroll tick and is only ever polled. A `snapshot` read is fresh at
//! the moment of the call and never afterwards; consumers that animate from
//! progress must re-read it on their own frame schedule.

use std::collections::HashMap;

use scrollwork_protocol::{SectionId, SectionSnapshot, SectionStatus};

use crate::ease::clamp01;

/// Notification delivered to registry subscribers, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Registered {
        id: SectionId,
    },
    StatusChanged {
        id: SectionId,
        from: SectionStatus,
        to: SectionStatus,
        progress: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&RegistryEvent)>;

#[derive(Debug, Clone, Copy, Default)]
struct HotState {
    progress: f64,
    writes: u64,
}

#[derive(Default)]
pub struct SectionRegistry {
    statuses: HashMap<SectionId, SectionStatus>,
    hot: HashMap<SectionId, HotState>,
    /// Sequence number of each section's latest status change.
    changed_at: HashMap<SectionId, u64>,
    order: Vec<SectionId>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    sequence: u64,
}

impl std::fmt::Debug for SectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionRegistry")
            .field("statuses", &self.statuses)
            .field("order", &self.order)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `{idle, 0}` for `id` unless it already exists.
    ///
    /// Returns `true` when the id was new.
    pub fn register(&mut self, id: &SectionId) -> bool {
        if self.statuses.contains_key(id) {
            return false;
        }
        self.insert_idle(id);
        self.notify(&RegistryEvent::Registered { id: id.clone() });
        true
    }

    /// Record `progress` unconditionally and `status` if it changed.
    ///
    /// Progress is clamped to `[0, 1]`. Subscribers hear about the call only
    /// when the status differs from the previous one. Unknown ids are
    /// registered implicitly since section mount order is not guaranteed.
    pub fn update_status(&mut self, id: &SectionId, status: SectionStatus, progress: f64) {
        if !self.statuses.contains_key(id) {
            self.insert_idle(id);
        }
        let progress = clamp01(progress);
        let hot = self.hot.entry(id.clone()).or_default();
        hot.progress = progress;
        hot.writes += 1;

        let previous = self
            .statuses
            .insert(id.clone(), status)
            .unwrap_or_default();
        if previous == status {
            return;
        }

        self.sequence += 1;
        self.changed_at.insert(id.clone(), self.sequence);
        tracing::debug!(section = %id, from = %previous, to = %status, progress, "section status changed");
        self.notify(&RegistryEvent::StatusChanged {
            id: id.clone(),
            from: previous,
            to: status,
            progress,
        });
    }

    /// Current status and progress; `{idle, 0}` for unknown ids.
    pub fn snapshot(&self, id: &str) -> SectionSnapshot {
        SectionSnapshot {
            status: self.statuses.get(id).copied().unwrap_or_default(),
            progress: self.hot.get(id).map_or(0.0, |h| h.progress),
        }
    }

    pub fn status(&self, id: &str) -> SectionStatus {
        self.snapshot(id).status
    }

    pub fn progress(&self, id: &str) -> f64 {
        self.snapshot(id).progress
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.statuses.contains_key(id)
    }

    /// Number of `update_status` calls recorded for `id`.
    pub fn writes(&self, id: &str) -> u64 {
        self.hot.get(id).map_or(0, |h| h.writes)
    }

    /// Monotonic sequence number of the last status change of `id`.
    pub fn last_change(&self, id: &str) -> Option<u64> {
        self.changed_at.get(id).copied()
    }

    /// Section ids in registration order.
    pub fn ids(&self) -> &[SectionId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&RegistryEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    /// Drop every record and subscriber (page teardown).
    pub fn clear(&mut self) {
        self.statuses.clear();
        self.hot.clear();
        self.changed_at.clear();
        self.order.clear();
        self.listeners.clear();
    }

    fn insert_idle(&mut self, id: &SectionId) {
        self.statuses.insert(id.clone(), SectionStatus::Idle);
        self.hot.insert(id.clone(), HotState::default());
        self.order.push(id.clone());
    }

    fn notify(&mut self, event: &RegistryEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn id(s: &str) -> SectionId {
        SectionId::from(s)
    }

    #[test]
    fn register_twice_is_idempotent() {
        let mut reg = SectionRegistry::new();
        assert!(reg.register(&id("hero")));
        reg.update_status(&id("hero"), SectionStatus::Entering, 0.4);
        assert!(!reg.register(&id("hero")));
        assert_eq!(reg.status("hero"), SectionStatus::Entering);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unknown_id_reads_idle_zero() {
        let reg = SectionRegistry::new();
        assert_eq!(reg.snapshot("nowhere"), SectionSnapshot::default());
    }

    #[test]
    fn progress_is_clamped() {
        let mut reg = SectionRegistry::new();
        reg.update_status(&id("a"), SectionStatus::Active, 4.2);
        assert_eq!(reg.progress("a"), 1.0);
        reg.update_status(&id("a"), SectionStatus::Active, -1.0);
        assert_eq!(reg.progress("a"), 0.0);
        reg.update_status(&id("a"), SectionStatus::Active, f64::NAN);
        assert_eq!(reg.progress("a"), 0.0);
    }

    #[test]
    fn update_registers_implicitly() {
        let mut reg = SectionRegistry::new();
        reg.update_status(&id("late"), SectionStatus::Active, 0.5);
        assert!(reg.is_registered("late"));
        assert_eq!(reg.ids(), &[id("late")]);
    }

    #[test]
    fn listeners_see_events_in_call_order() {
        let mut reg = SectionRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        reg.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        reg.register(&id("a"));
        reg.update_status(&id("a"), SectionStatus::Entering, 0.1);
        reg.update_status(&id("b"), SectionStatus::Active, 0.0);
        reg.update_status(&id("a"), SectionStatus::Entering, 0.2);
        reg.update_status(&id("a"), SectionStatus::Active, 1.0);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert!(matches!(&seen[0], RegistryEvent::Registered { id } if id == "a"));
        assert!(matches!(&seen[1], RegistryEvent::StatusChanged { to: SectionStatus::Entering, .. }));
        assert!(matches!(&seen[2], RegistryEvent::StatusChanged { id, .. } if id == "b"));
        assert!(matches!(&seen[3], RegistryEvent::StatusChanged { from: SectionStatus::Entering, to: SectionStatus::Active, .. }));
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut reg = SectionRegistry::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let sub = reg.subscribe(move |_| *sink.borrow_mut() += 1);
        reg.register(&id("a"));
        assert!(reg.unsubscribe(sub));
        reg.update_status(&id("a"), SectionStatus::Active, 1.0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn last_change_tracks_recency() {
        let mut reg = SectionRegistry::new();
        reg.update_status(&id("a"), SectionStatus::Active, 1.0);
        reg.update_status(&id("b"), SectionStatus::Entering, 0.5);
        assert!(reg.last_change("b") > reg.last_change("a"));
        reg.update_status(&id("a"), SectionStatus::Active, 0.3);
        assert!(reg.last_change("b") > reg.last_change("a"));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut reg = SectionRegistry::new();
        reg.update_status(&id("a"), SectionStatus::Active, 1.0);
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.writes("a"), 0);
        assert_eq!(reg.snapshot("a"), SectionSnapshot::default());
    }
}
