use serde::{Deserialize, Serialize};

/// Lifecycle of a section relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    #[default]
    Idle,
    Entering,
    Active,
    Exiting,
}

impl SectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionStatus::Idle => "idle",
            SectionStatus::Entering => "entering",
            SectionStatus::Active => "active",
            SectionStatus::Exiting => "exiting",
        }
    }

    /// Whether the section is on screen in any capacity.
    pub fn is_visible(&self) -> bool {
        !matches!(self, SectionStatus::Idle)
    }
}

impl std::fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time read of one section.
///
/// `status` is the event-notified value; `progress` is the polled value and
/// is only as fresh as the moment the snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionSnapshot {
    pub status: SectionStatus,
    pub progress: f64,
}

impl SectionSnapshot {
    pub fn new(status: SectionStatus, progress: f64) -> Self {
        Self { status, progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_idle_zero() {
        let snap = SectionSnapshot::default();
        assert_eq!(snap.status, SectionStatus::Idle);
        assert_eq!(snap.progress, 0.0);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&SectionStatus::Entering).unwrap_or_default();
        assert_eq!(json, "\"entering\"");
    }
}
