//! Phase tables: named, contiguous windows over a pinned section's progress.

use thiserror::Error;

use crate::ease::clamp01;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("phase table has no windows")]
    Empty,
    #[error("first window starts at {0}, expected 0")]
    StartsLate(f64),
    #[error("last window ends at {0}, expected 1")]
    EndsEarly(f64),
    #[error("window {index} is empty or inverted ({start}..{end})")]
    Inverted { index: usize, start: f64, end: f64 },
    #[error("gap before window {index}: previous ends at {previous_end}, window starts at {start}")]
    Gap {
        index: usize,
        previous_end: f64,
        start: f64,
    },
    #[error("window {index} overlaps its predecessor: previous ends at {previous_end}, window starts at {start}")]
    Overlap {
        index: usize,
        previous_end: f64,
        start: f64,
    },
    #[error("phase durations must be positive and finite")]
    BadDuration,
}

/// One named stage, active over `[start, end)` of the pinned progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseWindow<P> {
    pub phase: P,
    pub start: f64,
    pub end: f64,
}

impl<P> PhaseWindow<P> {
    pub fn new(phase: P, start: f64, end: f64) -> Self {
        Self { phase, start, end }
    }
}

/// Which phase a progress value falls in, and how far through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSample<P> {
    pub phase: P,
    pub index: usize,
    /// `(p - start) / (end - start)`, in `[0, 1]`.
    pub local: f64,
}

/// Immutable, validated sequence of phase windows covering `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable<P> {
    windows: Vec<PhaseWindow<P>>,
}

impl<P: Copy> PhaseTable<P> {
    /// Validate that `windows` are ordered, contiguous, non-overlapping and
    /// cover exactly `[0, 1]`.
    pub fn new(mut windows: Vec<PhaseWindow<P>>) -> Result<Self, TimelineError> {
        let first = windows.first().ok_or(TimelineError::Empty)?;
        if first.start.abs() > EPSILON {
            return Err(TimelineError::StartsLate(first.start));
        }
        for (index, w) in windows.iter().enumerate() {
            if !(w.end - w.start > EPSILON) {
                return Err(TimelineError::Inverted {
                    index,
                    start: w.start,
                    end: w.end,
                });
            }
        }
        for index in 1..windows.len() {
            let previous_end = windows[index - 1].end;
            let start = windows[index].start;
            if start - previous_end > EPSILON {
                return Err(TimelineError::Gap {
                    index,
                    previous_end,
                    start,
                });
            }
            if previous_end - start > EPSILON {
                return Err(TimelineError::Overlap {
                    index,
                    previous_end,
                    start,
                });
            }
        }
        let last_end = windows[windows.len() - 1].end;
        if (last_end - 1.0).abs() > EPSILON {
            return Err(TimelineError::EndsEarly(last_end));
        }

        // Snap boundaries so float noise cannot open a hairline gap.
        windows[0].start = 0.0;
        for index in 1..windows.len() {
            windows[index].start = windows[index - 1].end;
        }
        let last = windows.len() - 1;
        windows[last].end = 1.0;
        Ok(Self { windows })
    }

    /// Build from relative durations, e.g. timeline seconds.
    pub fn sequential(phases: &[(P, f64)]) -> Result<Self, TimelineError> {
        let total: f64 = phases.iter().map(|(_, d)| *d).sum();
        if phases.iter().any(|(_, d)| !(d.is_finite() && *d > 0.0)) {
            return Err(TimelineError::BadDuration);
        }
        let mut cursor = 0.0;
        let windows = phases
            .iter()
            .map(|&(phase, duration)| {
                let start = cursor / total;
                cursor += duration;
                PhaseWindow::new(phase, start, cursor / total)
            })
            .collect();
        Self::new(windows)
    }

    pub fn windows(&self) -> &[PhaseWindow<P>] {
        &self.windows
    }

    /// The unique window containing `p` (clamped into `[0, 1]`).
    ///
    /// Windows are half-open except the last, which also owns `p = 1`.
    pub fn locate(&self, p: f64) -> PhaseSample<P> {
        let p = clamp01(p);
        let last = self.windows.len() - 1;
        let index = self
            .windows
            .iter()
            .position(|w| p < w.end)
            .unwrap_or(last);
        let w = &self.windows[index];
        PhaseSample {
            phase: w.phase,
            index,
            local: clamp01((p - w.start) / (w.end - w.start)),
        }
    }

    /// Every window whose span contains `p`. Always exactly one for
    /// `p` in `[0, 1]`.
    pub fn windows_containing(&self, p: f64) -> impl Iterator<Item = &PhaseWindow<P>> {
        let last = self.windows.len() - 1;
        self.windows
            .iter()
            .enumerate()
            .filter(move |(i, w)| w.start <= p && (p < w.end || (*i == last && p <= w.end)))
            .map(|(_, w)| w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Step {
        A,
        B,
        C,
    }

    #[test]
    fn locates_windows_and_local_fraction() {
        let table = PhaseTable::new(vec![
            PhaseWindow::new(Step::A, 0.0, 0.25),
            PhaseWindow::new(Step::B, 0.25, 0.5),
            PhaseWindow::new(Step::C, 0.5, 1.0),
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        let s = table.locate(0.3);
        assert_eq!(s.phase, Step::B);
        assert!((s.local - 0.2).abs() < 1e-9);

        assert_eq!(table.locate(0.25).phase, Step::B);
        assert_eq!(table.locate(1.0).phase, Step::C);
        assert_eq!(table.locate(1.0).local, 1.0);
        assert_eq!(table.locate(-5.0).phase, Step::A);
    }

    #[test]
    fn rejects_gaps_and_overlaps() {
        let gap = PhaseTable::new(vec![
            PhaseWindow::new(Step::A, 0.0, 0.4),
            PhaseWindow::new(Step::B, 0.5, 1.0),
        ]);
        assert!(matches!(gap, Err(TimelineError::Gap { index: 1, .. })));

        let overlap = PhaseTable::new(vec![
            PhaseWindow::new(Step::A, 0.0, 0.6),
            PhaseWindow::new(Step::B, 0.5, 1.0),
        ]);
        assert!(matches!(overlap, Err(TimelineError::Overlap { index: 1, .. })));

        let short = PhaseTable::new(vec![PhaseWindow::new(Step::A, 0.0, 0.9)]);
        assert_eq!(short, Err(TimelineError::EndsEarly(0.9)));

        let empty: Result<PhaseTable<Step>, _> = PhaseTable::new(vec![]);
        assert_eq!(empty, Err(TimelineError::Empty));
    }

    #[test]
    fn sequential_normalizes_durations() {
        let table = PhaseTable::sequential(&[(Step::A, 1.0), (Step::B, 1.0), (Step::C, 2.0)])
            .unwrap_or_else(|e| panic!("{e}"));
        let w = table.windows();
        assert_eq!(w[1].start, 0.25);
        assert_eq!(w[2].start, 0.5);
        assert_eq!(w[2].end, 1.0);
        assert!(PhaseTable::sequential(&[(Step::A, 0.0)]).is_err());
    }

    #[test]
    fn every_sample_has_exactly_one_window() {
        let table = PhaseTable::sequential(&[(Step::A, 1.0), (Step::B, 3.0), (Step::C, 0.7)])
            .unwrap_or_else(|e| panic!("{e}"));
        for i in 0..=100 {
            let p = f64::from(i) / 100.0;
            assert_eq!(table.windows_containing(p).count(), 1, "p={p}");
        }
    }
}
