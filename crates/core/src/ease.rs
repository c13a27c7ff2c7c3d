//! Scalar interpolation helpers shared by every controller.
//!
//! Everything here is a pure function of its inputs so that visual state can
//! be recomputed from scroll progress alone.

/// Clamp to `[0, 1]`. NaN maps to `0`.
#[inline]
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Local fraction of `t` inside the sub-window `[start, end]`, clamped.
///
/// A zero-width window is a step at `start`.
#[inline]
pub fn segment(t: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if t >= start { 1.0 } else { 0.0 };
    }
    clamp01((t - start) / (end - start))
}

/// Easing curves used by the section scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    Power1In,
    Power1Out,
    Power2In,
    Power2Out,
    Power2InOut,
    ExpoOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = clamp01(t);
        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
        }
    }
}

/// Smooth-scroll easing: fast start, long tail, reaches exactly 1.
pub fn smooth_scroll_ease(t: f64) -> f64 {
    (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_nan_and_bounds() {
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(7.0), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
    }

    #[test]
    fn segment_maps_sub_window() {
        assert_eq!(segment(0.5, 0.0, 1.0), 0.5);
        assert_eq!(segment(0.1, 0.25, 0.75), 0.0);
        assert_eq!(segment(0.5, 0.25, 0.75), 0.5);
        assert_eq!(segment(0.9, 0.25, 0.75), 1.0);
        assert_eq!(segment(0.3, 0.3, 0.3), 1.0);
    }

    #[test]
    fn eases_hit_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::Power1In,
            Ease::Power1Out,
            Ease::Power2In,
            Ease::Power2Out,
            Ease::Power2InOut,
            Ease::ExpoOut,
        ] {
            assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?}");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?}");
        }
    }

    #[test]
    fn smooth_scroll_ease_saturates() {
        assert_eq!(smooth_scroll_ease(1.0), 1.0);
        assert!(smooth_scroll_ease(0.1) > 0.4);
    }
}
