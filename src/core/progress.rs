//! Scroll offset → header collapse progress.
//!
//! The header collapses over a fixed scroll distance.  Progress is the
//! fraction of that distance travelled, clamped to `[0, 1]`.

/// Scroll distance (in distance units) over which the header fully collapses.
pub const COLLAPSE_DISTANCE: f32 = 75.0;

/// Geometry reported by the scroll surface on every position change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Vertical content offset.  Negative while overscrolled at the top.
    pub content_offset_y: f32,
    /// Inset reserved above the content by the scroll surface.
    pub top_inset: f32,
}

impl ScrollState {
    pub fn new(content_offset_y: f32, top_inset: f32) -> Self {
        Self {
            content_offset_y,
            top_inset,
        }
    }

    /// Distance scrolled past the resting position.
    pub fn raw_offset(&self) -> f32 {
        self.content_offset_y + self.top_inset
    }

    /// Leading edge of the content relative to the scroll surface.
    /// Positive when the user has pulled the content down past rest.
    pub fn min_y(&self) -> f32 {
        -self.raw_offset()
    }

    pub fn progress(&self) -> f32 {
        compute_progress(self.content_offset_y, self.top_inset)
    }
}

/// Map a raw scroll offset to a collapse progress in `[0, 1]`.
///
/// Overscroll above the top (negative offset) clamps to 0 and any offset at
/// or beyond [`COLLAPSE_DISTANCE`] clamps to 1.  A NaN offset yields 0.
pub fn compute_progress(content_offset_y: f32, top_inset: f32) -> f32 {
    let raw = content_offset_y + top_inset;
    let progress = (raw / COLLAPSE_DISTANCE).clamp(0.0, 1.0);
    if progress.is_nan() {
        0.0
    } else {
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_points() {
        assert_eq!(compute_progress(-100.0, 0.0), 0.0);
        assert_eq!(compute_progress(75.0, 0.0), 1.0);
        assert_eq!(compute_progress(37.5, 0.0), 0.5);
        assert_eq!(compute_progress(500.0, 0.0), 1.0);
    }

    #[test]
    fn inset_is_added_to_offset() {
        // A surface resting at -inset reports zero progress.
        assert_eq!(compute_progress(-20.0, 20.0), 0.0);
        assert_eq!(compute_progress(17.5, 20.0), 0.5);
    }

    #[test]
    fn nan_offset_is_expanded() {
        assert_eq!(compute_progress(f32::NAN, 0.0), 0.0);
    }

    #[test]
    fn scroll_sweep_rises_linearly_then_clamps() {
        let seq: Vec<f32> = (0..=10)
            .map(|step| compute_progress(step as f32 * 10.0, 0.0))
            .collect();
        for (step, p) in seq.iter().enumerate() {
            let offset = step as f32 * 10.0;
            if offset >= COLLAPSE_DISTANCE {
                assert_eq!(*p, 1.0, "offset {offset}");
            } else {
                assert!((p - offset / COLLAPSE_DISTANCE).abs() < 1e-6, "offset {offset}");
            }
        }
        assert!(seq.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn min_y_mirrors_raw_offset() {
        let s = ScrollState::new(30.0, 0.0);
        assert_eq!(s.min_y(), -30.0);
        assert_eq!(ScrollState::new(-12.0, 0.0).min_y(), 12.0);
    }

    proptest! {
        #[test]
        fn progress_stays_in_unit_range(offset in -1.0e6f32..1.0e6, inset in -1.0e3f32..1.0e3) {
            let p = compute_progress(offset, inset);
            prop_assert!((0.0..=1.0).contains(&p));
        }

        #[test]
        fn progress_is_monotonic(a in -500.0f32..500.0, b in -500.0f32..500.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(compute_progress(lo, 0.0) <= compute_progress(hi, 0.0));
        }
    }
}
