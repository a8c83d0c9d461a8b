//! Focus-driven transition.
//!
//! Scroll changes move the header 1:1 with the gesture; only focus changes
//! animate.  A [`FocusTransition`] tracks how "focused" the header currently
//! looks (0 = unfocused geometry, 1 = focused geometry) and eases toward the
//! target with a critically damped spring that never overshoots.

use std::time::{Duration, Instant};

use super::header::{GridGeometry, HeaderGeometry};

/// Length of a focus transition.
pub const FOCUS_TRANSITION: Duration = Duration::from_millis(300);

/// Snappy ease: critically damped spring response over normalised time
/// `t ∈ [0, 1]`, rescaled so it lands exactly on 1 at `t = 1`.
pub fn snappy(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let omega = std::f32::consts::TAU;
    let response = |x: f32| 1.0 - (1.0 + omega * x) * (-omega * x).exp();
    (response(t) / response(1.0)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy)]
pub struct FocusTransition {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl FocusTransition {
    /// A settled transition showing `focused` geometry.
    pub fn settled(focused: bool, now: Instant) -> Self {
        let v = if focused { 1.0 } else { 0.0 };
        Self {
            from: v,
            to: v,
            started: now,
            duration: FOCUS_TRANSITION,
        }
    }

    /// Retarget toward `focused`, starting from wherever the animation is now.
    pub fn retarget(&mut self, focused: bool, now: Instant) {
        let target = if focused { 1.0 } else { 0.0 };
        if target == self.to {
            return;
        }
        self.from = self.value(now);
        self.to = target;
        self.started = now;
    }

    /// Current focus amount in `[0, 1]`.
    pub fn value(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let t = elapsed / self.duration.as_secs_f32();
        let eased = snappy(t);
        self.from * (1.0 - eased) + self.to * eased
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.from != self.to && now.saturating_duration_since(self.started) < self.duration
    }

    /// Header geometry blended between its unfocused and focused forms.
    /// Both forms are pinned at `min_y` first, so the pinning offset moves
    /// with the rest of the geometry.
    pub fn header_geometry(&self, progress: f32, min_y: f32, now: Instant) -> HeaderGeometry {
        let amount = self.value(now);
        let unfocused = HeaderGeometry::new(progress, false).pinned(min_y, false);
        let focused = HeaderGeometry::new(progress, true).pinned(min_y, true);
        unfocused.lerp(&focused, amount)
    }

    pub fn grid_geometry(&self, progress: f32, now: Instant) -> GridGeometry {
        let amount = self.value(now);
        GridGeometry::new(progress, false).lerp(&GridGeometry::new(progress, true), amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snappy_is_monotonic_without_overshoot() {
        let samples: Vec<f32> = (0..=100).map(|i| snappy(i as f32 / 100.0)).collect();
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[100], 1.0);
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
        assert!(samples.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn snappy_front_loads_motion() {
        // Most of the travel happens in the first half.
        assert!(snappy(0.5) > 0.75);
    }

    #[test]
    fn transition_lands_on_target() {
        let t0 = Instant::now();
        let mut tr = FocusTransition::settled(false, t0);
        assert_eq!(tr.value(t0), 0.0);
        assert!(!tr.is_animating(t0));

        tr.retarget(true, t0);
        assert!(tr.is_animating(t0 + Duration::from_millis(100)));
        let mid = tr.value(t0 + Duration::from_millis(150));
        assert!(mid > 0.0 && mid < 1.0);
        let done = t0 + FOCUS_TRANSITION;
        assert_eq!(tr.value(done), 1.0);
        assert!(!tr.is_animating(done));
    }

    #[test]
    fn retarget_mid_flight_starts_from_current_value() {
        let t0 = Instant::now();
        let mut tr = FocusTransition::settled(false, t0);
        tr.retarget(true, t0);
        let t1 = t0 + Duration::from_millis(100);
        let at_switch = tr.value(t1);
        tr.retarget(false, t1);
        assert!((tr.value(t1) - at_switch).abs() < 1e-6);
        assert_eq!(tr.value(t1 + FOCUS_TRANSITION), 0.0);
    }

    #[test]
    fn settled_geometry_matches_pure_geometry() {
        let t0 = Instant::now();
        let focused = FocusTransition::settled(true, t0);
        assert_eq!(focused.header_geometry(0.3, 0.0, t0), HeaderGeometry::new(0.3, true));
        let open = FocusTransition::settled(false, t0);
        assert_eq!(open.header_geometry(0.3, 0.0, t0), HeaderGeometry::new(0.3, false));
        assert_eq!(open.grid_geometry(0.3, t0), GridGeometry::new(0.3, false));
    }

    #[test]
    fn pinning_offset_animates_with_focus() {
        let t0 = Instant::now();
        let mut tr = FocusTransition::settled(false, t0);
        tr.retarget(true, t0);
        // Pulled down 30 units: unfocused rides along, focused stays pinned.
        assert_eq!(tr.header_geometry(0.0, 30.0, t0).header_y_offset, 0.0);
        let mid = tr.header_geometry(0.0, 30.0, t0 + Duration::from_millis(100));
        assert!(mid.header_y_offset < 0.0 && mid.header_y_offset > -30.0);
        let done = tr.header_geometry(0.0, 30.0, t0 + FOCUS_TRANSITION);
        assert_eq!(done.header_y_offset, -30.0);
    }
}
