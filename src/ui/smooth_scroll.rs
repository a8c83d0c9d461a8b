//! Exponential ease-out toward a scroll rest position.
//!
//! Used after a gesture ends: the snap policy picks a target offset and the
//! offset decays toward it a fixed fraction per frame, so the content glides
//! into place with visible deceleration.

/// Settles a scroll offset onto `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    target: f32,
    /// Fraction of the remaining distance covered per tick.
    /// Good range: 0.25–0.45 at 60 fps.
    speed: f32,
}

/// Remaining distance (units) below which the offset lands on the target.
const LAND_DISTANCE: f32 = 0.5;

impl SmoothScroll {
    pub fn new(target: f32, speed: f32) -> Self {
        Self {
            target,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Next offset after one frame, starting from `current`.
    pub fn step(&self, current: f32) -> f32 {
        let next = current + (self.target - current) * self.speed;
        if (self.target - next).abs() < LAND_DISTANCE {
            self.target
        } else {
            next
        }
    }

    pub fn is_settled(&self, current: f32) -> bool {
        current == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_exactly_on_target() {
        let anim = SmoothScroll::new(75.0, 0.35);
        let mut offset = 50.0;
        let mut frames = 0;
        while !anim.is_settled(offset) {
            let next = anim.step(offset);
            assert!(next > offset && next <= 75.0, "moves monotonically without overshoot");
            offset = next;
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(offset, 75.0);
    }

    #[test]
    fn springs_back_from_overscroll() {
        let anim = SmoothScroll::new(0.0, 0.5);
        let mut offset = -30.0;
        for _ in 0..20 {
            offset = anim.step(offset);
        }
        assert_eq!(offset, 0.0);
    }

    #[test]
    fn speed_is_clamped() {
        let anim = SmoothScroll::new(10.0, 5.0);
        assert!(anim.step(0.0) < 10.0);
    }
}
