//! End-of-gesture snapping of the scroll rest position.
//!
//! The header is bistable: a gesture that ends inside the collapse zone
//! settles either fully expanded (offset 0) or fully collapsed (offset
//! [`COLLAPSE_DISTANCE`]).  Past the collapse zone the proposed rest
//! position is left alone.

use super::progress::COLLAPSE_DISTANCE;

/// Rest positions strictly above this offset complete the collapse.
///
/// Kept at 40 rather than half of the collapse distance (37.5).
pub const SNAP_THRESHOLD: f32 = 40.0;

/// Decide where a scroll gesture ending at `proposed_min_y` should rest.
pub fn snap_target(proposed_min_y: f32) -> f32 {
    if proposed_min_y >= COLLAPSE_DISTANCE {
        proposed_min_y
    } else if proposed_min_y > SNAP_THRESHOLD {
        COLLAPSE_DISTANCE
    } else {
        0.0
    }
}
