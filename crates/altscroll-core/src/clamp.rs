//! L4 Atomic Layer: Edge collision for scroll targets
//!
//! Keeps a requested offset inside the scrollable range and reports how much
//! of the requested travel survived, so animations aimed past an edge can be
//! shortened in proportion.

use crate::geometry::Vec2;

/// A target constrained to the scrollable range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub offset: Vec2,
    /// Fraction of the nominal duration to keep, in `(0, 1]`
    pub speed_scale: f64,
}

/// Clamp `target` into `[0, max]` per axis.
///
/// A `max` of zero or less means the content fits on that axis: the axis is
/// pinned at `0` and never scales the speed. Neither do axes that were not
/// clamped or whose requested travel is zero.
pub fn clamp(target: Vec2, current: Vec2, max: Vec2) -> Clamped {
    let (x, scale_x) = clamp_axis(target.x, current.x, max.x);
    let (y, scale_y) = clamp_axis(target.y, current.y, max.y);

    let speed_scale = match (scale_x, scale_y) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => 1.0,
    };

    Clamped {
        offset: Vec2::new(x, y),
        speed_scale,
    }
}

fn clamp_axis(target: f64, current: f64, max: f64) -> (f64, Option<f64>) {
    // Nothing to scroll on this axis
    if max <= 0.0 {
        return (0.0, None);
    }
    let clamped = if target < 0.0 {
        0.0
    } else if target > max {
        max
    } else {
        return (target, None);
    };

    let requested = (target - current).abs();
    if requested == 0.0 {
        return (clamped, None);
    }
    let honored = (clamped - current).abs() / requested;
    if honored > 0.0 && honored.is_finite() {
        (clamped, Some(honored.min(1.0)))
    } else {
        (clamped, None)
    }
}
