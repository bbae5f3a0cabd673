//! L4 Atomic Layer: Time calculation utilities for scroll animations
//!
//! Pure functions over injected timestamps. Nothing here reads the clock,
//! so animations can be replayed deterministically.

use std::time::{Duration, Instant};

use crate::geometry::Vec2;

/// Milliseconds elapsed from `start` to `now`, zero if `now` is earlier
#[inline]
pub fn elapsed_ms(start: Instant, now: Instant) -> f64 {
    now.saturating_duration_since(start).as_secs_f64() * 1000.0
}

/// Animation progress for a duration given in milliseconds
///
/// # Returns
/// `elapsed / duration`, or `1.0` when the duration is not positive.
/// Not clamped: callers treat anything `>= 1.0` as finished.
#[inline]
pub fn progress(start: Instant, now: Instant, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    elapsed_ms(start, now) / duration_ms
}

/// Convert a millisecond count to a `Duration`, saturating negatives at zero
#[inline]
pub fn millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Component-wise interpolation for scroll offsets
#[inline]
pub fn lerp_vec(from: Vec2, to: Vec2, t: f64) -> Vec2 {
    Vec2::new(lerp(from.x, to.x, t), lerp(from.y, to.y, t))
}
