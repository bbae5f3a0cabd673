//! L4 Atomic Layer: Pure easing functions for scroll animations
//!
//! Provides mathematical easing functions that map input [0, 1] to output [0, 1]
//! with various deceleration curves. Animations that are given no easing
//! interpolate linearly.

use serde::{Deserialize, Serialize};

/// Easing curve applied to animation progress
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    Linear,
    /// Cubic ease-out, the default for momentum and snapping
    #[default]
    Cubic,
    Quintic,
    /// Exponential ease-out
    EaseOut,
    /// Caller-supplied curve; cannot be written to a config file
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl EasingType {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value in range [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1] for the built-in curves
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::Custom(f) => f(t),
        }
    }
}

/// Apply an optional easing; `None` is the identity
#[inline]
pub fn ease(easing: Option<EasingType>, t: f64) -> f64 {
    match easing {
        Some(easing) => easing.apply(t),
        None => t,
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}
