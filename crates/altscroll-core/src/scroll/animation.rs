//! L3 Molecular Layer: Scroll tween
//!
//! Combines easing functions and timing utilities into a single animation
//! task. The engine keeps at most one live [`Tween`]; replacing or dropping
//! it is the cancellation, so a cancelled task can never write again.

use std::fmt;
use std::time::Instant;

use crate::geometry::Vec2;

use super::easing::{ease, EasingType};
use super::timing::{lerp_vec, progress};

/// Callback run with the final offset once a scroll finishes
pub type OnComplete = Box<dyn FnOnce(Vec2)>;

/// What happens after a tween reaches its target
pub enum Completion {
    None,
    /// Caller-supplied callback
    Notify(OnComplete),
    /// Chain a snap to the nearest child (used after momentum)
    SnapToNearest,
}

impl Completion {
    pub fn from_callback(callback: Option<OnComplete>) -> Self {
        match callback {
            Some(callback) => Completion::Notify(callback),
            None => Completion::None,
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::None => f.write_str("None"),
            Completion::Notify(_) => f.write_str("Notify(..)"),
            Completion::SnapToNearest => f.write_str("SnapToNearest"),
        }
    }
}

/// Why a tween was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    /// `scroll_to` from the host
    Programmatic,
    /// Glide after a drag release
    Momentum,
    /// Alignment to a child anchor
    Snap,
    /// Snap started by the scroll-idle timer; mutes scroll activity while live
    IdleSnap,
}

/// Result of advancing a tween to a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Write this offset and request another frame
    Continue(Vec2),
    /// Write this offset; the tween is over
    Finished(Vec2),
}

/// A live scroll animation
#[derive(Debug)]
pub struct Tween {
    start: Instant,
    from: Vec2,
    to: Vec2,
    duration_ms: f64,
    easing: Option<EasingType>,
    kind: TweenKind,
    completion: Completion,
}

impl Tween {
    pub fn new(
        start: Instant,
        from: Vec2,
        to: Vec2,
        duration_ms: f64,
        easing: Option<EasingType>,
        kind: TweenKind,
        completion: Completion,
    ) -> Self {
        Self {
            start,
            from,
            to,
            duration_ms: if duration_ms.is_finite() { duration_ms } else { 0.0 },
            easing,
            kind,
            completion,
        }
    }

    /// Offset at `now`. Lands exactly on the target once progress reaches 1,
    /// so floating error never leaves the surface short or past it.
    pub fn step(&self, now: Instant) -> Step {
        let t = progress(self.start, now, self.duration_ms);
        if t >= 1.0 {
            return Step::Finished(self.to);
        }
        Step::Continue(lerp_vec(self.from, self.to, ease(self.easing, t)))
    }

    pub fn from(&self) -> Vec2 {
        self.from
    }

    pub fn target(&self) -> Vec2 {
        self.to
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn kind(&self) -> TweenKind {
        self.kind
    }

    pub fn easing(&self) -> Option<EasingType> {
        self.easing
    }

    /// Take the completion, consuming the tween
    pub fn into_completion(self) -> Completion {
        self.completion
    }
}
