//! L4 Atomic Layer: Drag capture and momentum projection

use std::time::Instant;

use crate::geometry::Vec2;
use crate::scroll::timing::elapsed_ms;

/// Pointer capture opened by a pointer-down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    started: Instant,
    /// Pointer position relative to the container
    origin: Vec2,
    /// Scroll offset when the drag began
    start_offset: Vec2,
}

/// What a drag amounted to when the pointer was released
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub delta: Vec2,
    pub elapsed_ms: f64,
}

impl Release {
    /// Average velocity over the whole drag in units per ms.
    /// `None` for an instantaneous release.
    pub fn velocity(&self) -> Option<Vec2> {
        if self.elapsed_ms > 0.0 && self.elapsed_ms.is_finite() {
            Some(self.delta * (1.0 / self.elapsed_ms))
        } else {
            None
        }
    }
}

impl DragSession {
    pub fn begin(now: Instant, pointer: Vec2, offset: Vec2) -> Self {
        Self {
            started: now,
            origin: pointer,
            start_offset: offset,
        }
    }

    /// Pointer travel since pointer-down, inverted so that dragging left
    /// scrolls content right
    pub fn delta(&self, pointer: Vec2) -> Vec2 {
        self.origin - pointer
    }

    /// Unclamped offset that keeps the content under the pointer
    pub fn target(&self, pointer: Vec2) -> Vec2 {
        self.start_offset + self.delta(pointer)
    }

    pub fn finish(self, now: Instant, pointer: Vec2) -> Release {
        Release {
            delta: self.delta(pointer),
            elapsed_ms: elapsed_ms(self.started, now),
        }
    }
}

/// Post-release glide under constant deceleration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Momentum {
    /// Offset change from the release position
    pub displacement: Vec2,
    /// Time to come to rest along the dominant axis
    pub duration_ms: f64,
}

/// Project a release velocity forward with deceleration `falloff`.
///
/// Each axis travels `v² / 2a` in the direction of `v`; the glide lasts
/// `|v| / a` of the faster axis. Returns `None` for a zero velocity or a
/// non-positive falloff.
pub fn project(velocity: Vec2, falloff: f64) -> Option<Momentum> {
    if velocity.is_zero() || !falloff.is_finite() || falloff <= 0.0 {
        return None;
    }

    let dominant = if velocity.x.abs() > velocity.y.abs() {
        velocity.x
    } else {
        velocity.y
    };
    let stopping = |v: f64| v.abs() * v / (2.0 * falloff);

    Some(Momentum {
        displacement: Vec2::new(stopping(velocity.x), stopping(velocity.y)),
        duration_ms: dominant.abs() / falloff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_drag_target_follows_pointer() {
        let t0 = Instant::now();
        let session = DragSession::begin(t0, Vec2::new(400.0, 50.0), Vec2::new(100.0, 0.0));

        // Pointer moved 150 to the left: content scrolls 150 to the right
        assert_eq!(session.delta(Vec2::new(250.0, 50.0)), Vec2::new(150.0, 0.0));
        assert_eq!(session.target(Vec2::new(250.0, 50.0)), Vec2::new(250.0, 0.0));
    }

    #[test]
    fn test_release_velocity() {
        let t0 = Instant::now();
        let session = DragSession::begin(t0, Vec2::new(400.0, 50.0), Vec2::ZERO);
        let release = session.finish(t0 + Duration::from_millis(250), Vec2::new(250.0, 50.0));

        let v = release.velocity().unwrap();
        assert!((v.x - 0.6).abs() < 1e-12);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_instant_release_has_no_velocity() {
        let t0 = Instant::now();
        let session = DragSession::begin(t0, Vec2::new(10.0, 10.0), Vec2::ZERO);
        let release = session.finish(t0, Vec2::new(0.0, 0.0));
        assert_eq!(release.velocity(), None);
    }

    #[test]
    fn test_stopping_distance() {
        let m = project(Vec2::new(0.6, 0.0), 0.006).unwrap();
        assert!((m.displacement.x - 30.0).abs() < 1e-9);
        assert_eq!(m.displacement.y, 0.0);
        assert!((m.duration_ms - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_direction_preserved() {
        let m = project(Vec2::new(-0.6, 0.3), 0.006).unwrap();
        assert!(m.displacement.x < 0.0);
        assert!(m.displacement.y > 0.0);
        // Dominant axis is x
        assert!((m.duration_ms - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(project(Vec2::ZERO, 0.006), None);
        assert_eq!(project(Vec2::new(1.0, 0.0), 0.0), None);
        assert_eq!(project(Vec2::new(1.0, 0.0), f64::NAN), None);
    }
}
