//! L4 Atomic Layer: Geometry snapshot of the scroll container
//!
//! The engine never queries layout while animating. Boxes are measured once
//! on construction and again after a settled resize, with the scroll offset
//! reset to zero so child positions are stable and land directly in
//! scroll-offset space.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A 2D offset or position in surface units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Vec2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A bounding box in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }
}

/// Size of the content wrapper
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentExtent {
    pub width: f64,
    pub height: f64,
}

/// Top-left corner of a snap-eligible child, in scroll-offset space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
}

impl Anchor {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }
}

/// The scrollable element the engine drives.
///
/// Implementations report boxes in page coordinates. Measurement may fail if
/// the underlying element no longer exists; that is surfaced as
/// [`Error::Detached`] and never retried.
pub trait ScrollSurface {
    /// Current scroll offset
    fn scroll_offset(&self) -> Vec2;

    /// Write the scroll offset
    fn set_scroll_offset(&mut self, offset: Vec2);

    /// Bounding box of the container
    fn container_rect(&self) -> Result<Rect>;

    /// Bounding box of the content wrapper
    fn content_rect(&self) -> Result<Rect>;

    /// Bounding boxes of the content's direct children, in document order
    fn child_rects(&self) -> Result<Vec<Rect>>;
}

/// Viewport, content extent and child anchors captured together
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    viewport: Rect,
    content: ContentExtent,
    anchors: Vec<Anchor>,
    scrollbar_inset: f64,
}

impl Geometry {
    /// Measure a surface without disturbing its scroll offset.
    ///
    /// The offset is zeroed for the duration of the measurement and restored
    /// afterwards, also when a measurement fails.
    pub fn measure<S: ScrollSurface + ?Sized>(surface: &mut S, scrollbar_inset: f64) -> Result<Self> {
        let saved = surface.scroll_offset();
        surface.set_scroll_offset(Vec2::ZERO);

        let measured = Self::measure_at_origin(surface, scrollbar_inset);

        surface.set_scroll_offset(saved);
        measured
    }

    fn measure_at_origin<S: ScrollSurface + ?Sized>(surface: &S, scrollbar_inset: f64) -> Result<Self> {
        let viewport = surface.container_rect()?;
        let content_rect = surface.content_rect()?;
        let origin = viewport.origin();

        let anchors = surface
            .child_rects()?
            .into_iter()
            .map(|rect| {
                let pos = rect.origin() - origin;
                Anchor {
                    left: pos.x,
                    top: pos.y,
                }
            })
            .collect();

        Ok(Self {
            viewport,
            content: ContentExtent {
                width: content_rect.width,
                height: content_rect.height,
            },
            anchors,
            scrollbar_inset: if scrollbar_inset.is_finite() {
                scrollbar_inset
            } else {
                0.0
            },
        })
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn anchor(&self, index: usize) -> Option<Anchor> {
        self.anchors.get(index).copied()
    }

    /// Largest scroll offset per axis. Negative when the content fits.
    pub fn max_offset(&self) -> Vec2 {
        Vec2::new(
            self.content.width - self.viewport.width + self.scrollbar_inset,
            self.content.height - self.viewport.height + self.scrollbar_inset,
        )
    }

    /// Convert a page coordinate to container-relative
    pub fn relative(&self, page: Vec2) -> Vec2 {
        page - self.viewport.origin()
    }
}

/// Convenience for surfaces backed by optional elements
pub fn require<T>(value: Option<T>, what: &'static str) -> Result<T> {
    value.ok_or(Error::Detached(what))
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory surface that records every offset write.

    use super::*;

    #[derive(Debug, Clone)]
    pub struct RecordingSurface {
        pub container: Option<Rect>,
        pub content: Rect,
        pub children: Vec<Rect>,
        pub offset: Vec2,
        pub writes: Vec<Vec2>,
    }

    impl RecordingSurface {
        /// A container at `(left, top)` with equal-width children laid out
        /// horizontally and no vertical overflow
        pub fn row(left: f64, top: f64, viewport: f64, child_width: f64, children: usize) -> Self {
            let height = 100.0;
            Self {
                container: Some(Rect::new(left, top, viewport, height)),
                content: Rect::new(left, top, child_width * children as f64, height),
                children: (0..children)
                    .map(|i| Rect::new(left + child_width * i as f64, top, child_width, height))
                    .collect(),
                offset: Vec2::ZERO,
                writes: Vec::new(),
            }
        }

        pub fn clear_writes(&mut self) {
            self.writes.clear();
        }
    }

    impl ScrollSurface for RecordingSurface {
        fn scroll_offset(&self) -> Vec2 {
            self.offset
        }

        fn set_scroll_offset(&mut self, offset: Vec2) {
            self.offset = offset;
            self.writes.push(offset);
        }

        fn container_rect(&self) -> Result<Rect> {
            require(self.container, "container")
        }

        fn content_rect(&self) -> Result<Rect> {
            // Boxes move with the scroll offset, as the page would report them
            Ok(Rect::new(
                self.content.left - self.offset.x,
                self.content.top - self.offset.y,
                self.content.width,
                self.content.height,
            ))
        }

        fn child_rects(&self) -> Result<Vec<Rect>> {
            Ok(self
                .children
                .iter()
                .map(|r| Rect::new(r.left - self.offset.x, r.top - self.offset.y, r.width, r.height))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSurface;
    use super::*;

    #[test]
    fn test_measure_restores_offset() {
        let mut surface = RecordingSurface::row(10.0, 20.0, 300.0, 300.0, 3);
        surface.offset = Vec2::new(250.0, 0.0);

        let geometry = Geometry::measure(&mut surface, 0.0).unwrap();

        assert_eq!(surface.offset, Vec2::new(250.0, 0.0));
        assert_eq!(surface.writes.last(), Some(&Vec2::new(250.0, 0.0)));
        // Anchors measured at zero scroll, relative to the container
        let lefts: Vec<f64> = geometry.anchors().iter().map(|a| a.left).collect();
        assert_eq!(lefts, vec![0.0, 300.0, 600.0]);
        assert!(geometry.anchors().iter().all(|a| a.top == 0.0));
    }

    #[test]
    fn test_measure_is_idempotent() {
        let mut surface = RecordingSurface::row(0.0, 0.0, 300.0, 300.0, 3);
        surface.offset = Vec2::new(120.0, 0.0);
        let first = Geometry::measure(&mut surface, 0.0).unwrap();
        let second = Geometry::measure(&mut surface, 0.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_detached_container_restores_offset() {
        let mut surface = RecordingSurface::row(0.0, 0.0, 300.0, 300.0, 3);
        surface.offset = Vec2::new(42.0, 0.0);
        surface.container = None;

        let err = Geometry::measure(&mut surface, 0.0).unwrap_err();
        assert!(matches!(err, Error::Detached("container")));
        assert_eq!(surface.offset, Vec2::new(42.0, 0.0));
    }

    #[test]
    fn test_max_offset_with_scrollbar_inset() {
        let mut surface = RecordingSurface::row(0.0, 0.0, 300.0, 300.0, 3);
        let geometry = Geometry::measure(&mut surface, 17.0).unwrap();
        assert_eq!(geometry.max_offset(), Vec2::new(617.0, 17.0));
    }

    #[test]
    fn test_max_offset_negative_when_content_fits() {
        let mut surface = RecordingSurface::row(0.0, 0.0, 500.0, 100.0, 2);
        let geometry = Geometry::measure(&mut surface, 0.0).unwrap();
        assert!(geometry.max_offset().x < 0.0);
    }

    #[test]
    fn test_relative_position() {
        let mut surface = RecordingSurface::row(40.0, 60.0, 300.0, 300.0, 1);
        let geometry = Geometry::measure(&mut surface, 0.0).unwrap();
        assert_eq!(geometry.relative(Vec2::new(100.0, 70.0)), Vec2::new(60.0, 10.0));
    }

    #[test]
    fn test_distance() {
        assert_eq!(Vec2::new(0.0, 0.0).distance(Vec2::new(3.0, 4.0)), 5.0);
    }
}
