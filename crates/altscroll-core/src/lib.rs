//! Custom-driven scroll surfaces: drag capture, momentum, edge clamping,
//! tweened animation and snap-to-child alignment.
//!
//! The engine is host-agnostic. A host implements [`ScrollSurface`] for its
//! container, forwards normalized input to [`ScrollEngine`], and calls
//! [`ScrollEngine::frame`] from its frame loop.

pub mod clamp;
pub mod config;
pub mod debounce;
pub mod drag;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod scroll;
pub mod snap;

pub use config::{AppConfig, ScrollConfig, UiConfig};
pub use engine::{Phase, ScrollEngine};
pub use error::{Error, Result};
pub use geometry::{Anchor, ContentExtent, Geometry, Rect, ScrollSurface, Vec2};
pub use scroll::{EasingType, OnComplete};
