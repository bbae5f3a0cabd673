//! Tweened scrolling for the Altscroll engine
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (cubic, quintic, exponential)
//! - `timing` - Time calculation utilities (progress, interpolation)
//!
//! ## L3 Molecular Layer
//! - `animation` - A single tween combining the atoms
//!
//! # Usage
//!
//! ```ignore
//! use altscroll_core::scroll::{Completion, Step, Tween, TweenKind};
//!
//! let tween = Tween::new(now, from, to, 300.0, Some(EasingType::Cubic),
//!     TweenKind::Programmatic, Completion::None);
//!
//! // Each frame, sample and write the offset
//! match tween.step(Instant::now()) {
//!     Step::Continue(offset) => surface.set_scroll_offset(offset),
//!     Step::Finished(offset) => { surface.set_scroll_offset(offset); /* done */ }
//! }
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod timing;

// L3 Molecular Layer
pub mod animation;

// Re-exports for convenient access
pub use animation::{Completion, OnComplete, Step, Tween, TweenKind};
pub use easing::EasingType;
