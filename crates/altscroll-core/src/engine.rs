//! L2 Organism Layer: Interaction state machine
//!
//! Owns the surface, the geometry snapshot and the single live phase. Hosts
//! feed it normalized input events and call [`ScrollEngine::frame`] while
//! [`ScrollEngine::needs_frame`] is true or a timer deadline has passed.
//!
//! Every time-sensitive entry point takes `now`; the engine never reads the
//! clock itself.

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::clamp::clamp;
use crate::config::ScrollConfig;
use crate::debounce::Debouncer;
use crate::drag::{self, DragSession};
use crate::geometry::{Geometry, ScrollSurface, Vec2};
use crate::scroll::{Completion, EasingType, OnComplete, Step, Tween, TweenKind};
use crate::snap;
use crate::{Error, Result};

/// What the engine is doing right now
#[derive(Debug, Default)]
pub enum Phase {
    #[default]
    Idle,
    Dragging(DragSession),
    Animating(Tween),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Dragging(_) => "dragging",
            Phase::Animating(_) => "animating",
        }
    }
}

pub struct ScrollEngine<S: ScrollSurface> {
    surface: S,
    config: ScrollConfig,
    scrollbar_inset: f64,
    geometry: Geometry,
    phase: Phase,
    resize: Debouncer,
    idle_snap: Debouncer,
}

impl<S: ScrollSurface> ScrollEngine<S> {
    /// Validate the configuration and take the first geometry snapshot
    pub fn new(mut surface: S, config: ScrollConfig, scrollbar_inset: f64) -> Result<Self> {
        config.validate()?;
        let geometry = Geometry::measure(&mut surface, scrollbar_inset)?;

        debug!(
            children = geometry.anchors().len(),
            max_x = geometry.max_offset().x,
            max_y = geometry.max_offset().y,
            "Scroll engine ready"
        );

        Ok(Self {
            resize: Debouncer::new(config.resize_debounce()),
            idle_snap: Debouncer::new(config.snap_idle()),
            surface,
            config,
            scrollbar_inset,
            geometry,
            phase: Phase::Idle,
        })
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for hosts that resize or restyle the surface.
    /// Offset writes made through it bypass the engine.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.surface.scroll_offset()
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating(_))
    }

    /// True while a tween wants per-frame updates
    #[inline]
    pub fn needs_frame(&self) -> bool {
        self.is_animating()
    }

    /// Earliest pending timer, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.resize.deadline(), self.idle_snap.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ───────────────────────────────────────── programmatic ──────

    /// Animate to `target` over `duration_ms`.
    ///
    /// The target is clamped to the scrollable range and the duration shrunk
    /// by the same proportion. Any live animation or drag is replaced.
    pub fn scroll_to(
        &mut self,
        now: Instant,
        target: Vec2,
        duration_ms: f64,
        easing: Option<EasingType>,
        on_complete: Option<OnComplete>,
    ) {
        self.start_tween(
            now,
            target,
            duration_ms,
            easing,
            TweenKind::Programmatic,
            Completion::from_callback(on_complete),
        );
    }

    /// Animate to child `index`. Fails without side effects when the index
    /// is out of range.
    ///
    /// A missing or negative duration uses `snap_speed_ms`; a missing easing
    /// uses the configured curve.
    pub fn snap_to(
        &mut self,
        now: Instant,
        index: usize,
        duration_ms: Option<f64>,
        easing: Option<EasingType>,
        on_complete: Option<OnComplete>,
    ) -> Result<()> {
        self.snap_with(
            now,
            index,
            duration_ms,
            easing,
            TweenKind::Snap,
            Completion::from_callback(on_complete),
        )
    }

    /// Animate to the child nearest the current offset and return its index
    pub fn snap_to_nearest(
        &mut self,
        now: Instant,
        duration_ms: Option<f64>,
        easing: Option<EasingType>,
        on_complete: Option<OnComplete>,
    ) -> Result<usize> {
        let index = self.nearest_child().ok_or(Error::NoChildren)?;
        self.snap_to(now, index, duration_ms, easing, on_complete)?;
        Ok(index)
    }

    /// Child whose anchor is closest to the current offset
    pub fn nearest_child(&self) -> Option<usize> {
        snap::nearest(self.geometry.anchors(), self.offset())
    }

    /// Cancel the live animation or drag and any pending idle snap.
    /// Completion callbacks of the cancelled animation are dropped uncalled.
    pub fn stop(&mut self) {
        self.idle_snap.cancel();
        let previous = std::mem::take(&mut self.phase);
        if !matches!(previous, Phase::Idle) {
            debug!(phase = previous.name(), "Scroll stopped");
        }
    }

    /// Re-measure the surface now. The scroll offset is left untouched.
    pub fn refresh_geometry(&mut self) -> Result<()> {
        self.geometry = Geometry::measure(&mut self.surface, self.scrollbar_inset)?;
        debug!(
            children = self.geometry.anchors().len(),
            max_x = self.geometry.max_offset().x,
            max_y = self.geometry.max_offset().y,
            "Geometry refreshed"
        );
        Ok(())
    }

    // ───────────────────────────────────────── input events ──────

    /// Open a drag session. Ignored while one is already open.
    pub fn on_pointer_down(&mut self, now: Instant, page: Vec2) {
        if self.is_dragging() {
            trace!("Pointer down during drag ignored");
            return;
        }
        self.stop();

        let pointer = self.geometry.relative(page);
        let offset = self.offset();
        self.phase = Phase::Dragging(DragSession::begin(now, pointer, offset));
        debug!(x = pointer.x, y = pointer.y, "Drag started");
    }

    /// Reposition instantly so the content follows the pointer
    pub fn on_pointer_move(&mut self, page: Vec2) {
        if let Phase::Dragging(session) = &self.phase {
            let target = session.target(self.geometry.relative(page));
            self.drag_to(target);
        }
    }

    /// Close the drag session and start momentum or a snap
    pub fn on_pointer_up(&mut self, now: Instant, page: Vec2) {
        let session = match std::mem::take(&mut self.phase) {
            Phase::Dragging(session) => session,
            other => {
                self.phase = other;
                return;
            }
        };

        let pointer = self.geometry.relative(page);
        self.drag_to(session.target(pointer));
        let release = session.finish(now, pointer);

        if self.config.momentum && !release.delta.is_zero() {
            let momentum = release
                .velocity()
                .and_then(|velocity| drag::project(velocity, self.config.momentum_falloff));

            if let Some(momentum) = momentum {
                debug!(
                    dx = momentum.displacement.x,
                    dy = momentum.displacement.y,
                    duration_ms = momentum.duration_ms,
                    "Drag released with momentum"
                );
                let completion = if self.config.snap {
                    Completion::SnapToNearest
                } else {
                    Completion::None
                };
                let target = self.offset() + momentum.displacement;
                self.start_tween(
                    now,
                    target,
                    momentum.duration_ms,
                    Some(self.config.easing),
                    TweenKind::Momentum,
                    completion,
                );
                return;
            }
        }

        if self.config.snap {
            self.snap_nearest_quietly(now, TweenKind::Snap);
        } else {
            debug!("Drag released");
        }
    }

    /// Wheel or native scroll activity. Restarts the idle-snap timer.
    ///
    /// Muted while an idle snap is animating, since that animation is the
    /// source of the activity.
    pub fn on_wheel_activity(&mut self, now: Instant) {
        if !self.config.snap {
            return;
        }
        if let Phase::Animating(tween) = &self.phase {
            if tween.kind() == TweenKind::IdleSnap {
                trace!("Scroll activity muted during idle snap");
                return;
            }
        }
        self.idle_snap.trigger(now);
    }

    /// Viewport changed size. Geometry is refreshed once things settle.
    pub fn on_resize(&mut self, now: Instant) {
        if self.config.dynamic_resize {
            self.resize.trigger(now);
        }
    }

    // ───────────────────────────────────────── frame loop ────────

    /// Advance the live animation and fire due timers.
    ///
    /// Returns [`Self::needs_frame`] after the update.
    pub fn frame(&mut self, now: Instant) -> bool {
        if let Phase::Animating(tween) = &self.phase {
            match tween.step(now) {
                Step::Continue(offset) => {
                    trace!(x = offset.x, y = offset.y, "Tween frame");
                    self.surface.set_scroll_offset(offset);
                }
                Step::Finished(offset) => {
                    self.surface.set_scroll_offset(offset);
                    if let Phase::Animating(tween) = std::mem::take(&mut self.phase) {
                        debug!(kind = ?tween.kind(), x = offset.x, y = offset.y, "Tween finished");
                        self.complete(now, tween.into_completion(), offset);
                    }
                }
            }
        }

        if self.resize.poll(now) {
            self.settle_resize();
        }

        if self.idle_snap.poll(now) {
            debug!("Scroll idle, snapping to nearest child");
            self.snap_nearest_quietly(now, TweenKind::IdleSnap);
        }

        self.needs_frame()
    }

    // ───────────────────────────────────────── internals ─────────

    fn start_tween(
        &mut self,
        now: Instant,
        target: Vec2,
        duration_ms: f64,
        easing: Option<EasingType>,
        kind: TweenKind,
        completion: Completion,
    ) {
        let current = self.offset();
        let clamped = clamp(target, current, self.geometry.max_offset());
        let duration_ms = duration_ms * clamped.speed_scale;

        if self.is_dragging() {
            debug!(?kind, "Animation replaces open drag session");
        }
        trace!(
            ?kind,
            from_x = current.x,
            from_y = current.y,
            to_x = clamped.offset.x,
            to_y = clamped.offset.y,
            duration_ms,
            "Tween started"
        );

        self.phase = Phase::Animating(Tween::new(
            now,
            current,
            clamped.offset,
            duration_ms,
            easing,
            kind,
            completion,
        ));
    }

    fn snap_with(
        &mut self,
        now: Instant,
        index: usize,
        duration_ms: Option<f64>,
        easing: Option<EasingType>,
        kind: TweenKind,
        completion: Completion,
    ) -> Result<()> {
        let anchor = self
            .geometry
            .anchor(index)
            .ok_or(Error::SnapIndexOutOfRange {
                index,
                len: self.geometry.anchors().len(),
            })?;

        let duration_ms = duration_ms
            .filter(|d| *d >= 0.0)
            .unwrap_or_else(|| self.config.snap_speed());
        let easing = easing.or(Some(self.config.easing));

        debug!(index, ?kind, "Snapping to child");
        self.start_tween(now, anchor.position(), duration_ms, easing, kind, completion);
        Ok(())
    }

    /// Snap to the nearest child with default timing, tolerating an empty
    /// surface
    fn snap_nearest_quietly(&mut self, now: Instant, kind: TweenKind) {
        match self.nearest_child() {
            Some(index) => {
                if let Err(e) = self.snap_with(now, index, None, None, kind, Completion::None) {
                    debug!("Snap skipped: {}", e);
                }
            }
            None => debug!("Snap skipped: {}", Error::NoChildren),
        }
    }

    fn complete(&mut self, now: Instant, completion: Completion, offset: Vec2) {
        match completion {
            Completion::None => {}
            Completion::Notify(callback) => callback(offset),
            Completion::SnapToNearest => self.snap_nearest_quietly(now, TweenKind::Snap),
        }
    }

    fn drag_to(&mut self, target: Vec2) {
        let clamped = clamp(target, self.offset(), self.geometry.max_offset());
        self.surface.set_scroll_offset(clamped.offset);
    }

    fn settle_resize(&mut self) {
        if let Phase::Animating(tween) = &self.phase {
            debug!(kind = ?tween.kind(), "Resize cancels animation");
            self.phase = Phase::Idle;
        }
        if let Err(e) = self.refresh_geometry() {
            warn!("Geometry refresh after resize failed, keeping previous snapshot: {}", e);
        }
    }
}
