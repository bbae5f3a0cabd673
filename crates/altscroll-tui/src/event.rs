use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    frame_rate: Duration,
}

impl EventHandler {
    /// `frame_rate` applies while an animation is running, `tick_rate` otherwise
    pub fn new(tick_rate: Duration, frame_rate: Duration) -> Self {
        Self {
            tick_rate,
            frame_rate,
        }
    }

    /// How long to wait for input before emitting a tick
    pub fn timeout(&self, animating: bool, deadline: Option<Instant>, now: Instant) -> Duration {
        let base = if animating { self.frame_rate } else { self.tick_rate };
        match deadline {
            Some(deadline) => base.min(deadline.saturating_duration_since(now)),
            None => base,
        }
    }

    /// Poll for the next event
    pub fn next(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse button, drag or wheel
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}
