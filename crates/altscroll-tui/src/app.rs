use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use altscroll_core::{AppConfig, ScrollEngine, ScrollSurface, Vec2};
use anyhow::{Context, Result};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::input::Action;
use crate::surface::CardStrip;
use crate::theme::Theme;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Help,
}

/// Main application state
pub struct App {
    /// Scroll engine driving the card strip
    pub engine: ScrollEngine<CardStrip>,
    /// Configuration
    pub config: Arc<AppConfig>,
    /// Theme colors
    pub theme: Theme,
    /// Current mode
    pub mode: Mode,
    /// Should quit flag
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Card the last keyboard snap is heading to, so repeated presses
    /// advance past a snap that has not landed yet
    target_card: Option<usize>,
    /// Written by snap completions, read back on tick
    arrived: Rc<Cell<Option<usize>>>,
}

impl App {
    /// Lay the carousel out inside a terminal of `size` and measure it
    pub fn new(config: Arc<AppConfig>, size: Rect) -> Result<Self> {
        let ui = &config.ui;
        let mut strip = CardStrip::numbered(ui.cards, ui.card_width, ui.card_gap);
        strip.set_area(Self::carousel_area(size));

        let engine = ScrollEngine::new(strip, config.scroll.clone(), ui.scrollbar_inset)
            .context("Terminal too small for the carousel")?;

        info!(
            cards = ui.cards,
            snap = config.scroll.snap,
            momentum = config.scroll.momentum,
            "Carousel ready"
        );

        Ok(Self {
            engine,
            config,
            theme: Theme::default(),
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            target_card: None,
            arrived: Rc::new(Cell::new(None)),
        })
    }

    /// Carousel region of the screen: everything between a one-row top
    /// margin and the status bar
    pub fn carousel_area(size: Rect) -> Rect {
        Rect::new(
            size.x,
            size.y.saturating_add(1),
            size.width,
            size.height.saturating_sub(3),
        )
    }

    /// Status bar region at the bottom of the screen
    pub fn status_area(size: Rect) -> Rect {
        Rect::new(
            size.x,
            size.y + size.height.saturating_sub(1),
            size.width,
            size.height.min(1),
        )
    }

    pub fn card_count(&self) -> usize {
        self.engine.surface().cards().len()
    }

    pub fn handle_mouse(&mut self, now: Instant, mouse: MouseEvent) {
        if self.mode == Mode::Help {
            return;
        }
        let page = Vec2::new(mouse.column as f64, mouse.row as f64);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.target_card = None;
                self.engine.on_pointer_down(now, page);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.engine.on_pointer_move(page),
            MouseEventKind::Up(MouseButton::Left) => self.engine.on_pointer_up(now, page),
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => self.nudge(now, 1.0),
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => self.nudge(now, -1.0),
            _ => {}
        }
    }

    /// Wheel step of one card stride, which also restarts the idle snap timer
    fn nudge(&mut self, now: Instant, direction: f64) {
        self.target_card = None;
        let stride = self.engine.surface().stride() as f64;
        let target = self.engine.offset() + Vec2::new(stride * direction, 0.0);
        let duration = self.config.scroll.snap_speed() / 2.0;
        self.engine.scroll_to(now, target, duration, None, None);
        self.engine.on_wheel_activity(now);
    }

    pub fn handle_action(&mut self, now: Instant, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextCard => self.step_card(now, 1),
            Action::PrevCard => self.step_card(now, -1),
            Action::FirstCard => self.go_to_card(now, 0),
            Action::LastCard => {
                let last = self.card_count().saturating_sub(1);
                self.go_to_card(now, last);
            }
            Action::SnapNearest => {
                self.target_card = None;
                if let Err(e) = self.engine.snap_to_nearest(now, None, None, None) {
                    self.set_status(format!("Snap failed: {}", e));
                }
            }
            Action::Stop => {
                self.target_card = None;
                self.engine.stop();
                self.set_status("Stopped");
            }
            Action::ToggleHelp => self.mode = Mode::Help,
            Action::ExitMode => self.mode = Mode::Normal,
            Action::None => {}
        }
    }

    fn step_card(&mut self, now: Instant, delta: isize) {
        let Some(current) = self.target_card.or_else(|| self.engine.nearest_child()) else {
            self.set_status("No cards");
            return;
        };
        let last = self.card_count().saturating_sub(1);
        let next = current.saturating_add_signed(delta).min(last);
        self.go_to_card(now, next);
    }

    fn go_to_card(&mut self, now: Instant, index: usize) {
        let arrived = Rc::clone(&self.arrived);
        let on_complete = Box::new(move |_: Vec2| arrived.set(Some(index)));

        match self.engine.snap_to(now, index, None, None, Some(on_complete)) {
            Ok(()) => {
                self.target_card = Some(index);
                self.clear_status();
            }
            Err(e) => self.set_status(format!("Snap failed: {}", e)),
        }
    }

    /// Terminal resized. The engine re-measures once resizing settles.
    pub fn handle_resize(&mut self, now: Instant, width: u16, height: u16) {
        let area = Self::carousel_area(Rect::new(0, 0, width, height));
        debug!(width, height, "Terminal resized");
        self.engine.surface_mut().set_area(area);
        self.engine.on_resize(now);
    }

    /// Advance animations and timers. Returns true while more frames are needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let busy = self.engine.frame(now);

        if let Some(index) = self.arrived.take() {
            self.set_status(format!("Card {} of {}", index + 1, self.card_count()));
        }
        if !self.engine.is_animating() {
            self.target_card = None;
        }
        busy
    }

    /// Current scroll offset in columns
    pub fn offset(&self) -> Vec2 {
        self.engine.surface().scroll_offset()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn config(snap: bool) -> Arc<AppConfig> {
        let mut config = AppConfig::default();
        config.scroll.snap = snap;
        config.ui.cards = 5;
        config.ui.card_width = 20;
        config.ui.card_gap = 2;
        Arc::new(config)
    }

    fn app(snap: bool) -> App {
        App::new(config(snap), Rect::new(0, 0, 40, 12)).unwrap()
    }

    fn mouse(kind: MouseEventKind, column: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row: 5,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn settle(app: &mut App, start: Instant) -> Instant {
        let mut now = start;
        for _ in 0..200 {
            now += Duration::from_millis(16);
            if !app.tick(now) {
                break;
            }
        }
        now
    }

    #[test]
    fn test_carousel_area_leaves_room_for_status_bar() {
        let size = Rect::new(0, 0, 80, 24);
        assert_eq!(App::carousel_area(size), Rect::new(0, 1, 80, 21));
        assert_eq!(App::status_area(size), Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn test_tiny_terminal_is_rejected() {
        assert!(App::new(config(false), Rect::new(0, 0, 40, 2)).is_err());
    }

    #[test]
    fn test_next_card_snaps_and_reports_arrival() {
        let mut app = app(false);
        let start = Instant::now();

        app.handle_action(start, Action::NextCard);
        assert!(app.engine.is_animating());
        settle(&mut app, start);

        assert_eq!(app.offset(), Vec2::new(22.0, 0.0));
        assert_eq!(app.status_message.as_deref(), Some("Card 2 of 5"));
    }

    #[test]
    fn test_repeated_next_advances_past_unfinished_snap() {
        let mut app = app(false);
        let start = Instant::now();

        app.handle_action(start, Action::NextCard);
        app.handle_action(start, Action::NextCard);
        settle(&mut app, start);

        assert_eq!(app.offset(), Vec2::new(44.0, 0.0));
    }

    #[test]
    fn test_last_card_clamps_to_scroll_range() {
        let mut app = app(false);
        let start = Instant::now();

        app.handle_action(start, Action::LastCard);
        settle(&mut app, start);

        // Content is 5 * 22 - 2 = 108 wide in a 40 column viewport
        assert_eq!(app.offset(), Vec2::new(68.0, 0.0));
    }

    #[test]
    fn test_mouse_drag_moves_strip() {
        let mut app = app(false);
        let now = Instant::now();

        app.handle_mouse(now, mouse(MouseEventKind::Down(MouseButton::Left), 30));
        app.handle_mouse(now, mouse(MouseEventKind::Drag(MouseButton::Left), 20));

        assert!(app.engine.is_dragging());
        assert_eq!(app.offset(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_drag_release_with_snap_lands_on_card() {
        let mut app = app(true);
        let start = Instant::now();

        app.handle_mouse(start, mouse(MouseEventKind::Down(MouseButton::Left), 30));
        app.handle_mouse(start, mouse(MouseEventKind::Drag(MouseButton::Left), 15));
        app.handle_mouse(
            start + Duration::from_millis(500),
            mouse(MouseEventKind::Up(MouseButton::Left), 15),
        );
        settle(&mut app, start + Duration::from_millis(500));

        let x = app.offset().x;
        assert!([0.0, 22.0, 44.0, 66.0, 68.0].contains(&x), "landed at {x}");
        assert!(!app.engine.is_animating());
    }

    #[test]
    fn test_wheel_nudges_one_stride() {
        let mut app = app(false);
        let start = Instant::now();

        app.handle_mouse(start, mouse(MouseEventKind::ScrollDown, 10));
        settle(&mut app, start);

        assert_eq!(app.offset(), Vec2::new(22.0, 0.0));
    }

    #[test]
    fn test_stop_halts_animation() {
        let mut app = app(false);
        let now = Instant::now();

        app.handle_action(now, Action::LastCard);
        app.handle_action(now, Action::Stop);

        assert!(!app.engine.is_animating());
        assert_eq!(app.status_message.as_deref(), Some("Stopped"));
    }

    #[test]
    fn test_help_mode_swallows_mouse() {
        let mut app = app(false);
        let now = Instant::now();

        app.handle_action(now, Action::ToggleHelp);
        app.handle_mouse(now, mouse(MouseEventKind::Down(MouseButton::Left), 30));
        assert!(!app.engine.is_dragging());

        app.handle_action(now, Action::ExitMode);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_resize_refreshes_after_debounce() {
        let mut app = app(false);
        let start = Instant::now();

        app.handle_resize(start, 100, 12);
        assert_eq!(app.engine.geometry().viewport().width, 40.0);

        app.tick(start + app.config.scroll.resize_debounce());
        assert_eq!(app.engine.geometry().viewport().width, 100.0);
    }
}
