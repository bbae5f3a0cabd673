use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{error, info};

use altscroll_core::AppConfig;
use altscroll_tui::{
    app::{App, Mode},
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{CarouselWidget, PopupWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Altscroll"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config).await;
    if let Err(e) = &result {
        error!("Carousel exited with error: {:#}", e);
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Arc<AppConfig>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config.clone(), Rect::new(0, 0, size.width, size.height))?;

    let event_handler = EventHandler::new(
        Duration::from_millis(config.ui.tick_rate_ms),
        config.ui.frame_duration(),
    );

    // Frame rate for the next poll, decided at the end of each iteration
    let mut animating = false;

    // Main loop
    loop {
        terminal.draw(|frame| {
            let size = frame.area();
            CarouselWidget::render(frame, App::carousel_area(size), &app);
            StatusBarWidget::render(frame, App::status_area(size), &app);

            if app.mode == Mode::Help {
                PopupWidget::render_help(frame, &app.theme);
            }
        })?;

        let now = Instant::now();
        let timeout = event_handler.timeout(animating, app.engine.next_deadline(), now);

        if let Some(event) = event_handler.next(timeout)? {
            let now = Instant::now();
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    app.handle_action(now, action);
                }
                AppEvent::Mouse(mouse) => app.handle_mouse(now, mouse),
                AppEvent::Resize(width, height) => app.handle_resize(now, width, height),
                AppEvent::Tick => {}
            }
        }

        animating = app.tick(Instant::now()) || app.engine.is_dragging();

        if app.should_quit {
            break;
        }

        tokio::task::yield_now().await;
    }

    info!("Carousel closed");
    Ok(())
}
