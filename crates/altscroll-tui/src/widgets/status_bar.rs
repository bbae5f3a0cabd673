use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            Self::summary(app)
        };

        let help_hint = " q:quit h/l:card s:snap esc:stop ?:help ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Mode, engine phase, offset and nearest card
    pub fn summary(app: &App) -> String {
        let mode_str = match app.mode {
            Mode::Normal => "NORMAL",
            Mode::Help => "HELP",
        };
        let nearest = app
            .engine
            .nearest_child()
            .map(|i| format!("{}/{}", i + 1, app.card_count()))
            .unwrap_or_else(|| "-".to_string());
        let snap = if app.config.scroll.snap { "on" } else { "off" };

        format!(
            " {} | {} | x: {:.1} | card: {} | snap: {}",
            mode_str,
            app.engine.phase().name(),
            app.offset().x,
            nearest,
            snap
        )
    }
}
