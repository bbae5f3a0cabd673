use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::surface::{Card, CardStrip};
use crate::theme::Theme;

pub struct CarouselWidget;

impl CarouselWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        Self::render_to_buffer(frame.buffer_mut(), area, app.engine.surface(), &app.theme);
    }

    /// Paint the visible slice of the strip column by column
    pub fn render_to_buffer(buf: &mut Buffer, area: Rect, strip: &CardStrip, theme: &Theme) {
        let background = Style::default().bg(theme.bg0);
        let offset = strip.column_offset();

        for x in area.left()..area.right() {
            let content_column = offset + (x - area.x) as i32;

            for y in area.top()..area.bottom() {
                let Some(cell) = buf.cell_mut((x, y)) else {
                    continue;
                };
                cell.reset();
                cell.set_style(background);

                if let Some((index, local)) = strip.card_at(content_column) {
                    let card = &strip.cards()[index];
                    let row = y - area.y;
                    let glyph = card_glyph(card, local, row, strip.card_width(), area.height);
                    let style = if is_border(local, row, strip.card_width(), area.height) {
                        Style::default().fg(theme.card_color(index)).bg(theme.bg1)
                    } else if row == area.height / 2 {
                        Style::default()
                            .fg(theme.fg0)
                            .bg(theme.bg1)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.grey2).bg(theme.bg1)
                    };
                    cell.set_style(style);
                    if let Some(glyph) = glyph {
                        cell.set_char(glyph);
                    }
                }
            }
        }
    }
}

fn is_border(local: u16, row: u16, width: u16, height: u16) -> bool {
    local == 0 || local + 1 == width || row == 0 || row + 1 == height
}

/// Character drawn at column `local`, row `row` of a card
fn card_glyph(card: &Card, local: u16, row: u16, width: u16, height: u16) -> Option<char> {
    let last_col = width.saturating_sub(1);
    let last_row = height.saturating_sub(1);

    let border = match (local, row) {
        (0, 0) => Some('┌'),
        (c, 0) if c == last_col => Some('┐'),
        (0, r) if r == last_row => Some('└'),
        (c, r) if c == last_col && r == last_row => Some('┘'),
        (_, 0) => Some('─'),
        (_, r) if r == last_row => Some('─'),
        (0, _) => Some('│'),
        (c, _) if c == last_col => Some('│'),
        _ => None,
    };
    if border.is_some() {
        return border;
    }

    let inner = width.saturating_sub(2) as usize;
    let middle = height / 2;
    let text = if row == middle {
        card.title.as_str()
    } else if row == middle + 1 {
        card.body.as_str()
    } else {
        return Some(' ');
    };
    centered_char_at(text, inner, (local - 1) as usize)
}

/// Character at `column` of `text` centered in `width` cells.
///
/// `None` for the trailing half of a wide character, which the buffer
/// already covers.
fn centered_char_at(text: &str, width: usize, column: usize) -> Option<char> {
    let text_width: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if text_width > width {
        return Some(' ');
    }
    let start = (width - text_width) / 2;
    if column < start {
        return Some(' ');
    }

    let mut at = start;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if w == 0 {
            continue;
        }
        if column == at {
            return Some(c);
        }
        if column < at + w {
            return None;
        }
        at += w;
    }
    Some(' ')
}
