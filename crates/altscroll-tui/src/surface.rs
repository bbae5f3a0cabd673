//! A horizontal strip of cards exposed to the engine as a scroll surface.
//!
//! Page coordinates are terminal cells, so mouse positions from crossterm
//! can be handed to the engine unchanged.

use altscroll_core::geometry::require;
use altscroll_core::{Rect as PageRect, Result, ScrollSurface, Vec2};
use ratatui::layout::Rect;

/// One card in the strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct CardStrip {
    /// Container area on screen; `None` before the first layout
    area: Option<Rect>,
    cards: Vec<Card>,
    card_width: u16,
    card_gap: u16,
    offset: Vec2,
}

impl CardStrip {
    pub fn new(cards: Vec<Card>, card_width: u16, card_gap: u16) -> Self {
        Self {
            area: None,
            cards,
            card_width: card_width.max(1),
            card_gap,
            offset: Vec2::ZERO,
        }
    }

    /// Numbered demo cards
    pub fn numbered(count: usize, card_width: u16, card_gap: u16) -> Self {
        let cards = (1..=count)
            .map(|i| Card {
                title: format!("Card {i}"),
                body: format!("{i} of {count}"),
            })
            .collect();
        Self::new(cards, card_width, card_gap)
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = if area.width == 0 || area.height == 0 {
            None
        } else {
            Some(area)
        };
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_width(&self) -> u16 {
        self.card_width
    }

    /// Distance between the left edges of neighbouring cards
    pub fn stride(&self) -> u32 {
        self.card_width as u32 + self.card_gap as u32
    }

    /// Total content width in cells. Wider than any terminal, so kept out of `u16`.
    pub fn content_width(&self) -> f64 {
        if self.cards.is_empty() {
            0.0
        } else {
            self.cards.len() as f64 * self.stride() as f64 - self.card_gap as f64
        }
    }

    /// Horizontal offset snapped to whole cells for drawing
    pub fn column_offset(&self) -> i32 {
        self.offset.x.round() as i32
    }

    /// Card index and column within it for a content column, if the column
    /// falls on a card rather than a gap
    pub fn card_at(&self, content_column: i32) -> Option<(usize, u16)> {
        if content_column < 0 {
            return None;
        }
        let stride = self.stride() as i64;
        let content_column = content_column as i64;
        let index = (content_column / stride) as usize;
        let local = content_column % stride;
        if index < self.cards.len() && local < self.card_width as i64 {
            Some((index, local as u16))
        } else {
            None
        }
    }

    fn container(&self) -> Result<PageRect> {
        let area = require(self.area, "card strip")?;
        Ok(PageRect::new(
            area.x as f64,
            area.y as f64,
            area.width as f64,
            area.height as f64,
        ))
    }
}

impl ScrollSurface for CardStrip {
    fn scroll_offset(&self) -> Vec2 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    fn container_rect(&self) -> Result<PageRect> {
        self.container()
    }

    fn content_rect(&self) -> Result<PageRect> {
        let container = self.container()?;
        Ok(PageRect::new(
            container.left - self.offset.x,
            container.top - self.offset.y,
            self.content_width(),
            container.height,
        ))
    }

    fn child_rects(&self) -> Result<Vec<PageRect>> {
        let container = self.container()?;
        let stride = self.stride() as f64;
        Ok((0..self.cards.len())
            .map(|i| {
                PageRect::new(
                    container.left + stride * i as f64 - self.offset.x,
                    container.top - self.offset.y,
                    self.card_width as f64,
                    container.height,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use altscroll_core::Geometry;

    fn strip() -> CardStrip {
        let mut strip = CardStrip::numbered(4, 20, 2);
        strip.set_area(Rect::new(3, 1, 40, 10));
        strip
    }

    #[test]
    fn test_content_width_excludes_trailing_gap() {
        assert_eq!(strip().content_width(), (4 * 22 - 2) as f64);
        assert_eq!(CardStrip::numbered(0, 20, 2).content_width(), 0.0);
    }

    #[test]
    fn test_long_strip_does_not_overflow() {
        let mut strip = CardStrip::numbered(3000, 24, 2);
        assert_eq!(strip.stride(), 26);
        assert_eq!(strip.content_width(), 3000.0 * 26.0 - 2.0);

        strip.set_area(Rect::new(0, 0, 80, 10));
        let geometry = Geometry::measure(&mut strip, 0.0).unwrap();
        assert_eq!(geometry.max_offset().x, 3000.0 * 26.0 - 2.0 - 80.0);
        assert_eq!(strip.card_at(2999 * 26 + 3), Some((2999, 3)));
    }

    #[test]
    fn test_geometry_anchors_at_card_starts() {
        let mut strip = strip();
        strip.set_scroll_offset(Vec2::new(13.0, 0.0));
        let geometry = Geometry::measure(&mut strip, 0.0).unwrap();

        let lefts: Vec<f64> = geometry.anchors().iter().map(|a| a.left).collect();
        assert_eq!(lefts, vec![0.0, 22.0, 44.0, 66.0]);
        assert_eq!(geometry.max_offset(), Vec2::new(86.0 - 40.0, 0.0));
        assert_eq!(strip.scroll_offset(), Vec2::new(13.0, 0.0));
    }

    #[test]
    fn test_unlaid_out_strip_is_detached() {
        let mut strip = CardStrip::numbered(2, 10, 1);
        assert!(Geometry::measure(&mut strip, 0.0).is_err());
        strip.set_area(Rect::new(0, 0, 0, 5));
        assert!(strip.area().is_none());
    }

    #[test]
    fn test_card_at() {
        let strip = strip();
        assert_eq!(strip.card_at(0), Some((0, 0)));
        assert_eq!(strip.card_at(19), Some((0, 19)));
        assert_eq!(strip.card_at(20), None);
        assert_eq!(strip.card_at(23), Some((1, 1)));
        assert_eq!(strip.card_at(-1), None);
        assert_eq!(strip.card_at(86), None);
    }
}
