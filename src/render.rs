//! Drawing surface handed to windows.
//!
//! Windows lay themselves out in screen pixels and draw through [`Canvas`].
//! The terminal backend scales pixels down to cells and clips every call to
//! the visible area, so a window that drifts partly off-screen never writes
//! outside the buffer.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::geometry::{Point, Rectangle};

pub trait Canvas {
    /// Size of the drawable area in pixels.
    fn viewport(&self) -> Point;
    fn fill(&mut self, rect: Rectangle, color: Color);
    /// A bordered box with an optional title.
    fn frame(&mut self, rect: Rectangle, title: &str, color: Color);
    fn text(&mut self, pos: Point, text: &str, color: Color);
}

/// Pixels covered by one terminal cell.
pub const CELL_SIZE: Point = Point::new(8, 16);

/// Canvas over a ratatui buffer.
pub struct TerminalCanvas<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> TerminalCanvas<'a> {
    pub fn new(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    /// Converts a pixel position to the cell containing it.
    pub fn cell_of(pos: Point) -> (i32, i32) {
        (pos.x.div_euclid(CELL_SIZE.x), pos.y.div_euclid(CELL_SIZE.y))
    }

    /// Pixel position at the top-left corner of a cell.
    pub fn pixel_of(column: u16, row: u16) -> Point {
        Point::new(i32::from(column) * CELL_SIZE.x, i32::from(row) * CELL_SIZE.y)
    }

    fn clip_rect(&self, rect: Rectangle) -> Option<Rect> {
        let (x0, y0) = Self::cell_of(rect.origin);
        let (x1, y1) = Self::cell_of(Point::new(
            rect.right() + CELL_SIZE.x - 1,
            rect.bottom() + CELL_SIZE.y - 1,
        ));
        let left = x0.max(i32::from(self.area.x));
        let top = y0.max(i32::from(self.area.y));
        let right = x1.min(i32::from(self.area.right()));
        let bottom = y1.min(i32::from(self.area.bottom()));
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect {
            x: u16::try_from(left).ok()?,
            y: u16::try_from(top).ok()?,
            width: u16::try_from(right - left).ok()?,
            height: u16::try_from(bottom - top).ok()?,
        })
    }
}

impl Canvas for TerminalCanvas<'_> {
    fn viewport(&self) -> Point {
        Point::new(
            i32::from(self.area.width) * CELL_SIZE.x,
            i32::from(self.area.height) * CELL_SIZE.y,
        )
    }

    fn fill(&mut self, rect: Rectangle, color: Color) {
        if let Some(clipped) = self.clip_rect(rect) {
            self.buffer.set_style(clipped, Style::default().bg(color));
        }
    }

    fn frame(&mut self, rect: Rectangle, title: &str, color: Color) {
        if let Some(clipped) = self.clip_rect(rect) {
            Block::bordered()
                .title(title)
                .border_style(Style::default().fg(color))
                .render(clipped, self.buffer);
        }
    }

    fn text(&mut self, pos: Point, text: &str, color: Color) {
        let (x, y) = Self::cell_of(pos);
        let max_x = i32::from(self.area.right());
        if y < i32::from(self.area.y) || y >= i32::from(self.area.bottom()) || x >= max_x {
            return;
        }
        // Drop the characters that fall left of the visible area.
        let skip = usize::try_from(i32::from(self.area.x) - x).unwrap_or(0);
        let start = x.max(i32::from(self.area.x));
        let width = usize::try_from(max_x - start).unwrap_or(0);
        let visible: String = text.chars().skip(skip).take(width).collect();
        if visible.is_empty() {
            return;
        }
        if let (Ok(cx), Ok(cy)) = (u16::try_from(start), u16::try_from(y)) {
            self.buffer
                .set_string(cx, cy, visible, Style::default().fg(color));
        }
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Fill(Rectangle),
    Frame { rect: Rectangle, title: String },
    Text { pos: Point, text: String },
}

/// Canvas that remembers what was drawn, in order.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    viewport: Point,
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new(viewport: Point) -> Self {
        Self {
            viewport,
            calls: Vec::new(),
        }
    }

    /// Titles of every framed box, in draw order.
    pub fn frame_titles(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Frame { title, .. } => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn viewport(&self) -> Point {
        self.viewport
    }

    fn fill(&mut self, rect: Rectangle, _color: Color) {
        self.calls.push(DrawCall::Fill(rect));
    }

    fn frame(&mut self, rect: Rectangle, title: &str, _color: Color) {
        self.calls.push(DrawCall::Frame {
            rect,
            title: title.to_string(),
        });
    }

    fn text(&mut self, pos: Point, text: &str, _color: Color) {
        self.calls.push(DrawCall::Text {
            pos,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 4,
        }
    }

    #[test]
    fn text_is_clipped_on_the_left() {
        let mut buffer = Buffer::empty(area());
        let mut canvas = TerminalCanvas::new(area(), &mut buffer);
        canvas.text(Point::new(-16, 0), "abcdef", Color::White);
        assert_eq!(buffer.cell((0, 0)).unwrap().symbol(), "c");
    }

    #[test]
    fn offscreen_frame_is_ignored() {
        let mut buffer = Buffer::empty(area());
        let mut canvas = TerminalCanvas::new(area(), &mut buffer);
        canvas.frame(Rectangle::from_xywh(-400, -400, 16, 16), "x", Color::White);
        for y in 0..4 {
            for x in 0..10 {
                assert_eq!(buffer.cell((x, y)).unwrap().symbol(), " ");
            }
        }
    }

    #[test]
    fn viewport_scales_cells_to_pixels() {
        let mut buffer = Buffer::empty(area());
        let canvas = TerminalCanvas::new(area(), &mut buffer);
        assert_eq!(canvas.viewport(), Point::new(80, 64));
        assert_eq!(TerminalCanvas::pixel_of(2, 1), Point::new(16, 16));
    }
}
