use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders,
    },
    Frame,
};

use crate::{
    core::{RenderSurface, StatusSink},
    types::{ColorId, Vec2},
};

/// Braille markers pack 2x4 dots into one terminal cell.
pub const DOTS_PER_COL: f64 = 2.0;
pub const DOTS_PER_ROW: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TaggedLine {
    pub tag: String,
    pub from: Vec2,
    pub to: Vec2,
    pub color: ColorId,
}

/// Retained display list the playback controller draws into. Coordinates
/// are in dots with the origin at the top-left, like a windowing canvas.
#[derive(Debug, Default)]
pub struct FanCanvas {
    width: f64,
    height: f64,
    lines: Vec<TaggedLine>,
    status: Option<(String, ColorId)>,
    dirty: bool,
}

impl FanCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the surface to the inner area of a bordered block.
    pub fn fit(&mut self, area: Rect) {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let width = inner.width as f64 * DOTS_PER_COL;
        let height = inner.height as f64 * DOTS_PER_ROW;
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.dirty = true;
        }
    }

    pub fn lines(&self) -> &[TaggedLine] {
        &self.lines
    }

    pub fn status(&self) -> Option<&(String, ColorId)> {
        self.status.as_ref()
    }

    /// Returns whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl RenderSurface for FanCanvas {
    fn clear(&mut self, tag: &str) {
        self.lines.retain(|line| line.tag != tag);
        self.dirty = true;
    }

    fn draw_line(&mut self, tag: &str, from: Vec2, to: Vec2, color: ColorId) {
        self.lines.push(TaggedLine {
            tag: tag.to_string(),
            from,
            to,
            color,
        });
        self.dirty = true;
    }

    fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

impl StatusSink for FanCanvas {
    fn show_status(&mut self, text: &str, color: ColorId) {
        self.status = Some((text.to_string(), color));
        self.dirty = true;
    }
}

pub fn draw(frame: &mut Frame, area: Rect, canvas: &FanCanvas, title: &str) {
    let height = canvas.height;
    let widget = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .background_color(Color::Black)
        .marker(Marker::Braille)
        .x_bounds([0.0, canvas.width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for line in &canvas.lines {
                ctx.draw(&CanvasLine {
                    x1: line.from.x,
                    y1: height - line.from.y,
                    x2: line.to.x,
                    y2: height - line.to.y,
                    color: color_for(line.color),
                });
            }
            if let Some((text, color)) = &canvas.status {
                ctx.print(
                    0.0,
                    height,
                    Line::from(Span::styled(
                        text.clone(),
                        Style::default()
                            .fg(color_for(*color))
                            .add_modifier(Modifier::BOLD),
                    )),
                );
            }
        });
    frame.render_widget(widget, area);
}

pub fn color_for(color: ColorId) -> Color {
    match color {
        ColorId::Blade => Color::White,
        ColorId::MarkedBlade => Color::Red,
        ColorId::Running => Color::Green,
        ColorId::Stopped => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer.get(x, y).symbol().to_string())
            .collect()
    }

    mod fan_canvas {
        use super::*;

        #[test]
        fn fit_uses_braille_resolution_inside_border() {
            let mut canvas = FanCanvas::new();
            canvas.fit(Rect::new(0, 0, 42, 12));
            assert_eq!(canvas.dimensions(), (80.0, 40.0));
            assert!(canvas.take_dirty());
            assert!(!canvas.take_dirty());
        }

        #[test]
        fn fit_with_same_area_stays_clean() {
            let mut canvas = FanCanvas::new();
            canvas.fit(Rect::new(0, 0, 10, 10));
            canvas.take_dirty();
            canvas.fit(Rect::new(0, 0, 10, 10));
            assert!(!canvas.take_dirty());
        }

        #[test]
        fn clear_removes_only_matching_tag() {
            let mut canvas = FanCanvas::new();
            canvas.draw_line("fan", Vec2::ZERO, Vec2::new(1.0, 1.0), ColorId::Blade);
            canvas.draw_line("hub", Vec2::ZERO, Vec2::new(2.0, 2.0), ColorId::Blade);
            canvas.clear("fan");
            assert_eq!(canvas.lines().len(), 1);
            assert_eq!(canvas.lines()[0].tag, "hub");
        }

        #[test]
        fn status_replaces_previous() {
            let mut canvas = FanCanvas::new();
            canvas.show_status("Simulation Running...", ColorId::Running);
            canvas.show_status("Simulation Stopped.", ColorId::Stopped);
            assert_eq!(
                canvas.status(),
                Some(&("Simulation Stopped.".to_string(), ColorId::Stopped))
            );
        }
    }

    mod color_for_fn {
        use super::*;

        #[test]
        fn marked_blade_stands_out() {
            assert_eq!(color_for(ColorId::Blade), Color::White);
            assert_eq!(color_for(ColorId::MarkedBlade), Color::Red);
        }

        #[test]
        fn status_colors() {
            assert_eq!(color_for(ColorId::Running), Color::Green);
            assert_eq!(color_for(ColorId::Stopped), Color::Red);
        }
    }

    mod draw_fn {
        use super::*;

        fn render(canvas: &FanCanvas, width: u16, height: u16) -> Buffer {
            let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
            terminal
                .draw(|frame| draw(frame, frame.size(), canvas, "Fan"))
                .unwrap();
            terminal.backend().buffer().clone()
        }

        #[test]
        fn empty_canvas_is_blank_inside_border() {
            let mut canvas = FanCanvas::new();
            canvas.fit(Rect::new(0, 0, 20, 10));
            let buffer = render(&canvas, 20, 10);
            for y in 1..9 {
                for x in 1..19 {
                    assert_eq!(buffer.get(x, y).symbol(), " ");
                }
            }
        }

        #[test]
        fn status_is_printed_top_left() {
            let mut canvas = FanCanvas::new();
            canvas.fit(Rect::new(0, 0, 40, 10));
            canvas.show_status("Simulation Stopped.", ColorId::Stopped);
            let buffer = render(&canvas, 40, 10);
            assert!(row_text(&buffer, 1).contains("Simulation Stopped."));
        }

        #[test]
        fn blade_lines_light_up_cells() {
            let mut canvas = FanCanvas::new();
            canvas.fit(Rect::new(0, 0, 22, 12));
            let (w, h) = canvas.dimensions();
            canvas.draw_line(
                "fan",
                Vec2::new(w / 2.0, h / 2.0),
                Vec2::new(w - 1.0, h / 2.0),
                ColorId::Blade,
            );
            let buffer = render(&canvas, 22, 12);
            let lit = (1..11)
                .flat_map(|y| (1..21).map(move |x| (x, y)))
                .filter(|&(x, y)| buffer.get(x, y).symbol() != " ")
                .count();
            assert!(lit >= 5, "lit {lit}");
        }
    }
}
