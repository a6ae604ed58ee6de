//! The keyboard view: seven white lanes with black keys floating over the
//! boundaries, drawn from the registry's geometry and highlighted from the
//! reconciler's active set.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use keybed::input::Reconciler;
use keybed::registry::{KeyColor, KeyLane, NOTES};

/// Fraction of the keyboard height covered by black keys.
const BLACK_KEY_HEIGHT: f32 = 0.6;

fn scale_x(frac: f32, area: Rect) -> u16 {
    area.x + (frac * area.width as f32).round() as u16
}

/// Terminal-cell rectangles for each key lane, in entry order.
///
/// Shared by rendering and mouse hit-testing so a click always lands on the
/// key it visually hit.
pub fn key_rects(lanes: &[KeyLane], area: Rect) -> Vec<(usize, Rect, KeyColor)> {
    let mut rects = Vec::with_capacity(lanes.len());
    if area.width == 0 || area.height == 0 {
        return rects;
    }

    let black_height = ((area.height as f32 * BLACK_KEY_HEIGHT).round() as u16)
        .clamp(1, area.height);

    for lane in lanes {
        let rect = match lane.color {
            KeyColor::White => {
                let x0 = scale_x(lane.x, area);
                let x1 = scale_x(lane.x + lane.width, area);
                Rect {
                    x: x0,
                    y: area.y,
                    width: x1.saturating_sub(x0).max(1),
                    height: area.height,
                }
            }
            KeyColor::Black => {
                let width = ((lane.width * area.width as f32).round() as u16).max(1);
                let center = scale_x(lane.center(), area);
                Rect {
                    x: center.saturating_sub(width / 2).max(area.x),
                    y: area.y,
                    width,
                    height: black_height,
                }
            }
        };
        rects.push((lane.index, rect, lane.color));
    }

    rects
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

/// Which key a terminal cell falls on, if any. Black keys sit on top of the
/// white lanes, so they win where the two overlap.
pub fn key_at(lanes: &[KeyLane], area: Rect, column: u16, row: u16) -> Option<usize> {
    let rects = key_rects(lanes, area);

    for &(index, rect, color) in &rects {
        if color == KeyColor::Black && rect_contains(rect, column, row) {
            return Some(index);
        }
    }
    for &(index, rect, color) in &rects {
        if color == KeyColor::White && rect_contains(rect, column, row) {
            return Some(index);
        }
    }
    None
}

/// Render the keyboard and return the inner area used for hit-testing.
pub fn render_keyboard(
    frame: &mut Frame,
    area: Rect,
    lanes: &[KeyLane],
    reconciler: &Reconciler,
) -> Rect {
    let block = Block::default().title(" Keyboard ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rects = key_rects(lanes, inner);

    // White keys first, black keys painted over them.
    for &(index, rect, _) in rects.iter().filter(|(_, _, c)| *c == KeyColor::White) {
        let pressed = reconciler.is_pressed(index);
        let style = if pressed {
            Style::default().bg(Color::Cyan).fg(Color::Black)
        } else {
            Style::default().bg(Color::White).fg(Color::Black)
        };

        let key = Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(style);
        frame.render_widget(key, rect);

        if rect.height >= 3 && rect.width >= 2 {
            let label_area = Rect {
                x: rect.x + 1,
                y: rect.y + rect.height - 2,
                width: rect.width - 1,
                height: 2,
            };
            let def = &NOTES[index];
            let label = Paragraph::new(vec![
                Line::from(def.label),
                Line::from(def.input_key.to_ascii_uppercase().to_string()),
            ])
            .alignment(Alignment::Center)
            .style(style);
            frame.render_widget(label, label_area);
        }
    }

    for &(index, rect, _) in rects.iter().filter(|(_, _, c)| *c == KeyColor::Black) {
        let pressed = reconciler.is_pressed(index);
        let style = if pressed {
            Style::default().bg(Color::Magenta).fg(Color::White)
        } else {
            Style::default().bg(Color::Black).fg(Color::Gray)
        };

        frame.render_widget(Block::default().style(style), rect);

        if rect.height >= 2 {
            let label_area = Rect {
                x: rect.x,
                y: rect.y + rect.height - 1,
                width: rect.width,
                height: 1,
            };
            let label = Paragraph::new(NOTES[index].input_key.to_string())
                .alignment(Alignment::Center)
                .style(style);
            frame.render_widget(label, label_area);
        }
    }

    inner
}
