use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use strikepad::{KeyId, Rgb};

use crate::sim::SimBoard;

const COLS: usize = 4;
const ROWS: usize = 4;

const PAD_LABELS: [&str; 16] = [
    "1", "2", "3", "4",
    "Q", "W", "E", "R",
    "A", "S", "D", "F",
    "Z", "X", "C", "V",
];

// one cell per key, split into its two pixels; a firing solenoid shows as a
// bright border around the cell
pub fn draw_pad_grid(frame: &mut Frame, area: Rect, board: &SimBoard, held: &[bool; 16]) {
    let row_constraints = [Constraint::Ratio(1, ROWS as u32); ROWS];
    let col_constraints = [Constraint::Ratio(1, COLS as u32); COLS];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints)
            .split(*row_area);

        for (col_idx, cell_area) in cols.iter().enumerate() {
            let idx = row_idx * COLS + col_idx;
            let Some(key) = KeyId::new(idx as u8) else {
                continue;
            };
            draw_key(frame, *cell_area, board, key, held[idx]);
        }
    }
}

fn draw_key(frame: &mut Frame, area: Rect, board: &SimBoard, key: KeyId, held: bool) {
    let border = if board.solenoid(key.solenoid()) {
        Style::default().fg(Color::White)
    } else if held {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(PAD_LABELS[key.index()]);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50); 2])
        .split(inner);
    for (half, pixel) in halves.iter().zip(key.pixels()) {
        let fill = Paragraph::new(Line::raw("")).style(Style::default().bg(to_color(board.pixel(pixel))));
        frame.render_widget(fill, *half);
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}
