use strikepad::leds::mode_color;
use strikepad::{ButtonId, DisplayState, Mode};
use ratatui::layout::{Layout, Direction, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::sim::SimBoard;
use super::grid::{draw_pad_grid, to_color};
use super::mode::TuiState;

const BUTTON_KEYS: [&str; 8] = ["5", "6", "7", "8", "T", "Y", "U", "I"];

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, board: &SimBoard, ts: &TuiState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // status screen
            Constraint::Length(3), // mode buttons
            Constraint::Min(12), // pad grid
            Constraint::Length(8), // outbound traffic
            Constraint::Length(1), // help
        ])
        .split(area);

    draw_screen(frame, sections[0], state, board);
    draw_mode_row(frame, sections[1], state, &ts.buttons());
    draw_pad_grid(frame, sections[2], board, &ts.matrix());
    draw_activity(frame, sections[3], board);
    draw_help(frame, sections[4], ts);
}

fn draw_screen(frame: &mut Frame, area: Rect, state: &DisplayState, board: &SimBoard) {
    let link = match (state.paired, state.resyncing, state.wired_mode) {
        (true, true, _) => "PAIRED (resync)",
        (true, false, _) => "PAIRED",
        (false, _, true) => "WIRED",
        (false, _, false) => "ADVERTISING",
    };
    let transport = if state.playing { "PLAY" } else { "STOP" };
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{:<6}", state.mode.label()),
                Style::default().fg(to_color(mode_color(state.mode))).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {} bpm  {transport}  step {:>2}", state.bpm, state.current_step + 1)),
        ]),
        Line::raw(format!(
            "{link}  rec:{}  coils:{}  queue:{}  strikes:{}",
            if state.peer_recording { "on" } else { "off" },
            state.active_solenoids,
            state.sync_queue_len,
            board.strikes(),
        )),
    ];
    let screen = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("strikepad"));
    frame.render_widget(screen, area);
}

fn draw_mode_row(frame: &mut Frame, area: Rect, state: &DisplayState, held: &[bool; 8]) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 8); 8])
        .split(area);
    for button in ButtonId::all() {
        let mode: Mode = button.mode();
        let mut style = Style::default().fg(to_color(mode_color(mode)));
        if mode == state.mode {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if held[button.index()] {
            style = style.add_modifier(Modifier::BOLD);
        }
        let cell = Paragraph::new(mode.label())
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(BUTTON_KEYS[button.index()]));
        frame.render_widget(cell, cells[button.index()]);
    }
}

fn draw_activity(frame: &mut Frame, area: Rect, board: &SimBoard) {
    let lines: Vec<Line> = board.activity().map(Line::raw).collect();
    let log = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title("out"));
    frame.render_widget(log, area);
}

fn draw_help(frame: &mut Frame, area: Rect, ts: &TuiState) {
    let taps = if ts.exact_releases() { "" } else { "  (taps)" };
    let help = format!("pad 1-4 q-r a-f z-v  modes 5-8 t-i  p pair  space play  +/- tempo  esc quit{taps}");
    frame.render_widget(Paragraph::new(help).style(Style::default().fg(Color::DarkGray)), area);
}
