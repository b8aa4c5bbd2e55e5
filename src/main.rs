mod sim;
mod tui;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use anyhow::Context;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use strikepad::config::config_file_path;
use strikepad::{dispatch, link_channel, load_config, save_config, Clock, DeviceConfig, Middle, MonotonicClock};
use sim::{PeerCommand, SimBoard};
use tui::input::SimAction;

const DRAW_PERIOD: Duration = Duration::from_millis(33); // ~30fps

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let project_dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let config = load_or_init_config(&project_dir)?;
    init_logging(&project_dir)?;
    log::info!("strikepad simulator, config {}", config_file_path(&project_dir).display());

    terminal::enable_raw_mode()?;
    // Enable keyboard enhancement for real press/release detection.
    // Falls back to timed taps if the terminal doesn't support it.
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::PushKeyboardEnhancementFlags(
            crossterm::event::KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        )
    );
    let _guard = RawModeGuard; // auto drops when out of scope

    let (bridge, inbox) = link_channel();
    let peer = sim::spawn_peer(bridge, &config.simulator);
    let mut board = SimBoard::new(peer.packet_sender());
    if config.simulator.auto_pair {
        peer.send(PeerCommand::TogglePair);
    }

    let clock = MonotonicClock::new();
    let poll_period = Duration::from_millis(config.simulator.poll_ms);
    let mut tui_state = tui::mode::TuiState::new(config.simulator.tap_hold_ms);
    let mut middle = Middle::new(config);

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;
    let mut last_draw: Option<Instant> = None;

    loop {
        let now = clock.now_ms();
        for action in tui::input::poll_input(poll_period, &mut tui_state, now)? {
            match action {
                SimAction::Quit => {
                    drop(term);
                    peer.shutdown();
                    return Ok(());
                }
                SimAction::Peer(cmd) => peer.send(cmd),
            }
        }

        let now = clock.now_ms();
        tui_state.expire(now);
        board.set_lines(tui_state.matrix(), tui_state.buttons());
        let cmds = middle.poll(now, &mut board, &inbox);
        dispatch(&mut board, cmds);

        if last_draw.is_none_or(|t| t.elapsed() >= DRAW_PERIOD) {
            last_draw = Some(Instant::now());
            let ds = middle.display_state();
            term.draw(|frame| {
                let area = frame.area();
                tui::view::render(frame, area, &ds, &board, &tui_state);
            })?;
        }
    }
}

// first run writes the defaults out so there is a file to edit
fn load_or_init_config(dir: &Path) -> anyhow::Result<DeviceConfig> {
    let path = config_file_path(dir);
    let config = load_config(dir).with_context(|| format!("failed to load {}", path.display()))?;
    if !path.exists() {
        save_config(dir, &config).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(config)
}

// the terminal belongs to the ui, so logs go to .strikepad/strikepad.log
fn init_logging(dir: &Path) -> anyhow::Result<()> {
    let log_path = config_file_path(dir).with_file_name("strikepad.log");
    let file = std::fs::File::create(&log_path)
        .with_context(|| format!("failed to create {}", log_path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags
        );
        let _ = terminal::disable_raw_mode();
    }
}
