use std::io::Stdout;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::runtime::startup::bind_entry;
use crate::session::{AudioSessionController, TagParser, WaveformEngine};
use crate::ui;

/// Main terminal event loop: applies session events, draws and handles
/// input. Returns `Ok(())` when shutdown is requested.
pub fn run<E: WaveformEngine, P: TagParser>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut AudioSessionController<E, P>,
) -> anyhow::Result<()> {
    let scrub = i64::try_from(settings.controls.scrub_seconds).unwrap_or(i64::MAX);

    loop {
        controller.pump();

        let waveform = controller.waveform();
        terminal.draw(|f| ui::draw(f, app, controller.session(), waveform.as_ref(), settings))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, scrub, app, controller) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns true when the user asked to quit.
fn handle_key_event<E: WaveformEngine, P: TagParser>(
    key: KeyEvent,
    scrub: i64,
    app: &mut App,
    controller: &mut AudioSessionController<E, P>,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if let Some(entry) = app.selected_entry().cloned() {
                bind_entry(app, controller, &entry);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => controller.toggle_playback(),
        KeyCode::Char('s') => controller.stop(),
        KeyCode::Char('r') => controller.restart(),
        KeyCode::Char('h') | KeyCode::Left => controller.seek_by(-scrub),
        KeyCode::Char('l') | KeyCode::Right => controller.seek_by(scrub),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Esc if app.metadata_window => app.toggle_metadata_window(),
        _ => {}
    }
    false
}
