use std::env;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::config::Settings;
use crate::engine::RodioEngine;
use crate::picker;
use crate::session::AudioSessionController;
use crate::tags::LoftyTagParser;
use crate::timeline;

mod event_loop;
mod logging;
mod startup;

/// Fall back to defaults when the config is unreadable or unusable; the
/// reason is returned so it can be reported once logging is up.
fn settings_or_defaults(loaded: Result<Settings, ::config::ConfigError>) -> (Settings, Option<String>) {
    match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (Settings::default(), Some(format!("invalid config ({msg})"))),
        },
        Err(e) => (Settings::default(), Some(format!("unreadable config ({e})"))),
    }
}

pub fn run() -> anyhow::Result<()> {
    let (settings, config_note) = settings_or_defaults(Settings::load());
    if let Some(note) = &config_note {
        // Still on the plain terminal here.
        eprintln!("wavecue: {note}, continuing with defaults");
    }
    let log_path = logging::init(&settings.logging);
    info!(log = ?log_path, "wavecue starting");
    if let Some(note) = config_note {
        warn!(%note, "using default settings");
    }

    let target = startup::resolve_target(env::args_os().nth(1))?;

    let entries = picker::scan(&target.root, &settings.picker);
    info!(root = %target.root.display(), files = entries.len(), "scanned picker root");
    let mut app = App::new(entries, timeline::default_events());
    app.set_root(target.root.clone());

    let engine = RodioEngine::spawn(startup::engine_settings(&settings))
        .context("failed to start the audio thread")?;
    let mut controller =
        AudioSessionController::new(engine, LoftyTagParser, startup::session_options(&settings));

    if let Some(entry) = &target.initial {
        startup::select_initial(&mut app, &entry.path);
        startup::bind_entry(&mut app, &mut controller, entry);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut controller);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.teardown();
    info!("wavecue exiting");
    run_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_settings_are_kept() {
        let mut s = Settings::default();
        s.controls.scrub_seconds = 9;
        let (kept, note) = settings_or_defaults(Ok(s));
        assert_eq!(kept.controls.scrub_seconds, 9);
        assert!(note.is_none());
    }

    #[test]
    fn invalid_settings_fall_back_with_a_reason() {
        let mut s = Settings::default();
        s.waveform.buckets = 0;
        s.controls.scrub_seconds = 9;
        let (used, note) = settings_or_defaults(Ok(s));
        assert_eq!(used.waveform.buckets, 512);
        assert_eq!(used.controls.scrub_seconds, 5);
        assert!(note.unwrap().contains("waveform.buckets"));
    }

    #[test]
    fn unreadable_config_falls_back_with_a_reason() {
        let err = ::config::ConfigError::Message("bad toml".to_string());
        let (used, note) = settings_or_defaults(Err(err));
        assert_eq!(used.playback.position_interval_ms, 100);
        assert!(note.unwrap().contains("bad toml"));
    }
}
