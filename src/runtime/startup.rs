use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tracing::{info, warn};

use crate::app::App;
use crate::config::{self, FinishPolicySetting};
use crate::engine::EngineSettings;
use crate::picker::{PickerEntry, entry_for_path};
use crate::session::{AudioSessionController, FinishPolicy, SessionOptions, TagParser, WaveformEngine};

/// What the command line asked for: a directory to list and maybe a file to
/// bind right away.
#[derive(Debug)]
pub struct Target {
    pub root: PathBuf,
    pub initial: Option<PickerEntry>,
}

pub fn resolve_target(arg: Option<OsString>) -> anyhow::Result<Target> {
    let path = match arg {
        Some(a) => PathBuf::from(a),
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };

    if path.is_dir() {
        return Ok(Target {
            root: path,
            initial: None,
        });
    }
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }

    let entry = entry_for_path(&path).with_context(|| format!("cannot open {}", path.display()))?;
    let root = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(Target {
        root,
        initial: Some(entry),
    })
}

pub fn session_options(settings: &config::Settings) -> SessionOptions {
    SessionOptions {
        finish_policy: match settings.playback.on_finish {
            FinishPolicySetting::Hold => FinishPolicy::Hold,
            FinishPolicySetting::Rewind => FinishPolicy::Rewind,
        },
    }
}

pub fn engine_settings(settings: &config::Settings) -> EngineSettings {
    EngineSettings {
        position_interval_ms: settings.playback.position_interval_ms,
        buckets: settings.waveform.buckets,
    }
}

/// Read `entry` and bind it; a read failure lands in the status row.
pub fn bind_entry<E: WaveformEngine, P: TagParser>(
    app: &mut App,
    controller: &mut AudioSessionController<E, P>,
    entry: &PickerEntry,
) {
    match entry.open() {
        Ok(file) => {
            info!(path = %entry.path.display(), bytes = file.len(), "binding file");
            app.clear_status();
            controller.bind_file(file);
        }
        Err(e) => {
            warn!(error = %e, "cannot open file");
            app.set_status(e.to_string());
        }
    }
}

/// Point the picker cursor at `path` when the listing contains it.
pub fn select_initial(app: &mut App, path: &Path) {
    if !app.select_path(path) {
        let canonical = path.canonicalize().ok();
        if let Some(idx) = app
            .entries
            .iter()
            .position(|e| e.path.canonicalize().ok() == canonical)
        {
            app.set_selected(idx);
        }
    }
}
