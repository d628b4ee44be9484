use std::path::Path;

use walkdir::WalkDir;

use crate::config::PickerSettings;

use super::model::{PickError, PickerEntry};

/// Whether a MIME type matches the `audio/*` pattern.
pub fn is_audio_mime(mime: &str) -> bool {
    mime.split('/')
        .next()
        .is_some_and(|top| top.eq_ignore_ascii_case("audio"))
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Build an entry for a single path given directly (e.g. on the command line).
pub fn entry_for_path(path: &Path) -> Result<PickerEntry, PickError> {
    let mime = guess_mime(path);
    if !is_audio_mime(&mime) {
        return Err(PickError::NotAudio {
            path: path.to_path_buf(),
            mime,
        });
    }
    let meta = std::fs::metadata(path).map_err(|e| PickError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(PickerEntry {
        path: path.to_path_buf(),
        name: file_name(path),
        mime,
        len: meta.len(),
    })
}

/// List audio files under `dir`, sorted case-insensitively by name.
pub fn scan(dir: &Path, settings: &PickerSettings) -> Vec<PickerEntry> {
    let mut entries: Vec<PickerEntry> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() && !entry.path().is_file() {
            continue;
        }
        let path = entry.path();
        let mime = guess_mime(path);
        if !is_audio_mime(&mime) {
            continue;
        }
        let len = entry.metadata().map(|m| m.len()).unwrap_or(0);
        entries.push(PickerEntry {
            path: path.to_path_buf(),
            name: file_name(path),
            mime,
            len,
        });
    }

    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.path.cmp(&b.path))
    });
    entries
}
