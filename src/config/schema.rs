use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/wavecue/config.toml` or `~/.config/wavecue/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `WAVECUE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub waveform: WaveformSettings,
    pub ui: UiSettings,
    pub picker: PickerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Where the playhead goes when a file plays to the end.
    pub on_finish: FinishPolicySetting,
    /// How often the engine reports the position while playing (milliseconds).
    pub position_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            on_finish: FinishPolicySetting::Hold,
            position_interval_ms: 100,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinishPolicySetting {
    #[serde(alias = "keep", alias = "stay")]
    Hold,
    #[serde(alias = "reset", alias = "rewind-to-start")]
    Rewind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `h` / `l`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveformSettings {
    /// Resolution of the decoded peak envelope.
    pub buckets: usize,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self { buckets: 512 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether to show the timeline events pane.
    pub show_events: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ drop in, look closer ~ ".to_string(),
            show_events: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickerSettings {
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub filter: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/wavecue/wavecue.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}
