use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_wavecue_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("WAVECUE_CONFIG_PATH", "/tmp/wavecue-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/wavecue-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("wavecue")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("wavecue")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_state_dir() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state")
            .join("wavecue")
            .join("wavecue.log")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_finish_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
on_finish = "reset"
position_interval_ms = 250

[controls]
scrub_seconds = 9

[waveform]
buckets = 128

[ui]
header_text = "hello"
show_events = false

[picker]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3

[logging]
filter = "wavecue=debug"
file = "/tmp/wavecue-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("WAVECUE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("WAVECUE__CONTROLS__SCRUB_SECONDS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.on_finish, FinishPolicySetting::Rewind);
    assert_eq!(s.playback.position_interval_ms, 250);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.waveform.buckets, 128);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_events);
    assert!(!s.picker.recursive);
    assert!(s.picker.include_hidden);
    assert!(!s.picker.follow_links);
    assert_eq!(s.picker.max_depth, Some(3));
    assert_eq!(s.logging.filter, "wavecue=debug");
    assert_eq!(
        s.logging.file,
        Some(std::path::PathBuf::from("/tmp/wavecue-test.log"))
    );
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
scrub_seconds = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("WAVECUE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("WAVECUE__CONTROLS__SCRUB_SECONDS", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 30);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "WAVECUE_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.on_finish, FinishPolicySetting::Hold);
    assert_eq!(s.controls.scrub_seconds, 5);
    assert_eq!(s.waveform.buckets, 512);
    assert!(s.ui.show_events);
}

#[test]
fn validate_rejects_zero_interval_and_buckets() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.playback.position_interval_ms = 0;
    assert!(s.validate().is_err());

    s.playback.position_interval_ms = 100;
    s.waveform.buckets = 0;
    assert!(s.validate().is_err());
}

#[test]
fn partial_toml_fragment_keeps_other_defaults() {
    let s: Settings = toml::from_str(
        r#"
[playback]
on_finish = "keep"
"#,
    )
    .unwrap();
    assert_eq!(s.playback.on_finish, FinishPolicySetting::Hold);
    assert_eq!(s.playback.position_interval_ms, 100);
    assert!(!s.picker.include_hidden);
    assert_eq!(s.logging.filter, "info");
}
