use super::*;
use crate::config::PickerSettings;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn names(entries: &[PickerEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn is_audio_mime_matches_top_level_type() {
    assert!(is_audio_mime("audio/mpeg"));
    assert!(is_audio_mime("AUDIO/flac"));
    assert!(!is_audio_mime("video/mp4"));
    assert!(!is_audio_mime("application/octet-stream"));
    assert!(!is_audio_mime(""));
}

#[test]
fn scan_keeps_audio_only_and_sorts_case_insensitive() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.flac"), b"not a real flac").unwrap();
    fs::write(dir.path().join("c.wav"), b"not a real wav").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();
    fs::write(dir.path().join("cover.jpg"), b"ignore me too").unwrap();

    let entries = scan(dir.path(), &PickerSettings::default());
    assert_eq!(names(&entries), vec!["A.flac", "b.MP3", "c.wav"]);
    assert!(entries.iter().all(|e| e.mime.starts_with("audio/")));
    assert_eq!(entries[0].len, "not a real flac".len() as u64);
}

#[test]
fn scan_skips_hidden_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"x").unwrap();

    let entries = scan(dir.path(), &PickerSettings::default());
    assert_eq!(names(&entries), vec!["visible.mp3"]);

    let settings = PickerSettings {
        include_hidden: true,
        ..PickerSettings::default()
    };
    assert_eq!(scan(dir.path(), &settings).len(), 2);
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"x").unwrap();

    let settings = PickerSettings {
        recursive: false,
        ..PickerSettings::default()
    };
    assert_eq!(names(&scan(dir.path(), &settings)), vec!["root.mp3"]);
    assert_eq!(scan(dir.path(), &PickerSettings::default()).len(), 2);
}

#[test]
fn scan_respects_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    fs::write(d1.join("one.mp3"), b"x").unwrap();
    fs::write(d2.join("two.mp3"), b"x").unwrap();

    // WalkDir depth counts root as 0, children as 1, grandchildren as 2.
    let settings = PickerSettings {
        max_depth: Some(2),
        ..PickerSettings::default()
    };
    let found = scan(dir.path(), &settings);
    assert_eq!(names(&found), vec!["one.mp3", "root.mp3"]);
}

#[test]
fn entry_for_path_rejects_non_audio() {
    let dir = tempdir().unwrap();
    let txt = dir.path().join("readme.txt");
    fs::write(&txt, b"hi").unwrap();

    match entry_for_path(&txt) {
        Err(PickError::NotAudio { mime, .. }) => assert_eq!(mime, "text/plain"),
        other => panic!("expected NotAudio, got {:?}", other),
    }
}

#[test]
fn entry_for_path_reports_missing_file() {
    let err = entry_for_path(Path::new("/definitely/not/here.mp3")).unwrap_err();
    assert!(matches!(err, PickError::Io { .. }));
}

#[test]
fn open_reads_bytes_into_source_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("track.mp3");
    fs::write(&path, b"ID3 pretend").unwrap();

    let entry = entry_for_path(&path).unwrap();
    assert_eq!(entry.name, "track.mp3");
    assert_eq!(entry.mime, "audio/mpeg");
    assert_eq!(entry.len, 11);

    let file = entry.open().unwrap();
    assert_eq!(file.name, "track.mp3");
    assert_eq!(file.mime, "audio/mpeg");
    assert_eq!(&file.bytes[..], b"ID3 pretend");
}
