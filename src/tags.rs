//! Embedded tag reading with `lofty`, straight from the in-memory file.

use std::borrow::Cow;
use std::io::Cursor;

use lofty::file::{FileType, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;

use crate::session::{TagBundle, TagError, TagParser, TagPicture};

#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagParser;

impl TagParser for LoftyTagParser {
    fn parse(&self, bytes: &[u8], mime: &str) -> Result<TagBundle, TagError> {
        let mut reader = Probe::new(Cursor::new(bytes))
            .guess_file_type()
            .map_err(|e| TagError::Io(e.to_string()))?;

        // Content sniffing first; the declared type only breaks ties.
        if reader.file_type().is_none() {
            if let Some(ft) = file_type_for_mime(mime) {
                reader = reader.set_file_type(ft);
            }
        }
        if reader.file_type().is_none() {
            return Err(TagError::UnsupportedContainer(mime.to_string()));
        }

        let tagged = reader.read().map_err(|e| TagError::Parse(e.to_string()))?;
        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(TagBundle::default());
        };

        let pictures = tag
            .pictures()
            .iter()
            .map(|pic| TagPicture {
                data: pic.data().to_vec(),
                format: pic
                    .mime_type()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
            })
            .collect();

        Ok(TagBundle {
            title: clean(tag.title()),
            artist: clean(tag.artist()),
            album: clean(tag.album()),
            pictures,
        })
    }
}

fn clean(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim_matches(|c: char| c.is_whitespace() || c == '\0').to_string())
        .filter(|v| !v.is_empty())
}

/// Map a declared MIME type to a lofty container via its known extensions.
fn file_type_for_mime(mime: &str) -> Option<FileType> {
    mime_guess::get_mime_extensions_str(mime)?
        .iter()
        .find_map(FileType::from_ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{tone, wav_bytes};

    #[test]
    fn reads_riff_info_tags_from_wav() {
        let bytes = wav_bytes(
            &tone(8000),
            8000,
            1,
            &[(b"INAM", "Song X"), (b"IART", "Artist Y"), (b"IPRD", "Album Z")],
        );
        let bundle = LoftyTagParser.parse(&bytes, "audio/wav").unwrap();
        assert_eq!(bundle.title.as_deref(), Some("Song X"));
        assert_eq!(bundle.artist.as_deref(), Some("Artist Y"));
        assert_eq!(bundle.album.as_deref(), Some("Album Z"));
        assert!(bundle.pictures.is_empty());
    }

    #[test]
    fn wav_without_tags_yields_empty_bundle() {
        let bytes = wav_bytes(&tone(8000), 8000, 1, &[]);
        let bundle = LoftyTagParser.parse(&bytes, "audio/wav").unwrap();
        assert_eq!(bundle, TagBundle::default());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(
            LoftyTagParser
                .parse(b"this is not audio at all", "audio/x-unknown-thing")
                .is_err()
        );
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let bytes = wav_bytes(&tone(8000), 8000, 1, &[]);
        assert!(LoftyTagParser.parse(&bytes[..20], "audio/wav").is_err());
    }

    #[test]
    fn clean_trims_and_drops_blank_values() {
        assert_eq!(clean(Some(Cow::Borrowed("  a  "))), Some("a".to_string()));
        assert_eq!(clean(Some(Cow::Borrowed("   "))), None);
        assert_eq!(clean(Some(Cow::Borrowed("Name\0"))), Some("Name".to_string()));
        assert_eq!(clean(None), None);
    }

    #[test]
    fn declared_mime_maps_to_container() {
        assert_eq!(file_type_for_mime("audio/flac"), Some(FileType::Flac));
        assert_eq!(file_type_for_mime("text/plain"), None);
    }
}
