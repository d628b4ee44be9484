//! File picker: finds `audio/*` files under a directory and hands one over
//! as a `SourceFile`.

mod model;
mod scan;

pub use model::*;
pub use scan::{entry_for_path, is_audio_mime, scan};

#[cfg(test)]
mod tests;
