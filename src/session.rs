//! Audio session: one loaded file, its tags and its transport state.
//!
//! `AudioSessionController` is the only owner of session state. The waveform
//! engine and the tag parser run elsewhere and report back through
//! `SessionEvent`s tagged with the `SessionToken` of the bind that started
//! them, so stale results from an older file are dropped on arrival.

mod collaborators;
mod controller;
mod events;
mod handles;
mod model;

pub use collaborators::*;
pub use controller::*;
pub use events::*;
pub use handles::*;
pub use model::*;
