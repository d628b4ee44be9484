//! Application module: the presentation model used by the TUI and runtime.
//!
//! `App` holds the picker list, the cursor and overlay flags. Session state
//! itself lives in the controller and is read at draw time.

mod model;

pub use model::*;
