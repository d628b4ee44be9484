//! Configuration loader and schema types.
//!
//! Settings come from an optional TOML file and `WAVECUE__*` environment
//! variables, layered over struct defaults.

mod load;
mod schema;

pub use load::{default_config_path, default_log_path, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
