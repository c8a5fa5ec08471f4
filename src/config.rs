//! Configuration loader and schema types.
//!
//! Settings tune the session (tick interval, frame calibration), the audio
//! output and the terminal controls. Everything is optional; missing values
//! fall back to the struct defaults.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;

#[cfg(test)]
mod tests;
