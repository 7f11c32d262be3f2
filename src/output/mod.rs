//! Rendering of registry summaries for humans and machines.

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::render_summary;
