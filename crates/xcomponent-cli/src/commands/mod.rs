//! CLI command implementations.

mod check;
mod extract;
mod render;

pub use check::{run_check, CheckArgs};
pub use extract::{run_extract, ExtractArgs};
pub use render::{run_render, RenderArgs};
