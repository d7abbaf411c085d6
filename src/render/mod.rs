//! Output rendering for the CLI.

pub mod text;

pub use text::render_listing;
