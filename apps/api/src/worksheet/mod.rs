// Printable dictation worksheet generator.
// Implements: word selection, font resolution, text fitting, cell drawing, pagination, PDF output.
// Layout and serialization are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod canvas;
pub mod cell;
pub mod composer;
pub mod font_metrics;
pub mod font_resolver;
pub mod generator;
pub mod handlers;
pub mod layout;
pub mod pdf;
pub mod request;
pub mod selection;
pub mod text_fit;

#[cfg(test)]
pub mod test_fonts;

// Re-export the public API consumed by main and the router.
pub use font_resolver::{FontHandle, FontResolver};
