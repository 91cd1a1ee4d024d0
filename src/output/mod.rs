//! Output encoders for composed scenes.

mod svg;

pub use svg::{to_svg, write_svg};
