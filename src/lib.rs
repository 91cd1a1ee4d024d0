//! # gramviz
//!
//! Declarative statistical chart rendering. A chart is a set of views (data +
//! aesthetic mappings + mark + optional statistical transform); the pipeline
//! runs each view's transform, merges the resulting axis domains, builds
//! scales and a coordinate projector, and renders panels into a vector scene
//! graph.
//!
//! ## Pipeline
//!
//! ```text
//! View(s) -> transform -> {computed data, domains} -> merge -> scales
//!         -> projector -> panel render -> composed canvas
//! ```
//!
//! - **Transforms**: identity, bin (Sturges histograms), regress (least
//!   squares), smooth (local regression), count.
//! - **Coordinates**: cartesian, flipped, and polar through one projector
//!   abstraction; bars become arc-munched polygons under polar.
//! - **Layout**: single panel, variable grids (scatterplot matrices), and
//!   row/column faceting with shared or free scales.
//!
//! ## Quick Start
//!
//! ```rust
//! use gramviz::prelude::*;
//!
//! let data = DataFrame::from_xy(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 1.0, 5.0]);
//! let view = View::new(data).x("x").y("y");
//! let canvas = plot(&[view], &PlotOptions::default()).unwrap();
//! let svg = to_svg(&canvas);
//! assert!(svg.starts_with("<svg"));
//! ```

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and the categorical palette.
pub mod color;

/// Columnar data abstraction.
pub mod data;

/// Axis domains and merge rules.
pub mod domain;

/// Vector scene graph.
pub mod scene;

// ============================================================================
// Pipeline Modules
// ============================================================================

/// Declarative chart layers.
pub mod view;

/// Statistical transforms.
pub mod transform;

/// Scale construction.
pub mod scale;

/// Coordinate projection.
pub mod coord;

/// Mark drawing routines.
pub mod marks;

/// Panel rendering.
pub mod panel;

/// Layout composition.
pub mod layout;

/// Theme configuration.
pub mod theme;

// ============================================================================
// Output Modules
// ============================================================================

/// Output encoders (SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for gramviz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust
/// use gramviz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{ColorMap, Rgba};
    pub use crate::coord::{CoordKind, PanelGeom, Projector};
    pub use crate::data::{DataFrame, DataValue};
    pub use crate::domain::Domain;
    pub use crate::error::{Error, Result};
    pub use crate::layout::{plot, PlotOptions, Sharing};
    pub use crate::output::{to_svg, write_svg};
    pub use crate::panel::{render_panel, PanelOptions};
    pub use crate::scale::{Scale, ScaleSpec};
    pub use crate::scene::{Canvas, Group, Shape, Style};
    pub use crate::theme::Theme;
    pub use crate::transform::{compute, Computed, TransformResult};
    pub use crate::view::{MarkKind, Position, TransformKind, View};
}
