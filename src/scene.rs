//! Vector scene graph.
//!
//! The rendering pipeline emits a [`Canvas`]: an explicit width/height plus a
//! tree of [`Group`]s holding primitive [`Shape`]s. Rasterization and
//! serialization are external concerns; the [`crate::output`] module provides
//! an SVG writer.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Fill/stroke attributes shared by all shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Fill color (None for unfilled shapes).
    pub fill: Option<Rgba>,
    /// Stroke color (None for unstroked shapes).
    pub stroke: Option<Rgba>,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    /// Overall opacity (0.0-1.0).
    pub opacity: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: Some(Rgba::BLACK), stroke: None, stroke_width: 1.0, opacity: 1.0 }
    }
}

impl Style {
    /// Filled style with no stroke.
    #[must_use]
    pub fn fill(color: Rgba) -> Self {
        Self { fill: Some(color), stroke: None, stroke_width: 0.0, opacity: 1.0 }
    }

    /// Stroked style with no fill.
    #[must_use]
    pub fn stroke(color: Rgba, width: f32) -> Self {
        Self { fill: None, stroke: Some(color), stroke_width: width, opacity: 1.0 }
    }

    /// Same style at a different opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Same style with a stroke added.
    #[must_use]
    pub fn with_stroke(mut self, color: Rgba, width: f32) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }
}

/// Text anchor position for horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAnchor {
    /// Align text start at position.
    #[default]
    Start,
    /// Center text at position.
    Middle,
    /// Align text end at position.
    End,
}

/// A primitive vector shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rect {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width in pixels.
        width: f32,
        /// Height in pixels.
        height: f32,
        /// Fill/stroke attributes.
        style: Style,
    },
    /// Circle.
    Circle {
        /// Center x.
        cx: f32,
        /// Center y.
        cy: f32,
        /// Radius.
        r: f32,
        /// Fill/stroke attributes.
        style: Style,
    },
    /// Line segment.
    Line {
        /// Start x.
        x1: f32,
        /// Start y.
        y1: f32,
        /// End x.
        x2: f32,
        /// End y.
        y2: f32,
        /// Fill/stroke attributes.
        style: Style,
    },
    /// Open sequence of connected segments.
    Polyline {
        /// Vertex positions.
        points: Vec<(f32, f32)>,
        /// Fill/stroke attributes.
        style: Style,
    },
    /// Closed polygon.
    Polygon {
        /// Vertex positions.
        points: Vec<(f32, f32)>,
        /// Fill/stroke attributes.
        style: Style,
    },
    /// Text label.
    Text {
        /// Anchor x.
        x: f32,
        /// Baseline y.
        y: f32,
        /// Label content.
        text: String,
        /// Font size in pixels.
        size: f32,
        /// Text color.
        color: Rgba,
        /// Horizontal anchor.
        anchor: TextAnchor,
    },
}

/// A group of shapes and nested groups, offset as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    /// Translation applied to everything in the group.
    pub offset: (f32, f32),
    /// Shapes in draw order.
    pub shapes: Vec<Shape>,
    /// Nested groups, drawn after this group's own shapes.
    pub children: Vec<Group>,
}

impl Group {
    /// Create an empty group at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty group at an offset.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        Self { offset: (x, y), ..Self::default() }
    }

    /// Append a shape.
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Append many shapes.
    pub fn extend(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        self.shapes.extend(shapes);
    }

    /// Nest a child group.
    pub fn nest(&mut self, child: Group) {
        self.children.push(child);
    }

    /// Total shape count including nested groups.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shapes.len() + self.children.iter().map(Group::shape_count).sum::<usize>()
    }

    /// True when the group holds no shapes at any depth.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape_count() == 0
    }
}

/// A composed chart: explicit dimensions plus the root group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Canvas {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Root group holding the whole scene.
    pub root: Group,
}

impl Canvas {
    /// Create an empty canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, root: Group::new() })
    }

    /// Total shape count across the scene.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.root.shape_count()
    }
}
