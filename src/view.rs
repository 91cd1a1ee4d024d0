//! Declarative chart layers.
//!
//! A [`View`] describes one layer: a data frame, channel-to-column mappings,
//! a mark type, an optional statistical transform, and per-axis scale and
//! coordinate options. Views are immutable; every builder combinator consumes
//! and returns a new value.

use crate::coord::CoordKind;
use crate::data::DataFrame;
use crate::scale::ScaleSpec;

/// Mark type tag.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkKind {
    /// Point marks.
    Point,
    /// Bar marks (binned, counted, or per-row).
    Bar,
    /// Connected line marks.
    Line,
    /// Text label marks.
    Text,
    /// Horizontal reference line at a y value.
    HRule(f32),
    /// Vertical reference line at an x value.
    VRule(f32),
    /// Horizontal reference band between two y values.
    HBand(f32, f32),
    /// Vertical reference band between two x values.
    VBand(f32, f32),
}

impl MarkKind {
    /// True for annotation marks that carry no data of their own.
    #[must_use]
    pub fn is_annotation(self) -> bool {
        matches!(
            self,
            MarkKind::HRule(_) | MarkKind::VRule(_) | MarkKind::HBand(..) | MarkKind::VBand(..)
        )
    }
}

/// Statistical transform tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransformKind {
    /// Pass values through unchanged.
    #[default]
    Identity,
    /// Bin the x column and count per bin.
    Bin,
    /// Ordinary least squares line per series.
    Regress,
    /// Local regression curve per series.
    Smooth,
    /// Count occurrences of categorical x.
    Count,
}

/// Layout position adjustment for bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    /// Draw series in place.
    #[default]
    Identity,
    /// Place series side by side within each category band.
    Dodge,
    /// Stack series cumulatively within each category band.
    Stack,
}

/// Channel-to-column mappings for one view.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channels {
    /// X position columns (more than one spreads panels into a variable grid).
    pub x: Vec<String>,
    /// Y position columns.
    pub y: Vec<String>,
    /// Color series column.
    pub color: Option<String>,
    /// Point size column.
    pub size: Option<String>,
    /// Point shape column.
    pub shape: Option<String>,
    /// Text label column.
    pub text: Option<String>,
    /// Facet row column.
    pub facet_row: Option<String>,
    /// Facet column column.
    pub facet_col: Option<String>,
}

/// One declarative chart layer.
#[derive(Debug, Clone)]
pub struct View {
    /// Source data.
    pub data: DataFrame,
    /// Channel mappings.
    pub channels: Channels,
    /// Mark type.
    pub mark: MarkKind,
    /// Statistical transform.
    pub transform: TransformKind,
    /// Coordinate system.
    pub coord: CoordKind,
    /// Bar position adjustment.
    pub position: Position,
    /// X axis scale options.
    pub x_scale: ScaleSpec,
    /// Y axis scale options.
    pub y_scale: ScaleSpec,
    /// Treat the x channel as categorical labels.
    pub categorical_x: bool,
}

impl View {
    /// New point-mark identity view over a data frame.
    #[must_use]
    pub fn new(data: DataFrame) -> Self {
        Self {
            data,
            channels: Channels::default(),
            mark: MarkKind::Point,
            transform: TransformKind::Identity,
            coord: CoordKind::Cartesian,
            position: Position::Identity,
            x_scale: ScaleSpec::default(),
            y_scale: ScaleSpec::default(),
            categorical_x: false,
        }
    }

    /// Map the x channel to a column.
    #[must_use]
    pub fn x(mut self, column: &str) -> Self {
        self.channels.x = vec![column.to_string()];
        self
    }

    /// Map the x channel to several columns (variable-grid layout).
    #[must_use]
    pub fn xs(mut self, columns: &[&str]) -> Self {
        self.channels.x = columns.iter().map(|&c| c.to_string()).collect();
        self
    }

    /// Map the y channel to a column.
    #[must_use]
    pub fn y(mut self, column: &str) -> Self {
        self.channels.y = vec![column.to_string()];
        self
    }

    /// Map the y channel to several columns (variable-grid layout).
    #[must_use]
    pub fn ys(mut self, columns: &[&str]) -> Self {
        self.channels.y = columns.iter().map(|&c| c.to_string()).collect();
        self
    }

    /// Map the color channel to a column.
    #[must_use]
    pub fn color(mut self, column: &str) -> Self {
        self.channels.color = Some(column.to_string());
        self
    }

    /// Map the size channel to a column.
    #[must_use]
    pub fn size(mut self, column: &str) -> Self {
        self.channels.size = Some(column.to_string());
        self
    }

    /// Map the shape channel to a column.
    #[must_use]
    pub fn shape(mut self, column: &str) -> Self {
        self.channels.shape = Some(column.to_string());
        self
    }

    /// Map the text channel to a column.
    #[must_use]
    pub fn text(mut self, column: &str) -> Self {
        self.channels.text = Some(column.to_string());
        self
    }

    /// Facet into panel rows by a column.
    #[must_use]
    pub fn facet_row(mut self, column: &str) -> Self {
        self.channels.facet_row = Some(column.to_string());
        self
    }

    /// Facet into panel columns by a column.
    #[must_use]
    pub fn facet_col(mut self, column: &str) -> Self {
        self.channels.facet_col = Some(column.to_string());
        self
    }

    /// Set the mark type.
    #[must_use]
    pub fn mark(mut self, mark: MarkKind) -> Self {
        self.mark = mark;
        self
    }

    /// Set the statistical transform.
    #[must_use]
    pub fn transform(mut self, transform: TransformKind) -> Self {
        self.transform = transform;
        self
    }

    /// Bin the x column (histogram): bin transform with bar marks.
    #[must_use]
    pub fn bin(self) -> Self {
        self.transform(TransformKind::Bin).mark(MarkKind::Bar)
    }

    /// Fit a least-squares line: regress transform with line marks.
    #[must_use]
    pub fn regress(self) -> Self {
        self.transform(TransformKind::Regress).mark(MarkKind::Line)
    }

    /// Fit a local-regression curve: smooth transform with line marks.
    #[must_use]
    pub fn smooth(self) -> Self {
        self.transform(TransformKind::Smooth).mark(MarkKind::Line)
    }

    /// Count categorical x occurrences: count transform with bar marks.
    #[must_use]
    pub fn count(self) -> Self {
        self.transform(TransformKind::Count).mark(MarkKind::Bar)
    }

    /// Set the coordinate system.
    #[must_use]
    pub fn coord(mut self, coord: CoordKind) -> Self {
        self.coord = coord;
        self
    }

    /// Swap axis roles (horizontal bars, etc.).
    #[must_use]
    pub fn flip(self) -> Self {
        self.coord(CoordKind::Flip)
    }

    /// Render in polar coordinates.
    #[must_use]
    pub fn polar(self) -> Self {
        self.coord(CoordKind::Polar)
    }

    /// Set the bar position adjustment.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Stack bar series.
    #[must_use]
    pub fn stack(self) -> Self {
        self.position(Position::Stack)
    }

    /// Dodge bar series.
    #[must_use]
    pub fn dodge(self) -> Self {
        self.position(Position::Dodge)
    }

    /// Set x scale options.
    #[must_use]
    pub fn scale_x(mut self, spec: ScaleSpec) -> Self {
        self.x_scale = spec;
        self
    }

    /// Set y scale options.
    #[must_use]
    pub fn scale_y(mut self, spec: ScaleSpec) -> Self {
        self.y_scale = spec;
        self
    }

    /// Use a log10 x scale.
    #[must_use]
    pub fn log_x(mut self) -> Self {
        self.x_scale = self.x_scale.log();
        self
    }

    /// Use a log10 y scale.
    #[must_use]
    pub fn log_y(mut self) -> Self {
        self.y_scale = self.y_scale.log();
        self
    }

    /// Fix the x axis to an explicit domain.
    #[must_use]
    pub fn xlim(mut self, min: f32, max: f32) -> Self {
        self.x_scale = self.x_scale.with_domain(min, max);
        self
    }

    /// Fix the y axis to an explicit domain.
    #[must_use]
    pub fn ylim(mut self, min: f32, max: f32) -> Self {
        self.y_scale = self.y_scale.with_domain(min, max);
        self
    }

    /// Treat x values as categorical labels.
    #[must_use]
    pub fn categorical_x(mut self) -> Self {
        self.categorical_x = true;
        self
    }

    /// First mapped x column, if any.
    #[must_use]
    pub fn primary_x(&self) -> Option<&str> {
        self.channels.x.first().map(String::as_str)
    }

    /// First mapped y column, if any.
    #[must_use]
    pub fn primary_y(&self) -> Option<&str> {
        self.channels.y.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::from_xy(&[1.0, 2.0], &[3.0, 4.0])
    }

    #[test]
    fn test_view_defaults() {
        let v = View::new(frame());
        assert_eq!(v.mark, MarkKind::Point);
        assert_eq!(v.transform, TransformKind::Identity);
        assert_eq!(v.coord, CoordKind::Cartesian);
        assert_eq!(v.position, Position::Identity);
        assert!(!v.categorical_x);
    }

    #[test]
    fn test_view_channel_builders() {
        let v = View::new(frame()).x("a").y("b").color("c").size("s").text("t");
        assert_eq!(v.primary_x(), Some("a"));
        assert_eq!(v.primary_y(), Some("b"));
        assert_eq!(v.channels.color.as_deref(), Some("c"));
        assert_eq!(v.channels.size.as_deref(), Some("s"));
        assert_eq!(v.channels.text.as_deref(), Some("t"));
    }

    #[test]
    fn test_view_multi_columns() {
        let v = View::new(frame()).xs(&["a", "b"]).ys(&["c"]);
        assert_eq!(v.channels.x.len(), 2);
        assert_eq!(v.channels.y.len(), 1);
    }

    #[test]
    fn test_view_composition_is_new_value() {
        let base = View::new(frame()).x("a");
        let flipped = base.clone().flip();
        assert_eq!(base.coord, CoordKind::Cartesian);
        assert_eq!(flipped.coord, CoordKind::Flip);
    }

    #[test]
    fn test_bin_shorthand() {
        let v = View::new(frame()).x("x").bin();
        assert_eq!(v.transform, TransformKind::Bin);
        assert_eq!(v.mark, MarkKind::Bar);
    }

    #[test]
    fn test_count_stack_shorthand() {
        let v = View::new(frame()).x("x").count().stack();
        assert_eq!(v.transform, TransformKind::Count);
        assert_eq!(v.position, Position::Stack);
    }

    #[test]
    fn test_annotation_marks() {
        assert!(MarkKind::HRule(1.0).is_annotation());
        assert!(MarkKind::VBand(0.0, 1.0).is_annotation());
        assert!(!MarkKind::Point.is_annotation());
        assert!(!MarkKind::Bar.is_annotation());
    }

    #[test]
    fn test_facet_builders() {
        let v = View::new(frame()).facet_row("r").facet_col("c");
        assert_eq!(v.channels.facet_row.as_deref(), Some("r"));
        assert_eq!(v.channels.facet_col.as_deref(), Some("c"));
    }

    #[test]
    fn test_scale_shorthands() {
        let v = View::new(frame()).log_y().xlim(0.0, 5.0);
        assert!(v.y_scale.is_log());
        assert_eq!(v.x_scale.domain, Some((0.0, 5.0)));
    }
}
