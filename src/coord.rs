//! Coordinate projection.
//!
//! A [`Projector`] is the single function mapping a (data-x, data-y) pair to a
//! pixel position for one coordinate system, closing over the panel's two
//! scales and geometry. Every coordinate-specific behavior lives here: mark
//! and renderer code never branches on the coordinate kind.
//!
//! Flip swaps argument order at projection time; the panel renderer builds the
//! x-scale from the y-domain (and vice versa) beforehand, so the two swaps
//! compose to a plain axis exchange.
//!
//! Polar reinterprets the scales' pixel output: horizontal pixel position maps
//! linearly to angle, vertical pixel position maps inverted to radius, with
//! angle zero rotated to point straight up. Rectangles are "arc munched" into
//! polygons by sampling along their angle-varying edges.

use crate::scale::Scale;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Coordinate system tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordKind {
    /// Standard x/y mapping.
    #[default]
    Cartesian,
    /// Swapped axis roles.
    Flip,
    /// Angle/radius mapping.
    Polar,
}

/// Axis selector for rules and bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The x (horizontal data) axis.
    X,
    /// The y (vertical data) axis.
    Y,
}

/// Panel geometry: outer size plus inner margin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelGeom {
    /// Panel width in pixels.
    pub width: f32,
    /// Panel height in pixels.
    pub height: f32,
    /// Margin between panel edge and drawable area.
    pub margin: f32,
}

impl PanelGeom {
    /// Create panel geometry.
    #[must_use]
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self { width, height, margin }
    }

    /// Drawable width inside the margins.
    #[must_use]
    pub fn inner_width(&self) -> f32 {
        (self.width - 2.0 * self.margin).max(1.0)
    }

    /// Drawable height inside the margins.
    #[must_use]
    pub fn inner_height(&self) -> f32 {
        (self.height - 2.0 * self.margin).max(1.0)
    }

    /// Panel center.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Largest radius fitting the drawable area.
    #[must_use]
    pub fn max_radius(&self) -> f32 {
        (self.width.min(self.height) / 2.0 - self.margin).max(1.0)
    }
}

/// Samples per munched arc edge.
const ARC_SAMPLES: usize = 20;

/// Projects (data-x, data-y) pairs to pixel positions for one coordinate
/// system. Stateless beyond its closure over scales and geometry.
#[derive(Debug, Clone)]
pub struct Projector {
    coord: CoordKind,
    x: Scale,
    y: Scale,
    geom: PanelGeom,
}

impl Projector {
    /// Build a projector over two constructed scales.
    #[must_use]
    pub fn new(coord: CoordKind, x: Scale, y: Scale, geom: PanelGeom) -> Self {
        Self { coord, x, y, geom }
    }

    /// Coordinate kind this projector implements.
    #[must_use]
    pub fn coord(&self) -> CoordKind {
        self.coord
    }

    /// The scale on the horizontal pixel axis.
    #[must_use]
    pub fn x_scale(&self) -> &Scale {
        &self.x
    }

    /// The scale on the vertical pixel axis.
    #[must_use]
    pub fn y_scale(&self) -> &Scale {
        &self.y
    }

    /// Panel geometry.
    #[must_use]
    pub fn geom(&self) -> PanelGeom {
        self.geom
    }

    /// Map a data point to a pixel position.
    #[must_use]
    pub fn project(&self, dx: f32, dy: f32) -> (f32, f32) {
        match self.coord {
            CoordKind::Cartesian => (self.x.apply(dx), self.y.apply(dy)),
            CoordKind::Flip => (self.x.apply(dy), self.y.apply(dx)),
            CoordKind::Polar => self.polar_px(self.x.apply(dx), self.y.apply(dy)),
        }
    }

    /// Re-map an already-scaled pixel position. Identity for cartesian and
    /// flip; the angle/radius reinterpretation for polar. Band-geometry bars
    /// go through this path.
    #[must_use]
    pub fn project_px(&self, px: f32, py: f32) -> (f32, f32) {
        match self.coord {
            CoordKind::Cartesian | CoordKind::Flip => (px, py),
            CoordKind::Polar => self.polar_px(px, py),
        }
    }

    /// Map a categorical position: the category resolves through whichever
    /// scale is the band scale, the continuous value through the other.
    #[must_use]
    pub fn project_cat(&self, label: &str, dv: f32) -> Option<(f32, f32)> {
        match self.coord {
            CoordKind::Cartesian => {
                let cx = self.x.band()?.center(label)?;
                Some((cx, self.y.apply(dv)))
            }
            CoordKind::Flip => {
                let cy = self.y.band()?.center(label)?;
                Some((self.x.apply(dv), cy))
            }
            CoordKind::Polar => {
                let cx = self.x.band()?.center(label)?;
                Some(self.polar_px(cx, self.y.apply(dv)))
            }
        }
    }

    /// Pixel bounds of a category's band on whichever axis is categorical.
    #[must_use]
    pub fn cat_band(&self, label: &str) -> Option<(f32, f32)> {
        match self.coord {
            CoordKind::Flip => self.y.band()?.band_bounds(label),
            CoordKind::Cartesian | CoordKind::Polar => self.x.band()?.band_bounds(label),
        }
    }

    /// Project a data-space rectangle into its pixel outline: four projected
    /// corners, or an arc-munched polygon under polar coordinates.
    #[must_use]
    pub fn munch_rect(&self, x0: f32, x1: f32, y0: f32, y1: f32) -> Vec<(f32, f32)> {
        let munch = self.coord == CoordKind::Polar;
        rect_outline(munch, x0, x1, y0, y1, |dx, dy| self.project(dx, dy))
    }

    /// Project a pixel-space rectangle through [`Self::project_px`].
    #[must_use]
    pub fn munch_rect_px(&self, px0: f32, px1: f32, py0: f32, py1: f32) -> Vec<(f32, f32)> {
        let munch = self.coord == CoordKind::Polar;
        rect_outline(munch, px0, px1, py0, py1, |px, py| self.project_px(px, py))
    }

    /// Outline of a category-band bar spanning continuous values `v0..v1`.
    #[must_use]
    pub fn munch_cat_bar(&self, band: (f32, f32), v0: f32, v1: f32) -> Vec<(f32, f32)> {
        match self.coord {
            CoordKind::Cartesian | CoordKind::Polar => {
                self.munch_rect_px(band.0, band.1, self.y.apply(v0), self.y.apply(v1))
            }
            CoordKind::Flip => {
                let (px0, px1) = (self.x.apply(v0), self.x.apply(v1));
                vec![(px0, band.0), (px1, band.0), (px1, band.1), (px0, band.1)]
            }
        }
    }

    /// Path of a reference line pinned to one axis value, spanning the other
    /// axis. Straight segment under cartesian/flip; a ring (y axis) or radial
    /// spoke (x axis) under polar.
    #[must_use]
    pub fn rule_path(&self, axis: Axis, value: f32) -> Vec<(f32, f32)> {
        let g = self.geom;
        match (axis, self.coord) {
            (Axis::Y, CoordKind::Cartesian) => {
                let py = self.y.apply(value);
                let (x0, x1) = self.x.range();
                vec![(x0, py), (x1, py)]
            }
            (Axis::Y, CoordKind::Flip) => {
                let px = self.x.apply(value);
                let (y0, y1) = self.y.range();
                vec![(px, y0), (px, y1)]
            }
            (Axis::Y, CoordKind::Polar) => self.ring_path(self.y.apply(value)),
            (Axis::X, CoordKind::Cartesian) => {
                let px = self.x.apply(value);
                let (y0, y1) = self.y.range();
                vec![(px, y0), (px, y1)]
            }
            (Axis::X, CoordKind::Flip) => {
                let py = self.y.apply(value);
                let (x0, x1) = self.x.range();
                vec![(x0, py), (x1, py)]
            }
            (Axis::X, CoordKind::Polar) => {
                let px = self.x.apply(value);
                vec![
                    self.polar_px(px, g.height - g.margin),
                    self.polar_px(px, g.margin),
                ]
            }
        }
    }

    /// Closed outline of a reference band between two values on one axis.
    #[must_use]
    pub fn band_path(&self, axis: Axis, from: f32, to: f32) -> Vec<(f32, f32)> {
        let g = self.geom;
        match (axis, self.coord) {
            (Axis::Y, CoordKind::Flip) => {
                let (px0, px1) = (self.x.apply(from), self.x.apply(to));
                let (y0, y1) = self.y.range();
                vec![(px0, y0), (px1, y0), (px1, y1), (px0, y1)]
            }
            (Axis::Y, _) => self.munch_rect_px(
                g.margin,
                g.width - g.margin,
                self.y.apply(from),
                self.y.apply(to),
            ),
            (Axis::X, CoordKind::Flip) => {
                let (py0, py1) = (self.y.apply(from), self.y.apply(to));
                let (x0, x1) = self.x.range();
                vec![(x0, py0), (x1, py0), (x1, py1), (x0, py1)]
            }
            (Axis::X, _) => self.munch_rect_px(
                self.x.apply(from),
                self.x.apply(to),
                g.margin,
                g.height - g.margin,
            ),
        }
    }

    /// Grid path for a tick on the horizontal pixel axis: a vertical line, or
    /// a radial spoke under polar.
    #[must_use]
    pub fn gridline_x(&self, px: f32) -> Vec<(f32, f32)> {
        let g = self.geom;
        match self.coord {
            CoordKind::Cartesian | CoordKind::Flip => {
                vec![(px, g.margin), (px, g.height - g.margin)]
            }
            CoordKind::Polar => {
                vec![
                    self.polar_px(px, g.height - g.margin),
                    self.polar_px(px, g.margin),
                ]
            }
        }
    }

    /// Grid path for a tick on the vertical pixel axis: a horizontal line, or
    /// a concentric ring under polar.
    #[must_use]
    pub fn gridline_y(&self, py: f32) -> Vec<(f32, f32)> {
        let g = self.geom;
        match self.coord {
            CoordKind::Cartesian | CoordKind::Flip => {
                vec![(g.margin, py), (g.width - g.margin, py)]
            }
            CoordKind::Polar => self.ring_path(py),
        }
    }

    fn ring_path(&self, py: f32) -> Vec<(f32, f32)> {
        let g = self.geom;
        let n = ARC_SAMPLES * 2;
        (0..=n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let px = g.margin + t * g.inner_width();
                self.polar_px(px, py)
            })
            .collect()
    }

    /// Horizontal pixel position maps to angle, vertical (inverted) to
    /// radius; angle zero points straight up.
    fn polar_px(&self, px: f32, py: f32) -> (f32, f32) {
        let g = self.geom;
        let t = ((px - g.margin) / g.inner_width()).clamp(0.0, 1.0);
        let theta = t * TAU;
        let u = ((py - g.margin) / g.inner_height()).clamp(0.0, 1.0);
        let r = (1.0 - u) * g.max_radius();
        let (cx, cy) = g.center();
        (cx + r * (theta - FRAC_PI_2).cos(), cy + r * (theta - FRAC_PI_2).sin())
    }
}

fn rect_outline<F>(munch: bool, x0: f32, x1: f32, y0: f32, y1: f32, f: F) -> Vec<(f32, f32)>
where
    F: Fn(f32, f32) -> (f32, f32),
{
    if !munch {
        return vec![f(x0, y0), f(x1, y0), f(x1, y1), f(x0, y1)];
    }
    let mut points = Vec::with_capacity(2 * (ARC_SAMPLES + 1));
    for i in 0..=ARC_SAMPLES {
        let t = i as f32 / ARC_SAMPLES as f32;
        points.push(f(x0 + (x1 - x0) * t, y1));
    }
    for i in 0..=ARC_SAMPLES {
        let t = i as f32 / ARC_SAMPLES as f32;
        points.push(f(x1 + (x0 - x1) * t, y0));
    }
    points
}
