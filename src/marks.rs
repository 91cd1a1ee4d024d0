//! Mark drawing routines.
//!
//! Each routine turns one transform payload into primitive shapes through a
//! [`Projector`] and a color lookup. Marks never branch on the coordinate
//! kind; every coordinate-specific path comes from the projector.

use crate::color::{ColorMap, Rgba};
use crate::coord::{Axis, Projector};
use crate::scene::{Shape, Style, TextAnchor};
use crate::theme::Theme;
use crate::transform::{BinGroup, CountSeries, LineStrip, PointGroup};
use crate::view::{MarkKind, Position};

fn series_color(key: Option<&str>, colors: &ColorMap) -> Rgba {
    key.map_or_else(|| colors.fallback(), |k| colors.get(k))
}

/// Draw point groups as circles. A mapped size channel scales each radius
/// relative to the group's largest value.
#[must_use]
pub fn draw_points(
    groups: &[PointGroup],
    proj: &Projector,
    colors: &ColorMap,
    theme: &Theme,
) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for group in groups {
        let color = series_color(group.key.as_deref(), colors);
        let max_size = group.sizes.iter().copied().fold(0.0_f32, f32::max).max(f32::MIN_POSITIVE);
        for i in 0..group.ys.len() {
            let position = if group.labels.is_empty() {
                Some(proj.project(group.xs[i], group.ys[i]))
            } else {
                proj.project_cat(&group.labels[i], group.ys[i])
            };
            let Some((cx, cy)) = position else {
                continue;
            };
            let r = if group.sizes.is_empty() {
                theme.point_size
            } else {
                theme.point_size * (0.5 + (group.sizes[i] / max_size).sqrt())
            };
            shapes.push(Shape::Circle { cx, cy, r, style: Style::fill(color) });
        }
    }
    shapes
}

/// Draw line strips as polylines. Strips with fewer than two points (the
/// degenerate-series signal) draw nothing.
#[must_use]
pub fn draw_lines(
    strips: &[LineStrip],
    proj: &Projector,
    colors: &ColorMap,
    theme: &Theme,
) -> Vec<Shape> {
    strips
        .iter()
        .filter(|strip| strip.xs.len() >= 2)
        .map(|strip| {
            let color = series_color(strip.key.as_deref(), colors);
            let points =
                strip.xs.iter().zip(&strip.ys).map(|(&x, &y)| proj.project(x, y)).collect();
            Shape::Polyline { points, style: Style::stroke(color, theme.line_width) }
        })
        .collect()
}

/// Draw histogram bins as projected rectangles rising from zero.
#[must_use]
pub fn draw_binned_bars(
    groups: &[BinGroup],
    proj: &Projector,
    colors: &ColorMap,
    theme: &Theme,
) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for group in groups {
        let color = series_color(group.key.as_deref(), colors);
        let style = Style::fill(color)
            .with_opacity(theme.bar_opacity)
            .with_stroke(theme.panel_background, 0.5);
        for bin in &group.bins {
            if bin.count <= 0.0 {
                continue;
            }
            shapes.push(Shape::Polygon {
                points: proj.munch_rect(bin.start, bin.end, 0.0, bin.count),
                style,
            });
        }
    }
    shapes
}

/// Draw per-row bars from identity point data: one bar per (x, y) pair rising
/// from zero, sized to a fraction of the even spacing.
#[must_use]
pub fn draw_xy_bars(
    groups: &[PointGroup],
    proj: &Projector,
    colors: &ColorMap,
    theme: &Theme,
) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for group in groups {
        let color = series_color(group.key.as_deref(), colors);
        let style = Style::fill(color)
            .with_opacity(theme.bar_opacity)
            .with_stroke(theme.panel_background, 0.5);
        if group.labels.is_empty() {
            let n = group.xs.len();
            if n == 0 {
                continue;
            }
            let min = group.xs.iter().copied().fold(f32::INFINITY, f32::min);
            let max = group.xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let half = if n > 1 { (max - min) / n as f32 * 0.4 } else { 0.4 };
            for (&x, &y) in group.xs.iter().zip(&group.ys) {
                shapes.push(Shape::Polygon {
                    points: proj.munch_rect(x - half, x + half, 0.0, y),
                    style,
                });
            }
        } else {
            for (label, &y) in group.labels.iter().zip(&group.ys) {
                let Some(band) = proj.cat_band(label) else {
                    continue;
                };
                shapes.push(Shape::Polygon { points: proj.munch_cat_bar(band, 0.0, y), style });
            }
        }
    }
    shapes
}

/// Draw count series as category-band bars.
///
/// Dodge places series side by side within each band; stack folds a running
/// cumulative height per category (local to this call) so each series rises
/// from the previous total.
#[must_use]
pub fn draw_count_bars(
    series: &[CountSeries],
    categories: &[String],
    position: Position,
    proj: &Projector,
    colors: &ColorMap,
    theme: &Theme,
) -> Vec<Shape> {
    let mut shapes = Vec::new();
    match position {
        Position::Stack => {
            for (c, category) in categories.iter().enumerate() {
                let Some(band) = proj.cat_band(category) else {
                    continue;
                };
                let mut cumulative = 0.0;
                for s in series {
                    let value = s.counts.get(c).copied().unwrap_or(0.0);
                    if value <= 0.0 {
                        continue;
                    }
                    let style = Style::fill(series_color(s.key.as_deref(), colors))
                        .with_opacity(theme.bar_opacity)
                        .with_stroke(theme.panel_background, 0.5);
                    shapes.push(Shape::Polygon {
                        points: proj.munch_cat_bar(band, cumulative, cumulative + value),
                        style,
                    });
                    cumulative += value;
                }
            }
        }
        Position::Identity | Position::Dodge => {
            let k = series.len().max(1);
            for (c, category) in categories.iter().enumerate() {
                let Some((b0, b1)) = proj.cat_band(category) else {
                    continue;
                };
                let step = (b1 - b0) / k as f32;
                for (s_idx, s) in series.iter().enumerate() {
                    let value = s.counts.get(c).copied().unwrap_or(0.0);
                    if value <= 0.0 {
                        continue;
                    }
                    let sub = (b0 + step * s_idx as f32, b0 + step * (s_idx + 1) as f32);
                    let style = Style::fill(series_color(s.key.as_deref(), colors))
                        .with_opacity(theme.bar_opacity)
                        .with_stroke(theme.panel_background, 0.5);
                    shapes.push(Shape::Polygon {
                        points: proj.munch_cat_bar(sub, 0.0, value),
                        style,
                    });
                }
            }
        }
    }
    shapes
}

/// Draw text-channel labels at their point positions.
#[must_use]
pub fn draw_texts(
    groups: &[PointGroup],
    proj: &Projector,
    colors: &ColorMap,
    theme: &Theme,
) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for group in groups {
        let color = series_color(group.key.as_deref(), colors);
        for i in 0..group.ys.len() {
            let position = if group.labels.is_empty() {
                Some(proj.project(group.xs[i], group.ys[i]))
            } else {
                proj.project_cat(&group.labels[i], group.ys[i])
            };
            let Some((x, y)) = position else {
                continue;
            };
            let text = group.texts.get(i).cloned().unwrap_or_default();
            if text.is_empty() {
                continue;
            }
            shapes.push(Shape::Text {
                x,
                y,
                text,
                size: theme.font_size,
                color,
                anchor: TextAnchor::Middle,
            });
        }
    }
    shapes
}

/// Draw a reference annotation (rule or band) through the projector, so it
/// follows the panel's coordinate system like any data mark.
#[must_use]
pub fn draw_annotation(mark: MarkKind, proj: &Projector, theme: &Theme) -> Vec<Shape> {
    let line_style = Style::stroke(theme.annotation_color, 1.0);
    let band_style = Style::fill(theme.annotation_color).with_opacity(0.25);
    match mark {
        MarkKind::HRule(y) => {
            vec![Shape::Polyline { points: proj.rule_path(Axis::Y, y), style: line_style }]
        }
        MarkKind::VRule(x) => {
            vec![Shape::Polyline { points: proj.rule_path(Axis::X, x), style: line_style }]
        }
        MarkKind::HBand(from, to) => {
            vec![Shape::Polygon { points: proj.band_path(Axis::Y, from, to), style: band_style }]
        }
        MarkKind::VBand(from, to) => {
            vec![Shape::Polygon { points: proj.band_path(Axis::X, from, to), style: band_style }]
        }
        MarkKind::Point | MarkKind::Bar | MarkKind::Line | MarkKind::Text => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{CoordKind, PanelGeom, Projector};
    use crate::domain::Domain;
    use crate::scale::{Scale, ScaleSpec};

    fn proj(coord: CoordKind) -> Projector {
        let geom = PanelGeom::new(100.0, 100.0, 10.0);
        let x = Scale::build(&Domain::numeric(0.0, 10.0), (10.0, 90.0), &ScaleSpec::linear())
            .expect("scale");
        let y = Scale::build(&Domain::numeric(0.0, 10.0), (90.0, 10.0), &ScaleSpec::linear())
            .expect("scale");
        Projector::new(coord, x, y, geom)
    }

    fn band_proj() -> Projector {
        let geom = PanelGeom::new(100.0, 100.0, 10.0);
        let x = Scale::build(
            &Domain::categorical(vec!["a".into(), "b".into()]),
            (10.0, 90.0),
            &ScaleSpec::linear(),
        )
        .expect("scale");
        let y = Scale::build(&Domain::numeric(0.0, 10.0), (90.0, 10.0), &ScaleSpec::linear())
            .expect("scale");
        Projector::new(CoordKind::Cartesian, x, y, geom)
    }

    fn theme() -> Theme {
        Theme::default()
    }

    fn colors() -> ColorMap {
        ColorMap::from_labels(
            &["a".to_string(), "b".to_string()],
            &crate::color::PALETTE,
            Rgba::BLUE,
        )
    }

    #[test]
    fn test_draw_points_one_circle_per_row() {
        let groups = vec![PointGroup {
            key: None,
            xs: vec![1.0, 2.0, 3.0],
            ys: vec![1.0, 2.0, 3.0],
            ..PointGroup::default()
        }];
        let shapes = draw_points(&groups, &proj(CoordKind::Cartesian), &colors(), &theme());
        assert_eq!(shapes.len(), 3);
        assert!(matches!(shapes[0], Shape::Circle { .. }));
    }

    #[test]
    fn test_draw_points_size_channel_scales_radius() {
        let groups = vec![PointGroup {
            key: None,
            xs: vec![1.0, 2.0],
            ys: vec![1.0, 2.0],
            sizes: vec![1.0, 4.0],
            ..PointGroup::default()
        }];
        let shapes = draw_points(&groups, &proj(CoordKind::Cartesian), &colors(), &theme());
        let radii: Vec<f32> = shapes
            .iter()
            .map(|s| match s {
                Shape::Circle { r, .. } => *r,
                other => panic!("expected circle, got {other:?}"),
            })
            .collect();
        assert!(radii[1] > radii[0]);
    }

    #[test]
    fn test_draw_lines_skips_degenerate_strips() {
        let strips = vec![
            LineStrip { key: None, xs: vec![], ys: vec![] },
            LineStrip { key: None, xs: vec![0.0, 10.0], ys: vec![0.0, 10.0] },
        ];
        let shapes = draw_lines(&strips, &proj(CoordKind::Cartesian), &colors(), &theme());
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn test_draw_binned_bars_quad_outline() {
        let groups = vec![BinGroup {
            key: None,
            bins: vec![
                crate::transform::Bin { start: 0.0, end: 1.0, count: 3.0 },
                crate::transform::Bin { start: 1.0, end: 2.0, count: 0.0 },
            ],
        }];
        let shapes = draw_binned_bars(&groups, &proj(CoordKind::Cartesian), &colors(), &theme());
        // Zero-count bins draw nothing.
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Polygon { points, .. } => assert_eq!(points.len(), 4),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_draw_binned_bars_polar_munched() {
        let groups = vec![BinGroup {
            key: None,
            bins: vec![crate::transform::Bin { start: 0.0, end: 5.0, count: 4.0 }],
        }];
        let shapes = draw_binned_bars(&groups, &proj(CoordKind::Polar), &colors(), &theme());
        match &shapes[0] {
            Shape::Polygon { points, .. } => assert!(points.len() > 4),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_draw_count_bars_stacked_cumulative() {
        let series = vec![
            CountSeries { key: Some("a".into()), counts: vec![2.0] },
            CountSeries { key: Some("b".into()), counts: vec![3.0] },
        ];
        let categories = vec!["a".to_string()];
        let shapes = draw_count_bars(
            &series,
            &categories,
            Position::Stack,
            &band_proj(),
            &colors(),
            &theme(),
        );
        assert_eq!(shapes.len(), 2);
        // Second bar starts where the first ends: its lowest pixel edge
        // equals the first bar's highest (screen y decreases upward).
        let tops: Vec<f32> = shapes
            .iter()
            .map(|s| match s {
                Shape::Polygon { points, .. } => {
                    points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min)
                }
                other => panic!("expected polygon, got {other:?}"),
            })
            .collect();
        let bottoms: Vec<f32> = shapes
            .iter()
            .map(|s| match s {
                Shape::Polygon { points, .. } => {
                    points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max)
                }
                other => panic!("expected polygon, got {other:?}"),
            })
            .collect();
        assert!((bottoms[1] - tops[0]).abs() < 0.001);
    }

    #[test]
    fn test_draw_count_bars_dodged_side_by_side() {
        let series = vec![
            CountSeries { key: Some("a".into()), counts: vec![2.0] },
            CountSeries { key: Some("b".into()), counts: vec![3.0] },
        ];
        let categories = vec!["a".to_string()];
        let shapes = draw_count_bars(
            &series,
            &categories,
            Position::Dodge,
            &band_proj(),
            &colors(),
            &theme(),
        );
        assert_eq!(shapes.len(), 2);
        let rights: Vec<f32> = shapes
            .iter()
            .map(|s| match s {
                Shape::Polygon { points, .. } => {
                    points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max)
                }
                other => panic!("expected polygon, got {other:?}"),
            })
            .collect();
        let lefts: Vec<f32> = shapes
            .iter()
            .map(|s| match s {
                Shape::Polygon { points, .. } => {
                    points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min)
                }
                other => panic!("expected polygon, got {other:?}"),
            })
            .collect();
        assert!(rights[0] <= lefts[1] + 0.001);
    }

    #[test]
    fn test_draw_texts() {
        let groups = vec![PointGroup {
            key: None,
            xs: vec![1.0, 2.0],
            ys: vec![1.0, 2.0],
            texts: vec!["hi".to_string(), String::new()],
            ..PointGroup::default()
        }];
        let shapes = draw_texts(&groups, &proj(CoordKind::Cartesian), &colors(), &theme());
        // Empty labels draw nothing.
        assert_eq!(shapes.len(), 1);
        assert!(matches!(&shapes[0], Shape::Text { text, .. } if text == "hi"));
    }

    #[test]
    fn test_draw_annotation_rules_and_bands() {
        let p = proj(CoordKind::Cartesian);
        assert_eq!(draw_annotation(MarkKind::HRule(5.0), &p, &theme()).len(), 1);
        assert_eq!(draw_annotation(MarkKind::VRule(5.0), &p, &theme()).len(), 1);
        assert_eq!(draw_annotation(MarkKind::HBand(2.0, 4.0), &p, &theme()).len(), 1);
        assert_eq!(draw_annotation(MarkKind::VBand(2.0, 4.0), &p, &theme()).len(), 1);
        assert!(draw_annotation(MarkKind::Point, &p, &theme()).is_empty());
    }

    #[test]
    fn test_draw_xy_bars_categorical() {
        let groups = vec![PointGroup {
            key: None,
            labels: vec!["a".to_string(), "b".to_string()],
            ys: vec![3.0, 7.0],
            ..PointGroup::default()
        }];
        let shapes = draw_xy_bars(&groups, &band_proj(), &colors(), &theme());
        assert_eq!(shapes.len(), 2);
    }
}
