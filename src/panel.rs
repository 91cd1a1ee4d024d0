//! Panel rendering.
//!
//! One panel is one facet cell: run every data view's transform, merge the
//! resulting domains (caller overrides win), build the two scales and the
//! projector, then draw background, grid, annotations, data marks, and tick
//! labels into a scene group.
//!
//! A merged domain that cannot produce scales renders as a visible diagnostic
//! panel rather than a blank chart or a panic.

use crate::color::ColorMap;
use crate::coord::{CoordKind, PanelGeom, Projector};
use crate::domain::Domain;
use crate::marks;
use crate::scale::Scale;
use crate::scene::{Group, Shape, Style, TextAnchor};
use crate::theme::Theme;
use crate::transform::{compute, Computed, LineStrip, TransformResult};
use crate::view::{MarkKind, Position, View};

/// Caller-supplied options for one panel render.
#[derive(Debug, Clone)]
pub struct PanelOptions {
    /// Shared-scale x-domain override; always wins over the panel merge.
    pub x_domain: Option<Domain>,
    /// Shared-scale y-domain override; always wins over the panel merge.
    pub y_domain: Option<Domain>,
    /// Shared color assignment (legend consistency across panels).
    pub color_map: Option<ColorMap>,
    /// Draw tick labels along the axes.
    pub show_tick_labels: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self { x_domain: None, y_domain: None, color_map: None, show_tick_labels: true }
    }
}

/// Merged x/y domains for a set of views, as the panel renderer would compute
/// them: transforms run, per-axis merge, stacked bound applied. Used by the
/// layout composer to pre-compute shared-scale overrides.
#[must_use]
pub fn merged_domains(views: &[View]) -> (Option<Domain>, Option<Domain>) {
    let results: Vec<(Position, TransformResult)> = views
        .iter()
        .filter(|v| !v.mark.is_annotation())
        .map(|v| (v.position, compute(v)))
        .collect();
    let x = Domain::merge_all(results.iter().map(|(_, r)| &r.x_domain));
    let mut y = Domain::merge_all(results.iter().map(|(_, r)| &r.y_domain));
    if let Some(upper) = stacked_upper(results.iter().map(|(p, r)| (*p, r))) {
        y = Some(Domain::numeric(0.0, upper));
    }
    (x, y)
}

/// Largest cumulative stack height across categories, when any view stacks
/// count series. None when nothing stacks.
fn stacked_upper<'a>(
    results: impl Iterator<Item = (Position, &'a TransformResult)>,
) -> Option<f32> {
    let mut upper: Option<f32> = None;
    for (position, result) in results {
        if position != Position::Stack {
            continue;
        }
        if let Computed::Counts(series) = &result.computed {
            let n_cats = series.iter().map(|s| s.counts.len()).max().unwrap_or(0);
            for c in 0..n_cats {
                let total: f32 =
                    series.iter().map(|s| s.counts.get(c).copied().unwrap_or(0.0)).sum();
                upper = Some(upper.map_or(total, |u| u.max(total)));
            }
        }
    }
    upper
}

/// Render one panel into a scene group positioned at the origin.
#[must_use]
pub fn render_panel(
    views: &[View],
    geom: PanelGeom,
    opts: &PanelOptions,
    theme: &Theme,
) -> Group {
    let coord = views.first().map_or(CoordKind::Cartesian, |v| v.coord);
    let results: Vec<(&View, TransformResult)> = views
        .iter()
        .filter(|v| !v.mark.is_annotation())
        .map(|v| (v, compute(v)))
        .collect();

    // Merge domains across the panel's layers; shared-scale overrides win and
    // already carry any stacked bound the composer computed.
    let mut x_domain = match &opts.x_domain {
        Some(d) => d.clone(),
        None => Domain::merge_all(results.iter().map(|(_, r)| &r.x_domain))
            .unwrap_or_else(Domain::fallback),
    };
    let mut y_domain = match &opts.y_domain {
        Some(d) => d.clone(),
        None => {
            let merged = Domain::merge_all(results.iter().map(|(_, r)| &r.y_domain))
                .unwrap_or_else(Domain::fallback);
            match stacked_upper(results.iter().map(|(v, r)| (v.position, r))) {
                Some(upper) => Domain::numeric(0.0, upper),
                None => merged,
            }
        }
    };

    // Flip swaps which domain feeds which scale; the projector swaps argument
    // order to match. Scale specs travel with their domains.
    let first_data = results.first().map(|(v, _)| *v).or_else(|| views.first());
    let (mut x_spec, mut y_spec) = first_data
        .map_or_else(Default::default, |v| (v.x_scale, v.y_scale));
    if coord == CoordKind::Flip {
        std::mem::swap(&mut x_domain, &mut y_domain);
        std::mem::swap(&mut x_spec, &mut y_spec);
    }

    let x_scale = Scale::build(
        &x_domain.padded(x_spec.is_log()),
        (geom.margin, geom.width - geom.margin),
        &x_spec,
    );
    let y_scale = Scale::build(
        &y_domain.padded(y_spec.is_log()),
        (geom.height - geom.margin, geom.margin),
        &y_spec,
    );
    let (x_scale, y_scale) = match (x_scale, y_scale) {
        (Ok(x), Ok(y)) => (x, y),
        (Err(e), _) | (_, Err(e)) => return diagnostic_panel(geom, theme, &e.to_string()),
    };

    let proj = Projector::new(coord, x_scale, y_scale, geom);

    let color_map = opts.color_map.clone().unwrap_or_else(|| {
        let mut keys: Vec<String> = Vec::new();
        for (_, result) in &results {
            for key in result.series_keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        ColorMap::from_labels(&keys, &theme.palette, theme.default_series_color)
    });

    let mut panel = Group::new();
    panel.push(Shape::Rect {
        x: geom.margin,
        y: geom.margin,
        width: geom.inner_width(),
        height: geom.inner_height(),
        style: Style::fill(theme.panel_background),
    });

    if theme.show_grid {
        let grid_style = Style::stroke(theme.grid_color, theme.grid_width);
        for px in proj.x_scale().tick_positions() {
            panel.push(Shape::Polyline { points: proj.gridline_x(px), style: grid_style });
        }
        for py in proj.y_scale().tick_positions() {
            panel.push(Shape::Polyline { points: proj.gridline_y(py), style: grid_style });
        }
    }

    for view in views.iter().filter(|v| v.mark.is_annotation()) {
        panel.extend(marks::draw_annotation(view.mark, &proj, theme));
    }

    for &(view, ref result) in &results {
        panel.extend(draw_view(view, result, &proj, &color_map, theme));
    }


    if coord != CoordKind::Polar {
        let axis_style = Style::stroke(theme.axis_color, 1.0);
        panel.push(Shape::Line {
            x1: geom.margin,
            y1: geom.height - geom.margin,
            x2: geom.width - geom.margin,
            y2: geom.height - geom.margin,
            style: axis_style,
        });
        panel.push(Shape::Line {
            x1: geom.margin,
            y1: geom.margin,
            x2: geom.margin,
            y2: geom.height - geom.margin,
            style: axis_style,
        });
        if opts.show_tick_labels {
            draw_tick_labels(&mut panel, &proj, geom, theme);
        }
    }

    if theme.show_panel_border {
        panel.push(Shape::Rect {
            x: geom.margin,
            y: geom.margin,
            width: geom.inner_width(),
            height: geom.inner_height(),
            style: Style::stroke(theme.axis_color, 1.0),
        });
    }

    panel
}

/// Dispatch one view's computed data to its mark routine.
fn draw_view(
    view: &View,
    result: &TransformResult,
    proj: &Projector,
    colors: &ColorMap,
    theme: &Theme,
) -> Vec<Shape> {
    match (view.mark, &result.computed) {
        (MarkKind::Point, Computed::Points(groups)) => {
            marks::draw_points(groups, proj, colors, theme)
        }
        (MarkKind::Line, Computed::Lines(strips)) => {
            marks::draw_lines(strips, proj, colors, theme)
        }
        (MarkKind::Line, Computed::Points(groups)) => {
            let strips: Vec<LineStrip> = groups
                .iter()
                .filter(|g| g.labels.is_empty())
                .map(|g| LineStrip { key: g.key.clone(), xs: g.xs.clone(), ys: g.ys.clone() })
                .collect();
            marks::draw_lines(&strips, proj, colors, theme)
        }
        (MarkKind::Bar, Computed::Bins(groups)) => {
            marks::draw_binned_bars(groups, proj, colors, theme)
        }
        (MarkKind::Bar, Computed::Counts(series)) => {
            let categories = result.x_domain.as_categorical().unwrap_or(&[]);
            marks::draw_count_bars(series, categories, view.position, proj, colors, theme)
        }
        (MarkKind::Bar, Computed::Points(groups)) => {
            marks::draw_xy_bars(groups, proj, colors, theme)
        }
        (MarkKind::Text, Computed::Points(groups)) => {
            marks::draw_texts(groups, proj, colors, theme)
        }
        // Remaining combinations carry no drawable pairing.
        _ => Vec::new(),
    }
}

fn draw_tick_labels(panel: &mut Group, proj: &Projector, geom: PanelGeom, theme: &Theme) {
    let x_scale = proj.x_scale();
    for (px, label) in x_scale.tick_positions().iter().zip(x_scale.tick_labels()) {
        panel.push(Shape::Text {
            x: *px,
            y: geom.height - geom.margin + theme.font_size + 3.0,
            text: label,
            size: theme.font_size,
            color: theme.axis_color,
            anchor: TextAnchor::Middle,
        });
    }
    let y_scale = proj.y_scale();
    for (py, label) in y_scale.tick_positions().iter().zip(y_scale.tick_labels()) {
        panel.push(Shape::Text {
            x: geom.margin - 4.0,
            y: py + theme.font_size * 0.35,
            text: label,
            size: theme.font_size,
            color: theme.axis_color,
            anchor: TextAnchor::End,
        });
    }
}

/// Visible diagnostic output for a structurally broken panel: the message is
/// drawn where the data would have been.
fn diagnostic_panel(geom: PanelGeom, theme: &Theme, message: &str) -> Group {
    let mut panel = Group::new();
    panel.push(Shape::Rect {
        x: geom.margin,
        y: geom.margin,
        width: geom.inner_width(),
        height: geom.inner_height(),
        style: Style::fill(theme.panel_background),
    });
    let (cx, cy) = geom.center();
    panel.push(Shape::Text {
        x: cx,
        y: cy,
        text: format!("cannot render: {message}"),
        size: theme.font_size,
        color: theme.annotation_color,
        anchor: TextAnchor::Middle,
    });
    panel.push(Shape::Rect {
        x: geom.margin,
        y: geom.margin,
        width: geom.inner_width(),
        height: geom.inner_height(),
        style: Style::stroke(theme.annotation_color, 1.0),
    });
    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataFrame;
    use crate::scale::ScaleSpec;

    fn geom() -> PanelGeom {
        PanelGeom::new(200.0, 150.0, 20.0)
    }

    fn scatter_view() -> View {
        View::new(DataFrame::from_xy(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 1.0, 3.0]))
            .x("x")
            .y("y")
    }

    fn find_texts(group: &Group) -> Vec<String> {
        let mut texts: Vec<String> = group
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        for child in &group.children {
            texts.extend(find_texts(child));
        }
        texts
    }

    #[test]
    fn test_render_panel_scatter_has_marks() {
        let panel =
            render_panel(&[scatter_view()], geom(), &PanelOptions::default(), &Theme::default());
        let circles = panel
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Circle { .. }))
            .count();
        assert_eq!(circles, 4);
    }

    #[test]
    fn test_render_panel_domain_override_wins() {
        let opts = PanelOptions {
            x_domain: Some(Domain::numeric(0.0, 100.0)),
            ..PanelOptions::default()
        };
        let panel = render_panel(&[scatter_view()], geom(), &opts, &Theme::default());
        // With x fixed to [0, 100] all four points squeeze into the leftmost
        // few percent of the drawable width.
        let max_cx = panel
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Circle { cx, .. } => Some(*cx),
                _ => None,
            })
            .fold(f32::NEG_INFINITY, f32::max);
        assert!(max_cx < 40.0);
    }

    #[test]
    fn test_render_panel_stacked_domain() {
        let mut df = DataFrame::new();
        df.add_column_str("x", &["a", "a", "a", "b"]);
        df.add_column_str("kind", &["u", "u", "v", "v"]);
        let views = vec![View::new(df).x("x").count().color("kind").stack()];
        let (_, y) = merged_domains(&views);
        // Category "a" stacks to 3 even though no single cell exceeds 2.
        assert_eq!(y, Some(Domain::numeric(0.0, 3.0)));
    }

    #[test]
    fn test_render_panel_diagnostic_on_bad_domain() {
        // Log scale over a negative explicit domain cannot build.
        let view = scatter_view().scale_x(ScaleSpec::linear().log().with_domain(-10.0, 10.0));
        let panel = render_panel(&[view], geom(), &PanelOptions::default(), &Theme::default());
        let texts = find_texts(&panel);
        assert!(texts.iter().any(|t| t.starts_with("cannot render")));
    }

    #[test]
    fn test_render_panel_empty_views_falls_back() {
        let panel = render_panel(&[], geom(), &PanelOptions::default(), &Theme::default());
        // Fallback domain still renders a well-formed panel frame.
        assert!(!panel.is_empty());
    }

    #[test]
    fn test_render_panel_annotations_drawn() {
        let df = DataFrame::from_xy(&[1.0, 2.0], &[1.0, 2.0]);
        let rule = View::new(df.clone()).mark(MarkKind::HRule(1.5));
        let views = vec![scatter_view(), rule];
        let panel = render_panel(&views, geom(), &PanelOptions::default(), &Theme::default());
        assert!(panel.shapes.iter().any(|s| matches!(s, Shape::Polyline { .. })));
    }

    #[test]
    fn test_render_panel_polar_omits_tick_labels() {
        let view = scatter_view().polar();
        let panel = render_panel(&[view], geom(), &PanelOptions::default(), &Theme::default());
        assert!(find_texts(&panel).is_empty());
    }

    #[test]
    fn test_render_panel_cartesian_has_tick_labels() {
        let panel =
            render_panel(&[scatter_view()], geom(), &PanelOptions::default(), &Theme::default());
        assert!(!find_texts(&panel).is_empty());
    }

    #[test]
    fn test_merged_domains_multi_layer() {
        let a = View::new(DataFrame::from_xy(&[0.0, 1.0], &[0.0, 1.0])).x("x").y("y");
        let b = View::new(DataFrame::from_xy(&[5.0, 9.0], &[-3.0, 2.0])).x("x").y("y");
        let (x, y) = merged_domains(&[a, b]);
        assert_eq!(x, Some(Domain::numeric(0.0, 9.0)));
        assert_eq!(y, Some(Domain::numeric(-3.0, 2.0)));
    }

    #[test]
    fn test_stacked_upper_ignores_unstacked() {
        let mut df = DataFrame::new();
        df.add_column_str("x", &["a", "a", "b"]);
        df.add_column_str("kind", &["u", "v", "u"]);
        let views = vec![View::new(df).x("x").count().color("kind").dodge()];
        let (_, y) = merged_domains(&views);
        // Dodge keeps the per-cell maximum.
        assert_eq!(y, Some(Domain::numeric(0.0, 1.0)));
    }

    #[test]
    fn test_flip_round_trip_matches_cartesian() {
        // Projecting (a, b) under flip with swapped-domain scales must equal
        // projecting (b, a) under cartesian with unswapped scales.
        let cart = render_panel(
            &[scatter_view()],
            geom(),
            &PanelOptions::default(),
            &Theme::default(),
        );
        let flip = render_panel(
            &[scatter_view().flip()],
            geom(),
            &PanelOptions::default(),
            &Theme::default(),
        );
        let circles = |g: &Group| -> Vec<(f32, f32)> {
            g.shapes
                .iter()
                .filter_map(|s| match s {
                    Shape::Circle { cx, cy, .. } => Some((*cx, *cy)),
                    _ => None,
                })
                .collect()
        };
        let cart_pts = circles(&cart);
        let flip_pts = circles(&flip);
        assert_eq!(cart_pts.len(), flip_pts.len());
        // The panel is not square (200x150), so the comparison runs in
        // normalized drawable coordinates. With both pixel ranges inverted on
        // y only, the flipped horizontal fraction equals one minus the
        // cartesian vertical fraction, and vice versa.
        let g = geom();
        for (c, f) in cart_pts.iter().zip(&flip_pts) {
            let cn = ((c.0 - g.margin) / g.inner_width(), (c.1 - g.margin) / g.inner_height());
            let fp = ((f.0 - g.margin) / g.inner_width(), (f.1 - g.margin) / g.inner_height());
            assert!((fp.0 - (1.0 - cn.1)).abs() < 0.001);
            assert!((fp.1 - (1.0 - cn.0)).abs() < 0.001);
        }
    }
}
