//! Layout composition.
//!
//! [`plot`] decides the panel arrangement (single, variable grid, facet row/
//! column/grid), computes shared-vs-free scale domains by pre-running the
//! transform engine over every cell, renders each panel, and assembles
//! panels, strip labels, axis titles, and the legend into one canvas.

use crate::color::ColorMap;
use crate::coord::PanelGeom;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::panel::{merged_domains, render_panel, PanelOptions};
use crate::scene::{Canvas, Group, Shape, Style, TextAnchor};
use crate::theme::Theme;
use crate::view::{MarkKind, TransformKind, View};

/// Scale sharing across panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sharing {
    /// Shared x and y domains (default).
    #[default]
    Shared,
    /// Free x, shared y.
    FreeX,
    /// Shared x, free y.
    FreeY,
    /// Every panel computes its own domains.
    Free,
}

/// Options for composing a plot.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Scale sharing across panels.
    pub sharing: Sharing,
    /// Theme threaded through every panel and mark.
    pub theme: Theme,
    /// Plot title.
    pub title: Option<String>,
    /// X axis title.
    pub x_label: Option<String>,
    /// Y axis title.
    pub y_label: Option<String>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            sharing: Sharing::Shared,
            theme: Theme::default(),
            title: None,
            x_label: None,
            y_label: None,
        }
    }
}

const LEGEND_WIDTH: f32 = 100.0;
const TITLE_HEIGHT: f32 = 30.0;
const AXIS_LABEL_SIZE: f32 = 18.0;

/// One cell of the panel grid: the views it renders plus its strip label.
struct Cell {
    views: Vec<View>,
    strip: Option<String>,
}

/// Compose a full chart from a set of views.
///
/// # Errors
///
/// Returns an error when no views are given, a facet column is missing from
/// its data, or the canvas dimensions are zero.
pub fn plot(views: &[View], opts: &PlotOptions) -> Result<Canvas> {
    if views.is_empty() {
        return Err(Error::EmptyPlot);
    }
    let mut canvas = Canvas::new(opts.width, opts.height)?;
    let theme = &opts.theme;

    canvas.root.push(Shape::Rect {
        x: 0.0,
        y: 0.0,
        width: opts.width as f32,
        height: opts.height as f32,
        style: Style::fill(theme.background),
    });

    let (n_rows, n_cols, cells) = arrange(views)?;

    // Shared-scale mode merges every cell's domains before any panel render
    // and hands the result to each panel as an override.
    let share_x = matches!(opts.sharing, Sharing::Shared | Sharing::FreeY);
    let share_y = matches!(opts.sharing, Sharing::Shared | Sharing::FreeX);
    let (mut shared_x, mut shared_y) = (None, None);
    if share_x || share_y {
        for cell in &cells {
            let (x, y) = merged_domains(&cell.views);
            shared_x = merge_option(shared_x, x);
            shared_y = merge_option(shared_y, y);
        }
    }

    let legend = legend_labels(views);
    let color_map = legend.as_ref().map(|(_, labels)| {
        ColorMap::from_labels(labels, &theme.palette, theme.default_series_color)
    });

    let legend_w = if legend.is_some() { LEGEND_WIDTH } else { 0.0 };
    let title_h = if opts.title.is_some() { TITLE_HEIGHT } else { 0.0 };
    let x_label_h = if opts.x_label.is_some() { AXIS_LABEL_SIZE } else { 0.0 };
    let y_label_w = if opts.y_label.is_some() { AXIS_LABEL_SIZE } else { 0.0 };

    let grid_w = (opts.width as f32 - legend_w - y_label_w).max(1.0);
    let grid_h = (opts.height as f32 - title_h - x_label_h).max(1.0);
    // A facet column whose values are all missing produces no cells; the
    // max(1) keeps the geometry finite for the empty grid.
    let panel_w = grid_w / n_cols.max(1) as f32;
    let panel_h = grid_h / n_rows.max(1) as f32;
    let geom = PanelGeom::new(panel_w, panel_h, theme.margin);

    for (index, cell) in cells.iter().enumerate() {
        let row = index / n_cols;
        let col = index % n_cols;
        let panel_opts = PanelOptions {
            x_domain: if share_x { shared_x.clone() } else { None },
            y_domain: if share_y { shared_y.clone() } else { None },
            color_map: color_map.clone(),
            show_tick_labels: true,
        };
        let mut panel = render_panel(&cell.views, geom, &panel_opts, theme);
        panel.offset = (y_label_w + col as f32 * panel_w, title_h + row as f32 * panel_h);
        // Strip labels sit in the panel's own top margin band.
        if let Some(strip) = &cell.strip {
            panel.push(Shape::Text {
                x: panel_w / 2.0,
                y: theme.margin - 6.0,
                text: strip.clone(),
                size: theme.font_size,
                color: theme.text_color,
                anchor: TextAnchor::Middle,
            });
        }
        canvas.root.nest(panel);
    }

    if let Some(title) = &opts.title {
        canvas.root.push(Shape::Text {
            x: (opts.width as f32 - legend_w) / 2.0,
            y: TITLE_HEIGHT * 0.7,
            text: title.clone(),
            size: theme.title_font_size,
            color: theme.text_color,
            anchor: TextAnchor::Middle,
        });
    }
    if let Some(label) = &opts.x_label {
        canvas.root.push(Shape::Text {
            x: y_label_w + grid_w / 2.0,
            y: opts.height as f32 - 4.0,
            text: label.clone(),
            size: theme.font_size,
            color: theme.text_color,
            anchor: TextAnchor::Middle,
        });
    }
    if let Some(label) = &opts.y_label {
        canvas.root.push(Shape::Text {
            x: AXIS_LABEL_SIZE * 0.7,
            y: title_h + grid_h / 2.0,
            text: label.clone(),
            size: theme.font_size,
            color: theme.text_color,
            anchor: TextAnchor::Middle,
        });
    }

    if let (Some((column, labels)), Some(map)) = (&legend, &color_map) {
        canvas.root.nest(legend_group(
            opts.width as f32 - LEGEND_WIDTH,
            title_h,
            column,
            labels,
            map,
            theme,
        ));
    }

    Ok(canvas)
}

fn merge_option(acc: Option<Domain>, next: Option<Domain>) -> Option<Domain> {
    match (acc, next) {
        (Some(a), Some(b)) => Some(a.merge(&b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

/// Decide the panel arrangement and build each cell's view list.
fn arrange(views: &[View]) -> Result<(usize, usize, Vec<Cell>)> {
    let faceted = views
        .iter()
        .find(|v| v.channels.facet_row.is_some() || v.channels.facet_col.is_some());

    if let Some(lead) = faceted {
        return arrange_facets(views, lead);
    }

    let lead = &views[0];
    if lead.channels.x.len() > 1 || lead.channels.y.len() > 1 {
        return Ok(arrange_var_grid(views, lead));
    }

    let cell = Cell { views: views.to_vec(), strip: None };
    Ok((1, 1, vec![cell]))
}

/// One panel per (x-column, y-column) pair; a diagonal cell (same column on
/// both axes) becomes a distribution panel.
fn arrange_var_grid(views: &[View], lead: &View) -> (usize, usize, Vec<Cell>) {
    let xs = lead.channels.x.clone();
    let ys = if lead.channels.y.is_empty() { xs.clone() } else { lead.channels.y.clone() };

    let mut cells = Vec::with_capacity(xs.len() * ys.len());
    for y_col in &ys {
        for x_col in &xs {
            let cell_views: Vec<View> = views
                .iter()
                .map(|v| {
                    let mut cell = v.clone();
                    cell.channels.x = vec![x_col.clone()];
                    cell.channels.y = vec![y_col.clone()];
                    if x_col == y_col && !cell.mark.is_annotation() {
                        cell.transform = TransformKind::Bin;
                        cell.mark = MarkKind::Bar;
                    }
                    cell
                })
                .collect();
            cells.push(Cell { views: cell_views, strip: Some(format!("{y_col} ~ {x_col}")) });
        }
    }
    (ys.len(), xs.len(), cells)
}

fn arrange_facets(views: &[View], lead: &View) -> Result<(usize, usize, Vec<Cell>)> {
    let row_col = lead.channels.facet_row.clone();
    let col_col = lead.channels.facet_col.clone();

    let rows = facet_levels(views, row_col.as_deref())?;
    let cols = facet_levels(views, col_col.as_deref())?;

    let mut cells = Vec::with_capacity(rows.len() * cols.len());
    for row_label in &rows {
        for col_label in &cols {
            let cell_views: Vec<View> = views
                .iter()
                .map(|v| facet_subset(v, row_col.as_deref(), row_label, col_col.as_deref(), col_label))
                .collect();
            let strip = match (row_label, col_label) {
                (Some(r), Some(c)) => Some(format!("{r} / {c}")),
                (Some(r), None) => Some(r.clone()),
                (None, Some(c)) => Some(c.clone()),
                (None, None) => None,
            };
            cells.push(Cell { views: cell_views, strip });
        }
    }
    Ok((rows.len(), cols.len(), cells))
}

/// Sorted distinct levels of a facet column across all views that carry it.
fn facet_levels(views: &[View], column: Option<&str>) -> Result<Vec<Option<String>>> {
    let Some(column) = column else {
        return Ok(vec![None]);
    };
    let mut levels: Vec<String> = Vec::new();
    let mut found = false;
    for view in views {
        if view.data.has_column(column) {
            found = true;
            for label in view.data.distinct(column) {
                if !levels.contains(&label) {
                    levels.push(label);
                }
            }
        }
    }
    if !found {
        return Err(Error::UnknownColumn(column.to_string()));
    }
    levels.sort();
    Ok(levels.into_iter().map(Some).collect())
}

/// A view restricted to one facet cell. Annotation views and views without
/// the facet column pass through unfiltered.
fn facet_subset(
    view: &View,
    row_col: Option<&str>,
    row_label: &Option<String>,
    col_col: Option<&str>,
    col_label: &Option<String>,
) -> View {
    let mut cell = view.clone();
    if cell.mark.is_annotation() {
        return cell;
    }
    if let (Some(column), Some(label)) = (row_col, row_label) {
        if cell.data.has_column(column) {
            cell.data = cell.data.filter_eq(column, label);
        }
    }
    if let (Some(column), Some(label)) = (col_col, col_label) {
        if cell.data.has_column(column) {
            cell.data = cell.data.filter_eq(column, label);
        }
    }
    cell
}

/// Legend content: the driving column name plus its labels, when any view
/// maps a color or shape channel.
fn legend_labels(views: &[View]) -> Option<(String, Vec<String>)> {
    let mut column: Option<String> = None;
    let mut labels: Vec<String> = Vec::new();
    for view in views {
        let channel = view.channels.color.as_ref().or(view.channels.shape.as_ref());
        if let Some(col) = channel {
            column.get_or_insert_with(|| col.clone());
            for label in view.data.distinct(col) {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
    }
    column.map(|c| (c, labels))
}

fn legend_group(
    x: f32,
    y: f32,
    column: &str,
    labels: &[String],
    map: &ColorMap,
    theme: &Theme,
) -> Group {
    let mut legend = Group::at(x, y + 10.0);
    legend.push(Shape::Text {
        x: 8.0,
        y: 10.0,
        text: column.to_string(),
        size: theme.font_size,
        color: theme.text_color,
        anchor: TextAnchor::Start,
    });
    for (i, label) in labels.iter().enumerate() {
        let row_y = 22.0 + i as f32 * 16.0;
        legend.push(Shape::Rect {
            x: 8.0,
            y: row_y,
            width: 10.0,
            height: 10.0,
            style: Style::fill(map.get(label)),
        });
        legend.push(Shape::Text {
            x: 22.0,
            y: row_y + 9.0,
            text: label.clone(),
            size: theme.font_size,
            color: theme.text_color,
            anchor: TextAnchor::Start,
        });
    }
    legend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataFrame;

    fn scatter() -> View {
        View::new(DataFrame::from_xy(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0])).x("x").y("y")
    }

    fn count_groups(group: &Group, pred: &dyn Fn(&Shape) -> bool) -> usize {
        group.shapes.iter().filter(|s| pred(s)).count()
            + group.children.iter().map(|c| count_groups(c, pred)).sum::<usize>()
    }

    #[test]
    fn test_plot_empty_views_err() {
        assert!(matches!(plot(&[], &PlotOptions::default()), Err(Error::EmptyPlot)));
    }

    #[test]
    fn test_plot_single_panel() {
        let canvas = plot(&[scatter()], &PlotOptions::default()).expect("plot");
        assert_eq!(canvas.width, 800);
        assert_eq!(canvas.root.children.len(), 1);
        let circles =
            count_groups(&canvas.root, &|s| matches!(s, Shape::Circle { .. }));
        assert_eq!(circles, 3);
    }

    #[test]
    fn test_plot_facet_col_panels() {
        let mut df = DataFrame::from_xy(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
        df.add_column_str("site", &["b", "a", "b", "a"]);
        let view = View::new(df).x("x").y("y").facet_col("site");
        let canvas = plot(&[view], &PlotOptions::default()).expect("plot");
        assert_eq!(canvas.root.children.len(), 2);
    }

    #[test]
    fn test_plot_facet_grid_panels() {
        let mut df = DataFrame::from_xy(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
        df.add_column_str("r", &["u", "u", "v", "v"]);
        df.add_column_str("c", &["l", "m", "l", "m"]);
        let view = View::new(df).x("x").y("y").facet_row("r").facet_col("c");
        let canvas = plot(&[view], &PlotOptions::default()).expect("plot");
        assert_eq!(canvas.root.children.len(), 4);
    }

    #[test]
    fn test_plot_unknown_facet_column_err() {
        let view = scatter().facet_col("nope");
        assert!(matches!(
            plot(&[view], &PlotOptions::default()),
            Err(Error::UnknownColumn(c)) if c == "nope"
        ));
    }

    #[test]
    fn test_plot_variable_grid() {
        let mut df = DataFrame::new();
        df.add_column_f32("a", &[1.0, 2.0, 3.0]);
        df.add_column_f32("b", &[2.0, 3.0, 1.0]);
        let view = View::new(df).xs(&["a", "b"]).ys(&["a", "b"]);
        let canvas = plot(&[view], &PlotOptions::default()).expect("plot");
        // 2x2 grid: two scatter panels off the diagonal, two distribution
        // panels on it.
        assert_eq!(canvas.root.children.len(), 4);
        let polygons =
            count_groups(&canvas.root, &|s| matches!(s, Shape::Polygon { .. }));
        assert!(polygons >= 2, "diagonal cells render histogram bars");
    }

    #[test]
    fn test_plot_legend_when_color_mapped() {
        let mut df = DataFrame::from_xy(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        df.add_column_str("kind", &["u", "v", "u"]);
        let view = View::new(df).x("x").y("y").color("kind");
        let canvas = plot(&[view], &PlotOptions::default()).expect("plot");
        // Panel plus legend group.
        assert_eq!(canvas.root.children.len(), 2);
    }

    #[test]
    fn test_plot_no_legend_without_color() {
        let canvas = plot(&[scatter()], &PlotOptions::default()).expect("plot");
        assert_eq!(canvas.root.children.len(), 1);
    }

    #[test]
    fn test_plot_title_rendered() {
        let opts = PlotOptions { title: Some("Growth".to_string()), ..PlotOptions::default() };
        let canvas = plot(&[scatter()], &opts).expect("plot");
        let titles = count_groups(&canvas.root, &|s| {
            matches!(s, Shape::Text { text, .. } if text == "Growth")
        });
        assert_eq!(titles, 1);
    }

    #[test]
    fn test_facet_levels_sorted() {
        let mut df = DataFrame::from_xy(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        df.add_column_str("site", &["c", "a", "b"]);
        let view = View::new(df).x("x").y("y").facet_col("site");
        let levels = facet_levels(&[view], Some("site")).expect("levels");
        let labels: Vec<&str> =
            levels.iter().map(|l| l.as_deref().unwrap_or("")).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_shared_sharing_merges_domains() {
        // Two facets with disjoint ranges; shared scales mean both panels get
        // the same envelope, so every circle lands inside the same pixel band.
        let mut df = DataFrame::new();
        df.add_column_f32("x", &[0.0, 1.0, 100.0, 101.0]);
        df.add_column_f32("y", &[0.0, 1.0, 100.0, 101.0]);
        df.add_column_str("site", &["a", "a", "b", "b"]);
        let view = View::new(df).x("x").y("y").facet_col("site");

        let shared = plot(&[view.clone()], &PlotOptions::default()).expect("plot");
        let free = plot(
            &[view],
            &PlotOptions { sharing: Sharing::Free, ..PlotOptions::default() },
        )
        .expect("plot");

        let max_cx = |canvas: &Canvas, child: usize| -> f32 {
            canvas.root.children[child]
                .shapes
                .iter()
                .filter_map(|s| match s {
                    Shape::Circle { cx, .. } => Some(*cx),
                    _ => None,
                })
                .fold(f32::NEG_INFINITY, f32::max)
        };
        // Under shared scales panel "a" (low values) hugs the left edge;
        // under free scales it spans its whole panel.
        assert!(max_cx(&shared, 0) < max_cx(&free, 0));
    }

    #[test]
    fn test_legend_labels_union() {
        let mut df1 = DataFrame::from_xy(&[1.0], &[1.0]);
        df1.add_column_str("kind", &["u"]);
        let mut df2 = DataFrame::from_xy(&[1.0], &[1.0]);
        df2.add_column_str("kind", &["v"]);
        let views =
            vec![View::new(df1).x("x").y("y").color("kind"), View::new(df2).x("x").y("y").color("kind")];
        let (column, labels) = legend_labels(&views).expect("legend");
        assert_eq!(column, "kind");
        assert_eq!(labels, vec!["u", "v"]);
    }
}
