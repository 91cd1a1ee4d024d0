//! Statistical transforms.
//!
//! [`compute`] turns one view's raw columns into transform-specific payloads
//! plus the x/y domains the axes must cover. The defining correctness
//! property: aggregating transforms (bin, count) derive their y-domain from
//! the aggregated values, never from the raw column range.
//!
//! The engine never fails. Malformed rows are filtered, degenerate series
//! produce empty payloads, and an input with nothing left yields the fallback
//! domain, leaving "nothing to draw" decisions to the renderer.

use crate::data::DataValue;
use crate::domain::Domain;
use crate::view::{TransformKind, View};

/// Samples per fitted smooth curve.
pub const CURVE_SAMPLES: usize = 80;

/// Fraction of points in each local regression window.
pub const LOESS_SPAN: f32 = 0.75;

/// Minimum points (after duplicate aggregation) for a smooth fit.
pub const MIN_SMOOTH_POINTS: usize = 4;

/// One series of cleaned point data. `labels` is populated instead of `xs`
/// when the x channel is categorical; `sizes`/`texts` align with the points
/// when those channels are mapped and are empty otherwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointGroup {
    /// Color series label; None for the single unkeyed series.
    pub key: Option<String>,
    /// Numeric x values.
    pub xs: Vec<f32>,
    /// Categorical x labels.
    pub labels: Vec<String>,
    /// Numeric y values.
    pub ys: Vec<f32>,
    /// Size channel values.
    pub sizes: Vec<f32>,
    /// Text channel values.
    pub texts: Vec<String>,
}

/// One histogram bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Bin lower edge.
    pub start: f32,
    /// Bin upper edge.
    pub end: f32,
    /// Rows falling in the bin.
    pub count: f32,
}

/// Bins for one color series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinGroup {
    /// Color series label.
    pub key: Option<String>,
    /// Bins in x order.
    pub bins: Vec<Bin>,
}

/// A fitted or drawn line for one color series. Empty vectors mean the series
/// was degenerate and draws nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineStrip {
    /// Color series label.
    pub key: Option<String>,
    /// X positions in draw order.
    pub xs: Vec<f32>,
    /// Y positions in draw order.
    pub ys: Vec<f32>,
}

/// Per-category counts for one color series, zero-filled over the shared
/// category order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountSeries {
    /// Color series label.
    pub key: Option<String>,
    /// Counts aligned with the categorical x-domain labels.
    pub counts: Vec<f32>,
}

/// Transform-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Computed {
    /// Point groups (identity transform).
    Points(Vec<PointGroup>),
    /// Histogram bins (bin transform).
    Bins(Vec<BinGroup>),
    /// Line strips (regress/smooth transforms).
    Lines(Vec<LineStrip>),
    /// Count series (count transform).
    Counts(Vec<CountSeries>),
}

/// Output of running a statistical transform on one view.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    /// Transform-specific payload.
    pub computed: Computed,
    /// Extent the x axis must cover.
    pub x_domain: Domain,
    /// Extent the y axis must cover.
    pub y_domain: Domain,
}

impl TransformResult {
    fn empty(computed: Computed) -> Self {
        Self { computed, x_domain: Domain::fallback(), y_domain: Domain::fallback() }
    }

    /// Series keys in first-seen order, for color assignment.
    #[must_use]
    pub fn series_keys(&self) -> Vec<String> {
        let keys: Vec<Option<String>> = match &self.computed {
            Computed::Points(groups) => groups.iter().map(|g| g.key.clone()).collect(),
            Computed::Bins(groups) => groups.iter().map(|g| g.key.clone()).collect(),
            Computed::Lines(strips) => strips.iter().map(|s| s.key.clone()).collect(),
            Computed::Counts(series) => series.iter().map(|s| s.key.clone()).collect(),
        };
        keys.into_iter().flatten().collect()
    }
}

/// Run a view's statistical transform.
#[must_use]
pub fn compute(view: &View) -> TransformResult {
    match view.transform {
        TransformKind::Identity => identity(view),
        TransformKind::Bin => bin(view),
        TransformKind::Regress => regress(view),
        TransformKind::Smooth => smooth(view),
        TransformKind::Count => count(view),
    }
}

/// Cleaned row values for one view, with malformed rows dropped.
struct CleanRows {
    xs: Vec<f32>,
    labels: Vec<String>,
    ys: Vec<f32>,
    colors: Vec<Option<String>>,
    sizes: Vec<f32>,
    texts: Vec<String>,
    has_sizes: bool,
    has_texts: bool,
}

impl CleanRows {
    fn len(&self) -> usize {
        self.colors.len()
    }
}

fn clean_rows(view: &View, need_y: bool, categorical_x: bool) -> CleanRows {
    let mut rows = CleanRows {
        xs: Vec::new(),
        labels: Vec::new(),
        ys: Vec::new(),
        colors: Vec::new(),
        sizes: Vec::new(),
        texts: Vec::new(),
        has_sizes: view.channels.size.is_some(),
        has_texts: view.channels.text.is_some(),
    };
    let Some(x_col) = view.primary_x() else {
        return rows;
    };
    let y_col = view.primary_y();
    if need_y && y_col.is_none() {
        return rows;
    }

    for row in 0..view.data.nrow() {
        let Some(xv) = view.data.value(x_col, row) else {
            continue;
        };
        if xv.is_missing() {
            continue;
        }
        let (x_num, x_label) = if categorical_x {
            (0.0, Some(xv.label()))
        } else {
            match xv.as_f32() {
                Some(v) if v.is_finite() => (v, None),
                _ => continue,
            }
        };

        let mut y_num = 0.0;
        if need_y {
            let yv = y_col.and_then(|c| view.data.value(c, row));
            match yv.and_then(DataValue::as_f32) {
                Some(v) if v.is_finite() => y_num = v,
                _ => continue,
            }
        }

        match x_label {
            Some(label) => rows.labels.push(label),
            None => rows.xs.push(x_num),
        }
        if need_y {
            rows.ys.push(y_num);
        }
        rows.colors.push(
            view.channels.color.as_deref().map(|c| {
                view.data.value(c, row).map_or_else(|| "NA".to_string(), DataValue::label)
            }),
        );
        if rows.has_sizes {
            let size = view
                .channels
                .size
                .as_deref()
                .and_then(|c| view.data.value(c, row))
                .and_then(DataValue::as_f32)
                .filter(|v| v.is_finite())
                .unwrap_or(1.0);
            rows.sizes.push(size);
        }
        if rows.has_texts {
            let text = view
                .channels
                .text
                .as_deref()
                .and_then(|c| view.data.value(c, row))
                .map_or_else(String::new, DataValue::label);
            rows.texts.push(text);
        }
    }
    rows
}

/// Distinct series keys in first-seen order; a single `None` when the color
/// channel is unmapped.
fn series_of(colors: &[Option<String>]) -> Vec<Option<String>> {
    let mut keys: Vec<Option<String>> = Vec::new();
    for color in colors {
        if !keys.contains(color) {
            keys.push(color.clone());
        }
    }
    if keys.is_empty() {
        keys.push(None);
    }
    keys
}

fn indices_for(colors: &[Option<String>], key: &Option<String>) -> Vec<usize> {
    colors
        .iter()
        .enumerate()
        .filter(|(_, c)| *c == key)
        .map(|(i, _)| i)
        .collect()
}

fn identity(view: &View) -> TransformResult {
    let categorical = view.categorical_x;
    let rows = clean_rows(view, true, categorical);
    if rows.len() == 0 {
        return TransformResult::empty(Computed::Points(Vec::new()));
    }

    let x_domain = if categorical {
        let mut labels = Vec::new();
        for label in &rows.labels {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        Domain::categorical(labels)
    } else {
        Domain::from_values(&rows.xs)
    };
    let y_domain = Domain::from_values(&rows.ys);

    let groups = series_of(&rows.colors)
        .into_iter()
        .map(|key| {
            let idx = indices_for(&rows.colors, &key);
            PointGroup {
                key,
                xs: if categorical { Vec::new() } else { idx.iter().map(|&i| rows.xs[i]).collect() },
                labels: if categorical {
                    idx.iter().map(|&i| rows.labels[i].clone()).collect()
                } else {
                    Vec::new()
                },
                ys: idx.iter().map(|&i| rows.ys[i]).collect(),
                sizes: if rows.has_sizes {
                    idx.iter().map(|&i| rows.sizes[i]).collect()
                } else {
                    Vec::new()
                },
                texts: if rows.has_texts {
                    idx.iter().map(|&i| rows.texts[i].clone()).collect()
                } else {
                    Vec::new()
                },
            }
        })
        .collect();

    TransformResult { computed: Computed::Points(groups), x_domain, y_domain }
}

/// Sturges' bin count: `ceil(log2(n)) + 1`.
fn sturges(n: usize) -> usize {
    ((n as f32).log2().ceil() as usize + 1).max(1)
}

fn bin_values(xs: &[f32]) -> Vec<Bin> {
    let n = xs.len();
    if n == 0 {
        return Vec::new();
    }
    let min = xs.iter().copied().fold(f32::INFINITY, f32::min);
    let max = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if (max - min).abs() < f32::EPSILON {
        return vec![Bin { start: min, end: max, count: n as f32 }];
    }
    let k = sturges(n);
    let width = (max - min) / k as f32;
    let mut counts = vec![0.0_f32; k];
    for &x in xs {
        let idx = (((x - min) / width) as usize).min(k - 1);
        counts[idx] += 1.0;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min + width * i as f32,
            end: min + width * (i + 1) as f32,
            count,
        })
        .collect()
}

fn bin(view: &View) -> TransformResult {
    let rows = clean_rows(view, false, false);
    if rows.xs.is_empty() {
        return TransformResult::empty(Computed::Bins(Vec::new()));
    }

    let x_domain = Domain::from_values(&rows.xs);
    let groups: Vec<BinGroup> = series_of(&rows.colors)
        .into_iter()
        .map(|key| {
            let idx = indices_for(&rows.colors, &key);
            let xs: Vec<f32> = idx.iter().map(|&i| rows.xs[i]).collect();
            BinGroup { key, bins: bin_values(&xs) }
        })
        .collect();

    // The axis must cover the tallest bin across every series, not the raw
    // x-column range.
    let max_count = groups
        .iter()
        .flat_map(|g| g.bins.iter())
        .map(|b| b.count)
        .fold(0.0_f32, f32::max);
    let y_domain = Domain::numeric(0.0, max_count.max(1.0));

    TransformResult { computed: Computed::Bins(groups), x_domain, y_domain }
}

fn ols_fit(xs: &[f32], ys: &[f32]) -> Option<(f32, f32)> {
    let n = xs.len() as f32;
    if xs.len() < 2 {
        return None;
    }
    let mean_x = xs.iter().sum::<f32>() / n;
    let mean_y = ys.iter().sum::<f32>() / n;
    let mut cov = 0.0;
    let mut var = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        cov += (x - mean_x) * (y - mean_y);
        var += (x - mean_x) * (x - mean_x);
    }
    if var < f32::EPSILON {
        return None;
    }
    let slope = cov / var;
    Some((slope, mean_y - slope * mean_x))
}

fn regress(view: &View) -> TransformResult {
    let rows = clean_rows(view, true, false);
    if rows.len() == 0 {
        return TransformResult::empty(Computed::Lines(Vec::new()));
    }

    let x_domain = Domain::from_values(&rows.xs);
    let y_domain = Domain::from_values(&rows.ys);

    let strips = series_of(&rows.colors)
        .into_iter()
        .map(|key| {
            let idx = indices_for(&rows.colors, &key);
            let xs: Vec<f32> = idx.iter().map(|&i| rows.xs[i]).collect();
            let ys: Vec<f32> = idx.iter().map(|&i| rows.ys[i]).collect();
            match ols_fit(&xs, &ys) {
                Some((slope, intercept)) => {
                    let x_min = xs.iter().copied().fold(f32::INFINITY, f32::min);
                    let x_max = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                    LineStrip {
                        key,
                        xs: vec![x_min, x_max],
                        ys: vec![slope * x_min + intercept, slope * x_max + intercept],
                    }
                }
                None => LineStrip { key, ..LineStrip::default() },
            }
        })
        .collect();

    TransformResult { computed: Computed::Lines(strips), x_domain, y_domain }
}

/// Average duplicate x values and sort ascending; the local smoother needs
/// strictly increasing x.
fn aggregate_duplicates(xs: &[f32], ys: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let mut pairs: Vec<(f32, f32)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let mut out_x: Vec<f32> = Vec::with_capacity(pairs.len());
    let mut out_y: Vec<f32> = Vec::with_capacity(pairs.len());
    let mut i = 0;
    while i < pairs.len() {
        let x = pairs[i].0;
        let mut sum = 0.0;
        let mut count = 0.0;
        while i < pairs.len() && (pairs[i].0 - x).abs() < f32::EPSILON {
            sum += pairs[i].1;
            count += 1.0;
            i += 1;
        }
        out_x.push(x);
        out_y.push(sum / count);
    }
    (out_x, out_y)
}

/// Tricube-weighted local linear fit evaluated at `x0`.
fn loess_at(x0: f32, xs: &[f32], ys: &[f32]) -> f32 {
    let n = xs.len();
    let window = ((LOESS_SPAN * n as f32).ceil() as usize).clamp(2, n);

    let mut dists: Vec<f32> = xs.iter().map(|&x| (x - x0).abs()).collect();
    dists.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let d_max = dists[window - 1].max(f32::MIN_POSITIVE);

    // Fit y = a + b*(x - x0); centering on the evaluation point keeps the
    // normal equations well conditioned for large x magnitudes, and the
    // fitted value at x0 is just the intercept.
    let mut sw = 0.0;
    let mut swd = 0.0;
    let mut swy = 0.0;
    let mut swdd = 0.0;
    let mut swdy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - x0;
        let d = dx.abs() / d_max;
        if d >= 1.0 {
            continue;
        }
        let w = (1.0 - d * d * d).powi(3);
        sw += w;
        swd += w * dx;
        swy += w * y;
        swdd += w * dx * dx;
        swdy += w * dx * y;
    }
    if sw < f32::MIN_POSITIVE {
        return ys.iter().sum::<f32>() / n as f32;
    }
    let denom = sw * swdd - swd * swd;
    if denom.abs() < f32::EPSILON {
        return swy / sw;
    }
    let slope = (sw * swdy - swd * swy) / denom;
    (swy - slope * swd) / sw
}

fn smooth(view: &View) -> TransformResult {
    let rows = clean_rows(view, true, false);
    if rows.len() == 0 {
        return TransformResult::empty(Computed::Lines(Vec::new()));
    }

    let x_domain = Domain::from_values(&rows.xs);
    let mut y_domain = Domain::from_values(&rows.ys);

    let strips: Vec<LineStrip> = series_of(&rows.colors)
        .into_iter()
        .map(|key| {
            let idx = indices_for(&rows.colors, &key);
            let xs: Vec<f32> = idx.iter().map(|&i| rows.xs[i]).collect();
            let ys: Vec<f32> = idx.iter().map(|&i| rows.ys[i]).collect();
            let (agg_x, agg_y) = aggregate_duplicates(&xs, &ys);
            if agg_x.len() < MIN_SMOOTH_POINTS {
                return LineStrip { key, ..LineStrip::default() };
            }
            let x_min = agg_x[0];
            let x_max = agg_x[agg_x.len() - 1];
            let mut fit_x = Vec::with_capacity(CURVE_SAMPLES);
            let mut fit_y = Vec::with_capacity(CURVE_SAMPLES);
            for s in 0..CURVE_SAMPLES {
                let t = s as f32 / (CURVE_SAMPLES - 1) as f32;
                let x0 = x_min + (x_max - x_min) * t;
                fit_x.push(x0);
                fit_y.push(loess_at(x0, &agg_x, &agg_y));
            }
            LineStrip { key, xs: fit_x, ys: fit_y }
        })
        .collect();

    // The axis covers the fitted curves as well as the raw points.
    for strip in &strips {
        if !strip.ys.is_empty() {
            y_domain = y_domain.merge(&Domain::from_values(&strip.ys));
        }
    }

    TransformResult { computed: Computed::Lines(strips), x_domain, y_domain }
}

fn count(view: &View) -> TransformResult {
    let rows = clean_rows(view, false, true);
    if rows.len() == 0 {
        return TransformResult::empty(Computed::Counts(Vec::new()));
    }

    let mut categories: Vec<String> = Vec::new();
    for label in &rows.labels {
        if !categories.contains(label) {
            categories.push(label.clone());
        }
    }

    let series: Vec<CountSeries> = series_of(&rows.colors)
        .into_iter()
        .map(|key| {
            let idx = indices_for(&rows.colors, &key);
            let mut counts = vec![0.0_f32; categories.len()];
            for &i in &idx {
                if let Some(pos) = categories.iter().position(|c| *c == rows.labels[i]) {
                    counts[pos] += 1.0;
                }
            }
            CountSeries { key, counts }
        })
        .collect();

    // Upper bound is the largest single series-by-category cell; stacked
    // layouts recompute their cumulative bound at render time.
    let max_count = series
        .iter()
        .flat_map(|s| s.counts.iter())
        .fold(0.0_f32, |acc, &c| acc.max(c));

    TransformResult {
        computed: Computed::Counts(series),
        x_domain: Domain::categorical(categories),
        y_domain: Domain::numeric(0.0, max_count.max(1.0)),
    }
}
