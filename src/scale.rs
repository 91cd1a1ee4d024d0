//! Scale construction: domain-to-pixel mappings with tick support.
//!
//! A [`Scale`] maps an axis [`Domain`] onto a pixel range and generates tick
//! values and display labels. Continuous domains become linear or log scales
//! per the [`ScaleSpec`]; categorical domains become band scales exposing
//! per-category geometry. All tick and label math lives in this module.

use crate::domain::Domain;
use crate::error::{Error, Result};

/// Continuous scale kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleKind {
    /// Linear mapping.
    #[default]
    Linear,
    /// Logarithmic (base 10) mapping.
    Log,
}

/// Per-axis scale options carried by a view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleSpec {
    /// Continuous mapping kind.
    pub kind: ScaleKind,
    /// Explicit domain override.
    pub domain: Option<(f32, f32)>,
}

impl ScaleSpec {
    /// Linear spec with no overrides.
    #[must_use]
    pub fn linear() -> Self {
        Self::default()
    }

    /// Same spec switched to a log mapping.
    #[must_use]
    pub fn log(mut self) -> Self {
        self.kind = ScaleKind::Log;
        self
    }

    /// Same spec with an explicit domain.
    #[must_use]
    pub fn with_domain(mut self, min: f32, max: f32) -> Self {
        self.domain = Some((min, max));
        self
    }

    /// True for log mappings.
    #[must_use]
    pub fn is_log(&self) -> bool {
        self.kind == ScaleKind::Log
    }
}

/// Target tick count for continuous axes.
const TICK_TARGET: usize = 5;

/// Inter-band padding as a fraction of one band step, applied each side.
const BAND_PADDING: f32 = 0.1;

/// Linear continuous scale.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl LinearScale {
    /// Create a linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite or degenerate domains.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain("domain bounds must be finite".to_string()));
        }
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("domain min and max cannot be equal".to_string()));
        }
        Ok(Self { domain, range })
    }

    /// Map a domain value to a pixel position.
    #[must_use]
    pub fn apply(&self, value: f32) -> f32 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Map a pixel position back to a domain value.
    #[must_use]
    pub fn invert(&self, value: f32) -> f32 {
        let t = (value - self.range.0) / (self.range.1 - self.range.0);
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }

    /// Domain extent.
    #[must_use]
    pub fn domain(&self) -> (f32, f32) {
        self.domain
    }
}

/// Logarithmic (base 10) continuous scale.
#[derive(Debug, Clone, Copy)]
pub struct LogScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl LogScale {
    /// Create a log scale.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive or degenerate domains.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if domain.0 <= 0.0 || domain.1 <= 0.0 {
            return Err(Error::ScaleDomain("log scale domain must be positive".to_string()));
        }
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("domain min and max cannot be equal".to_string()));
        }
        Ok(Self { domain, range })
    }

    /// Map a domain value to a pixel position.
    #[must_use]
    pub fn apply(&self, value: f32) -> f32 {
        let log_min = self.domain.0.log10();
        let log_max = self.domain.1.log10();
        let log_val = value.max(f32::MIN_POSITIVE).log10();
        let t = (log_val - log_min) / (log_max - log_min);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Domain extent.
    #[must_use]
    pub fn domain(&self) -> (f32, f32) {
        self.domain
    }
}

/// Categorical band scale: the pixel range divided into equal bands with
/// inter-band padding.
#[derive(Debug, Clone)]
pub struct BandScale {
    labels: Vec<String>,
    range: (f32, f32),
}

impl BandScale {
    /// Create a band scale.
    ///
    /// # Errors
    ///
    /// Returns an error when no labels are given.
    pub fn new(labels: Vec<String>, range: (f32, f32)) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::ScaleDomain("band scale requires at least one category".to_string()));
        }
        Ok(Self { labels, range })
    }

    fn step(&self) -> f32 {
        (self.range.1 - self.range.0) / self.labels.len() as f32
    }

    /// Width of one band in pixels.
    #[must_use]
    pub fn bandwidth(&self) -> f32 {
        (self.step() * (1.0 - 2.0 * BAND_PADDING)).abs()
    }

    /// Band start/end pixel offsets for a category, in range direction.
    #[must_use]
    pub fn band_bounds(&self, label: &str) -> Option<(f32, f32)> {
        let index = self.labels.iter().position(|l| l == label)?;
        let step = self.step();
        let start = self.range.0 + step * (index as f32 + BAND_PADDING);
        let end = self.range.0 + step * ((index + 1) as f32 - BAND_PADDING);
        Some((start, end))
    }

    /// Band center for a category.
    #[must_use]
    pub fn center(&self, label: &str) -> Option<f32> {
        let index = self.labels.iter().position(|l| l == label)?;
        Some(self.range.0 + self.step() * (index as f32 + 0.5))
    }

    /// Continuous position for a fractional band index.
    #[must_use]
    pub fn apply_index(&self, index: f32) -> f32 {
        self.range.0 + self.step() * (index + 0.5)
    }

    /// Category labels in band order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// A constructed axis scale.
#[derive(Debug, Clone)]
pub enum Scale {
    /// Linear continuous scale.
    Linear(LinearScale),
    /// Log continuous scale.
    Log(LogScale),
    /// Categorical band scale.
    Band(BandScale),
}

impl Scale {
    /// Build a scale from a merged domain, a pixel range, and per-axis
    /// options. Categorical domains always build band scales; an explicit
    /// [`ScaleSpec::domain`] override replaces numeric bounds.
    ///
    /// # Errors
    ///
    /// Returns an error for unusable domains (empty categories, degenerate or
    /// non-positive-log numeric bounds).
    pub fn build(domain: &Domain, range: (f32, f32), spec: &ScaleSpec) -> Result<Scale> {
        match domain {
            Domain::Categorical { labels } => {
                Ok(Scale::Band(BandScale::new(labels.clone(), range)?))
            }
            Domain::Numeric { min, max } => {
                let (lo, hi) = spec.domain.unwrap_or((*min, *max));
                match spec.kind {
                    ScaleKind::Log => Ok(Scale::Log(LogScale::new((lo, hi), range)?)),
                    ScaleKind::Linear => Ok(Scale::Linear(LinearScale::new((lo, hi), range)?)),
                }
            }
        }
    }

    /// Map a domain value to a pixel position. Band scales interpret the
    /// value as a fractional band index.
    #[must_use]
    pub fn apply(&self, value: f32) -> f32 {
        match self {
            Scale::Linear(s) => s.apply(value),
            Scale::Log(s) => s.apply(value),
            Scale::Band(s) => s.apply_index(value),
        }
    }

    /// Pixel range the scale maps onto.
    #[must_use]
    pub fn range(&self) -> (f32, f32) {
        match self {
            Scale::Linear(s) => s.range,
            Scale::Log(s) => s.range,
            Scale::Band(s) => s.range,
        }
    }

    /// Representative tick values in domain space. Band scales tick at each
    /// band index.
    #[must_use]
    pub fn tick_values(&self) -> Vec<f32> {
        match self {
            Scale::Linear(s) => linear_ticks(s.domain.0, s.domain.1, TICK_TARGET),
            Scale::Log(s) => log_ticks(s.domain.0, s.domain.1),
            Scale::Band(s) => (0..s.labels.len()).map(|i| i as f32).collect(),
        }
    }

    /// Pixel positions of the ticks, in range order.
    #[must_use]
    pub fn tick_positions(&self) -> Vec<f32> {
        self.tick_values().iter().map(|&v| self.apply(v)).collect()
    }

    /// Display labels for the ticks.
    #[must_use]
    pub fn tick_labels(&self) -> Vec<String> {
        match self {
            Scale::Band(s) => s.labels.clone(),
            _ => self.format(&self.tick_values()),
        }
    }

    /// Format domain values for display. Band scales treat values as band
    /// indices and return the corresponding labels.
    #[must_use]
    pub fn format(&self, values: &[f32]) -> Vec<String> {
        match self {
            Scale::Band(s) => values
                .iter()
                .map(|&v| {
                    s.labels
                        .get(v.round().max(0.0) as usize)
                        .cloned()
                        .unwrap_or_default()
                })
                .collect(),
            _ => values.iter().map(|&v| format_value(v)).collect(),
        }
    }

    /// Band geometry accessor; None for continuous scales.
    #[must_use]
    pub fn band(&self) -> Option<&BandScale> {
        match self {
            Scale::Band(s) => Some(s),
            _ => None,
        }
    }
}

/// Round a raw step up to a 1/2/5 multiple of a power of ten.
fn nice_step(raw: f32) -> f32 {
    let magnitude = 10.0_f32.powf(raw.abs().log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction < 1.5 {
        1.0
    } else if fraction < 3.5 {
        2.0
    } else if fraction < 7.5 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Evenly spaced ticks at nice-number steps covering `[min, max]`.
fn linear_ticks(min: f32, max: f32, target: usize) -> Vec<f32> {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || target == 0 {
        return Vec::new();
    }
    let step = nice_step(span / target as f32);
    let first = (min / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut tick = first;
    while tick <= max + step * 1e-4 {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

/// Powers of ten within the domain; linear ticks when the domain spans less
/// than one decade.
fn log_ticks(min: f32, max: f32) -> Vec<f32> {
    let lo = min.log10().ceil() as i32;
    let hi = max.log10().floor() as i32;
    if lo > hi {
        return linear_ticks(min, max, TICK_TARGET);
    }
    (lo..=hi).map(|e| 10.0_f32.powi(e)).collect()
}

/// Format a tick value, trimming trailing zeros.
fn format_value(v: f32) -> String {
    let mut s = format!("{v:.6}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
