//! Axis domains and their merge rules.
//!
//! A domain is the extent of data-space values an axis must represent: a
//! numeric `[min, max]` pair or an ordered set of category labels. Domains
//! from multiple layers and panels merge so shared axes stay consistent.

/// The extent of data-space values an axis represents.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// Continuous numeric extent.
    Numeric {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// Ordered category labels, first-seen order.
    Categorical {
        /// Category labels.
        labels: Vec<String>,
    },
}

/// Fraction of the numeric span added on each side when padding.
const PAD_FRACTION: f32 = 0.05;

impl Domain {
    /// Numeric domain from explicit bounds.
    #[must_use]
    pub fn numeric(min: f32, max: f32) -> Self {
        Domain::Numeric { min, max }
    }

    /// Categorical domain from labels.
    #[must_use]
    pub fn categorical(labels: Vec<String>) -> Self {
        Domain::Categorical { labels }
    }

    /// The fallback domain used when no usable values remain.
    #[must_use]
    pub fn fallback() -> Self {
        Domain::Numeric { min: 0.0, max: 1.0 }
    }

    /// Numeric domain spanning the finite values of a slice, or the fallback
    /// when none are finite.
    #[must_use]
    pub fn from_values(values: &[f32]) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min > max {
            return Self::fallback();
        }
        Domain::Numeric { min, max }
    }

    /// Numeric bounds, or None for categorical domains.
    #[must_use]
    pub fn as_numeric(&self) -> Option<(f32, f32)> {
        match self {
            Domain::Numeric { min, max } => Some((*min, *max)),
            Domain::Categorical { .. } => None,
        }
    }

    /// Category labels, or None for numeric domains.
    #[must_use]
    pub fn as_categorical(&self) -> Option<&[String]> {
        match self {
            Domain::Numeric { .. } => None,
            Domain::Categorical { labels } => Some(labels),
        }
    }

    /// Merge two domains. Numeric pairs take the envelope; categorical pairs
    /// take the label union preserving first-seen order. When the kinds
    /// differ, the categorical side wins (a categorical axis cannot widen
    /// numerically).
    #[must_use]
    pub fn merge(&self, other: &Domain) -> Domain {
        match (self, other) {
            (Domain::Numeric { min: a0, max: a1 }, Domain::Numeric { min: b0, max: b1 }) => {
                Domain::Numeric { min: a0.min(*b0), max: a1.max(*b1) }
            }
            (Domain::Categorical { labels: a }, Domain::Categorical { labels: b }) => {
                let mut merged = a.clone();
                for label in b {
                    if !merged.contains(label) {
                        merged.push(label.clone());
                    }
                }
                Domain::Categorical { labels: merged }
            }
            (cat @ Domain::Categorical { .. }, Domain::Numeric { .. })
            | (Domain::Numeric { .. }, cat @ Domain::Categorical { .. }) => cat.clone(),
        }
    }

    /// Merge a sequence of domains; None when the sequence is empty.
    #[must_use]
    pub fn merge_all<'a>(mut domains: impl Iterator<Item = &'a Domain>) -> Option<Domain> {
        let first = domains.next()?.clone();
        Some(domains.fold(first, |acc, d| acc.merge(d)))
    }

    /// Symmetrically pad a numeric domain by 5% of its span. A degenerate
    /// span first expands by one unit each side. With `log_space` set the
    /// padding is multiplicative (5% in log space) so log scales keep a
    /// positive lower bound. Categorical domains pass through unchanged.
    #[must_use]
    pub fn padded(&self, log_space: bool) -> Domain {
        match self {
            Domain::Categorical { .. } => self.clone(),
            Domain::Numeric { min, max } => {
                let (mut lo, mut hi) = (*min, *max);
                if (hi - lo).abs() < f32::EPSILON {
                    lo -= 1.0;
                    hi += 1.0;
                }
                if log_space && lo > 0.0 {
                    let factor = (hi / lo).powf(PAD_FRACTION);
                    Domain::Numeric { min: lo / factor, max: hi * factor }
                } else {
                    let pad = (hi - lo) * PAD_FRACTION;
                    Domain::Numeric { min: lo - pad, max: hi + pad }
                }
            }
        }
    }

    /// True when a scale can be built from this domain: finite ordered
    /// numeric bounds, or at least one category label.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        match self {
            Domain::Numeric { min, max } => min.is_finite() && max.is_finite() && min <= max,
            Domain::Categorical { labels } => !labels.is_empty(),
        }
    }

    /// True when the domain contains the value (numeric domains only).
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        match self {
            Domain::Numeric { min, max } => value >= *min && value <= *max,
            Domain::Categorical { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_sweep() {
        let d = Domain::from_values(&[3.0, -1.0, 2.0]);
        assert_eq!(d, Domain::numeric(-1.0, 3.0));
    }

    #[test]
    fn test_from_values_skips_nan() {
        let d = Domain::from_values(&[f32::NAN, 2.0, 5.0]);
        assert_eq!(d, Domain::numeric(2.0, 5.0));
    }

    #[test]
    fn test_from_values_empty_fallback() {
        assert_eq!(Domain::from_values(&[]), Domain::numeric(0.0, 1.0));
        assert_eq!(Domain::from_values(&[f32::NAN]), Domain::numeric(0.0, 1.0));
    }

    #[test]
    fn test_merge_numeric_envelope() {
        let a = Domain::numeric(0.0, 5.0);
        let b = Domain::numeric(-2.0, 3.0);
        assert_eq!(a.merge(&b), Domain::numeric(-2.0, 5.0));
    }

    #[test]
    fn test_merge_categorical_union_order() {
        let a = Domain::categorical(vec!["x".into(), "y".into()]);
        let b = Domain::categorical(vec!["y".into(), "z".into()]);
        assert_eq!(a.merge(&b), Domain::categorical(vec!["x".into(), "y".into(), "z".into()]));
    }

    #[test]
    fn test_merge_mixed_prefers_categorical() {
        let num = Domain::numeric(0.0, 1.0);
        let cat = Domain::categorical(vec!["a".into()]);
        assert_eq!(num.merge(&cat), cat);
        assert_eq!(cat.merge(&num), cat);
    }

    #[test]
    fn test_merge_all() {
        let domains =
            vec![Domain::numeric(0.0, 1.0), Domain::numeric(-1.0, 0.5), Domain::numeric(0.2, 3.0)];
        let merged = Domain::merge_all(domains.iter()).expect("non-empty");
        assert_eq!(merged, Domain::numeric(-1.0, 3.0));
        assert!(Domain::merge_all([].iter()).is_none());
    }

    #[test]
    fn test_padded_linear() {
        let d = Domain::numeric(0.0, 10.0).padded(false);
        assert_eq!(d, Domain::numeric(-0.5, 10.5));
    }

    #[test]
    fn test_padded_degenerate_expands() {
        let d = Domain::numeric(5.0, 5.0).padded(false);
        let (lo, hi) = d.as_numeric().expect("numeric");
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn test_padded_log_stays_positive() {
        let d = Domain::numeric(1.0, 100.0).padded(true);
        let (lo, hi) = d.as_numeric().expect("numeric");
        assert!(lo > 0.0);
        assert!(lo < 1.0 && hi > 100.0);
    }

    #[test]
    fn test_padded_categorical_unchanged() {
        let cat = Domain::categorical(vec!["a".into()]);
        assert_eq!(cat.padded(false), cat);
    }

    #[test]
    fn test_usable() {
        assert!(Domain::numeric(0.0, 1.0).is_usable());
        assert!(Domain::numeric(1.0, 1.0).is_usable());
        assert!(!Domain::numeric(f32::NAN, 1.0).is_usable());
        assert!(!Domain::numeric(2.0, 1.0).is_usable());
        assert!(!Domain::categorical(vec![]).is_usable());
        assert!(Domain::categorical(vec!["a".into()]).is_usable());
    }

    #[test]
    fn test_contains() {
        let d = Domain::numeric(0.0, 10.0);
        assert!(d.contains(0.0));
        assert!(d.contains(10.0));
        assert!(!d.contains(10.1));
    }
}
