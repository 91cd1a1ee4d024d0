//! Columnar data abstraction.
//!
//! A [`DataFrame`] is the in-memory columnar store every view reads from:
//! named columns of [`DataValue`]s with row-aligned access, distinct-value
//! enumeration in first-seen order, and predicate filtering (used for facet
//! splitting).

use std::collections::HashMap;

/// A value in a data frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A numeric value.
    Number(f32),
    /// A text value.
    Text(String),
    /// A missing value.
    Null,
}

impl DataValue {
    /// Get as f32, or None if not a number.
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string slice, or None if not text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerce to a category label. Numbers format with their shortest
    /// representation; missing values label as `NA`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            DataValue::Number(n) => format!("{n}"),
            DataValue::Text(s) => s.clone(),
            DataValue::Null => "NA".to_string(),
        }
    }

    /// True for `Null` and for NaN numbers.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            DataValue::Number(n) => n.is_nan(),
            DataValue::Text(_) => false,
            DataValue::Null => true,
        }
    }
}

impl From<f32> for DataValue {
    fn from(v: f32) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

/// A simple columnar data frame.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    /// Column data keyed by column name.
    columns: HashMap<String, Vec<DataValue>>,
    /// Number of rows.
    n_rows: usize,
}

impl DataFrame {
    /// Create a new empty data frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from x and y arrays.
    #[must_use]
    pub fn from_xy(x: &[f32], y: &[f32]) -> Self {
        let n = x.len().min(y.len());
        let mut df = Self::new();
        df.add_column_f32("x", &x[..n]);
        df.add_column_f32("y", &y[..n]);
        df
    }

    /// Add a numeric column.
    pub fn add_column_f32(&mut self, name: &str, data: &[f32]) {
        let values: Vec<DataValue> = data.iter().map(|&v| DataValue::Number(v)).collect();
        self.n_rows = self.n_rows.max(values.len());
        self.columns.insert(name.to_string(), values);
    }

    /// Add a text column.
    pub fn add_column_str(&mut self, name: &str, data: &[&str]) {
        let values: Vec<DataValue> = data.iter().map(|&s| DataValue::Text(s.to_string())).collect();
        self.n_rows = self.n_rows.max(values.len());
        self.columns.insert(name.to_string(), values);
    }

    /// Add a column of arbitrary values.
    pub fn add_column(&mut self, name: &str, data: Vec<DataValue>) {
        self.n_rows = self.n_rows.max(data.len());
        self.columns.insert(name.to_string(), data);
    }

    /// Get a column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[DataValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Get the value at `(column, row)`; None past the column's end.
    #[must_use]
    pub fn value(&self, name: &str, row: usize) -> Option<&DataValue> {
        self.columns.get(name).and_then(|col| col.get(row))
    }

    /// Get a column's numeric values, skipping non-numbers.
    #[must_use]
    pub fn get_f32(&self, name: &str) -> Option<Vec<f32>> {
        self.columns.get(name).map(|col| col.iter().filter_map(DataValue::as_f32).collect())
    }

    /// Get number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.n_rows
    }

    /// Get number of columns.
    #[must_use]
    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get column names.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Distinct labels of a column, preserving first-seen order.
    /// Missing values are skipped.
    #[must_use]
    pub fn distinct(&self, name: &str) -> Vec<String> {
        let mut seen = Vec::new();
        if let Some(col) = self.columns.get(name) {
            for value in col {
                if value.is_missing() {
                    continue;
                }
                let label = value.label();
                if !seen.contains(&label) {
                    seen.push(label);
                }
            }
        }
        seen
    }

    /// New frame keeping only rows where the predicate holds for the row's
    /// value in `name`. Rows past a shorter column's end count as missing.
    #[must_use]
    pub fn filter<F>(&self, name: &str, pred: F) -> DataFrame
    where
        F: Fn(&DataValue) -> bool,
    {
        let keep: Vec<usize> = (0..self.n_rows)
            .filter(|&row| self.value(name, row).is_some_and(&pred))
            .collect();
        self.take_rows(&keep)
    }

    /// New frame keeping only rows whose label in `name` equals `label`.
    #[must_use]
    pub fn filter_eq(&self, name: &str, label: &str) -> DataFrame {
        self.filter(name, |v| !v.is_missing() && v.label() == label)
    }

    fn take_rows(&self, rows: &[usize]) -> DataFrame {
        let mut out = DataFrame::new();
        for (name, col) in &self.columns {
            let values: Vec<DataValue> = rows
                .iter()
                .map(|&row| col.get(row).cloned().unwrap_or(DataValue::Null))
                .collect();
            out.columns.insert(name.clone(), values);
        }
        out.n_rows = rows.len();
        out
    }
}
