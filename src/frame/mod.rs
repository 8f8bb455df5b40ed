//! In-memory tabular container with named, typed columns.
//!
//! A [`Frame`] is the input to the preprocessing plan: the builder reads
//! category vocabularies from a sample frame, and the fitted
//! [`ColumnTransformer`](crate::preprocessing::ColumnTransformer) selects its
//! column groups from frames by name.
//!
//! # Missing values
//!
//! - Numeric columns store `f64`, with `NaN` marking a missing entry.
//! - Text columns store `Option<String>`, with `None` marking a missing entry.
//!
//! # Example
//!
//! ```rust
//! use tabular_prep::frame::{Column, Frame};
//!
//! let frame = Frame::from_columns(vec![
//!     ("age", Column::numeric(vec![22.0, f64::NAN, 35.0])),
//!     ("city", Column::text(vec![Some("Paris"), Some("Oslo"), Some("Paris")])),
//! ])
//! .unwrap();
//!
//! assert_eq!(frame.n_rows(), 3);
//! assert_eq!(frame.unique("city").unwrap(), vec!["Paris", "Oslo"]);
//! ```

use crate::error::PreprocessingError;
use ndarray::Array2;
use std::collections::HashSet;

mod csv;

/// A single named column of a [`Frame`].
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Numeric values; `NaN` is missing.
    Numeric(Vec<f64>),
    /// Text values; `None` is missing.
    Text(Vec<Option<String>>),
}

impl Column {
    /// Create a numeric column.
    pub fn numeric(values: Vec<f64>) -> Self {
        Column::Numeric(values)
    }

    /// Create a text column from optional string-like values.
    pub fn text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Column::Text(values.into_iter().map(|v| v.map(Into::into)).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Whether the entry at `row` is missing.
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Numeric(values) => values[row].is_nan(),
            Column::Text(values) => values[row].is_none(),
        }
    }

    /// Whether any entry is missing.
    pub fn has_missing(&self) -> bool {
        match self {
            Column::Numeric(values) => values.iter().any(|v| v.is_nan()),
            Column::Text(values) => values.iter().any(Option::is_none),
        }
    }

    /// Category label of the entry at `row`, `None` when missing.
    ///
    /// Numeric entries are rendered with `f64`'s `Display`, so `1.0` becomes `"1"`.
    pub fn label(&self, row: usize) -> Option<String> {
        match self {
            Column::Numeric(values) => {
                let v = values[row];
                if v.is_nan() {
                    None
                } else {
                    Some(v.to_string())
                }
            }
            Column::Text(values) => values[row].clone(),
        }
    }

    /// Category labels of every entry.
    pub fn labels(&self) -> Vec<Option<String>> {
        (0..self.len()).map(|row| self.label(row)).collect()
    }
}

/// Rows × named columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from `(name, column)` pairs, keeping their order.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, PreprocessingError>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut frame = Self::new();
        for (name, column) in columns {
            frame.push_column(name, column)?;
        }
        Ok(frame)
    }

    /// Append a column.
    ///
    /// # Errors
    /// - [`PreprocessingError::DuplicateColumn`] if the name is taken.
    /// - [`PreprocessingError::InvalidShape`] if the length differs from the
    ///   frame's row count.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), PreprocessingError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(PreprocessingError::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        } else if column.len() != self.n_rows {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} rows", self.n_rows),
                got: format!("{} rows in column '{}'", column.len(), name),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style [`push_column`](Self::push_column).
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<Self, PreprocessingError> {
        self.push_column(name, column)?;
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in frame order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    /// Like [`column`](Self::column), failing with `ColumnNotFound`.
    pub fn require_column(&self, name: &str) -> Result<&Column, PreprocessingError> {
        self.column(name)
            .ok_or_else(|| PreprocessingError::ColumnNotFound(name.to_string()))
    }

    /// Distinct non-missing labels of a column, in first-seen order.
    pub fn unique(&self, name: &str) -> Result<Vec<String>, PreprocessingError> {
        let column = self.require_column(name)?;
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for label in column.labels().into_iter().flatten() {
            if seen.insert(label.clone()) {
                unique.push(label);
            }
        }
        Ok(unique)
    }

    /// Gather numeric columns into a `(n_rows, names.len())` matrix.
    pub fn numeric_block(&self, names: &[String]) -> Result<Array2<f64>, PreprocessingError> {
        let mut slices = Vec::with_capacity(names.len());
        for name in names {
            match self.require_column(name)? {
                Column::Numeric(values) => slices.push(values.as_slice()),
                Column::Text(_) => return Err(PreprocessingError::NotNumeric(name.clone())),
            }
        }
        Ok(Array2::from_shape_fn((self.n_rows, names.len()), |(r, c)| {
            slices[c][r]
        }))
    }

    /// Gather category labels of columns into a `(n_rows, names.len())` matrix.
    pub fn label_block(
        &self,
        names: &[String],
    ) -> Result<Array2<Option<String>>, PreprocessingError> {
        let labels = names
            .iter()
            .map(|name| self.require_column(name).map(Column::labels))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Array2::from_shape_fn((self.n_rows, names.len()), |(r, c)| {
            labels[c][r].clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        Frame::from_columns(vec![
            ("age", Column::numeric(vec![22.0, f64::NAN, 35.0, 35.0])),
            (
                "city",
                Column::text(vec![Some("Paris"), None, Some("Oslo"), Some("Paris")]),
            ),
            ("pclass", Column::numeric(vec![3.0, 1.0, 3.0, 2.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_frame_shape() {
        let frame = sample();
        assert_eq!(frame.n_rows(), 4);
        assert_eq!(frame.n_columns(), 3);
        assert_eq!(frame.column_names(), &["age", "city", "pclass"]);
        assert!(frame.contains("city"));
        assert!(!frame.contains("fare"));
    }

    #[test]
    fn test_push_column_length_mismatch() {
        let mut frame = sample();
        let result = frame.push_column("fare", Column::numeric(vec![1.0]));
        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_push_column_duplicate() {
        let mut frame = sample();
        let result = frame.push_column("age", Column::numeric(vec![0.0; 4]));
        assert!(matches!(result, Err(PreprocessingError::DuplicateColumn(_))));
    }

    #[test]
    fn test_unique_first_seen_order_skips_missing() {
        let frame = sample();
        assert_eq!(frame.unique("city").unwrap(), vec!["Paris", "Oslo"]);
    }

    #[test]
    fn test_unique_numeric_labels() {
        let frame = sample();
        assert_eq!(frame.unique("pclass").unwrap(), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_unique_missing_column() {
        let frame = sample();
        assert!(matches!(
            frame.unique("fare"),
            Err(PreprocessingError::ColumnNotFound(name)) if name == "fare"
        ));
    }

    #[test]
    fn test_numeric_block() {
        let frame = sample();
        let block = frame
            .numeric_block(&["pclass".to_string(), "age".to_string()])
            .unwrap();
        assert_eq!(block.dim(), (4, 2));
        assert_eq!(block[[0, 0]], 3.0);
        assert_eq!(block[[0, 1]], 22.0);
        assert!(block[[1, 1]].is_nan());
    }

    #[test]
    fn test_numeric_block_rejects_text() {
        let frame = sample();
        let result = frame.numeric_block(&["city".to_string()]);
        assert!(matches!(result, Err(PreprocessingError::NotNumeric(_))));
    }

    #[test]
    fn test_label_block() {
        let frame = sample();
        let block = frame.label_block(&["city".to_string()]).unwrap();
        assert_eq!(block.dim(), (4, 1));
        assert_eq!(block[[0, 0]].as_deref(), Some("Paris"));
        assert_eq!(block[[1, 0]], None);
    }

    #[test]
    fn test_column_is_missing() {
        let frame = sample();
        let age = frame.column("age").unwrap();
        assert!(age.is_missing(1));
        assert!(!age.is_missing(0));
        assert!(age.is_numeric());
    }

    #[test]
    fn test_column_has_missing() {
        let frame = sample();
        assert!(frame.column("age").unwrap().has_missing());
        assert!(frame.column("city").unwrap().has_missing());
        assert!(!frame.column("pclass").unwrap().has_missing());
    }
}
