//! One-hot encoding for categorical features.
//!
//! Transforms category labels to one-hot (dummy) encoded indicator columns.

use super::{Categories, CategoryTable, HandleUnknown};
use crate::error::PreprocessingError;
use crate::preprocessing::matrix::{CsrMatrix, Matrix};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;

/// One-hot encoder for categorical features.
///
/// Each input column is a categorical feature. Every category of every
/// column gets its own output column, laid out column by column in
/// vocabulary order.
///
/// # Example
/// ```rust
/// use ndarray::Array2;
/// use tabular_prep::preprocessing::{FittedTransformer, OneHotEncoder, Transformer};
///
/// let colors = ["red", "green", "red"];
/// let data = Array2::from_shape_fn((3, 1), |(r, _)| Some(colors[r].to_string()));
///
/// let fitted = OneHotEncoder::new().with_sparse(false).fit(&data).unwrap();
/// // Auto categories are sorted: [green, red]
/// let encoded = fitted.transform(&data).unwrap().into_dense();
/// assert_eq!(encoded.row(0).to_vec(), vec![0.0, 1.0]);
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    categories: Categories,
    handle_unknown: HandleUnknown,
    sparse: bool,
    input_names: Option<Vec<String>>,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder: auto categories, errors on unknown, sparse output.
    pub fn new() -> Self {
        Self {
            categories: Categories::Auto,
            handle_unknown: HandleUnknown::default(),
            sparse: true,
            input_names: None,
        }
    }

    pub fn with_categories(mut self, categories: Categories) -> Self {
        self.categories = categories;
        self
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    /// Emit [`Matrix::Sparse`] (true) or [`Matrix::Dense`] (false).
    pub fn with_sparse(mut self, sparse: bool) -> Self {
        self.sparse = sparse;
        self
    }

    /// Column names used in errors and output feature names.
    pub fn with_input_names(mut self, names: Vec<String>) -> Self {
        self.input_names = Some(names);
        self
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn sparse(&self) -> bool {
        self.sparse
    }
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for OneHotEncoder {
    type Input = Array2<Option<String>>;
    type Output = Matrix;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let table = CategoryTable::fit(
            "OneHotEncoder",
            &self.categories,
            self.handle_unknown,
            self.input_names.as_deref(),
            data,
        )?;

        // Output column where each input column's indicators start.
        let mut offsets = Vec::with_capacity(table.n_features_in());
        let mut n_features_out = 0;
        for vocab in &table.categories {
            offsets.push(n_features_out);
            n_features_out += vocab.len();
        }

        Ok(FittedOneHotEncoder {
            table,
            offsets,
            n_features_out,
            sparse: self.sparse,
        })
    }
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    table: CategoryTable,
    offsets: Vec<usize>,
    n_features_out: usize,
    sparse: bool,
}

impl FittedOneHotEncoder {
    /// Get the categories learned for each feature.
    pub fn categories(&self) -> &[Vec<String>] {
        &self.table.categories
    }

    /// Get the number of categories per input feature.
    pub fn n_values(&self) -> Vec<usize> {
        self.table.categories.iter().map(Vec::len).collect()
    }

    pub fn is_sparse(&self) -> bool {
        self.sparse
    }

    /// `{column}_{category}` for every output column.
    pub fn feature_names(&self) -> Vec<String> {
        self.table
            .input_names
            .iter()
            .zip(&self.table.categories)
            .flat_map(|(name, vocab)| vocab.iter().map(move |cat| format!("{}_{}", name, cat)))
            .collect()
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = Array2<Option<String>>;
    type Output = Matrix;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.table.check_width(data)?;

        let mut rows = Vec::with_capacity(data.nrows());
        for row in data.rows() {
            let mut hot = Vec::with_capacity(row.len());
            for (col, label) in row.iter().enumerate() {
                // Unknown under Ignore leaves the whole block at zero.
                if let Some(idx) = self.table.position(col, label.as_deref())? {
                    hot.push((self.offsets[col] + idx, 1.0));
                }
            }
            rows.push(hot);
        }

        let encoded = CsrMatrix::from_row_entries(self.n_features_out, rows);
        Ok(if self.sparse {
            Matrix::Sparse(encoded)
        } else {
            Matrix::Dense(encoded.to_dense())
        })
    }

    fn n_features_in(&self) -> usize {
        self.table.n_features_in()
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}
