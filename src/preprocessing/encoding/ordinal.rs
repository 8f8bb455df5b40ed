//! Ordinal encoding for categorical features.
//!
//! Maps category labels to integer ordinals (0, 1, 2, ...), stored as `f64`.

use super::{Categories, CategoryTable, HandleUnknown};
use crate::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;

/// Ordinal encoder for categorical features.
///
/// Each label is replaced by its position in the column's vocabulary.
/// With [`Categories::Auto`] the vocabulary is sorted ascending.
///
/// # Example
/// ```rust
/// use ndarray::Array2;
/// use tabular_prep::preprocessing::{FittedTransformer, OrdinalEncoder, Transformer};
///
/// let sizes = ["s", "m", "l"];
/// let data = Array2::from_shape_fn((3, 1), |(r, _)| Some(sizes[r].to_string()));
///
/// let fitted = OrdinalEncoder::new().fit(&data).unwrap();
/// // Sorted vocabulary: [l, m, s]
/// let encoded = fitted.transform(&data).unwrap();
/// assert_eq!(encoded.column(0).to_vec(), vec![2.0, 1.0, 0.0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OrdinalEncoder {
    categories: Categories,
    handle_unknown: HandleUnknown,
    input_names: Option<Vec<String>>,
}

impl OrdinalEncoder {
    /// Create a new OrdinalEncoder with default settings.
    pub fn new() -> Self {
        Self::default()
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

    /// Column names used in errors and output feature names.
    pub fn with_input_names(mut self, names: Vec<String>) -> Self {
        self.input_names = Some(names);
        self
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }
}

impl Transformer for OrdinalEncoder {
    type Input = Array2<Option<String>>;
    type Output = Array2<f64>;
    type Fitted = FittedOrdinalEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let table = CategoryTable::fit(
            "OrdinalEncoder",
            &self.categories,
            self.handle_unknown,
            self.input_names.as_deref(),
            data,
        )?;
        Ok(FittedOrdinalEncoder { table })
    }
}

/// Fitted OrdinalEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOrdinalEncoder {
    table: CategoryTable,
}

impl FittedOrdinalEncoder {
    /// Get the categories learned for each feature.
    pub fn categories(&self) -> &[Vec<String>] {
        &self.table.categories
    }

    /// One output name per input column.
    pub fn feature_names(&self) -> Vec<String> {
        self.table.input_names.clone()
    }
}

impl FittedTransformer for FittedOrdinalEncoder {
    type Input = Array2<Option<String>>;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.table.check_width(data)?;

        let mut result = Array2::zeros(data.dim());
        for ((row, col), label) in data.indexed_iter() {
            result[[row, col]] = match self.table.position(col, label.as_deref())? {
                Some(ordinal) => ordinal as f64,
                None => f64::NAN,
            };
        }
        Ok(result)
    }

    fn n_features_in(&self) -> usize {
        self.table.n_features_in()
    }
}
