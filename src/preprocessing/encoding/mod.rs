//! Categorical feature encoding transformers.
//!
//! Encoders take a block of category labels (`Array2<Option<String>>`, with
//! `None` marking a missing entry) and turn it into numbers.
//!
//! # Available Encoders
//!
//! ## OneHotEncoder
//! One indicator column per category, dense or sparse.
//!
//! ```text
//! Input:  [["red"], ["green"], ["red"]]   categories: [red, green]
//! Output: [[1, 0], [0, 1], [1, 0]]
//! ```
//!
//! ## OrdinalEncoder
//! Maps each category to its position in the vocabulary (0, 1, 2, ...).
//!
//! # Vocabularies
//!
//! [`Categories::Auto`] learns the sorted distinct labels of each column at
//! fit time. [`Categories::Fixed`] supplies one vocabulary per column up front
//! and keeps its order, which is how the preprocessor builder pins categories
//! to a sample frame.

mod one_hot;
mod ordinal;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder};
pub use ordinal::{FittedOrdinalEncoder, OrdinalEncoder};

use crate::error::PreprocessingError;
use crate::preprocessing::matrix::Matrix;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Strategy for handling unknown categories during fit and transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Fail on unknown or missing categories.
    #[default]
    Error,
    /// Ignore unknown categories (output zeros for one-hot, NaN for ordinal).
    Ignore,
}

/// Where an encoder's per-column vocabularies come from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Categories {
    /// Sorted distinct non-missing labels seen at fit.
    #[default]
    Auto,
    /// One vocabulary per input column, in the given order.
    Fixed(Vec<Vec<String>>),
}

/// Learned vocabularies plus label -> position lookups.
#[derive(Clone, Debug)]
struct CategoryTable {
    input_names: Vec<String>,
    categories: Vec<Vec<String>>,
    positions: Vec<HashMap<String, usize>>,
    handle_unknown: HandleUnknown,
}

impl CategoryTable {
    fn fit(
        encoder: &'static str,
        categories: &Categories,
        handle_unknown: HandleUnknown,
        input_names: Option<&[String]>,
        data: &Array2<Option<String>>,
    ) -> Result<Self, PreprocessingError> {
        let (rows, cols) = data.dim();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(format!(
                "Cannot fit {} on empty data",
                encoder
            )));
        }

        let input_names = match input_names {
            Some(names) if names.len() == cols => names.to_vec(),
            Some(names) => {
                return Err(PreprocessingError::FeatureMismatch {
                    expected_features: names.len(),
                    got_features: cols,
                })
            }
            None => (0..cols).map(|i| format!("x{}", i)).collect(),
        };

        let categories = match categories {
            Categories::Auto => data
                .columns()
                .into_iter()
                .map(|column| {
                    column
                        .iter()
                        .flatten()
                        .cloned()
                        .collect::<BTreeSet<String>>()
                        .into_iter()
                        .collect()
                })
                .collect(),
            Categories::Fixed(fixed) => {
                if fixed.len() != cols {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "{} got {} category lists for {} columns",
                        encoder,
                        fixed.len(),
                        cols
                    )));
                }
                fixed.clone()
            }
        };

        let positions = categories
            .iter()
            .map(|vocab: &Vec<String>| {
                vocab
                    .iter()
                    .enumerate()
                    .map(|(i, label)| (label.clone(), i))
                    .collect()
            })
            .collect();

        let table = Self {
            input_names,
            categories,
            positions,
            handle_unknown,
        };

        // A fixed vocabulary must cover the data it is fitted on.
        if handle_unknown == HandleUnknown::Error {
            for row in data.rows() {
                for (col, label) in row.iter().enumerate() {
                    table.position(col, label.as_deref())?;
                }
            }
        }

        Ok(table)
    }

    fn n_features_in(&self) -> usize {
        self.categories.len()
    }

    fn check_width(&self, data: &Array2<Option<String>>) -> Result<(), PreprocessingError> {
        if data.ncols() != self.n_features_in() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in(),
                got_features: data.ncols(),
            });
        }
        Ok(())
    }

    /// Position of `label` in column `col`'s vocabulary.
    ///
    /// `Ok(None)` for unknown or missing labels under [`HandleUnknown::Ignore`].
    fn position(&self, col: usize, label: Option<&str>) -> Result<Option<usize>, PreprocessingError> {
        let found = label.and_then(|l| self.positions[col].get(l).copied());
        match (found, label, self.handle_unknown) {
            (Some(idx), _, _) => Ok(Some(idx)),
            (None, _, HandleUnknown::Ignore) => Ok(None),
            (None, Some(value), HandleUnknown::Error) => Err(PreprocessingError::UnknownCategory {
                column: self.input_names[col].clone(),
                value: value.to_string(),
            }),
            (None, None, HandleUnknown::Error) => Err(PreprocessingError::MissingValues(
                self.input_names[col].clone(),
            )),
        }
    }
}

/// Either categorical encoder, as one route type for the column router.
#[derive(Clone, Debug)]
pub enum CategoricalEncoder {
    OneHot(OneHotEncoder),
    Ordinal(OrdinalEncoder),
}

impl CategoricalEncoder {
    /// Name input columns so errors and output feature names refer to them.
    pub fn with_input_names(self, names: Vec<String>) -> Self {
        match self {
            CategoricalEncoder::OneHot(e) => CategoricalEncoder::OneHot(e.with_input_names(names)),
            CategoricalEncoder::Ordinal(e) => {
                CategoricalEncoder::Ordinal(e.with_input_names(names))
            }
        }
    }
}

impl Transformer for CategoricalEncoder {
    type Input = Array2<Option<String>>;
    type Output = Matrix;
    type Fitted = FittedCategoricalEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        Ok(match self {
            CategoricalEncoder::OneHot(e) => FittedCategoricalEncoder::OneHot(e.fit(data)?),
            CategoricalEncoder::Ordinal(e) => FittedCategoricalEncoder::Ordinal(e.fit(data)?),
        })
    }
}

/// Fitted counterpart of [`CategoricalEncoder`].
#[derive(Clone, Debug)]
pub enum FittedCategoricalEncoder {
    OneHot(FittedOneHotEncoder),
    Ordinal(FittedOrdinalEncoder),
}

impl FittedCategoricalEncoder {
    /// Output feature names.
    pub fn feature_names(&self) -> Vec<String> {
        match self {
            FittedCategoricalEncoder::OneHot(e) => e.feature_names(),
            FittedCategoricalEncoder::Ordinal(e) => e.feature_names(),
        }
    }

    pub fn categories(&self) -> &[Vec<String>] {
        match self {
            FittedCategoricalEncoder::OneHot(e) => e.categories(),
            FittedCategoricalEncoder::Ordinal(e) => e.categories(),
        }
    }

    /// Whether `transform` returns [`Matrix::Sparse`].
    pub fn is_sparse(&self) -> bool {
        match self {
            FittedCategoricalEncoder::OneHot(e) => e.is_sparse(),
            FittedCategoricalEncoder::Ordinal(_) => false,
        }
    }
}

impl FittedTransformer for FittedCategoricalEncoder {
    type Input = Array2<Option<String>>;
    type Output = Matrix;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        match self {
            FittedCategoricalEncoder::OneHot(e) => e.transform(data),
            FittedCategoricalEncoder::Ordinal(e) => e.transform(data).map(Matrix::Dense),
        }
    }

    fn n_features_in(&self) -> usize {
        match self {
            FittedCategoricalEncoder::OneHot(e) => e.n_features_in(),
            FittedCategoricalEncoder::Ordinal(e) => e.n_features_in(),
        }
    }

    fn n_features_out(&self) -> usize {
        match self {
            FittedCategoricalEncoder::OneHot(e) => e.n_features_out(),
            FittedCategoricalEncoder::Ordinal(e) => e.n_features_out(),
        }
    }
}
