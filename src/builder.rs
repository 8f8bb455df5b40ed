//! Preprocessor builder: turns feature lists and a sample frame into a
//! [`ColumnTransformer`] plan.
//!
//! The plan has up to three routes, applied in this order:
//!
//! | Route | Columns | Transformer |
//! |-------|---------|-------------|
//! | `num` | numeric | impute (configured strategy), then standard-scale |
//! | `bin` | binary | impute (configured strategy) |
//! | `cat` | categorical | one-hot or ordinal encode over the sample's categories |
//!
//! Columns named in no list are dropped or passed through according to
//! [`Remainder`].
//!
//! # Example
//!
//! ```rust
//! use tabular_prep::builder::{make_preprocessor, FeatureColumns, PreprocessorConfig};
//! use tabular_prep::frame::{Column, Frame};
//!
//! let sample = Frame::from_columns(vec![
//!     ("age", Column::numeric(vec![22.0, 38.0, f64::NAN])),
//!     ("embarked", Column::text(vec![Some("S"), Some("C"), Some("Q")])),
//! ])
//! .unwrap();
//!
//! let features = FeatureColumns::new()
//!     .with_numeric(["age"])
//!     .with_categorical(["embarked"]);
//!
//! let (plan, n_features) =
//!     make_preprocessor(&sample, &features, &PreprocessorConfig::default()).unwrap();
//! assert_eq!(n_features, 4);
//! assert_eq!(plan.routes().len(), 3);
//! ```

use crate::error::PreprocessingError;
use crate::frame::Frame;
use crate::preprocessing::{
    Categories, CategoricalEncoder, ColumnTransformer, HandleUnknown, ImputeStrategy,
    OneHotEncoder, OrdinalEncoder, Pipeline, Remainder, SimpleImputer, StandardScaler,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Route name for numeric columns.
pub const NUMERIC_ROUTE: &str = "num";
/// Route name for binary columns.
pub const BINARY_ROUTE: &str = "bin";
/// Route name for categorical columns.
pub const CATEGORICAL_ROUTE: &str = "cat";

/// Column names per feature group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureColumns {
    /// Continuous columns: imputed, then standardized.
    pub numeric: Vec<String>,
    /// 0/1 columns: imputed only.
    pub binary: Vec<String>,
    /// Columns encoded against the sample's categories.
    pub categorical: Vec<String>,
}

fn to_strings<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).collect()
}

impl FeatureColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric = to_strings(columns);
        self
    }

    pub fn with_binary<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binary = to_strings(columns);
        self
    }

    pub fn with_categorical<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical = to_strings(columns);
        self
    }

    /// Total number of listed columns.
    pub fn len(&self) -> usize {
        self.numeric.len() + self.binary.len() + self.categorical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Each column may appear at most once across all three lists.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        let groups: [(&'static str, &[String]); 3] = [
            ("numeric", self.numeric.as_slice()),
            ("binary", self.binary.as_slice()),
            ("categorical", self.categorical.as_slice()),
        ];
        let mut seen: HashMap<&str, &'static str> = HashMap::new();
        for (group, columns) in groups {
            for column in columns {
                if let Some(first) = seen.insert(column.as_str(), group) {
                    return Err(PreprocessingError::OverlappingFeatures {
                        column: column.clone(),
                        first,
                        second: group,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Encoding applied to categorical columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatTransform {
    /// One-hot encoding.
    #[default]
    #[serde(rename = "ohe")]
    OneHot,
    /// Ordinal encoding.
    #[serde(rename = "ord")]
    Ordinal,
}

impl CatTransform {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatTransform::OneHot => "ohe",
            CatTransform::Ordinal => "ord",
        }
    }
}

impl fmt::Display for CatTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatTransform {
    type Err = PreprocessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ohe" => Ok(CatTransform::OneHot),
            "ord" => Ok(CatTransform::Ordinal),
            other => Err(PreprocessingError::InvalidParameter(format!(
                "cat_transform must be 'ohe' or 'ord'; got '{}'",
                other
            ))),
        }
    }
}

/// Options for [`make_preprocessor`].
///
/// Deserializes from JSON with every field optional:
///
/// ```rust
/// use tabular_prep::builder::{CatTransform, PreprocessorConfig};
///
/// let config = PreprocessorConfig::from_json(r#"{"cat_transform": "ord"}"#).unwrap();
/// assert_eq!(config.cat_transform, CatTransform::Ordinal);
/// assert!(config.sparse);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessorConfig {
    /// Imputation strategy for the numeric and binary routes.
    pub strategy: ImputeStrategy,
    /// Encoding for the categorical route.
    pub cat_transform: CatTransform,
    /// Handling of columns in no feature list.
    pub remainder: Remainder,
    /// Sparse one-hot output.
    pub sparse: bool,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            strategy: ImputeStrategy::Median,
            cat_transform: CatTransform::OneHot,
            remainder: Remainder::Passthrough,
            sparse: true,
        }
    }
}

impl PreprocessorConfig {
    /// Parse a JSON object. Missing fields take their defaults; unknown
    /// fields and unrecognized option strings are rejected.
    pub fn from_json(json: &str) -> Result<Self, PreprocessingError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_strategy(mut self, strategy: ImputeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_cat_transform(mut self, cat_transform: CatTransform) -> Self {
        self.cat_transform = cat_transform;
        self
    }

    pub fn with_remainder(mut self, remainder: Remainder) -> Self {
        self.remainder = remainder;
        self
    }

    pub fn with_sparse(mut self, sparse: bool) -> Self {
        self.sparse = sparse;
        self
    }
}

/// Distinct non-missing values of each categorical column, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryVocabulary {
    columns: Vec<String>,
    categories: Vec<Vec<String>>,
}

impl CategoryVocabulary {
    /// Read the vocabulary of every column in `columns` from `sample`.
    ///
    /// # Errors
    /// [`PreprocessingError::ColumnNotFound`] if a column is absent.
    pub fn from_sample(sample: &Frame, columns: &[String]) -> Result<Self, PreprocessingError> {
        let categories = columns
            .iter()
            .map(|column| sample.unique(column))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            columns: columns.to_vec(),
            categories,
        })
    }

    /// Categories of one column.
    pub fn get(&self, column: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.categories[idx].as_slice())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    /// Sum of category counts over all columns.
    pub fn total_categories(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn to_fixed(&self) -> Categories {
        Categories::Fixed(self.categories.clone())
    }
}

/// Reject sample columns the plan could not fit.
///
/// Categorical columns must be complete, since their vocabulary is fixed from
/// the sample with unknown values rejected. Under [`Remainder::Passthrough`]
/// every unlisted column must be numeric.
fn check_sample(
    sample: &Frame,
    features: &FeatureColumns,
    config: &PreprocessorConfig,
) -> Result<(), PreprocessingError> {
    for name in &features.categorical {
        if sample.require_column(name)?.has_missing() {
            return Err(PreprocessingError::MissingValues(name.clone()));
        }
    }

    if config.remainder == Remainder::Passthrough {
        let listed: HashSet<&str> = features
            .numeric
            .iter()
            .chain(&features.binary)
            .chain(&features.categorical)
            .map(String::as_str)
            .collect();
        for name in sample.column_names() {
            if listed.contains(name.as_str()) {
                continue;
            }
            if let Some(column) = sample.column(name) {
                if !column.is_numeric() {
                    return Err(PreprocessingError::NotNumeric(name.clone()));
                }
            }
        }
    }
    Ok(())
}

/// Build the preprocessing plan and its output feature count.
///
/// The count is `numeric + binary + categorical_count`, where
/// `categorical_count` is the total number of sample categories for one-hot
/// encoding and the number of categorical columns for ordinal encoding.
/// Passed-through remainder columns are not counted.
///
/// # Errors
/// - [`PreprocessingError::OverlappingFeatures`] if a column is listed twice.
/// - [`PreprocessingError::ColumnNotFound`] if a categorical column is
///   missing from `sample`.
/// - [`PreprocessingError::MissingValues`] if a categorical column has a
///   missing entry in `sample`.
/// - [`PreprocessingError::NotNumeric`] if the remainder is passed through
///   and an unlisted column of `sample` holds text.
pub fn make_preprocessor(
    sample: &Frame,
    features: &FeatureColumns,
    config: &PreprocessorConfig,
) -> Result<(ColumnTransformer, usize), PreprocessingError> {
    features.validate()?;

    let numeric_pipeline = Pipeline::new()
        .add_simple_imputer(SimpleImputer::new(config.strategy))
        .add_standard_scaler(StandardScaler::new());
    let binary_pipeline = Pipeline::new().add_simple_imputer(SimpleImputer::new(config.strategy));

    let vocabulary = CategoryVocabulary::from_sample(sample, &features.categorical)?;
    check_sample(sample, features, config)?;
    let (encoder, categorical_count) = match config.cat_transform {
        CatTransform::OneHot => (
            CategoricalEncoder::OneHot(
                OneHotEncoder::new()
                    .with_categories(vocabulary.to_fixed())
                    .with_handle_unknown(HandleUnknown::Error)
                    .with_sparse(config.sparse),
            ),
            vocabulary.total_categories(),
        ),
        CatTransform::Ordinal => (
            CategoricalEncoder::Ordinal(
                OrdinalEncoder::new()
                    .with_categories(vocabulary.to_fixed())
                    .with_handle_unknown(HandleUnknown::Error),
            ),
            features.categorical.len(),
        ),
    };

    let plan = ColumnTransformer::new(config.remainder)
        .add_numeric(NUMERIC_ROUTE, numeric_pipeline, features.numeric.clone())
        .add_numeric(BINARY_ROUTE, binary_pipeline, features.binary.clone())
        .add_categorical(CATEGORICAL_ROUTE, encoder, features.categorical.clone());

    let n_features = features.numeric.len() + features.binary.len() + categorical_count;

    tracing::debug!(
        numeric = features.numeric.len(),
        binary = features.binary.len(),
        categorical = features.categorical.len(),
        strategy = %config.strategy,
        cat_transform = %config.cat_transform,
        remainder = %config.remainder,
        sparse = config.sparse,
        n_features,
        "built preprocessor"
    );

    Ok((plan, n_features))
}

/// Build the preprocessing plan without the feature count.
pub fn build_preprocessor(
    sample: &Frame,
    features: &FeatureColumns,
    config: &PreprocessorConfig,
) -> Result<ColumnTransformer, PreprocessingError> {
    make_preprocessor(sample, features, config).map(|(plan, _)| plan)
}

/// Fluent form of [`make_preprocessor`].
///
/// ```rust
/// use tabular_prep::builder::{CatTransform, FeatureColumns, PreprocessorBuilder};
/// use tabular_prep::frame::{Column, Frame};
/// use tabular_prep::preprocessing::{ImputeStrategy, Remainder};
///
/// let sample = Frame::from_columns(vec![
///     ("sex", Column::text(vec![Some("m"), Some("f")])),
/// ])
/// .unwrap();
///
/// let (_, n_features) = PreprocessorBuilder::new(FeatureColumns::new().with_categorical(["sex"]))
///     .strategy(ImputeStrategy::MostFrequent)
///     .cat_transform(CatTransform::Ordinal)
///     .remainder(Remainder::Drop)
///     .build(&sample)
///     .unwrap();
/// assert_eq!(n_features, 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PreprocessorBuilder {
    features: FeatureColumns,
    config: PreprocessorConfig,
}

impl PreprocessorBuilder {
    pub fn new(features: FeatureColumns) -> Self {
        Self {
            features,
            config: PreprocessorConfig::default(),
        }
    }

    /// Replace every option at once.
    pub fn config(mut self, config: PreprocessorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strategy(mut self, strategy: ImputeStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn cat_transform(mut self, cat_transform: CatTransform) -> Self {
        self.config.cat_transform = cat_transform;
        self
    }

    pub fn remainder(mut self, remainder: Remainder) -> Self {
        self.config.remainder = remainder;
        self
    }

    pub fn sparse(mut self, sparse: bool) -> Self {
        self.config.sparse = sparse;
        self
    }

    pub fn build(&self, sample: &Frame) -> Result<(ColumnTransformer, usize), PreprocessingError> {
        make_preprocessor(sample, &self.features, &self.config)
    }
}
