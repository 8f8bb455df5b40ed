//! Data preprocessing transformers for tabular machine learning.
//!
//! All transformers follow a type-state pattern: an unfitted
//! [`Transformer`] holds hyperparameters, and `fit` returns a separate
//! [`FittedTransformer`] that holds the learned statistics.
//!
//! # Available Transformers
//!
//! ## Imputation
//! - [`SimpleImputer`]: Fill NaN with the column mean, median or most frequent value
//!
//! ## Scaling
//! - [`StandardScaler`]: Z-score normalization
//!
//! ## Encoding
//! - [`OneHotEncoder`]: One indicator column per category, dense or sparse
//! - [`OrdinalEncoder`]: Category position as a number
//!
//! ## Composition
//! - [`Pipeline`]: Chain numeric transformers under step names
//! - [`ColumnTransformer`]: Route named column groups of a
//!   [`Frame`](crate::frame::Frame) to transformers and concatenate the output
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use tabular_prep::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//!
//! let scaler = StandardScaler::new().with_mean(true).with_std(true);
//! let fitted = scaler.fit(&array![[0.0], [2.0]]).unwrap();
//! let scaled = fitted.transform(&array![[4.0]]).unwrap();
//! assert_eq!(scaled[[0, 0]], 3.0);
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod imputation;
pub mod matrix;
pub mod pipeline;
pub mod scaling;
pub mod traits;

// Re-export main types
pub use column_transformer::{
    ColumnTransformer, FittedColumnTransformer, FittedRoute, FittedRouteTransformer, Remainder,
    Route, RouteTransformer, DEFAULT_SPARSE_THRESHOLD,
};
pub use encoding::{
    Categories, CategoricalEncoder, FittedCategoricalEncoder, FittedOneHotEncoder,
    FittedOrdinalEncoder, HandleUnknown, OneHotEncoder, OrdinalEncoder,
};
pub use imputation::{FittedSimpleImputer, ImputeStrategy, SimpleImputer};
pub use matrix::{CsrMatrix, Matrix};
pub use pipeline::{FittedPipeline, FittedStep, Pipeline, PipelineStep};
pub use scaling::{FittedStandardScaler, StandardScaler, StandardScalerConfig};
pub use traits::{FittedTransformer, Transformer};
