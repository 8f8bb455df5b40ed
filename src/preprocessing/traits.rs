//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; holds configuration and learns from data.
//! - [`FittedTransformer`]: After fitting; holds learned statistics and transforms data.
//!
//! The split is a type-state: a plan returned by the builder cannot transform
//! anything until it has been fitted, and fitting never mutates the plan.

use crate::error::PreprocessingError;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use tabular_prep::preprocessing::{FittedTransformer, StandardScaler, Transformer};
///
/// let data = array![[1.0, 10.0], [3.0, 30.0]];
/// let fitted = StandardScaler::new().fit(&data).unwrap();
/// let scaled = fitted.transform(&data).unwrap();
/// assert_eq!(scaled[[0, 0]], -1.0);
/// ```
pub trait Transformer: Clone {
    /// Input data type.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Learn statistics (fill values, mean and std, categories) from `data`.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the data is empty, has the wrong
    /// shape, or contains values the transformer cannot accept.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
pub trait FittedTransformer: Clone {
    /// Input data type.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the input doesn't match the number of
    /// features seen during fit or contains values that cannot be transformed.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Number of features produced by `transform`.
    fn n_features_out(&self) -> usize {
        self.n_features_in()
    }
}
