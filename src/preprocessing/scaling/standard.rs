//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the population
//! standard deviation. Both ignore NaN, and NaN entries stay NaN on transform.

use crate::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If true, center the data before scaling.
    pub with_mean: bool,
    /// If true, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    pub fn config(&self) -> &StandardScalerConfig {
        &self.config
    }
}

/// Mean and population std of the non-NaN entries of each column.
fn nan_mean_std(data: &Array2<f64>) -> (Array1<f64>, Array1<f64>) {
    let cols = data.ncols();
    let mut mean = Array1::zeros(cols);
    let mut std = Array1::zeros(cols);

    for (col, column) in data.axis_iter(Axis(1)).enumerate() {
        let observed: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
        if observed.is_empty() {
            continue;
        }
        let n = observed.len() as f64;
        let m = observed.iter().sum::<f64>() / n;
        let var = observed.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
        mean[col] = m;
        std[col] = var.sqrt();
    }

    (mean, std)
}

impl Transformer for StandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.dim();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let (mean, std) = nan_mean_std(data);

        let mean = if self.config.with_mean {
            mean
        } else {
            Array1::zeros(cols)
        };

        // Constant features keep their spread instead of dividing by zero.
        let scale = if self.config.with_std {
            std.mapv(|s| if s == 0.0 { 1.0 } else { s })
        } else {
            Array1::ones(cols)
        };

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            scale,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    config: StandardScalerConfig,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl FittedStandardScaler {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Get the per-feature divisor (std, or 1 for constant features).
    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let cols = data.ncols();

        if cols != self.mean.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.mean.len(),
                got_features: cols,
            });
        }

        let mut result = data.clone();
        if self.config.with_mean {
            result -= &self.mean;
        }
        if self.config.with_std {
            result /= &self.scale;
        }
        Ok(result)
    }

    fn n_features_in(&self) -> usize {
        self.mean.len()
    }
}
