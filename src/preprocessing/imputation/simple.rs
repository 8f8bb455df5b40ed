//! Simple Imputer.
//!
//! Imputation transformer for completing missing values.
//! Supports mean, median and most_frequent strategies.
//!
//! Note: This implementation treats NaN as missing values.
//!
//! # Example
//! ```rust
//! use ndarray::array;
//! use tabular_prep::preprocessing::{FittedTransformer, ImputeStrategy, SimpleImputer, Transformer};
//!
//! let data = array![[1.0], [f64::NAN], [3.0]];
//! let fitted = SimpleImputer::new(ImputeStrategy::Mean).fit(&data).unwrap();
//! let imputed = fitted.transform(&data).unwrap();
//! assert_eq!(imputed[[1, 0]], 2.0);
//! ```

use crate::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, ArrayView1, Zip};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Strategy for imputing missing values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    /// Replace missing values with the mean of each column.
    Mean,
    /// Replace missing values with the median of each column.
    #[default]
    Median,
    /// Replace missing values with the most frequent value of each column.
    MostFrequent,
}

impl ImputeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImputeStrategy::Mean => "mean",
            ImputeStrategy::Median => "median",
            ImputeStrategy::MostFrequent => "most_frequent",
        }
    }
}

impl fmt::Display for ImputeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImputeStrategy {
    type Err = PreprocessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(ImputeStrategy::Mean),
            "median" => Ok(ImputeStrategy::Median),
            "most_frequent" => Ok(ImputeStrategy::MostFrequent),
            other => Err(PreprocessingError::InvalidParameter(format!(
                "strategy must be one of mean, median, most_frequent; got '{}'",
                other
            ))),
        }
    }
}

/// SimpleImputer transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
}

impl SimpleImputer {
    /// Create a new SimpleImputer with the specified strategy.
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }
}

/// Fill value for one column, ignoring NaN. `None` when every entry is missing.
fn column_statistic(column: ArrayView1<'_, f64>, strategy: ImputeStrategy) -> Option<f64> {
    let mut observed: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
    if observed.is_empty() {
        return None;
    }

    let stat = match strategy {
        ImputeStrategy::Mean => observed.iter().sum::<f64>() / observed.len() as f64,
        ImputeStrategy::Median => {
            observed.sort_by(f64::total_cmp);
            let n = observed.len();
            if n % 2 == 0 {
                (observed[n / 2 - 1] + observed[n / 2]) / 2.0
            } else {
                observed[n / 2]
            }
        }
        ImputeStrategy::MostFrequent => {
            let mut counts: HashMap<u64, usize> = HashMap::new();
            for &v in &observed {
                // Fold -0.0 into 0.0 so both count as one value.
                *counts.entry((v + 0.0).to_bits()).or_insert(0) += 1;
            }
            // Ties go to the smallest value.
            counts
                .into_iter()
                .map(|(bits, count)| (f64::from_bits(bits), count))
                .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.total_cmp(va)))
                .map(|(value, _)| value)?
        }
    };
    Some(stat)
}

impl Transformer for SimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Fitted = FittedSimpleImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.dim();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit SimpleImputer on empty data".to_string(),
            ));
        }

        let mut statistics = Array1::zeros(cols);
        for (col, column) in data.columns().into_iter().enumerate() {
            statistics[col] = match column_statistic(column, self.strategy) {
                Some(stat) => stat,
                None => {
                    tracing::warn!(
                        column = col,
                        strategy = %self.strategy,
                        "all values missing during imputer fit; filling with 0"
                    );
                    0.0
                }
            };
        }

        Ok(FittedSimpleImputer {
            strategy: self.strategy,
            statistics,
        })
    }
}

/// Fitted SimpleImputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedSimpleImputer {
    strategy: ImputeStrategy,
    statistics: Array1<f64>,
}

impl FittedSimpleImputer {
    /// Get the imputation statistics (fill values) for each feature.
    pub fn statistics(&self) -> &Array1<f64> {
        &self.statistics
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }
}

impl FittedTransformer for FittedSimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let cols = data.ncols();

        if cols != self.statistics.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.statistics.len(),
                got_features: cols,
            });
        }

        let mut result = data.clone();
        for mut row in result.rows_mut() {
            Zip::from(&mut row)
                .and(&self.statistics)
                .for_each(|value, &fill| {
                    if value.is_nan() {
                        *value = fill;
                    }
                });
        }
        Ok(result)
    }

    fn n_features_in(&self) -> usize {
        self.statistics.len()
    }
}
