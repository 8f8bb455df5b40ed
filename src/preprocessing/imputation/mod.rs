//! Imputation transformers for handling missing values.
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`SimpleImputer`] | Impute with mean, median or most_frequent |

pub mod simple;

pub use simple::{FittedSimpleImputer, ImputeStrategy, SimpleImputer};
