//! Pipeline utilities for chaining numeric transformers.
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use tabular_prep::preprocessing::pipeline::Pipeline;
//! use tabular_prep::preprocessing::{
//!     FittedTransformer, ImputeStrategy, SimpleImputer, StandardScaler, Transformer,
//! };
//!
//! let pipeline = Pipeline::new()
//!     .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Median))
//!     .add_standard_scaler(StandardScaler::new());
//!
//! let data = array![[1.0], [f64::NAN], [3.0]];
//! let fitted = pipeline.fit(&data).unwrap();
//! assert_eq!(fitted.step_names(), vec!["imputer", "scaler"]);
//! assert_eq!(fitted.transform(&data).unwrap()[[1, 0]], 0.0);
//! ```

#[allow(clippy::module_inception)]
pub mod pipeline;

pub use pipeline::{FittedPipeline, FittedStep, Pipeline, PipelineStep};
