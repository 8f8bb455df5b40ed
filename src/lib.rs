//! # tabular-prep
//!
//! Declarative preprocessing plans for tabular machine-learning datasets.
//!
//! Given a sample [`Frame`](frame::Frame) and three lists of column names
//! (numeric, binary, categorical), [`make_preprocessor`] returns an unfitted
//! [`ColumnTransformer`](preprocessing::ColumnTransformer) that:
//!
//! - imputes and standardizes numeric columns,
//! - imputes binary columns,
//! - one-hot or ordinal encodes categorical columns against the categories
//!   present in the sample,
//!
//! together with the number of features the plan will output.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: plans and transformers are unfitted
//!   [`Transformer`](preprocessing::Transformer)s; `fit` returns a distinct
//!   [`FittedTransformer`](preprocessing::FittedTransformer) type, so nothing
//!   can transform data before it has been fitted.
//! - **Closed option sets**: strategies, encodings and remainder policies are
//!   enums, parsed from strings with `FromStr` or serde.
//! - **Dense or sparse output**: one-hot blocks may be emitted as CSR
//!   matrices, see [`Matrix`](preprocessing::Matrix).
//!
//! ## Quick Start
//!
//! ```rust
//! use tabular_prep::frame::{Column, Frame};
//! use tabular_prep::preprocessing::{FittedTransformer, Transformer};
//! use tabular_prep::{make_preprocessor, FeatureColumns, PreprocessorConfig};
//!
//! let train = Frame::from_columns(vec![
//!     ("age", Column::numeric(vec![22.0, f64::NAN, 26.0])),
//!     ("alone", Column::numeric(vec![0.0, 1.0, f64::NAN])),
//!     ("class", Column::text(vec![Some("first"), Some("third"), Some("third")])),
//! ])
//! .unwrap();
//!
//! let features = FeatureColumns::new()
//!     .with_numeric(["age"])
//!     .with_binary(["alone"])
//!     .with_categorical(["class"]);
//!
//! let (plan, n_features) =
//!     make_preprocessor(&train, &features, &PreprocessorConfig::default()).unwrap();
//! assert_eq!(n_features, 4);
//!
//! let fitted = plan.fit(&train).unwrap();
//! let encoded = fitted.transform(&train).unwrap();
//! assert_eq!(encoded.shape(), (3, n_features));
//! ```
//!
//! ## Modules
//!
//! - [`builder`]: feature lists, configuration and the plan builder.
//! - [`frame`]: the named-column input container, with CSV loading.
//! - [`preprocessing`]: imputers, scalers, encoders, pipelines and the
//!   column router.
//! - [`error`]: the crate-wide error type.

pub mod builder;
pub mod error;
pub mod frame;
pub mod preprocessing;

pub use builder::{
    build_preprocessor, make_preprocessor, CatTransform, CategoryVocabulary, FeatureColumns,
    PreprocessorBuilder, PreprocessorConfig,
};
pub use error::PreprocessingError;
pub use frame::{Column, Frame};
