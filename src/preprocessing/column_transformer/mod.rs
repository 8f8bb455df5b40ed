//! ColumnTransformer for applying different transformers to different columns.
//!
//! Routes select columns of a [`Frame`](crate::frame::Frame) by name, and
//! their outputs are concatenated side by side in route order, followed by
//! any passed-through remainder columns.

#[allow(clippy::module_inception)]
mod column_transformer;

pub use column_transformer::{
    ColumnTransformer, FittedColumnTransformer, FittedRoute, FittedRouteTransformer, Remainder,
    Route, RouteTransformer, DEFAULT_SPARSE_THRESHOLD,
};
