//! ColumnTransformer implementation.
//!
//! Applies different transformers to different named column groups of a
//! [`Frame`] and concatenates the results.

use crate::error::PreprocessingError;
use crate::frame::Frame;
use crate::preprocessing::encoding::{CategoricalEncoder, FittedCategoricalEncoder};
use crate::preprocessing::matrix::Matrix;
use crate::preprocessing::pipeline::{FittedPipeline, Pipeline};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Overall density below which output stays sparse.
pub const DEFAULT_SPARSE_THRESHOLD: f64 = 0.3;

/// What happens to frame columns no route selects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remainder {
    /// Leave them out of the output.
    #[default]
    Drop,
    /// Append them unchanged after the routed blocks.
    Passthrough,
}

impl Remainder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Remainder::Drop => "drop",
            Remainder::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for Remainder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Remainder {
    type Err = PreprocessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(Remainder::Drop),
            "passthrough" => Ok(Remainder::Passthrough),
            other => Err(PreprocessingError::InvalidParameter(format!(
                "remainder must be 'drop' or 'passthrough'; got '{}'",
                other
            ))),
        }
    }
}

/// Transformer applied by one route.
#[derive(Clone, Debug)]
pub enum RouteTransformer {
    /// Imputation and scaling over numeric columns.
    Numeric(Pipeline),
    /// One-hot or ordinal encoding over category labels.
    Categorical(CategoricalEncoder),
}

impl RouteTransformer {
    fn kind(&self) -> &'static str {
        match self {
            RouteTransformer::Numeric(_) => "Pipeline",
            RouteTransformer::Categorical(CategoricalEncoder::OneHot(_)) => "OneHotEncoder",
            RouteTransformer::Categorical(CategoricalEncoder::Ordinal(_)) => "OrdinalEncoder",
        }
    }
}

/// A named transformer bound to a list of column names.
#[derive(Clone, Debug)]
pub struct Route {
    name: String,
    columns: Vec<String>,
    transformer: RouteTransformer,
}

impl Route {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn transformer(&self) -> &RouteTransformer {
        &self.transformer
    }

    fn fit(&self, frame: &Frame) -> Result<(FittedRoute, Matrix), PreprocessingError> {
        let (transformer, output) = match &self.transformer {
            RouteTransformer::Numeric(pipeline) => {
                let block = frame.numeric_block(&self.columns)?;
                let fitted = pipeline.fit(&block)?;
                let output = Matrix::Dense(fitted.transform(&block)?);
                (FittedRouteTransformer::Numeric(fitted), output)
            }
            RouteTransformer::Categorical(encoder) => {
                let block = frame.label_block(&self.columns)?;
                let fitted = encoder
                    .clone()
                    .with_input_names(self.columns.clone())
                    .fit(&block)?;
                let output = fitted.transform(&block)?;
                (FittedRouteTransformer::Categorical(fitted), output)
            }
        };
        let route = FittedRoute {
            name: self.name.clone(),
            columns: self.columns.clone(),
            transformer,
        };
        Ok((route, output))
    }
}

/// ColumnTransformer applies different transformers to different columns.
///
/// Routes run in the order they were added. Routes with no columns are
/// skipped and contribute nothing to the output.
///
/// # Example
/// ```rust
/// use tabular_prep::frame::{Column, Frame};
/// use tabular_prep::preprocessing::{
///     CategoricalEncoder, ColumnTransformer, FittedTransformer, OneHotEncoder, Pipeline,
///     Remainder, StandardScaler, Transformer,
/// };
///
/// let frame = Frame::from_columns(vec![
///     ("age", Column::numeric(vec![20.0, 40.0])),
///     ("city", Column::text(vec![Some("Oslo"), Some("Rome")])),
/// ])
/// .unwrap();
///
/// let plan = ColumnTransformer::new(Remainder::Drop)
///     .add_numeric(
///         "num",
///         Pipeline::new().add_standard_scaler(StandardScaler::new()),
///         vec!["age".to_string()],
///     )
///     .add_categorical(
///         "cat",
///         CategoricalEncoder::OneHot(OneHotEncoder::new().with_sparse(false)),
///         vec!["city".to_string()],
///     );
///
/// let fitted = plan.fit(&frame).unwrap();
/// assert_eq!(fitted.feature_names_out(), vec!["num__age", "cat__city_Oslo", "cat__city_Rome"]);
/// assert_eq!(fitted.transform(&frame).unwrap().shape(), (2, 3));
/// ```
#[derive(Clone, Debug)]
pub struct ColumnTransformer {
    routes: Vec<Route>,
    remainder: Remainder,
    sparse_threshold: f64,
}

impl Default for ColumnTransformer {
    fn default() -> Self {
        Self::new(Remainder::default())
    }
}

impl ColumnTransformer {
    /// Create a new ColumnTransformer with no routes.
    pub fn new(remainder: Remainder) -> Self {
        Self {
            routes: Vec::new(),
            remainder,
            sparse_threshold: DEFAULT_SPARSE_THRESHOLD,
        }
    }

    /// Add a numeric pipeline for the named columns.
    pub fn add_numeric(
        self,
        name: impl Into<String>,
        pipeline: Pipeline,
        columns: Vec<String>,
    ) -> Self {
        self.add_route(name, RouteTransformer::Numeric(pipeline), columns)
    }

    /// Add a categorical encoder for the named columns.
    pub fn add_categorical(
        self,
        name: impl Into<String>,
        encoder: CategoricalEncoder,
        columns: Vec<String>,
    ) -> Self {
        self.add_route(name, RouteTransformer::Categorical(encoder), columns)
    }

    pub fn add_route(
        mut self,
        name: impl Into<String>,
        transformer: RouteTransformer,
        columns: Vec<String>,
    ) -> Self {
        self.routes.push(Route {
            name: name.into(),
            columns,
            transformer,
        });
        self
    }

    pub fn with_remainder(mut self, remainder: Remainder) -> Self {
        self.remainder = remainder;
        self
    }

    /// Density cutoff in `[0, 1]` for sparse output. `0.0` always yields dense.
    pub fn with_sparse_threshold(mut self, threshold: f64) -> Self {
        self.sparse_threshold = threshold;
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn remainder(&self) -> Remainder {
        self.remainder
    }

    pub fn sparse_threshold(&self) -> f64 {
        self.sparse_threshold
    }

    /// Every column selected by some route, in route order.
    pub fn routed_columns(&self) -> Vec<&str> {
        self.routes
            .iter()
            .flat_map(|r| r.columns.iter().map(String::as_str))
            .collect()
    }

    /// Get the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn validate(&self) -> Result<(), PreprocessingError> {
        if !(0.0..=1.0).contains(&self.sparse_threshold) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "sparse_threshold must be in [0, 1]; got {}",
                self.sparse_threshold
            )));
        }

        let mut names = HashSet::new();
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for route in &self.routes {
            if route.name == "remainder" || !names.insert(route.name.as_str()) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "route name '{}' is reserved or already used",
                    route.name
                )));
            }
            for column in &route.columns {
                if let Some(owner) = owners.insert(column.as_str(), route.name.as_str()) {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "column '{}' is selected by both '{}' and '{}'",
                        column, owner, route.name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Transformer for ColumnTransformer {
    type Input = Frame;
    type Output = Matrix;
    type Fitted = FittedColumnTransformer;

    fn fit(&self, frame: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        self.validate()?;

        let rows = frame.n_rows();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit ColumnTransformer on empty data".to_string(),
            ));
        }

        let mut routes = Vec::with_capacity(self.routes.len());
        let mut any_sparse = false;
        let mut stored = 0usize;
        let mut n_features_out = 0usize;

        for route in self.routes.iter().filter(|r| !r.columns.is_empty()) {
            let (fitted, output) = route.fit(frame)?;
            tracing::debug!(
                route = %route.name,
                transformer = route.transformer.kind(),
                columns = route.columns.len(),
                features_out = output.ncols(),
                "fitted route"
            );
            any_sparse |= output.is_sparse();
            stored += output.stored_len();
            n_features_out += output.ncols();
            routes.push(fitted);
        }

        let routed: HashSet<&str> = self.routed_columns().into_iter().collect();
        let remainder_columns: Vec<String> = frame
            .column_names()
            .iter()
            .filter(|name| !routed.contains(name.as_str()))
            .cloned()
            .collect();

        if self.remainder == Remainder::Passthrough {
            // Surfaces NotNumeric for text leftovers now rather than at transform.
            let block = frame.numeric_block(&remainder_columns)?;
            stored += block.len();
            n_features_out += block.ncols();
        }

        let cells = rows * n_features_out;
        let density = if cells == 0 {
            0.0
        } else {
            stored as f64 / cells as f64
        };
        let sparse_output = any_sparse && cells > 0 && density < self.sparse_threshold;

        tracing::debug!(
            routes = routes.len(),
            remainder = %self.remainder,
            remainder_columns = remainder_columns.len(),
            features_out = n_features_out,
            density,
            sparse_output,
            "fitted column transformer"
        );

        Ok(FittedColumnTransformer {
            routes,
            remainder: self.remainder,
            remainder_columns,
            feature_names_in: frame.column_names().to_vec(),
            sparse_output,
        })
    }
}

/// Fitted counterpart of [`RouteTransformer`].
#[derive(Clone, Debug)]
pub enum FittedRouteTransformer {
    Numeric(FittedPipeline),
    Categorical(FittedCategoricalEncoder),
}

impl FittedRouteTransformer {
    fn transform(&self, frame: &Frame, columns: &[String]) -> Result<Matrix, PreprocessingError> {
        match self {
            FittedRouteTransformer::Numeric(pipeline) => {
                let block = frame.numeric_block(columns)?;
                pipeline.transform(&block).map(Matrix::Dense)
            }
            FittedRouteTransformer::Categorical(encoder) => {
                let block = frame.label_block(columns)?;
                encoder.transform(&block)
            }
        }
    }

    fn n_features_out(&self) -> usize {
        match self {
            FittedRouteTransformer::Numeric(t) => t.n_features_out(),
            FittedRouteTransformer::Categorical(t) => t.n_features_out(),
        }
    }
}

/// A fitted route: name, columns and fitted transformer.
#[derive(Clone, Debug)]
pub struct FittedRoute {
    name: String,
    columns: Vec<String>,
    transformer: FittedRouteTransformer,
}

impl FittedRoute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn transformer(&self) -> &FittedRouteTransformer {
        &self.transformer
    }

    /// Output names prefixed with `{route}__`.
    fn feature_names(&self) -> Vec<String> {
        let names = match &self.transformer {
            FittedRouteTransformer::Numeric(_) => self.columns.clone(),
            FittedRouteTransformer::Categorical(encoder) => encoder.feature_names(),
        };
        names
            .into_iter()
            .map(|n| format!("{}__{}", self.name, n))
            .collect()
    }
}

/// Fitted ColumnTransformer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedColumnTransformer {
    routes: Vec<FittedRoute>,
    remainder: Remainder,
    remainder_columns: Vec<String>,
    feature_names_in: Vec<String>,
    sparse_output: bool,
}

impl FittedColumnTransformer {
    /// Fitted routes that produce output, in output order.
    pub fn routes(&self) -> &[FittedRoute] {
        &self.routes
    }

    pub fn route(&self, name: &str) -> Option<&FittedRoute> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Columns no route selected, in frame order at fit time.
    pub fn remainder_columns(&self) -> &[String] {
        &self.remainder_columns
    }

    pub fn remainder(&self) -> Remainder {
        self.remainder
    }

    /// Column names of the frame seen during fit.
    pub fn feature_names_in(&self) -> &[String] {
        &self.feature_names_in
    }

    /// Whether `transform` returns [`Matrix::Sparse`].
    pub fn is_sparse_output(&self) -> bool {
        self.sparse_output
    }

    /// Output column names: `{route}__{feature}`, then `remainder__{column}`.
    pub fn feature_names_out(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .routes
            .iter()
            .flat_map(FittedRoute::feature_names)
            .collect();
        if self.remainder == Remainder::Passthrough {
            names.extend(
                self.remainder_columns
                    .iter()
                    .map(|c| format!("remainder__{}", c)),
            );
        }
        names
    }
}

impl FittedTransformer for FittedColumnTransformer {
    type Input = Frame;
    type Output = Matrix;

    fn transform(&self, frame: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let mut blocks = Vec::with_capacity(self.routes.len() + 1);
        for route in &self.routes {
            blocks.push(route.transformer.transform(frame, &route.columns)?);
        }
        if self.remainder == Remainder::Passthrough && !self.remainder_columns.is_empty() {
            blocks.push(Matrix::Dense(frame.numeric_block(&self.remainder_columns)?));
        }

        let output = Matrix::hstack(frame.n_rows(), blocks, self.sparse_output)?;
        tracing::debug!(
            rows = output.nrows(),
            features_out = output.ncols(),
            sparse = output.is_sparse(),
            "transformed frame"
        );
        Ok(output)
    }

    fn n_features_in(&self) -> usize {
        self.feature_names_in.len()
    }

    fn n_features_out(&self) -> usize {
        let routed: usize = self.routes.iter().map(|r| r.transformer.n_features_out()).sum();
        match self.remainder {
            Remainder::Drop => routed,
            Remainder::Passthrough => routed + self.remainder_columns.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Column;
    use crate::preprocessing::encoding::{OneHotEncoder, OrdinalEncoder};
    use crate::preprocessing::imputation::{ImputeStrategy, SimpleImputer};
    use crate::preprocessing::scaling::StandardScaler;
    use ndarray::array;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_frame() -> Frame {
        Frame::from_columns(vec![
            ("age", Column::numeric(vec![10.0, f64::NAN, 30.0, 40.0])),
            ("city", Column::text(vec![Some("a"), Some("b"), Some("a"), Some("c")])),
            ("extra", Column::numeric(vec![1.0, 2.0, 3.0, 4.0])),
        ])
        .unwrap()
    }

    fn plan(remainder: Remainder, sparse: bool) -> ColumnTransformer {
        ColumnTransformer::new(remainder)
            .add_numeric(
                "num",
                Pipeline::new()
                    .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Mean))
                    .add_standard_scaler(StandardScaler::new()),
                cols(&["age"]),
            )
            .add_categorical(
                "cat",
                CategoricalEncoder::OneHot(OneHotEncoder::new().with_sparse(sparse)),
                cols(&["city"]),
            )
    }

    #[test]
    fn test_remainder_from_str() {
        assert_eq!("drop".parse::<Remainder>().unwrap(), Remainder::Drop);
        assert_eq!(
            "passthrough".parse::<Remainder>().unwrap(),
            Remainder::Passthrough
        );
        assert!(matches!(
            "keep".parse::<Remainder>(),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_column_transformer_drop() {
        let frame = sample_frame();
        let fitted = plan(Remainder::Drop, false).fit(&frame).unwrap();

        assert_eq!(fitted.remainder_columns(), &["extra"]);
        assert_eq!(fitted.n_features_in(), 3);
        assert_eq!(fitted.n_features_out(), 4);
        assert_eq!(
            fitted.feature_names_out(),
            vec!["num__age", "cat__city_a", "cat__city_b", "cat__city_c"]
        );

        let out = fitted.transform(&frame).unwrap();
        assert!(!out.is_sparse());
        assert_eq!(out.shape(), (4, 4));
        // Mean-imputed entry scales to zero
        assert!(out.get(1, 0).abs() < 1e-12);
        assert_eq!(out.get(3, 3), 1.0);
    }

    #[test]
    fn test_column_transformer_passthrough() {
        let frame = sample_frame();
        let fitted = plan(Remainder::Passthrough, false).fit(&frame).unwrap();

        assert_eq!(fitted.n_features_out(), 5);
        assert_eq!(
            fitted.feature_names_out().last().map(String::as_str),
            Some("remainder__extra")
        );

        let out = fitted.transform(&frame).unwrap().into_dense();
        assert_eq!(out.column(4).to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_passthrough_rejects_text_remainder() {
        let frame = sample_frame()
            .with_column("name", Column::text(vec![Some("x"); 4]))
            .unwrap();
        assert!(matches!(
            plan(Remainder::Passthrough, false).fit(&frame),
            Err(PreprocessingError::NotNumeric(name)) if name == "name"
        ));
        assert!(plan(Remainder::Drop, false).fit(&frame).is_ok());
    }

    #[test]
    fn test_sparse_output_below_threshold() {
        let frame = Frame::from_columns(vec![(
            "city",
            Column::text(vec![Some("a"), Some("b"), Some("c"), Some("d")]),
        )])
        .unwrap();
        let plan = ColumnTransformer::new(Remainder::Drop).add_categorical(
            "cat",
            CategoricalEncoder::OneHot(OneHotEncoder::new()),
            cols(&["city"]),
        );

        // Density 4 / 16 = 0.25 < 0.3
        let fitted = plan.clone().fit(&frame).unwrap();
        assert!(fitted.is_sparse_output());
        assert!(fitted.transform(&frame).unwrap().is_sparse());

        let dense = plan.with_sparse_threshold(0.0).fit(&frame).unwrap();
        assert!(!dense.is_sparse_output());
    }

    #[test]
    fn test_dense_blocks_raise_density() {
        // 1 dense column + 3 one-hot columns: density (4 + 4) / 16 = 0.5
        let frame = sample_frame();
        let fitted = plan(Remainder::Drop, true).fit(&frame).unwrap();
        assert!(!fitted.is_sparse_output());
        assert!(!fitted.transform(&frame).unwrap().is_sparse());
    }

    #[test]
    fn test_empty_route_is_skipped() {
        let frame = sample_frame();
        let fitted = ColumnTransformer::new(Remainder::Drop)
            .add_numeric(
                "bin",
                Pipeline::new().add_simple_imputer(SimpleImputer::default()),
                Vec::new(),
            )
            .add_categorical(
                "cat",
                CategoricalEncoder::Ordinal(OrdinalEncoder::new()),
                cols(&["city"]),
            )
            .fit(&frame)
            .unwrap();

        assert_eq!(fitted.routes().len(), 1);
        assert!(fitted.route("bin").is_none());
        assert_eq!(
            fitted.transform(&frame).unwrap().to_dense(),
            array![[0.0], [1.0], [0.0], [2.0]]
        );
    }

    #[test]
    fn test_column_selected_twice() {
        let frame = sample_frame();
        let plan = plan(Remainder::Drop, false).add_numeric(
            "again",
            Pipeline::new().add_simple_imputer(SimpleImputer::default()),
            cols(&["age"]),
        );
        assert!(matches!(
            plan.fit(&frame),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_invalid_sparse_threshold() {
        let result = plan(Remainder::Drop, true)
            .with_sparse_threshold(1.5)
            .fit(&sample_frame());
        assert!(matches!(result, Err(PreprocessingError::InvalidParameter(_))));
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::from_columns(vec![
            ("age", Column::numeric(Vec::new())),
            ("city", Column::text(Vec::<Option<&str>>::new())),
        ])
        .unwrap();
        assert!(matches!(
            plan(Remainder::Drop, false).fit(&frame),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_transform_missing_column() {
        let fitted = plan(Remainder::Drop, false).fit(&sample_frame()).unwrap();
        let other = Frame::from_columns(vec![("age", Column::numeric(vec![1.0]))]).unwrap();
        assert!(matches!(
            fitted.transform(&other),
            Err(PreprocessingError::ColumnNotFound(name)) if name == "city"
        ));
    }

    #[test]
    fn test_transform_unknown_category_names_column() {
        let fitted = plan(Remainder::Drop, false).fit(&sample_frame()).unwrap();
        let other = Frame::from_columns(vec![
            ("age", Column::numeric(vec![1.0])),
            ("city", Column::text(vec![Some("z")])),
        ])
        .unwrap();
        assert!(matches!(
            fitted.transform(&other),
            Err(PreprocessingError::UnknownCategory { column, value }) if column == "city" && value == "z"
        ));
    }
}
