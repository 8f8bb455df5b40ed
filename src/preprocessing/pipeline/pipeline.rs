//! Pipeline for chaining numeric transformers.
//!
//! A Pipeline chains named transformers together, where the output of one
//! transformer becomes the input to the next. During fit, each step is fitted
//! on the output of the already-fitted steps before it.

use crate::error::PreprocessingError;
use crate::preprocessing::imputation::{FittedSimpleImputer, SimpleImputer};
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use std::collections::HashSet;

/// A step in the unfitted pipeline.
#[derive(Clone, Debug)]
pub enum PipelineStep {
    SimpleImputer(SimpleImputer),
    StandardScaler(StandardScaler),
}

impl PipelineStep {
    fn fit(&self, data: &Array2<f64>) -> Result<FittedStep, PreprocessingError> {
        match self {
            PipelineStep::SimpleImputer(t) => t.fit(data).map(FittedStep::SimpleImputer),
            PipelineStep::StandardScaler(t) => t.fit(data).map(FittedStep::StandardScaler),
        }
    }
}

/// A fitted step of a [`FittedPipeline`].
#[derive(Clone, Debug)]
pub enum FittedStep {
    SimpleImputer(FittedSimpleImputer),
    StandardScaler(FittedStandardScaler),
}

impl FittedStep {
    fn transform_step(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        match self {
            FittedStep::SimpleImputer(t) => t.transform(data),
            FittedStep::StandardScaler(t) => t.transform(data),
        }
    }

    /// Transformer type name, for debugging.
    pub fn kind(&self) -> &'static str {
        match self {
            FittedStep::SimpleImputer(_) => "SimpleImputer",
            FittedStep::StandardScaler(_) => "StandardScaler",
        }
    }

    pub fn as_imputer(&self) -> Option<&FittedSimpleImputer> {
        match self {
            FittedStep::SimpleImputer(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_scaler(&self) -> Option<&FittedStandardScaler> {
        match self {
            FittedStep::StandardScaler(t) => Some(t),
            _ => None,
        }
    }
}

/// Pipeline transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    steps: Vec<(String, PipelineStep)>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named step. Names must be unique within the pipeline.
    pub fn add_step(mut self, name: impl Into<String>, step: PipelineStep) -> Self {
        self.steps.push((name.into(), step));
        self
    }

    /// Add a SimpleImputer named `"imputer"`.
    pub fn add_simple_imputer(self, imputer: SimpleImputer) -> Self {
        self.add_step("imputer", PipelineStep::SimpleImputer(imputer))
    }

    /// Add a StandardScaler named `"scaler"`.
    pub fn add_standard_scaler(self, scaler: StandardScaler) -> Self {
        self.add_step("scaler", PipelineStep::StandardScaler(scaler))
    }

    pub fn steps(&self) -> &[(String, PipelineStep)] {
        &self.steps
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Get the number of steps in the pipeline.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transformer for Pipeline {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Fitted = FittedPipeline;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if self.steps.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit an empty pipeline".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some((name, _)) = self.steps.iter().find(|(name, _)| !seen.insert(name)) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "Duplicate pipeline step name '{}'",
                name
            )));
        }

        let (rows, cols) = data.dim();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit pipeline on empty data".to_string(),
            ));
        }

        let mut fitted_steps = Vec::with_capacity(self.steps.len());
        let mut current = data.clone();

        for (name, step) in &self.steps {
            let fitted = step.fit(&current)?;
            current = fitted.transform_step(&current)?;
            fitted_steps.push((name.clone(), fitted));
        }

        Ok(FittedPipeline {
            steps: fitted_steps,
            n_features: cols,
        })
    }
}

/// Fitted Pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPipeline {
    steps: Vec<(String, FittedStep)>,
    n_features: usize,
}

impl FittedPipeline {
    /// Look up a fitted step by name.
    pub fn step(&self, name: &str) -> Option<&FittedStep> {
        self.steps
            .iter()
            .find(|(step_name, _)| step_name == name)
            .map(|(_, step)| step)
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FittedTransformer for FittedPipeline {
    type Input = Array2<f64>;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let cols = data.ncols();

        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }

        let mut result = data.clone();
        for (_, step) in &self.steps {
            result = step.transform_step(&result)?;
        }
        Ok(result)
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::imputation::ImputeStrategy;
    use ndarray::array;

    fn numeric_pipeline() -> Pipeline {
        Pipeline::new()
            .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Median))
            .add_standard_scaler(StandardScaler::new())
    }

    #[test]
    fn test_pipeline_fits_steps_sequentially() {
        let data = array![[1.0], [f64::NAN], [3.0], [5.0]];
        let fitted = numeric_pipeline().fit(&data).unwrap();

        let imputer = fitted.step("imputer").and_then(FittedStep::as_imputer).unwrap();
        assert_eq!(imputer.statistics()[0], 3.0);

        // Scaler sees the imputed column [1, 3, 3, 5]
        let scaler = fitted.step("scaler").and_then(FittedStep::as_scaler).unwrap();
        assert_eq!(scaler.mean()[0], 3.0);
        assert!((scaler.scale()[0] - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_pipeline_transform() {
        let data = array![[1.0, 10.0], [f64::NAN, 20.0], [3.0, f64::NAN]];
        let transformed = numeric_pipeline().fit_transform(&data).unwrap();

        assert!(transformed.iter().all(|v| v.is_finite()));
        for column in transformed.columns() {
            assert!(column.sum().abs() < 1e-12);
        }
    }

    #[test]
    fn test_pipeline_step_names() {
        let pipeline = numeric_pipeline();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.step_names(), vec!["imputer", "scaler"]);

        let fitted = pipeline.fit(&array![[1.0]]).unwrap();
        assert_eq!(fitted.step("scaler").unwrap().kind(), "StandardScaler");
        assert!(fitted.step("encoder").is_none());
    }

    #[test]
    fn test_pipeline_empty() {
        let result = Pipeline::new().fit(&array![[1.0]]);
        assert!(matches!(result, Err(PreprocessingError::InvalidParameter(_))));
    }

    #[test]
    fn test_pipeline_duplicate_step_names() {
        let pipeline = Pipeline::new()
            .add_simple_imputer(SimpleImputer::default())
            .add_simple_imputer(SimpleImputer::default());
        assert!(matches!(
            pipeline.fit(&array![[1.0]]),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_pipeline_empty_data() {
        let data = Array2::<f64>::zeros((0, 1));
        assert!(matches!(
            numeric_pipeline().fit(&data),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_pipeline_feature_mismatch() {
        let fitted = numeric_pipeline().fit(&array![[1.0], [2.0]]).unwrap();
        assert!(matches!(
            fitted.transform(&array![[1.0, 2.0]]),
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }
}
