//! Factor regressions of excess returns.
//!
//! Every [`ModelSpec`] is fitted independently on the rows that have an
//! excess return and every factor the model uses. A model that cannot be
//! fitted keeps its [`FitError`]; the other models are unaffected.

mod linalg;
pub mod ols;
pub mod result;

pub use ols::{OlsConfig, fit_ols};
pub use result::{Coefficient, INTERCEPT, RegressionResult};

use crate::error::{FitError, ModelError};
use crate::merge::MergedRow;
use crate::spec::ModelSpec;
use ndarray::{Array1, Array2};
use tracing::{debug, warn};

/// Outcome of fitting one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFit {
    /// The model that was fitted.
    pub spec: ModelSpec,
    /// Fitted values or the reason the fit failed.
    pub outcome: Result<RegressionResult, FitError>,
}

impl ModelFit {
    /// Model name.
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// The result, if the fit succeeded.
    pub fn result(&self) -> Option<&RegressionResult> {
        self.outcome.as_ref().ok()
    }
}

/// Fits for a set of models, in the order the models were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelFits {
    fits: Vec<ModelFit>,
}

impl ModelFits {
    /// Number of models.
    pub fn len(&self) -> usize {
        self.fits.len()
    }

    /// Whether no model was fitted.
    pub fn is_empty(&self) -> bool {
        self.fits.is_empty()
    }

    /// Iterate in model order.
    pub fn iter(&self) -> std::slice::Iter<'_, ModelFit> {
        self.fits.iter()
    }

    /// Look up a fit by model name.
    pub fn get(&self, name: &str) -> Option<&ModelFit> {
        self.fits.iter().find(|f| f.name() == name)
    }

    /// Number of models that failed.
    pub fn failures(&self) -> usize {
        self.fits.iter().filter(|f| f.outcome.is_err()).count()
    }
}

impl<'a> IntoIterator for &'a ModelFits {
    type Item = &'a ModelFit;
    type IntoIter = std::slice::Iter<'a, ModelFit>;

    fn into_iter(self) -> Self::IntoIter {
        self.fits.iter()
    }
}

impl FromIterator<ModelFit> for ModelFits {
    fn from_iter<I: IntoIterator<Item = ModelFit>>(iter: I) -> Self {
        Self {
            fits: iter.into_iter().collect(),
        }
    }
}

/// Dependent vector and design matrix for one model.
#[derive(Debug, Clone)]
pub struct Design {
    /// Excess returns.
    pub y: Array1<f64>,
    /// Constant column followed by one column per factor.
    pub x: Array2<f64>,
    /// Column names, `const` first.
    pub names: Vec<String>,
    /// Rows skipped because a needed value was missing.
    pub skipped: usize,
}

/// Build the regression inputs for a model from merged rows.
pub fn design_matrix(rows: &[MergedRow], spec: &ModelSpec) -> Design {
    let factors = spec.factors();
    let k = spec.regressor_count();

    let mut y = Vec::with_capacity(rows.len());
    let mut x = Vec::with_capacity(rows.len() * k);
    let mut skipped = 0;

    for row in rows {
        let Some(excess) = row.excess_return else {
            skipped += 1;
            continue;
        };
        let values: Option<Vec<f64>> = factors.iter().map(|&f| row.factor(f)).collect();
        let Some(values) = values else {
            skipped += 1;
            continue;
        };

        y.push(excess);
        x.push(1.0);
        x.extend(values);
    }

    let n = y.len();
    let x = Array2::from_shape_vec((n, k), x)
        .unwrap_or_else(|_| unreachable!("design buffer holds n * k values"));

    let mut names = Vec::with_capacity(k);
    names.push(INTERCEPT.to_string());
    names.extend(factors.iter().map(|f| f.label().to_string()));

    Design {
        y: Array1::from(y),
        x,
        names,
        skipped,
    }
}

/// Fits a family of factor models.
#[derive(Debug, Clone, Default)]
pub struct Regressor {
    config: OlsConfig,
}

impl Regressor {
    /// Create a regressor with a custom solver configuration.
    pub const fn new(config: OlsConfig) -> Self {
        Self { config }
    }

    /// Fit a single model.
    pub fn fit_model(
        &self,
        rows: &[MergedRow],
        spec: &ModelSpec,
    ) -> Result<RegressionResult, FitError> {
        let design = design_matrix(rows, spec);
        if design.skipped > 0 {
            debug!(
                model = spec.name(),
                skipped = design.skipped,
                "skipped rows with missing values"
            );
        }
        fit_ols(&design.y, &design.x, &design.names, &self.config)
    }

    /// Fit every model on the same rows.
    ///
    /// An empty row set fails the whole run before any model is attempted.
    pub fn fit(&self, rows: &[MergedRow], specs: &[ModelSpec]) -> Result<ModelFits, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyMerge);
        }

        let fits = specs
            .iter()
            .map(|spec| {
                let outcome = self.fit_model(rows, spec);
                match &outcome {
                    Ok(result) => debug!(
                        model = spec.name(),
                        n_obs = result.n_obs,
                        r_squared = result.r_squared,
                        "fitted model"
                    ),
                    Err(e) => warn!(model = spec.name(), error = %e, "model fit failed"),
                }
                ModelFit {
                    spec: spec.clone(),
                    outcome,
                }
            })
            .collect();

        Ok(fits)
    }
}

/// Fit every model with the default solver configuration.
pub fn fit(rows: &[MergedRow], specs: &[ModelSpec]) -> Result<ModelFits, ModelError> {
    Regressor::default().fit(rows, specs)
}
