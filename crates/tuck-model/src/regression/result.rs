//! Fitted regression values.

use serde::{Deserialize, Serialize};
use tuck_data::Factor;

/// Name of the constant regressor.
pub const INTERCEPT: &str = "const";

/// One estimated coefficient with its inference statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Regressor name (`const` for the intercept, otherwise a factor label).
    pub name: String,
    /// Point estimate.
    pub estimate: f64,
    /// Classical OLS standard error.
    pub std_error: f64,
    /// `estimate / std_error`.
    pub t_stat: f64,
    /// Two-sided p-value against Student's t with the residual degrees of freedom.
    pub p_value: f64,
}

impl Coefficient {
    /// Whether this is the intercept.
    pub fn is_intercept(&self) -> bool {
        self.name == INTERCEPT
    }
}

/// Result of one OLS fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Coefficients in design-matrix order; the intercept comes first.
    pub coefficients: Vec<Coefficient>,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// R² adjusted for the number of regressors.
    pub adj_r_squared: f64,
    /// Overall F statistic.
    pub f_statistic: f64,
    /// p-value of the overall F test.
    pub f_p_value: f64,
    /// Sum of squared residuals.
    pub sse: f64,
    /// Number of observations used.
    pub n_obs: usize,
    /// Model degrees of freedom (regressors excluding the intercept).
    pub df_model: usize,
    /// Residual degrees of freedom.
    pub df_resid: usize,
}

impl RegressionResult {
    /// The intercept coefficient.
    pub fn intercept(&self) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.is_intercept())
    }

    /// Coefficient by regressor name.
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }

    /// Coefficient of a factor, if the model includes it.
    pub fn factor(&self, factor: Factor) -> Option<&Coefficient> {
        self.coefficient(factor.label())
    }

    /// Residual standard error, `sqrt(SSE / df_resid)`.
    pub fn residual_std_error(&self) -> f64 {
        (self.sse / self.df_resid as f64).sqrt()
    }
}
