//! Ordinary least squares with classical inference.
//!
//! Coefficients solve the normal equations `XᵀX β = Xᵀy`:
//!
//! - σ² = SSE / (n - k)
//! - SE(β) = sqrt(diag((XᵀX)⁻¹) σ²)
//! - t = β / SE, two-sided p against t(n - k)
//! - F = ((SST - SSE) / (k - 1)) / σ², p against F(k - 1, n - k)
//!
//! The first design column is assumed to be the constant, so SST is centered.
//! A dependent variable with zero SST is rejected as `ConstantResponse`.

use super::linalg::Cholesky;
use super::result::{Coefficient, RegressionResult};
use crate::error::FitError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Configuration for the OLS solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OlsConfig {
    /// Relative pivot threshold below which the design is treated as singular.
    pub singular_tolerance: f64,
}

impl Default for OlsConfig {
    fn default() -> Self {
        Self {
            singular_tolerance: 1e-10,
        }
    }
}

/// Fit `y` on the columns of `x`.
///
/// # Arguments
/// * `y` - Dependent variable (n)
/// * `x` - Design matrix (n x k), constant column first
/// * `names` - One name per design column
/// * `config` - Solver configuration
pub fn fit_ols(
    y: &Array1<f64>,
    x: &Array2<f64>,
    names: &[String],
    config: &OlsConfig,
) -> Result<RegressionResult, FitError> {
    let (n, k) = x.dim();
    if y.len() != n {
        return Err(FitError::DimensionMismatch {
            expected: n,
            actual: y.len(),
        });
    }
    if names.len() != k {
        return Err(FitError::DimensionMismatch {
            expected: k,
            actual: names.len(),
        });
    }
    if n <= k {
        return Err(FitError::InsufficientRows {
            required: k + 1,
            actual: n,
        });
    }

    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);

    let chol = Cholesky::factorize(&xtx, config.singular_tolerance).map_err(|col| {
        FitError::SingularDesign {
            column: names[col].clone(),
        }
    })?;

    let beta = chol.solve(&xty);
    let residuals = y - &x.dot(&beta);
    let sse = residuals.dot(&residuals);

    let y_mean = y.sum() / n as f64;
    let sst = y.iter().map(|v| (v - y_mean).powi(2)).sum::<f64>();
    if sst <= f64::EPSILON * y.dot(y) {
        return Err(FitError::ConstantResponse);
    }

    let df_resid = n - k;
    let df_model = k - 1;
    let sigma2 = sse / df_resid as f64;

    let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
        .map_err(|e| FitError::Distribution(e.to_string()))?;

    let xtx_inv = chol.inverse();
    let coefficients = names
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let estimate = beta[j];
            let std_error = (xtx_inv[[j, j]] * sigma2).max(0.0).sqrt();
            let t_stat = estimate / std_error;
            Coefficient {
                name: name.clone(),
                estimate,
                std_error,
                t_stat,
                p_value: two_sided_p(&t_dist, t_stat),
            }
        })
        .collect();

    let r_squared = 1.0 - sse / sst;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n - 1) as f64 / df_resid as f64;

    let (f_statistic, f_p_value) = if df_model == 0 {
        (f64::NAN, f64::NAN)
    } else {
        let f_stat = ((sst - sse) / df_model as f64) / sigma2;
        let f_dist = FisherSnedecor::new(df_model as f64, df_resid as f64)
            .map_err(|e| FitError::Distribution(e.to_string()))?;
        (f_stat, upper_tail_p(&f_dist, f_stat))
    };

    Ok(RegressionResult {
        coefficients,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value,
        sse,
        n_obs: n,
        df_model,
        df_resid,
    })
}

fn two_sided_p(dist: &StudentsT, t_stat: f64) -> f64 {
    if t_stat.is_nan() {
        return f64::NAN;
    }
    if t_stat.is_infinite() {
        return 0.0;
    }
    (2.0 * dist.sf(t_stat.abs())).min(1.0)
}

fn upper_tail_p(dist: &FisherSnedecor, f_stat: f64) -> f64 {
    if f_stat.is_nan() {
        return f64::NAN;
    }
    if f_stat == f64::INFINITY {
        return 0.0;
    }
    if f_stat <= 0.0 {
        return 1.0;
    }
    dist.sf(f_stat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Axis, array, stack};

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn with_constant(cols: &[&Array1<f64>]) -> Array2<f64> {
        let n = cols[0].len();
        let ones = Array1::<f64>::ones(n);
        let mut views = vec![ones.view()];
        views.extend(cols.iter().map(|c| c.view()));
        stack(Axis(1), &views).unwrap()
    }

    #[test]
    fn test_textbook_simple_regression() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = array![2.0, 4.0, 5.0, 4.0, 5.0];
        let design = with_constant(&[&x]);

        let fit = fit_ols(&y, &design, &names(&["const", "x"]), &OlsConfig::default()).unwrap();

        assert_abs_diff_eq!(fit.coefficients[0].estimate, 2.2, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.coefficients[1].estimate, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.coefficients[0].std_error, 0.88_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(fit.coefficients[1].std_error, 0.08_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(fit.sse, 2.4, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.r_squared, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.adj_r_squared, 1.0 - 0.4 * 4.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.f_statistic, 4.5, epsilon = 1e-10);

        assert_abs_diff_eq!(fit.coefficients[1].p_value, 0.124_027_062_657_554_7, epsilon = 1e-8);
        assert_abs_diff_eq!(fit.coefficients[0].p_value, 0.100_743_456_085_420_0, epsilon = 1e-8);
        // With one regressor the F test and the slope t test agree.
        assert_abs_diff_eq!(fit.f_p_value, fit.coefficients[1].p_value, epsilon = 1e-8);

        assert_eq!(fit.n_obs, 5);
        assert_eq!(fit.df_model, 1);
        assert_eq!(fit.df_resid, 3);
    }

    #[test]
    fn test_exact_fit_has_zero_p_values() {
        let x = array![0.01, -0.02, 0.03, 0.005, -0.01];
        let y = x.mapv(|v| 2.0 * v);
        let design = with_constant(&[&x]);

        let fit = fit_ols(&y, &design, &names(&["const", "Mkt-RF"]), &OlsConfig::default()).unwrap();

        assert_abs_diff_eq!(fit.coefficients[0].estimate, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.coefficients[1].estimate, 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.r_squared, 1.0, epsilon = 1e-10);
        assert!(fit.coefficients[1].p_value < 1e-6);
        assert!(fit.f_p_value < 1e-6);
    }

    #[test]
    fn test_insufficient_rows() {
        let y = array![0.01, 0.02];
        let design = array![[1.0, 0.1], [1.0, 0.2]];

        let err = fit_ols(&y, &design, &names(&["const", "x"]), &OlsConfig::default()).unwrap_err();
        assert_eq!(
            err,
            FitError::InsufficientRows {
                required: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_collinear_columns_are_singular() {
        let a = array![0.01, -0.02, 0.015, 0.0, 0.03, -0.01];
        let b = a.mapv(|v| -3.0 * v);
        let y = array![0.02, -0.01, 0.0, 0.01, 0.04, -0.02];
        let design = with_constant(&[&a, &b]);

        let err = fit_ols(&y, &design, &names(&["const", "a", "b"]), &OlsConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            FitError::SingularDesign {
                column: "b".to_string()
            }
        );
    }

    #[test]
    fn test_constant_response_has_no_r_squared() {
        let x = array![0.01, -0.02, 0.015, 0.0, 0.03, -0.01];
        let design = with_constant(&[&x]);

        for level in [0.0, 0.01] {
            let y = Array1::from_elem(6, level);
            let err = fit_ols(&y, &design, &names(&["const", "Mkt-RF"]), &OlsConfig::default())
                .unwrap_err();
            assert_eq!(err, FitError::ConstantResponse);
        }
    }

    #[test]
    fn test_dimension_checks() {
        let design = array![[1.0, 0.1], [1.0, 0.2], [1.0, 0.4]];
        let short_y = array![0.1, 0.2];
        assert!(matches!(
            fit_ols(&short_y, &design, &names(&["const", "x"]), &OlsConfig::default()),
            Err(FitError::DimensionMismatch { expected: 3, actual: 2 })
        ));

        let y = array![0.1, 0.2, 0.3];
        assert!(matches!(
            fit_ols(&y, &design, &names(&["const"]), &OlsConfig::default()),
            Err(FitError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }
}
