//! Dense symmetric positive-definite solves on `ndarray`.
//!
//! The regressions here have at most six columns, so a plain Cholesky
//! factorization of the normal equations is both adequate and exact enough.

use ndarray::{Array1, Array2};

/// Lower-triangular Cholesky factor `L` with `A = L Lᵀ`.
#[derive(Debug, Clone)]
pub(crate) struct Cholesky {
    l: Array2<f64>,
}

impl Cholesky {
    /// Factorize a symmetric matrix.
    ///
    /// A pivot that is not positive, or that has lost more than
    /// `1 - tolerance` of the column's own diagonal mass to earlier columns,
    /// marks the matrix as singular. `Err` carries the index of that column.
    pub(crate) fn factorize(a: &Array2<f64>, tolerance: f64) -> Result<Self, usize> {
        let n = a.nrows();
        let mut l = Array2::<f64>::zeros((n, n));

        for j in 0..n {
            let mut pivot = a[[j, j]];
            for k in 0..j {
                pivot -= l[[j, k]] * l[[j, k]];
            }

            if !pivot.is_finite() || pivot <= 0.0 || pivot <= tolerance * a[[j, j]].abs() {
                return Err(j);
            }

            let diag = pivot.sqrt();
            l[[j, j]] = diag;

            for i in (j + 1)..n {
                let mut sum = a[[i, j]];
                for k in 0..j {
                    sum -= l[[i, k]] * l[[j, k]];
                }
                l[[i, j]] = sum / diag;
            }
        }

        Ok(Self { l })
    }

    /// Solve `A x = b`.
    pub(crate) fn solve(&self, b: &Array1<f64>) -> Array1<f64> {
        let n = self.l.nrows();

        // Forward substitution: L z = b
        let mut z = Array1::<f64>::zeros(n);
        for i in 0..n {
            let mut sum = b[i];
            for k in 0..i {
                sum -= self.l[[i, k]] * z[k];
            }
            z[i] = sum / self.l[[i, i]];
        }

        // Back substitution: Lᵀ x = z
        let mut x = Array1::<f64>::zeros(n);
        for i in (0..n).rev() {
            let mut sum = z[i];
            for k in (i + 1)..n {
                sum -= self.l[[k, i]] * x[k];
            }
            x[i] = sum / self.l[[i, i]];
        }

        x
    }

    /// Inverse of `A`, one column at a time.
    pub(crate) fn inverse(&self) -> Array2<f64> {
        let n = self.l.nrows();
        let mut inv = Array2::<f64>::zeros((n, n));
        let mut unit = Array1::<f64>::zeros(n);

        for j in 0..n {
            unit.fill(0.0);
            unit[j] = 1.0;
            inv.column_mut(j).assign(&self.solve(&unit));
        }

        inv
    }
}
