use ::nalgebra::DMatrix;
use anyhow::anyhow;
use ndarray::{Array1, Array2, ArrayView2};

use crate::pca::SVDImplementation;

/// Thin SVD backed by nalgebra's pure-Rust bidiagonalisation.
#[derive(Debug, Clone, Copy)]
pub struct NalgebraSVD {
    eps: f64,
    max_iterations: usize,
}

impl NalgebraSVD {
    pub fn new() -> Self {
        Self {
            eps: f64::EPSILON,
            max_iterations: 0,
        }
    }

    /// Caps the number of QR sweeps. Zero means no limit.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for NalgebraSVD {
    fn default() -> Self {
        Self::new()
    }
}

fn to_ndarray(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

impl SVDImplementation for NalgebraSVD {
    fn compute(
        &self,
        matrix: ArrayView2<f64>,
    ) -> anyhow::Result<(Array2<f64>, Array1<f64>, Array2<f64>)> {
        let (rows, cols) = matrix.dim();
        let m = DMatrix::from_row_iterator(rows, cols, matrix.iter().cloned());

        let svd = m
            .try_svd(true, true, self.eps, self.max_iterations)
            .ok_or_else(|| anyhow!("SVD did not converge"))?;

        let u = svd.u.as_ref().ok_or_else(|| anyhow!("SVD did not produce U"))?;
        let vt = svd
            .v_t
            .as_ref()
            .ok_or_else(|| anyhow!("SVD did not produce V^T"))?;
        let s = Array1::from(svd.singular_values.as_slice().to_vec());

        Ok((to_ndarray(u), s, to_ndarray(vt)))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn test_simple_svd() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let (u, s, vt) = NalgebraSVD::new().compute(a.view()).unwrap();

        assert_eq!(u.shape(), &[2, 2]);
        assert_eq!(s.len(), 2);
        assert_eq!(vt.shape(), &[2, 2]);

        let mut sorted = s.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        assert_abs_diff_eq!(sorted[0], 5.4649857, epsilon = 1e-6);
        assert_abs_diff_eq!(sorted[1], 0.3659662, epsilon = 1e-6);

        let reconstructed = u.dot(&Array2::from_diag(&s)).dot(&vt);
        for i in 0..2 {
            for j in 0..2 {
                assert_abs_diff_eq!(reconstructed[[i, j]], a[[i, j]], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_thin_shapes_for_wide_matrix() {
        let a = array![[1.0, 0.0, 2.0, 1.0], [0.0, 3.0, 1.0, 1.0]];
        let (u, s, vt) = NalgebraSVD::default().compute(a.view()).unwrap();

        assert_eq!(u.shape(), &[2, 2]);
        assert_eq!(s.len(), 2);
        assert_eq!(vt.shape(), &[2, 4]);
    }
}
