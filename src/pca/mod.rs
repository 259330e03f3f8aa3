use anyhow::{anyhow, bail};
use log::debug;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use std::sync::Arc;

use crate::error::{BiplotError, Result};
use crate::utils::FloatOps;

// Trait for SVD implementations
pub trait SVDImplementation: Send + Sync {
    fn compute(
        &self,
        matrix: ArrayView2<f64>,
    ) -> anyhow::Result<(Array2<f64>, Array1<f64>, Array2<f64>)>;
}

/// Output of a principal component analysis, laid out like R's `prcomp`.
///
/// - `rotation`: variables × components loading coefficients
/// - `scores`: observations × components case projections
/// - `sdev`: per-component standard deviations, at least one per rotation column
#[derive(Debug, Clone, PartialEq)]
pub struct PcaResult<T: FloatOps> {
    rotation: Array2<T>,
    scores: Array2<T>,
    sdev: Array1<T>,
    variable_names: Vec<String>,
    observation_names: Vec<String>,
}

impl<T: FloatOps> PcaResult<T> {
    /// Wraps externally computed PCA output. Variables default to `V1..Vp`
    /// and observations to `1..n`.
    pub fn new(rotation: Array2<T>, scores: Array2<T>, sdev: Array1<T>) -> Self {
        let variable_names = (1..=rotation.nrows()).map(|i| format!("V{}", i)).collect();
        let observation_names = (1..=scores.nrows()).map(|i| i.to_string()).collect();
        Self {
            rotation,
            scores,
            sdev,
            variable_names,
            observation_names,
        }
    }

    pub fn with_variable_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.variable_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_observation_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.observation_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Checks that the parts describe one consistent PCA.
    pub fn validate(&self) -> Result<()> {
        let n_components = self.rotation.ncols();
        if n_components == 0 {
            return Err(BiplotError::InvalidArgument(
                "PCA result has an empty rotation matrix".to_string(),
            ));
        }
        if self.scores.ncols() != n_components {
            return Err(BiplotError::InvalidArgument(format!(
                "Score matrix has {} components but rotation matrix has {}",
                self.scores.ncols(),
                n_components
            )));
        }
        if self.sdev.len() < n_components {
            return Err(BiplotError::InvalidArgument(format!(
                "Standard deviation vector has {} entries, expected at least {}",
                self.sdev.len(),
                n_components
            )));
        }
        if self.sdev.iter().any(|s| !s.is_finite() || *s < T::zero()) {
            return Err(BiplotError::InvalidArgument(
                "Standard deviations must be finite and non-negative".to_string(),
            ));
        }
        if self.sdev.iter().all(|s| *s == T::zero()) {
            return Err(BiplotError::InvalidArgument(
                "Standard deviations sum to zero".to_string(),
            ));
        }
        if self.variable_names.len() != self.rotation.nrows() {
            return Err(BiplotError::InvalidArgument(format!(
                "Got {} variable names for {} variables",
                self.variable_names.len(),
                self.rotation.nrows()
            )));
        }
        if self.observation_names.len() != self.scores.nrows() {
            return Err(BiplotError::InvalidArgument(format!(
                "Got {} observation names for {} observations",
                self.observation_names.len(),
                self.scores.nrows()
            )));
        }
        Ok(())
    }

    pub fn rotation(&self) -> &Array2<T> {
        &self.rotation
    }

    pub fn scores(&self) -> &Array2<T> {
        &self.scores
    }

    pub fn sdev(&self) -> &Array1<T> {
        &self.sdev
    }

    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn observation_names(&self) -> &[String] {
        &self.observation_names
    }

    pub fn n_components(&self) -> usize {
        self.rotation.ncols()
    }

    pub fn n_variables(&self) -> usize {
        self.rotation.nrows()
    }

    pub fn n_observations(&self) -> usize {
        self.scores.nrows()
    }
}

pub struct PCABuilder<S: SVDImplementation> {
    n_components: Option<usize>,
    center: bool,
    scale: bool,
    variable_names: Option<Vec<String>>,
    observation_names: Option<Vec<String>>,
    svd_implementation: Arc<S>,
}

impl<S: SVDImplementation> PCABuilder<S> {
    pub fn new(svd_implementation: S) -> Self {
        PCABuilder {
            n_components: None,
            center: true,
            scale: false,
            variable_names: None,
            observation_names: None,
            svd_implementation: Arc::new(svd_implementation),
        }
    }

    pub fn n_components(mut self, n_components: usize) -> Self {
        self.n_components = Some(n_components);
        self
    }

    pub fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Rescale every variable to unit standard deviation before decomposing.
    pub fn scale(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    pub fn variable_names<N: Into<String>>(mut self, names: impl IntoIterator<Item = N>) -> Self {
        self.variable_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn observation_names<N: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = N>,
    ) -> Self {
        self.observation_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Decomposes `x` (observations × variables) into a [`PcaResult`].
    ///
    /// Rotation is `Vᵀ` transposed, scores are the preprocessed data projected
    /// onto it, and `sdev` is `s / sqrt(n - 1)` for every singular value.
    pub fn fit(&self, x: ArrayView2<f64>) -> anyhow::Result<PcaResult<f64>> {
        let (n_samples, n_features) = x.dim();
        if n_samples < 2 || n_features == 0 {
            bail!(
                "PCA needs at least 2 observations and 1 variable, got {} x {}",
                n_samples,
                n_features
            );
        }

        let x_preprocessed = self.preprocess(x)?;

        let (_u, s, vt) = self.svd_implementation.compute(x_preprocessed.view())?;
        if vt.nrows() != s.len() || vt.ncols() != n_features {
            bail!(
                "SVD returned Vt of shape {:?} for {} singular values and {} features",
                vt.dim(),
                s.len(),
                n_features
            );
        }

        let n_components = self.n_components.unwrap_or(s.len());
        if n_components == 0 || n_components > s.len() {
            bail!(
                "Number of components ({}) must be between 1 and {}",
                n_components,
                s.len()
            );
        }

        let mut order: Vec<usize> = (0..s.len()).collect();
        order.sort_by(|&a, &b| s[b].total_cmp(&s[a]));

        let mut rotation = Array2::<f64>::zeros((n_features, n_components));
        for (k, &idx) in order.iter().take(n_components).enumerate() {
            rotation.column_mut(k).assign(&vt.row(idx));
        }

        let scores = x_preprocessed.dot(&rotation);
        let denom = (n_samples as f64 - 1.0).sqrt();
        let sdev = Array1::from_iter(order.iter().map(|&idx| s[idx] / denom));

        debug!(
            "PCA fitted: {} observations, {} variables, {} components kept",
            n_samples, n_features, n_components
        );

        let mut result = PcaResult::new(rotation, scores, sdev);
        if let Some(names) = &self.variable_names {
            result = result.with_variable_names(names.iter().cloned());
        }
        if let Some(names) = &self.observation_names {
            result = result.with_observation_names(names.iter().cloned());
        }
        result.validate()?;
        Ok(result)
    }

    fn preprocess(&self, x: ArrayView2<f64>) -> anyhow::Result<Array2<f64>> {
        let mut x_preprocessed = x.to_owned();

        if self.center {
            let mean = x
                .mean_axis(Axis(0))
                .ok_or_else(|| anyhow!("Failed to compute column means"))?;
            for mut row in x_preprocessed.axis_iter_mut(Axis(0)) {
                row -= &mean;
            }
        }

        if self.scale {
            let std_dev = x.std_axis(Axis(0), 1.0);
            if let Some(j) = std_dev.iter().position(|&s| s == 0.0) {
                bail!("Cannot rescale constant variable at column {}", j);
            }
            for mut row in x_preprocessed.axis_iter_mut(Axis(0)) {
                row /= &std_dev;
            }
        }

        Ok(x_preprocessed)
    }
}
