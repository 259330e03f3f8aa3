use log::debug;
use ndarray::{Array2, ArrayView1, ArrayView2};

use super::loadings::LoadingsTable;
use super::validate::Components;
use crate::error::{BiplotError, Result};
use crate::pca::PcaResult;
use crate::utils::{max_abs, FloatOps};

/// Per-observation projections rescaled into the loadings' range.
///
/// Columns, in order: first component, second component, observation name.
#[derive(Debug, Clone, PartialEq)]
pub struct CasesTable<T: FloatOps> {
    components: Components,
    coordinates: Array2<T>,
    names: Vec<String>,
    scale_factor: T,
}

impl<T: FloatOps> CasesTable<T> {
    pub fn components(&self) -> Components {
        self.components
    }

    /// `n_observations × 2` view of the scaled projections.
    pub fn coordinates(&self) -> ArrayView2<'_, T> {
        self.coordinates.view()
    }

    pub fn x(&self) -> ArrayView1<'_, T> {
        self.coordinates.column(0)
    }

    pub fn y(&self) -> ArrayView1<'_, T> {
        self.coordinates.column(1)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Factor every raw projection was multiplied by.
    pub fn scale_factor(&self) -> T {
        self.scale_factor
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn column_names(&self) -> [String; 3] {
        [
            format!("PC{}", self.components.first()),
            format!("PC{}", self.components.second()),
            "observation".to_string(),
        ]
    }
}

/// Selects the two score columns and multiplies both by
/// `max|loadings| / max|projections|`, so the farthest case lands as far out
/// as the longest arrow coordinate.
pub fn scale_cases<T: FloatOps>(
    pca: &PcaResult<T>,
    components: Components,
    loadings: &LoadingsTable<T>,
) -> Result<CasesTable<T>> {
    let [i, j] = components.columns();
    let scores = pca.scores();

    let mut coordinates = Array2::zeros((scores.nrows(), 2));
    coordinates.column_mut(0).assign(&scores.column(i));
    coordinates.column_mut(1).assign(&scores.column(j));

    let loadings_max = loadings.max_abs();
    let projections_max = max_abs(coordinates.view());
    if projections_max == T::zero() {
        return Err(BiplotError::DegenerateScale);
    }

    let scale_factor = loadings_max / projections_max;
    debug!(
        "Scaling {} cases by {:?} (loadings max {:?}, projections max {:?})",
        scores.nrows(),
        scale_factor,
        loadings_max,
        projections_max
    );
    coordinates.mapv_inplace(|v| v * scale_factor);

    Ok(CasesTable {
        components,
        coordinates,
        names: pca.observation_names().to_vec(),
        scale_factor,
    })
}
