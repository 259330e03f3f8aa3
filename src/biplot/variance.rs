use crate::pca::PcaResult;
use crate::utils::{round_to, FloatOps};

use super::validate::Components;

/// How a component's share of the total is measured for the axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarianceMeasure {
    /// `sdev_k / Σ sdev`, the historical biplot label.
    #[default]
    StdDevShare,
    /// `sdev_k² / Σ sdev²`, the classical proportion of variance.
    VarianceShare,
}

/// Percentage of the total carried by every component, unrounded.
pub fn component_shares<T: FloatOps>(pca: &PcaResult<T>, measure: VarianceMeasure) -> Vec<T> {
    let weights: Vec<T> = pca
        .sdev()
        .iter()
        .map(|&s| match measure {
            VarianceMeasure::StdDevShare => s,
            VarianceMeasure::VarianceShare => s * s,
        })
        .collect();

    let total = weights.iter().fold(T::zero(), |acc, &w| acc + w);
    let hundred = T::from_f64(100.0).unwrap_or_else(T::one);
    weights.into_iter().map(|w| w / total * hundred).collect()
}

/// Rounded (2 decimal) percentages for the two selected components.
pub fn variance_explained<T: FloatOps>(
    pca: &PcaResult<T>,
    components: Components,
    measure: VarianceMeasure,
) -> (T, T) {
    let shares = component_shares(pca, measure);
    let [i, j] = components.columns();
    (round_to(shares[i], 2), round_to(shares[j], 2))
}
