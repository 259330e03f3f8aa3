use thiserror::Error;

use crate::chart::Capability;

/// Errors raised while turning a PCA result into a biplot.
#[derive(Error, Debug)]
pub enum BiplotError {
    /// Malformed component pair or a PCA result missing required structure.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested component index exceeds the number of available components.
    #[error("Invalid component selection: component {requested} requested, but only {available} available")]
    InvalidComponentSelection { requested: usize, available: usize },

    /// The chart backend cannot draw one of the layers the biplot needs.
    #[error("Missing rendering capability: backend '{backend}' does not support {capability}")]
    MissingRenderingCapability {
        backend: String,
        capability: Capability,
    },

    /// Every selected case projection is zero, so no scale factor exists.
    #[error("Degenerate scale: all selected case projections are zero")]
    DegenerateScale,

    /// Failure reported by the chart backend while composing the chart.
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BiplotError>;
