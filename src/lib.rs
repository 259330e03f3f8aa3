pub mod biplot;
pub mod chart;
mod error;
pub mod pca;
pub mod svd;
mod utils;

pub use biplot::{biplot, Biplot, BiplotBuilder, Components, VarianceMeasure};
pub use chart::{ChartBackend, ChartSpec, SpecBackend};
pub use error::{BiplotError, Result};
pub use pca::{PcaResult, SVDImplementation};
pub use utils::FloatOps;
