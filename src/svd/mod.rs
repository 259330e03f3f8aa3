#[cfg(feature = "nalgebra-svd")]
pub mod nalgebra;

#[cfg(feature = "nalgebra-svd")]
pub use self::nalgebra::NalgebraSVD;
