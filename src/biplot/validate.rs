use crate::error::{BiplotError, Result};
use crate::pca::PcaResult;
use crate::utils::FloatOps;

/// A pair of distinct 1-based principal component indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Components {
    first: usize,
    second: usize,
}

impl Components {
    pub fn new(first: usize, second: usize) -> Result<Self> {
        if first == 0 || second == 0 {
            return Err(BiplotError::InvalidArgument(format!(
                "Component indices are 1-based, got ({}, {})",
                first, second
            )));
        }
        if first == second {
            return Err(BiplotError::InvalidArgument(format!(
                "Component indices must differ, got ({}, {})",
                first, second
            )));
        }
        Ok(Self { first, second })
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn second(&self) -> usize {
        self.second
    }

    pub fn max(&self) -> usize {
        self.first.max(self.second)
    }

    /// Zero-based column indices into the rotation and score matrices.
    pub fn columns(&self) -> [usize; 2] {
        [self.first - 1, self.second - 1]
    }
}

impl Default for Components {
    fn default() -> Self {
        Self { first: 1, second: 2 }
    }
}

impl TryFrom<&[usize]> for Components {
    type Error = BiplotError;

    fn try_from(values: &[usize]) -> Result<Self> {
        match values {
            [first, second] => Components::new(*first, *second),
            _ => Err(BiplotError::InvalidArgument(format!(
                "Expected exactly 2 components, got {}",
                values.len()
            ))),
        }
    }
}

impl TryFrom<&[i64]> for Components {
    type Error = BiplotError;

    fn try_from(values: &[i64]) -> Result<Self> {
        let converted = values
            .iter()
            .map(|&v| {
                usize::try_from(v).map_err(|_| {
                    BiplotError::InvalidArgument(format!("Component index {} is negative", v))
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        Components::try_from(converted.as_slice())
    }
}

impl TryFrom<(usize, usize)> for Components {
    type Error = BiplotError;

    fn try_from((first, second): (usize, usize)) -> Result<Self> {
        Components::new(first, second)
    }
}

/// Confirms the PCA result is well formed and that both requested components exist.
pub fn validate_input<T: FloatOps>(pca: &PcaResult<T>, components: Components) -> Result<()> {
    pca.validate()?;

    let available = pca.n_components();
    if components.max() > available {
        return Err(BiplotError::InvalidComponentSelection {
            requested: components.max(),
            available,
        });
    }
    Ok(())
}
