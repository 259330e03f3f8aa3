use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use super::validate::Components;
use crate::pca::PcaResult;
use crate::utils::{max_abs, FloatOps};

/// Per-variable arrow coordinates on the two selected components.
///
/// Columns, in order: first component, second component, variable name, origin.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingsTable<T: FloatOps> {
    components: Components,
    coordinates: Array2<T>,
    names: Vec<String>,
    origin: Array1<T>,
}

impl<T: FloatOps> LoadingsTable<T> {
    pub fn components(&self) -> Components {
        self.components
    }

    /// `n_variables × 2` view of the arrow tips.
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

    /// Arrow tail shared by every variable, always zero.
    pub fn origin(&self) -> ArrayView1<'_, T> {
        self.origin.view()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn column_names(&self) -> [String; 4] {
        [
            format!("PC{}", self.components.first()),
            format!("PC{}", self.components.second()),
            "variable".to_string(),
            "origin".to_string(),
        ]
    }

    /// Largest magnitude arrow-tip coordinate on either axis.
    pub fn max_abs(&self) -> T {
        max_abs(self.coordinates.view())
    }
}

/// Copies the selected rotation columns out of the PCA result.
pub fn extract_loadings<T: FloatOps>(pca: &PcaResult<T>, components: Components) -> LoadingsTable<T> {
    let [i, j] = components.columns();
    let rotation = pca.rotation();

    let mut coordinates = Array2::zeros((rotation.nrows(), 2));
    coordinates.column_mut(0).assign(&rotation.column(i));
    coordinates.column_mut(1).assign(&rotation.column(j));

    LoadingsTable {
        components,
        coordinates,
        names: pca.variable_names().to_vec(),
        origin: Array1::zeros(rotation.nrows()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_extract_selected_columns() {
        let rotation = array![[0.1, -0.7, 0.3], [0.5, 0.2, -0.9], [-0.8, 0.4, 0.1]];
        let pca = PcaResult::new(rotation, array![[1.0, 1.0, 1.0]], array![3.0, 2.0, 1.0])
            .with_variable_names(["sepal", "petal", "stem"]);

        let table = extract_loadings(&pca, Components::new(3, 1).unwrap());

        assert_eq!(table.len(), 3);
        assert_eq!(table.column_names(), ["PC3", "PC1", "variable", "origin"]);
        assert_eq!(table.x(), array![0.3, -0.9, 0.1]);
        assert_eq!(table.y(), array![0.1, 0.5, -0.8]);
        assert_eq!(table.names(), &["sepal", "petal", "stem"]);
        assert!(table.origin().iter().all(|&o| o == 0.0));
        assert_relative_eq!(table.max_abs(), 0.9);
    }
}
