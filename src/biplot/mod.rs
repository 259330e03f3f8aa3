//! # Biplot
//!
//! Overlays variable loadings (arrows) and case scores (labels) from a PCA on
//! one pair of principal component axes.
//!
//! Loadings and scores live on different scales, so the scores are multiplied
//! by one global factor `max|loadings| / max|scores|` that brings the farthest
//! case out to the longest arrow coordinate without distorting geometry.
//!
//! ## Pipeline
//! 1. [`validate_input`] checks the PCA result and component pair
//! 2. [`extract_loadings`] copies the selected rotation columns
//! 3. [`variance_explained`] computes the axis label percentages
//! 4. [`scale_cases`] selects and rescales the score columns
//! 5. the assembled [`ChartSpec`] is handed to a [`ChartBackend`]

use log::{debug, warn};

use crate::chart::{
    ArrowHead, Capability, ChartBackend, ChartSpec, LabelPoint, Layer, LayerRole, Segment,
    SpecBackend,
};
use crate::error::{BiplotError, Result};
use crate::pca::PcaResult;
use crate::utils::{round_to, FloatOps};

mod cases;
mod loadings;
mod validate;
mod variance;

pub use cases::{scale_cases, CasesTable};
pub use loadings::{extract_loadings, LoadingsTable};
pub use validate::{validate_input, Components};
pub use variance::{component_shares, variance_explained, VarianceMeasure};

/// Data derived for one biplot, before any chart layers are built.
#[derive(Debug, Clone, PartialEq)]
pub struct BiplotTables<T: FloatOps> {
    pub loadings: LoadingsTable<T>,
    pub cases: Option<CasesTable<T>>,
    pub variance: (T, T),
}

pub struct BiplotBuilder {
    components: Components,
    variables: bool,
    cases: bool,
    variance_measure: VarianceMeasure,
    strict: bool,
    arrow_head: ArrowHead,
}

impl BiplotBuilder {
    pub fn new() -> Self {
        Self {
            components: Components::default(),
            variables: true,
            cases: true,
            variance_measure: VarianceMeasure::default(),
            strict: true,
            arrow_head: ArrowHead::default(),
        }
    }

    pub fn components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    /// Draw variable arrows and their name labels.
    pub fn variables(mut self, variables: bool) -> Self {
        self.variables = variables;
        self
    }

    /// Draw observation name labels at their scaled scores.
    pub fn cases(mut self, cases: bool) -> Self {
        self.cases = cases;
        self
    }

    pub fn variance_measure(mut self, measure: VarianceMeasure) -> Self {
        self.variance_measure = measure;
        self
    }

    /// When `false`, layers the backend cannot draw are dropped with a warning
    /// instead of failing the call.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn arrow_head(mut self, length: f64) -> Self {
        self.arrow_head = ArrowHead { length };
        self
    }

    pub fn build(self) -> Biplot {
        Biplot {
            components: self.components,
            variables: self.variables,
            cases: self.cases,
            variance_measure: self.variance_measure,
            strict: self.strict,
            arrow_head: self.arrow_head,
        }
    }
}

impl Default for BiplotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parts of the chart the backend is able to draw; missing axis support
/// leaves both axis titles empty.
#[derive(Debug, Clone, Copy)]
struct DrawnLayers {
    axes: bool,
    variables: bool,
    cases: bool,
}

#[derive(Debug, Clone)]
pub struct Biplot {
    components: Components,
    variables: bool,
    cases: bool,
    variance_measure: VarianceMeasure,
    strict: bool,
    arrow_head: ArrowHead,
}

impl Biplot {
    pub fn components(&self) -> Components {
        self.components
    }

    /// Runs validation and derives the loadings, variance labels and, if
    /// requested, the scaled cases.
    pub fn tables<T: FloatOps>(&self, pca: &PcaResult<T>) -> Result<BiplotTables<T>> {
        validate_input(pca, self.components)?;

        let loadings = extract_loadings(pca, self.components);
        let variance = variance_explained(pca, self.components, self.variance_measure);
        let cases = if self.cases {
            Some(scale_cases(pca, self.components, &loadings)?)
        } else {
            None
        };

        debug!(
            "Biplot tables for {:?}: {} variables, {} cases",
            self.components,
            loadings.len(),
            cases.as_ref().map_or(0, CasesTable::len)
        );

        Ok(BiplotTables {
            loadings,
            cases,
            variance,
        })
    }

    /// Builds the chart and hands it to `backend` for composition.
    pub fn plot<T: FloatOps, B: ChartBackend>(
        &self,
        pca: &PcaResult<T>,
        backend: &B,
    ) -> Result<B::Output> {
        let tables = self.tables(pca)?;
        let layers = self.check_capabilities(backend)?;

        let spec = self.assemble(&tables, layers);
        Ok(backend.compose(spec)?)
    }

    /// Returns which parts of the chart the backend can draw.
    fn check_capabilities<B: ChartBackend>(&self, backend: &B) -> Result<DrawnLayers> {
        let mut required = vec![Capability::AxisLabels];
        if self.variables {
            required.push(Capability::ArrowSegments);
        }
        if self.variables || self.cases {
            required.push(Capability::TextLabels);
        }

        let missing: Vec<Capability> = required
            .into_iter()
            .filter(|c| !backend.supports(*c))
            .collect();

        if let Some(&capability) = missing.first() {
            if self.strict {
                return Err(BiplotError::MissingRenderingCapability {
                    backend: backend.name().to_string(),
                    capability,
                });
            }
            for capability in &missing {
                warn!(
                    "Backend '{}' does not support {}, dropping the chart parts that need it",
                    backend.name(),
                    capability
                );
            }
        }

        let has = |c: Capability| !missing.contains(&c);
        Ok(DrawnLayers {
            axes: has(Capability::AxisLabels),
            variables: self.variables
                && has(Capability::ArrowSegments)
                && has(Capability::TextLabels),
            cases: self.cases && has(Capability::TextLabels),
        })
    }

    fn assemble<T: FloatOps>(
        &self,
        tables: &BiplotTables<T>,
        layers: DrawnLayers,
    ) -> ChartSpec {
        let (x_pct, y_pct) = tables.variance;
        let mut spec = if layers.axes {
            ChartSpec::new(
                axis_label(self.components.first(), x_pct),
                axis_label(self.components.second(), y_pct),
            )
        } else {
            ChartSpec::new("", "")
        };

        if layers.variables {
            let loadings = &tables.loadings;
            let tips: Vec<(f64, f64)> = loadings
                .x()
                .iter()
                .zip(loadings.y().iter())
                .map(|(&x, &y)| (to_f64(x), to_f64(y)))
                .collect();
            let origin: Vec<f64> = loadings.origin().iter().map(|&o| to_f64(o)).collect();

            spec.push_layer(Layer::Arrows {
                role: LayerRole::Variables,
                segments: tips
                    .iter()
                    .zip(origin.iter())
                    .map(|(&(x1, y1), &o)| Segment {
                        x0: o,
                        y0: o,
                        x1,
                        y1,
                    })
                    .collect(),
                head: self.arrow_head,
            });
            spec.push_layer(Layer::Labels {
                role: LayerRole::Variables,
                points: label_points(&tips, loadings.names()),
            });
        }

        if layers.cases {
            if let Some(cases) = &tables.cases {
                let points: Vec<(f64, f64)> = cases
                    .x()
                    .iter()
                    .zip(cases.y().iter())
                    .map(|(&x, &y)| (to_f64(x), to_f64(y)))
                    .collect();
                spec.push_layer(Layer::Labels {
                    role: LayerRole::Cases,
                    points: label_points(&points, cases.names()),
                });
            }
        }

        spec
    }
}

fn to_f64<T: FloatOps>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn axis_label<T: FloatOps>(component: usize, pct: T) -> String {
    format!("PC{} ({}%)", component, round_to(to_f64(pct), 2))
}

fn label_points(coords: &[(f64, f64)], names: &[String]) -> Vec<LabelPoint> {
    coords
        .iter()
        .zip(names)
        .map(|(&(x, y), name)| LabelPoint {
            x,
            y,
            text: name.clone(),
        })
        .collect()
}

/// Biplot of components 1 and 2 with arrows and cases, as a [`ChartSpec`].
pub fn biplot<T: FloatOps>(pca: &PcaResult<T>) -> Result<ChartSpec> {
    BiplotBuilder::new().build().plot(pca, &SpecBackend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sample_pca() -> PcaResult<f64> {
        PcaResult::new(
            array![[0.6, -0.2, 0.1], [0.3, 0.8, -0.5], [-0.1, 0.4, 0.9]],
            array![
                [2.0, -1.0, 0.1],
                [-4.0, 0.5, 0.0],
                [1.0, 3.0, -0.2],
                [0.5, -2.5, 0.3]
            ],
            array![2.0, 1.5, 0.5],
        )
        .with_variable_names(["x", "y", "z"])
        .with_observation_names(["a", "b", "c", "d"])
    }

    struct TextOnly;

    impl ChartBackend for TextOnly {
        type Output = usize;

        fn name(&self) -> &str {
            "text-only"
        }

        fn supports(&self, capability: Capability) -> bool {
            capability != Capability::ArrowSegments
        }

        fn compose(&self, spec: ChartSpec) -> anyhow::Result<usize> {
            Ok(spec.layers.len())
        }
    }

    struct NoAxes;

    impl ChartBackend for NoAxes {
        type Output = ChartSpec;

        fn name(&self) -> &str {
            "no-axes"
        }

        fn supports(&self, capability: Capability) -> bool {
            capability != Capability::AxisLabels
        }

        fn compose(&self, spec: ChartSpec) -> anyhow::Result<ChartSpec> {
            Ok(spec)
        }
    }

    struct Failing;

    impl ChartBackend for Failing {
        type Output = ();

        fn name(&self) -> &str {
            "failing"
        }

        fn supports(&self, _capability: Capability) -> bool {
            true
        }

        fn compose(&self, _spec: ChartSpec) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("canvas closed"))
        }
    }

    #[test]
    fn test_default_biplot_layers() {
        init();
        let spec = biplot(&sample_pca()).unwrap();

        assert_eq!(spec.x_axis, "PC1 (50%)");
        assert_eq!(spec.y_axis, "PC2 (37.5%)");
        assert_eq!(spec.layers.len(), 3);

        match &spec.layers[0] {
            Layer::Arrows { segments, .. } => {
                assert_eq!(segments.len(), 3);
                assert!(segments.iter().all(|s| s.x0 == 0.0 && s.y0 == 0.0));
                assert_relative_eq!(segments[1].x1, 0.3);
                assert_relative_eq!(segments[1].y1, 0.8);
            }
            other => panic!("expected arrows, got {:?}", other),
        }
        match &spec.layers[2] {
            Layer::Labels { role, points } => {
                assert_eq!(*role, LayerRole::Cases);
                assert_eq!(points.len(), 4);
                assert_eq!(points[1].text, "b");
                assert_relative_eq!(points[1].x, -0.8, epsilon = 1e-12);
            }
            other => panic!("expected case labels, got {:?}", other),
        }
    }

    #[test]
    fn test_axis_labels_only() {
        let spec = BiplotBuilder::new()
            .variables(false)
            .cases(false)
            .build()
            .plot(&sample_pca(), &SpecBackend)
            .unwrap();

        assert!(spec.layers.is_empty());
        assert_eq!(spec.x_axis, "PC1 (50%)");
    }

    #[test]
    fn test_missing_capability_strict_and_lenient() {
        init();
        let pca = sample_pca();

        let err = BiplotBuilder::new()
            .build()
            .plot(&pca, &TextOnly)
            .unwrap_err();
        assert!(matches!(
            err,
            BiplotError::MissingRenderingCapability {
                capability: Capability::ArrowSegments,
                ..
            }
        ));

        // Only the case labels survive.
        let layers = BiplotBuilder::new()
            .strict(false)
            .build()
            .plot(&pca, &TextOnly)
            .unwrap();
        assert_eq!(layers, 1);

        let layers = BiplotBuilder::new()
            .variables(false)
            .build()
            .plot(&pca, &TextOnly)
            .unwrap();
        assert_eq!(layers, 1);
    }

    #[test]
    fn test_lenient_without_axis_labels_drops_titles() {
        init();
        let pca = sample_pca();

        assert!(matches!(
            BiplotBuilder::new().build().plot(&pca, &NoAxes),
            Err(BiplotError::MissingRenderingCapability {
                capability: Capability::AxisLabels,
                ..
            })
        ));

        let spec = BiplotBuilder::new()
            .strict(false)
            .build()
            .plot(&pca, &NoAxes)
            .unwrap();
        assert_eq!(spec.x_axis, "");
        assert_eq!(spec.y_axis, "");
        assert_eq!(spec.layers.len(), 3);
    }

    #[test]
    fn test_backend_errors_propagate() {
        let err = BiplotBuilder::new()
            .build()
            .plot(&sample_pca(), &Failing)
            .unwrap_err();
        assert!(matches!(err, BiplotError::Backend(_)));
        assert!(err.to_string().contains("canvas closed"));
    }

    #[test]
    fn test_tables_without_cases() {
        let tables = BiplotBuilder::new()
            .cases(false)
            .components(Components::new(2, 3).unwrap())
            .build()
            .tables(&sample_pca())
            .unwrap();

        assert!(tables.cases.is_none());
        assert_eq!(tables.loadings.column_names()[0], "PC2");
        assert_relative_eq!(tables.variance.0, 37.5);
        assert_relative_eq!(tables.variance.1, 12.5);
    }

    #[test]
    fn test_invalid_selection_fails_before_backend() {
        let err = BiplotBuilder::new()
            .components(Components::new(1, 4).unwrap())
            .build()
            .plot(&sample_pca(), &Failing)
            .unwrap_err();
        assert!(matches!(
            err,
            BiplotError::InvalidComponentSelection {
                requested: 4,
                available: 3
            }
        ));
    }
}
