//! # Chart Specification
//!
//! Declarative description of a biplot that a plotting backend turns into pixels.
//! The crate never draws anything itself: [`ChartBackend`] is the seam where a
//! caller plugs in whatever renderer they use, and [`SpecBackend`] hands the
//! specification back unchanged.

use std::fmt;

use serde::Serialize;

/// A drawing feature a backend must provide for a given layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Capability {
    AxisLabels,
    TextLabels,
    ArrowSegments,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::AxisLabels => write!(f, "axis labels"),
            Capability::TextLabels => write!(f, "text labels"),
            Capability::ArrowSegments => write!(f, "arrow segments"),
        }
    }
}

/// Which derived table a layer was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayerRole {
    Variables,
    Cases,
}

/// Text placed at a data coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPoint {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Line segment from `(x0, y0)` to `(x1, y1)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Arrowhead drawn at the tip of every segment in a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrowHead {
    /// Length of the head as a fraction of the plot extent.
    pub length: f64,
}

impl Default for ArrowHead {
    fn default() -> Self {
        Self { length: 0.02 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    Labels {
        role: LayerRole,
        points: Vec<LabelPoint>,
    },
    Arrows {
        role: LayerRole,
        segments: Vec<Segment>,
        head: ArrowHead,
    },
}

impl Layer {
    pub fn role(&self) -> LayerRole {
        match self {
            Layer::Labels { role, .. } | Layer::Arrows { role, .. } => *role,
        }
    }

    /// Capability a backend needs to draw this layer.
    pub fn capability(&self) -> Capability {
        match self {
            Layer::Labels { .. } => Capability::TextLabels,
            Layer::Arrows { .. } => Capability::ArrowSegments,
        }
    }
}

/// Complete biplot description: two axis titles and the layers in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub x_axis: String,
    pub y_axis: String,
    pub layers: Vec<Layer>,
}

impl ChartSpec {
    pub fn new(x_axis: impl Into<String>, y_axis: impl Into<String>) -> Self {
        Self {
            x_axis: x_axis.into(),
            y_axis: y_axis.into(),
            layers: Vec::new(),
        }
    }

    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers_with_role(&self, role: LayerRole) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(move |l| l.role() == role)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Rendering collaborator that turns a [`ChartSpec`] into its own chart object.
pub trait ChartBackend {
    type Output;

    fn name(&self) -> &str;

    fn supports(&self, capability: Capability) -> bool;

    fn compose(&self, spec: ChartSpec) -> anyhow::Result<Self::Output>;
}

/// Backend that returns the specification itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecBackend;

impl ChartBackend for SpecBackend {
    type Output = ChartSpec;

    fn name(&self) -> &str {
        "spec"
    }

    fn supports(&self, _capability: Capability) -> bool {
        true
    }

    fn compose(&self, spec: ChartSpec) -> anyhow::Result<ChartSpec> {
        Ok(spec)
    }
}
