/// How strongly a neighbor of the dragged vertex follows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjacencyWeight {
    Fixed(f32),
    /// `1 / (1 + d)` with `d` the drag-start distance to the dragged vertex.
    InverseDistance,
}

impl AdjacencyWeight {
    pub fn weight(self, distance: f32) -> f32 {
        match self {
            AdjacencyWeight::Fixed(weight) => weight,
            AdjacencyWeight::InverseDistance => 1.0 / (1.0 + distance.max(0.0)),
        }
    }
}

impl Default for AdjacencyWeight {
    fn default() -> Self {
        AdjacencyWeight::InverseDistance
    }
}

/// Which vertices a drag moves, and by how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeformationPolicy {
    /// Only the dragged vertex moves.
    Direct,
    /// The dragged vertex moves fully, its triangle neighbors partially.
    Connected { weight: AdjacencyWeight },
    /// Every vertex moves by the falloff weight of its drag-start distance
    /// to the dragged vertex.
    SoftSelection,
}

impl DeformationPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            DeformationPolicy::Direct => "Direct",
            DeformationPolicy::Connected { .. } => "Connected",
            DeformationPolicy::SoftSelection => "Soft selection",
        }
    }
}

impl Default for DeformationPolicy {
    fn default() -> Self {
        DeformationPolicy::SoftSelection
    }
}
