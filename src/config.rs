use crate::deform::{AdjacencyWeight, DeformationPolicy};
use crate::math::falloff::FalloffCurve;
use crate::math::space::DEFAULT_DETERMINANT_EPSILON;

#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub deformation: DeformationPolicy,
    pub falloff_curve: FalloffCurve,
    /// Initial soft-selection radius, in the mesh's local units.
    pub falloff_radius: f32,
    pub min_falloff_radius: f32,
    pub max_falloff_radius: f32,
    /// Relative radius change per wheel notch.
    pub radius_step: f32,
    pub determinant_epsilon: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            deformation: DeformationPolicy::default(),
            falloff_curve: FalloffCurve::default(),
            falloff_radius: 1.0,
            min_falloff_radius: 0.01,
            max_falloff_radius: 100.0,
            radius_step: 0.1,
            determinant_epsilon: DEFAULT_DETERMINANT_EPSILON,
        }
    }
}

impl EditorConfig {
    pub fn with_deformation(mut self, deformation: DeformationPolicy) -> Self {
        self.deformation = deformation;
        self
    }

    pub fn with_connected(self, weight: AdjacencyWeight) -> Self {
        self.with_deformation(DeformationPolicy::Connected { weight })
    }

    pub fn with_falloff(mut self, curve: FalloffCurve, radius: f32) -> Self {
        self.falloff_curve = curve;
        self.falloff_radius = radius;
        self
    }

    pub fn with_radius_limits(mut self, min: f32, max: f32) -> Self {
        self.min_falloff_radius = min.min(max);
        self.max_falloff_radius = max.max(min);
        self
    }

    /// The initial radius, forced into the configured limits.
    pub fn clamped_radius(&self) -> f32 {
        self.falloff_radius
            .clamp(self.min_falloff_radius, self.max_falloff_radius)
    }
}
