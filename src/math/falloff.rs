use std::f32::consts::PI;

/// Shape of the soft-selection weight curve. Every variant is 1 at the
/// center, 0 at and beyond the radius, and never increases in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FalloffCurve {
    /// `(1 - (d/r)^2)^2`
    #[default]
    Smooth,
    /// `0.5 * (1 + cos(pi * d/r))`
    RaisedCosine,
    Linear,
}

impl FalloffCurve {
    pub fn weight(self, distance: f32, radius: f32) -> f32 {
        let distance = distance.max(0.0);

        if radius <= 0.0 || !radius.is_finite() {
            return if distance == 0.0 { 1.0 } else { 0.0 };
        }

        if distance >= radius {
            return 0.0;
        }

        let t = distance / radius;
        let weight = match self {
            FalloffCurve::Smooth => {
                let s = 1.0 - t * t;
                s * s
            }
            FalloffCurve::RaisedCosine => 0.5 * (1.0 + (PI * t).cos()),
            FalloffCurve::Linear => 1.0 - t,
        };

        weight.clamp(0.0, 1.0)
    }
}

pub fn falloff_weight(distance: f32, radius: f32) -> f32 {
    FalloffCurve::default().weight(distance, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [FalloffCurve; 3] = [
        FalloffCurve::Smooth,
        FalloffCurve::RaisedCosine,
        FalloffCurve::Linear,
    ];
    const RADII: [f32; 5] = [0.01, 0.5, 1.0, 3.0, 250.0];

    #[test]
    fn one_at_center() {
        for curve in CURVES {
            for radius in RADII {
                assert_eq!(curve.weight(0.0, radius), 1.0, "{curve:?} r={radius}");
            }
        }
    }

    #[test]
    fn zero_at_and_beyond_radius() {
        for curve in CURVES {
            for radius in RADII {
                assert_eq!(curve.weight(radius, radius), 0.0, "{curve:?} r={radius}");
                assert_eq!(curve.weight(radius * 1.5, radius), 0.0);
            }
        }
    }

    #[test]
    fn non_increasing_inside_radius() {
        for curve in CURVES {
            for radius in RADII {
                let mut previous = curve.weight(0.0, radius);
                for step in 1..=200 {
                    let distance = radius * step as f32 / 200.0;
                    let weight = curve.weight(distance, radius);
                    assert!(
                        weight <= previous,
                        "{curve:?} r={radius} increased at d={distance}"
                    );
                    assert!((0.0..=1.0).contains(&weight));
                    previous = weight;
                }
            }
        }
    }

    #[test]
    fn continuous_at_boundary() {
        for curve in CURVES {
            let just_inside = curve.weight(0.9999, 1.0);
            assert!(just_inside < 1e-3, "{curve:?} jumps at the radius: {just_inside}");
        }
    }

    #[test]
    fn smooth_is_the_default_shape() {
        let expected = (1.0f32 - 0.25).powi(2);
        assert!((falloff_weight(0.5, 1.0) - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_radius_only_keeps_the_center() {
        assert_eq!(falloff_weight(0.0, 0.0), 1.0);
        assert_eq!(falloff_weight(0.1, 0.0), 0.0);
    }
}
