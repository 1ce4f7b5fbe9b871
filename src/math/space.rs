use glam::{Mat4, Vec3};

use crate::error::{Result, SceneError};

/// Determinants at or below this magnitude are treated as non-invertible.
pub const DEFAULT_DETERMINANT_EPSILON: f32 = 1e-12;

/// Converts a world-space point into the local space of an object whose
/// world transform is `world_matrix`.
pub fn to_local(world_point: Vec3, world_matrix: &Mat4) -> Result<Vec3> {
    to_local_with_epsilon(world_point, world_matrix, DEFAULT_DETERMINANT_EPSILON)
}

pub fn to_local_with_epsilon(world_point: Vec3, world_matrix: &Mat4, epsilon: f32) -> Result<Vec3> {
    let determinant = world_matrix.determinant();
    if !determinant.is_finite() || determinant.abs() <= epsilon {
        return Err(SceneError::DegenerateTransform);
    }

    let local = world_matrix.inverse().transform_point3(world_point);
    if !local.is_finite() {
        return Err(SceneError::DegenerateTransform);
    }

    Ok(local)
}

pub fn to_world(local_point: Vec3, world_matrix: &Mat4) -> Vec3 {
    world_matrix.transform_point3(local_point)
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn identity_is_passthrough() {
        let p = Vec3::new(1.0, -2.0, 3.5);
        assert_eq!(to_local(p, &Mat4::IDENTITY).unwrap(), p);
    }

    #[test]
    fn inverts_translation_rotation_and_scale() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 0.5),
            Quat::from_rotation_y(0.7),
            Vec3::new(10.0, 0.0, -4.0),
        );
        let local = Vec3::new(0.3, 1.2, -0.8);
        let world = to_world(local, &matrix);

        let back = to_local(world, &matrix).unwrap();
        assert!(back.abs_diff_eq(local, 1e-5), "{back:?} != {local:?}");
    }

    #[test]
    fn zero_scale_is_degenerate() {
        let matrix = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(
            to_local(Vec3::ONE, &matrix),
            Err(SceneError::DegenerateTransform)
        );
    }

    #[test]
    fn nan_matrix_is_degenerate() {
        let matrix = Mat4::from_translation(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(to_local(Vec3::ONE, &matrix).is_err());
    }
}
