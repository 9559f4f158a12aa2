//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph. The runtime is
//! 2D, but matrices are full 4x4 so they can be handed to a renderer as-is.

pub use nalgebra::{Matrix4, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with the 2D constructors the scene needs
pub trait Mat4Ext {
    /// Create a rotation matrix around the Z axis (counter-clockwise, radians)
    fn rotation_z(angle: f32) -> Mat4;

    /// Translate(x, y, 0) * RotateZ(angle) * Scale(sx, sy, 1)
    fn trs_2d(position: &Vec2, angle: f32, scale: &Vec2) -> Mat4;

    /// OpenGL-style orthographic projection (depth mapped to [-1, 1])
    ///
    /// Degenerate extents produce non-finite entries instead of panicking.
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn trs_2d(position: &Vec2, angle: f32, scale: &Vec2) -> Mat4 {
        Mat4::new_translation(&Vec3::new(position.x, position.y, 0.0))
            * Self::rotation_z(angle)
            * Mat4::new_nonuniform_scaling(&Vec3::new(scale.x, scale.y, 1.0))
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let mut result = Mat4::identity();

        result[(0, 0)] = 2.0 / (right - left);
        result[(1, 1)] = 2.0 / (top - bottom);
        result[(2, 2)] = -2.0 / (far - near);
        result[(0, 3)] = -(right + left) / (right - left);
        result[(1, 3)] = -(top + bottom) / (top - bottom);
        result[(2, 3)] = -(far + near) / (far - near);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_z_quarter_turn() {
        let rotated = Mat4::rotation_z(constants::PI / 2.0).transform_vector(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(rotated, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_trs_applies_scale_before_translation() {
        let m = Mat4::trs_2d(&Vec2::new(5.0, 1.0), 0.0, &Vec2::new(2.0, 3.0));
        let p = m.transform_point(&nalgebra::Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(p, nalgebra::Point3::new(7.0, 4.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_maps_extents_to_ndc() {
        let m = Mat4::orthographic(-4.0, 4.0, -2.0, 2.0, -1.0, 1.0);
        let corner = m.transform_point(&nalgebra::Point3::new(4.0, 2.0, 0.0));
        assert_relative_eq!(corner, nalgebra::Point3::new(1.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_degree_conversion() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI);
        assert_relative_eq!(utils::rad_to_deg(constants::PI / 2.0), 90.0);
    }
}
