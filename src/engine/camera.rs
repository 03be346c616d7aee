// First-person camera orientation
//
// Camera model:
//   - Two angles in radians: horizontal (yaw around +Y) and vertical (pitch)
//   - Direction/right/up are derived on every query, never cached, because
//     the angles change every frame from mouse input
//   - horizontal = 0, vertical = 0 looks along +Z with +Y up

use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy)]
pub struct FpsCamera {
    /// Rotation around the world Y axis in radians.
    pub horizontal_angle: f32,

    /// Elevation in radians (positive looks up). Not clamped.
    pub vertical_angle: f32,

    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for FpsCamera {
    fn default() -> Self {
        Self::new(0.0, 0.0, 45.0)
    }
}

impl FpsCamera {
    pub fn new(horizontal_angle: f32, vertical_angle: f32, fov: f32) -> Self {
        Self {
            horizontal_angle,
            vertical_angle,
            fov,
        }
    }

    /// Unit look direction.
    pub fn direction(&self) -> Vec3 {
        let (h, v) = (self.horizontal_angle, self.vertical_angle);
        Vec3::new(v.cos() * h.sin(), v.sin(), v.cos() * h.cos())
    }

    /// Unit right vector, always in the horizontal plane.
    pub fn right(&self) -> Vec3 {
        let h = self.horizontal_angle - FRAC_PI_2;
        Vec3::new(h.sin(), 0.0, h.cos())
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.direction())
    }

    /// View matrix for an eye placed at `eye`, looking along `direction()`.
    pub fn view_matrix(&self, eye: Vec3) -> Mat4 {
        Mat4::look_at_rh(eye, eye + self.direction(), self.up())
    }

    /// Perspective projection. `near` is the player's collider radius in the game.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, near, far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_camera_looks_down_positive_z() {
        let cam = FpsCamera::default();
        assert_abs_diff_eq!(cam.direction().z, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.right().x, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.up().y, 1.0, epsilon = 1e-6);
        assert_eq!(cam.fov, 45.0);
    }

    #[test]
    fn direction_and_right_are_orthogonal() {
        for h in -12..=12 {
            for v in -12..=12 {
                let cam = FpsCamera::new(h as f32 * 0.37, v as f32 * 0.29, 45.0);
                assert_abs_diff_eq!(cam.direction().dot(cam.right()), 0.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn basis_vectors_are_unit_length() {
        let cam = FpsCamera::new(1.1, -0.4, 60.0);
        assert_abs_diff_eq!(cam.direction().length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cam.right().length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cam.up().length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cam.up().dot(cam.direction()), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn angles_are_read_on_every_query() {
        let mut cam = FpsCamera::default();
        let before = cam.direction();
        cam.horizontal_angle += FRAC_PI_2;
        let after = cam.direction();
        assert_abs_diff_eq!(before.z, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(after.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let cam = FpsCamera::new(0.3, 0.2, 45.0);
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let p = cam.view_matrix(eye).transform_point3(eye);
        assert_abs_diff_eq!(p.length(), 0.0, epsilon = 1e-5);
    }
}
