use glam::{Mat4, Vec3};

use crate::scene::SceneParameters;

/// Fixed look-at target of the orbit camera.
pub const LOOK_TARGET: Vec3 = Vec3::new(0.0, 0.5, 0.0);

/// World up vector used by the demo.
///
/// The inverted Y is intentional and must not be "fixed": it flips the image
/// so screen rows match the storage texture's row order.
pub const WORLD_UP: Vec3 = Vec3::new(0.0, -1.0, 0.0);

/// Perspective look-at camera that hands out world-space eye rays.
///
/// `eye_ray` accepts arbitrary NDC coordinates; the demo only samples the
/// four corners (±1, ±1) and lets the compute shader interpolate between
/// them per pixel.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    inv_view_proj: Mat4,
}

impl Camera {
    /// Creates a camera with the demo's frustum (60 degrees, square aspect).
    pub fn new() -> Self {
        let mut camera = Self {
            position: Vec3::new(3.0, 2.0, 7.0),
            target: Vec3::new(0.0, 1.5, 0.0),
            up: WORLD_UP,
            fov_y: 60f32.to_radians(),
            aspect: 1.0,
            near: 1.0,
            far: 2.0,
            inv_view_proj: Mat4::IDENTITY,
        };
        camera.recompute();
        camera
    }

    pub fn set_perspective(&mut self, fov_y_deg: f32, aspect: f32, near: f32, far: f32) {
        self.fov_y = fov_y_deg.to_radians();
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.recompute();
    }

    /// Re-orients the camera. `up` must not be parallel to `target - eye`;
    /// the demo's orbit range never violates this and it is not guarded.
    pub fn set_look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.position = eye;
        self.target = target;
        self.up = up;
        self.recompute();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World-space direction of the ray through the NDC point `(x, y)`.
    ///
    /// The near-plane point is unprojected through the inverse
    /// view-projection and the eye subtracted; the result is deliberately
    /// left unnormalised so corner rays interpolate linearly in the shader.
    pub fn eye_ray(&self, ndc_x: f32, ndc_y: f32) -> Vec3 {
        let near_point = self
            .inv_view_proj
            .project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        near_point - self.position
    }

    fn recompute(&mut self) {
        let view = Mat4::look_at_rh(self.position, self.target, self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect.max(1e-6), self.near, self.far);
        self.inv_view_proj = (proj * view).inverse();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Eye position on the orbit described by the current scene parameters.
pub fn orbit_eye(params: &SceneParameters) -> Vec3 {
    Vec3::new(
        params.rotation_angle.cos() * params.orbit_distance,
        params.orbit_height,
        params.rotation_angle.sin() * params.orbit_distance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_camera() -> Camera {
        let mut camera = Camera::new();
        camera.set_perspective(60.0, 1.0, 1.0, 2.0);
        let params = SceneParameters::default();
        camera.set_look_at(orbit_eye(&params), LOOK_TARGET, WORLD_UP);
        camera
    }

    #[test]
    fn orbit_at_zero_angle_sits_on_x_axis() {
        let mut params = SceneParameters::default();
        params.rotation_angle = 0.0;
        params.orbit_distance = 8.0;
        let eye = orbit_eye(&params);
        assert!((eye.x - 8.0).abs() < 1e-5);
        assert_eq!(eye.y, params.orbit_height);
        assert!(eye.z.abs() < 1e-5);
    }

    #[test]
    fn orbit_at_quarter_turn_sits_on_z_axis() {
        let mut params = SceneParameters::default();
        params.rotation_angle = std::f32::consts::FRAC_PI_2;
        params.orbit_distance = 8.0;
        let eye = orbit_eye(&params);
        assert!(eye.x.abs() < 1e-4);
        assert!((eye.z - 8.0).abs() < 1e-4);
    }

    #[test]
    fn corner_rays_are_distinct() {
        let camera = demo_camera();
        let rays = [
            camera.eye_ray(-1.0, -1.0),
            camera.eye_ray(-1.0, 1.0),
            camera.eye_ray(1.0, -1.0),
            camera.eye_ray(1.0, 1.0),
        ];
        for (i, a) in rays.iter().enumerate() {
            for b in rays.iter().skip(i + 1) {
                assert!((*a - *b).length() > 1e-4);
            }
        }
    }

    #[test]
    fn corner_rays_are_symmetric_about_forward_axis() {
        let camera = demo_camera();
        let forward = (LOOK_TARGET - camera.position()).normalize();
        let normalized: Vec<Vec3> = [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)]
            .iter()
            .map(|&(x, y)| camera.eye_ray(x, y).normalize())
            .collect();

        // Every corner makes the same angle with the forward axis, and the
        // four directions average out to the forward axis itself.
        let reference = normalized[0].dot(forward);
        for ray in &normalized {
            assert!((ray.dot(forward) - reference).abs() < 1e-4);
        }
        let mean = (normalized[0] + normalized[1] + normalized[2] + normalized[3]) / 4.0;
        assert!(mean.normalize().cross(forward).length() < 1e-4);
    }
}
