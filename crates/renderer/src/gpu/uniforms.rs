use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::camera::Camera;
use crate::scene::SceneParameters;

/// CPU-side mirror of the compute shader's uniform block.
///
/// The layout must match the std140 `SceneParams` block in the GLSL source.
/// Everything is packed into vec4 slots so std140 padding rules cannot bite:
/// directions occupy xyz with an unused w, `light` is
/// (x, height, z, intensity) and `misc` is (exposure, time, 0, 0).
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct SceneUniforms {
    eye: [f32; 4],
    ray00: [f32; 4],
    ray01: [f32; 4],
    ray10: [f32; 4],
    ray11: [f32; 4],
    light: [f32; 4],
    misc: [f32; 4],
}

unsafe impl Zeroable for SceneUniforms {}
unsafe impl Pod for SceneUniforms {}

fn pack(v: Vec3) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

impl SceneUniforms {
    pub fn new() -> Self {
        Self {
            eye: [0.0; 4],
            ray00: [0.0; 4],
            ray01: [0.0; 4],
            ray10: [0.0; 4],
            ray11: [0.0; 4],
            light: [0.0; 4],
            misc: [0.0; 4],
        }
    }

    /// Rebuilds the block from the per-frame parameter snapshot and the
    /// already-oriented camera.
    pub fn update(&mut self, params: &SceneParameters, camera: &Camera) {
        self.eye = pack(camera.position());
        self.ray00 = pack(camera.eye_ray(-1.0, -1.0));
        self.ray01 = pack(camera.eye_ray(-1.0, 1.0));
        self.ray10 = pack(camera.eye_ray(1.0, -1.0));
        self.ray11 = pack(camera.eye_ray(1.0, 1.0));
        self.light = [
            params.light_x,
            params.light_height,
            params.light_z,
            params.intensity,
        ];
        self.misc = [params.exposure, params.time, 0.0, 0.0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{orbit_eye, LOOK_TARGET, WORLD_UP};

    #[test]
    fn block_is_seven_vec4s() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 7 * 16);
        assert_eq!(std::mem::align_of::<SceneUniforms>(), 16);
    }

    #[test]
    fn update_mirrors_scene_state() {
        let mut params = SceneParameters::default();
        params.light_x = 1.5;
        params.light_height = 4.0;
        params.light_z = -2.0;
        params.intensity = 3.0;
        params.exposure = 2.5;
        params.time = 0.42;

        let mut camera = Camera::new();
        camera.set_look_at(orbit_eye(&params), LOOK_TARGET, WORLD_UP);

        let mut uniforms = SceneUniforms::new();
        uniforms.update(&params, &camera);

        let eye = camera.position();
        assert_eq!(uniforms.eye, [eye.x, eye.y, eye.z, 0.0]);
        assert_eq!(uniforms.light, [1.5, 4.0, -2.0, 3.0]);
        assert_eq!(uniforms.misc, [2.5, 0.42, 0.0, 0.0]);
        assert_ne!(uniforms.ray00, uniforms.ray11);
    }
}
