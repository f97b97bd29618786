use super::camera_utils::{Camera, CameraUniform};
use crate::config::CameraConfig;
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective camera looking down -z that drifts in the XY plane.
///
/// The camera never turns: moving it shifts the eye and the target together,
/// so the whole scene slides under a fixed view direction.
#[derive(Debug, Clone, Copy)]
pub struct DriftCamera {
    pub eye: Point3<f32>,
    pub up: Vector3<f32>,
    pub distance: f32,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for DriftCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl DriftCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            eye: Point3::new(0.0, 0.0, config.distance),
            up: Vector3::unit_y(),
            distance: config.distance,
            aspect,
            fovy: Rad::from(Deg(config.fov_degrees)),
            znear: config.znear,
            zfar: config.zfar,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    /// Moves the camera to `(x, y)` at its fixed distance
    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.eye = Point3::new(x, y, self.distance);
    }

    pub fn target(&self) -> Point3<f32> {
        self.eye - Vector3::unit_z()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target(), self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// A zero-height viewport keeps the previous aspect ratio
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view = self.view_matrix().into();
        self.uniform.proj = self.projection_matrix().into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = DriftCamera::new(&CameraConfig::default(), 800.0 / 600.0);
        camera.resize_projection(1024, 768);
        assert_relative_eq!(camera.aspect, 1024.0 / 768.0);

        camera.resize_projection(1024, 0);
        assert_relative_eq!(camera.aspect, 1024.0 / 768.0);
    }

    #[test]
    fn test_offset_keeps_view_direction() {
        let mut camera = DriftCamera::new(&CameraConfig::default(), 1.0);
        camera.set_offset(0.5, -0.3);
        camera.update_view_proj();

        let forward = camera.target() - camera.eye;
        assert_relative_eq!(forward.x, 0.0);
        assert_relative_eq!(forward.y, 0.0);
        assert_relative_eq!(forward.z, -1.0);
        assert_eq!(camera.uniform.view_position, [0.5, -0.3, 12.0, 1.0]);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = DriftCamera::new(&CameraConfig::default(), 4.0 / 3.0);
        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
