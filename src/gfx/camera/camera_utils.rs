use cgmath::{Matrix4, SquareMatrix};

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// World to view space. Particle quads are expanded in view space.
    pub view: [[f32; 4]; 4],

    /// View to clip space.
    pub proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0, 0.0, 0.0, 1.0],
            view: Matrix4::identity().into(),
            proj: Matrix4::identity().into(),
        }
    }
}
