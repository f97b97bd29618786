pub mod camera_utils;
pub mod drift_camera;

// Re-export main types
pub use camera_utils::{Camera, CameraUniform};
pub use drift_camera::DriftCamera;
