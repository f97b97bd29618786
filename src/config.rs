//! Scene configuration
//!
//! Object counts, camera setup and animation stepping for a scene. Every field
//! has a default matching the stock background; the `with_*` methods follow the
//! builder style used across the crate.

use crate::scene::variant::VariantKind;

/// Perspective camera parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Distance from the origin along +z
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            distance: 12.0,
        }
    }
}

/// Configuration for building and animating a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub variant: VariantKind,
    pub panel_count: usize,
    pub node_count: usize,
    /// Probability that any given pair of nodes gets an edge
    pub edge_probability: f64,
    pub stream_count: usize,
    pub rain_count: usize,
    pub cube_count: usize,
    pub torus_count: usize,
    pub star_count: usize,
    /// Clock increment per rendered frame
    pub clock_step: f32,
    /// Fixed RNG seed; `None` draws a fresh seed from the OS on every activation
    pub seed: Option<u64>,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            variant: VariantKind::Network,
            panel_count: 12,
            node_count: 20,
            edge_probability: 0.3,
            stream_count: 500,
            rain_count: 200,
            cube_count: 8,
            torus_count: 5,
            star_count: 300,
            clock_step: 0.01,
            seed: None,
            camera: CameraConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn with_variant(mut self, variant: VariantKind) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the network variant's object counts
    pub fn with_network_counts(mut self, panels: usize, nodes: usize) -> Self {
        self.panel_count = panels;
        self.node_count = nodes;
        self
    }

    /// Sets the network variant's particle counts
    pub fn with_particle_counts(mut self, stream: usize, rain: usize) -> Self {
        self.stream_count = stream;
        self.rain_count = rain;
        self
    }

    /// Clamped to [0, 1]; NaN disables edges
    pub fn with_edge_probability(mut self, probability: f64) -> Self {
        self.edge_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_clock_step(mut self, step: f32) -> Self {
        self.clock_step = step;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }
}
