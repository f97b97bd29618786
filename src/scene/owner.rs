//! # Scene ownership
//!
//! [`SceneOwner`] is the single owner of an active scene: the rendering
//! surface, every resource handle allocated on it, the population and the frame
//! driver. Teardown always runs in the same order (stop the driver, drop the
//! population, release every handle, drop the surface) and runs at most once.
//!
//! ## Usage
//!
//! ```rust
//! use codescape::{gfx::HeadlessSurface, SceneConfig, SceneOwner};
//!
//! let mut owner = SceneOwner::new(SceneConfig::default().with_seed(7));
//! owner.activate(HeadlessSurface::new(800, 600)).unwrap();
//! assert!(owner.frame());
//! owner.deactivate();
//! assert!(!owner.frame());
//! ```

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use super::{objects::Population, registry::ResourceRegistry, variant::SceneVariant};
use crate::animation::{AnimationClock, FrameDriver, FrameOutcome, StopHandle};
use crate::config::SceneConfig;
use crate::error::SceneResult;
use crate::gfx::{
    camera::DriftCamera,
    surface::{RenderSurface, ResourceId},
};
use crate::interaction::InteractionTracker;

/// Everything a running scene is made of
pub struct SceneState<S> {
    pub(crate) surface: S,
    pub(crate) variant: Box<dyn SceneVariant>,
    pub(crate) population: Population,
    /// Handles owned by this scene, in allocation order
    pub(crate) resources: Vec<ResourceId>,
    pub(crate) camera: DriftCamera,
    pub(crate) rng: StdRng,
}

impl<S: RenderSurface> SceneState<S> {
    /// Bootstraps the configured variant on `surface`
    ///
    /// On failure every resource allocated so far has been released and the
    /// surface is dropped.
    pub fn new(mut surface: S, config: &SceneConfig) -> SceneResult<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let variant = config.variant.create();

        let (population, resources) = {
            let mut registry = ResourceRegistry::new(&mut surface);
            let population = variant.bootstrap(config, &mut registry, &mut rng)?;
            (population, registry.commit())
        };

        let (width, height) = surface.size();
        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };

        Ok(Self {
            surface,
            variant,
            population,
            resources,
            camera: DriftCamera::new(&config.camera, aspect),
            rng,
        })
    }
}

struct ActiveScene<S> {
    driver: FrameDriver,
    state: SceneState<S>,
}

pub struct SceneOwner<S: RenderSurface> {
    config: SceneConfig,
    tracker: Arc<InteractionTracker>,
    active: Option<ActiveScene<S>>,
}

impl<S: RenderSurface> SceneOwner<S> {
    pub fn new(config: SceneConfig) -> Self {
        Self::with_tracker(config, Arc::new(InteractionTracker::default()))
    }

    /// Uses an existing tracker, typically one already fed by window events
    pub fn with_tracker(config: SceneConfig, tracker: Arc<InteractionTracker>) -> Self {
        Self {
            config,
            tracker,
            active: None,
        }
    }

    /// Builds a scene on `surface` and starts driving it
    ///
    /// A scene that is already active is torn down first. If the bootstrap
    /// fails the owner stays inactive and nothing is leaked.
    pub fn activate(&mut self, surface: S) -> SceneResult<()> {
        self.deactivate();

        let (width, height) = surface.size();
        let state = SceneState::new(surface, &self.config)?;
        self.tracker.set_viewport(width, height);
        let driver = FrameDriver::new(self.config.clock_step, self.tracker.resize_generation());

        let stats = state.population.stats();
        log::info!(
            "activated {} scene at {width}x{height}: {} objects, {} edges, {} points, {} resources",
            state.variant.name(),
            stats.objects,
            stats.edges,
            stats.points,
            state.resources.len()
        );

        self.active = Some(ActiveScene { driver, state });
        Ok(())
    }

    /// Stops the driver and frees every resource of the active scene
    ///
    /// Does nothing when no scene is active, so it is safe to call repeatedly.
    pub fn deactivate(&mut self) {
        let Some(ActiveScene { driver, state }) = self.active.take() else {
            return;
        };
        driver.stop();

        let SceneState {
            mut surface,
            variant,
            population,
            resources,
            ..
        } = state;
        drop(population);

        let mut released = 0;
        for resource in resources.into_iter().rev() {
            match surface.release(resource) {
                Ok(()) => released += 1,
                Err(e) => log::warn!("failed to release {resource:?}: {e}"),
            }
        }
        drop(surface);

        log::info!(
            "deactivated {} scene after {} frames, released {released} resources",
            variant.name(),
            driver.frames_rendered()
        );
    }

    /// Draws one frame; `false` once the scene is inactive or stopped
    ///
    /// A render failure tears the scene down.
    pub fn frame(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        match active.driver.step(&mut active.state, &self.tracker) {
            Ok(FrameOutcome::Rendered) => true,
            Ok(FrameOutcome::Stopped) => false,
            Err(e) => {
                log::warn!("frame failed, deactivating scene: {e}");
                self.deactivate();
                false
            }
        }
    }

    /// Drives frames until stopped or until `wait_for_refresh` returns `false`
    ///
    /// Returns the number of frames rendered.
    pub fn run(&mut self, wait_for_refresh: impl FnMut() -> bool) -> usize {
        let Some(active) = self.active.as_mut() else {
            return 0;
        };
        let before = active.driver.frames_rendered();

        match active
            .driver
            .run(&mut active.state, &self.tracker, wait_for_refresh)
        {
            Ok(frames) => frames,
            Err(e) => {
                let frames = active.driver.frames_rendered() - before;
                log::warn!("frame failed, deactivating scene: {e}");
                self.deactivate();
                frames as usize
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn tracker(&self) -> &Arc<InteractionTracker> {
        &self.tracker
    }

    pub fn stop_handle(&self) -> Option<StopHandle> {
        self.active.as_ref().map(|active| active.driver.stop_handle())
    }

    pub fn population(&self) -> Option<&Population> {
        self.active.as_ref().map(|active| &active.state.population)
    }

    pub fn population_mut(&mut self) -> Option<&mut Population> {
        self.active.as_mut().map(|active| &mut active.state.population)
    }

    pub fn camera(&self) -> Option<&DriftCamera> {
        self.active.as_ref().map(|active| &active.state.camera)
    }

    pub fn clock(&self) -> Option<&AnimationClock> {
        self.active.as_ref().map(|active| active.driver.clock())
    }

    pub fn surface(&self) -> Option<&S> {
        self.active.as_ref().map(|active| &active.state.surface)
    }
}

impl<S: RenderSurface> Drop for SceneOwner<S> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::gfx::{rendering::HeadlessSurface, surface::DrawCommand};
    use crate::scene::{
        network::{NODE_PULSE, RAIN_FLOOR, RAIN_HALF_WIDTH, RAIN_TOP, STREAM_FLOOR},
        objects::{CloudKind, ObjectKind},
        variant::VariantKind,
    };
    use approx::assert_relative_eq;

    fn seeded() -> SceneConfig {
        SceneConfig::default().with_seed(2024)
    }

    #[test]
    fn test_hundred_frames_without_pointer() {
        let mut surface = HeadlessSurface::new(800, 600);
        let mut owner = SceneOwner::new(seeded());
        owner.activate(&mut surface).unwrap();

        let start: Vec<f32> = owner
            .population()
            .unwrap()
            .objects_of(ObjectKind::CodePanel)
            .map(|panel| panel.rotation.x)
            .collect();
        assert_eq!(start.len(), 12);

        for _ in 0..100 {
            assert!(owner.frame());
            for node in owner.population().unwrap().objects_of(ObjectKind::NetworkNode) {
                assert!(node.scale >= 1.0 - NODE_PULSE - 1e-6);
                assert!(node.scale <= 1.0 + NODE_PULSE + 1e-6);
            }
        }

        let population = owner.population().unwrap();
        for (panel, x0) in population.objects_of(ObjectKind::CodePanel).zip(&start) {
            let expected = x0 + 100.0 * (0.005 + panel.index as f32 * 0.001);
            assert_relative_eq!(panel.rotation.x, expected, epsilon = 1e-4);
        }
        assert_eq!(owner.clock().unwrap().frames(), 100);

        drop(owner);
        assert_eq!(surface.frames_rendered(), 100);
        assert_eq!(surface.live_resources(), 0);
    }

    #[test]
    fn test_particle_invariants_over_frames() {
        let mut owner = SceneOwner::new(seeded());
        owner.activate(HeadlessSurface::new(800, 600)).unwrap();

        let stream_start = owner
            .population()
            .unwrap()
            .cloud(CloudKind::DataStream)
            .unwrap()
            .points
            .clone();

        for _ in 0..300 {
            owner.frame();
            let population = owner.population().unwrap();

            let stream = population.cloud(CloudKind::DataStream).unwrap();
            for (point, original) in stream.points.iter().zip(&stream_start) {
                assert!(point.position[1] >= STREAM_FLOOR);
                assert_eq!(point.position[0], original.position[0]);
                assert_eq!(point.position[2], original.position[2]);
            }

            let rain = population.cloud(CloudKind::BinaryRain).unwrap();
            for point in &rain.points {
                assert!(point.position[1] >= RAIN_FLOOR && point.position[1] <= RAIN_TOP + 5.0);
                assert!(point.position[0].abs() <= RAIN_HALF_WIDTH);
            }
        }
    }

    #[test]
    fn test_uploaded_points_follow_population() {
        let mut owner = SceneOwner::new(seeded());
        owner.activate(HeadlessSurface::new(800, 600)).unwrap();
        owner.frame();
        owner.frame();

        let population = owner.population().unwrap();
        let surface = owner.surface().unwrap();
        for cloud in &population.clouds {
            assert_eq!(surface.points(cloud.buffer).unwrap(), cloud.points.as_slice());
        }
    }

    #[test]
    fn test_moving_nodes_keeps_edges() {
        let mut owner = SceneOwner::new(seeded().with_edge_probability(0.5));
        owner.activate(HeadlessSurface::new(800, 600)).unwrap();
        let edges = owner.population().unwrap().edges.clone();
        assert!(edges.len() <= 190);

        for node in owner
            .population_mut()
            .unwrap()
            .objects_of_mut(ObjectKind::NetworkNode)
        {
            node.position.x += 3.0;
        }
        owner.frame();

        assert_eq!(owner.population().unwrap().edges, edges);
    }

    #[test]
    fn test_deactivate_twice_is_noop() {
        let mut surface = HeadlessSurface::new(800, 600);
        let mut owner = SceneOwner::new(seeded());
        owner.activate(&mut surface).unwrap();
        owner.frame();

        owner.deactivate();
        owner.deactivate();
        assert!(!owner.is_active());
        assert!(!owner.frame());
        assert_eq!(owner.run(|| true), 0);

        drop(owner);
        assert_eq!(surface.live_resources(), 0);
        assert_eq!(surface.total_releases(), surface.total_allocations());
        assert_eq!(surface.frames_rendered(), 1);
    }

    #[test]
    fn test_deactivate_before_activate() {
        let mut owner: SceneOwner<HeadlessSurface> = SceneOwner::new(seeded());
        owner.deactivate();
        assert!(!owner.is_active());
        assert!(owner.population().is_none());
    }

    #[test]
    fn test_activate_replaces_previous_scene() {
        let mut first = HeadlessSurface::new(800, 600);
        let mut second = HeadlessSurface::new(640, 480);
        {
            let mut owner = SceneOwner::new(seeded());
            owner.activate(&mut first).unwrap();
            owner.frame();
            owner.activate(&mut second).unwrap();
            assert_eq!(owner.clock().unwrap().frames(), 0);
            owner.frame();
            assert_eq!(owner.tracker().viewport(), (640, 480));
        }

        assert_eq!(first.live_resources(), 0);
        assert_eq!(first.frames_rendered(), 1);
        assert_eq!(second.live_resources(), 0);
        assert_relative_eq!(second.last_frame().unwrap().aspect, 640.0 / 480.0);
    }

    #[test]
    fn test_nan_edge_probability_builds_no_edges() {
        let mut config = seeded();
        config.edge_probability = f64::NAN;
        let mut owner = SceneOwner::new(config);

        owner.activate(HeadlessSurface::new(800, 600)).unwrap();
        let population = owner.population().unwrap();
        assert!(population.edges.is_empty());
        assert!(population.edge_lines.is_none());
        assert!(owner.frame());
    }

    #[test]
    fn test_failed_bootstrap_leaks_nothing() {
        let mut surface = HeadlessSurface::new(800, 600).with_allocation_limit(5);
        let mut owner = SceneOwner::new(seeded());

        let result = owner.activate(&mut surface);
        assert!(matches!(result, Err(SceneError::ResourceExhausted { .. })));
        assert!(!owner.is_active());
        assert!(!owner.frame());

        drop(owner);
        assert_eq!(surface.total_allocations(), 5);
        assert_eq!(surface.live_resources(), 0);
    }

    #[test]
    fn test_resize_changes_aspect() {
        let mut surface = HeadlessSurface::new(800, 600);
        {
            let mut owner = SceneOwner::new(seeded());
            owner.activate(&mut surface).unwrap();
            owner.tracker().on_resize(1024, 768);
            assert!(owner.frame());
            assert_relative_eq!(owner.camera().unwrap().aspect, 1024.0 / 768.0);
        }

        assert_eq!(surface.size(), (1024, 768));
        assert_relative_eq!(surface.last_frame().unwrap().aspect, 1024.0 / 768.0);
    }

    #[test]
    fn test_pointer_reaches_panels() {
        let mut owner = SceneOwner::new(seeded().with_particle_counts(0, 0));
        owner.activate(HeadlessSurface::new(1000, 800)).unwrap();
        let before: Vec<f32> = owner
            .population()
            .unwrap()
            .objects_of(ObjectKind::CodePanel)
            .map(|panel| panel.position.x)
            .collect();

        owner.tracker().on_pointer_move(1000.0, 400.0);
        owner.frame();

        let population = owner.population().unwrap();
        for (panel, x0) in population.objects_of(ObjectKind::CodePanel).zip(&before) {
            assert!(panel.position.x > *x0);
        }
    }

    #[test]
    fn test_stop_handle_ends_run() {
        let mut owner = SceneOwner::new(seeded());
        owner.activate(HeadlessSurface::new(800, 600)).unwrap();
        let stop = owner.stop_handle().unwrap();

        let mut refreshes = 0;
        let frames = owner.run(|| {
            refreshes += 1;
            if refreshes > 10 {
                stop.stop();
            }
            true
        });

        assert_eq!(frames, 10);
        assert!(!owner.frame());
        assert!(owner.is_active());
    }

    #[test]
    fn test_draws_cover_population() {
        let mut owner = SceneOwner::new(seeded().with_edge_probability(1.0));
        owner.activate(HeadlessSurface::new(800, 600)).unwrap();
        owner.frame();

        let draws = &owner.surface().unwrap().last_frame().unwrap().draws;
        let meshes = draws
            .iter()
            .filter(|draw| matches!(draw, DrawCommand::Mesh { .. }))
            .count();
        let lines = draws
            .iter()
            .filter(|draw| matches!(draw, DrawCommand::Lines { .. }))
            .count();
        let points = draws
            .iter()
            .filter(|draw| matches!(draw, DrawCommand::Points { .. }))
            .count();
        assert_eq!((meshes, lines, points), (32, 1, 2));
    }

    #[test]
    fn test_geometric_variant_activation() {
        let mut surface = HeadlessSurface::new(800, 600);
        {
            let mut owner = SceneOwner::new(seeded().with_variant(VariantKind::Geometric));
            owner.activate(&mut surface).unwrap();
            for _ in 0..10 {
                assert!(owner.frame());
            }

            let population = owner.population().unwrap();
            assert_eq!(population.objects_of(ObjectKind::Cube).count(), 8);
            assert_eq!(population.objects_of(ObjectKind::Torus).count(), 5);
            assert!(population.cloud(CloudKind::Starfield).is_some());
        }
        assert_eq!(surface.live_resources(), 0);
        assert_eq!(surface.frames_rendered(), 10);
    }
}
