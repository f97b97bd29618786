//! Per-frame driver
//!
//! One call to [`FrameDriver::step`] is one displayed frame: advance the clock,
//! let the variant move the population, upload moved particles, drift the
//! camera, apply a pending resize, then render.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use super::clock::AnimationClock;
use crate::error::SceneResult;
use crate::gfx::surface::{FrameView, RenderSurface};
use crate::interaction::InteractionTracker;
use crate::scene::{owner::SceneState, variant::FrameContext};

/// Horizontal drift amplitude and frequency of the idle camera
const DRIFT_X: (f32, f32) = (0.5, 0.5);
const DRIFT_Y: (f32, f32) = (0.3, 0.3);

/// Cloneable handle that ends a running frame loop
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    /// The stop flag was set; nothing was advanced or drawn
    Stopped,
}

#[derive(Debug)]
pub struct FrameDriver {
    clock: AnimationClock,
    stop: StopHandle,
    /// Last resize generation applied to the camera and surface
    applied_resize: u64,
    frames_rendered: u64,
}

impl FrameDriver {
    pub fn new(clock_step: f32, resize_generation: u64) -> Self {
        Self {
            clock: AnimationClock::new(clock_step),
            stop: StopHandle::default(),
            applied_resize: resize_generation,
            frames_rendered: 0,
        }
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn step<S: RenderSurface>(
        &mut self,
        scene: &mut SceneState<S>,
        tracker: &InteractionTracker,
    ) -> SceneResult<FrameOutcome> {
        if self.is_stopped() {
            return Ok(FrameOutcome::Stopped);
        }

        let time = self.clock.advance();
        let input = tracker.snapshot();
        let frame = FrameContext {
            time,
            pointer: input.pointer,
        };

        scene
            .variant
            .update(&mut scene.population, &frame, &mut scene.rng);
        scene.population.sync_clouds(&mut scene.surface)?;

        scene.camera.set_offset(
            (time * DRIFT_X.1).sin() * DRIFT_X.0,
            (time * DRIFT_Y.1).cos() * DRIFT_Y.0,
        );

        if input.resize_generation != self.applied_resize {
            let (width, height) = input.viewport;
            if width > 0 && height > 0 {
                scene.camera.resize_projection(width, height);
                scene.surface.resize(width, height);
                log::debug!("applied resize to {width}x{height}");
            }
            self.applied_resize = input.resize_generation;
        }
        scene.camera.update_view_proj();

        let view = FrameView {
            camera: scene.camera.uniform,
            aspect: scene.camera.aspect,
            draws: scene.population.draw_commands(),
        };
        scene.surface.render(&view)?;
        self.frames_rendered += 1;

        Ok(FrameOutcome::Rendered)
    }

    /// Steps once per display refresh until stopped
    ///
    /// `wait_for_refresh` blocks until the next frame should be drawn and
    /// returns `false` when the host is going away. Returns the number of
    /// frames rendered.
    pub fn run<S: RenderSurface>(
        &mut self,
        scene: &mut SceneState<S>,
        tracker: &InteractionTracker,
        mut wait_for_refresh: impl FnMut() -> bool,
    ) -> SceneResult<usize> {
        let mut frames = 0;
        while !self.is_stopped() && wait_for_refresh() {
            if self.step(scene, tracker)? == FrameOutcome::Rendered {
                frames += 1;
            }
        }
        Ok(frames)
    }
}
