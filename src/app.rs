use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::SceneConfig,
    error::SceneResult,
    gfx::{RenderSurface, WgpuSurface},
    interaction::InteractionTracker,
    scene::SceneOwner,
};

/// Window host for the animated background
///
/// Opens a window, binds a [`WgpuSurface`] to it and draws one frame per
/// redraw. Without a usable GPU the window stays blank and the scene is
/// skipped.
pub struct BackdropApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    title: String,
    tracker: Arc<InteractionTracker>,
    owner: SceneOwner<WgpuSurface>,
    /// Cleared once a redraw produced no frame
    animating: bool,
}

/// Activates `owner` on a newly acquired surface
///
/// A missing surface or a failed bootstrap leaves the owner inactive; the
/// host keeps running without the background.
fn start_scene<S: RenderSurface>(owner: &mut SceneOwner<S>, surface: SceneResult<S>) -> bool {
    match surface.and_then(|surface| owner.activate(surface)) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("animated background disabled: {e}");
            false
        }
    }
}

/// Draws one frame; `false` means no further redraws should be requested
fn redraw<S: RenderSurface>(owner: &mut SceneOwner<S>) -> bool {
    owner.frame()
}

impl BackdropApp {
    pub fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let tracker = Arc::new(InteractionTracker::default());
        let owner = SceneOwner::with_tracker(config, Arc::clone(&tracker));

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                title: String::from("codescape"),
                tracker,
                owner,
                animating: false,
            },
        })
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.app_state.title = title.to_string();
        self
    }

    /// Shared tracker fed by window events
    pub fn tracker(&self) -> Arc<InteractionTracker> {
        Arc::clone(&self.app_state.tracker)
    }

    /// Runs the event loop until the window is closed
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated with an error")?;
        Ok(())
    }
}

impl AppState {
    fn bind_window(&mut self, window: Arc<Window>) {
        let PhysicalSize { width, height } = window.inner_size();
        let surface = pollster::block_on(WgpuSurface::new(window, width, height));
        self.animating = start_scene(&mut self.owner, surface);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.animating = false;
        self.owner.deactivate();
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(1200, 800));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let window = Arc::new(window);
                self.window = Some(Arc::clone(&window));
                self.bind_window(window);
            }
            Err(e) => {
                log::warn!("failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                self.tracker.on_pointer_move(x, y);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.tracker.on_resize(width, height);
            }
            WindowEvent::RedrawRequested => {
                self.animating = redraw(&mut self.owner);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.animating {
            return;
        }
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.owner.deactivate();
    }
}
