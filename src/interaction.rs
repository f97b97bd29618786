//! # Pointer and viewport tracking
//!
//! Window events arrive whenever the host delivers them, possibly from another
//! thread than the one driving frames. [`InteractionTracker`] keeps only the
//! latest sample of each value in atomics, so writers never block and the frame
//! driver reads a consistent value per field once per frame.
//!
//! ## Usage
//!
//! ```rust
//! use codescape::interaction::InteractionTracker;
//!
//! let tracker = InteractionTracker::new(1000, 800);
//! tracker.on_pointer_move(0.0, 0.0);
//! let snapshot = tracker.snapshot();
//! assert_eq!(snapshot.pointer.x, -1.0);
//! assert_eq!(snapshot.pointer.y, 1.0);
//! ```

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use cgmath::Vector2;

/// Values read by the frame driver at the start of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSnapshot {
    /// Normalized pointer, both axes in [-1, 1], +y up
    pub pointer: Vector2<f32>,
    /// Viewport size in pixels
    pub viewport: (u32, u32),
    /// Incremented by every [`InteractionTracker::on_resize`]
    pub resize_generation: u64,
}

#[derive(Debug)]
pub struct InteractionTracker {
    // f32 bit patterns
    pointer_x: AtomicU32,
    pointer_y: AtomicU32,
    width: AtomicU32,
    height: AtomicU32,
    resize_generation: AtomicU64,
}

impl Default for InteractionTracker {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl InteractionTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pointer_x: AtomicU32::new(0.0f32.to_bits()),
            pointer_y: AtomicU32::new(0.0f32.to_bits()),
            width: AtomicU32::new(width),
            height: AtomicU32::new(height),
            resize_generation: AtomicU64::new(0),
        }
    }

    /// Records a pointer position in window pixels (origin top-left)
    ///
    /// Ignored while the viewport has a zero dimension.
    pub fn on_pointer_move(&self, x: f64, y: f64) {
        let (width, height) = self.viewport();
        if let Some(pointer) = normalize(x, y, width, height) {
            self.pointer_x.store(pointer.x.to_bits(), Ordering::Relaxed);
            self.pointer_y.store(pointer.y.to_bits(), Ordering::Relaxed);
        }
    }

    /// Records a new viewport size; the driver applies it before the next render
    pub fn on_resize(&self, width: u32, height: u32) {
        self.set_viewport(width, height);
        self.resize_generation.fetch_add(1, Ordering::Release);
        log::debug!("viewport resized to {width}x{height}");
    }

    /// Updates the stored size without scheduling a resize
    pub(crate) fn set_viewport(&self, width: u32, height: u32) {
        self.width.store(width, Ordering::Relaxed);
        self.height.store(height, Ordering::Relaxed);
    }

    pub fn viewport(&self) -> (u32, u32) {
        (
            self.width.load(Ordering::Relaxed),
            self.height.load(Ordering::Relaxed),
        )
    }

    pub fn pointer(&self) -> Vector2<f32> {
        Vector2::new(
            f32::from_bits(self.pointer_x.load(Ordering::Relaxed)),
            f32::from_bits(self.pointer_y.load(Ordering::Relaxed)),
        )
    }

    pub fn resize_generation(&self) -> u64 {
        self.resize_generation.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> InteractionSnapshot {
        // generation first: a size stored before the bump is visible after it
        let resize_generation = self.resize_generation();
        InteractionSnapshot {
            pointer: self.pointer(),
            viewport: self.viewport(),
            resize_generation,
        }
    }
}

/// Maps window pixels to [-1, 1] on both axes with +y pointing up
pub fn normalize(x: f64, y: f64, width: u32, height: u32) -> Option<Vector2<f32>> {
    if width == 0 || height == 0 {
        return None;
    }
    let nx = 2.0 * x / width as f64 - 1.0;
    let ny = -(2.0 * y / height as f64 - 1.0);
    Some(Vector2::new(nx as f32, ny as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_pointer_normalization() {
        let tracker = InteractionTracker::new(1000, 800);

        tracker.on_pointer_move(0.0, 0.0);
        assert_eq!(tracker.pointer(), Vector2::new(-1.0, 1.0));

        tracker.on_pointer_move(1000.0, 800.0);
        assert_eq!(tracker.pointer(), Vector2::new(1.0, -1.0));

        tracker.on_pointer_move(500.0, 400.0);
        assert_eq!(tracker.pointer(), Vector2::new(0.0, 0.0));

        tracker.on_pointer_move(750.0, 200.0);
        let pointer = tracker.pointer();
        assert_relative_eq!(pointer.x, 0.5);
        assert_relative_eq!(pointer.y, 0.5);
    }

    #[test]
    fn test_zero_viewport_ignores_pointer() {
        let tracker = InteractionTracker::new(1000, 800);
        tracker.on_pointer_move(750.0, 200.0);
        tracker.on_resize(0, 800);
        tracker.on_pointer_move(0.0, 0.0);

        let pointer = tracker.pointer();
        assert_relative_eq!(pointer.x, 0.5);
        assert_relative_eq!(pointer.y, 0.5);
        assert!(normalize(10.0, 10.0, 0, 0).is_none());
    }

    #[test]
    fn test_resize_bumps_generation() {
        let tracker = InteractionTracker::new(800, 600);
        assert_eq!(tracker.resize_generation(), 0);

        tracker.set_viewport(640, 480);
        assert_eq!(tracker.resize_generation(), 0);

        tracker.on_resize(1024, 768);
        tracker.on_resize(1280, 720);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.resize_generation, 2);
        assert_eq!(snapshot.viewport, (1280, 720));
    }

    #[test]
    fn test_updates_from_another_thread() {
        let tracker = Arc::new(InteractionTracker::new(1000, 800));
        let writer = Arc::clone(&tracker);

        std::thread::spawn(move || {
            for step in 0..=100 {
                writer.on_pointer_move(step as f64 * 10.0, 400.0);
            }
            writer.on_resize(1920, 1080);
        })
        .join()
        .unwrap();

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.viewport, (1920, 1080));
        assert_eq!(snapshot.pointer, Vector2::new(1.0, 0.0));
    }
}
