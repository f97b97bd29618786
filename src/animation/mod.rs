//! # Animation
//!
//! Frame-counted animation: every rendered frame advances the clock by the
//! same fixed step, regardless of how long the frame took.
//!
//! - [`AnimationClock`] - the monotonic scene clock
//! - [`FrameDriver`] - per-frame update, camera drift, resize and render

pub mod clock;
pub mod driver;

pub use clock::AnimationClock;
pub use driver::{FrameDriver, FrameOutcome, StopHandle};
