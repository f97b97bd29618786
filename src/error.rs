//! Error types for the scene animator
//!
//! Every failure here is a silent degradation of a decorative effect: the host
//! logs it and keeps running without the background.

use thiserror::Error;

/// Errors raised while acquiring or driving the rendering surface
#[derive(Debug, Error)]
pub enum SceneError {
    /// The rendering surface or a required graphics capability is missing
    #[error("rendering capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// The surface refused to allocate a geometry, material or particle buffer
    #[error("unable to allocate {resource}: {reason}")]
    ResourceExhausted {
        resource: &'static str,
        reason: String,
    },

    /// Fatal surface or device failure while rendering a frame
    #[error("surface failure: {0}")]
    Surface(String),

    /// A resource handle the surface does not own
    #[error("unknown resource handle #{0}")]
    UnknownResource(u32),
}

impl SceneError {
    pub fn exhausted(resource: &'static str, reason: impl Into<String>) -> Self {
        Self::ResourceExhausted {
            resource,
            reason: reason.into(),
        }
    }
}

pub type SceneResult<T> = Result<T, SceneError>;
