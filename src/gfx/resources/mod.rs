//! GPU-side resource definitions: materials and render targets

pub mod material;
pub mod texture_resource;

pub use material::{BlendMode, DrawUniform, Material};
pub use texture_resource::TextureResource;
