//! Scene variants
//!
//! A variant decides what a scene is made of and how it moves. The frame
//! driver only knows this trait, so switching themes never touches the loop.

use cgmath::Vector2;
use rand::rngs::StdRng;

use super::{
    geometric::GeometricVariant, network::NetworkVariant, objects::Population,
    registry::ResourceRegistry,
};
use crate::config::SceneConfig;
use crate::error::SceneResult;

/// Per-frame inputs shared by every variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Animation clock after this frame's advance
    pub time: f32,
    /// Latest normalized pointer position, both axes in [-1, 1]
    pub pointer: Vector2<f32>,
}

pub trait SceneVariant {
    fn name(&self) -> &'static str;

    /// Builds the initial population, allocating every resource through
    /// `resources`
    fn bootstrap(
        &self,
        config: &SceneConfig,
        resources: &mut ResourceRegistry<'_>,
        rng: &mut StdRng,
    ) -> SceneResult<Population>;

    /// Advances the population by one frame
    fn update(&self, population: &mut Population, frame: &FrameContext, rng: &mut StdRng);
}

/// Selects the variant instantiated at activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VariantKind {
    /// Code panels, network nodes, data stream and binary rain
    #[default]
    Network,
    /// Cubes, tori and a starfield
    Geometric,
}

impl VariantKind {
    pub fn create(&self) -> Box<dyn SceneVariant> {
        match self {
            VariantKind::Network => Box::new(NetworkVariant),
            VariantKind::Geometric => Box::new(GeometricVariant),
        }
    }
}

impl std::str::FromStr for VariantKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "network" => Ok(VariantKind::Network),
            "geometric" => Ok(VariantKind::Geometric),
            other => Err(format!("unknown scene variant '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!("network".parse::<VariantKind>(), Ok(VariantKind::Network));
        assert_eq!("Geometric".parse::<VariantKind>(), Ok(VariantKind::Geometric));
        assert!("torus".parse::<VariantKind>().is_err());
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(VariantKind::Network.create().name(), "network");
        assert_eq!(VariantKind::Geometric.create().name(), "geometric");
    }
}
