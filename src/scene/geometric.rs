//! "Geometric" theme: translucent cubes, breathing tori and a slowly turning
//! starfield.

use std::f32::consts::PI;

use cgmath::Vector3;
use rand::{rngs::StdRng, Rng};

use super::{
    objects::{random_in_box, AnimatedObject, CloudKind, ObjectKind, ParticleCloud, Population},
    registry::ResourceRegistry,
    variant::{FrameContext, SceneVariant},
};
use crate::config::SceneConfig;
use crate::error::SceneResult;
use crate::gfx::{
    color::rgb_from_hex,
    geometry::{generate_cube, generate_torus},
    resources::Material,
    vertex::PointVertex,
};

const CUBE_PALETTE: [u32; 3] = [0x22d3ee, 0xe879f9, 0xfbbf24];
const CUBE_HALF_EXTENTS: [f32; 3] = [10.0, 6.0, 4.0];
const TORUS_HALF_EXTENTS: [f32; 3] = [9.0, 5.0, 4.0];
const STAR_HALF_EXTENTS: [f32; 3] = [15.0, 10.0, 10.0];
const TORUS_COLOR: u32 = 0xa78bfa;
const STAR_COLOR: u32 = 0xe2e8f0;

pub const CUBE_POINTER_INFLUENCE: f32 = 0.2;
pub const TORUS_BREATH: f32 = 0.15;
pub const STAR_SPIN: f32 = 0.001;

pub struct GeometricVariant;

fn random_rotation(rng: &mut StdRng) -> Vector3<f32> {
    Vector3::new(
        rng.random_range(0.0..PI),
        rng.random_range(0.0..PI),
        rng.random_range(0.0..PI),
    )
}

impl SceneVariant for GeometricVariant {
    fn name(&self) -> &'static str {
        "geometric"
    }

    fn bootstrap(
        &self,
        config: &SceneConfig,
        resources: &mut ResourceRegistry<'_>,
        rng: &mut StdRng,
    ) -> SceneResult<Population> {
        let mut population = Population::default();

        if config.cube_count > 0 {
            let mesh = resources.mesh(&generate_cube())?;
            let materials = CUBE_PALETTE
                .iter()
                .enumerate()
                .map(|(i, hex)| {
                    resources.material(&Material::from_hex(&format!("cube_{i}"), *hex, 0.7))
                })
                .collect::<SceneResult<Vec<_>>>()?;

            for index in 0..config.cube_count {
                let position = random_in_box(rng, CUBE_HALF_EXTENTS);
                let rotation = random_rotation(rng);
                population.objects.push(
                    AnimatedObject::new(
                        ObjectKind::Cube,
                        index,
                        position,
                        mesh,
                        materials[index % materials.len()],
                    )
                    .with_rotation(rotation),
                );
            }
        }

        if config.torus_count > 0 {
            let mesh = resources.mesh(&generate_torus(0.6, 0.2, 16, 32))?;
            let material = resources.material(&Material::from_hex("torus", TORUS_COLOR, 0.8))?;

            for index in 0..config.torus_count {
                let position = random_in_box(rng, TORUS_HALF_EXTENTS);
                let rotation = random_rotation(rng);
                population.objects.push(
                    AnimatedObject::new(ObjectKind::Torus, index, position, mesh, material)
                        .with_rotation(rotation),
                );
            }
        }

        if config.star_count > 0 {
            let color = rgb_from_hex(STAR_COLOR);
            let points: Vec<PointVertex> = (0..config.star_count)
                .map(|_| PointVertex::new(random_in_box(rng, STAR_HALF_EXTENTS).into(), color))
                .collect();
            let buffer = resources.point_buffer(&points)?;
            let material = resources.material(
                &Material::from_hex("starfield", STAR_COLOR, 0.8).with_point_size(0.04),
            )?;
            population
                .clouds
                .push(ParticleCloud::new(CloudKind::Starfield, points, buffer, material));
        }

        Ok(population)
    }

    fn update(&self, population: &mut Population, frame: &FrameContext, _rng: &mut StdRng) {
        let time = frame.time;

        for cube in population.objects_of_mut(ObjectKind::Cube) {
            let i = cube.index as f32;
            cube.rotation.x += 0.01;
            cube.rotation.y += 0.01 + i * 0.001;
            cube.position.y += (time + i).sin() * 0.008;

            let influence = CUBE_POINTER_INFLUENCE * (1.0 + i * 0.05);
            cube.position.x += frame.pointer.x * influence;
            cube.position.y += frame.pointer.y * influence;
        }

        for torus in population.objects_of_mut(ObjectKind::Torus) {
            let i = torus.index as f32;
            torus.rotation.x += 0.004;
            torus.rotation.z += 0.006 + i * 0.001;
            torus.scale = 1.0 + (time * 1.5 + i).sin() * TORUS_BREATH;
        }

        for cloud in &mut population.clouds {
            if cloud.kind == CloudKind::Starfield {
                cloud.rotation_y += STAR_SPIN;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::HeadlessSurface;
    use cgmath::Vector2;
    use rand::SeedableRng;

    fn bootstrap(surface: &mut HeadlessSurface, seed: u64) -> Population {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut registry = ResourceRegistry::new(surface);
        let population = GeometricVariant
            .bootstrap(&SceneConfig::default(), &mut registry, &mut rng)
            .unwrap();
        registry.commit();
        population
    }

    #[test]
    fn test_bootstrap_counts() {
        let mut surface = HeadlessSurface::new(800, 600);
        let population = bootstrap(&mut surface, 5);

        assert_eq!(population.objects_of(ObjectKind::Cube).count(), 8);
        assert_eq!(population.objects_of(ObjectKind::Torus).count(), 5);
        assert!(population.edges.is_empty());
        assert_eq!(population.cloud(CloudKind::Starfield).unwrap().len(), 300);
        // cube mesh + 3 cube materials + torus mesh + torus material + star buffer + star material
        assert_eq!(surface.live_resources(), 8);
    }

    #[test]
    fn test_starfield_only_turns() {
        let mut surface = HeadlessSurface::new(800, 600);
        let mut population = bootstrap(&mut surface, 6);
        let before = population.cloud(CloudKind::Starfield).unwrap().points.clone();

        let mut rng = StdRng::seed_from_u64(0);
        for frame in 1..=50 {
            let context = FrameContext {
                time: frame as f32 * 0.01,
                pointer: Vector2::new(0.0, 0.0),
            };
            GeometricVariant.update(&mut population, &context, &mut rng);
        }

        let stars = population.cloud(CloudKind::Starfield).unwrap();
        assert_eq!(stars.points, before);
        assert!(!stars.is_dirty());
        assert!((stars.rotation_y - 50.0 * STAR_SPIN).abs() < 1e-5);
    }

    #[test]
    fn test_torus_scale_stays_bounded() {
        let mut surface = HeadlessSurface::new(800, 600);
        let mut population = bootstrap(&mut surface, 7);
        let mut rng = StdRng::seed_from_u64(0);

        for frame in 1..=200 {
            let context = FrameContext {
                time: frame as f32 * 0.01,
                pointer: Vector2::new(0.0, 0.0),
            };
            GeometricVariant.update(&mut population, &context, &mut rng);
            for torus in population.objects_of(ObjectKind::Torus) {
                assert!(torus.scale >= 1.0 - TORUS_BREATH - 1e-6);
                assert!(torus.scale <= 1.0 + TORUS_BREATH + 1e-6);
            }
        }
    }
}
