//! "Network" theme: floating code panels, pulsing network nodes joined by
//! edges, a colored data stream and a falling binary rain.

use std::f32::consts::PI;

use rand::{rngs::StdRng, Rng};

use super::{
    objects::{
        random_in_box, symmetric, AnimatedObject, CloudKind, EdgeLines, ObjectKind,
        ParticleCloud, Population,
    },
    registry::ResourceRegistry,
    variant::{FrameContext, SceneVariant},
};
use crate::config::SceneConfig;
use crate::error::SceneResult;
use crate::gfx::{
    color::{hsl_to_rgb, rgb_from_hex},
    geometry::{generate_box, generate_sphere},
    resources::{BlendMode, Material},
    vertex::PointVertex,
};

/// Panel colors, assigned by creation index
const PANEL_PALETTE: [u32; 6] = [0x61dafb, 0x68bc71, 0xf7df1e, 0x306998, 0xff6b35, 0x764abc];
const PANEL_HALF_EXTENTS: [f32; 3] = [8.0, 5.0, 4.0];
const NODE_HALF_EXTENTS: [f32; 3] = [10.0, 6.0, 5.0];
const STREAM_HALF_EXTENTS: [f32; 3] = [15.0, 10.0, 7.5];
const NODE_COLOR: u32 = 0x6366f1;
const RAIN_COLOR: u32 = 0x00ff41;

/// Data stream points below this height restart at `STREAM_TOP`
pub const STREAM_FLOOR: f32 = -10.0;
pub const STREAM_TOP: f32 = 10.0;
pub const STREAM_SPEED: f32 = 0.05;
pub const STREAM_SPIN: f32 = 0.003;

pub const RAIN_FLOOR: f32 = -5.0;
pub const RAIN_TOP: f32 = 15.0;
pub const RAIN_SPEED: f32 = 0.1;
pub const RAIN_HALF_WIDTH: f32 = 12.5;
const RAIN_HALF_DEPTH: f32 = 6.0;
const RAIN_SPAWN_LOW: f32 = 5.0;
const RAIN_SPAWN_HIGH: f32 = 20.0;

pub const PANEL_POINTER_INFLUENCE: f32 = 0.3;
pub const NODE_PULSE: f32 = 0.3;

pub struct NetworkVariant;

impl NetworkVariant {
    fn spawn_panels(
        config: &SceneConfig,
        resources: &mut ResourceRegistry<'_>,
        rng: &mut StdRng,
        population: &mut Population,
    ) -> SceneResult<()> {
        let mesh = resources.mesh(&generate_box(0.8, 0.8, 0.1))?;
        let materials = PANEL_PALETTE
            .iter()
            .enumerate()
            .map(|(i, hex)| resources.material(&Material::from_hex(&format!("panel_{i}"), *hex, 0.8)))
            .collect::<SceneResult<Vec<_>>>()?;

        for index in 0..config.panel_count {
            let position = random_in_box(rng, PANEL_HALF_EXTENTS);
            let rotation = cgmath::Vector3::new(
                rng.random_range(0.0..PI),
                rng.random_range(0.0..PI),
                rng.random_range(0.0..PI),
            );
            population.objects.push(
                AnimatedObject::new(
                    ObjectKind::CodePanel,
                    index,
                    position,
                    mesh,
                    materials[index % materials.len()],
                )
                .with_rotation(rotation),
            );
        }
        Ok(())
    }

    fn spawn_nodes(
        config: &SceneConfig,
        resources: &mut ResourceRegistry<'_>,
        rng: &mut StdRng,
        population: &mut Population,
    ) -> SceneResult<()> {
        let mesh = resources.mesh(&generate_sphere(0.15, 8, 8))?;
        let material = resources.material(&Material::from_hex("node", NODE_COLOR, 0.9))?;

        for index in 0..config.node_count {
            let position = random_in_box(rng, NODE_HALF_EXTENTS);
            population.objects.push(AnimatedObject::new(
                ObjectKind::NetworkNode,
                index,
                position,
                mesh,
                material,
            ));
        }

        population.edges = population.connect(ObjectKind::NetworkNode, config.edge_probability, rng);
        if !population.edges.is_empty() {
            let line_material = Material::from_hex("edge", NODE_COLOR, 0.3);
            let vertices = population.edge_vertices(rgb_from_hex(NODE_COLOR));
            population.edge_lines = Some(EdgeLines {
                material: resources.material(&line_material)?,
                buffer: resources.point_buffer(&vertices)?,
            });
        }
        Ok(())
    }

    fn spawn_data_stream(
        count: usize,
        resources: &mut ResourceRegistry<'_>,
        rng: &mut StdRng,
    ) -> SceneResult<ParticleCloud> {
        let points: Vec<PointVertex> = (0..count)
            .map(|_| {
                let position = random_in_box(rng, STREAM_HALF_EXTENTS);
                let hue = rng.random_range(0.5..0.8);
                PointVertex::new(position.into(), hsl_to_rgb(hue, 0.8, 0.6))
            })
            .collect();

        let material = Material::from_hex("data_stream", 0xffffff, 0.8)
            .with_blend(BlendMode::Additive)
            .with_point_size(0.05)
            .with_vertex_colors();

        let buffer = resources.point_buffer(&points)?;
        let material = resources.material(&material)?;
        Ok(ParticleCloud::new(CloudKind::DataStream, points, buffer, material))
    }

    fn spawn_binary_rain(
        count: usize,
        resources: &mut ResourceRegistry<'_>,
        rng: &mut StdRng,
    ) -> SceneResult<ParticleCloud> {
        let color = rgb_from_hex(RAIN_COLOR);
        let points: Vec<PointVertex> = (0..count)
            .map(|_| {
                let x = symmetric(rng, RAIN_HALF_WIDTH);
                let y = rng.random_range(RAIN_SPAWN_LOW..RAIN_SPAWN_HIGH);
                let z = symmetric(rng, RAIN_HALF_DEPTH);
                PointVertex::new([x, y, z], color)
            })
            .collect();

        let material = Material::from_hex("binary_rain", RAIN_COLOR, 0.6).with_point_size(0.03);

        let buffer = resources.point_buffer(&points)?;
        let material = resources.material(&material)?;
        Ok(ParticleCloud::new(CloudKind::BinaryRain, points, buffer, material))
    }
}

impl SceneVariant for NetworkVariant {
    fn name(&self) -> &'static str {
        "network"
    }

    fn bootstrap(
        &self,
        config: &SceneConfig,
        resources: &mut ResourceRegistry<'_>,
        rng: &mut StdRng,
    ) -> SceneResult<Population> {
        let mut population = Population::default();

        if config.panel_count > 0 {
            Self::spawn_panels(config, resources, rng, &mut population)?;
        }
        if config.node_count > 0 {
            Self::spawn_nodes(config, resources, rng, &mut population)?;
        }
        if config.stream_count > 0 {
            let stream = Self::spawn_data_stream(config.stream_count, resources, rng)?;
            population.clouds.push(stream);
        }
        if config.rain_count > 0 {
            let rain = Self::spawn_binary_rain(config.rain_count, resources, rng)?;
            population.clouds.push(rain);
        }

        Ok(population)
    }

    fn update(&self, population: &mut Population, frame: &FrameContext, rng: &mut StdRng) {
        let time = frame.time;

        for panel in population.objects_of_mut(ObjectKind::CodePanel) {
            let i = panel.index as f32;
            panel.rotation.x += 0.005 + i * 0.001;
            panel.rotation.y += 0.008 + i * 0.0005;
            panel.position.y += (time + i).sin() * 0.01;

            // farther-indexed panels react more strongly
            let influence = PANEL_POINTER_INFLUENCE * (1.0 + i * 0.1);
            panel.position.x += frame.pointer.x * influence;
            panel.position.y += frame.pointer.y * influence;
        }

        for node in population.objects_of_mut(ObjectKind::NetworkNode) {
            let i = node.index as f32;
            node.scale = 1.0 + (time * 2.0 + i).sin() * NODE_PULSE;
            node.position.y += (time + i * 0.5).sin() * 0.005;
        }

        for cloud in &mut population.clouds {
            match cloud.kind {
                CloudKind::DataStream => {
                    cloud.rotation_y += STREAM_SPIN;
                    cloud.fall(STREAM_SPEED, STREAM_FLOOR, |point| {
                        point.position[1] = STREAM_TOP;
                    });
                }
                CloudKind::BinaryRain => {
                    cloud.fall(RAIN_SPEED, RAIN_FLOOR, |point| {
                        point.position[1] = RAIN_TOP;
                        point.position[0] = symmetric(rng, RAIN_HALF_WIDTH);
                    });
                }
                CloudKind::Starfield => {}
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

    fn bootstrap(config: &SceneConfig, surface: &mut HeadlessSurface, seed: u64) -> Population {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut registry = ResourceRegistry::new(surface);
        let population = NetworkVariant
            .bootstrap(config, &mut registry, &mut rng)
            .unwrap();
        registry.commit();
        population
    }

    fn step(population: &mut Population, frame: u32, pointer: Vector2<f32>, rng: &mut StdRng) {
        let context = FrameContext {
            time: frame as f32 * 0.01,
            pointer,
        };
        NetworkVariant.update(population, &context, rng);
    }

    #[test]
    fn test_bootstrap_population() {
        let mut surface = HeadlessSurface::new(800, 600);
        let population = bootstrap(&SceneConfig::default(), &mut surface, 1);

        assert_eq!(population.objects_of(ObjectKind::CodePanel).count(), 12);
        assert_eq!(population.objects_of(ObjectKind::NetworkNode).count(), 20);
        assert!(population.edges.len() <= 20 * 19 / 2);
        assert_eq!(population.cloud(CloudKind::DataStream).unwrap().len(), 500);
        assert_eq!(population.cloud(CloudKind::BinaryRain).unwrap().len(), 200);

        for panel in population.objects_of(ObjectKind::CodePanel) {
            assert!(panel.position.x.abs() <= 8.0);
            assert!(panel.position.y.abs() <= 5.0);
            assert!(panel.position.z.abs() <= 4.0);
            assert!((0.0..PI).contains(&panel.rotation.x));
        }
    }

    #[test]
    fn test_panels_cycle_palette() {
        let mut surface = HeadlessSurface::new(800, 600);
        let population = bootstrap(&SceneConfig::default(), &mut surface, 2);
        let panels: Vec<_> = population.objects_of(ObjectKind::CodePanel).collect();

        for (i, panel) in panels.iter().enumerate() {
            assert_eq!(panel.material, panels[i % 6].material);
        }
        assert_ne!(panels[0].material, panels[1].material);

        let first = surface.material(panels[0].material).unwrap();
        assert_eq!(first.base_color[..3], rgb_from_hex(0x61dafb));
    }

    #[test]
    fn test_stream_colors_are_blue_to_purple() {
        let mut surface = HeadlessSurface::new(800, 600);
        let population = bootstrap(&SceneConfig::default(), &mut surface, 3);
        let stream = population.cloud(CloudKind::DataStream).unwrap();

        for point in &stream.points {
            let [r, g, b] = point.color;
            assert!(b + 1e-4 >= r && b + 1e-4 >= g);
        }
        let material = surface.material(stream.material).unwrap();
        assert_eq!(material.blend, BlendMode::Additive);
    }

    #[test]
    fn test_edges_keep_creation_endpoints() {
        let mut surface = HeadlessSurface::new(800, 600);
        let config = SceneConfig::default().with_edge_probability(1.0);
        let mut population = bootstrap(&config, &mut surface, 4);
        assert_eq!(population.edges.len(), 190);

        let edges = population.edges.clone();
        let mut rng = StdRng::seed_from_u64(0);
        for frame in 1..=30 {
            step(&mut population, frame, Vector2::new(0.5, -0.5), &mut rng);
        }

        assert_eq!(population.edges, edges);
        let lines = population.edge_lines.unwrap();
        assert_eq!(surface.points(lines.buffer).unwrap().len(), 380);
    }

    #[test]
    fn test_no_edges_without_probability() {
        let mut surface = HeadlessSurface::new(800, 600);
        let config = SceneConfig::default().with_edge_probability(0.0);
        let population = bootstrap(&config, &mut surface, 4);

        assert!(population.edges.is_empty());
        assert!(population.edge_lines.is_none());
    }

    #[test]
    fn test_data_stream_conveyor() {
        let mut surface = HeadlessSurface::new(800, 600);
        let mut population = bootstrap(&SceneConfig::default(), &mut surface, 8);
        let before = population.cloud(CloudKind::DataStream).unwrap().points.clone();
        let mut rng = StdRng::seed_from_u64(0);

        for frame in 1..=500 {
            step(&mut population, frame, Vector2::new(0.0, 0.0), &mut rng);
            let stream = population.cloud(CloudKind::DataStream).unwrap();
            for (point, original) in stream.points.iter().zip(&before) {
                assert!(point.position[1] >= STREAM_FLOOR);
                assert_eq!(point.position[0], original.position[0]);
                assert_eq!(point.position[2], original.position[2]);
            }
        }
    }

    #[test]
    fn test_binary_rain_wrap_reseeds_x() {
        let mut surface = HeadlessSurface::new(800, 600);
        let mut population = bootstrap(&SceneConfig::default(), &mut surface, 9);
        let depths: Vec<f32> = population
            .cloud(CloudKind::BinaryRain)
            .unwrap()
            .points
            .iter()
            .map(|point| point.position[2])
            .collect();
        let mut rng = StdRng::seed_from_u64(0);

        // every point starts below 20 and falls 0.1 per frame, so all have wrapped by 260
        let mut previous: Vec<f32> = Vec::new();
        for frame in 1..=260 {
            step(&mut population, frame, Vector2::new(0.0, 0.0), &mut rng);
            let rain = population.cloud(CloudKind::BinaryRain).unwrap();
            for (i, point) in rain.points.iter().enumerate() {
                assert!(point.position[1] >= RAIN_FLOOR);
                assert!(point.position[0].abs() <= RAIN_HALF_WIDTH);
                assert_eq!(point.position[2], depths[i]);
                if let Some(last_y) = previous.get(i) {
                    if point.position[1] > *last_y {
                        assert_eq!(point.position[1], RAIN_TOP);
                    }
                }
            }
            previous = rain.points.iter().map(|point| point.position[1]).collect();
        }
    }

    #[test]
    fn test_pointer_parallax_grows_with_index() {
        let mut surface = HeadlessSurface::new(800, 600);
        let mut population = bootstrap(&SceneConfig::default(), &mut surface, 10);
        let before: Vec<f32> = population
            .objects_of(ObjectKind::CodePanel)
            .map(|panel| panel.position.x)
            .collect();
        let mut rng = StdRng::seed_from_u64(0);

        step(&mut population, 1, Vector2::new(1.0, 0.0), &mut rng);

        for (panel, x0) in population.objects_of(ObjectKind::CodePanel).zip(&before) {
            let expected = PANEL_POINTER_INFLUENCE * (1.0 + panel.index as f32 * 0.1);
            assert!((panel.position.x - x0 - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_empty_categories_allocate_nothing() {
        let mut surface = HeadlessSurface::new(800, 600);
        let config = SceneConfig::default()
            .with_network_counts(0, 0)
            .with_particle_counts(0, 0);
        let population = bootstrap(&config, &mut surface, 11);

        assert_eq!(population.stats().objects, 0);
        assert_eq!(surface.live_resources(), 0);
    }
}
