//! Scene object model
//!
//! Objects only hold handles to their mesh and material. The handles are
//! shared between many objects and owned by the [`SceneOwner`], which frees
//! them after the population itself is gone.
//!
//! [`SceneOwner`]: crate::scene::owner::SceneOwner

use cgmath::{Matrix4, Rad, Vector3};
use rand::{rngs::StdRng, Rng};

use crate::error::SceneResult;
use crate::gfx::{
    surface::{BufferId, DrawCommand, MaterialId, MeshId, RenderSurface},
    vertex::PointVertex,
};

/// What an [`AnimatedObject`] depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Thin box that rotates and floats
    CodePanel,
    /// Small sphere that pulses and floats, never rotates
    NetworkNode,
    Cube,
    Torus,
}

/// A rigid drawable instance
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedObject {
    pub kind: ObjectKind,
    /// Creation order within its kind, used as phase offset
    pub index: usize,
    pub position: Vector3<f32>,
    /// Euler angles in radians, applied X then Y then Z
    pub rotation: Vector3<f32>,
    pub scale: f32,
    pub mesh: MeshId,
    pub material: MaterialId,
}

impl AnimatedObject {
    pub fn new(
        kind: ObjectKind,
        index: usize,
        position: Vector3<f32>,
        mesh: MeshId,
        material: MaterialId,
    ) -> Self {
        Self {
            kind,
            index,
            position,
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
            mesh,
            material,
        }
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Translation * Rx * Ry * Rz * scale
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_scale(self.scale)
    }
}

/// Segment between two nodes, frozen at creation time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Index of the first node in creation order
    pub from: usize,
    pub to: usize,
    pub endpoints: [Vector3<f32>; 2],
}

/// Shared line buffer holding every edge of a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLines {
    pub buffer: BufferId,
    pub material: MaterialId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudKind {
    /// Slow colored drift, wraps vertically only
    DataStream,
    /// Fast fall, re-seeds x on wrap
    BinaryRain,
    /// Static points slowly turning around the vertical axis
    Starfield,
}

/// Fixed-size point set drawn from a single vertex buffer
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleCloud {
    pub kind: CloudKind,
    pub points: Vec<PointVertex>,
    /// Rotation of the whole cloud about the vertical axis, radians
    pub rotation_y: f32,
    pub buffer: BufferId,
    pub material: MaterialId,
    dirty: bool,
}

impl ParticleCloud {
    pub fn new(
        kind: CloudKind,
        points: Vec<PointVertex>,
        buffer: BufferId,
        material: MaterialId,
    ) -> Self {
        Self {
            kind,
            points,
            rotation_y: 0.0,
            buffer,
            material,
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Moves every point down by `speed`; points ending below `floor` are
    /// handed to `wrap`
    pub fn fall(&mut self, speed: f32, floor: f32, mut wrap: impl FnMut(&mut PointVertex)) {
        for point in &mut self.points {
            point.position[1] -= speed;
            if point.position[1] < floor {
                wrap(point);
            }
        }
        self.dirty = true;
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_y(Rad(self.rotation_y))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Uploads moved points to the surface
    pub fn sync(&mut self, surface: &mut dyn RenderSurface) -> SceneResult<()> {
        if self.dirty {
            surface.write_points(self.buffer, &self.points)?;
            self.dirty = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationStats {
    pub objects: usize,
    pub edges: usize,
    pub points: usize,
}

/// Every animated element of an active scene
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub objects: Vec<AnimatedObject>,
    pub edges: Vec<Edge>,
    pub edge_lines: Option<EdgeLines>,
    pub clouds: Vec<ParticleCloud>,
}

impl Population {
    pub fn objects_of(&self, kind: ObjectKind) -> impl Iterator<Item = &AnimatedObject> {
        self.objects.iter().filter(move |object| object.kind == kind)
    }

    pub fn objects_of_mut(&mut self, kind: ObjectKind) -> impl Iterator<Item = &mut AnimatedObject> {
        self.objects
            .iter_mut()
            .filter(move |object| object.kind == kind)
    }

    pub fn cloud(&self, kind: CloudKind) -> Option<&ParticleCloud> {
        self.clouds.iter().find(|cloud| cloud.kind == kind)
    }

    /// Connects each unordered pair of `kind` objects with `probability`,
    /// capturing their current positions
    ///
    /// A NaN probability connects nothing.
    pub fn connect(&self, kind: ObjectKind, probability: f64, rng: &mut StdRng) -> Vec<Edge> {
        let nodes: Vec<&AnimatedObject> = self.objects_of(kind).collect();
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        let mut edges = Vec::new();

        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                if rng.random_bool(probability) {
                    edges.push(Edge {
                        from: a.index,
                        to: b.index,
                        endpoints: [a.position, b.position],
                    });
                }
            }
        }

        edges
    }

    /// Line-list vertices for the stored edges
    pub fn edge_vertices(&self, color: [f32; 3]) -> Vec<PointVertex> {
        self.edges
            .iter()
            .flat_map(|edge| edge.endpoints)
            .map(|end| PointVertex::new(end.into(), color))
            .collect()
    }

    /// Draws in submission order: meshes, edges, then particles
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut draws: Vec<DrawCommand> = self
            .objects
            .iter()
            .map(|object| DrawCommand::Mesh {
                mesh: object.mesh,
                material: object.material,
                model: object.model_matrix(),
            })
            .collect();

        if let Some(lines) = self.edge_lines {
            draws.push(DrawCommand::Lines {
                buffer: lines.buffer,
                material: lines.material,
            });
        }

        draws.extend(self.clouds.iter().map(|cloud| DrawCommand::Points {
            buffer: cloud.buffer,
            material: cloud.material,
            model: cloud.model_matrix(),
        }));

        draws
    }

    pub fn sync_clouds(&mut self, surface: &mut dyn RenderSurface) -> SceneResult<()> {
        for cloud in &mut self.clouds {
            cloud.sync(surface)?;
        }
        Ok(())
    }

    pub fn stats(&self) -> PopulationStats {
        PopulationStats {
            objects: self.objects.len(),
            edges: self.edges.len(),
            points: self.clouds.iter().map(ParticleCloud::len).sum(),
        }
    }
}

/// Uniform sample in `[-half, half)` on each axis
pub fn random_in_box(rng: &mut StdRng, half: [f32; 3]) -> Vector3<f32> {
    Vector3::new(
        symmetric(rng, half[0]),
        symmetric(rng, half[1]),
        symmetric(rng, half[2]),
    )
}

/// Uniform sample in `[-half, half)`
pub fn symmetric(rng: &mut StdRng, half: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0 * half
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn node(index: usize, position: Vector3<f32>) -> AnimatedObject {
        AnimatedObject::new(ObjectKind::NetworkNode, index, position, MeshId(1), MaterialId(2))
    }

    #[test]
    fn test_connect_everything_with_certainty() {
        let mut population = Population::default();
        for i in 0..5 {
            population
                .objects
                .push(node(i, Vector3::new(i as f32, 0.0, 0.0)));
        }

        let mut rng = StdRng::seed_from_u64(3);
        let edges = population.connect(ObjectKind::NetworkNode, 1.0, &mut rng);
        assert_eq!(edges.len(), 10);
        assert!(edges.iter().all(|edge| edge.from < edge.to));
        assert!(population
            .connect(ObjectKind::NetworkNode, 0.0, &mut rng)
            .is_empty());
    }

    #[test]
    fn test_connect_with_nan_probability() {
        let mut population = Population::default();
        for i in 0..4 {
            population
                .objects
                .push(node(i, Vector3::new(0.0, i as f32, 0.0)));
        }

        let mut rng = StdRng::seed_from_u64(5);
        assert!(population
            .connect(ObjectKind::NetworkNode, f64::NAN, &mut rng)
            .is_empty());
        assert_eq!(
            population
                .connect(ObjectKind::NetworkNode, 2.5, &mut rng)
                .len(),
            6
        );
    }

    #[test]
    fn test_fall_wraps_below_floor() {
        let points = vec![
            PointVertex::new([1.0, -9.99, 2.0], [1.0; 3]),
            PointVertex::new([3.0, 0.0, 4.0], [1.0; 3]),
        ];
        let mut cloud = ParticleCloud::new(CloudKind::DataStream, points, BufferId(1), MaterialId(2));

        cloud.fall(0.05, -10.0, |point| point.position[1] = 10.0);
        assert_eq!(cloud.points[0].position, [1.0, 10.0, 2.0]);
        assert!((cloud.points[1].position[1] + 0.05).abs() < 1e-6);
        assert!(cloud.is_dirty());
    }

    #[test]
    fn test_draw_order() {
        let mut population = Population::default();
        population.objects.push(node(0, Vector3::new(0.0, 0.0, 0.0)));
        population.edge_lines = Some(EdgeLines {
            buffer: BufferId(5),
            material: MaterialId(6),
        });
        population.clouds.push(ParticleCloud::new(
            CloudKind::BinaryRain,
            vec![PointVertex::new([0.0; 3], [0.0; 3])],
            BufferId(7),
            MaterialId(8),
        ));

        let draws = population.draw_commands();
        assert!(matches!(draws[0], DrawCommand::Mesh { .. }));
        assert!(matches!(draws[1], DrawCommand::Lines { .. }));
        assert!(matches!(draws[2], DrawCommand::Points { .. }));
    }

    #[test]
    fn test_symmetric_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let value = symmetric(&mut rng, 12.5);
            assert!((-12.5..12.5).contains(&value));
        }
    }
}
