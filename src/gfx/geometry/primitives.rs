//! # Primitive Shape Generation
//!
//! Procedural meshes used by the scene variants. All shapes are centered at the
//! origin and carry outward normals and UV coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box centered at the origin
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `depth` - Extent along Z
///
/// Code panels are thin boxes (`0.8 x 0.8 x 0.1`); the geometric variant uses
/// the unit cube.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    // (normal, u axis, v axis) per face; corners are normal +- u +- v
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let corners = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

    for (normal, u, v) in faces {
        let base = data.vertices.len() as u32;
        for [cu, cv] in corners {
            let point = [
                (normal[0] + u[0] * cu + v[0] * cv) * hx,
                (normal[1] + u[1] * cu + v[1] * cv) * hy,
                (normal[2] + u[2] * cu + v[2] * cv) * hz,
            ];
            data.vertices.push(point);
            data.normals.push(normal);
            data.tex_coords.push([(cu + 1.0) * 0.5, (cv + 1.0) * 0.5]);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a unit cube centered at the origin
pub fn generate_cube() -> GeometryData {
    generate_box(1.0, 1.0, 1.0)
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.vertices
                .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            data.normals.push(normal);
            data.tex_coords
                .push([long as f32 / long_segs as f32, lat as f32 / lat_segs as f32]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the center to the middle of the tube
/// * `tube` - Tube radius
/// * `radial_segments` - Segments around the tube
/// * `tubular_segments` - Segments around the ring
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * 2.0 * PI;
        let (sin_v, cos_v) = v.sin_cos();

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * 2.0 * PI;
            let (sin_u, cos_u) = u.sin_cos();

            let ring = radius + tube * cos_v;
            data.vertices.push([ring * cos_u, ring * sin_u, tube * sin_v]);
            data.normals.push([cos_v * cos_u, cos_v * sin_u, sin_v]);
            data.tex_coords
                .push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    for j in 1..=radial {
        for i in 1..=tubular {
            let a = (tubular + 1) * j + i - 1;
            let b = (tubular + 1) * (j - 1) + i - 1;
            let c = (tubular + 1) * (j - 1) + i;
            let d = (tubular + 1) * j + i;

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_box_extents() {
        let panel = generate_box(0.8, 0.8, 0.1);
        for [x, y, z] in &panel.vertices {
            assert!((x.abs() - 0.4).abs() < 1e-6);
            assert!((y.abs() - 0.4).abs() < 1e-6);
            assert!((z.abs() - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.15, 8, 8);
        assert_eq!(sphere.vertices.len(), 81); // 9 x 9 grid
        assert_eq!(sphere.triangle_count(), 128);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());

        for [x, y, z] in &sphere.vertices {
            let length = (x * x + y * y + z * z).sqrt();
            assert!((length - 0.15).abs() < 1e-5);
        }
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(0.6, 0.2, 8, 16);
        assert_eq!(torus.vertices.len(), 9 * 17);
        assert_eq!(torus.triangle_count(), 8 * 16 * 2);
        assert!(torus
            .indices
            .iter()
            .all(|&index| (index as usize) < torus.vertex_count()));
    }
}
