//! Outer shell meshes.
//!
//! The shell is a triangle soup: every triangle owns its three vertices so it
//! can later break off and move on its own. Indexed primitives are built first
//! and then flattened with [`ShellMesh::from_indexed`].
//!
//! # Built-in Shells
//!
//! ```ignore
//! ShellMesh::icosphere(3.0, 5)             // 720 triangles
//! ShellMesh::segmented_box(2.55, 16)       // 3072 triangles
//! ShellMesh::torus(2.76, 1.21, 64, 96)     // 12288 triangles
//! ShellMesh::spiral_tube(3.0, 180, 8)      // 2880 triangles
//! ```
//!
//! Winding order is not consistent across shapes; the shell is drawn double-sided.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Quat, Vec3};

use crate::error::OrbResult;
use crate::shapes::{spiral_frame, spiral_wobble, Shape};

/// Icosphere subdivision detail: each icosahedron edge is split into `detail + 1` segments.
pub const SPHERE_DETAIL: u32 = 5;
/// Segments per box edge.
pub const BOX_SEGMENTS: u32 = 16;
/// Segments around the torus tube.
pub const TORUS_RADIAL_SEGMENTS: u32 = 64;
/// Segments along the torus ring.
pub const TORUS_TUBULAR_SEGMENTS: u32 = 96;
/// Segments along the spiral path.
pub const SPIRAL_PATH_SEGMENTS: u32 = 180;
/// Sides of the spiral tube cross-section.
pub const SPIRAL_TUBE_SIDES: u32 = 8;

/// A flat list of independent triangles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShellMesh {
    /// Triangles in rest pose.
    pub triangles: Vec<[Vec3; 3]>,
}

impl ShellMesh {
    /// The shell that encloses `shape`'s nodes.
    pub fn for_shape(shape: Shape, shell_radius: f32) -> Self {
        match shape {
            Shape::Sphere => Self::icosphere(shell_radius, SPHERE_DETAIL),
            Shape::Cube => Self::segmented_box(shell_radius * 0.85, BOX_SEGMENTS),
            Shape::Torus => {
                let scale = 0.92;
                let major = shell_radius * scale;
                let minor = shell_radius * 0.4 * scale * 1.1;
                Self::torus(major, minor, TORUS_RADIAL_SEGMENTS, TORUS_TUBULAR_SEGMENTS)
                    .rotated(Quat::from_rotation_x(-FRAC_PI_2))
            }
            Shape::Spiral => {
                Self::spiral_tube(shell_radius, SPIRAL_PATH_SEGMENTS, SPIRAL_TUBE_SIDES)
            }
        }
    }

    /// Shell for a shape given by name.
    pub fn for_shape_named(name: &str, shell_radius: f32) -> OrbResult<Self> {
        Ok(Self::for_shape(name.parse()?, shell_radius))
    }

    /// Flatten an indexed mesh into independent triangles.
    pub fn from_indexed(vertices: &[Vec3], indices: &[u32]) -> Self {
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| {
                [
                    vertices[tri[0] as usize],
                    vertices[tri[1] as usize],
                    vertices[tri[2] as usize],
                ]
            })
            .collect();
        Self { triangles }
    }

    /// Icosahedron with every face split into a `(detail + 1)²` triangle grid,
    /// all vertices pushed out to `radius`.
    pub fn icosphere(radius: f32, detail: u32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let corners = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ];
        #[rustfmt::skip]
        let faces: [[usize; 3]; 20] = [
            [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
            [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
            [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
            [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
        ];

        let cols = detail as usize + 1;
        let mut triangles = Vec::with_capacity(faces.len() * cols * cols);

        for [ia, ib, ic] in faces {
            let (a, b, c) = (corners[ia], corners[ib], corners[ic]);

            // Rows of points from the a-b edge towards c.
            let mut grid: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
            for i in 0..=cols {
                let s = i as f32 / cols as f32;
                let aj = a.lerp(c, s);
                let bj = b.lerp(c, s);
                let rows = cols - i;
                let row = (0..=rows)
                    .map(|j| {
                        if rows == 0 {
                            aj
                        } else {
                            aj.lerp(bj, j as f32 / rows as f32)
                        }
                    })
                    .collect();
                grid.push(row);
            }

            for i in 0..cols {
                for j in 0..2 * (cols - i) - 1 {
                    let k = j / 2;
                    let tri = if j % 2 == 0 {
                        [grid[i][k + 1], grid[i + 1][k], grid[i][k]]
                    } else {
                        [grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]
                    };
                    triangles.push(tri.map(|v| v.normalize() * radius));
                }
            }
        }

        Self { triangles }
    }

    /// Axis-aligned box with the given half extent, each face split into a
    /// `segments × segments` grid of quads. Zero segments counts as one.
    pub fn segmented_box(half_extent: f32, segments: u32) -> Self {
        // (normal axis, normal sign, u axis, v axis)
        let faces: [(usize, f32, usize, usize); 6] = [
            (0, 1.0, 2, 1),
            (0, -1.0, 2, 1),
            (1, 1.0, 0, 2),
            (1, -1.0, 0, 2),
            (2, 1.0, 0, 1),
            (2, -1.0, 0, 1),
        ];
        let n = segments.max(1) as usize;
        let mut vertices = Vec::with_capacity(6 * (n + 1) * (n + 1));
        let mut indices = Vec::with_capacity(6 * n * n * 6);

        for (w, sign, u, v) in faces {
            let base = vertices.len() as u32;
            for iy in 0..=n {
                for ix in 0..=n {
                    let mut p = Vec3::ZERO;
                    p[u] = (ix as f32 / n as f32 * 2.0 - 1.0) * half_extent;
                    p[v] = (iy as f32 / n as f32 * 2.0 - 1.0) * half_extent;
                    p[w] = sign * half_extent;
                    vertices.push(p);
                }
            }
            let stride = n as u32 + 1;
            for iy in 0..n as u32 {
                for ix in 0..n as u32 {
                    let a = base + ix + stride * iy;
                    let b = base + ix + stride * (iy + 1);
                    let c = base + ix + 1 + stride * (iy + 1);
                    let d = base + ix + 1 + stride * iy;
                    indices.extend_from_slice(&[a, b, d, b, c, d]);
                }
            }
        }

        Self::from_indexed(&vertices, &indices)
    }

    /// Ring torus around the Y axis (lying in the XZ plane).
    pub fn torus(major: f32, minor: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let (radial, tubular) = (radial_segments, tubular_segments);
        let mut vertices = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            for i in 0..=tubular {
                let u = i as f32 / tubular as f32 * TAU;
                let ring = major + minor * v.cos();
                vertices.push(Vec3::new(ring * u.cos(), minor * v.sin(), ring * u.sin()));
            }
        }

        let stride = tubular + 1;
        let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
        for j in 1..=radial {
            for i in 1..=tubular {
                let a = stride * j + i - 1;
                let b = stride * (j - 1) + i - 1;
                let c = stride * (j - 1) + i;
                let d = stride * j + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self::from_indexed(&vertices, &indices)
    }

    /// Tube swept along the spiral node path. The tube thickens from
    /// 0.5× to 1.3× its base radius as the spiral widens.
    pub fn spiral_tube(radius: f32, path_segments: u32, tube_sides: u32) -> Self {
        let tube_radius = radius * 0.2 / 3.0;
        let sides = tube_sides as usize;
        let mut vertices = Vec::with_capacity((path_segments as usize + 1) * sides);

        for i in 0..=path_segments {
            let t = i as f32 / path_segments as f32;
            let (angle, growth, y) = spiral_frame(t, radius);
            let wobble = spiral_wobble(t);
            let center = Vec3::new(growth * angle.cos() * wobble, y, growth * angle.sin() * wobble);
            let thickness = tube_radius * (0.5 + t * 0.8);

            for j in 0..sides {
                let around = j as f32 / sides as f32 * TAU;
                let ring_x = around.cos() * thickness;
                let ring_y = around.sin() * thickness;
                vertices.push(center + Vec3::new(ring_x * angle.cos(), ring_y, ring_x * angle.sin()));
            }
        }

        let sides = tube_sides;
        let mut indices = Vec::with_capacity((path_segments * sides * 6) as usize);
        for i in 0..path_segments {
            for j in 0..sides {
                let current = i * sides + j;
                let next = i * sides + (j + 1) % sides;
                let next_row = (i + 1) * sides + j;
                let next_row_next = (i + 1) * sides + (j + 1) % sides;
                indices.extend_from_slice(&[current, next, next_row, next, next_row_next, next_row]);
            }
        }

        Self::from_indexed(&vertices, &indices)
    }

    /// Apply a rotation about the origin to every vertex.
    pub fn rotated(mut self, rotation: Quat) -> Self {
        for tri in &mut self.triangles {
            for v in tri.iter_mut() {
                *v = rotation * *v;
            }
        }
        self
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertices as a flat f32 array, 9 floats per triangle.
    pub fn to_vertices(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .flat_map(|tri| tri.iter().flat_map(|v| v.to_array()))
            .collect()
    }
}
