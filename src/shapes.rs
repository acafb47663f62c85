//! Node layouts for each orb shape.
//!
//! Each [`Shape`] pairs a node layout (here) with a shell mesh
//! ([`crate::shell`]). Layouts are deterministic in `count`; sizes scale with
//! the orb radius (a radius-3 cube has faces at ±2.5).
//!
//! | Shape | Layout |
//! |-------|--------|
//! | Sphere | Fibonacci / golden-angle points on the sphere |
//! | Cube | square grid on each of the six faces |
//! | Torus | golden-angle ring, `acos` tube spread, 60% of `count` |
//! | Spiral | five-turn helix with accelerating radius and a wobble |

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{OrbError, OrbResult};

/// Golden ratio φ.
pub const GOLDEN_RATIO: f32 = 1.618_034;

/// Number of helix turns shared by the spiral layout and spiral shell.
pub const SPIRAL_TURNS: f32 = 5.0;

/// The shape the orb is arranged on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Sphere,
    Cube,
    Torus,
    Spiral,
}

impl Shape {
    /// Every shape, in button order.
    pub const ALL: [Shape; 4] = [Shape::Sphere, Shape::Cube, Shape::Torus, Shape::Spiral];

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Sphere => "Sphere",
            Shape::Cube => "Cube",
            Shape::Torus => "Torus",
            Shape::Spiral => "Spiral",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = OrbError;

    /// Case-insensitive shape name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OrbError::InvalidArgument(format!("unknown shape '{s}'")))
    }
}

/// Node positions for `shape`. `count == 0` yields no points.
pub fn node_positions(shape: Shape, count: usize, radius: f32) -> Vec<Vec3> {
    match shape {
        Shape::Sphere => sphere_positions(count, radius),
        Shape::Cube => cube_positions(count, radius),
        Shape::Torus => torus_positions(count, radius),
        Shape::Spiral => spiral_positions(count, radius),
    }
}

/// Node positions for a shape given by name.
pub fn node_positions_named(name: &str, count: usize, radius: f32) -> OrbResult<Vec<Vec3>> {
    let shape: Shape = name.parse()?;
    Ok(node_positions(shape, count, radius))
}

/// Fibonacci sphere: inclination `acos(1 - 2i/n)`, azimuth `i·2πφ`.
pub fn sphere_positions(count: usize, radius: f32) -> Vec<Vec3> {
    let angle_increment = TAU * GOLDEN_RATIO;
    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let inclination = (1.0 - 2.0 * t).acos();
            let azimuth = angle_increment * i as f32;
            Vec3::new(
                radius * inclination.sin() * azimuth.cos(),
                radius * inclination.sin() * azimuth.sin(),
                radius * inclination.cos(),
            )
        })
        .collect()
}

/// Six face grids of `ceil(sqrt(n/6))²` points each, filled face by face
/// (+X, −X, +Y, −Y, +Z, −Z) until `count` points exist.
pub fn cube_positions(count: usize, radius: f32) -> Vec<Vec3> {
    let size = radius * 2.5 / 3.0;
    let per_side = (count as f32 / 6.0).sqrt().ceil() as usize;
    let mut positions = Vec::with_capacity(count);

    'faces: for side in 0..6 {
        for i in 0..per_side {
            for j in 0..per_side {
                if positions.len() >= count {
                    break 'faces;
                }
                let u = (i as f32 / per_side as f32 - 0.5) * 2.0 * size;
                let v = (j as f32 / per_side as f32 - 0.5) * 2.0 * size;
                positions.push(match side {
                    0 => Vec3::new(size, u, v),
                    1 => Vec3::new(-size, u, v),
                    2 => Vec3::new(u, size, v),
                    3 => Vec3::new(u, -size, v),
                    4 => Vec3::new(u, v, size),
                    _ => Vec3::new(u, v, -size),
                });
            }
        }
    }

    positions
}

/// Number of nodes the torus layout keeps out of `count`: 60%, rounded down,
/// but never zero for a non-empty request.
pub fn torus_node_count(count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (count * 3 / 5).max(1)
    }
}

/// Torus in the XY plane: golden-angle ring angle, `acos(2t − 1)` tube angle.
/// The tube angle spans 0..π, so nodes cover the +Z half of the tube.
pub fn torus_positions(count: usize, radius: f32) -> Vec<Vec3> {
    let n = torus_node_count(count);
    let major = radius;
    let minor = radius * 0.4;
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());

    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let ring = golden_angle * i as f32;
            let tube = (2.0 * t - 1.0).acos();
            let r = major + minor * tube.cos();
            Vec3::new(r * ring.cos(), r * ring.sin(), minor * tube.sin())
        })
        .collect()
}

/// Point on the spiral path at `t ∈ [0, 1]`, before the wobble is applied.
/// Returns (helix angle, path radius, height).
pub(crate) fn spiral_frame(t: f32, radius: f32) -> (f32, f32, f32) {
    let base_radius = radius * 0.3;
    let max_radius = radius * 1.2;
    let height = radius * 1.5;

    let angle = SPIRAL_TURNS * TAU * t;
    let growth = base_radius + (max_radius - base_radius) * (t * t);
    (angle, growth, height * (t - 0.5))
}

/// Radial wobble factor of the spiral, applied to x and z only.
#[inline]
pub(crate) fn spiral_wobble(t: f32) -> f32 {
    1.0 + (t * PI * 8.0).sin() * 0.1
}

/// Five-turn helix; radius grows with `t²`, height linear in `t − 0.5`.
pub fn spiral_positions(count: usize, radius: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let (angle, growth, y) = spiral_frame(t, radius);
            let wobble = spiral_wobble(t);
            Vec3::new(
                growth * angle.cos() * wobble,
                y,
                growth * angle.sin() * wobble,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shape_names() {
        assert_eq!("Sphere".parse::<Shape>().unwrap(), Shape::Sphere);
        assert_eq!("torus".parse::<Shape>().unwrap(), Shape::Torus);
        assert_eq!(" SPIRAL ".parse::<Shape>().unwrap(), Shape::Spiral);
        assert!(matches!(
            "Pyramid".parse::<Shape>(),
            Err(OrbError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_count_is_empty() {
        for shape in Shape::ALL {
            assert!(node_positions(shape, 0, 3.0).is_empty());
        }
    }

    #[test]
    fn test_counts_per_shape() {
        assert_eq!(node_positions(Shape::Sphere, 1000, 3.0).len(), 1000);
        assert_eq!(node_positions(Shape::Spiral, 1000, 3.0).len(), 1000);
        assert_eq!(node_positions(Shape::Torus, 1000, 3.0).len(), 600);
        let cube = node_positions(Shape::Cube, 1000, 3.0);
        assert!(!cube.is_empty() && cube.len() <= 1000);
    }

    #[test]
    fn test_single_point_per_shape() {
        for shape in Shape::ALL {
            assert_eq!(node_positions(shape, 1, 3.0).len(), 1);
        }
    }

    #[test]
    fn test_sphere_points_on_radius() {
        for p in sphere_positions(200, 3.0) {
            assert!((p.length() - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_first_point_is_pole() {
        let first = sphere_positions(10, 3.0)[0];
        assert!((first - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_cube_points_on_faces() {
        for p in cube_positions(300, 3.0) {
            let m = p.abs().max_element();
            assert!((m - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cube_fills_faces_in_order() {
        // 6 points -> one per face, each at its face's corner sample
        let pts = cube_positions(6, 3.0);
        assert_eq!(pts.len(), 6);
        assert!((pts[0].x - 2.5).abs() < 1e-6);
        assert!((pts[1].x + 2.5).abs() < 1e-6);
        assert!((pts[2].y - 2.5).abs() < 1e-6);
        assert!((pts[5].z + 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_torus_points_on_tube() {
        for p in torus_positions(500, 3.0) {
            let ring = (p.x * p.x + p.y * p.y).sqrt();
            let tube = ((ring - 3.0).powi(2) + p.z * p.z).sqrt();
            assert!((tube - 1.2).abs() < 1e-3);
            assert!(p.z >= -1e-4);
        }
    }

    #[test]
    fn test_spiral_height_and_growth() {
        let pts = spiral_positions(100, 3.0);
        assert!((pts[0].y - (-2.25)).abs() < 1e-5);
        // radius grows from 0.9 towards 3.6 (times wobble)
        let r0 = (pts[0].x.powi(2) + pts[0].z.powi(2)).sqrt();
        let r_last = (pts[99].x.powi(2) + pts[99].z.powi(2)).sqrt();
        assert!((r0 - 0.9).abs() < 1e-4);
        assert!(r_last > 3.0);
    }

    #[test]
    fn test_named_generation() {
        assert_eq!(node_positions_named("Cube", 60, 3.0).unwrap().len(), 60);
        assert!(node_positions_named("Blob", 60, 3.0).is_err());
    }
}
