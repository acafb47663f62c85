//! Flat vertex buffers handed to the renderer.
//!
//! The crate never draws anything itself. Each frame the host collects the
//! scene into plain `#[repr(C)]` records and uploads the bytes as-is:
//!
//! ```ignore
//! let buffers = RenderBuffers::collect(&scene);
//! queue.write_buffer(&shell_buffer, 0, buffers.shell_bytes());
//! for strip in buffers.trail_strips() {
//!     // draw one line strip
//! }
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::scene::Scene;

/// Opacity of a node that is not highlighted.
pub const NODE_OPACITY: f32 = 0.85;
/// Opacity of the highlighted node.
pub const HIGHLIGHT_OPACITY: f32 = 1.0;
/// Size multiplier of the highlighted node.
pub const HIGHLIGHT_SCALE: f32 = 1.5;

/// A point or line vertex with an RGB color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColoredVertex {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// A node point with its render size and opacity.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct NodeVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    /// Sphere radius to draw.
    pub size: f32,
    pub opacity: f32,
}

/// A shell vertex with the opacity of its triangle.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ShellVertex {
    pub position: [f32; 3],
    pub opacity: f32,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, Default)]
pub struct RenderBuffers {
    /// One vertex per node.
    pub nodes: Vec<NodeVertex>,
    /// All trail samples, node after node.
    pub trails: Vec<ColoredVertex>,
    /// Samples per trail strip.
    pub trail_stride: usize,
    /// Three vertices per live shell triangle, in its current pose.
    pub shell: Vec<ShellVertex>,
    /// One vertex per star.
    pub stars: Vec<ColoredVertex>,
}

impl RenderBuffers {
    pub fn collect(scene: &Scene) -> Self {
        let mut buffers = Self::default();
        buffers.refill(scene);
        buffers
    }

    /// Overwrite with the scene's current state, keeping allocations.
    pub fn refill(&mut self, scene: &Scene) {
        self.nodes.clear();
        self.trails.clear();
        self.shell.clear();
        self.stars.clear();
        self.trail_stride = scene.config().trail_samples;

        let node_size = scene.config().node_size;
        let highlight = scene.highlight();
        for node in scene.nodes().iter() {
            let (scale, opacity) = if highlight == Some(node.id) {
                (HIGHLIGHT_SCALE, HIGHLIGHT_OPACITY)
            } else {
                (1.0, NODE_OPACITY)
            };
            self.nodes.push(NodeVertex {
                position: node.position.to_array(),
                color: node.color.to_array(),
                size: node_size * scale,
                opacity,
            });
            self.trails.extend(
                node.trail
                    .points
                    .iter()
                    .zip(&node.trail.colors)
                    .map(|(p, c)| ColoredVertex::new(*p, *c)),
            );
        }

        for tri in scene.shell().triangles() {
            let opacity = tri.opacity();
            self.shell.extend(tri.world_vertices().map(|v| ShellVertex {
                position: v.to_array(),
                opacity,
            }));
        }

        let stars = scene.stars();
        self.stars.extend(
            stars
                .positions
                .iter()
                .zip(&stars.colors)
                .map(|(p, c)| ColoredVertex::new(*p, *c)),
        );
    }

    /// Trail vertices split into one line strip per node.
    pub fn trail_strips(&self) -> impl Iterator<Item = &[ColoredVertex]> {
        self.trails.chunks(self.trail_stride.max(1))
    }

    pub fn node_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    pub fn trail_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.trails)
    }

    pub fn shell_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.shell)
    }

    pub fn star_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.stars)
    }
}
