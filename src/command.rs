//! Mutation requests produced by the UI layer.
//!
//! Event handlers never touch the scene directly. They send a [`Command`]
//! over a channel and the frame loop, the scene's only owner, applies queued
//! commands between frames with [`Scene::drain`](crate::Scene::drain).
//!
//! ```ignore
//! let (tx, rx) = std::sync::mpsc::channel();
//! // UI thread
//! tx.send(Command::SetHue(120.0))?;
//! // frame loop
//! scene.drain(&rx);
//! scene.tick(clock.advance());
//! ```

use glam::Vec3;

use crate::camera::{Camera, ScreenRect, Viewport};
use crate::node::NodeId;
use crate::shapes::Shape;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discard everything and rebuild for a shape.
    Regenerate(Shape),
    /// Set the global hue shift in degrees.
    SetHue(f32),
    /// Break intact shell triangles within `radius` of `point`.
    BreakNear { point: Vec3, radius: f32 },
    /// Delete one node.
    RemoveNode(NodeId),
    /// Delete every node projecting into a screen rectangle.
    RemoveNodesInRect {
        rect: ScreenRect,
        camera: Camera,
        viewport: Viewport,
    },
    /// Delete every node within `radius` of `center`.
    RemoveNodeChunk { center: Vec3, radius: f32 },
    /// Highlight the hovered node; `None` when the pointer leaves.
    Highlight(Option<NodeId>),
    /// Jitter every node's rest position.
    RandomizeNodes,
    /// Break the shell at a few random points.
    ScatterBreaks,
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Regenerate(_) => "regenerate",
            Command::SetHue(_) => "set_hue",
            Command::BreakNear { .. } => "break_near",
            Command::RemoveNode(_) => "remove_node",
            Command::RemoveNodesInRect { .. } => "remove_nodes_in_rect",
            Command::RemoveNodeChunk { .. } => "remove_node_chunk",
            Command::Highlight(_) => "highlight",
            Command::RandomizeNodes => "randomize_nodes",
            Command::ScatterBreaks => "scatter_breaks",
        }
    }
}
