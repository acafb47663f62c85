//! # orbshell
//!
//! Procedural geometry and animation for a glowing orb: light nodes laid out
//! on a shape, magnetically bent trails running towards the center, and a
//! triangulated outer shell that shatters where nodes are removed.
//!
//! orbshell does no rendering. It owns the simulation and hands the renderer
//! flat vertex buffers each frame; input handling and image encoding stay
//! with the host.
//!
//! ## Quick Start
//!
//! ```ignore
//! use orbshell::prelude::*;
//!
//! fn main() -> OrbResult<()> {
//!     let mut scene = Scene::new(OrbConfig::default().with_seed(7))?;
//!     let mut clock = SimulationClock::new();
//!     let mut buffers = RenderBuffers::default();
//!
//!     scene.regenerate_shape(Shape::Torus);
//!     scene.set_hue(120.0);
//!
//!     loop {
//!         scene.tick(clock.advance());
//!         buffers.refill(&scene);
//!         // upload buffers.node_bytes(), buffers.shell_bytes(), ...
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Shapes
//!
//! A [`Shape`] selects both a node layout ([`shapes`]) and a shell mesh
//! ([`shell`]). Switching shapes discards every node, trail and triangle.
//!
//! ### Nodes and trails
//!
//! Nodes wobble slightly around their generated position but always stay at
//! their original distance from the center. Each frame every trail is rebuilt
//! from its node towards `position × (1 − trail_length)`, bent by a handful of
//! oscillating [`magnetic`] fields and colored by radial [`color`] bands.
//!
//! ### Fracture
//!
//! Removing nodes breaks the shell triangles around them. Broken triangles
//! fly off, tumble, fade and are eventually dropped ([`fracture`]).
//! [`Scene::is_settled`] reports when the debris has mostly faded.
//!
//! ## Feature Overview
//!
//! | Area | Entry points |
//! |------|--------------|
//! | Scene | [`Scene::regenerate_shape`], [`Scene::tick`], [`Scene::set_hue`] |
//! | Deletion | [`Scene::remove_node`], [`Scene::remove_nodes_in_rect`], [`Scene::remove_node_chunk`] |
//! | Breaking | [`Scene::break_near`], [`Scene::scatter_breaks`] |
//! | Picking | [`Camera::ray_through`], [`Scene::pick_node`], [`Scene::hover`] |
//! | UI plumbing | [`Command`], [`Scene::drain`] |
//! | Capture | [`CaptureSession`], [`capture::snapshot`], [`FrameSink`] |

pub mod buffers;
pub mod camera;
pub mod capture;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod fracture;
pub mod magnetic;
pub mod node;
pub mod scene;
pub mod shapes;
pub mod shell;
pub mod starfield;
pub mod time;
pub mod trail;

pub use bytemuck;
pub use buffers::{ColoredVertex, NodeVertex, RenderBuffers, ShellVertex};
pub use camera::{Camera, Ray, ScreenRect, Viewport};
pub use capture::{CaptureSession, CaptureStatus, FrameSink};
pub use color::{ColorBand, ColorBands};
pub use command::Command;
pub use config::{CaptureConfig, OrbConfig};
pub use error::{OrbError, OrbResult};
pub use fracture::{FractureShell, ShellTriangle, TriangleState};
pub use glam::{Vec2, Vec3, Vec4};
pub use magnetic::{MagneticField, MagneticFields};
pub use node::{Node, NodeId, NodeSet};
pub use scene::Scene;
pub use shapes::Shape;
pub use shell::ShellMesh;
pub use starfield::Starfield;
pub use time::SimulationClock;
pub use trail::Trail;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use orbshell::prelude::*;
/// ```
///
/// This imports:
/// - [`Scene`] and [`OrbConfig`] - the simulation and its settings
/// - [`Shape`] - the shape selector
/// - [`SimulationClock`] - time source for [`Scene::tick`]
/// - [`RenderBuffers`] - per-frame vertex data
/// - [`Camera`], [`Viewport`], [`ScreenRect`] - picking and selection
/// - [`Command`] - queued UI requests
/// - [`Vec2`], [`Vec3`], [`Vec4`] - glam vector types
pub mod prelude {
    pub use crate::buffers::RenderBuffers;
    pub use crate::camera::{Camera, ScreenRect, Viewport};
    pub use crate::capture::{CaptureSession, CaptureStatus, FrameSink};
    pub use crate::command::Command;
    pub use crate::config::{CaptureConfig, OrbConfig};
    pub use crate::error::{OrbError, OrbResult};
    pub use crate::node::NodeId;
    pub use crate::scene::Scene;
    pub use crate::shapes::Shape;
    pub use crate::time::SimulationClock;
    pub use crate::{Vec2, Vec3, Vec4};
}
