//! The orb scene and its frame update.
//!
//! A [`Scene`] owns every piece of mutable state: nodes with their trails, the
//! fracturing shell, magnetic fields, stars, the color bands and the random
//! source. It is driven from a single loop: UI requests are applied with
//! [`Scene::apply`] (or queued and drained with [`Scene::drain`]) between calls
//! to [`Scene::tick`].
//!
//! # Example
//!
//! ```ignore
//! use orbshell::prelude::*;
//!
//! let mut scene = Scene::new(OrbConfig::default().with_seed(1))?;
//! scene.regenerate_shape(Shape::Cube);
//! scene.break_near(Vec3::ZERO, 10.0);
//!
//! let mut clock = SimulationClock::fixed_step(Duration::from_secs_f32(1.0 / 60.0));
//! while !scene.is_settled() {
//!     scene.tick(clock.advance());
//! }
//! ```

use std::f32::consts::TAU;
use std::sync::mpsc::Receiver;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::camera::{Camera, Ray, ScreenRect, Viewport};
use crate::color::ColorBands;
use crate::command::Command;
use crate::config::OrbConfig;
use crate::error::OrbResult;
use crate::fracture::FractureShell;
use crate::magnetic::MagneticFields;
use crate::node::{project_to_radius, Node, NodeId, NodeSet};
use crate::shapes::{node_positions, Shape};
use crate::shell::ShellMesh;
use crate::starfield::Starfield;

/// Debris further than this many orb radii from its rest pose is removed.
const REMOVAL_RADII: f32 = 3.0;
/// Per-axis range of the offset applied by [`Scene::randomize_nodes`].
const RANDOMIZE_SPREAD: f32 = 0.3;

/// The complete animated orb.
#[derive(Debug)]
pub struct Scene {
    config: OrbConfig,
    shape: Shape,
    rng: SmallRng,
    bands: ColorBands,
    fields: MagneticFields,
    nodes: NodeSet,
    shell: FractureShell,
    stars: Starfield,
    /// Node under the pointer, drawn enlarged.
    highlight: Option<NodeId>,
    /// Simulation time of the last tick.
    time: f32,
}

impl Scene {
    /// Build a scene showing the default shape (Sphere).
    pub fn new(config: OrbConfig) -> OrbResult<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let fields = MagneticFields::random(config.magnetic_field_count, config.radius, &mut rng);
        let stars = Starfield::new(
            config.star_count,
            config.star_min_radius,
            config.star_max_radius,
            &mut rng,
        );

        let mut scene = Self {
            config,
            shape: Shape::default(),
            rng,
            bands: ColorBands::default(),
            fields,
            nodes: NodeSet::new(),
            shell: FractureShell::default(),
            stars,
            highlight: None,
            time: 0.0,
        };
        scene.regenerate_shape(Shape::default());
        Ok(scene)
    }

    /// Discard all nodes, trails and shell triangles and rebuild them for `shape`.
    pub fn regenerate_shape(&mut self, shape: Shape) {
        self.shape = shape;
        let radius = self.config.radius;

        self.nodes.clear();
        self.highlight = None;
        for position in node_positions(shape, self.config.node_count, radius) {
            let node = self.nodes.insert(position, &mut self.rng);
            node.color = self.bands.color_at(node.sphere_radius);
            node.trail.rebuild(
                node.position,
                self.config.trail_length,
                self.config.trail_samples,
                self.fields.as_slice(),
                &self.bands,
            );
        }

        let mesh = ShellMesh::for_shape(shape, radius);
        self.shell = FractureShell::new(
            &mesh,
            self.config.break_radius(),
            radius * REMOVAL_RADII,
            &mut self.rng,
        );

        info!(
            shape = %shape,
            nodes = self.nodes.len(),
            triangles = self.shell.len(),
            "regenerated shape"
        );
    }

    /// [`regenerate_shape`](Self::regenerate_shape) by name. Unknown names
    /// fail without touching the scene.
    pub fn regenerate_named(&mut self, name: &str) -> OrbResult<()> {
        let shape: Shape = name.parse()?;
        self.regenerate_shape(shape);
        Ok(())
    }

    /// Set the global hue shift and recolor every node and trail sample.
    pub fn set_hue(&mut self, degrees: f32) {
        self.bands.set_hue_shift(degrees);
        for node in self.nodes.iter_mut() {
            node.color = self.bands.color_at(node.sphere_radius);
            node.trail.recolor(&self.bands);
        }
        debug!(hue = self.bands.hue_shift(), "hue changed");
    }

    /// Break every intact shell triangle within `radius` of `point`.
    /// Returns how many triangles broke.
    pub fn break_near(&mut self, point: Vec3, radius: f32) -> usize {
        let broken = self.shell.break_near(point, radius, &mut self.rng);
        debug!(?point, radius, broken, "shell break");
        broken
    }

    /// Delete a node and its trail, breaking the shell around it.
    /// Returns `false` if no such node exists.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.remove(id) else {
            return false;
        };
        debug!(node = %id, "node removed");
        self.drop_stale_highlight();
        self.break_near(node.position, self.config.break_radius());
        true
    }

    /// Delete every node whose screen projection falls inside `rect` and
    /// break the shell around each. Nodes behind the camera are never selected.
    /// Returns the number of removed nodes.
    pub fn remove_nodes_in_rect(
        &mut self,
        rect: ScreenRect,
        camera: &Camera,
        viewport: Viewport,
    ) -> usize {
        let removed = self.nodes.remove_where(|node| {
            camera
                .project_to_screen(node.position, viewport)
                .is_some_and(|p| rect.contains(p))
        });
        self.drop_stale_highlight();
        self.break_around(&removed, self.config.break_radius());
        debug!(removed = removed.len(), "rectangle selection removed nodes");
        removed.len()
    }

    /// Delete every node within `radius` of `center` and break the shell
    /// over a slightly larger region. Returns the number of removed nodes.
    pub fn remove_node_chunk(&mut self, center: Vec3, radius: f32) -> usize {
        let removed = self
            .nodes
            .remove_where(|node| node.position.distance(center) < radius);
        self.drop_stale_highlight();
        let broken = self.break_near(center, radius * self.config.chunk_break_scale);
        debug!(removed = removed.len(), broken, "chunk removed");
        removed.len()
    }

    /// Highlight `id`, or clear the highlight with `None`. Ids of missing
    /// nodes clear it too.
    pub fn set_highlight(&mut self, id: Option<NodeId>) {
        self.highlight = id.filter(|id| self.nodes.contains(*id));
    }

    /// Highlight the node under `ray`, if any. Returns the new highlight.
    pub fn hover(&mut self, ray: &Ray) -> Option<NodeId> {
        self.highlight = self.pick_node(ray);
        self.highlight
    }

    pub fn highlight(&self) -> Option<NodeId> {
        self.highlight
    }

    fn drop_stale_highlight(&mut self) {
        if let Some(id) = self.highlight {
            if !self.nodes.contains(id) {
                self.highlight = None;
            }
        }
    }

    fn break_around(&mut self, removed: &[Node], radius: f32) {
        for node in removed {
            self.break_near(node.position, radius);
        }
    }

    /// Move every node's rest position by a small random offset, keeping it
    /// on its radius, and rebuild its trail.
    pub fn randomize_nodes(&mut self) {
        for node in self.nodes.iter_mut() {
            let offset = Vec3::new(
                (self.rng.gen::<f32>() - 0.5) * RANDOMIZE_SPREAD,
                (self.rng.gen::<f32>() - 0.5) * RANDOMIZE_SPREAD,
                (self.rng.gen::<f32>() - 0.5) * RANDOMIZE_SPREAD,
            );
            let moved = project_to_radius(node.original_position + offset, node.sphere_radius);
            node.original_position = moved;
            node.position = moved;
            node.trail.rebuild(
                moved,
                self.config.trail_length,
                self.config.trail_samples,
                self.fields.as_slice(),
                &self.bands,
            );
        }
        debug!(nodes = self.nodes.len(), "nodes randomized");
    }

    /// Break the shell at 3 to 6 random points on the orb sphere.
    /// Already broken triangles keep flying. Returns how many triangles broke.
    pub fn scatter_breaks(&mut self) -> usize {
        let impacts = self.rng.gen_range(3..=6);
        let radius = self.config.radius;
        let break_radius = self.config.random_break_radius();
        let mut broken = 0;
        for _ in 0..impacts {
            let point = random_on_sphere(&mut self.rng, radius);
            broken += self.shell.break_near(point, break_radius, &mut self.rng);
        }
        debug!(impacts, broken, "scattered breaks");
        broken
    }

    /// Advance the scene to simulation time `time` (seconds).
    pub fn tick(&mut self, time: f32) {
        self.time = time;
        self.fields.update(time);
        self.stars.twinkle(time, &mut self.rng);

        for node in self.nodes.iter_mut() {
            node.position = node.wobbled_position(time);
            node.trail.rebuild(
                node.position,
                self.config.trail_length,
                self.config.trail_samples,
                self.fields.as_slice(),
                &self.bands,
            );
        }

        self.shell.tick(time);
        trace!(
            time,
            nodes = self.nodes.len(),
            triangles = self.shell.len(),
            "tick"
        );
    }

    /// True once shell debris has mostly faded.
    pub fn is_settled(&self) -> bool {
        self.shell.is_settled()
    }

    /// Nearest node whose render sphere the ray hits.
    pub fn pick_node(&self, ray: &Ray) -> Option<NodeId> {
        let size = self.config.node_size;
        self.nodes
            .iter()
            .filter_map(|node| ray.intersect_sphere(node.position, size).map(|t| (t, node.id)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }

    /// Execute one UI request.
    pub fn apply(&mut self, command: Command) {
        trace!(command = command.name(), "apply");
        match command {
            Command::Regenerate(shape) => self.regenerate_shape(shape),
            Command::SetHue(degrees) => self.set_hue(degrees),
            Command::BreakNear { point, radius } => {
                self.break_near(point, radius);
            }
            Command::RemoveNode(id) => {
                self.remove_node(id);
            }
            Command::RemoveNodesInRect {
                rect,
                camera,
                viewport,
            } => {
                self.remove_nodes_in_rect(rect, &camera, viewport);
            }
            Command::RemoveNodeChunk { center, radius } => {
                self.remove_node_chunk(center, radius);
            }
            Command::Highlight(id) => self.set_highlight(id),
            Command::RandomizeNodes => self.randomize_nodes(),
            Command::ScatterBreaks => {
                self.scatter_breaks();
            }
        }
    }

    /// Apply every command queued on `rx` without blocking. Returns how many ran.
    pub fn drain(&mut self, rx: &Receiver<Command>) -> usize {
        let mut applied = 0;
        for command in rx.try_iter() {
            self.apply(command);
            applied += 1;
        }
        applied
    }

    pub fn config(&self) -> &OrbConfig {
        &self.config
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    pub fn shell(&self) -> &FractureShell {
        &self.shell
    }

    pub fn stars(&self) -> &Starfield {
        &self.stars
    }

    pub fn fields(&self) -> &MagneticFields {
        &self.fields
    }

    pub fn bands(&self) -> &ColorBands {
        &self.bands
    }

    pub fn hue_shift(&self) -> f32 {
        self.bands.hue_shift()
    }

    /// Simulation time of the last tick.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// The scene's random source, for collaborators that must draw from the
    /// same seeded stream.
    pub fn rng_mut(&mut self) -> &mut SmallRng {
        &mut self.rng
    }
}

/// Uniform point on a sphere of `radius` around the origin.
pub(crate) fn random_on_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let (theta, phi) = random_angles(rng);
    point_on_sphere(theta, phi, radius)
}

/// Uniform (azimuth, inclination) pair.
pub(crate) fn random_angles<R: Rng + ?Sized>(rng: &mut R) -> (f32, f32) {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    (theta, phi)
}

pub(crate) fn point_on_sphere(theta: f32, phi: f32, radius: f32) -> Vec3 {
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}
