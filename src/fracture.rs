//! Fracturing shell triangles.
//!
//! Every shell triangle starts intact and "breathes" with a tiny scale
//! oscillation. A break turns it into debris: it is thrown away from the
//! impact point, pulled slightly inward, tumbles about the shell origin, falls
//! under a weak gravity and fades out. Faded or far-flung debris is removed.
//!
//! # Lifecycle
//!
//! ```text
//! Intact ──break──▶ Broken ──fade / drift──▶ removed
//! ```
//!
//! A broken triangle never becomes intact again; the whole shell is replaced
//! when the shape is regenerated. Starting from full opacity, debris is
//! removed after at most [`MAX_DEBRIS_TICKS`] ticks.

use glam::{Quat, Vec3};
use rand::Rng;

use crate::shell::ShellMesh;

/// Opacity multiplier applied to debris each tick.
pub const FADE_PER_TICK: f32 = 0.99;
/// Debris below this opacity is removed.
pub const REMOVE_OPACITY: f32 = 0.01;
/// Debris above this opacity counts as visible for settling.
pub const VISIBLE_OPACITY: f32 = 0.15;
/// The shell is settled once fewer than this share of broken triangles are visible.
pub const SETTLED_RATIO: f32 = 0.15;
/// Downward velocity added to debris each tick.
pub const GRAVITY_PER_TICK: f32 = 0.001;
/// Upper bound on the life of a piece of debris: `0.99^459 < 0.01`.
pub const MAX_DEBRIS_TICKS: u32 = 459;

/// Motion state of a broken triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Debris {
    pub velocity: Vec3,
    pub rotation_axis: Vec3,
    /// Radians per tick.
    pub rotation_speed: f32,
    pub opacity: f32,
    /// Translation from the rest pose.
    pub offset: Vec3,
    /// Accumulated rotation about the shell origin.
    pub orientation: Quat,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriangleState {
    Intact {
        /// Uniform scale about the shell origin, within 1 ± 0.002.
        breath_scale: f32,
    },
    Broken(Debris),
}

/// One independently movable piece of the shell.
#[derive(Clone, Debug, PartialEq)]
pub struct ShellTriangle {
    /// Vertices in rest pose.
    pub vertices: [Vec3; 3],
    /// Rest-pose centroid.
    pub centroid: Vec3,
    /// Random unit axis picked at creation; seeds the debris tumble direction.
    pub spin_axis: Vec3,
    /// Per-triangle spin rate, 0.0-0.02.
    pub spin_speed: f32,
    pub state: TriangleState,
}

impl ShellTriangle {
    pub fn new<R: Rng + ?Sized>(vertices: [Vec3; 3], rng: &mut R) -> Self {
        let centroid = (vertices[0] + vertices[1] + vertices[2]) / 3.0;
        Self {
            vertices,
            centroid,
            spin_axis: random_unit(rng),
            spin_speed: rng.gen::<f32>() * 0.02,
            state: TriangleState::Intact { breath_scale: 1.0 },
        }
    }

    #[inline]
    pub fn is_broken(&self) -> bool {
        matches!(self.state, TriangleState::Broken(_))
    }

    /// Debris state, if broken.
    pub fn debris(&self) -> Option<&Debris> {
        match &self.state {
            TriangleState::Broken(d) => Some(d),
            TriangleState::Intact { .. } => None,
        }
    }

    /// Current opacity: 1.0 while intact.
    pub fn opacity(&self) -> f32 {
        self.debris().map_or(1.0, |d| d.opacity)
    }

    /// Break this triangle because of an impact at `impact`. Speed and extra
    /// spin fall off with distance over `break_radius`; beyond it the piece
    /// only collapses inward and tumbles. Already broken triangles are left alone.
    pub fn shatter<R: Rng + ?Sized>(&mut self, impact: Vec3, break_radius: f32, rng: &mut R) {
        if self.is_broken() {
            return;
        }

        let away = self.centroid - impact;
        let distance = away.length();
        let jitter = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 0.2,
            (rng.gen::<f32>() - 0.5) * 0.2,
            (rng.gen::<f32>() - 0.5) * 0.2,
        );
        let direction = away.normalize_or_zero() + jitter;

        let proximity = if break_radius > 0.0 {
            1.0 - (distance / break_radius).min(1.0)
        } else {
            0.0
        };
        let speed = 0.1 * proximity.powi(3);
        let inward = -self.centroid.normalize_or_zero() * 0.03;
        let tumble = direction.cross(random_unit(rng)) * 0.02;

        let rotation_factor = 1.2 + rng.gen::<f32>() * 0.3 + proximity * proximity;

        self.state = TriangleState::Broken(Debris {
            velocity: direction * speed + inward + tumble,
            rotation_axis: self.spin_axis,
            rotation_speed: self.spin_speed * rotation_factor,
            opacity: 1.0,
            offset: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        });
    }

    /// Advance one tick. Returns `false` once the triangle should be removed.
    pub fn tick(&mut self, time: f32, removal_distance: f32) -> bool {
        match &mut self.state {
            TriangleState::Intact { breath_scale } => {
                *breath_scale = 1.0 + (time + self.spin_speed * 10.0).sin() * 0.002;
                true
            }
            TriangleState::Broken(d) => {
                d.offset += d.velocity;
                d.velocity.y -= GRAVITY_PER_TICK;
                d.orientation = (d.orientation
                    * Quat::from_axis_angle(d.rotation_axis, d.rotation_speed))
                .normalize();
                d.opacity *= FADE_PER_TICK;
                d.opacity >= REMOVE_OPACITY && d.offset.length() <= removal_distance
            }
        }
    }

    /// Vertices in their current pose. Both transforms act about the shell
    /// origin: intact triangles scale with the breath so the whole shell
    /// pulses, debris is rotated and then translated by its offset.
    pub fn world_vertices(&self) -> [Vec3; 3] {
        match &self.state {
            TriangleState::Intact { breath_scale } => self.vertices.map(|v| v * *breath_scale),
            TriangleState::Broken(d) => self.vertices.map(|v| d.offset + d.orientation * v),
        }
    }
}

/// The breakable outer shell.
#[derive(Clone, Debug, Default)]
pub struct FractureShell {
    triangles: Vec<ShellTriangle>,
    /// Distance over which explosion speed falls to zero.
    falloff_radius: f32,
    removal_distance: f32,
}

impl FractureShell {
    /// Wrap every triangle of `mesh`. Explosions lose all their speed at
    /// `falloff_radius` from the impact; debris drifting further than
    /// `removal_distance` from its rest pose is removed.
    pub fn new<R: Rng + ?Sized>(
        mesh: &ShellMesh,
        falloff_radius: f32,
        removal_distance: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            triangles: mesh
                .triangles
                .iter()
                .map(|tri| ShellTriangle::new(*tri, rng))
                .collect(),
            falloff_radius,
            removal_distance,
        }
    }

    pub fn triangles(&self) -> &[ShellTriangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn broken_count(&self) -> usize {
        self.triangles.iter().filter(|t| t.is_broken()).count()
    }

    pub fn intact_count(&self) -> usize {
        self.len() - self.broken_count()
    }

    /// Break every intact triangle whose rest centroid lies strictly within
    /// `radius` of `point`. Returns how many broke.
    pub fn break_near<R: Rng + ?Sized>(&mut self, point: Vec3, radius: f32, rng: &mut R) -> usize {
        let falloff = self.falloff_radius;
        let mut broken = 0;
        for tri in &mut self.triangles {
            if !tri.is_broken() && tri.centroid.distance(point) < radius {
                tri.shatter(point, falloff, rng);
                broken += 1;
            }
        }
        broken
    }

    /// Advance every triangle and drop finished debris.
    pub fn tick(&mut self, time: f32) {
        let removal_distance = self.removal_distance;
        self.triangles.retain_mut(|tri| tri.tick(time, removal_distance));
    }

    /// True when nothing is broken or fewer than 15% of broken triangles are
    /// still clearly visible.
    pub fn is_settled(&self) -> bool {
        let mut broken = 0usize;
        let mut visible = 0usize;
        for d in self.triangles.iter().filter_map(ShellTriangle::debris) {
            broken += 1;
            if d.opacity > VISIBLE_OPACITY {
                visible += 1;
            }
        }
        broken == 0 || (visible as f32 / broken as f32) < SETTLED_RATIO
    }
}

/// Uniformly distributed unit vector; never zero.
pub(crate) fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let v = Vec3::new(
        rng.gen::<f32>() - 0.5,
        rng.gen::<f32>() - 0.5,
        rng.gen::<f32>() - 0.5,
    );
    v.try_normalize().unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn unit_triangle() -> [Vec3; 3] {
        [
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(3.0, 0.1, 0.0),
            Vec3::new(3.0, 0.0, 0.1),
        ]
    }

    #[test]
    fn test_new_triangle_is_intact() {
        let tri = ShellTriangle::new(unit_triangle(), &mut rng());
        assert!(!tri.is_broken());
        assert_eq!(tri.opacity(), 1.0);
        assert!((tri.spin_axis.length() - 1.0).abs() < 1e-5);
        assert!(tri.spin_speed <= 0.02);
    }

    #[test]
    fn test_shatter_sets_debris() {
        let mut rng = rng();
        let mut tri = ShellTriangle::new(unit_triangle(), &mut rng);
        tri.shatter(Vec3::new(3.0, 0.0, 0.0), 0.45, &mut rng);
        let d = tri.debris().unwrap();
        assert_eq!(d.opacity, 1.0);
        assert_eq!(d.offset, Vec3::ZERO);
        assert!(d.velocity.length() > 0.0);
    }

    #[test]
    fn test_second_shatter_is_noop() {
        let mut rng = rng();
        let mut tri = ShellTriangle::new(unit_triangle(), &mut rng);
        tri.shatter(Vec3::ZERO, 10.0, &mut rng);
        tri.tick(0.0, 9.0);
        let before = tri.clone();
        tri.shatter(Vec3::X, 10.0, &mut rng);
        assert_eq!(tri, before);
    }

    #[test]
    fn test_breathing_stays_small() {
        let mut tri = ShellTriangle::new(unit_triangle(), &mut rng());
        for i in 0..100 {
            assert!(tri.tick(i as f32 * 0.1, 9.0));
            match tri.state {
                TriangleState::Intact { breath_scale } => {
                    assert!((breath_scale - 1.0).abs() <= 0.002 + 1e-6)
                }
                TriangleState::Broken(_) => panic!("intact triangle broke"),
            }
        }
    }

    #[test]
    fn test_debris_fades_monotonically_and_is_removed() {
        let mut rng = rng();
        let mut tri = ShellTriangle::new(unit_triangle(), &mut rng);
        tri.shatter(Vec3::new(3.0, 0.0, 0.0), 0.45, &mut rng);

        let mut last = tri.opacity();
        let mut ticks = 0;
        while tri.tick(0.0, f32::INFINITY) {
            ticks += 1;
            assert!(tri.opacity() < last);
            last = tri.opacity();
            assert!(ticks <= MAX_DEBRIS_TICKS);
        }
    }

    #[test]
    fn test_far_debris_is_removed() {
        let mut rng = rng();
        let mut tri = ShellTriangle::new(unit_triangle(), &mut rng);
        tri.shatter(Vec3::new(3.0, 0.0, 0.0), 0.45, &mut rng);
        // Zero removal distance: the first move takes it out of range.
        assert!(!tri.tick(0.0, 0.0));
    }

    #[test]
    fn test_world_vertices_keep_shape_when_broken() {
        let mut rng = rng();
        let mut tri = ShellTriangle::new(unit_triangle(), &mut rng);
        tri.shatter(Vec3::new(2.9, 0.0, 0.0), 0.45, &mut rng);
        for _ in 0..20 {
            tri.tick(0.0, 9.0);
        }
        let [a, b, c] = tri.world_vertices();
        let [ra, rb, rc] = tri.vertices;
        assert!(((b - a).length() - (rb - ra).length()).abs() < 1e-4);
        assert!(((c - a).length() - (rc - ra).length()).abs() < 1e-4);
    }

    #[test]
    fn test_intact_pose_scales_about_origin() {
        let mut tri = ShellTriangle::new(unit_triangle(), &mut rng());
        tri.tick(1.3, 9.0);
        let TriangleState::Intact { breath_scale } = tri.state else {
            panic!("intact triangle broke");
        };
        assert_ne!(breath_scale, 1.0);

        for (got, rest) in tri.world_vertices().iter().zip(tri.vertices) {
            assert!(got.distance(rest * breath_scale) < 1e-6);
        }
        // The whole shell pulses: distance from the origin scales too.
        let moved = tri.world_vertices()[0].length() - tri.vertices[0].length();
        assert!((moved - 3.0 * (breath_scale - 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_broken_pose_rotates_about_origin() {
        let mut rng = rng();
        let mut tri = ShellTriangle::new(unit_triangle(), &mut rng);
        tri.shatter(Vec3::new(2.9, 0.0, 0.0), 0.45, &mut rng);
        for _ in 0..20 {
            tri.tick(0.0, 9.0);
        }
        let d = *tri.debris().unwrap();
        assert_ne!(d.orientation, Quat::IDENTITY);

        for (got, rest) in tri.world_vertices().iter().zip(tri.vertices) {
            assert!(got.distance(d.offset + d.orientation * rest) < 1e-5);
        }
    }

    #[test]
    fn test_break_near_uses_strict_radius() {
        let mut rng = rng();
        let mesh = ShellMesh::icosphere(3.0, 5);
        let mut shell = FractureShell::new(&mesh, 0.45, 9.0, &mut rng);

        assert_eq!(shell.break_near(Vec3::new(100.0, 0.0, 0.0), 1.0, &mut rng), 0);
        assert!(shell.is_settled());

        let n = shell.break_near(Vec3::new(0.0, 0.0, 3.0), 0.9, &mut rng);
        assert!(n > 0);
        assert_eq!(shell.broken_count(), n);
        assert!(!shell.is_settled());

        // Already broken triangles are not counted again.
        assert_eq!(shell.break_near(Vec3::new(0.0, 0.0, 3.0), 0.9, &mut rng), 0);
    }

    #[test]
    fn test_shell_settles_after_fade() {
        let mut rng = rng();
        let mesh = ShellMesh::segmented_box(2.55, 4);
        let mut shell = FractureShell::new(&mesh, 0.45, 9.0, &mut rng);
        shell.break_near(Vec3::ZERO, 100.0, &mut rng);
        assert_eq!(shell.intact_count(), 0);

        let mut ticks = 0;
        while !shell.is_settled() {
            shell.tick(ticks as f32 / 60.0);
            ticks += 1;
            assert!(ticks <= MAX_DEBRIS_TICKS);
        }
        for _ in 0..MAX_DEBRIS_TICKS {
            shell.tick(0.0);
        }
        assert!(shell.is_empty());
    }
}
