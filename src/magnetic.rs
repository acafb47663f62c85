//! Oscillating magnetic fields that bend the light trails.
//!
//! Each field is a point attractor with a finite influence radius. Fields
//! drift on independent Lissajous-like paths inside a box of `0.8 × radius`,
//! so trails sway continuously even when nothing else changes.
//!
//! ```ignore
//! let mut fields = MagneticFields::random(4, 3.0, &mut rng);
//! fields.update(time);
//! let p = deflect(start, end, 0.5, fields.as_slice());
//! ```

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

/// A single oscillating point field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagneticField {
    /// Current center.
    pub position: Vec3,
    /// Pull strength, 0.5-1.0.
    pub strength: f32,
    /// Distance beyond which the field has no effect.
    pub influence: f32,
    /// Oscillation phase offset in radians.
    pub phase: f32,
    /// Oscillation frequency.
    pub frequency: f32,
}

impl MagneticField {
    /// Random field scaled to an orb of `radius`.
    pub fn random<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Self {
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * radius * 2.0,
            (rng.gen::<f32>() - 0.5) * radius * 2.0,
            (rng.gen::<f32>() - 0.5) * radius * 2.0,
        );
        Self {
            position,
            strength: 0.5 + rng.gen::<f32>() * 0.5,
            influence: radius * (0.8 + rng.gen::<f32>() * 0.4),
            phase: rng.gen::<f32>() * TAU,
            frequency: 0.3 + rng.gen::<f32>() * 0.4,
        }
    }

    /// Move the field to its position at simulation time `time`.
    pub fn update(&mut self, time: f32, radius: f32) {
        let t = time * self.frequency;
        self.position = Vec3::new(
            (t + self.phase).sin(),
            (t * 1.3 + self.phase).cos(),
            (t * 0.7 + self.phase).sin(),
        ) * radius
            * 0.8;
    }

    /// Force this field applies at `point`, or `None` outside its influence.
    ///
    /// The pull towards the field falls off linearly with distance and is
    /// paired with a swirl term perpendicular to it.
    pub fn force_at(&self, point: Vec3) -> Option<Vec3> {
        let distance = self.position.distance(point);
        if distance >= self.influence {
            return None;
        }
        let to_field = (self.position - point).normalize_or_zero();
        let strength = (1.0 - distance / self.influence) * self.strength;
        let swirl = Vec3::new(-to_field.z, to_field.y, to_field.x) * strength * 0.5;
        Some(to_field * strength + swirl)
    }
}

/// The set of fields shared by every trail.
#[derive(Clone, Debug, Default)]
pub struct MagneticFields {
    fields: Vec<MagneticField>,
    radius: f32,
}

impl MagneticFields {
    /// `count` random fields for an orb of `radius`.
    pub fn random<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> Self {
        Self {
            fields: (0..count).map(|_| MagneticField::random(radius, rng)).collect(),
            radius,
        }
    }

    /// Fields from explicit values.
    pub fn from_fields(fields: Vec<MagneticField>, radius: f32) -> Self {
        Self { fields, radius }
    }

    /// Advance every field to simulation time `time`.
    pub fn update(&mut self, time: f32) {
        for field in &mut self.fields {
            field.update(time, self.radius);
        }
    }

    pub fn as_slice(&self) -> &[MagneticField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Point on the straight segment `start → end` at `t`, pushed sideways by
/// every field in range. The push is weighted by `sin(πt)` so both ends stay pinned.
pub fn deflect(start: Vec3, end: Vec3, t: f32, fields: &[MagneticField]) -> Vec3 {
    let base = start.lerp(end, t);
    let total: Vec3 = fields.iter().filter_map(|f| f.force_at(base)).sum();
    base + total * (t * std::f32::consts::PI).sin() * 0.5
}
