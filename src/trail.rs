//! Light trails from each node towards the orb center.

use glam::Vec3;

use crate::color::ColorBands;
use crate::magnetic::{deflect, MagneticField};

/// A polyline of colored samples running from a node inward.
///
/// The first sample sits on the node, the last at `position × (1 − trail_length)`.
/// Interior samples are bent by the magnetic fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trail {
    pub points: Vec<Vec3>,
    pub colors: Vec<Vec3>,
}

impl Trail {
    /// Build a trail of `samples` points for a node at `start`.
    pub fn build(
        start: Vec3,
        trail_length: f32,
        samples: usize,
        fields: &[MagneticField],
        bands: &ColorBands,
    ) -> Self {
        let mut trail = Self {
            points: Vec::with_capacity(samples),
            colors: Vec::with_capacity(samples),
        };
        trail.rebuild(start, trail_length, samples, fields, bands);
        trail
    }

    /// Recompute every sample in place, reusing the allocations.
    pub fn rebuild(
        &mut self,
        start: Vec3,
        trail_length: f32,
        samples: usize,
        fields: &[MagneticField],
        bands: &ColorBands,
    ) {
        let end = trail_end(start, trail_length);
        self.points.clear();
        self.colors.clear();

        let last = samples.saturating_sub(1).max(1) as f32;
        for i in 0..samples {
            let t = i as f32 / last;
            let p = deflect(start, end, t, fields);
            self.points.push(p);
            self.colors.push(bands.color_at(p.length()));
        }
    }

    /// Recolor each sample from its own distance to the center.
    pub fn recolor(&mut self, bands: &ColorBands) {
        for (color, p) in self.colors.iter_mut().zip(&self.points) {
            *color = bands.color_at(p.length());
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Line-strip segments as consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Where a trail starting at `start` ends.
#[inline]
pub fn trail_end(start: Vec3, trail_length: f32) -> Vec3 {
    start * (1.0 - trail_length)
}
