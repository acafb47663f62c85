//! Twinkling background stars on a distant spherical shell.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

/// Stars spread uniformly over a shell between two radii.
#[derive(Clone, Debug, Default)]
pub struct Starfield {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(count: usize, min_radius: f32, max_radius: f32, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            let theta = rng.gen::<f32>() * TAU;
            let phi = (rng.gen::<f32>() * 2.0 - 1.0).acos();
            let r = min_radius + rng.gen::<f32>() * (max_radius - min_radius);
            positions.push(Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos(),
            ));

            let intensity = 0.3 + rng.gen::<f32>() * 0.3;
            colors.push(Vec3::new(
                intensity,
                intensity,
                intensity + rng.gen::<f32>() * 0.2,
            ));
        }

        Self { positions, colors }
    }

    /// Recolor every star for simulation time `time`.
    ///
    /// Each star blinks on `sin(time + index)`; its base intensity is drawn
    /// again on every call, which gives the field its shimmer.
    pub fn twinkle<R: Rng + ?Sized>(&mut self, time: f32, rng: &mut R) {
        for (i, color) in self.colors.iter_mut().enumerate() {
            let blink = (time + i as f32).sin() * 0.1 + 0.9;
            let base = 0.3 + rng.gen::<f32>() * 0.3;
            *color = Vec3::new(base, base, base + rng.gen::<f32>() * 0.2) * blink;
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_stars_on_shell() {
        let mut rng = SmallRng::seed_from_u64(5);
        let stars = Starfield::new(500, 50.0, 100.0, &mut rng);
        assert_eq!(stars.len(), 500);
        for p in &stars.positions {
            let r = p.length();
            assert!(r >= 50.0 - 1e-3 && r <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn test_star_colors_are_bluish_gray() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut stars = Starfield::new(200, 50.0, 100.0, &mut rng);
        stars.twinkle(3.0, &mut rng);
        for c in &stars.colors {
            assert_eq!(c.x, c.y);
            assert!(c.z >= c.x);
            assert!(c.x >= 0.3 * 0.8 - 1e-6 && c.z <= 0.8 + 1e-6);
        }
    }

    #[test]
    fn test_empty_starfield() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(Starfield::new(0, 50.0, 100.0, &mut rng).is_empty());
    }
}
