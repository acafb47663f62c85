//! Radial color bands.
//!
//! Node and trail colors depend only on distance from the orb center. Four
//! bands, ordered by descending threshold radius, are linearly blended in RGB
//! space. A global hue shift rotates every band's base color in HSL space
//! before blending; the stored base colors are never touched, so applying the
//! same shift twice gives the same colors as applying it once.
//!
//! ```ignore
//! let mut bands = ColorBands::default();
//! let outer = bands.color_at(3.0);   // #4facfe
//! bands.set_hue_shift(180.0);
//! let shifted = bands.color_at(3.0); // complementary blue
//! ```

use glam::Vec3;

use crate::error::{OrbError, OrbResult};

/// Number of bands in the gradient.
pub const BAND_COUNT: usize = 4;

/// A base color anchored at a threshold radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorBand {
    /// RGB, each channel 0.0-1.0.
    pub color: Vec3,
    /// Radius at which this band's color is reached exactly.
    pub threshold: f32,
}

impl ColorBand {
    pub const fn new(color: Vec3, threshold: f32) -> Self {
        Self { color, threshold }
    }

    /// Band from a 0xRRGGBB color.
    pub fn from_hex(hex: u32, threshold: f32) -> Self {
        Self {
            color: hex_to_rgb(hex),
            threshold,
        }
    }
}

/// The band gradient plus the current global hue shift.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBands {
    base: [ColorBand; BAND_COUNT],
    shifted: [Vec3; BAND_COUNT],
    hue_shift: f32,
}

impl Default for ColorBands {
    /// Outer blue, violet, cyan, inner pink.
    fn default() -> Self {
        let base = [
            ColorBand::from_hex(0x4facfe, 3.0),
            ColorBand::from_hex(0x9d4edd, 2.2),
            ColorBand::from_hex(0x00f2fe, 1.4),
            ColorBand::from_hex(0xf72585, 0.6),
        ];
        Self {
            shifted: base.map(|b| b.color),
            base,
            hue_shift: 0.0,
        }
    }
}

impl ColorBands {
    /// Build a gradient. Thresholds must be strictly descending.
    pub fn new(base: [ColorBand; BAND_COUNT]) -> OrbResult<Self> {
        for pair in base.windows(2) {
            if !(pair[0].threshold > pair[1].threshold) {
                return Err(OrbError::InvalidArgument(format!(
                    "band thresholds must be strictly descending ({} then {})",
                    pair[0].threshold, pair[1].threshold
                )));
            }
        }
        Ok(Self {
            shifted: base.map(|b| b.color),
            base,
            hue_shift: 0.0,
        })
    }

    /// The immutable base bands.
    pub fn base(&self) -> &[ColorBand; BAND_COUNT] {
        &self.base
    }

    /// Current hue shift in degrees, normalized to 0..360.
    pub fn hue_shift(&self) -> f32 {
        self.hue_shift
    }

    /// Re-derive the working colors from the base colors rotated by `degrees`.
    pub fn set_hue_shift(&mut self, degrees: f32) {
        let degrees = normalize_degrees(degrees);
        self.hue_shift = degrees;
        self.shifted = self.base.map(|b| shift_hue(b.color, degrees));
    }

    /// Band-interpolated color at `radius` under the current hue shift.
    pub fn color_at(&self, radius: f32) -> Vec3 {
        interpolate(&self.base, &self.shifted, radius)
    }

    /// Band-interpolated color at `radius` under an explicit hue shift,
    /// leaving the current shift untouched.
    pub fn color_at_hue(&self, radius: f32, hue_shift_deg: f32) -> Vec3 {
        let degrees = normalize_degrees(hue_shift_deg);
        let shifted = self.base.map(|b| shift_hue(b.color, degrees));
        interpolate(&self.base, &shifted, radius)
    }
}

/// Walk the band pairs from the outside in and blend within the first pair
/// whose inner threshold is at or below `radius`. Radii beyond the outermost
/// threshold extrapolate; radii inside the innermost threshold get the inner color.
fn interpolate(base: &[ColorBand; BAND_COUNT], colors: &[Vec3; BAND_COUNT], radius: f32) -> Vec3 {
    for i in 0..BAND_COUNT - 1 {
        let outer = base[i].threshold;
        let inner = base[i + 1].threshold;
        if radius >= inner {
            let t = (radius - inner) / (outer - inner);
            return mix(colors[i + 1], colors[i], t);
        }
    }
    colors[BAND_COUNT - 1]
}

/// `a·(1−t) + b·t`; exact at both ends.
#[inline]
pub(crate) fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

fn normalize_degrees(degrees: f32) -> f32 {
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Rotate the hue of an RGB color by `degrees`, keeping saturation and lightness.
pub fn shift_hue(color: Vec3, degrees: f32) -> Vec3 {
    let degrees = normalize_degrees(degrees);
    if degrees == 0.0 {
        return color;
    }
    let (h, s, l) = rgb_to_hsl(color);
    let h = (h + degrees / 360.0).rem_euclid(1.0);
    hsl_to_rgb(h, s, l)
}

/// Convert 0xRRGGBB to RGB in 0.0-1.0.
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Convert RGB to (hue, saturation, lightness), all 0.0-1.0.
pub fn rgb_to_hsl(c: Vec3) -> (f32, f32, f32) {
    let max = c.max_element();
    let min = c.min_element();
    let lightness = (min + max) / 2.0;

    if min == max {
        return (0.0, 0.0, lightness);
    }

    let delta = max - min;
    let saturation = if lightness <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let hue = if max == c.x {
        (c.y - c.z) / delta + if c.y < c.z { 6.0 } else { 0.0 }
    } else if max == c.y {
        (c.z - c.x) / delta + 2.0
    } else {
        (c.x - c.y) / delta + 4.0
    };

    (hue / 6.0, saturation, lightness)
}

/// Convert (hue, saturation, lightness) to RGB. Hue wraps.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;

    Vec3::new(
        hue_to_channel(q, p, h + 1.0 / 3.0),
        hue_to_channel(q, p, h),
        hue_to_channel(q, p, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}
