//! Scene configuration.
//!
//! Every tunable of the orb lives in [`OrbConfig`]. The defaults describe a
//! radius-3 orb of 1000 nodes with 50-sample trails reaching 75% of the way to
//! the center, four magnetic fields and a 2000-star backdrop.
//!
//! ```ignore
//! let config = OrbConfig::default()
//!     .with_node_count(400)
//!     .with_seed(7);
//! let scene = Scene::new(config)?;
//! ```
//!
//! Configurations can also be loaded from JSON; missing keys keep their defaults:
//!
//! ```ignore
//! let config = OrbConfig::from_json_str(r#"{ "node_count": 250, "seed": 42 }"#)?;
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OrbError, OrbResult};

/// Tunables for a [`Scene`](crate::Scene).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    /// Base radius of the orb. Shapes, shells and magnetic fields scale with it.
    pub radius: f32,

    /// Requested number of light nodes (torus uses 60% of this).
    pub node_count: usize,

    /// Fraction of the node's distance to the center covered by its trail.
    /// 0.75 means the trail ends at 25% of the node's position.
    pub trail_length: f32,

    /// Samples per trail polyline. Must be at least 2.
    pub trail_samples: usize,

    /// Break radius around a removed node, as a fraction of `radius`.
    /// Also the falloff distance of explosion speed.
    pub break_radius_factor: f32,

    /// Shell break radius around a removed chunk, relative to the chunk radius.
    pub chunk_break_scale: f32,

    /// Break radius of each random impact in [`Scene::scatter_breaks`](crate::Scene::scatter_breaks),
    /// as a fraction of `radius`.
    pub random_break_factor: f32,

    /// Render radius of a node, used for ray picking.
    pub node_size: f32,

    /// Number of oscillating magnetic fields deflecting the trails.
    pub magnetic_field_count: usize,

    /// Number of background stars.
    pub star_count: usize,

    /// Inner radius of the star shell.
    pub star_min_radius: f32,

    /// Outer radius of the star shell.
    pub star_max_radius: f32,

    /// Seed for every random draw in the scene. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Timings of the multi-shot capture workflow.
    pub capture: CaptureConfig,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            node_count: 1000,
            trail_length: 0.75,
            trail_samples: 50,
            break_radius_factor: 0.15,
            chunk_break_scale: 1.2,
            random_break_factor: 0.3,
            node_size: 0.025,
            magnetic_field_count: 4,
            star_count: 2000,
            star_min_radius: 50.0,
            star_max_radius: 100.0,
            seed: None,
            capture: CaptureConfig::default(),
        }
    }
}

impl OrbConfig {
    /// Parse a configuration from JSON. Unspecified keys keep their defaults.
    pub fn from_json_str(json: &str) -> OrbResult<Self> {
        let config: OrbConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> OrbResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> OrbResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that counts and radii are usable.
    pub fn validate(&self) -> OrbResult<()> {
        if !(self.radius > 0.0) {
            return Err(OrbError::InvalidArgument(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if self.node_count == 0 {
            return Err(OrbError::InvalidArgument("node_count must be positive".into()));
        }
        if self.trail_samples < 2 {
            return Err(OrbError::InvalidArgument(format!(
                "trail_samples must be at least 2, got {}",
                self.trail_samples
            )));
        }
        if !(self.break_radius_factor > 0.0) {
            return Err(OrbError::InvalidArgument(
                "break_radius_factor must be positive".into(),
            ));
        }
        if self.star_min_radius > self.star_max_radius || self.star_min_radius < 0.0 {
            return Err(OrbError::InvalidArgument(format!(
                "star shell {}..{} is not a valid range",
                self.star_min_radius, self.star_max_radius
            )));
        }
        if self.capture.shots == 0 {
            return Err(OrbError::InvalidArgument("capture.shots must be positive".into()));
        }
        Ok(())
    }

    /// Break radius used when a node is deleted.
    pub fn break_radius(&self) -> f32 {
        self.radius * self.break_radius_factor
    }

    /// Break radius of each random impact.
    pub fn random_break_radius(&self) -> f32 {
        self.radius * self.random_break_factor
    }

    /// Set the orb radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the requested node count.
    pub fn with_node_count(mut self, count: usize) -> Self {
        self.node_count = count;
        self
    }

    /// Set the trail length fraction (clamped to 0.0-1.0).
    pub fn with_trail_length(mut self, length: f32) -> Self {
        self.trail_length = length.clamp(0.0, 1.0);
        self
    }

    /// Set the number of samples per trail.
    pub fn with_trail_samples(mut self, samples: usize) -> Self {
        self.trail_samples = samples;
        self
    }

    /// Set the star count.
    pub fn with_star_count(mut self, count: usize) -> Self {
        self.star_count = count;
        self
    }

    /// Set the number of magnetic fields.
    pub fn with_magnetic_fields(mut self, count: usize) -> Self {
        self.magnetic_field_count = count;
        self
    }

    /// Seed all random draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the capture timings.
    pub fn with_capture(mut self, capture: CaptureConfig) -> Self {
        self.capture = capture;
        self
    }
}

/// Timings and layout of the capture workflow, in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Number of images taken per session.
    pub shots: u32,
    /// Wait after regenerating the sphere before carving chunks.
    pub stabilize_ms: u64,
    /// Interval between `is_settled` polls.
    pub poll_ms: u64,
    /// Wait after each export before starting the next shot.
    pub post_export_ms: u64,
    /// Chunk radius as a fraction of the orb radius.
    pub chunk_radius_factor: f32,
    /// Give up waiting for the shell to settle after this long. `None` waits forever.
    pub settle_timeout_ms: Option<u64>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            shots: 10,
            stabilize_ms: 100,
            poll_ms: 100,
            post_export_ms: 200,
            chunk_radius_factor: 0.4,
            settle_timeout_ms: None,
        }
    }
}

impl CaptureConfig {
    pub fn stabilize(&self) -> Duration {
        Duration::from_millis(self.stabilize_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn post_export(&self) -> Duration {
        Duration::from_millis(self.post_export_ms)
    }

    pub fn settle_timeout(&self) -> Option<Duration> {
        self.settle_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OrbConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.break_radius() - 0.45).abs() < 1e-6);
        assert!((config.random_break_radius() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_builder() {
        let config = OrbConfig::default()
            .with_node_count(200)
            .with_trail_length(1.5)
            .with_seed(9);
        assert_eq!(config.node_count, 200);
        assert_eq!(config.trail_length, 1.0);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_json_partial_keeps_defaults() {
        let config = OrbConfig::from_json_str(r#"{ "node_count": 12, "seed": 3 }"#).unwrap();
        assert_eq!(config.node_count, 12);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.trail_samples, 50);
        assert_eq!(config.capture.shots, 10);
    }

    #[test]
    fn test_json_round_trip() {
        let config = OrbConfig::default().with_seed(11);
        let json = config.to_json().unwrap();
        assert_eq!(OrbConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_zero_nodes() {
        let err = OrbConfig::default().with_node_count(0).validate().unwrap_err();
        assert!(matches!(err, OrbError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_short_trails() {
        let result = OrbConfig::from_json_str(r#"{ "trail_samples": 1 }"#);
        assert!(matches!(result, Err(OrbError::InvalidArgument(_))));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let result = OrbConfig::from_json_str("{ \"radius\": ");
        assert!(matches!(result, Err(OrbError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orb.json");
        std::fs::write(&path, r#"{ "radius": 2.0 }"#).unwrap();
        let config = OrbConfig::load(&path).unwrap();
        assert_eq!(config.radius, 2.0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = OrbConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(OrbError::Io(_))));
    }
}
