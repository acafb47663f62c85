//! Multi-shot capture of fractured sphere states.
//!
//! A [`CaptureSession`] takes a series of pictures of the sphere, each with
//! two fresh holes punched into it. It never blocks: the host calls
//! [`CaptureSession::poll`] once per frame with the current time and the
//! session advances when its waits have elapsed. Images are written by a
//! host-provided [`FrameSink`].
//!
//! Per shot:
//!
//! ```text
//! regenerate Sphere ─▶ wait stabilize ─▶ remove two chunks
//!        ▲                                      │
//!        │                                      ▼
//!  wait post_export ◀── export ◀── poll is_settled every poll interval
//! ```
//!
//! While the session runs the camera is disabled and parked at (8, 0, 0)
//! looking at the origin; it is restored when the last shot is done.
//!
//! Outside a session, [`snapshot`] exports the current view once under a
//! timestamped name.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use chrono::NaiveDateTime;
use glam::Vec3;
use tracing::{info, warn};

use crate::camera::Camera;
use crate::config::CaptureConfig;
use crate::error::{OrbError, OrbResult};
use crate::scene::{point_on_sphere, random_angles, Scene};
use crate::shapes::Shape;

/// Where the camera sits during a capture.
pub const CAPTURE_EYE: Vec3 = Vec3::new(8.0, 0.0, 0.0);

/// Host side of image export.
pub trait FrameSink {
    /// Render the scene as seen from `camera` and store it under `file_name`.
    fn export(&mut self, file_name: &str, scene: &Scene, camera: &Camera) -> OrbResult<()>;
}

/// File name of the `index`-th shot, counting from 0.
pub fn shot_file_name(index: u32) -> String {
    format!("sphere-state-{}.png", index + 1)
}

/// File name of a single snapshot taken at `timestamp`
/// (`orb-YYYYMMDD-HHMMSS.png`).
pub fn snapshot_file_name(timestamp: NaiveDateTime) -> String {
    format!("orb-{}.png", timestamp.format("%Y%m%d-%H%M%S"))
}

/// Export the scene once as seen from `camera`, without touching either.
/// Returns the file name handed to the sink.
pub fn snapshot(
    scene: &Scene,
    camera: &Camera,
    timestamp: NaiveDateTime,
    sink: &mut dyn FrameSink,
) -> OrbResult<String> {
    let name = snapshot_file_name(timestamp);
    sink.export(&name, scene, camera).map_err(|e| match e {
        OrbError::Capture(msg) => OrbError::Capture(msg),
        other => OrbError::Capture(format!("{name}: {other}")),
    })?;
    info!(file = %name, "snapshot saved");
    Ok(name)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Stabilizing { shot: u32, until: Duration },
    Settling { shot: u32, started: Duration, next_poll: Duration },
    Cooldown { shot: u32, until: Duration },
}

/// What a poll left the session doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureStatus {
    /// No session is running.
    Idle,
    /// Working on shot `shot` (0-based).
    Running { shot: u32 },
    /// The last shot was exported and the scene restored during this poll.
    Finished { shots: u32 },
}

/// Cooperative capture state machine.
#[derive(Debug)]
pub struct CaptureSession {
    config: CaptureConfig,
    phase: Phase,
    saved_camera: Option<Camera>,
    exported: u32,
}

impl CaptureSession {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            saved_camera: None,
            exported: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Images exported by the current or last session.
    pub fn exported(&self) -> u32 {
        self.exported
    }

    /// Begin a session at time `now`. Returns `false`, changing nothing, if
    /// one is already running.
    pub fn start(&mut self, now: Duration, scene: &mut Scene, camera: &mut Camera) -> bool {
        if self.is_running() {
            warn!("capture already running, ignoring start");
            return false;
        }
        info!(shots = self.config.shots, "capture started");

        self.saved_camera = Some(camera.clone());
        camera.enabled = false;
        camera.look_from(CAPTURE_EYE, Vec3::ZERO);

        self.exported = 0;
        self.begin_shot(0, now, scene);
        true
    }

    fn begin_shot(&mut self, shot: u32, now: Duration, scene: &mut Scene) {
        scene.regenerate_shape(Shape::Sphere);
        self.phase = Phase::Stabilizing {
            shot,
            until: now + self.config.stabilize(),
        };
    }

    /// Advance the session to time `now`.
    ///
    /// An export failure aborts the session, restores the camera and is
    /// returned as [`OrbError::Capture`].
    pub fn poll(
        &mut self,
        now: Duration,
        scene: &mut Scene,
        camera: &mut Camera,
        sink: &mut dyn FrameSink,
    ) -> OrbResult<CaptureStatus> {
        match self.phase {
            Phase::Idle => return Ok(CaptureStatus::Idle),

            Phase::Stabilizing { shot, until } => {
                if now >= until {
                    self.punch_holes(scene);
                    self.phase = Phase::Settling {
                        shot,
                        started: now,
                        next_poll: now,
                    };
                }
            }

            Phase::Settling {
                shot,
                started,
                next_poll,
            } => {
                if now < next_poll {
                    return Ok(CaptureStatus::Running { shot });
                }
                let timed_out = self
                    .config
                    .settle_timeout()
                    .is_some_and(|limit| now.saturating_sub(started) >= limit);
                if scene.is_settled() || timed_out {
                    if timed_out && !scene.is_settled() {
                        warn!(shot, "shell did not settle in time, exporting anyway");
                    }
                    self.export(shot, scene, camera, sink)?;
                    self.phase = Phase::Cooldown {
                        shot,
                        until: now + self.config.post_export(),
                    };
                } else {
                    self.phase = Phase::Settling {
                        shot,
                        started,
                        next_poll: now + self.config.poll_interval(),
                    };
                }
            }

            Phase::Cooldown { shot, until } => {
                if now >= until {
                    if shot + 1 < self.config.shots {
                        self.begin_shot(shot + 1, now, scene);
                    } else {
                        self.finish(scene, camera);
                        info!(shots = self.exported, "capture finished");
                        return Ok(CaptureStatus::Finished {
                            shots: self.exported,
                        });
                    }
                }
            }
        }

        Ok(match self.phase {
            Phase::Idle => CaptureStatus::Idle,
            Phase::Stabilizing { shot, .. }
            | Phase::Settling { shot, .. }
            | Phase::Cooldown { shot, .. } => CaptureStatus::Running { shot },
        })
    }

    /// Remove two node chunks; the second is redrawn until it is at least
    /// 90° away from the first in azimuth or inclination.
    fn punch_holes(&mut self, scene: &mut Scene) {
        let radius = scene.config().radius;
        let chunk_radius = radius * self.config.chunk_radius_factor;

        let (theta1, phi1) = random_angles(scene.rng_mut());
        let (theta2, phi2) = loop {
            let (theta, phi) = random_angles(scene.rng_mut());
            if (theta - theta1).abs() >= FRAC_PI_2 || (phi - phi1).abs() >= FRAC_PI_2 {
                break (theta, phi);
            }
        };

        scene.remove_node_chunk(point_on_sphere(theta1, phi1, radius), chunk_radius);
        scene.remove_node_chunk(point_on_sphere(theta2, phi2, radius), chunk_radius);
    }

    fn export(
        &mut self,
        shot: u32,
        scene: &mut Scene,
        camera: &mut Camera,
        sink: &mut dyn FrameSink,
    ) -> OrbResult<()> {
        let name = shot_file_name(shot);
        if let Err(e) = sink.export(&name, scene, camera) {
            self.finish(scene, camera);
            return Err(match e {
                OrbError::Capture(msg) => OrbError::Capture(msg),
                other => OrbError::Capture(format!("{name}: {other}")),
            });
        }
        self.exported += 1;
        info!(file = %name, "captured");
        Ok(())
    }

    fn finish(&mut self, scene: &mut Scene, camera: &mut Camera) {
        scene.regenerate_shape(Shape::Sphere);
        if let Some(saved) = self.saved_camera.take() {
            *camera = saved;
        }
        self.phase = Phase::Idle;
    }
}
