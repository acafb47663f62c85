//! Orbit camera and screen-space helpers for picking and rectangle selection.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Closest the orbit camera may get to its target.
pub const MIN_DISTANCE: f32 = 4.0;
/// Furthest the orbit camera may get from its target.
pub const MAX_DISTANCE: f32 = 20.0;
/// Largest pitch magnitude; keeps the view direction off the up axis.
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Orbit camera looking at the orb.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Whether user orbit/zoom input is applied. Cleared during capture
    /// and while a selection rectangle is being dragged.
    pub enabled: bool,
}

impl Camera {
    /// Camera 8 units out on +Z, 75° field of view.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 8.0,
            target: Vec3::ZERO,
            fov_y: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            enabled: true,
        }
    }

    /// Place the camera at `eye` looking at `target`. The distance is not
    /// clamped so scripted shots can go anywhere; the pitch is limited as
    /// in [`orbit`](Self::orbit).
    pub fn look_from(&mut self, eye: Vec3, target: Vec3) {
        let offset = eye - target;
        let distance = offset.length();
        self.target = target;
        self.distance = distance;
        if distance > 0.0 {
            self.pitch = (offset.y / distance)
                .clamp(-1.0, 1.0)
                .asin()
                .clamp(-PITCH_LIMIT, PITCH_LIMIT);
            self.yaw = offset.x.atan2(offset.z);
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Rotate around the target. Ignored while disabled.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if !self.enabled {
            return;
        }
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move towards (negative) or away from (positive) the target, keeping
    /// within the orbit distance limits. Ignored while disabled.
    pub fn zoom(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        self.distance = (self.distance + delta).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Pixel coordinates of `point`, origin top-left. `None` when the point
    /// is behind the camera.
    pub fn project_to_screen(&self, point: Vec3, viewport: Viewport) -> Option<Vec2> {
        let clip = self.view_projection(viewport.aspect()) * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * viewport.width,
            (1.0 - (ndc.y * 0.5 + 0.5)) * viewport.height,
        ))
    }

    /// World-space ray from the camera through a pixel.
    pub fn ray_through(&self, pixel: Vec2, viewport: Viewport) -> Ray {
        let ndc = Vec2::new(
            pixel.x / viewport.width * 2.0 - 1.0,
            1.0 - pixel.y / viewport.height * 2.0,
        );
        let inverse = self.view_projection(viewport.aspect()).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray {
            origin: self.position(),
            direction: (far - near).try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Size of the render target in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Axis-aligned pixel rectangle, as produced by a drag selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    /// Rectangle spanned by two drag corners in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Inclusive containment.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Half-line used for picking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Distance along the ray to the first hit with a sphere, if any.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt = disc.sqrt();
        let t = if -b - sqrt >= 0.0 { -b - sqrt } else { -b + sqrt };
        (t >= 0.0).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_default_position() {
        let camera = Camera::new();
        assert!((camera.position() - Vec3::new(0.0, 0.0, 8.0)).length() < 1e-5);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new();
        camera.zoom(-100.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        camera.zoom(100.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_disabled_camera_ignores_input() {
        let mut camera = Camera::new();
        camera.enabled = false;
        camera.orbit(1.0, 0.5);
        camera.zoom(3.0);
        assert_eq!(camera, Camera { enabled: false, ..Camera::new() });
    }

    #[test]
    fn test_look_from_side() {
        let mut camera = Camera::new();
        camera.look_from(Vec3::new(8.0, 0.0, 0.0), Vec3::ZERO);
        assert!((camera.position() - Vec3::new(8.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_look_from_straight_above_stays_finite() {
        let mut camera = Camera::new();
        camera.look_from(Vec3::new(0.0, 8.0, 0.0), Vec3::ZERO);
        assert!(camera.pitch <= PITCH_LIMIT);
        assert!(camera.view_matrix().is_finite());
        let p = camera.project_to_screen(Vec3::ZERO, viewport()).unwrap();
        assert!(p.is_finite());
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::new();
        let p = camera.project_to_screen(Vec3::ZERO, viewport()).unwrap();
        assert!((p - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn test_up_is_top_of_screen() {
        let camera = Camera::new();
        let p = camera.project_to_screen(Vec3::new(0.0, 1.0, 0.0), viewport()).unwrap();
        assert!(p.y < 300.0);
    }

    #[test]
    fn test_behind_camera_is_none() {
        let camera = Camera::new();
        assert!(camera.project_to_screen(Vec3::new(0.0, 0.0, 20.0), viewport()).is_none());
    }

    #[test]
    fn test_center_ray_hits_origin_sphere() {
        let camera = Camera::new();
        let ray = camera.ray_through(Vec2::new(400.0, 300.0), viewport());
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((t - 7.0).abs() < 1e-3);
    }

    #[test]
    fn test_ray_misses_offset_sphere() {
        let camera = Camera::new();
        let ray = camera.ray_through(Vec2::new(400.0, 300.0), viewport());
        assert!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 0.5).is_none());
    }

    #[test]
    fn test_screen_rect_corners() {
        let rect = ScreenRect::from_corners(Vec2::new(10.0, 50.0), Vec2::new(0.0, 5.0));
        assert!(rect.contains(Vec2::new(5.0, 20.0)));
        assert!(!rect.contains(Vec2::new(11.0, 20.0)));
    }
}
