//! Orbit camera state (rotate, pan, zoom around a target point).
//!
//! The camera orbits with +Y as up. At rest it sits on the +Z axis looking
//! at the origin, so the map plane (z = 0) faces the viewer.

use crate::config::CameraConfig;
use eframe::egui::{Pos2, Rect, Vec2};
use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Keeps the camera off the poles where the up vector degenerates.
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

/// Pending motion below this is dropped.
const REST_EPSILON: f32 = 1e-4;

/// Wheel travel (points) treated as one zoom step.
const SCROLL_STEP: f32 = 50.0;

/// A point projected onto the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub pos: Pos2,
    /// Distance along the view direction (clip w); larger is farther
    pub depth: f32,
}

/// Perspective camera orbiting a target with damped rotation and panning.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Rotation around +Y in radians; 0 looks from +Z
    pub yaw: f32,
    /// Elevation above the XZ plane in radians
    pub pitch: f32,
    config: CameraConfig,
    /// Rotation still to be applied (yaw, pitch)
    pending_rotation: Vec2,
    /// Target offset still to be applied
    pending_pan: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            distance: config.distance,
            yaw: 0.0,
            pitch: 0.0,
            config,
            pending_rotation: Vec2::ZERO,
            pending_pan: Vec3::ZERO,
        }
    }

    /// Returns to the initial view.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let projection = Mat4::perspective_rh_gl(
            self.config.fov_deg.to_radians(),
            aspect.max(f32::EPSILON),
            self.config.near,
            self.config.far,
        );
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        projection * view
    }

    /// Queues an orbit from a pointer drag of `delta` screen points.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let speed = self.config.rotate_speed;
        self.pending_rotation.x -= TAU * delta.x / height * speed;
        self.pending_rotation.y += TAU * delta.y / height * speed;
    }

    /// Queues a screen-space pan from a pointer drag of `delta` screen points.
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let half_fov = (self.config.fov_deg.to_radians() / 2.0).tan();
        let units_per_point = 2.0 * self.distance * half_fov / height * self.config.pan_speed;

        let (right, up) = self.screen_axes();
        self.pending_pan += (-right * delta.x + up * delta.y) * units_per_point;
    }

    /// Zooms towards the target for positive `scroll` and away for negative.
    pub fn zoom(&mut self, scroll: f32) {
        let steps = scroll / SCROLL_STEP;
        let scale = 0.95_f32.powf(self.config.zoom_speed * steps);
        self.distance = (self.distance * scale)
            .clamp(self.config.near * 2.0, self.config.far * 0.9);
    }

    /// Applies one frame of damped motion. Returns true while still moving.
    pub fn update(&mut self) -> bool {
        let damping = self.config.damping_factor.clamp(0.0, 1.0);

        self.yaw += self.pending_rotation.x * damping;
        self.pitch = (self.pitch + self.pending_rotation.y * damping).clamp(-MAX_PITCH, MAX_PITCH);
        self.target += self.pending_pan * damping;

        self.pending_rotation *= 1.0 - damping;
        self.pending_pan *= 1.0 - damping;

        let moving = self.pending_rotation.length() > REST_EPSILON
            || self.pending_pan.length() > REST_EPSILON * self.distance;
        if !moving {
            self.pending_rotation = Vec2::ZERO;
            self.pending_pan = Vec3::ZERO;
        }
        moving
    }

    /// Projects a world position into `rect`. Returns `None` behind the
    /// camera or outside the near/far range.
    pub fn world_to_screen(&self, point: Vec3, rect: Rect) -> Option<ScreenPoint> {
        let clip = self.view_projection(rect.aspect_ratio()) * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        let center = rect.center();
        Some(ScreenPoint {
            pos: Pos2::new(
                center.x + ndc.x * rect.width() / 2.0,
                center.y - ndc.y * rect.height() / 2.0,
            ),
            depth: clip.w,
        })
    }

    /// Screen points per world unit at the given depth.
    pub fn points_per_unit(&self, depth: f32, rect: Rect) -> f32 {
        let half_fov = (self.config.fov_deg.to_radians() / 2.0).tan();
        rect.height() / 2.0 / (half_fov * depth.max(f32::EPSILON))
    }

    /// Intersects the ray under `pos` with the ground plane z = 0.
    pub fn screen_to_ground(&self, pos: Pos2, rect: Rect) -> Option<Vec3> {
        let center = rect.center();
        let ndc_x = (pos.x - center.x) / (rect.width() / 2.0);
        let ndc_y = -(pos.y - center.y) / (rect.height() / 2.0);

        let half_fov = (self.config.fov_deg.to_radians() / 2.0).tan();
        let eye = self.eye();
        let forward = (self.target - eye).normalize_or_zero();
        let (right, up) = self.screen_axes();
        let direction = forward
            + right * (ndc_x * half_fov * rect.aspect_ratio())
            + up * (ndc_y * half_fov);
        if direction.z.abs() <= f32::EPSILON {
            return None;
        }

        let t = -eye.z / direction.z;
        if t <= 0.0 {
            return None;
        }
        Some(eye + direction * t)
    }

    /// Camera right and up vectors in world space.
    fn screen_axes(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        (right, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))
    }

    fn settle(camera: &mut OrbitCamera) {
        for _ in 0..1000 {
            if !camera.update() {
                break;
            }
        }
    }

    #[test]
    fn test_default_camera_looks_down_z() {
        let camera = OrbitCamera::default();
        assert_eq!(camera.eye(), Vec3::new(0.0, 0.0, 1000.0));

        let origin = camera
            .world_to_screen(Vec3::ZERO, viewport())
            .expect("origin is in view");
        assert!((origin.pos.x - 400.0).abs() < 1e-3);
        assert!((origin.pos.y - 300.0).abs() < 1e-3);
        assert!((origin.depth - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn test_positive_x_is_right_and_positive_y_is_up() {
        let camera = OrbitCamera::default();
        let right = camera
            .world_to_screen(Vec3::new(100.0, 0.0, 0.0), viewport())
            .expect("in view");
        let up = camera
            .world_to_screen(Vec3::new(0.0, 100.0, 0.0), viewport())
            .expect("in view");

        assert!(right.pos.x > 400.0);
        assert!((right.pos.y - 300.0).abs() < 1e-3);
        assert!(up.pos.y < 300.0);
    }

    #[test]
    fn test_point_behind_camera_is_culled() {
        let camera = OrbitCamera::default();
        assert!(camera
            .world_to_screen(Vec3::new(0.0, 0.0, 2000.0), viewport())
            .is_none());
    }

    #[test]
    fn test_points_per_unit_matches_projection() {
        let camera = OrbitCamera::default();
        let rect = viewport();
        let a = camera.world_to_screen(Vec3::ZERO, rect).expect("in view");
        let b = camera
            .world_to_screen(Vec3::new(0.0, 10.0, 0.0), rect)
            .expect("in view");

        let measured = (a.pos.y - b.pos.y) / 10.0;
        assert!((measured - camera.points_per_unit(a.depth, rect)).abs() < 1e-3);
    }

    #[test]
    fn test_screen_to_ground_inverts_projection() {
        let mut camera = OrbitCamera::default();
        camera.yaw = 0.4;
        camera.pitch = 0.3;
        let rect = viewport();

        let world = Vec3::new(120.0, -80.0, 0.0);
        let screen = camera.world_to_screen(world, rect).expect("in view");
        let ground = camera
            .screen_to_ground(screen.pos, rect)
            .expect("ray hits the ground");

        assert!((ground - world).length() < 0.5);
    }

    #[test]
    fn test_zoom_in_reduces_distance_within_limits() {
        let mut camera = OrbitCamera::default();
        camera.zoom(50.0);
        assert!(camera.distance < 1000.0);

        for _ in 0..10_000 {
            camera.zoom(50.0);
        }
        assert!((camera.distance - 2.0).abs() < 1e-3);

        for _ in 0..10_000 {
            camera.zoom(-50.0);
        }
        assert!((camera.distance - 9000.0).abs() < 1e-2);
    }

    #[test]
    fn test_rotation_is_damped_and_settles() {
        let mut camera = OrbitCamera::default();
        camera.rotate(Vec2::new(-60.0, 0.0), 600.0);

        assert!(camera.update());
        let first_step = camera.yaw;
        assert!(first_step > 0.0);

        settle(&mut camera);
        let expected = TAU * 60.0 / 600.0;
        assert!((camera.yaw - expected).abs() < 1e-2);
        assert!(!camera.update());
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.rotate(Vec2::new(0.0, 10_000.0), 600.0);
        settle(&mut camera);
        assert!(camera.pitch <= MAX_PITCH);
    }

    #[test]
    fn test_pan_moves_target_in_screen_plane() {
        let mut camera = OrbitCamera::default();
        camera.pan(Vec2::new(100.0, 0.0), 600.0);
        settle(&mut camera);

        assert!(camera.target.x < 0.0);
        assert!(camera.target.y.abs() < 1e-3);
        assert!(camera.target.z.abs() < 1e-3);
    }

    #[test]
    fn test_reset_restores_initial_view() {
        let mut camera = OrbitCamera::default();
        camera.rotate(Vec2::new(30.0, 20.0), 600.0);
        camera.zoom(200.0);
        settle(&mut camera);

        camera.reset();

        assert_eq!(camera.eye(), Vec3::new(0.0, 0.0, 1000.0));
        assert!(!camera.update());
    }
}
