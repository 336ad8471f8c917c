//! Orbit camera around a fixed target.
//!
//! Drag input lands in pending yaw/pitch deltas; each frame applies a
//! damped fraction of what is outstanding, so orbiting eases in and glides
//! briefly after release instead of stopping dead. Zoom is multiplicative
//! and clamped to the configured dolly range.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

#[derive(Debug)]
pub struct OrbitCamera {
    yaw: f32,
    pitch: f32,
    distance: f32,
    target: Vec3,
    pending_yaw: f32,
    pending_pitch: f32,
    dragging: bool,
    auto_rotate: bool,
    config: CameraConfig,
}

impl OrbitCamera {
    pub fn new(config: CameraConfig, auto_rotate: bool) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: config.distance.clamp(config.min_distance, config.max_distance),
            target: Vec3::ZERO,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            dragging: false,
            auto_rotate,
            config,
        }
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(
                self.distance * cos_pitch * sin_yaw,
                self.distance * sin_pitch,
                self.distance * cos_pitch * cos_yaw,
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov_degrees.to_radians(),
            aspect,
            self.config.near,
            self.config.far,
        )
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Ends the drag. Outstanding deltas keep easing out afterwards.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Queue an orbit from a mouse move of `(dx, dy)` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.pending_yaw -= dx * self.config.drag_sensitivity;
        self.pending_pitch += dy * self.config.drag_sensitivity;
    }

    /// Dolly in or out by scroll `delta` notches.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1))
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Advance easing and idle rotation by one frame of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.auto_rotate && !self.dragging {
            self.yaw -= self.config.auto_rotate_speed * dt;
        }

        let applied = self.config.damping.clamp(0.0, 1.0);
        self.yaw += self.pending_yaw * applied;
        self.pitch = (self.pitch + self.pending_pitch * applied).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.pending_yaw *= 1.0 - applied;
        self.pending_pitch *= 1.0 - applied;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(CameraConfig::default(), false)
    }

    #[test]
    fn test_initial_position_on_z() {
        let cam = camera();
        let p = cam.position();
        assert!((p.x).abs() < 1e-6);
        assert!((p.y).abs() < 1e-6);
        assert!((p.z - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut cam = camera();
        for _ in 0..100 {
            cam.zoom(1.0);
        }
        assert!((cam.distance() - 3.2).abs() < 1e-5);
        for _ in 0..100 {
            cam.zoom(-1.0);
        }
        assert!((cam.distance() - 12.0).abs() < 1e-5);
    }

    #[test]
    fn test_drag_fully_applied_after_easing() {
        let mut cam = camera();
        cam.begin_drag();
        cam.orbit(100.0, 0.0);
        cam.end_drag();
        for _ in 0..400 {
            cam.update(0.016);
        }
        // 100 px at 0.005 rad/px, applied through the damping series.
        assert!((cam.yaw + 0.5).abs() < 1e-3, "yaw = {}", cam.yaw);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut cam = camera();
        cam.begin_drag();
        cam.orbit(0.0, 1e6);
        cam.end_drag();
        for _ in 0..400 {
            cam.update(0.016);
        }
        assert!(cam.pitch <= PITCH_LIMIT + 1e-6);
        let p = cam.position();
        assert!(p.y < cam.distance());
    }

    #[test]
    fn test_auto_rotate_pauses_while_dragging() {
        let mut cam = OrbitCamera::new(CameraConfig::default(), true);
        cam.update(0.016);
        let spun = cam.yaw;
        assert!(spun != 0.0);

        cam.begin_drag();
        cam.update(0.016);
        assert_eq!(cam.yaw, spun);

        cam.end_drag();
        cam.update(0.016);
        assert!(cam.yaw != spun);
    }

    #[test]
    fn test_view_projection_finite() {
        let cam = camera();
        let vp = cam.view_projection(16.0 / 9.0);
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
