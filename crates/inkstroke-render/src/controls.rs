//! Orbit camera controls with optional damping.
//!
//! Dragging with the rotate button orbits the camera around a target, the pan
//! button slides camera and target together, and the wheel dollies towards or
//! away from the target. With damping enabled, each [`OrbitControls::update`]
//! applies a fraction of the pending motion so it eases out over several
//! frames.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::Camera;

const MIN_POLAR: f32 = 1e-6;
const MAX_POLAR: f32 = PI - 1e-6;
/// Residual motion below this is considered settled.
const EPSILON: f32 = 1e-6;
/// Per-notch dolly factor.
const ZOOM_SCALE: f32 = 0.95;

/// Which drag gesture a pointer button drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitAction {
    Rotate,
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y.
    phi: f32,
    /// Azimuth around +Y, measured from +Z.
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    /// Fraction of pending motion applied per update when damping.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Pending (theta, phi) rotation.
    rotate_delta: Vec2,
    pan_offset: Vec3,
    scale: f32,
    drag: Option<(OrbitAction, Vec2)>,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            rotate_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            drag: None,
        }
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = factor;
        self
    }

    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn begin_drag(&mut self, action: OrbitAction, position: Vec2) {
        self.drag = Some((action, position));
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Feed a pointer position in logical pixels.
    ///
    /// `viewport_height` normalizes drag distance, so a drag across the full
    /// height orbits one full turn.
    pub fn drag_to(&mut self, camera: &Camera, position: Vec2, viewport_height: f32) {
        let Some((action, last)) = self.drag else {
            return;
        };
        if viewport_height <= 0.0 {
            return;
        }
        let delta = position - last;
        self.drag = Some((action, position));

        match action {
            OrbitAction::Rotate => {
                let scaled = delta * self.rotate_speed / viewport_height;
                self.rotate_left(TAU * scaled.x);
                self.rotate_up(TAU * scaled.y);
            }
            OrbitAction::Pan => self.pan(camera, delta, viewport_height),
        }
    }

    /// Positive `delta_y` (wheel towards the user) moves the camera away.
    pub fn dolly(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.scale /= ZOOM_SCALE;
        } else if delta_y < 0.0 {
            self.scale *= ZOOM_SCALE;
        }
    }

    fn rotate_left(&mut self, angle: f32) {
        self.rotate_delta.x -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.rotate_delta.y -= angle;
    }

    fn pan(&mut self, camera: &Camera, delta: Vec2, viewport_height: f32) {
        let offset = camera.position() - self.target;
        // Half the visible height at the target's depth
        let target_distance = offset.length() * (camera.fov_y_degrees().to_radians() / 2.0).tan();

        let forward = (-offset).normalize_or_zero();
        let right = forward.cross(camera.up()).normalize_or_zero();
        let up = right.cross(forward);

        let pan_x = 2.0 * delta.x * target_distance / viewport_height;
        let pan_y = 2.0 * delta.y * target_distance / viewport_height;
        self.pan_offset += -right * pan_x + up * pan_y;
    }

    /// Whether any pending motion is left to apply.
    pub fn is_settled(&self) -> bool {
        self.rotate_delta.abs().max_element() < EPSILON
            && self.pan_offset.abs().max_element() < EPSILON
            && (self.scale - 1.0).abs() < EPSILON
    }

    /// Apply pending motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if self.is_settled() {
            return false;
        }

        let mut spherical = Spherical::from_offset(camera.position() - self.target);

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        spherical.theta += self.rotate_delta.x * step;
        spherical.phi = (spherical.phi + self.rotate_delta.y * step).clamp(MIN_POLAR, MAX_POLAR);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * step;

        let position = self.target + spherical.to_offset();
        camera.look_at(position, self.target, camera.up());

        self.scale = 1.0;
        if self.enable_damping {
            self.rotate_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.rotate_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> (Camera, OrbitControls) {
        let mut camera = Camera::perspective(25.0, 1.0, 0.1, 100.0);
        camera.look_at(Vec3::new(0.0, 0.0, 27.0), Vec3::ZERO, Vec3::Y);
        let controls = OrbitControls::new(Vec3::ZERO)
            .with_damping(0.05)
            .with_distance_range(0.1, 100.0);
        (camera, controls)
    }

    #[test]
    fn spherical_round_trips_offset() {
        let offset = Vec3::new(3.0, -4.0, 12.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!(back.distance(offset) < 1e-4);
    }

    #[test]
    fn idle_update_keeps_camera_still() {
        let (mut camera, mut controls) = rig();
        assert!(!controls.update(&mut camera));
        assert!(camera.position().distance(Vec3::new(0.0, 0.0, 27.0)) < 1e-4);
    }

    #[test]
    fn damped_rotation_eases_out() {
        let (mut camera, mut controls) = rig();
        controls.begin_drag(OrbitAction::Rotate, Vec2::new(100.0, 100.0));
        controls.drag_to(&camera, Vec2::new(150.0, 100.0), 800.0);
        controls.end_drag();

        assert!(controls.update(&mut camera));
        let first = camera.position();

        controls.update(&mut camera);
        let second = camera.position();

        // Each step moves less than the previous one
        let step_one = first.distance(Vec3::new(0.0, 0.0, 27.0));
        let step_two = second.distance(first);
        assert!(step_two < step_one);

        for _ in 0..1000 {
            controls.update(&mut camera);
        }
        assert!(controls.is_settled());
        // Orbiting keeps the distance to the target
        assert!((camera.position().length() - 27.0).abs() < 1e-3);
    }

    #[test]
    fn damped_rotation_converges_to_full_drag() {
        let (mut camera, mut controls) = rig();
        controls.begin_drag(OrbitAction::Rotate, Vec2::ZERO);
        // A quarter of the viewport height is a quarter turn
        controls.drag_to(&camera, Vec2::new(200.0, 0.0), 800.0);
        controls.end_drag();

        for _ in 0..2000 {
            controls.update(&mut camera);
        }

        let position = camera.position();
        assert!(position.z.abs() < 1e-2);
        assert!((position.x + 27.0).abs() < 1e-2);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let (mut camera, mut controls) = rig();
        controls.enable_damping = false;
        controls.begin_drag(OrbitAction::Rotate, Vec2::ZERO);
        controls.drag_to(&camera, Vec2::new(0.0, 5000.0), 800.0);
        controls.update(&mut camera);

        assert!(!camera.view_matrix().is_nan());
        let position = camera.position();
        assert!(position.x.abs() + position.z.abs() > 0.0);
    }

    #[test]
    fn dolly_is_clamped_to_distance_range() {
        let (mut camera, mut controls) = rig();
        for _ in 0..200 {
            controls.dolly(1.0);
            controls.update(&mut camera);
        }
        assert!((camera.position().length() - 100.0).abs() < 1e-3);

        for _ in 0..400 {
            controls.dolly(-1.0);
            controls.update(&mut camera);
        }
        assert!((camera.position().length() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let (mut camera, mut controls) = rig();
        controls.enable_damping = false;
        controls.begin_drag(OrbitAction::Pan, Vec2::ZERO);
        controls.drag_to(&camera, Vec2::new(-100.0, 0.0), 800.0);
        controls.update(&mut camera);

        assert!(controls.target.x > 0.0);
        assert!((camera.position().x - controls.target.x).abs() < 1e-4);
        assert!(camera.target().distance(controls.target) < 1e-6);
    }

    #[test]
    fn release_ends_the_drag() {
        let (mut camera, mut controls) = rig();
        controls.enable_damping = false;
        controls.begin_drag(OrbitAction::Rotate, Vec2::ZERO);
        assert!(controls.is_dragging());

        controls.end_drag();
        assert!(!controls.is_dragging());
        controls.drag_to(&camera, Vec2::new(200.0, 0.0), 800.0);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn moves_without_drag_are_ignored() {
        let (mut camera, mut controls) = rig();
        controls.drag_to(&camera, Vec2::new(500.0, 500.0), 800.0);
        assert!(controls.is_settled());
        assert!(!controls.update(&mut camera));
    }
}
