//! Perspective camera with view-projection matrix management.
//!
//! ```
//! use inkstroke_render::Camera;
//! use glam::{Vec2, Vec3};
//!
//! let mut camera = Camera::perspective(25.0, 16.0 / 9.0, 0.1, 100.0);
//! camera.look_at(Vec3::new(0.0, 0.0, 27.0), Vec3::ZERO, Vec3::Y);
//!
//! let screen = camera.world_to_screen(Vec3::ZERO, Vec2::new(1600.0, 900.0));
//! assert!((screen.x - 800.0).abs() < 1e-3);
//! ```

use glam::{Mat4, Vec2, Vec3, Vec4};

/// A perspective camera with cached view and projection matrices.
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    fov_y_radians: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    view_projection_matrix: Mat4,
    /// Set when any input of the matrices changes
    dirty: bool,
}

impl Camera {
    /// Create a perspective camera.
    ///
    /// # Arguments
    ///
    /// * `fov_y_degrees` - Vertical field of view in degrees
    /// * `aspect_ratio` - Aspect ratio (width / height)
    /// * `near` - Near clip plane
    /// * `far` - Far clip plane
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_radians: fov_y_degrees.to_radians(),
            aspect_ratio,
            near,
            far,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
            dirty: true,
        };

        camera.update_matrices();
        camera
    }

    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.position = eye;
        self.target = target;
        self.up = up;
        self.dirty = true;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.dirty = true;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_radians.to_degrees()
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Update the aspect ratio and mark the projection for recomputation.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.dirty = true;
    }

    pub fn view_matrix(&mut self) -> Mat4 {
        if self.dirty {
            self.update_matrices();
        }
        self.view_matrix
    }

    pub fn projection_matrix(&mut self) -> Mat4 {
        if self.dirty {
            self.update_matrices();
        }
        self.projection_matrix
    }

    pub fn view_projection_matrix(&mut self) -> Mat4 {
        if self.dirty {
            self.update_matrices();
        }
        self.view_projection_matrix
    }

    /// Project a world position into normalized device coordinates.
    ///
    /// `x` and `y` are in `-1.0..=1.0` for points inside the frustum, with
    /// `+y` pointing up.
    pub fn project(&mut self, world_pos: Vec3) -> Vec3 {
        let clip = self.view_projection_matrix() * Vec4::from((world_pos, 1.0));
        clip.truncate() / clip.w
    }

    /// Convert world coordinates to screen coordinates (pixels, `+y` down).
    pub fn world_to_screen(&mut self, world_pos: Vec3, viewport_size: Vec2) -> Vec2 {
        let ndc = self.project(world_pos);

        let screen_x = (1.0 + ndc.x) / 2.0 * viewport_size.x;
        let screen_y = (1.0 - ndc.y) / 2.0 * viewport_size.y;

        Vec2::new(screen_x, screen_y)
    }

    fn update_matrices(&mut self) {
        self.view_matrix = Mat4::look_at_rh(self.position, self.target, self.up);
        self.projection_matrix =
            Mat4::perspective_rh(self.fov_y_radians, self.aspect_ratio, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;

        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_camera(aspect: f32) -> Camera {
        let mut camera = Camera::perspective(25.0, aspect, 0.1, 100.0);
        camera.look_at(Vec3::new(0.0, 0.0, 27.0), Vec3::ZERO, Vec3::Y);
        camera
    }

    #[test]
    fn test_perspective_camera() {
        let mut camera = scene_camera(16.0 / 9.0);
        assert!(!camera.view_projection_matrix().is_nan());
    }

    #[test]
    fn test_target_projects_to_center() {
        let mut camera = scene_camera(1.5);
        let ndc = camera.project(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_world_to_screen_flips_y() {
        let mut camera = scene_camera(1.0);
        let viewport = Vec2::new(800.0, 800.0);

        let above = camera.world_to_screen(Vec3::new(0.0, 1.0, 0.0), viewport);
        let right = camera.world_to_screen(Vec3::new(1.0, 0.0, 0.0), viewport);

        assert!(above.y < 400.0);
        assert!((above.x - 400.0).abs() < 1e-3);
        assert!(right.x > 400.0);
    }

    #[test]
    fn test_aspect_ratio_changes_projection() {
        let mut camera = scene_camera(1.0);
        let before = camera.projection_matrix();

        camera.set_aspect_ratio(2.0);
        assert_eq!(camera.aspect_ratio(), 2.0);
        assert_ne!(camera.projection_matrix(), before);
    }

    #[test]
    fn test_frustum_edge_maps_to_ndc_one() {
        let mut camera = scene_camera(1.0);
        let half_height = 27.0 * (25.0f32.to_radians() / 2.0).tan();
        let ndc = camera.project(Vec3::new(0.0, half_height, 0.0));
        assert!((ndc.y - 1.0).abs() < 1e-4);
    }
}
