//! Window size tracking and resize propagation.

use inkstroke_core::geometry::LogicalSize;
use inkstroke_core::math::Vec2;
use inkstroke_render::{Camera, DrawingBuffer};

/// Current window size in logical pixels and the capped pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
    max_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(size: LogicalSize<u32>, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        Self {
            width: size.width,
            height: size.height,
            pixel_ratio: scale_factor.min(max_pixel_ratio),
            max_pixel_ratio,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// `width / height`, or `None` while the window has no height.
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.height > 0).then(|| self.width as f32 / self.height as f32)
    }

    pub fn on_resize(
        &mut self,
        size: LogicalSize<u32>,
        camera: &mut Camera,
        buffer: &mut impl DrawingBuffer,
    ) {
        self.width = size.width;
        self.height = size.height;
        self.apply(camera, buffer);
    }

    pub fn on_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        camera: &mut Camera,
        buffer: &mut impl DrawingBuffer,
    ) {
        self.pixel_ratio = scale_factor.min(self.max_pixel_ratio);
        self.apply(camera, buffer);
    }

    fn apply(&self, camera: &mut Camera, buffer: &mut impl DrawingBuffer) {
        // A minimised window keeps the last valid projection
        if let Some(aspect) = self.aspect_ratio() {
            camera.set_aspect_ratio(aspect);
        }
        buffer.set_size(LogicalSize::new(self.width, self.height));
        buffer.set_pixel_ratio(self.pixel_ratio);

        tracing::debug!(
            "Viewport {}x{} @ {}x",
            self.width,
            self.height,
            self.pixel_ratio
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use inkstroke_core::geometry::PhysicalSize;

    #[derive(Default)]
    pub(crate) struct FakeBuffer {
        pub size: LogicalSize<u32>,
        pub ratio: f64,
    }

    impl DrawingBuffer for FakeBuffer {
        fn set_size(&mut self, size: LogicalSize<u32>) {
            self.size = size;
        }

        fn set_pixel_ratio(&mut self, ratio: f64) {
            self.ratio = ratio;
        }

        fn size(&self) -> LogicalSize<u32> {
            self.size
        }

        fn pixel_ratio(&self) -> f64 {
            self.ratio
        }
    }

    fn camera() -> Camera {
        Camera::perspective(25.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn resize_updates_camera_and_buffer() {
        let mut viewport = Viewport::new(LogicalSize::new(800, 600), 1.0, 2.0);
        let mut camera = camera();
        let mut buffer = FakeBuffer::default();

        viewport.on_resize(LogicalSize::new(1024, 512), &mut camera, &mut buffer);

        assert_eq!(camera.aspect_ratio(), 2.0);
        assert_eq!(buffer.size, LogicalSize::new(1024, 512));
        assert_eq!(buffer.ratio, 1.0);
        assert_eq!(buffer.physical_size(), PhysicalSize::new(1024, 512));
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let mut viewport = Viewport::new(LogicalSize::new(800, 600), 3.0, 2.0);
        assert_eq!(viewport.pixel_ratio, 2.0);

        let mut camera = camera();
        let mut buffer = FakeBuffer::default();
        viewport.on_scale_factor_changed(1.5, &mut camera, &mut buffer);
        assert_eq!(buffer.ratio, 1.5);

        viewport.on_scale_factor_changed(4.0, &mut camera, &mut buffer);
        assert_eq!(buffer.ratio, 2.0);
        assert_eq!(buffer.physical_size(), PhysicalSize::new(1600, 1200));
    }

    #[test]
    fn zero_height_keeps_projection() {
        let mut viewport = Viewport::new(LogicalSize::new(800, 400), 1.0, 2.0);
        let mut camera = camera();
        let mut buffer = FakeBuffer::default();

        viewport.on_resize(LogicalSize::new(800, 400), &mut camera, &mut buffer);
        viewport.on_resize(LogicalSize::new(0, 0), &mut camera, &mut buffer);

        assert_eq!(camera.aspect_ratio(), 2.0);
        assert_eq!(buffer.size, LogicalSize::new(0, 0));
        assert_eq!(buffer.physical_size(), PhysicalSize::new(1, 1));
    }
}
