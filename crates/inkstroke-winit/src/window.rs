use std::sync::Arc;

use inkstroke_core::geometry::{LogicalSize, PhysicalSize, ScaleFactor};
pub use winit::dpi::LogicalSize as WinitLogicalSize;
pub use winit::window::Window as WinitWindow;
use winit::{error::OsError, event_loop::ActiveEventLoop};

pub struct WindowDescriptor {
    pub title: String,
    pub resizeable: bool,
    /// Initial inner size in logical pixels. `None` lets the platform decide.
    pub size: Option<LogicalSize<f64>>,
    pub visible: bool,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: "inkstroke".to_string(),
            resizeable: true,
            size: None,
            visible: true,
        }
    }
}

pub struct Window {
    pub window: Arc<WinitWindow>,
}

impl Window {
    pub fn id(&self) -> winit::window::WindowId {
        self.window.id()
    }

    /// Logical (DPI-independent) inner size.
    pub fn logical_size(&self) -> LogicalSize<u32> {
        let physical: PhysicalSize<u32> = self.window.inner_size().into();
        physical.to_logical(self.window.scale_factor())
    }

    /// Inner size in physical pixels.
    pub fn physical_size(&self) -> PhysicalSize<u32> {
        self.window.inner_size().into()
    }

    pub fn scale_factor(&self) -> ScaleFactor {
        ScaleFactor(self.window.scale_factor())
    }

    pub(crate) fn new(
        event_loop: &ActiveEventLoop,
        descriptor: WindowDescriptor,
    ) -> Result<Self, OsError> {
        let mut attributes = WinitWindow::default_attributes()
            .with_title(descriptor.title)
            .with_resizable(descriptor.resizeable)
            .with_visible(descriptor.visible);

        if let Some(size) = descriptor.size {
            attributes = attributes.with_inner_size(WinitLogicalSize::new(size.width, size.height));
        }

        let window = Arc::new(event_loop.create_window(attributes)?);

        Ok(Window { window })
    }
}

pub trait WindowBackend {
    type FrameContext;
    type Error;

    fn begin_drawing(&mut self) -> Result<Self::FrameContext, Self::Error>;
}

pub trait WindowExt {
    /// Requests a redraw of the window.
    ///
    /// Presenting a frame through a [`WindowBackend`] already schedules the
    /// next redraw; this is for kicking off the first one.
    fn request_redraw(&self);
}

impl WindowExt for Window {
    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
