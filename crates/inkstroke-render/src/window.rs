use std::sync::Arc;

use inkstroke_core::{
    geometry::{LogicalSize, PhysicalSize},
    profiling::profile_function,
};
use inkstroke_winit::{
    WindowId,
    window::{Window, WindowBackend},
};

use crate::{
    context::{GraphicsContext, GraphicsError},
    frame::{FrameContext, FrameStats, Surface},
};

/// The presentable pixel buffer of a window, sized in logical pixels and a
/// pixel ratio. The backing storage is `size * pixel_ratio` physical pixels.
pub trait DrawingBuffer {
    fn set_size(&mut self, size: LogicalSize<u32>);
    fn set_pixel_ratio(&mut self, ratio: f64);
    fn size(&self) -> LogicalSize<u32>;
    fn pixel_ratio(&self) -> f64;

    /// Physical dimensions of the backing storage, never below 1x1.
    fn physical_size(&self) -> PhysicalSize<u32> {
        let physical = self.size().to_physical(self.pixel_ratio());
        PhysicalSize::new(physical.width.max(1), physical.height.max(1))
    }
}

/// Descriptor for configuring a window's rendering context.
#[derive(Default)]
pub struct WindowContextDescriptor {
    /// The surface texture format. If None, the surface's preferred sRGB format is used.
    pub format: Option<wgpu::TextureFormat>,
    pub present_mode: Option<wgpu::PresentMode>,
}

/// A window together with the surface it presents to.
pub struct RenderableWindow {
    window: Window,
    context: Arc<GraphicsContext>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    logical_size: LogicalSize<u32>,
    pixel_ratio: f64,
    reconfigure: bool,
}

impl RenderableWindow {
    pub fn new(
        window: Window,
        context: Arc<GraphicsContext>,
        pixel_ratio: f64,
    ) -> Result<Self, GraphicsError> {
        Self::new_with_descriptor(window, context, pixel_ratio, WindowContextDescriptor::default())
    }

    pub fn new_with_descriptor(
        window: Window,
        context: Arc<GraphicsContext>,
        pixel_ratio: f64,
        descriptor: WindowContextDescriptor,
    ) -> Result<Self, GraphicsError> {
        let logical_size = window.logical_size();
        let surface = context.instance.create_surface(window.window.clone())?;

        let physical = logical_size.to_physical(pixel_ratio);
        let mut config = surface
            .get_default_config(
                &context.adapter,
                physical.width.max(1),
                physical.height.max(1),
            )
            .ok_or(GraphicsError::UnsupportedSurface)?;

        let capabilities = surface.get_capabilities(&context.adapter);
        config.format = descriptor.format.unwrap_or_else(|| {
            capabilities
                .formats
                .iter()
                .copied()
                .find(|format| format.is_srgb())
                .unwrap_or(config.format)
        });
        if let Some(present_mode) = descriptor.present_mode {
            config.present_mode = present_mode;
        }

        surface.configure(&context.device, &config);

        tracing::debug!(
            "Configured surface {}x{} ({:?}) for logical size {}x{} at ratio {}",
            config.width,
            config.height,
            config.format,
            logical_size.width,
            logical_size.height,
            pixel_ratio
        );

        Ok(Self {
            window,
            context,
            surface,
            config,
            logical_size,
            pixel_ratio,
            reconfigure: false,
        })
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn graphics_context(&self) -> &Arc<GraphicsContext> {
        &self.context
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn surface_config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    fn apply_pending_configuration(&mut self) {
        if !self.reconfigure {
            return;
        }
        let PhysicalSize { width, height } = DrawingBuffer::physical_size(self);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.context.device, &self.config);
        self.reconfigure = false;
        tracing::debug!("Reconfigured surface to {}x{}", width, height);
    }
}

impl DrawingBuffer for RenderableWindow {
    fn set_size(&mut self, size: LogicalSize<u32>) {
        if self.logical_size != size {
            self.logical_size = size;
            self.reconfigure = true;
        }
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        if self.pixel_ratio != ratio {
            self.pixel_ratio = ratio;
            self.reconfigure = true;
        }
    }

    fn size(&self) -> LogicalSize<u32> {
        self.logical_size
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

impl WindowBackend for RenderableWindow {
    type FrameContext = FrameContext;
    type Error = wgpu::SurfaceError;

    fn begin_drawing(&mut self) -> Result<Self::FrameContext, Self::Error> {
        profile_function!();

        self.apply_pending_configuration();

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.context.device, &self.config);
                self.surface.get_current_texture()?
            }
            Err(err) => return Err(err),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        Ok(FrameContext {
            surface: Some(Surface {
                texture: frame,
                view,
            }),
            encoder: Some(encoder),
            context: self.context.clone(),
            stats: FrameStats::new(),
            window: self.window.window.clone(),
            surface_format: self.config.format,
        })
    }
}
