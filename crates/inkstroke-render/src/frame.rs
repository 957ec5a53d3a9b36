use std::sync::Arc;

use inkstroke_core::profiling::{profile_function, profile_scope};
use inkstroke_winit::window::WinitWindow;

use crate::{Color, context::GraphicsContext};

/// Statistics for a rendered frame.
pub struct FrameStats {
    pub passes: usize,
    pub draw_calls: usize,
}

impl FrameStats {
    pub(crate) fn new() -> Self {
        Self {
            passes: 0,
            draw_calls: 0,
        }
    }
}

/// Surface texture and view for rendering.
pub struct Surface {
    pub(crate) texture: wgpu::SurfaceTexture,
    pub(crate) view: wgpu::TextureView,
}

impl Surface {
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Context for a single frame of rendering.
///
/// Dropping the frame submits the recorded commands, presents the surface and
/// requests the next redraw, so a window that keeps presenting keeps animating.
pub struct FrameContext {
    pub(crate) stats: FrameStats,
    pub(crate) surface: Option<Surface>,
    pub(crate) encoder: Option<wgpu::CommandEncoder>,
    pub(crate) context: Arc<GraphicsContext>,
    pub(crate) window: Arc<WinitWindow>,
    pub(crate) surface_format: wgpu::TextureFormat,
}

impl FrameContext {
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn increment_draw_calls(&mut self) {
        self.stats.draw_calls += 1;
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn graphics_context(&self) -> &Arc<GraphicsContext> {
        &self.context
    }

    /// Encoder and surface of the frame. Both live until the frame is dropped.
    pub fn encoder_and_surface(&mut self) -> (&mut wgpu::CommandEncoder, &Surface) {
        match (self.encoder.as_mut(), self.surface.as_ref()) {
            (Some(encoder), Some(surface)) => (encoder, surface),
            _ => unreachable!("frame resources are only released on drop"),
        }
    }

    pub fn finish(self) {
        drop(self);
    }
}

impl Drop for FrameContext {
    fn drop(&mut self) {
        profile_function!();

        if self.stats.passes == 0 {
            tracing::error!("No render passes were executed for this frame!");
        }

        if let Some(encoder) = self.encoder.take() {
            profile_scope!("submit_commands");
            self.context.queue.submit(std::iter::once(encoder.finish()));
        }

        if let Some(surface) = self.surface.take() {
            profile_scope!("present_surface");
            self.window.pre_present_notify();
            surface.texture.present();
        }

        self.window.request_redraw();
    }
}

/// Clear operation for a render pass.
#[derive(Debug, Clone, Copy, Default)]
pub enum ClearOp {
    /// Load existing contents (no clear).
    #[default]
    Load,
    /// Clear to the specified color.
    Clear(wgpu::Color),
}

impl From<wgpu::Color> for ClearOp {
    fn from(color: wgpu::Color) -> Self {
        ClearOp::Clear(color)
    }
}

impl From<Color> for ClearOp {
    fn from(color: Color) -> Self {
        ClearOp::Clear(color.to_wgpu())
    }
}

/// Builder for render passes targeting the frame's surface.
#[derive(Default)]
pub struct RenderPassBuilder<'a> {
    label: Option<&'a str>,
    clear_op: ClearOp,
}

impl<'a> RenderPassBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Pass a color to clear, or [`ClearOp::Load`] to keep existing contents.
    pub fn clear_color(mut self, color: impl Into<ClearOp>) -> Self {
        self.clear_op = color.into();
        self
    }

    /// Begins the pass on the frame's surface.
    ///
    /// The frame stays mutably borrowed until the returned pass is dropped or
    /// [`finish`](RenderPass::finish)ed, so commands recorded afterwards land
    /// after the pass.
    pub fn build(self, frame_context: &'a mut FrameContext) -> RenderPass<'a> {
        let load = match self.clear_op {
            ClearOp::Load => wgpu::LoadOp::Load,
            ClearOp::Clear(color) => wgpu::LoadOp::Clear(color),
        };

        let (encoder, surface) = frame_context.encoder_and_surface();
        let pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: self.label,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            })
            .forget_lifetime();

        frame_context.stats.passes += 1;

        RenderPass {
            context: frame_context,
            pass,
        }
    }
}

/// A render pass recording into its frame's encoder.
pub struct RenderPass<'a> {
    context: &'a mut FrameContext,
    pass: wgpu::RenderPass<'static>,
}

impl RenderPass<'_> {
    pub fn descriptor(&mut self) -> &mut wgpu::RenderPass<'static> {
        &mut self.pass
    }

    pub fn increment_draw_calls(&mut self) {
        self.context.increment_draw_calls();
    }

    pub fn finish(self) {
        drop(self);
    }
}
