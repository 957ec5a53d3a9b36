//! Egui integration for inkstroke.
//!
//! Translates window events into egui input and renders egui on top of the
//! current frame with `egui-wgpu`.

mod state;

use inkstroke_core::profiling::profile_function;
use inkstroke_render::{DrawingBuffer, FrameContext, GraphicsContext, RenderPassBuilder, RenderableWindow};
use inkstroke_winit::event::{EventBatch, HandleStatus};
use state::State;

pub use egui::{self, Color32, Context as EguiContext, Ui};
pub use state::EventResponse;

pub struct Egui {
    context: egui::Context,
    renderer: egui_wgpu::Renderer,
    state: State,
    full_output: Option<egui::FullOutput>,
}

impl Egui {
    pub fn new(window: &RenderableWindow, graphics_ctx: &GraphicsContext) -> Self {
        let context = egui::Context::default();
        context.set_visuals(egui::Visuals::dark());
        let state = State::new(context.clone(), context.viewport_id());

        let renderer = egui_wgpu::Renderer::new(
            graphics_ctx.device(),
            window.surface_format(),
            egui_wgpu::RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                ..Default::default()
            },
        );

        Self {
            context,
            renderer,
            state,
            full_output: None,
        }
    }

    /// Begin a UI frame and run the GUI closure.
    pub fn ui(&mut self, window: &RenderableWindow, gui: impl FnMut(&egui::Context)) {
        profile_function!();
        let raw_input = self.state.take_input(window);
        self.full_output = Some(self.context.run(raw_input, gui));
    }

    /// Render the last UI frame over whatever the frame already contains.
    pub fn render(&mut self, window: &RenderableWindow, frame: &mut FrameContext) {
        profile_function!();

        let Some(full_output) = self.full_output.take() else {
            return;
        };

        let graphics_ctx = frame.graphics_context().clone();
        let device = graphics_ctx.device();
        let queue = graphics_ctx.queue();

        let tris = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let physical = window.physical_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [physical.width, physical.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        {
            let (encoder, _) = frame.encoder_and_surface();
            let command_buffers =
                self.renderer
                    .update_buffers(device, queue, encoder, &tris, &screen_descriptor);
            if !command_buffers.is_empty() {
                queue.submit(command_buffers);
            }
        }

        {
            let mut pass = RenderPassBuilder::new().label("Egui Render Pass").build(frame);
            self.renderer
                .render(pass.descriptor(), &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    /// Offer the batch to egui. Events egui wants exclusively are removed
    /// from the batch; returns whether any were.
    pub fn handle_events(&mut self, events: &mut EventBatch) -> bool {
        profile_function!();
        let mut any_consumed = false;

        events.dispatch(|event| {
            let response = self.state.on_event(event);
            if response.consumed {
                any_consumed = true;
                HandleStatus::consumed()
            } else if response.repaint {
                HandleStatus::handled()
            } else {
                HandleStatus::ignored()
            }
        });

        any_consumed
    }

    pub fn context(&self) -> &egui::Context {
        &self.context
    }
}
