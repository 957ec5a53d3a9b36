//! The demo application: one window, one text mesh, one render loop.

use std::sync::Arc;

use inkstroke_assets::{AssetTask, FileReader, TaskPool};
use inkstroke_core::math::Vec2;
use inkstroke_core::profiling::{new_frame, profile_function, profile_scope};
use inkstroke_egui::Egui;
use inkstroke_render::{GraphicsContext, OrbitAction, RenderPassBuilder, RenderableWindow};
use inkstroke_text::{MsdfFont, MsdfFontSource, MsdfPipeline};
use inkstroke_winit::{
    FrameTime, WindowId,
    app::{App, AppCtx},
    event::{Event, EventBatch, HandleStatus, MouseButton, MouseScrollDelta},
    window::{WindowBackend, WindowDescriptor},
};

use crate::config::SceneConfig;
use crate::debug_panel::DebugPanel;
use crate::error::AppResult;
use crate::pointer::{PointerCell, PointerMapper};
use crate::scene::Scene;
use crate::viewport::Viewport;

enum FontLoad {
    Pending(AssetTask<MsdfFont>),
    Done,
}

pub struct InkstrokeApp {
    config: SceneConfig,
    context: Arc<GraphicsContext>,
    window: RenderableWindow,
    window_id: WindowId,
    egui: Egui,
    debug_panel: DebugPanel,

    viewport: Viewport,
    scene: Scene,
    pipeline: MsdfPipeline,

    pointer: PointerCell,
    pointer_mapper: PointerMapper,
    cursor: Vec2,

    font: FontLoad,
    _task_pool: TaskPool,
}

impl InkstrokeApp {
    pub fn new(ctx: &mut AppCtx, config: SceneConfig) -> AppResult<Self> {
        profile_function!();

        let context = GraphicsContext::new_owned_sync()?;

        let window = ctx.create_window(WindowDescriptor {
            title: config.title.clone(),
            size: Some(config.window_size),
            ..Default::default()
        })?;
        let viewport = Viewport::new(
            window.logical_size(),
            window.scale_factor().get(),
            config.max_pixel_ratio,
        );
        let window = RenderableWindow::new(window, context.clone(), viewport.pixel_ratio)?;
        let window_id = window.id();

        let scene = Scene::new(&config, &viewport);
        let pipeline = MsdfPipeline::new(&context, scene.material(), window.surface_format());
        let egui = Egui::new(&window, &context);

        let task_pool = TaskPool::new(1)?;
        let reader = Arc::new(FileReader::new(&config.asset_root));
        let source = MsdfFontSource::new(&config.font_descriptor, &config.font_atlas);
        let font = AssetTask::spawn(&task_pool, "MSDF font", MsdfFont::load(reader, source));

        let pointer = PointerCell::default();
        let pointer_mapper = PointerMapper::new(pointer.clone());

        Ok(Self {
            debug_panel: DebugPanel::new(config.debug_color),
            config,
            context,
            window,
            window_id,
            egui,
            viewport,
            scene,
            pipeline,
            pointer,
            pointer_mapper,
            cursor: Vec2::ZERO,
            font: FontLoad::Pending(font),
            _task_pool: task_pool,
        })
    }

    fn poll_font(&mut self) {
        let FontLoad::Pending(task) = &mut self.font else {
            return;
        };
        let Some(result) = task.poll() else {
            return;
        };
        self.font = FontLoad::Done;

        let font = match result {
            Ok(font) => font,
            Err(err) => {
                tracing::error!(
                    "Failed to load MSDF font from {}: {} (see assets/fonts/README.md)",
                    self.config.asset_root.display(),
                    err
                );
                return;
            }
        };

        match self.scene.attach_text(&self.context, &font, &self.viewport) {
            Ok(rect) => self.pointer_mapper.activate(rect),
            Err(err) => tracing::error!("Failed to build text mesh: {}", err),
        }
    }

    fn handle_events(&mut self, events: &mut EventBatch) {
        profile_function!();

        events.dispatch(|event| match event {
            Event::WindowResized(size) => {
                self.viewport
                    .on_resize(*size, &mut self.scene.camera, &mut self.window);
                HandleStatus::consumed()
            }
            Event::ScaleFactorChanged(scale_factor) => {
                self.viewport.on_scale_factor_changed(
                    *scale_factor,
                    &mut self.scene.camera,
                    &mut self.window,
                );
                HandleStatus::consumed()
            }
            Event::MouseMoved(position) => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                self.pointer_mapper.on_pointer_move(self.cursor.x, self.cursor.y);
                if self.scene.controls.is_dragging() {
                    self.scene.controls.drag_to(
                        &self.scene.camera,
                        self.cursor,
                        self.viewport.height as f32,
                    );
                }
                HandleStatus::handled()
            }
            Event::MouseButtonDown(button) => match orbit_action(*button) {
                Some(action) => {
                    self.scene.controls.begin_drag(action, self.cursor);
                    HandleStatus::handled()
                }
                None => HandleStatus::ignored(),
            },
            Event::MouseButtonUp(button) if orbit_action(*button).is_some() => {
                self.scene.controls.end_drag();
                HandleStatus::handled()
            }
            Event::MouseScrolled(delta) => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                // Wheel up zooms in
                self.scene.controls.dolly(-delta_y);
                HandleStatus::handled()
            }
            _ => HandleStatus::ignored(),
        });
    }
}

fn orbit_action(button: MouseButton) -> Option<OrbitAction> {
    match button {
        MouseButton::Left => Some(OrbitAction::Rotate),
        MouseButton::Right => Some(OrbitAction::Pan),
        _ => None,
    }
}

impl App for InkstrokeApp {
    fn update(&mut self, _ctx: &mut AppCtx, time: &FrameTime) {
        new_frame();
        profile_function!();

        self.poll_font();

        if let Err(err) = self.scene.tick(time.elapsed_seconds(), self.pointer.get()) {
            tracing::error!("Failed to update material uniforms: {}", err);
        }
    }

    fn render(&mut self, _ctx: &mut AppCtx, window_id: WindowId, events: &mut EventBatch) {
        if window_id != self.window_id {
            return;
        }
        profile_function!();

        self.egui.handle_events(events);
        self.handle_events(events);

        let uniforms = self.scene.material_mut().uniforms_mut();
        self.egui.ui(&self.window, |ctx| self.debug_panel.show(ctx, uniforms));

        let ready = match self.scene.model_view_projection() {
            Some(mvp) => self
                .pipeline
                .prepare(&self.context, self.scene.material(), mvp),
            None => false,
        };

        let mut frame = match self.window.begin_drawing() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!("Skipping frame: {}", err);
                self.window.window().window.request_redraw();
                return;
            }
        };

        {
            profile_scope!("scene_pass");
            let mut pass = RenderPassBuilder::new()
                .label("Scene Pass")
                .clear_color(self.config.clear_color.to_linear())
                .build(&mut frame);

            if ready && let Some(mesh) = self.scene.mesh() {
                self.pipeline.draw(&mut pass, mesh);
            }
        }

        self.egui.render(&self.window, &mut frame);
        frame.finish();
    }
}
