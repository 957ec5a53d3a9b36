//! The "Debug" egui window.

use inkstroke_egui::egui;
use inkstroke_render::{Color, MaterialError, UniformMap, UniformValue};
use inkstroke_text::uniforms;

/// Values edited through the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParameters {
    pub color: Color,
}

pub struct DebugPanel {
    pub material_parameters: MaterialParameters,
}

impl DebugPanel {
    pub fn new(color: Color) -> Self {
        Self {
            material_parameters: MaterialParameters { color },
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, material_uniforms: &mut UniformMap) {
        let mut changed = None;

        egui::Window::new("Debug")
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let mut rgb = self.material_parameters.color.to_rgb_u8();
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        changed = Some(Color::from_rgb_u8(rgb[0], rgb[1], rgb[2]));
                    }
                    ui.label("color");
                });
            });

        if let Some(color) = changed
            && let Err(err) = self.set_color(color, material_uniforms)
        {
            tracing::error!("Failed to update text color: {}", err);
        }
    }

    /// Store the color and write it to `uColor`.
    pub fn set_color(
        &mut self,
        color: Color,
        material_uniforms: &mut UniformMap,
    ) -> Result<(), MaterialError> {
        self.material_parameters.color = color;
        material_uniforms.set(uniforms::COLOR, UniformValue::Color(color))
    }
}
