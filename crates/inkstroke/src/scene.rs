//! The text scene: camera rig, MSDF material and the text mesh.

use std::sync::Arc;

use indexmap::IndexMap;
use inkstroke_core::math::{Mat4, Vec2, Vec3};
use inkstroke_core::profiling::profile_function;
use inkstroke_render::{
    Camera, GraphicsContext, MaterialDescriptor, MaterialError, MaterialExtensions, OrbitControls,
    ShaderMaterial, Side, Texture, UniformMap, UniformValue,
};
use inkstroke_text::{MSDF_SHADER, MsdfFont, TextLayout, TextMesh, UNSET_POINTER, uniforms};

use crate::config::SceneConfig;
use crate::error::AppResult;
use crate::pointer::{PointerState, ScreenRect};
use crate::viewport::Viewport;

/// Uniform table of the text material: the preset groups in order, then
/// the scene's own entries.
pub fn material_uniforms(config: &SceneConfig) -> UniformMap {
    let mut map = UniformMap::merged([
        &uniforms::common(),
        &uniforms::rendering(),
        &uniforms::strokes(),
    ]);
    map.insert(uniforms::STROKE_COLOR, UniformValue::Color(config.stroke_color));
    map.insert(uniforms::TIME, UniformValue::Float(0.0));
    map.insert(
        uniforms::MOUSE,
        UniformValue::Vec2(Vec2::splat(UNSET_POINTER)),
    );
    map
}

pub fn build_material(config: &SceneConfig) -> ShaderMaterial {
    let mut defines = IndexMap::new();
    defines.insert("IS_SMALL".to_string(), config.is_small);

    ShaderMaterial::new(
        "MSDF Text Material",
        MSDF_SHADER,
        material_uniforms(config),
        MaterialDescriptor {
            side: Side::Double,
            transparent: true,
            defines,
            extensions: MaterialExtensions {
                derivatives: config.derivatives,
            },
        },
    )
}

/// Screen rectangle of a `size` world-unit rectangle centered on `center`,
/// facing the camera's default view direction.
pub fn mesh_screen_rect(
    camera: &mut Camera,
    center: Vec3,
    size: Vec2,
    viewport_size: Vec2,
) -> ScreenRect {
    let half = size / 2.0;
    let top_left = Vec3::new(center.x - half.x, center.y + half.y, center.z);
    let top_right = Vec3::new(center.x + half.x, center.y + half.y, center.z);
    let bottom_right = Vec3::new(center.x + half.x, center.y - half.y, center.z);

    let top_left = camera.world_to_screen(top_left, viewport_size);
    let top_right = camera.world_to_screen(top_right, viewport_size);
    let bottom_right = camera.world_to_screen(bottom_right, viewport_size);

    ScreenRect {
        left: top_left.x,
        right: top_right.x,
        top: top_left.y,
        bottom: bottom_right.y,
    }
}

pub struct Scene {
    pub camera: Camera,
    pub controls: OrbitControls,
    material: ShaderMaterial,
    mesh: Option<TextMesh>,
    text: String,
    mesh_position: Vec3,
    mesh_scale: Vec3,
    assumed_mesh_size: Vec2,
}

impl Scene {
    pub fn new(config: &SceneConfig, viewport: &Viewport) -> Self {
        let camera_config = &config.camera;
        let mut camera = Camera::perspective(
            camera_config.fov_y_degrees,
            viewport.aspect_ratio().unwrap_or(1.0),
            camera_config.near,
            camera_config.far,
        );
        camera.look_at(camera_config.position, camera_config.target, Vec3::Y);

        let controls = OrbitControls::new(camera_config.target)
            .with_damping(camera_config.damping_factor)
            .with_distance_range(camera_config.near, camera_config.far);

        Self {
            camera,
            controls,
            material: build_material(config),
            mesh: None,
            text: config.text.clone(),
            mesh_position: config.mesh_position,
            mesh_scale: config.mesh_scale,
            assumed_mesh_size: config.assumed_mesh_size,
        }
    }

    pub fn material(&self) -> &ShaderMaterial {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut ShaderMaterial {
        &mut self.material
    }

    pub fn mesh(&self) -> Option<&TextMesh> {
        self.mesh.as_ref()
    }

    /// Per-frame update: clock and pointer uniforms, then camera damping.
    pub fn tick(&mut self, elapsed_seconds: f32, pointer: PointerState) -> Result<(), MaterialError> {
        let map = self.material.uniforms_mut();
        map.set(uniforms::TIME, UniformValue::Float(elapsed_seconds))?;
        map.set(uniforms::MOUSE, UniformValue::Vec2(pointer.to_uniform()))?;

        self.controls.update(&mut self.camera);
        Ok(())
    }

    /// Build the text mesh from a loaded font and return the pointer
    /// rectangle for the current camera and viewport.
    pub fn attach_text(
        &mut self,
        context: &GraphicsContext,
        font: &MsdfFont,
        viewport: &Viewport,
    ) -> AppResult<ScreenRect> {
        profile_function!();

        let geometry = TextLayout::new(self.text.as_str()).build(&font.descriptor);

        let atlas = Texture::from_image(context, &font.atlas, Some("MSDF Atlas"))?;
        self.material
            .uniforms_mut()
            .bind_texture(uniforms::MAP, Arc::new(atlas))?;

        let mut mesh = TextMesh::new(context, geometry);
        mesh.scale = self.mesh_scale;
        mesh.position = self.mesh_position;
        tracing::info!(
            "Built text mesh '{}' with {} glyphs",
            self.text,
            mesh.geometry().letter_count
        );

        let bounds = mesh.world_bounds();
        tracing::debug!(
            "Text mesh bounds: {:?} .. {:?} (center {:?})",
            bounds.min,
            bounds.max,
            bounds.center()
        );

        let rect = mesh_screen_rect(
            &mut self.camera,
            mesh.position,
            self.assumed_mesh_size,
            viewport.size(),
        );
        tracing::info!("Text mesh screen rectangle: {:?}", rect);

        self.mesh = Some(mesh);
        Ok(rect)
    }

    /// Transform for the shader, once the mesh exists.
    pub fn model_view_projection(&mut self) -> Option<Mat4> {
        let model = self.mesh.as_ref()?.model_matrix();
        Some(self.camera.view_projection_matrix() * model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstroke_core::geometry::LogicalSize;
    use inkstroke_render::Color;

    use crate::viewport::tests::FakeBuffer;

    fn scene() -> (Scene, Viewport) {
        let config = SceneConfig::default();
        let viewport = Viewport::new(LogicalSize::new(1280, 720), 1.0, 2.0);
        (Scene::new(&config, &viewport), viewport)
    }

    #[test]
    fn uniforms_are_merged_in_order() {
        let map = material_uniforms(&SceneConfig::default());
        let names: Vec<&str> = map.names().collect();
        assert_eq!(
            names,
            vec![
                "uOpacity",
                "uColor",
                "uMap",
                "uThreshold",
                "uAlphaTest",
                "uStrokeColor",
                "uStrokeOutsetWidth",
                "uStrokeInsetWidth",
                "uTime",
                "uMouse",
            ]
        );
        // The scene's stroke color wins over the preset
        assert_eq!(map.color(uniforms::STROKE_COLOR), Some(Color::from_hex(0x0000ff)));
        assert_eq!(map.float(uniforms::TIME), Some(0.0));
    }

    #[test]
    fn material_flags() {
        let material = build_material(&SceneConfig::default());
        let descriptor = material.descriptor();
        assert_eq!(descriptor.side, Side::Double);
        assert!(descriptor.transparent);
        assert_eq!(descriptor.defines.get("IS_SMALL"), Some(&false));
        assert!(descriptor.extensions.derivatives);
    }

    #[test]
    fn atlas_is_unbound_before_load() {
        let (scene, _) = scene();
        assert!(scene.material().uniforms().contains(uniforms::MAP));
        assert!(scene.material().uniforms().texture(uniforms::MAP).is_none());
        assert!(scene.mesh().is_none());
    }

    #[test]
    fn tick_time_never_decreases() {
        let (mut scene, _) = scene();
        let mut tracker = inkstroke_winit::time::TimeTracker::new();
        let mut last = 0.0;

        for _ in 0..5 {
            let time = tracker.tick();
            scene
                .tick(time.elapsed_seconds(), PointerState::default())
                .unwrap();
            let current = scene.material().uniforms().float(uniforms::TIME).unwrap();
            assert!(current >= last);
            last = current;
        }
    }

    #[test]
    fn tick_writes_pointer() {
        let (mut scene, _) = scene();
        scene
            .tick(
                0.5,
                PointerState {
                    x: Some(0.25),
                    y: None,
                },
            )
            .unwrap();
        assert_eq!(
            scene.material().uniforms().vec2(uniforms::MOUSE),
            Some(Vec2::new(0.25, UNSET_POINTER))
        );
    }

    #[test]
    fn screen_rect_is_centered_on_mesh_position() {
        let (mut scene, viewport) = scene();
        let rect = mesh_screen_rect(
            &mut scene.camera,
            Vec3::new(0.0, 0.0, -20.0),
            Vec2::new(10.0, 5.0),
            viewport.size(),
        );

        assert!((rect.left + rect.right - 1280.0).abs() < 1e-2);
        assert!((rect.top + rect.bottom - 720.0).abs() < 1e-2);
        assert!(rect.left < rect.right);
        assert!(rect.top < rect.bottom);
    }

    #[test]
    fn screen_rect_is_frozen_after_load() {
        let (mut scene, mut viewport) = scene();
        let rect = mesh_screen_rect(
            &mut scene.camera,
            Vec3::new(-15.0, 0.0, -20.0),
            Vec2::new(10.0, 5.0),
            viewport.size(),
        );
        let mut mapper = crate::pointer::PointerMapper::new(Default::default());
        mapper.activate(rect);

        let mut buffer = FakeBuffer::default();
        viewport.on_resize(LogicalSize::new(640, 640), &mut scene.camera, &mut buffer);
        scene.controls.dolly(1.0);
        for _ in 0..10 {
            scene.tick(0.0, PointerState::default()).unwrap();
        }

        assert_eq!(mapper.rect(), Some(rect));
        let recomputed = mesh_screen_rect(
            &mut scene.camera,
            Vec3::new(-15.0, 0.0, -20.0),
            Vec2::new(10.0, 5.0),
            viewport.size(),
        );
        assert_ne!(recomputed, rect);
    }
}
