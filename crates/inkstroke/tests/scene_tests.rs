//! Scene setup against a real device.

use inkstroke::error::AppError;
use inkstroke::scene::Scene;
use inkstroke::viewport::Viewport;
use inkstroke::SceneConfig;
use inkstroke_core::geometry::LogicalSize;
use inkstroke_render::{GraphicsContext, MaterialError};
use inkstroke_text::{FontDescriptor, MsdfFont, uniforms};

fn font() -> MsdfFont {
    let json = br#"{
        "info": {"face": "Test", "size": 42},
        "common": {"lineHeight": 50, "base": 39, "scaleW": 8, "scaleH": 8},
        "chars": [
            {"id": 63, "x": 0, "y": 0, "width": 4, "height": 4, "xoffset": 0, "yoffset": 0, "xadvance": 5, "page": 0}
        ]
    }"#;
    MsdfFont {
        descriptor: FontDescriptor::from_json(json).unwrap(),
        atlas: image::RgbaImage::new(8, 8),
    }
}

#[test]
#[ignore] // Requires GPU
fn test_atlas_is_bound_exactly_once() {
    let Ok(context) = GraphicsContext::new_owned_sync() else {
        println!("GPU not available");
        return;
    };
    let config = SceneConfig::default();
    let viewport = Viewport::new(LogicalSize::new(1280, 720), 1.0, 2.0);
    let mut scene = Scene::new(&config, &viewport);
    let font = font();

    assert!(scene.material().uniforms().texture(uniforms::MAP).is_none());

    let rect = scene.attach_text(&context, &font, &viewport).unwrap();
    assert!(rect.left < rect.right);
    assert!(scene.material().uniforms().texture(uniforms::MAP).is_some());
    assert!(scene.mesh().is_some());
    assert!(scene.model_view_projection().is_some());

    let second = scene.attach_text(&context, &font, &viewport);
    assert!(matches!(
        second,
        Err(AppError::Material(MaterialError::TextureAlreadyBound(_)))
    ));
}
