//! Scene configuration.

use std::path::PathBuf;

use inkstroke_core::geometry::LogicalSize;
use inkstroke_core::math::{Vec2, Vec3};
use inkstroke_render::Color;

/// Directory holding `fonts/`, overriding [`SceneConfig::asset_root`].
pub const ASSETS_ENV: &str = "INKSTROKE_ASSETS";
/// Replaces the rendered text.
pub const TEXT_ENV: &str = "INKSTROKE_TEXT";
/// `1` or `true` starts the puffin HTTP server.
pub const PROFILE_ENV: &str = "INKSTROKE_PROFILE";

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Orbit target, also what the camera initially looks at.
    pub target: Vec3,
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 25.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 27.0),
            target: Vec3::ZERO,
            damping_factor: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub title: String,
    pub window_size: LogicalSize<f64>,
    pub clear_color: Color,
    /// Pixel ratio never exceeds this, whatever the display's scale factor.
    pub max_pixel_ratio: f64,

    pub text: String,
    pub asset_root: PathBuf,
    /// Relative to `asset_root`.
    pub font_descriptor: PathBuf,
    /// Relative to `asset_root`.
    pub font_atlas: PathBuf,

    pub camera: CameraConfig,

    pub mesh_position: Vec3,
    pub mesh_scale: Vec3,
    /// World-space extent used for the pointer rectangle, centered on
    /// `mesh_position`. Independent of the laid-out text's real size.
    pub assumed_mesh_size: Vec2,

    /// Initial value of the debug panel's color control.
    pub debug_color: Color,
    pub stroke_color: Color,
    pub is_small: bool,
    pub derivatives: bool,

    pub profiling: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "inkstroke".to_string(),
            window_size: LogicalSize::new(1280.0, 720.0),
            clear_color: Color::from_hex(0x1f1f1f),
            max_pixel_ratio: 2.0,
            text: "Three.js".to_string(),
            asset_root: PathBuf::from("assets"),
            font_descriptor: PathBuf::from("fonts/roboto-regular.json"),
            font_atlas: PathBuf::from("fonts/roboto-regular.png"),
            camera: CameraConfig::default(),
            mesh_position: Vec3::new(-15.0, 0.0, -20.0),
            mesh_scale: Vec3::new(0.1, -0.1, 0.1),
            assumed_mesh_size: Vec2::new(10.0, 5.0),
            debug_color: Color::WHITE,
            stroke_color: Color::from_hex(0x0000ff),
            is_small: false,
            derivatives: true,
            profiling: false,
        }
    }
}

impl SceneConfig {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(root) = lookup(ASSETS_ENV).filter(|root| !root.is_empty()) {
            config.asset_root = PathBuf::from(root);
        }
        if let Some(text) = lookup(TEXT_ENV) {
            config.text = text;
        }
        if let Some(profile) = lookup(PROFILE_ENV) {
            config.profiling = matches!(profile.trim(), "1" | "true" | "yes");
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.text, "Three.js");
        assert_eq!(config.clear_color.to_css_hex(), "#1f1f1f");
        assert_eq!(config.stroke_color.to_css_hex(), "#0000ff");
        assert_eq!(config.debug_color.to_css_hex(), "#ffffff");
        assert_eq!(config.camera.fov_y_degrees, 25.0);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 27.0));
        assert_eq!(config.mesh_scale, Vec3::new(0.1, -0.1, 0.1));
        assert_eq!(config.assumed_mesh_size, Vec2::new(10.0, 5.0));
        assert_eq!(config.max_pixel_ratio, 2.0);
        assert!(!config.is_small);
        assert!(config.derivatives);
    }

    #[test]
    fn environment_overrides() {
        let config = SceneConfig::from_lookup(lookup(&[
            (ASSETS_ENV, "/opt/fonts"),
            (TEXT_ENV, "Hello"),
            (PROFILE_ENV, "1"),
        ]));
        assert_eq!(config.asset_root, PathBuf::from("/opt/fonts"));
        assert_eq!(config.text, "Hello");
        assert!(config.profiling);
    }

    #[test]
    fn empty_asset_root_is_ignored() {
        let config = SceneConfig::from_lookup(lookup(&[(ASSETS_ENV, ""), (PROFILE_ENV, "0")]));
        assert_eq!(config.asset_root, PathBuf::from("assets"));
        assert!(!config.profiling);
    }
}
