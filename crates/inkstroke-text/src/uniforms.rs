//! Standard uniform groups of the MSDF text material.
//!
//! Materials build their uniform table by merging these groups and then
//! adding their own entries.

use inkstroke_render::{Color, UniformMap, UniformValue};

pub const OPACITY: &str = "uOpacity";
pub const COLOR: &str = "uColor";
pub const MAP: &str = "uMap";
pub const THRESHOLD: &str = "uThreshold";
pub const ALPHA_TEST: &str = "uAlphaTest";
pub const STROKE_COLOR: &str = "uStrokeColor";
pub const STROKE_OUTSET_WIDTH: &str = "uStrokeOutsetWidth";
pub const STROKE_INSET_WIDTH: &str = "uStrokeInsetWidth";
/// Seconds since the render loop started.
pub const TIME: &str = "uTime";
/// Pointer position in mesh-relative `0..=1` units.
pub const MOUSE: &str = "uMouse";

/// Fill color, opacity and the atlas texture slot.
pub fn common() -> UniformMap {
    let mut map = UniformMap::new();
    map.insert(OPACITY, UniformValue::Float(1.0));
    map.insert(COLOR, UniformValue::Color(Color::WHITE));
    map.insert(MAP, UniformValue::Texture(None));
    map
}

/// Edge threshold and alpha-test cutoff.
pub fn rendering() -> UniformMap {
    let mut map = UniformMap::new();
    map.insert(THRESHOLD, UniformValue::Float(0.05));
    map.insert(ALPHA_TEST, UniformValue::Float(0.01));
    map
}

/// Stroke color and widths in distance-field units.
pub fn strokes() -> UniformMap {
    let mut map = UniformMap::new();
    map.insert(STROKE_COLOR, UniformValue::Color(Color::RED));
    map.insert(STROKE_OUTSET_WIDTH, UniformValue::Float(0.0));
    map.insert(STROKE_INSET_WIDTH, UniformValue::Float(0.3));
    map
}
