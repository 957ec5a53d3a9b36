//! MSDF font descriptors in the BMFont JSON layout.
//!
//! The descriptor is produced alongside the atlas image by MSDF atlas
//! generators. Only the fields needed for layout are read; everything else
//! in the file is ignored.

use ahash::HashMap;
use serde::Deserialize;

use crate::error::{TextError, TextResult};

#[derive(Debug, Clone, Deserialize)]
pub struct FontInfo {
    #[serde(default)]
    pub face: String,
    /// Size in pixels the atlas was rendered at.
    pub size: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontCommon {
    pub line_height: f32,
    /// Distance from the top of a line to the baseline.
    pub base: f32,
    pub scale_w: u32,
    pub scale_h: u32,
}

/// Placement of one glyph in the atlas plus its layout metrics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Glyph {
    /// Unicode code point.
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub xoffset: f32,
    pub yoffset: f32,
    pub xadvance: f32,
    #[serde(default)]
    pub page: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Kerning {
    pub first: u32,
    pub second: u32,
    pub amount: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceField {
    pub field_type: String,
    pub distance_range: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    info: FontInfo,
    common: FontCommon,
    chars: Vec<Glyph>,
    #[serde(default)]
    kernings: Vec<Kerning>,
    #[serde(default)]
    distance_field: Option<DistanceField>,
}

/// Parsed glyph metrics with lookup tables.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    pub info: FontInfo,
    pub common: FontCommon,
    pub distance_field: Option<DistanceField>,
    glyphs: HashMap<u32, Glyph>,
    kernings: HashMap<(u32, u32), f32>,
}

impl FontDescriptor {
    pub fn from_json(bytes: &[u8]) -> TextResult<Self> {
        let raw: RawDescriptor = serde_json::from_slice(bytes)?;

        if raw.chars.is_empty() {
            return Err(TextError::EmptyFont);
        }
        if raw.common.scale_w == 0 || raw.common.scale_h == 0 {
            return Err(TextError::InvalidMetrics(format!(
                "atlas size {}x{}",
                raw.common.scale_w, raw.common.scale_h
            )));
        }
        if raw.common.line_height <= 0.0 {
            return Err(TextError::InvalidMetrics(format!(
                "line height {}",
                raw.common.line_height
            )));
        }

        let glyphs = raw
            .chars
            .into_iter()
            .map(|glyph| (glyph.id, glyph))
            .collect();
        let kernings = raw
            .kernings
            .into_iter()
            .map(|k| ((k.first, k.second), k.amount))
            .collect();

        Ok(Self {
            info: raw.info,
            common: raw.common,
            distance_field: raw.distance_field,
            glyphs,
            kernings,
        })
    }

    pub fn glyph(&self, id: u32) -> Option<&Glyph> {
        self.glyphs.get(&id)
    }

    /// Horizontal adjustment between two consecutive glyphs, 0 if none.
    pub fn kerning(&self, first: u32, second: u32) -> f32 {
        self.kernings.get(&(first, second)).copied().unwrap_or(0.0)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Atlas dimensions in pixels.
    pub fn atlas_size(&self) -> (u32, u32) {
        (self.common.scale_w, self.common.scale_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "pages": ["atlas.png"],
        "info": { "face": "Test", "size": 42, "bold": 0 },
        "common": { "lineHeight": 50, "base": 40, "scaleW": 256, "scaleH": 128, "pages": 1 },
        "chars": [
            { "id": 65, "char": "A", "x": 0, "y": 0, "width": 20, "height": 30,
              "xoffset": 1, "yoffset": 10, "xadvance": 22, "chnl": 15, "page": 0 }
        ],
        "distanceField": { "fieldType": "msdf", "distanceRange": 4 }
    }"#;

    #[test]
    fn parses_minimal_descriptor() {
        let font = FontDescriptor::from_json(MINIMAL.as_bytes()).unwrap();
        assert_eq!(font.info.face, "Test");
        assert_eq!(font.atlas_size(), (256, 128));
        assert_eq!(font.glyph(65).map(|g| g.xadvance), Some(22.0));
        assert_eq!(font.kerning(65, 65), 0.0);
        assert_eq!(font.distance_field.as_ref().map(|d| d.distance_range), Some(4.0));
    }

    #[test]
    fn rejects_empty_chars() {
        let json = MINIMAL.replace(
            r#""chars": ["#,
            r#""chars": [], "unused": ["#,
        );
        assert!(matches!(
            FontDescriptor::from_json(json.as_bytes()),
            Err(TextError::EmptyFont)
        ));
    }

    #[test]
    fn rejects_zero_atlas() {
        let json = MINIMAL.replace(r#""scaleW": 256"#, r#""scaleW": 0"#);
        assert!(matches!(
            FontDescriptor::from_json(json.as_bytes()),
            Err(TextError::InvalidMetrics(_))
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = FontDescriptor::from_json(b"{ not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid font descriptor"));
    }
}
