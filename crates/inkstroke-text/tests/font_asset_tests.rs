//! Integration tests for MSDF font loading and layout.

use std::io::Cursor;
use std::sync::Arc;

use inkstroke_assets::{AssetError, FileReader, MemoryReader};
use inkstroke_text::{FontDescriptor, MsdfFont, MsdfFontSource, TextLayout};

/// A small descriptor covering the glyphs of "Three.js".
fn descriptor_json() -> String {
    let glyph = |id: char, x: u32, width: u32, advance: u32| {
        format!(
            r#"{{"id":{},"index":0,"char":"{}","x":{},"y":0,"width":{},"height":40,"xoffset":0,"yoffset":2,"xadvance":{},"chnl":15,"page":0}}"#,
            id as u32, id, x, width, advance
        )
    };
    let chars = [
        glyph('T', 0, 22, 20),
        glyph('h', 24, 18, 19),
        glyph('r', 44, 12, 11),
        glyph('e', 58, 18, 17),
        glyph('.', 78, 6, 8),
        glyph('j', 86, 8, 8),
        glyph('s', 96, 16, 16),
        glyph('?', 114, 14, 14),
    ]
    .join(",");

    format!(
        r#"{{
            "pages": ["roboto-regular.png"],
            "chars": [{chars}],
            "info": {{"face": "Roboto-Regular", "size": 42, "bold": 0, "italic": 0}},
            "common": {{"lineHeight": 50, "base": 39, "scaleW": 128, "scaleH": 64, "pages": 1, "packed": 0}},
            "distanceField": {{"fieldType": "msdf", "distanceRange": 4}},
            "kernings": [{{"first": 84, "second": 104, "amount": -1}}]
        }}"#
    )
}

fn atlas_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([128, 128, 128, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

fn memory_reader() -> MemoryReader {
    let mut reader = MemoryReader::new();
    reader.insert("fonts/roboto-regular.json", descriptor_json().into_bytes());
    reader.insert("fonts/roboto-regular.png", atlas_png(128, 64));
    reader
}

fn source() -> MsdfFontSource {
    MsdfFontSource::new("fonts/roboto-regular.json", "fonts/roboto-regular.png")
}

#[test]
fn test_parse_descriptor() {
    let font = FontDescriptor::from_json(descriptor_json().as_bytes()).unwrap();

    assert_eq!(font.info.face, "Roboto-Regular");
    assert_eq!(font.glyph_count(), 8);
    assert_eq!(font.atlas_size(), (128, 64));
    assert_eq!(font.kerning('T' as u32, 'h' as u32), -1.0);
    assert_eq!(font.distance_field.as_ref().unwrap().distance_range, 4.0);
}

#[test]
fn test_layout_three_js() {
    let font = FontDescriptor::from_json(descriptor_json().as_bytes()).unwrap();
    let geometry = TextLayout::new("Three.js").build(&font);

    assert_eq!(geometry.letter_count, 8);
    assert_eq!(geometry.vertices.len(), 32);
    assert_eq!(geometry.indices.len(), 48);
    assert_eq!(geometry.line_count, 1);
    assert!(geometry.width > 0.0);
}

#[test]
fn test_load_from_memory() {
    let reader = Arc::new(memory_reader());
    let font = pollster::block_on(MsdfFont::load(reader, source())).unwrap();

    assert_eq!(font.atlas.dimensions(), (128, 64));
    assert_eq!(font.descriptor.glyph_count(), 8);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let fonts = dir.path().join("fonts");
    std::fs::create_dir_all(&fonts).unwrap();
    std::fs::write(fonts.join("roboto-regular.json"), descriptor_json()).unwrap();
    std::fs::write(fonts.join("roboto-regular.png"), atlas_png(128, 64)).unwrap();

    let reader = Arc::new(FileReader::new(dir.path()));
    let font = pollster::block_on(MsdfFont::load(reader, source())).unwrap();

    assert_eq!(font.descriptor.info.size, 42.0);
}

#[test]
fn test_empty_asset_root_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();

    let reader = Arc::new(FileReader::new(dir.path()));
    let result = pollster::block_on(MsdfFont::load(reader, source()));
    assert!(matches!(result, Err(AssetError::NotFound { .. })));
}

#[test]
fn test_missing_atlas_fails() {
    let mut reader = MemoryReader::new();
    reader.insert("fonts/roboto-regular.json", descriptor_json().into_bytes());

    let result = pollster::block_on(MsdfFont::load(Arc::new(reader), source()));
    assert!(matches!(result, Err(AssetError::NotFound { .. })));
}

#[test]
fn test_corrupt_descriptor_fails() {
    let mut reader = memory_reader();
    reader.insert("fonts/roboto-regular.json", b"{ not json".to_vec());

    let result = pollster::block_on(MsdfFont::load(Arc::new(reader), source()));
    assert!(matches!(result, Err(AssetError::Decode { .. })));
}

#[test]
fn test_corrupt_atlas_fails() {
    let mut reader = memory_reader();
    reader.insert("fonts/roboto-regular.png", vec![0, 1, 2, 3]);

    let result = pollster::block_on(MsdfFont::load(Arc::new(reader), source()));
    assert!(matches!(result, Err(AssetError::Decode { .. })));
}

#[test]
fn test_mismatched_atlas_size_still_loads() {
    let mut reader = memory_reader();
    reader.insert("fonts/roboto-regular.png", atlas_png(64, 64));

    let font = pollster::block_on(MsdfFont::load(Arc::new(reader), source())).unwrap();
    assert_eq!(font.atlas.dimensions(), (64, 64));
}
