//! Loading an MSDF font (descriptor + atlas) through a [`BytesReader`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use inkstroke_assets::{AssetError, AssetResult, BytesReader};

use crate::font::FontDescriptor;

/// A decoded MSDF font, ready for layout and GPU upload.
#[derive(Debug, Clone)]
pub struct MsdfFont {
    pub descriptor: FontDescriptor,
    pub atlas: image::RgbaImage,
}

/// Paths of the two files making up an MSDF font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsdfFontSource {
    pub descriptor: PathBuf,
    pub atlas: PathBuf,
}

impl MsdfFontSource {
    pub fn new(descriptor: impl Into<PathBuf>, atlas: impl Into<PathBuf>) -> Self {
        Self {
            descriptor: descriptor.into(),
            atlas: atlas.into(),
        }
    }
}

impl MsdfFont {
    /// Read and decode both files. The reads run concurrently; either
    /// failure fails the whole load.
    pub async fn load(reader: Arc<dyn BytesReader>, source: MsdfFontSource) -> AssetResult<Self> {
        let (descriptor_bytes, atlas_bytes) = futures_lite::future::zip(
            reader.read_bytes(&source.descriptor),
            reader.read_bytes(&source.atlas),
        )
        .await;

        let descriptor = decode_descriptor(&source.descriptor, &descriptor_bytes?)?;
        let atlas = decode_atlas(&source.atlas, &atlas_bytes?)?;

        let (expected_width, expected_height) = descriptor.atlas_size();
        if atlas.dimensions() != (expected_width, expected_height) {
            tracing::warn!(
                "Atlas {} is {}x{}, descriptor expects {}x{}",
                source.atlas.display(),
                atlas.width(),
                atlas.height(),
                expected_width,
                expected_height
            );
        }

        tracing::info!(
            "Loaded MSDF font '{}' ({} glyphs, {}x{} atlas)",
            descriptor.info.face,
            descriptor.glyph_count(),
            atlas.width(),
            atlas.height()
        );
        Ok(Self { descriptor, atlas })
    }
}

fn decode_descriptor(path: &Path, bytes: &[u8]) -> AssetResult<FontDescriptor> {
    FontDescriptor::from_json(bytes)
        .map_err(|err| AssetError::decode(path.display().to_string(), err))
}

fn decode_atlas(path: &Path, bytes: &[u8]) -> AssetResult<image::RgbaImage> {
    image::load_from_memory(bytes)
        .map(|image| image.to_rgba8())
        .map_err(|err| AssetError::decode(path.display().to_string(), err))
}
