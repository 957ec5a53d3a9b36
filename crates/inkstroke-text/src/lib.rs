//! Inkstroke Text - MSDF text meshes
//!
//! This crate turns a multi-channel signed distance field font into
//! renderable text:
//! - BMFont-style JSON glyph descriptors ([`FontDescriptor`])
//! - Glyph layout into per-letter quads ([`TextLayout`], [`TextGeometry`])
//! - The standard uniform groups of MSDF materials ([`uniforms`])
//! - A wgpu pipeline for the fill/stroke shader ([`MsdfPipeline`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inkstroke_text::{FontDescriptor, TextLayout};
//!
//! let json = std::fs::read("assets/fonts/roboto-regular.json").unwrap();
//! let font = FontDescriptor::from_json(&json).unwrap();
//! let geometry = TextLayout::new("Three.js").build(&font);
//! println!("{} letters, {}x{}", geometry.letter_count, geometry.width, geometry.height);
//! ```

pub mod error;
pub mod font;
pub mod layout;
pub mod mesh;
pub mod pipeline;
pub mod uniforms;

#[cfg(feature = "asset")]
pub mod asset;

pub use error::{TextError, TextResult};
pub use font::{DistanceField, FontCommon, FontDescriptor, FontInfo, Glyph, Kerning};
pub use layout::{Align, TextGeometry, TextLayout, TextVertex};
pub use mesh::TextMesh;
pub use pipeline::{MSDF_SHADER, MsdfPipeline, MsdfUniformBlock, UNSET_POINTER};

#[cfg(feature = "asset")]
pub use asset::{MsdfFont, MsdfFontSource};
