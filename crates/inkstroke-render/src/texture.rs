use std::fmt;

use crate::GraphicsContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// Pixel data does not match `width * height * 4` bytes.
    SizeMismatch { expected: usize, actual: usize },
    /// Zero width or height.
    Empty,
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::SizeMismatch { expected, actual } => write!(
                f,
                "texture data is {} bytes, expected {}",
                actual, expected
            ),
            TextureError::Empty => write!(f, "texture has no pixels"),
        }
    }
}

impl std::error::Error for TextureError {}

/// A sampled 2D RGBA texture with its view and sampler.
///
/// Texels are stored as linear `Rgba8Unorm`; distance-field atlases must not
/// be gamma-decoded on sampling.
#[derive(Debug)]
pub struct Texture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn from_rgba8(
        context: &GraphicsContext,
        data: &[u8],
        width: u32,
        height: u32,
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = context.device().create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        context.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = context.device().create_sampler(&wgpu::SamplerDescriptor {
            label,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        tracing::debug!("Uploaded {}x{} texture {:?}", width, height, label);

        Ok(Self {
            texture,
            view,
            sampler,
            width,
            height,
        })
    }

    pub fn from_image(
        context: &GraphicsContext,
        image: &image::RgbaImage,
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        Self::from_rgba8(context, image.as_raw(), image.width(), image.height(), label)
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
