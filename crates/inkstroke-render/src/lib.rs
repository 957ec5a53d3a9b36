mod camera;
mod color;
mod context;
mod controls;
mod frame;
mod material;
mod texture;
mod window;

pub use camera::Camera;
pub use color::{Color, ParseColorError};
pub use context::{GraphicsContext, GraphicsContextDescriptor, GraphicsError};
pub use controls::{OrbitAction, OrbitControls};
pub use frame::{ClearOp, FrameContext, FrameStats, RenderPass, RenderPassBuilder, Surface};
pub use material::{
    MaterialDescriptor, MaterialError, MaterialExtensions, ShaderMaterial, Side, Uniform,
    UniformBlock, UniformMap, UniformValue,
};
pub use texture::{Texture, TextureError};
pub use window::{DrawingBuffer, RenderableWindow, WindowContextDescriptor};

pub use wgpu;
