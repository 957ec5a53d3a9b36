use inkstroke_core::math::{Aabb, Mat4, Quat, Vec3};
use inkstroke_render::GraphicsContext;
use wgpu::util::DeviceExt;

use crate::layout::TextGeometry;

/// Laid-out text uploaded to the GPU, with its own transform.
pub struct TextMesh {
    geometry: TextGeometry,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    pub position: Vec3,
    pub scale: Vec3,
}

impl TextMesh {
    pub fn new(context: &GraphicsContext, geometry: TextGeometry) -> Self {
        let vertex_buffer = context
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Text Vertex Buffer"),
                contents: bytemuck::cast_slice(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = context
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Text Index Buffer"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            index_count: geometry.indices.len() as u32,
            geometry,
            vertex_buffer,
            index_buffer,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn geometry(&self) -> &TextGeometry {
        &self.geometry
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn model_matrix(&self) -> Mat4 {
        model_matrix(self.position, self.scale)
    }

    /// World-space bounds of the geometry under the current transform.
    pub fn world_bounds(&self) -> Aabb {
        self.geometry.bounds.transformed(&self.model_matrix())
    }
}

/// Scale then translate; text meshes are never rotated.
pub fn model_matrix(position: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, Quat::IDENTITY, position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_y_scale_flips_bounds() {
        let bounds = Aabb::new(Vec3::new(0.0, -40.0, 0.0), Vec3::new(100.0, 0.0, 0.0));
        let matrix = model_matrix(Vec3::new(-15.0, 0.0, -20.0), Vec3::new(0.1, -0.1, 0.1));
        let world = bounds.transformed(&matrix);

        assert!((world.min - Vec3::new(-15.0, 0.0, -20.0)).length() < 1e-5);
        assert!((world.max - Vec3::new(-5.0, 4.0, -20.0)).length() < 1e-5);
    }
}
