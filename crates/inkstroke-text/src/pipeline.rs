//! GPU pipeline for MSDF text materials.

use std::sync::Arc;

use inkstroke_core::math::Mat4;
use inkstroke_core::profiling::profile_function;
use inkstroke_render::{
    Color, GraphicsContext, RenderPass, ShaderMaterial, Texture, UniformBlock, UniformMap,
};

use crate::layout::TextVertex;
use crate::mesh::TextMesh;
use crate::uniforms;

/// WGSL source of the MSDF fill/stroke shader.
pub const MSDF_SHADER: &str = include_str!("../shaders/msdf.wgsl");

/// Pointer coordinate the shader treats as "no pointer".
pub const UNSET_POINTER: f32 = -1.0;

/// Uniform buffer layout of `msdf.wgsl`. Colors are converted to linear
/// space since the pipeline renders into an sRGB surface.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MsdfUniformBlock {
    pub model_view_projection: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub stroke_color: [f32; 4],
    pub mouse: [f32; 2],
    pub time: f32,
    pub opacity: f32,
    pub threshold: f32,
    pub alpha_test: f32,
    pub stroke_outset_width: f32,
    pub stroke_inset_width: f32,
}

impl UniformBlock for MsdfUniformBlock {
    fn pack(uniforms: &UniformMap, model_view_projection: Mat4) -> Self {
        let float = |name: &str, default: f32| uniforms.float(name).unwrap_or(default);
        let color = |name: &str, default: Color| {
            uniforms.color(name).unwrap_or(default).to_linear().to_array()
        };
        let mouse = uniforms
            .vec2(uniforms::MOUSE)
            .map(|mouse| mouse.to_array())
            .unwrap_or([UNSET_POINTER; 2]);

        Self {
            model_view_projection: model_view_projection.to_cols_array_2d(),
            color: color(uniforms::COLOR, Color::WHITE),
            stroke_color: color(uniforms::STROKE_COLOR, Color::RED),
            mouse,
            time: float(uniforms::TIME, 0.0),
            opacity: float(uniforms::OPACITY, 1.0),
            threshold: float(uniforms::THRESHOLD, 0.05),
            alpha_test: float(uniforms::ALPHA_TEST, 0.01),
            stroke_outset_width: float(uniforms::STROKE_OUTSET_WIDTH, 0.0),
            stroke_inset_width: float(uniforms::STROKE_INSET_WIDTH, 0.3),
        }
    }
}

/// Render pipeline, uniform buffer and bind group for one MSDF material.
///
/// The bind group is created lazily once the material's atlas is bound to
/// `uMap`; until then [`MsdfPipeline::draw`] is a no-op.
pub struct MsdfPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: Option<wgpu::BindGroup>,
}

impl MsdfPipeline {
    pub fn new(
        context: &GraphicsContext,
        material: &ShaderMaterial,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        profile_function!();
        let device = context.device();

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("MSDF Uniform Buffer"),
            size: std::mem::size_of::<MsdfUniformBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("MSDF Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(material.label()),
            source: wgpu::ShaderSource::Wgsl(material.source().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("MSDF Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let descriptor = material.descriptor();
        let owned_constants = descriptor.pipeline_constants();
        let constants: Vec<(&str, f64)> = owned_constants
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("MSDF Text Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<TextVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x2,
                        1 => Float32x2,
                        2 => Float32x2,
                        3 => Float32x2,
                        4 => Float32,
                        5 => Float32,
                        6 => Float32,
                        7 => Float32,
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions {
                    constants: &constants,
                    ..Default::default()
                },
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(descriptor.blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions {
                    constants: &constants,
                    ..Default::default()
                },
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: descriptor.side.cull_mode(),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        tracing::debug!(
            "Created MSDF pipeline '{}' with constants {:?}",
            material.label(),
            owned_constants
        );

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            bind_group: None,
        }
    }

    /// Upload the material's uniforms. Returns `true` once the atlas is
    /// bound and the material can be drawn.
    pub fn prepare(
        &mut self,
        context: &GraphicsContext,
        material: &ShaderMaterial,
        model_view_projection: Mat4,
    ) -> bool {
        profile_function!();
        let block: MsdfUniformBlock = material.pack(model_view_projection);
        context
            .queue()
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&block));

        if self.bind_group.is_none()
            && let Some(atlas) = material.uniforms().texture(uniforms::MAP)
        {
            self.bind_group = Some(self.create_bind_group(context, atlas));
        }
        self.bind_group.is_some()
    }

    fn create_bind_group(&self, context: &GraphicsContext, atlas: &Arc<Texture>) -> wgpu::BindGroup {
        context
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("MSDF Bind Group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: self.uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(atlas.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(atlas.sampler()),
                    },
                ],
            })
    }

    /// Record the mesh's draw call into `pass`.
    pub fn draw(&self, pass: &mut RenderPass<'_>, mesh: &TextMesh) {
        let Some(bind_group) = &self.bind_group else {
            return;
        };
        if mesh.index_count() == 0 {
            return;
        }

        let render_pass = pass.descriptor();
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer().slice(..));
        render_pass.set_index_buffer(mesh.index_buffer().slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.index_count(), 0, 0..1);
        pass.increment_draw_calls();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstroke_core::math::Vec2;
    use inkstroke_render::UniformValue;

    fn material_uniforms() -> UniformMap {
        let mut map = UniformMap::merged([
            &uniforms::common(),
            &uniforms::rendering(),
            &uniforms::strokes(),
        ]);
        map.insert(uniforms::TIME, UniformValue::Float(0.0));
        map
    }

    #[test]
    fn uniform_block_matches_shader_layout() {
        // mat4 + 2 vec4 + vec2 + 6 scalars, padded to 16 bytes
        assert_eq!(std::mem::size_of::<MsdfUniformBlock>(), 128);
        assert_eq!(std::mem::size_of::<MsdfUniformBlock>() % 16, 0);
    }

    #[test]
    fn pack_reads_preset_values() {
        let block = MsdfUniformBlock::pack(&material_uniforms(), Mat4::IDENTITY);

        assert_eq!(block.model_view_projection, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(block.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(block.stroke_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(block.opacity, 1.0);
        assert_eq!(block.threshold, 0.05);
        assert_eq!(block.alpha_test, 0.01);
        assert_eq!(block.stroke_inset_width, 0.3);
    }

    #[test]
    fn missing_pointer_packs_as_unset() {
        let block = MsdfUniformBlock::pack(&material_uniforms(), Mat4::IDENTITY);
        assert_eq!(block.mouse, [UNSET_POINTER, UNSET_POINTER]);

        let mut map = material_uniforms();
        map.insert(uniforms::MOUSE, UniformValue::Vec2(Vec2::new(0.25, 0.75)));
        let block = MsdfUniformBlock::pack(&map, Mat4::IDENTITY);
        assert_eq!(block.mouse, [0.25, 0.75]);
    }

    #[test]
    fn time_is_packed() {
        let mut map = material_uniforms();
        map.set(uniforms::TIME, UniformValue::Float(2.5)).unwrap();
        let block = MsdfUniformBlock::pack(&map, Mat4::IDENTITY);
        assert_eq!(block.time, 2.5);
    }
}
