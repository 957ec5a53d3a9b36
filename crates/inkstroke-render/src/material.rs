//! Shader materials: a WGSL shader, a named uniform map and fixed pipeline state.
//!
//! ```
//! use inkstroke_render::{Color, MaterialDescriptor, ShaderMaterial, UniformMap, UniformValue};
//!
//! let mut common = UniformMap::new();
//! common.insert("uOpacity", UniformValue::Float(1.0));
//! common.insert("uColor", UniformValue::Color(Color::WHITE));
//!
//! let mut uniforms = UniformMap::merged([&common]);
//! uniforms.insert("uTime", UniformValue::Float(0.0));
//!
//! let mut material = ShaderMaterial::new("text", "/* wgsl */", uniforms, MaterialDescriptor::default());
//! material.uniforms_mut().set("uTime", UniformValue::Float(1.5)).unwrap();
//! assert_eq!(material.uniforms().float("uTime"), Some(1.5));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use glam::{Mat4, Vec2};
use indexmap::IndexMap;

use crate::{Color, Texture};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialError {
    UnknownUniform(String),
    TypeMismatch { name: String, expected: &'static str },
    /// A texture uniform can only be bound once.
    TextureAlreadyBound(String),
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialError::UnknownUniform(name) => write!(f, "unknown uniform {:?}", name),
            MaterialError::TypeMismatch { name, expected } => {
                write!(f, "uniform {:?} expects a {} value", name, expected)
            }
            MaterialError::TextureAlreadyBound(name) => {
                write!(f, "texture uniform {:?} is already bound", name)
            }
        }
    }
}

impl std::error::Error for MaterialError {}

/// Value held by a uniform.
#[derive(Debug, Clone)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Color(Color),
    /// Sampled texture slot; `None` until bound.
    Texture(Option<Arc<Texture>>),
}

impl UniformValue {
    fn kind(&self) -> &'static str {
        match self {
            UniformValue::Float(_) => "float",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Color(_) => "color",
            UniformValue::Texture(_) => "texture",
        }
    }
}

/// A named shader input.
#[derive(Debug, Clone)]
pub struct Uniform {
    pub value: UniformValue,
}

/// Insertion-ordered uniform table.
///
/// Re-inserting an existing name replaces its value but keeps its original
/// position, so merging groups yields a stable packing order.
#[derive(Debug, Clone, Default)]
pub struct UniformMap {
    entries: IndexMap<String, Uniform>,
}

impl UniformMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge groups in order; later groups override earlier ones.
    pub fn merged<'a>(groups: impl IntoIterator<Item = &'a UniformMap>) -> Self {
        let mut map = Self::new();
        for group in groups {
            map.extend_from(group);
        }
        map
    }

    pub fn extend_from(&mut self, other: &UniformMap) {
        for (name, uniform) in &other.entries {
            self.entries.insert(name.clone(), uniform.clone());
        }
    }

    /// Insert or replace a uniform regardless of its previous type.
    pub fn insert(&mut self, name: impl Into<String>, value: UniformValue) {
        self.entries.insert(name.into(), Uniform { value });
    }

    /// Update an existing uniform, keeping its type.
    ///
    /// Texture uniforms follow [`bind_texture`](Self::bind_texture) rules and
    /// cannot be cleared.
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), MaterialError> {
        if let UniformValue::Texture(Some(texture)) = value {
            return self.bind_texture(name, texture);
        }

        let uniform = self
            .entries
            .get_mut(name)
            .ok_or_else(|| MaterialError::UnknownUniform(name.to_string()))?;

        let same_kind =
            std::mem::discriminant(&uniform.value) == std::mem::discriminant(&value);
        if !same_kind || matches!(value, UniformValue::Texture(_)) {
            return Err(MaterialError::TypeMismatch {
                name: name.to_string(),
                expected: uniform.value.kind(),
            });
        }

        uniform.value = value;
        Ok(())
    }

    /// Bind a texture to an unbound texture uniform.
    pub fn bind_texture(&mut self, name: &str, texture: Arc<Texture>) -> Result<(), MaterialError> {
        let uniform = self
            .entries
            .get_mut(name)
            .ok_or_else(|| MaterialError::UnknownUniform(name.to_string()))?;

        match &mut uniform.value {
            UniformValue::Texture(Some(_)) => {
                Err(MaterialError::TextureAlreadyBound(name.to_string()))
            }
            UniformValue::Texture(slot) => {
                *slot = Some(texture);
                Ok(())
            }
            other => Err(MaterialError::TypeMismatch {
                name: name.to_string(),
                expected: other.kind(),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.entries.get(name).map(|uniform| &uniform.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn vec2(&self, name: &str) -> Option<Vec2> {
        match self.get(name)? {
            UniformValue::Vec2(value) => Some(*value),
            _ => None,
        }
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        match self.get(name)? {
            UniformValue::Color(value) => Some(*value),
            _ => None,
        }
    }

    /// The bound texture, if `name` is a texture uniform with one bound.
    pub fn texture(&self, name: &str) -> Option<&Arc<Texture>> {
        match self.get(name)? {
            UniformValue::Texture(texture) => texture.as_ref(),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which faces are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

impl Side {
    pub fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }
}

/// Optional shader capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterialExtensions {
    /// Screen-space derivatives (`dpdx`/`fwidth`) in the fragment stage.
    pub derivatives: bool,
}

/// Pipeline state fixed when the material is created.
#[derive(Debug, Clone, Default)]
pub struct MaterialDescriptor {
    pub side: Side,
    pub transparent: bool,
    /// Boolean compile-time switches, passed as pipeline-overridable constants.
    pub defines: IndexMap<String, bool>,
    pub extensions: MaterialExtensions,
}

impl MaterialDescriptor {
    /// Override-constant values for pipeline creation. Extension flags are
    /// exposed as `USE_<NAME>` constants.
    pub fn pipeline_constants(&self) -> Vec<(String, f64)> {
        let flag = |enabled: bool| if enabled { 1.0 } else { 0.0 };
        self.defines
            .iter()
            .map(|(name, enabled)| (name.clone(), flag(*enabled)))
            .chain(std::iter::once((
                "USE_DERIVATIVES".to_string(),
                flag(self.extensions.derivatives),
            )))
            .collect()
    }

    /// Straight alpha blending for transparent materials, replace otherwise.
    pub fn blend_state(&self) -> wgpu::BlendState {
        if self.transparent {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        }
    }
}

/// CPU-side layout of a material's uniform buffer.
pub trait UniformBlock: bytemuck::Pod {
    /// Pack the current uniform values along with the object's transform.
    fn pack(uniforms: &UniformMap, model_view_projection: Mat4) -> Self;
}

/// A material defined by WGSL source, uniforms and a [`MaterialDescriptor`].
pub struct ShaderMaterial {
    label: String,
    source: Cow<'static, str>,
    uniforms: UniformMap,
    descriptor: MaterialDescriptor,
}

impl ShaderMaterial {
    pub fn new(
        label: impl Into<String>,
        source: impl Into<Cow<'static, str>>,
        uniforms: UniformMap,
        descriptor: MaterialDescriptor,
    ) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
            uniforms,
            descriptor,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn uniforms(&self) -> &UniformMap {
        &self.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut UniformMap {
        &mut self.uniforms
    }

    pub fn descriptor(&self) -> &MaterialDescriptor {
        &self.descriptor
    }

    pub fn pack<B: UniformBlock>(&self, model_view_projection: Mat4) -> B {
        B::pack(&self.uniforms, model_view_projection)
    }
}
