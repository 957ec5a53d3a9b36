use std::fmt;
use std::sync::Arc;

/// Errors raised while setting up the GPU.
#[derive(Debug)]
pub enum GraphicsError {
    /// No adapter matched the requested options.
    NoAdapter,
    /// The adapter refused to create a device.
    DeviceRequest(wgpu::RequestDeviceError),
    /// A presentable surface could not be created for a window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// The surface is not compatible with the adapter.
    UnsupportedSurface,
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::NoAdapter => write!(f, "no suitable GPU adapter found"),
            GraphicsError::DeviceRequest(err) => write!(f, "failed to create device: {}", err),
            GraphicsError::SurfaceCreation(err) => write!(f, "failed to create surface: {}", err),
            GraphicsError::UnsupportedSurface => {
                write!(f, "surface is not supported by the adapter")
            }
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphicsError::DeviceRequest(err) => Some(err),
            GraphicsError::SurfaceCreation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for GraphicsError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        GraphicsError::DeviceRequest(err)
    }
}

impl From<wgpu::CreateSurfaceError> for GraphicsError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        GraphicsError::SurfaceCreation(err)
    }
}

/// A shared graphics context.
///
/// Cloning the returned `Arc` is cheap; the device is released once the last
/// clone is dropped.
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GraphicsContext {
    pub async fn new_owned() -> Result<Arc<Self>, GraphicsError> {
        Self::new_owned_with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Blocks the current thread until the context is created.
    pub fn new_owned_sync() -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::new_owned())
    }

    pub async fn new_owned_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await
            .map_err(|_| GraphicsError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: descriptor.limits,
                label: descriptor.label,
                ..Default::default()
            })
            .await?;

        let info = adapter.get_info();
        tracing::info!(
            "Created graphics context on {} ({:?})",
            info.name,
            info.backend
        );

        Ok(Arc::new(Self {
            instance,
            adapter,
            device,
            queue,
        }))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }
}

/// Descriptor for configuring graphics context creation.
pub struct GraphicsContextDescriptor {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub force_fallback_adapter: bool,
    pub limits: wgpu::Limits,
    /// Optional label for debugging
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            limits: wgpu::Limits::default(),
            label: None,
        }
    }
}
