use std::fmt;

use inkstroke_render::{GraphicsError, MaterialError, TextureError};
use inkstroke_winit::app::OsError;

/// Errors raised while setting up the scene.
#[derive(Debug)]
pub enum AppError {
    Graphics(GraphicsError),
    Window(OsError),
    /// The asset worker threads could not be spawned.
    TaskPool(std::io::Error),
    Texture(TextureError),
    Material(MaterialError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Graphics(err) => write!(f, "graphics error: {}", err),
            AppError::Window(err) => write!(f, "failed to create window: {}", err),
            AppError::TaskPool(err) => write!(f, "failed to start asset workers: {}", err),
            AppError::Texture(err) => write!(f, "failed to upload atlas: {}", err),
            AppError::Material(err) => write!(f, "material error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Graphics(err) => Some(err),
            AppError::Window(err) => Some(err),
            AppError::TaskPool(err) => Some(err),
            AppError::Texture(err) => Some(err),
            AppError::Material(err) => Some(err),
        }
    }
}

impl From<GraphicsError> for AppError {
    fn from(err: GraphicsError) -> Self {
        AppError::Graphics(err)
    }
}

impl From<OsError> for AppError {
    fn from(err: OsError) -> Self {
        AppError::Window(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::TaskPool(err)
    }
}

impl From<TextureError> for AppError {
    fn from(err: TextureError) -> Self {
        AppError::Texture(err)
    }
}

impl From<MaterialError> for AppError {
    fn from(err: MaterialError) -> Self {
        AppError::Material(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
