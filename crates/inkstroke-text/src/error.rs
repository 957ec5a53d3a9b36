/// Errors that can occur while reading MSDF fonts.
#[derive(Debug)]
pub enum TextError {
    /// The glyph-metrics descriptor is not valid BMFont JSON.
    InvalidDescriptor(serde_json::Error),

    /// The descriptor parsed but describes no glyphs.
    EmptyFont,

    /// Descriptor metrics that cannot be laid out (zero atlas or line size).
    InvalidMetrics(String),
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::InvalidDescriptor(err) => write!(f, "Invalid font descriptor: {}", err),
            TextError::EmptyFont => write!(f, "Font descriptor contains no glyphs"),
            TextError::InvalidMetrics(msg) => write!(f, "Invalid font metrics: {}", msg),
        }
    }
}

impl std::error::Error for TextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextError::InvalidDescriptor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TextError {
    fn from(err: serde_json::Error) -> Self {
        TextError::InvalidDescriptor(err)
    }
}

/// Result type for text operations.
pub type TextResult<T> = Result<T, TextError>;
