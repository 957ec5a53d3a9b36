use std::fmt;
use std::str::FromStr;

/// An RGBA color with `f32` components in the `0.0..=1.0` range.
///
/// Components are stored as sRGB-encoded values, the way colors are written
/// in CSS and hex literals:
///
/// ```
/// use inkstroke_render::Color;
///
/// let blue = Color::from_hex(0x0000ff);
/// let white: Color = "#ffffff".parse().unwrap();
/// assert_eq!(white, Color::WHITE);
/// assert_eq!(blue.to_css_hex(), "#0000ff");
/// ```
///
/// The struct is `#[repr(C)]` and implements `bytemuck::Pod`, so it can be
/// used directly in GPU uniform buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGB values (0–255 mapped to 0.0–1.0) with full opacity.
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Create a color from a 24-bit RGB hex value (e.g. `0xFF8800`).
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self::from_rgb_u8(r, g, b)
    }

    /// Parse a CSS hex color: `#rrggbb` or `#rgb`, leading `#` optional.
    pub fn from_css_hex(text: &str) -> Result<Self, ParseColorError> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(text.to_string()));
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| ParseColorError(text.to_string()))?;

        match digits.len() {
            6 => Ok(Self::from_hex(value)),
            3 => {
                let expand = |nibble: u32| ((nibble & 0xF) * 0x11) as u8;
                Ok(Self::from_rgb_u8(
                    expand(value >> 8),
                    expand(value >> 4),
                    expand(value),
                ))
            }
            _ => Err(ParseColorError(text.to_string())),
        }
    }

    /// Quantize to 8-bit RGB, dropping alpha.
    pub fn to_rgb_u8(self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Lower-case `#rrggbb` form.
    pub fn to_css_hex(self) -> String {
        let [r, g, b] = self.to_rgb_u8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Decode the sRGB transfer function. Alpha is already linear.
    pub fn to_linear(self) -> Self {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::rgba(decode(self.r), decode(self.g), decode(self.b), self.a)
    }

    /// Convert to the equivalent `wgpu::Color` (f64 components).
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 3]> for Color {
    fn from(arr: [f32; 3]) -> Self {
        Self::rgb(arr[0], arr[1], arr[2])
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_css_hex(s)
    }
}

/// Returned when a string is not a CSS hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color: {:?}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::from_css_hex("#ffffff"), Ok(Color::WHITE));
        assert_eq!(Color::from_css_hex("0000ff"), Ok(Color::BLUE));
        assert_eq!(Color::from_css_hex("#f00"), Ok(Color::RED));
        assert_eq!(
            Color::from_css_hex("#1f1f1f").map(Color::to_rgb_u8),
            Ok([0x1f, 0x1f, 0x1f])
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Color::from_css_hex("#ffff").is_err());
        assert!(Color::from_css_hex("#gggggg").is_err());
        assert!(Color::from_css_hex("").is_err());
        assert!(Color::from_css_hex("#ééé").is_err());
        assert!(Color::from_css_hex("+ff").is_err());
    }

    #[test]
    fn css_hex_is_lowercase() {
        assert_eq!(Color::from_hex(0xAB12CD).to_css_hex(), "#ab12cd");
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(Color::WHITE.to_linear(), Color::WHITE);
        assert_eq!(Color::BLACK.to_linear(), Color::BLACK);
        let mid = Color::rgb(0.5, 0.5, 0.5).to_linear();
        assert!((mid.r - 0.2140).abs() < 1e-3);
    }
}
