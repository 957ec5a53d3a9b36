//! DPI-aware size and position types.
//!
//! Logical units are device-independent (what a browser calls CSS pixels);
//! physical units are actual framebuffer pixels. `physical = logical * scale`.

use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LogicalSize<T> {
    pub width: T,
    pub height: T,
}

impl<T> LogicalSize<T> {
    pub const fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PhysicalSize<T> {
    pub width: T,
    pub height: T,
}

impl<T> PhysicalSize<T> {
    pub const fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LogicalPosition<T> {
    pub x: T,
    pub y: T,
}

impl<T> LogicalPosition<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicalPosition<T> {
    pub x: T,
    pub y: T,
}

impl<T> PhysicalPosition<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

/// Ratio between physical and logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(pub f64);

impl ScaleFactor {
    pub fn get(self) -> f64 {
        self.0
    }

    /// Scale factor capped at `max`, as used for drawing-buffer sizing.
    pub fn capped(self, max: f64) -> Self {
        Self(self.0.min(max))
    }
}

impl LogicalSize<u32> {
    /// Physical size at the given scale, rounded to whole pixels.
    pub fn to_physical(self, scale: f64) -> PhysicalSize<u32> {
        PhysicalSize::new(
            (self.width as f64 * scale).round() as u32,
            (self.height as f64 * scale).round() as u32,
        )
    }
}

impl PhysicalSize<u32> {
    pub fn to_logical(self, scale: f64) -> LogicalSize<u32> {
        LogicalSize::new(
            (self.width as f64 / scale) as u32,
            (self.height as f64 / scale) as u32,
        )
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for LogicalSize<T> {
    type Output = LogicalSize<T>;

    fn mul(self, rhs: T) -> Self::Output {
        LogicalSize::new(self.width * rhs, self.height * rhs)
    }
}

#[cfg(feature = "winit")]
mod winit_conversions {
    use super::*;

    impl<T> From<winit::dpi::PhysicalSize<T>> for PhysicalSize<T> {
        fn from(size: winit::dpi::PhysicalSize<T>) -> Self {
            PhysicalSize::new(size.width, size.height)
        }
    }

    impl<T> From<PhysicalSize<T>> for winit::dpi::PhysicalSize<T> {
        fn from(size: PhysicalSize<T>) -> Self {
            winit::dpi::PhysicalSize::new(size.width, size.height)
        }
    }

    impl<T> From<winit::dpi::PhysicalPosition<T>> for PhysicalPosition<T> {
        fn from(pos: winit::dpi::PhysicalPosition<T>) -> Self {
            PhysicalPosition::new(pos.x, pos.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_to_physical_rounds() {
        let size = LogicalSize::new(801u32, 600u32).to_physical(1.5);
        assert_eq!(size, PhysicalSize::new(1202, 900));
    }

    #[test]
    fn scale_factor_cap() {
        assert_eq!(ScaleFactor(3.0).capped(2.0), ScaleFactor(2.0));
        assert_eq!(ScaleFactor(1.25).capped(2.0), ScaleFactor(1.25));
    }
}
