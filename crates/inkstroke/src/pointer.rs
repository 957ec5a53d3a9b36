//! Pointer mapping onto the text mesh's on-screen rectangle.

use std::cell::Cell;
use std::rc::Rc;

use inkstroke_core::math::Vec2;
use inkstroke_text::UNSET_POINTER;

/// Linearly map `value` from `[low1, high1]` onto `[low2, high2]`.
pub fn remap(value: f32, low1: f32, high1: f32, low2: f32, high2: f32) -> f32 {
    low2 + (high2 - low2) * (value - low1) / (high1 - low1)
}

/// Normalized pointer position over the mesh. An axis stays `None` until
/// the pointer has crossed the mesh's range on that axis at least once.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl PointerState {
    /// Shader-side value; unset axes become [`UNSET_POINTER`].
    pub fn to_uniform(self) -> Vec2 {
        Vec2::new(
            self.x.unwrap_or(UNSET_POINTER),
            self.y.unwrap_or(UNSET_POINTER),
        )
    }
}

/// Pointer state shared between the mapper and the render tick.
pub type PointerCell = Rc<Cell<PointerState>>;

/// Pixel rectangle in logical window coordinates, `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl ScreenRect {
    pub fn contains_x(&self, x: f32) -> bool {
        self.left <= x && x <= self.right
    }

    pub fn contains_y(&self, y: f32) -> bool {
        self.top <= y && y <= self.bottom
    }
}

/// Writes normalized pointer coordinates into a [`PointerCell`].
///
/// Inactive until [`PointerMapper::activate`] hands it the mesh rectangle.
/// Each axis updates independently and only while the pointer is inside the
/// rectangle's range on that axis; otherwise it keeps its last value.
pub struct PointerMapper {
    cell: PointerCell,
    rect: Option<ScreenRect>,
}

impl PointerMapper {
    pub fn new(cell: PointerCell) -> Self {
        Self { cell, rect: None }
    }

    pub fn activate(&mut self, rect: ScreenRect) {
        if self.rect.is_some() {
            tracing::warn!("Pointer mapper already active, keeping the first rectangle");
            return;
        }
        tracing::debug!("Pointer mapper active over {:?}", rect);
        self.rect = Some(rect);
    }

    pub fn is_active(&self) -> bool {
        self.rect.is_some()
    }

    pub fn rect(&self) -> Option<ScreenRect> {
        self.rect
    }

    /// `x`/`y` are logical pixels from the top-left of the window.
    pub fn on_pointer_move(&self, x: f32, y: f32) {
        let Some(rect) = self.rect else {
            return;
        };

        let mut state = self.cell.get();
        if rect.contains_x(x) {
            state.x = Some(remap(x, rect.left, rect.right, 0.0, 1.0));
        }
        if rect.contains_y(y) {
            state.y = Some(remap(y, rect.top, rect.bottom, 0.0, 1.0));
        }
        self.cell.set(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> ScreenRect {
        ScreenRect {
            left: 100.0,
            right: 200.0,
            top: 50.0,
            bottom: 150.0,
        }
    }

    fn mapper() -> (PointerMapper, PointerCell) {
        let cell = PointerCell::default();
        let mut mapper = PointerMapper::new(cell.clone());
        mapper.activate(rect());
        (mapper, cell)
    }

    #[test]
    fn remap_endpoints_and_midpoint() {
        assert_eq!(remap(150.0, 100.0, 200.0, 0.0, 1.0), 0.5);
        assert_eq!(remap(100.0, 100.0, 200.0, 0.0, 1.0), 0.0);
        assert_eq!(remap(200.0, 100.0, 200.0, 0.0, 1.0), 1.0);
    }

    #[test]
    fn inside_sets_both_axes() {
        let (mapper, cell) = mapper();
        mapper.on_pointer_move(150.0, 75.0);
        assert_eq!(
            cell.get(),
            PointerState {
                x: Some(0.5),
                y: Some(0.25)
            }
        );
    }

    #[test]
    fn axes_are_sticky_and_independent() {
        let (mapper, cell) = mapper();
        mapper.on_pointer_move(150.0, 100.0);

        // x out of range, y in range
        mapper.on_pointer_move(250.0, 150.0);
        assert_eq!(cell.get().x, Some(0.5));
        assert_eq!(cell.get().y, Some(1.0));

        // both out of range
        mapper.on_pointer_move(0.0, 0.0);
        assert_eq!(cell.get().x, Some(0.5));
        assert_eq!(cell.get().y, Some(1.0));
    }

    #[test]
    fn axis_stays_unset_until_entered() {
        let (mapper, cell) = mapper();
        mapper.on_pointer_move(150.0, 500.0);
        assert_eq!(cell.get().x, Some(0.5));
        assert_eq!(cell.get().y, None);
        assert_eq!(cell.get().to_uniform(), Vec2::new(0.5, UNSET_POINTER));
    }

    #[test]
    fn moves_before_activation_are_ignored() {
        let cell = PointerCell::default();
        let mut mapper = PointerMapper::new(cell.clone());
        mapper.on_pointer_move(150.0, 100.0);
        assert_eq!(cell.get(), PointerState::default());

        mapper.activate(rect());
        mapper.on_pointer_move(150.0, 100.0);
        assert!(cell.get().x.is_some());
    }

    #[test]
    fn second_activation_keeps_first_rect() {
        let (mut mapper, _) = mapper();
        mapper.activate(ScreenRect {
            left: 0.0,
            right: 1.0,
            top: 0.0,
            bottom: 1.0,
        });
        assert_eq!(mapper.rect(), Some(rect()));
    }
}
