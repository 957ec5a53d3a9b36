//! Translation of inkstroke window events into egui input.
//!
//! egui points are logical pixels scaled by the zoom factor. The native
//! pixels-per-point is the drawing buffer's pixel ratio rather than the raw
//! scale factor, so egui tessellates for the same resolution the surface is
//! configured at.

use inkstroke_core::profiling::profile_function;
use inkstroke_render::DrawingBuffer;
use inkstroke_winit::event::{
    ElementState, Event, Key, KeyCode, KeyEvent, MouseButton, MouseScrollDelta, NamedKey,
    PhysicalKey,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct EventResponse {
    /// egui wants exclusive use of this event (a click on the debug panel,
    /// a drag of one of its sliders).
    pub consumed: bool,

    /// The event changes what egui would draw.
    pub repaint: bool,
}

impl EventResponse {
    fn repaint(consumed: bool) -> Self {
        Self {
            consumed,
            repaint: true,
        }
    }
}

pub struct State {
    context: egui::Context,
    input: egui::RawInput,
    viewport_id: egui::ViewportId,
    pointer_pos_in_points: Option<egui::Pos2>,
}

impl State {
    pub fn new(context: egui::Context, viewport_id: egui::ViewportId) -> Self {
        Self {
            context,
            input: egui::RawInput {
                focused: true,
                ..Default::default()
            },
            viewport_id,
            pointer_pos_in_points: None,
        }
    }

    pub fn take_input(&mut self, buffer: &impl DrawingBuffer) -> egui::RawInput {
        profile_function!();
        let size = buffer.size();
        let zoom = self.context.zoom_factor();
        let size_in_points = egui::vec2(size.width as f32, size.height as f32) / zoom;

        self.input.screen_rect = (size_in_points.x > 0.0 && size_in_points.y > 0.0)
            .then(|| egui::Rect::from_min_size(egui::Pos2::ZERO, size_in_points));
        self.input.viewport_id = self.viewport_id;
        self.input
            .viewports
            .entry(self.viewport_id)
            .or_default()
            .native_pixels_per_point = Some(buffer.pixel_ratio() as f32);

        self.input.take()
    }

    pub fn on_event(&mut self, event: &Event) -> EventResponse {
        match event {
            Event::Focused(focused) => {
                self.input.focused = *focused;
                self.input.events.push(egui::Event::WindowFocused(*focused));
                EventResponse::repaint(false)
            }
            Event::MouseButtonDown(button) => {
                self.on_mouse_button(*button, true);
                EventResponse::repaint(self.context.wants_pointer_input())
            }
            Event::MouseButtonUp(button) => {
                // Releases always pass through so a drag that ends over a
                // window still ends for the app.
                self.on_mouse_button(*button, false);
                EventResponse::repaint(false)
            }
            Event::MouseScrolled(delta) => {
                self.on_mouse_wheel(*delta);
                EventResponse::repaint(self.context.wants_pointer_input())
            }
            Event::MouseMoved(position) => {
                let zoom = self.context.zoom_factor();
                let pos = egui::pos2(position.x as f32, position.y as f32) / zoom;
                self.pointer_pos_in_points = Some(pos);
                self.input.events.push(egui::Event::PointerMoved(pos));
                EventResponse::repaint(self.context.is_using_pointer())
            }
            Event::MouseLeft => {
                self.pointer_pos_in_points = None;
                self.input.events.push(egui::Event::PointerGone);
                EventResponse::repaint(false)
            }
            Event::KeyInput(key_event) => {
                self.on_key(key_event);
                EventResponse::repaint(self.context.wants_keyboard_input())
            }
            _ => EventResponse::default(),
        }
    }

    fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        let (Some(pos), Some(button)) = (self.pointer_pos_in_points, translate_mouse_button(button))
        else {
            return;
        };
        self.input.events.push(egui::Event::PointerButton {
            pos,
            button,
            pressed,
            modifiers: self.input.modifiers,
        });
    }

    fn on_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let (unit, delta) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (egui::MouseWheelUnit::Line, egui::vec2(x, y)),
            MouseScrollDelta::PixelDelta(pos) => (
                egui::MouseWheelUnit::Point,
                egui::vec2(pos.x as f32, pos.y as f32) / self.context.pixels_per_point(),
            ),
        };
        self.input.events.push(egui::Event::MouseWheel {
            unit,
            delta,
            modifiers: self.input.modifiers,
        });
    }

    /// Only the keys needed to edit numeric fields are forwarded.
    fn on_key(&mut self, event: &KeyEvent) {
        if event.is_synthetic {
            return;
        }
        let pressed = event.state == ElementState::Pressed;

        let physical_key = match event.physical_key {
            PhysicalKey::Code(code) => key_from_key_code(code),
            PhysicalKey::Unidentified(_) => None,
        };
        let logical_key = match &event.logical_key {
            Key::Named(named) => key_from_named_key(*named),
            Key::Character(text) => egui::Key::from_name(text.as_str()),
            _ => None,
        };

        if let Some(key) = logical_key.or(physical_key) {
            self.input.events.push(egui::Event::Key {
                key,
                physical_key,
                pressed,
                repeat: false,
                modifiers: self.input.modifiers,
            });
        }

        if pressed
            && let Some(text) = &event.text
            && !text.is_empty()
            && !text.chars().any(|c| c.is_control())
        {
            self.input.events.push(egui::Event::Text(text.to_string()));
        }
    }
}

fn translate_mouse_button(button: MouseButton) -> Option<egui::PointerButton> {
    match button {
        MouseButton::Left => Some(egui::PointerButton::Primary),
        MouseButton::Right => Some(egui::PointerButton::Secondary),
        MouseButton::Middle => Some(egui::PointerButton::Middle),
        MouseButton::Back => Some(egui::PointerButton::Extra1),
        MouseButton::Forward => Some(egui::PointerButton::Extra2),
        MouseButton::Other(_) => None,
    }
}

fn key_from_named_key(key: NamedKey) -> Option<egui::Key> {
    use egui::Key;

    Some(match key {
        NamedKey::Enter => Key::Enter,
        NamedKey::Tab => Key::Tab,
        NamedKey::Escape => Key::Escape,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,
        NamedKey::ArrowLeft => Key::ArrowLeft,
        NamedKey::ArrowRight => Key::ArrowRight,
        NamedKey::ArrowUp => Key::ArrowUp,
        NamedKey::ArrowDown => Key::ArrowDown,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        _ => return None,
    })
}

fn key_from_key_code(code: KeyCode) -> Option<egui::Key> {
    use egui::Key;

    Some(match code {
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Escape => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::Minus | KeyCode::NumpadSubtract => Key::Minus,
        KeyCode::Period | KeyCode::NumpadDecimal => Key::Period,
        KeyCode::Digit0 | KeyCode::Numpad0 => Key::Num0,
        KeyCode::Digit1 | KeyCode::Numpad1 => Key::Num1,
        KeyCode::Digit2 | KeyCode::Numpad2 => Key::Num2,
        KeyCode::Digit3 | KeyCode::Numpad3 => Key::Num3,
        KeyCode::Digit4 | KeyCode::Numpad4 => Key::Num4,
        KeyCode::Digit5 | KeyCode::Numpad5 => Key::Num5,
        KeyCode::Digit6 | KeyCode::Numpad6 => Key::Num6,
        KeyCode::Digit7 | KeyCode::Numpad7 => Key::Num7,
        KeyCode::Digit8 | KeyCode::Numpad8 => Key::Num8,
        KeyCode::Digit9 | KeyCode::Numpad9 => Key::Num9,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstroke_core::geometry::{LogicalPosition, LogicalSize};

    struct FakeBuffer {
        size: LogicalSize<u32>,
        ratio: f64,
    }

    impl DrawingBuffer for FakeBuffer {
        fn set_size(&mut self, size: LogicalSize<u32>) {
            self.size = size;
        }

        fn set_pixel_ratio(&mut self, ratio: f64) {
            self.ratio = ratio;
        }

        fn size(&self) -> LogicalSize<u32> {
            self.size
        }

        fn pixel_ratio(&self) -> f64 {
            self.ratio
        }
    }

    fn state() -> State {
        let context = egui::Context::default();
        let id = context.viewport_id();
        State::new(context, id)
    }

    #[test]
    fn screen_rect_is_logical_size() {
        let mut state = state();
        let buffer = FakeBuffer {
            size: LogicalSize::new(800, 600),
            ratio: 2.0,
        };

        let input = state.take_input(&buffer);
        let rect = input.screen_rect.unwrap();
        assert_eq!(rect.size(), egui::vec2(800.0, 600.0));
        assert_eq!(
            input.viewports[&input.viewport_id].native_pixels_per_point,
            Some(2.0)
        );
    }

    #[test]
    fn minimized_window_has_no_screen_rect() {
        let mut state = state();
        let buffer = FakeBuffer {
            size: LogicalSize::new(0, 0),
            ratio: 1.0,
        };
        assert!(state.take_input(&buffer).screen_rect.is_none());
    }

    #[test]
    fn clicks_need_a_known_pointer_position() {
        let mut state = state();
        state.on_event(&Event::MouseButtonDown(MouseButton::Left));
        assert!(state.input.events.is_empty());

        state.on_event(&Event::MouseMoved(LogicalPosition::new(10.0, 20.0)));
        state.on_event(&Event::MouseButtonDown(MouseButton::Left));
        assert!(matches!(
            state.input.events.last(),
            Some(egui::Event::PointerButton { pressed: true, .. })
        ));
    }

    fn run_frame_with_window(state: &mut State, buffer: &FakeBuffer) {
        let input = state.take_input(buffer);
        let _ = state.context.run(input, |ctx| {
            egui::Window::new("Debug")
                .fixed_pos(egui::pos2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label("color");
                });
        });
    }

    #[test]
    fn release_over_a_window_is_not_consumed() {
        let mut state = state();
        let buffer = FakeBuffer {
            size: LogicalSize::new(800, 600),
            ratio: 1.0,
        };

        state.on_event(&Event::MouseMoved(LogicalPosition::new(20.0, 20.0)));
        run_frame_with_window(&mut state, &buffer);
        run_frame_with_window(&mut state, &buffer);
        assert!(state.context.wants_pointer_input());

        let response = state.on_event(&Event::MouseButtonUp(MouseButton::Left));
        assert!(!response.consumed);
        assert!(response.repaint);
        assert!(matches!(
            state.input.events.last(),
            Some(egui::Event::PointerButton { pressed: false, .. })
        ));
    }

    #[test]
    fn resize_events_are_ignored() {
        let mut state = state();
        let response = state.on_event(&Event::WindowResized(LogicalSize::new(10, 10)));
        assert!(!response.consumed);
        assert!(!response.repaint);
    }
}
