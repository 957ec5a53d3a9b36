use inkstroke_core::geometry::{LogicalPosition, LogicalSize};
pub use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent as WinitEvent};
pub use winit::keyboard::*;

use std::collections::VecDeque;

/// Per-window event queue.
///
/// Window-level events (resize, scale, focus, close) are delivered ahead of
/// input events. Nothing is coalesced: every pointer move and every resize
/// reaches the app in arrival order.
pub struct EventQueue {
    window: VecDeque<Event>,
    input: VecDeque<Event>,
    stats: EventStats,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(8),
            input: VecDeque::with_capacity(64),
            stats: EventStats::default(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.stats.events_received += 1;

        match event {
            Event::CloseRequested
            | Event::WindowResized(_)
            | Event::ScaleFactorChanged(_)
            | Event::Focused(_) => self.window.push_back(event),
            _ => self.input.push_back(event),
        }
    }

    /// Take everything queued since the last drain.
    pub fn drain(&mut self) -> EventBatch {
        let mut events = Vec::with_capacity(self.window.len() + self.input.len());
        events.extend(self.window.drain(..));
        events.extend(self.input.drain(..));

        self.stats.events_delivered += events.len();

        EventBatch { events }
    }

    pub fn len(&self) -> usize {
        self.window.len() + self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> &EventStats {
        &self.stats
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventBatch {
    events: Vec<Event>,
}

impl EventBatch {
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Offer every event to `handler`; consumed events are removed so later
    /// handlers never see them.
    pub fn dispatch<H>(&mut self, mut handler: H)
    where
        H: FnMut(&Event) -> HandleStatus,
    {
        self.events.retain(|event| {
            let status = handler(event);
            !status.is_consumed()
        });
    }
}

impl From<Vec<Event>> for EventBatch {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

#[derive(Default, Debug, Clone)]
pub struct EventStats {
    pub events_received: usize,
    pub events_delivered: usize,
}

#[derive(Debug, Clone)]
pub enum Event {
    /// Window resized; logical size.
    WindowResized(LogicalSize<u32>),
    /// Scale factor (device pixel ratio) changed.
    ScaleFactorChanged(f64),
    Focused(bool),
    CloseRequested,
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    MouseScrolled(MouseScrollDelta),
    /// Cursor moved; logical coordinates relative to the top-left of the client area.
    MouseMoved(LogicalPosition<f64>),
    MouseLeft,
    KeyInput(KeyEvent),
}

#[derive(Debug, Clone)]
pub struct KeyEvent {
    pub physical_key: PhysicalKey,
    pub logical_key: Key,
    pub text: Option<SmolStr>,
    pub state: ElementState,
    pub is_synthetic: bool,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HandleStatus: u8 {
        const HANDLED = 0b00000001;
        const CONSUMED = 0b00000010;
    }
}

impl HandleStatus {
    pub const fn is_consumed(&self) -> bool {
        self.contains(Self::CONSUMED)
    }

    pub const fn is_handled(&self) -> bool {
        self.contains(Self::HANDLED)
    }

    pub const fn consumed() -> Self {
        Self::from_bits_truncate(Self::HANDLED.bits() | Self::CONSUMED.bits())
    }

    pub const fn handled() -> Self {
        Self::from_bits_truncate(Self::HANDLED.bits())
    }

    pub const fn ignored() -> Self {
        Self::empty()
    }
}

impl Event {
    pub(crate) fn from_winit(event: WinitEvent, scale_factor: f64) -> Option<Self> {
        match event {
            WinitEvent::Resized(size) => Some(Event::WindowResized(LogicalSize::new(
                (size.width as f64 / scale_factor) as u32,
                (size.height as f64 / scale_factor) as u32,
            ))),
            WinitEvent::ScaleFactorChanged { scale_factor, .. } => {
                Some(Event::ScaleFactorChanged(scale_factor))
            }
            WinitEvent::Focused(focus) => Some(Event::Focused(focus)),
            WinitEvent::CloseRequested => Some(Event::CloseRequested),
            WinitEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => Some(Event::MouseButtonDown(button)),
                ElementState::Released => Some(Event::MouseButtonUp(button)),
            },
            WinitEvent::MouseWheel { delta, .. } => Some(Event::MouseScrolled(delta)),
            WinitEvent::CursorMoved { position, .. } => Some(Event::MouseMoved(
                LogicalPosition::new(position.x / scale_factor, position.y / scale_factor),
            )),
            WinitEvent::CursorLeft { .. } => Some(Event::MouseLeft),
            WinitEvent::KeyboardInput {
                event,
                is_synthetic,
                ..
            } => Some(Event::KeyInput(KeyEvent {
                physical_key: event.physical_key,
                logical_key: event.logical_key,
                text: event.text,
                state: event.state,
                is_synthetic,
            })),
            other => {
                tracing::trace!("ignored window event: {:?}", other);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f64, y: f64) -> Event {
        Event::MouseMoved(LogicalPosition::new(x, y))
    }

    #[test]
    fn window_events_come_first() {
        let mut queue = EventQueue::new();
        queue.push(moved(1.0, 1.0));
        queue.push(Event::WindowResized(LogicalSize::new(640, 480)));

        let batch = queue.drain();
        let events: Vec<_> = batch.iter().collect();
        assert!(matches!(events[0], Event::WindowResized(_)));
        assert!(matches!(events[1], Event::MouseMoved(_)));
    }

    #[test]
    fn pointer_moves_are_not_coalesced() {
        let mut queue = EventQueue::new();
        for i in 0..5 {
            queue.push(moved(i as f64, 0.0));
        }

        let batch = queue.drain();
        let xs: Vec<f64> = batch
            .iter()
            .filter_map(|e| match e {
                Event::MouseMoved(pos) => Some(pos.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn every_resize_is_delivered() {
        let mut queue = EventQueue::new();
        queue.push(Event::WindowResized(LogicalSize::new(100, 100)));
        queue.push(Event::WindowResized(LogicalSize::new(200, 100)));
        assert_eq!(queue.drain().len(), 2);
        assert_eq!(queue.stats().events_delivered, 2);
    }

    #[test]
    fn consumed_events_are_removed() {
        let mut batch = EventBatch::from(vec![moved(0.0, 0.0), Event::MouseLeft]);
        batch.dispatch(|event| match event {
            Event::MouseLeft => HandleStatus::consumed(),
            _ => HandleStatus::handled(),
        });
        assert_eq!(batch.len(), 1);
    }
}
