use std::collections::HashMap;
use std::error::Error;
use std::fmt;

pub use winit::error::{EventLoopError, OsError};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::{
    event::{Event, EventBatch, EventQueue, HandleStatus},
    time::{FrameTime, TimeTracker},
    window::{Window, WindowDescriptor},
};

struct WindowResources {
    events: EventQueue,
    scale_factor: f64,
}

pub struct AppCtx<'a> {
    event_loop: &'a ActiveEventLoop,
    windows: &'a mut HashMap<WindowId, WindowResources>,
}

impl AppCtx<'_> {
    pub fn create_window(&mut self, descriptor: WindowDescriptor) -> Result<Window, OsError> {
        let window = Window::new(self.event_loop, descriptor)?;

        self.windows.insert(
            window.id(),
            WindowResources {
                events: EventQueue::new(),
                scale_factor: window.scale_factor().get(),
            },
        );

        Ok(window)
    }

    pub fn exit(&self) {
        self.event_loop.exit();
    }
}

pub trait App {
    /// Called once, right after the app is constructed.
    #[allow(unused_variables)]
    fn on_start(&mut self, ctx: &mut AppCtx) {}

    /// Called once per frame, before any window renders.
    #[allow(unused_variables)]
    fn update(&mut self, ctx: &mut AppCtx, time: &FrameTime) {}

    /// Called once per window redraw with the events queued for that window.
    fn render(&mut self, ctx: &mut AppCtx, window_id: WindowId, events: &mut EventBatch);

    /// Called when the app is about to exit.
    #[allow(unused_variables)]
    fn on_exit(&mut self, ctx: &mut AppCtx) {}
}

/// Error produced while constructing the app.
pub type StartupError = Box<dyn Error + Send + Sync>;

/// Builds the app once the event loop is running and windows can be created.
pub type AppFactory = Box<dyn FnOnce(&mut AppCtx) -> Result<Box<dyn App>, StartupError>>;

#[derive(Debug)]
pub enum RunError {
    /// The event loop could not be created or terminated abnormally.
    EventLoop(EventLoopError),
    /// The app factory failed.
    Startup(StartupError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(err) => write!(f, "event loop error: {}", err),
            RunError::Startup(err) => write!(f, "failed to start app: {}", err),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RunError::EventLoop(err) => Some(err),
            RunError::Startup(err) => Some(err.as_ref()),
        }
    }
}

impl From<EventLoopError> for RunError {
    fn from(err: EventLoopError) -> Self {
        RunError::EventLoop(err)
    }
}

struct AppProxy {
    factory: Option<AppFactory>,
    app: Option<Box<dyn App>>,
    startup_error: Option<StartupError>,
    updated_this_frame: bool,
    windows: HashMap<WindowId, WindowResources>,
    time_tracker: TimeTracker,
}

impl winit::application::ApplicationHandler for AppProxy {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(factory) = self.factory.take() else {
            return;
        };

        let mut ctx = AppCtx {
            event_loop,
            windows: &mut self.windows,
        };

        match factory(&mut ctx) {
            Ok(mut app) => {
                app.on_start(&mut ctx);
                self.app = Some(app);
            }
            Err(err) => {
                tracing::error!("Failed to start app: {}", err);
                self.startup_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.updated_this_frame = false;
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: winit::event::WindowEvent,
    ) {
        use winit::event::WindowEvent;

        let Some(app) = self.app.as_mut() else {
            return;
        };

        let mut ctx = AppCtx {
            event_loop,
            windows: &mut self.windows,
        };

        match event {
            WindowEvent::RedrawRequested => {
                if !self.updated_this_frame {
                    let frame_time = self.time_tracker.tick();
                    app.update(&mut ctx, &frame_time);
                    self.updated_this_frame = true;
                }

                let Some(window) = ctx.windows.get_mut(&window_id) else {
                    return;
                };
                let mut events = window.events.drain();

                app.render(&mut ctx, window_id, &mut events);

                let mut close_requested = false;
                events.dispatch(|event| match event {
                    Event::CloseRequested => {
                        close_requested = true;
                        HandleStatus::consumed()
                    }
                    _ => HandleStatus::ignored(),
                });

                if close_requested {
                    tracing::info!("Close requested for window {:?}", window_id);
                    app.on_exit(&mut ctx);
                    ctx.event_loop.exit();
                }
            }
            event => {
                let Some(window) = self.windows.get_mut(&window_id) else {
                    return;
                };
                if let WindowEvent::ScaleFactorChanged { scale_factor, .. } = event {
                    window.scale_factor = scale_factor;
                }
                if let Some(event) = Event::from_winit(event, window.scale_factor) {
                    window.events.push(event);
                }
            }
        }
    }
}

/// Run the event loop until the app exits.
///
/// `factory` runs once the platform is ready to create windows; an error from
/// it stops the loop and is returned as [`RunError::Startup`].
pub fn run_app<F>(factory: F) -> Result<(), RunError>
where
    F: FnOnce(&mut AppCtx) -> Result<Box<dyn App>, StartupError> + 'static,
{
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut proxy = AppProxy {
        factory: Some(Box::new(factory)),
        app: None,
        startup_error: None,
        updated_this_frame: false,
        windows: HashMap::new(),
        time_tracker: TimeTracker::new(),
    };

    event_loop.run_app(&mut proxy)?;

    match proxy.startup_error.take() {
        Some(err) => Err(RunError::Startup(err)),
        None => Ok(()),
    }
}
