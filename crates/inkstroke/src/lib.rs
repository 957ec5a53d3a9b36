//! inkstroke - animated MSDF text
//!
//! Renders a line of multi-channel signed distance field text with a
//! fill/stroke shader. Pointer position over the text and elapsed time drive
//! the shader; the camera orbits with damped controls and an egui panel edits
//! the text color.
//!
//! ```bash
//! INKSTROKE_ASSETS=./assets cargo run -p inkstroke
//! ```
//!
//! # Fonts
//!
//! No font ships with the repository. Before the first run, generate
//! `roboto-regular.json` and `roboto-regular.png` into `assets/fonts/` as
//! described in `assets/fonts/README.md`, or point `INKSTROKE_ASSETS` at a
//! directory whose `fonts/` folder holds them. Without the pair the window
//! only shows the clear color and the load error is logged.

pub mod app;
pub mod config;
pub mod debug_panel;
pub mod error;
pub mod pointer;
pub mod scene;
pub mod viewport;

pub use app::InkstrokeApp;
pub use config::SceneConfig;
pub use error::{AppError, AppResult};
