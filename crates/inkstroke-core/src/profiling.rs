//! Profiling utilities based on the `puffin` crate.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Profiling backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Send profiling data to puffin_viewer via HTTP.
    PuffinHttp,
}

#[cfg(feature = "profiling")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Default address of the puffin HTTP server.
pub const PUFFIN_ADDR: &str = "127.0.0.1:8585";

/// Initialize profiling with the specified backend.
///
/// # Example
/// ```no_run
/// use inkstroke_core::profiling::{init_profiling, ProfilingBackend};
///
/// init_profiling(ProfilingBackend::PuffinHttp);
/// ```
pub fn init_profiling(backend: ProfilingBackend) {
    match backend {
        #[cfg(feature = "profiling")]
        ProfilingBackend::PuffinHttp => {
            puffin::set_scopes_on(true);

            match puffin_http::Server::new(PUFFIN_ADDR) {
                Ok(server) => {
                    tracing::info!("Puffin profiler server started on http://{}", PUFFIN_ADDR);
                    let _ = PROFILING_SERVER.set(server);
                }
                Err(e) => {
                    tracing::error!("Failed to start puffin server: {}", e);
                }
            }
        }
        #[cfg(not(feature = "profiling"))]
        ProfilingBackend::PuffinHttp => {
            tracing::warn!("Profiling requested but the `profiling` feature is disabled");
        }
    }
}

/// Mark the start of a new frame for profiling.
///
/// Call this once per frame so puffin groups scopes by frame.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
