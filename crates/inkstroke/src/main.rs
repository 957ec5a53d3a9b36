use std::process::ExitCode;

use inkstroke::{InkstrokeApp, SceneConfig};
use inkstroke_core::logging;
use inkstroke_core::profiling::{ProfilingBackend, init_profiling};
use inkstroke_winit::app::{App, run_app};

fn main() -> ExitCode {
    logging::init();

    let config = SceneConfig::from_env();
    if config.profiling {
        init_profiling(ProfilingBackend::PuffinHttp);
    }

    let result = run_app(move |ctx| {
        let app = InkstrokeApp::new(ctx, config)?;
        Ok(Box::new(app) as Box<dyn App>)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
