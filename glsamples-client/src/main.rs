use std::process::ExitCode;

use clap::Parser;
use glsamples_core::config::SampleConfig;
use glsamples_core::sample::SampleKind;
use glsamples_core::state::{AppState, Control};

use crate::abs::App;
use crate::cli::Cli;
use crate::other::Reporter;

mod abs;
mod cli;
mod logging;
mod other;
mod scenes;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(SampleConfig::default_path);
    let mut config = match &config_path {
        Some(path) => match SampleConfig::load_or_default(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => SampleConfig::default(),
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = logging::init(config.log_filter()) {
        eprintln!("cannot install logger: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli.sample, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Reporter::new(None).error("ERROR", &e);
            ExitCode::FAILURE
        }
    }
}

fn run(kind: SampleKind, config: &SampleConfig) -> Result<(), String> {
    let mut app = App::new(kind.title(), &config.window, &config.context)?;
    let (width, height) = app.drawable_size();
    let mut state = AppState::with_viewport(width, height);

    let reporter = Reporter::new(Some(&app.window));
    let mut sample = scenes::create(kind, &app, config, &reporter)?;

    'running: loop {
        for event in app.event_pump.poll_iter() {
            if let Some(input) = other::translate(&event, || app.window.drawable_size())
                && state.apply(&input) == Control::Quit
            {
                break 'running;
            }
        }

        sample.render(&app.gl, &state);
        app.window.gl_swap_window();
    }

    // Release the sample's GL objects while the context is still current.
    drop(sample);
    log::info!("{kind} finished");
    Ok(())
}
