//! Main application module, responsible for initialization and execution.

use anyhow::Context;
use clap::Parser;
use simplelog::{Config, WriteLogger};
use std::process::ExitCode;

// Declare sub-modules.
mod console;
mod drivers;
mod i18n;
mod installer;
mod journal;
mod settings;
mod state;
mod timer;
mod win_api;

use installer::{Installer, PnpUtil};
use settings::{Args, Settings};
use state::AppState;

/// Runs the installer and returns the process exit code.
pub fn run() -> anyhow::Result<ExitCode> {
    let settings = Settings::from_args(Args::parse());

    // 1. Diagnostics go to stderr, stdout belongs to the menu.
    WriteLogger::init(settings.log_level, Config::default(), std::io::stderr())
        .context("failed to initialise logging")?;

    // 2. Built-in translations plus the optional table next to the drivers.
    let translations = i18n::load(&settings.translation_file);
    let language = settings.language;

    // 3. Only one installer may touch the driver store at a time.
    let _instance = match win_api::acquire_single_instance() {
        Some(guard) => guard,
        None => {
            eprintln!("{}", translations.get("already_running", language));
            return Ok(ExitCode::FAILURE);
        }
    };

    if !win_api::is_elevated() {
        println!("{}", translations.get("not_elevated", language));
    }

    log::info!(
        "Drivers folder {}, attempt log {}",
        settings.drivers_dir.display(),
        settings.journal.path().display()
    );

    // 4. Run the event loop until the user leaves.
    let installer = Installer::new(
        PnpUtil::new(settings.tool.clone()),
        settings.classifier,
        settings.journal.clone(),
    );
    let interactive = settings.interactive;
    let mut state = AppState::new(settings, translations);
    let succeeded = console::run_event_loop(&mut state, &installer);

    Ok(if interactive || succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
