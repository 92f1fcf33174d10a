//! Console front end: menu, input reader and the event loop.

use super::installer::{DriverTool, InstallMode, Installer, Report, Step};
use super::state::{AppState, Event, Progress};
use super::timer::{start_ticker, stop_ticker};
use crossbeam_channel::Sender;
use std::io::{self, BufRead, Write};
use std::thread;

const BAR_WIDTH: u32 = 30;

/// Maps one line of user input to an event.
pub fn parse_command(line: &str) -> Event {
    match line.trim().to_lowercase().as_str() {
        "1" | "i" | "install" => Event::Install,
        "2" | "l" | "lang" | "language" => Event::ToggleLanguage,
        "3" | "q" | "quit" | "exit" => Event::Exit,
        _ => Event::NoOp,
    }
}

/// Text rendering of the progress indicator.
pub fn progress_bar(progress: &Progress) -> String {
    let filled = (progress.value() * BAR_WIDTH / progress.maximum()) as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH as usize - filled),
        progress.percent()
    )
}

fn render_header(state: &AppState) {
    println!();
    println!("== {} [{}] ==", state.text("title"), state.language);
}

fn render_menu(state: &AppState) {
    println!("  1) {}", state.text("action_install"));
    println!("  2) {}", state.text("action_language"));
    println!("  3) {}", state.text("action_exit"));
}

fn render_prompt(state: &AppState) {
    print!("{}> ", state.text("prompt"));
    let _ = io::stdout().flush();
}

fn render_feedback(state: &AppState) {
    if let Some(feedback) = &state.feedback {
        let mark = if feedback.is_error { "[!!]" } else { "[OK]" };
        println!("{} {}", mark, feedback.text);
    }
}

fn render_progress(progress: &Progress) {
    print!("\r{}", progress_bar(progress));
    let _ = io::stdout().flush();
}

/// Reads stdin on a helper thread. End of input counts as an exit request.
fn spawn_input_reader(event_tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let event = match line {
                Ok(line) => parse_command(&line),
                Err(e) => {
                    log::warn!("Failed to read input: {}", e);
                    break;
                }
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
        let _ = event_tx.send(Event::Exit);
    });
}

/// Runs one installation request on the loop thread and starts the progress
/// animation when the mode calls for it. Returns whether it succeeded.
fn install<T: DriverTool>(
    state: &mut AppState,
    installer: &Installer<T>,
    event_tx: &Sender<Event>,
) -> bool {
    stop_ticker(state);
    state.progress.reset(100);

    let mode = state.settings.mode;
    let dir = state.settings.drivers_dir.clone();
    let translations = &state.translations;
    let language = state.language;
    let progress = &mut state.progress;

    let report = installer.run(&dir, mode, |step| match step {
        Step::Started { file, index, total } => {
            if mode == InstallMode::All && index == 1 {
                progress.reset(total as u32);
            }
            let name = file.display().to_string();
            println!("{}", translations.format("installing", language, &[("file", name.as_str())]));
        }
        Step::Finished { file, index, total, outcome } => {
            log::debug!("[{}/{}] {}: {:?}", index, total, file.display(), outcome);
            if mode == InstallMode::All {
                progress.set(index as u32);
                render_progress(progress);
                println!();
            }
        }
    });

    let message = report.message(&state.translations, state.language);
    let succeeded = report.is_success();
    state.show_feedback(message, !succeeded);
    render_feedback(state);

    if let Report::Single { outcome, .. } = &report {
        state.progress.aim(outcome.progress_target());
        if !state.progress.is_settled() {
            render_progress(&state.progress);
            start_ticker(state, event_tx.clone());
        }
    }
    succeeded
}

/// Runs the event loop until an exit is requested.
///
/// Returns whether the last installation succeeded (`true` if none ran).
pub fn run_event_loop<T: DriverTool>(state: &mut AppState, installer: &Installer<T>) -> bool {
    let (event_tx, event_rx) = crossbeam_channel::unbounded();

    render_header(state);
    if state.settings.interactive {
        render_menu(state);
        render_prompt(state);
        spawn_input_reader(event_tx.clone());
    } else {
        let _ = event_tx.send(Event::Install);
        let _ = event_tx.send(Event::Exit);
    }

    let mut succeeded = true;
    for event in event_rx.iter() {
        let animating = state.ticker_shutdown_tx.is_some();
        let mut show_prompt = true;
        match event {
            Event::Install => {
                succeeded = install(state, installer, &event_tx);
                show_prompt = state.ticker_shutdown_tx.is_none();
            }
            Event::ToggleLanguage => {
                state.toggle_language();
                let name = state.language.to_string();
                println!(
                    "{}",
                    state.translations.format("language_changed", state.language, &[("language", name.as_str())])
                );
                render_header(state);
                render_menu(state);
            }
            // Left over from a ticker that was already stopped.
            Event::Tick if !animating => show_prompt = false,
            Event::Tick => {
                let more = state.progress.step();
                render_progress(&state.progress);
                if more {
                    show_prompt = false;
                } else {
                    stop_ticker(state);
                    println!();
                    if state.exit_pending {
                        break;
                    }
                }
            }
            Event::Exit if animating => {
                state.exit_pending = true;
                show_prompt = false;
            }
            Event::Exit => break,
            Event::NoOp => {
                println!("{}", state.text("unknown_command"));
                render_menu(state);
            }
        }

        if show_prompt && state.settings.interactive {
            render_prompt(state);
        }
    }

    stop_ticker(state);
    succeeded
}
