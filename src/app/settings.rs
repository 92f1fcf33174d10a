//! Command-line flags and the settings resolved from them.

use super::drivers::TRANSLATION_FILE;
use super::i18n::Language;
use super::installer::{Classifier, InstallMode};
use super::journal::Journal;
use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "driver_installer", version, about = "Installs the .inf driver packages in the drivers folder")]
pub struct Args {
    /// Folder holding the .inf packages [default: ./drivers]
    #[arg(long, value_name = "DIR")]
    pub drivers_dir: Option<PathBuf>,

    /// UI language [default: system locale]
    #[arg(long, value_name = "CODE", value_parser = ["tr", "en"])]
    pub lang: Option<String>,

    /// Install only the first package found
    #[arg(long)]
    pub first_only: bool,

    /// Judge success by pnputil's exit code instead of its output
    #[arg(long)]
    pub exit_code: bool,

    /// Driver tool to run [default: pnputil]
    #[arg(long, value_name = "PROGRAM")]
    pub tool: Option<PathBuf>,

    /// Attempt log [default: <temp>/driver_installation.log]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Install once without prompting, then exit
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub drivers_dir: PathBuf,
    pub translation_file: PathBuf,
    pub journal: Journal,
    pub tool: PathBuf,
    pub mode: InstallMode,
    pub classifier: Classifier,
    pub language: Language,
    pub interactive: bool,
    pub log_level: LevelFilter,
}

impl Settings {
    /// Settings for `drivers_dir` with every other option at its default.
    pub fn new(drivers_dir: PathBuf) -> Self {
        Settings {
            translation_file: drivers_dir.join(TRANSLATION_FILE),
            drivers_dir,
            journal: Journal::in_temp_dir(),
            tool: PathBuf::from("pnputil"),
            mode: InstallMode::default(),
            classifier: Classifier::default(),
            language: Language::default(),
            interactive: true,
            log_level: LevelFilter::Warn,
        }
    }

    pub fn from_args(args: Args) -> Self {
        let drivers_dir = args.drivers_dir.unwrap_or_else(|| {
            std::env::current_dir()
                .unwrap_or_default()
                .join("drivers")
        });
        let mut settings = Settings::new(drivers_dir);

        settings.language = match args.lang.as_deref() {
            Some(code) => Language::from_code(code),
            None => Language::detect(),
        };
        if let Some(path) = args.log_file {
            settings.journal = Journal::new(path);
        }
        if let Some(tool) = args.tool {
            settings.tool = tool;
        }
        if args.first_only {
            settings.mode = InstallMode::FirstOnly;
        }
        if args.exit_code {
            settings.classifier = Classifier::ExitCode;
        }
        settings.interactive = !args.yes;
        settings.log_level = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        settings
    }
}
