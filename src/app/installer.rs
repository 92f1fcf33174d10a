//! Runs the OS driver tool over the drivers folder and classifies what it reports.

use super::drivers::{self, ScanError};
use super::i18n::{Language, Translations};
use super::journal::Journal;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// pnputil prints this when a package was staged.
pub const SUCCESS_MARKER: &str = "successfully";
/// ...and additionally this when the package was already in the driver store.
pub const ALREADY_EXISTS_MARKER: &str = "Already exists";

/// Progress targets for the single-driver animation, out of 100.
pub const TARGET_INSTALLED: u32 = 100;
pub const TARGET_ALREADY_INSTALLED: u32 = 50;

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// The external program that registers a driver package with the system.
pub trait DriverTool {
    fn add_driver(&self, inf: &Path) -> io::Result<CommandOutput>;
}

/// `pnputil /add-driver <inf> /install`
#[derive(Debug, Clone)]
pub struct PnpUtil {
    program: PathBuf,
}

impl PnpUtil {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        PnpUtil { program: program.into() }
    }
}

impl DriverTool for PnpUtil {
    fn add_driver(&self, inf: &Path) -> io::Result<CommandOutput> {
        log::debug!("Running {} /add-driver {} /install", self.program.display(), inf.display());
        let output = Command::new(&self.program)
            .arg("/add-driver")
            .arg(inf)
            .arg("/install")
            .output()?;
        log::debug!("{} exited with {}", self.program.display(), output.status);
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Result of a single install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Installed,
    AlreadyInstalled,
    /// The tool ran but did not report success. Holds its error text, if any.
    Failed(Option<String>),
    /// The tool could not be run at all.
    Error(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Installed | Outcome::AlreadyInstalled)
    }

    pub fn progress_target(&self) -> u32 {
        match self {
            Outcome::Installed => TARGET_INSTALLED,
            Outcome::AlreadyInstalled => TARGET_ALREADY_INSTALLED,
            Outcome::Failed(_) | Outcome::Error(_) => 0,
        }
    }

    /// Localized feedback for this outcome.
    pub fn message(&self, t: &Translations, lang: Language) -> String {
        match self {
            Outcome::Installed => t.get("install_success", lang),
            Outcome::AlreadyInstalled => t.get("already_installed", lang),
            Outcome::Failed(Some(detail)) => detail.clone(),
            Outcome::Failed(None) => t.get("install_failed", lang),
            Outcome::Error(error) => t.format("unexpected_error", lang, &[("error", error.as_str())]),
        }
    }
}

/// How tool output is turned into an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classifier {
    /// Look for the success / already-exists markers in stdout.
    #[default]
    Markers,
    /// Trust the exit status only.
    ExitCode,
}

impl Classifier {
    pub fn classify(&self, output: &CommandOutput) -> Outcome {
        match self {
            Classifier::Markers => {
                if output.stdout.contains(SUCCESS_MARKER) {
                    if output.stdout.contains(ALREADY_EXISTS_MARKER) {
                        Outcome::AlreadyInstalled
                    } else {
                        Outcome::Installed
                    }
                } else {
                    Outcome::Failed(error_text(&output.stderr))
                }
            }
            Classifier::ExitCode => {
                if output.success {
                    Outcome::Installed
                } else {
                    Outcome::Failed(error_text(&output.stderr))
                }
            }
        }
    }
}

fn error_text(stderr: &str) -> Option<String> {
    let text = stderr.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMode {
    /// Every package in the folder, summarised at the end.
    #[default]
    All,
    /// Only the first package found.
    FirstOnly,
}

/// Aggregate of an [`InstallMode::All`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<String>,
}

impl Summary {
    pub fn message(&self, t: &Translations, lang: Language) -> String {
        if self.failed.is_empty() {
            let success = self.succeeded.to_string();
            let total = self.total.to_string();
            t.format(
                "all_installed",
                lang,
                &[("success", success.as_str()), ("total", total.as_str())],
            )
        } else {
            let files = self.failed.join(", ");
            t.format("some_failed", lang, &[("files", files.as_str())])
        }
    }
}

/// What an installation request ended with.
#[derive(Debug)]
pub enum Report {
    NothingToDo(ScanError),
    Batch(Summary),
    Single { file: PathBuf, outcome: Outcome },
}

impl Report {
    pub fn is_success(&self) -> bool {
        match self {
            Report::NothingToDo(_) => false,
            Report::Batch(summary) => summary.failed.is_empty(),
            Report::Single { outcome, .. } => outcome.is_success(),
        }
    }

    pub fn message(&self, t: &Translations, lang: Language) -> String {
        match self {
            Report::NothingToDo(e @ ScanError::Unreadable(..)) => {
                let error = e.to_string();
                t.format(e.message_key(), lang, &[("error", error.as_str())])
            }
            Report::NothingToDo(e) => t.get(e.message_key(), lang),
            Report::Batch(summary) => summary.message(t, lang),
            Report::Single { outcome, .. } => outcome.message(t, lang),
        }
    }
}

/// Progress notifications emitted while a run is underway.
#[derive(Debug)]
pub enum Step<'a> {
    Started { file: &'a Path, index: usize, total: usize },
    Finished { file: &'a Path, index: usize, total: usize, outcome: &'a Outcome },
}

pub struct Installer<T> {
    tool: T,
    classifier: Classifier,
    journal: Journal,
}

impl<T: DriverTool> Installer<T> {
    pub fn new(tool: T, classifier: Classifier, journal: Journal) -> Self {
        Installer { tool, classifier, journal }
    }

    /// Installs one package and journals the attempt.
    pub fn install_one(&self, inf: &Path) -> Outcome {
        let outcome = match self.tool.add_driver(inf) {
            Ok(output) => self.classifier.classify(&output),
            Err(e) => Outcome::Error(e.to_string()),
        };
        log::info!("{}: {:?}", inf.display(), outcome);

        if let Err(e) = self.journal.record(inf, &outcome) {
            log::warn!("Could not write to {}: {}", self.journal.path().display(), e);
        }
        outcome
    }

    /// Installs the packages found in `dir` according to `mode`.
    pub fn run(&self, dir: &Path, mode: InstallMode, mut on_step: impl FnMut(Step<'_>)) -> Report {
        let mut files = match drivers::find_inf_files(dir) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Nothing to install: {}", e);
                return Report::NothingToDo(e);
            }
        };

        if mode == InstallMode::FirstOnly {
            files.truncate(1);
        }

        let total = files.len();
        let mut summary = Summary { total, ..Summary::default() };
        let mut last = None;

        for (i, file) in files.iter().enumerate() {
            let index = i + 1;
            on_step(Step::Started { file, index, total });
            let outcome = self.install_one(file);
            on_step(Step::Finished { file, index, total, outcome: &outcome });

            if outcome.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed.push(display_name(file));
            }
            last = Some(outcome);
        }

        match (mode, last) {
            (InstallMode::FirstOnly, Some(outcome)) => Report::Single {
                file: files.swap_remove(0),
                outcome,
            },
            _ => Report::Batch(summary),
        }
    }
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::drivers::tests::scratch_dir;
    use crate::app::i18n;
    use std::cell::RefCell;
    use std::fs;

    const PNPUTIL_ADDED: &str = "Microsoft PnP Utility\r\n\r\nAdding driver package:  net.inf\r\n\
        Driver package added successfully.\r\nPublished Name:         oem42.inf\r\n";
    const PNPUTIL_EXISTS: &str = "Microsoft PnP Utility\r\n\r\nAdding driver package:  net.inf\r\n\
        Driver package added successfully. (Already exists in the system)\r\n";
    const PNPUTIL_FAILED: &str = "Microsoft PnP Utility\r\n\r\nFailed to add driver package.\r\n";

    /// Canned responses for the driver tool, recording every invocation.
    enum Reply {
        Stdout(&'static str),
        Stderr(&'static str),
        SpawnError(&'static str),
    }

    struct FakeTool {
        reply: Reply,
        calls: RefCell<Vec<PathBuf>>,
    }

    impl FakeTool {
        fn new(reply: Reply) -> Self {
            FakeTool { reply, calls: RefCell::new(Vec::new()) }
        }
    }

    impl DriverTool for &FakeTool {
        fn add_driver(&self, inf: &Path) -> io::Result<CommandOutput> {
            self.calls.borrow_mut().push(inf.to_path_buf());
            match self.reply {
                Reply::Stdout(out) => Ok(CommandOutput {
                    success: true,
                    stdout: out.to_string(),
                    stderr: String::new(),
                }),
                Reply::Stderr(err) => Ok(CommandOutput {
                    success: false,
                    stdout: PNPUTIL_FAILED.to_string(),
                    stderr: err.to_string(),
                }),
                Reply::SpawnError(msg) => Err(io::Error::new(io::ErrorKind::NotFound, msg)),
            }
        }
    }

    fn drivers_dir(name: &str, files: &[&str]) -> PathBuf {
        let dir = scratch_dir(name);
        for file in files {
            fs::write(dir.join(file), "[Version]\r\n").unwrap();
        }
        dir
    }

    fn installer<'a>(tool: &'a FakeTool, dir: &Path) -> Installer<&'a FakeTool> {
        Installer::new(tool, Classifier::Markers, Journal::new(dir.join("install.log")))
    }

    #[test]
    fn test_markers_classification() {
        let ok = |stdout: &str| CommandOutput { success: true, stdout: stdout.into(), stderr: String::new() };
        assert_eq!(Classifier::Markers.classify(&ok(PNPUTIL_ADDED)), Outcome::Installed);
        assert_eq!(Classifier::Markers.classify(&ok(PNPUTIL_EXISTS)), Outcome::AlreadyInstalled);
        assert_eq!(Classifier::Markers.classify(&ok(PNPUTIL_FAILED)), Outcome::Failed(None));

        let failed = CommandOutput {
            success: false,
            stdout: PNPUTIL_FAILED.into(),
            stderr: "  Access is denied.\r\n".into(),
        };
        assert_eq!(
            Classifier::Markers.classify(&failed),
            Outcome::Failed(Some("Access is denied.".into()))
        );
    }

    #[test]
    fn test_exit_code_classification() {
        let out = CommandOutput { success: true, stdout: String::new(), stderr: String::new() };
        assert_eq!(Classifier::ExitCode.classify(&out), Outcome::Installed);

        let out = CommandOutput { success: false, stdout: PNPUTIL_ADDED.into(), stderr: "bad inf".into() };
        assert_eq!(Classifier::ExitCode.classify(&out), Outcome::Failed(Some("bad inf".into())));
    }

    #[test]
    fn test_all_succeed() {
        let dir = drivers_dir("run-all", &["a.inf", "b.inf", "c.inf"]);
        let tool = FakeTool::new(Reply::Stdout(PNPUTIL_ADDED));
        let mut started = 0;

        let report = installer(&tool, &dir).run(&dir, InstallMode::All, |step| {
            if let Step::Started { total, .. } = step {
                assert_eq!(total, 3);
                started += 1;
            }
        });

        assert_eq!(started, 3);
        assert_eq!(tool.calls.borrow().len(), 3);
        match &report {
            Report::Batch(summary) => {
                assert_eq!(summary.succeeded, 3);
                assert!(summary.failed.is_empty());
            }
            other => panic!("unexpected report: {:?}", other),
        }
        let t = i18n::builtin();
        assert!(report.message(&t, Language::English).contains("(3/3)"));
        assert!(report.message(&t, Language::Turkish).contains("(3/3)"));
        assert!(report.is_success());

        let log = fs::read_to_string(dir.join("install.log")).unwrap();
        assert_eq!(log.lines().filter(|l| l.starts_with("SUCCESS: ")).count(), 3);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_already_installed_is_not_failure() {
        let dir = drivers_dir("run-exists", &["net.inf"]);
        let tool = FakeTool::new(Reply::Stdout(PNPUTIL_EXISTS));

        let report = installer(&tool, &dir).run(&dir, InstallMode::FirstOnly, |_| {});

        match &report {
            Report::Single { outcome, .. } => {
                assert_eq!(*outcome, Outcome::AlreadyInstalled);
                assert_eq!(outcome.progress_target(), TARGET_ALREADY_INSTALLED);
            }
            other => panic!("unexpected report: {:?}", other),
        }
        let t = i18n::builtin();
        assert_eq!(report.message(&t, Language::English), "Driver is already installed.");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_directory_invokes_nothing() {
        let dir = scratch_dir("run-missing");
        let tool = FakeTool::new(Reply::Stdout(PNPUTIL_ADDED));

        let report = installer(&tool, &dir).run(&dir.join("drivers"), InstallMode::All, |_| {});

        assert!(tool.calls.borrow().is_empty());
        assert!(matches!(report, Report::NothingToDo(ScanError::MissingDirectory(_))));
        let t = i18n::builtin();
        assert_eq!(report.message(&t, Language::Turkish), "Driver klasörü bulunamadı!");
        assert!(!report.is_success());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_no_inf_files_invokes_nothing() {
        let dir = drivers_dir("run-empty", &["setup.exe", "notes.txt"]);
        let tool = FakeTool::new(Reply::Stdout(PNPUTIL_ADDED));

        let report = installer(&tool, &dir).run(&dir, InstallMode::FirstOnly, |_| {});

        assert!(tool.calls.borrow().is_empty());
        assert!(matches!(report, Report::NothingToDo(ScanError::NoDrivers(_))));
        let t = i18n::builtin();
        assert_eq!(
            report.message(&t, Language::English),
            "No .inf files found in the driver folder!"
        );
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_unreadable_folder_shows_os_error() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "Access is denied");
        let report = Report::NothingToDo(ScanError::Unreadable(PathBuf::from("d"), denied));

        let t = i18n::builtin();
        assert_eq!(
            report.message(&t, Language::English),
            "An unexpected error occurred: cannot list d: Access is denied"
        );
        assert_eq!(
            report.message(&t, Language::Turkish),
            t.format(
                "unexpected_error",
                Language::Turkish,
                &[("error", "cannot list d: Access is denied")]
            )
        );
        assert!(!report.message(&t, Language::Turkish).contains("{error}"));
        assert!(!report.is_success());
    }

    #[test]
    fn test_spawn_error_text_is_shown() {
        let dir = drivers_dir("run-spawn", &["net.inf"]);
        let tool = FakeTool::new(Reply::SpawnError("program not found: pnputil"));

        let report = installer(&tool, &dir).run(&dir, InstallMode::FirstOnly, |_| {});

        let t = i18n::builtin();
        assert_eq!(
            report.message(&t, Language::English),
            "An unexpected error occurred: program not found: pnputil"
        );
        assert!(!report.is_success());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_failures_are_listed() {
        let dir = drivers_dir("run-failed", &["a.inf", "b.inf"]);
        let tool = FakeTool::new(Reply::Stderr("The hash for the file is not present"));

        let report = installer(&tool, &dir).run(&dir, InstallMode::All, |_| {});

        match &report {
            Report::Batch(summary) => {
                assert_eq!(summary.succeeded, 0);
                let mut failed = summary.failed.clone();
                failed.sort();
                assert_eq!(failed, vec!["a.inf", "b.inf"]);
            }
            other => panic!("unexpected report: {:?}", other),
        }
        let t = i18n::builtin();
        assert!(report
            .message(&t, Language::English)
            .starts_with("The following driver(s) could not be installed: "));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_failure_shows_captured_error_text() {
        let dir = drivers_dir("run-stderr", &["net.inf"]);
        let tool = FakeTool::new(Reply::Stderr("Access is denied.\r\n"));

        let report = installer(&tool, &dir).run(&dir, InstallMode::FirstOnly, |_| {});

        let t = i18n::builtin();
        assert_eq!(report.message(&t, Language::Turkish), "Access is denied.");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_first_only_installs_once() {
        let dir = drivers_dir("run-first", &["a.inf", "b.inf", "c.inf"]);
        let tool = FakeTool::new(Reply::Stdout(PNPUTIL_ADDED));

        let report = installer(&tool, &dir).run(&dir, InstallMode::FirstOnly, |_| {});

        assert_eq!(tool.calls.borrow().len(), 1);
        match report {
            Report::Single { file, outcome } => {
                assert_eq!(file, tool.calls.borrow()[0]);
                assert_eq!(outcome, Outcome::Installed);
            }
            other => panic!("unexpected report: {:?}", other),
        }
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_journal_failure_does_not_abort() {
        let dir = drivers_dir("run-journal", &["a.inf", "b.inf"]);
        let tool = FakeTool::new(Reply::Stdout(PNPUTIL_ADDED));
        let installer = Installer::new(
            &tool,
            Classifier::Markers,
            Journal::new(dir.join("missing").join("install.log")),
        );

        let report = installer.run(&dir, InstallMode::All, |_| {});

        assert_eq!(tool.calls.borrow().len(), 2);
        assert!(report.is_success());
        let _ = fs::remove_dir_all(dir);
    }
}
