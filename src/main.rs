mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    match app::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("driver_installer: {:#}", e);
            ExitCode::from(2)
        }
    }
}
