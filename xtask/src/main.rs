use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Builds a release and stages a ready-to-ship folder:
/// `dist/Driver Installer.exe` next to an empty `dist/drivers/` and its translation table.
fn main() {
    // Simple argument parsing to find a --target flag.
    let args: Vec<String> = env::args().collect();
    let mut target: Option<&str> = None;
    if let Some(index) = args.iter().position(|r| r == "--target") {
        if let Some(t) = args.get(index + 1) {
            target = Some(t);
        }
    }

    println!("Building project...");
    let mut command = Command::new("cargo");
    command.arg("build").arg("--release").arg("--package").arg("driver_installer");
    if let Some(target_str) = target {
        println!("Cross-compiling for target: {}", target_str);
        command.arg("--target").arg(target_str);
    }

    let status = command.status().expect("Failed to run cargo build");
    if !status.success() {
        eprintln!("Build failed");
        std::process::exit(1);
    }

    let target_dir = if let Some(t) = target {
        Path::new("target").join(t).join("release")
    } else {
        Path::new("target").join("release")
    };

    let exe_src = target_dir.join("driver_installer.exe");
    if !exe_src.exists() {
        eprintln!("Compiled exe not found: {}", exe_src.display());
        std::process::exit(1);
    }

    let dist = Path::new("dist");
    let drivers = dist.join("drivers");
    fs::create_dir_all(&drivers).expect("Failed to create dist/drivers");

    let exe_dst = dist.join("Driver Installer.exe");
    // To prevent an error, remove the destination file if it already exists.
    let _ = fs::remove_file(&exe_dst);
    fs::copy(&exe_src, &exe_dst).expect("Failed to copy exe");
    println!("Copied to: {}", exe_dst.display());

    // Vendors edit this copy to rename or reword messages for their package.
    let table = drivers.join("driver_name.json");
    if !table.exists() {
        fs::copy(Path::new("res").join("locales").join("messages.json"), &table)
            .expect("Failed to stage translation table");
        println!("Staged: {}", table.display());
    }
    println!("Put the .inf packages into {}", drivers.display());
}
