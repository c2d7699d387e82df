use std::path::PathBuf;
use std::process::{Command, Stdio};

use promokit_common::config::CaptureSettings;

pub mod chromium;

pub use chromium::ChromiumEngine;

/// Browser binaries probed on `PATH`, in preference order.
const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
    "microsoft-edge",
];

/// Locate the browser the capture engine would launch.
///
/// An explicitly configured executable wins; then the `CHROME` environment
/// variable; then the first candidate found on `PATH`.
pub fn detect_browser(settings: &CaptureSettings) -> Option<PathBuf> {
    if let Some(path) = &settings.browser_executable {
        return path.exists().then(|| path.clone());
    }
    if let Some(path) = std::env::var_os("CHROME").map(PathBuf::from) {
        if path.exists() {
            return Some(path);
        }
    }
    BROWSER_CANDIDATES
        .iter()
        .find_map(|binary| command_path(binary))
}

fn command_path(binary: &str) -> Option<PathBuf> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary}"))
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path.is_empty()).then(|| PathBuf::from(path))
}
