//! Text recognition engine used by OCR split images
//!
//! The comparison engine only needs text out of a PNG. Tesseract is driven
//! through its command-line interface so no native bindings are required.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{CompareError, Result};

/// Anything that turns an encoded image into recognized text
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in a PNG-encoded image
    fn recognize(&self, png: &[u8]) -> Result<String>;
}

#[cfg(target_os = "windows")]
const EXECUTABLE: &str = "tesseract.exe";
#[cfg(not(target_os = "windows"))]
const EXECUTABLE: &str = "tesseract";

#[cfg(target_os = "windows")]
const DEFAULT_INSTALL_DIR: Option<&str> = Some(r"C:\Program Files\Tesseract-OCR");
#[cfg(not(target_os = "windows"))]
const DEFAULT_INSTALL_DIR: Option<&str> = None;

/// Tesseract invoked as a subprocess, reading PNG from stdin and writing text to stdout
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: PathBuf,
}

impl TesseractRecognizer {
    /// Use a specific tesseract executable
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Find tesseract on `PATH` or in its default install directory
    pub fn locate() -> Option<Self> {
        let search_path = std::env::var_os("PATH").unwrap_or_default();
        std::env::split_paths(&search_path)
            .chain(DEFAULT_INSTALL_DIR.map(PathBuf::from))
            .map(|dir| dir.join(EXECUTABLE))
            .find(|candidate| candidate.is_file())
            .map(Self::new)
    }

    /// Path of the executable this recognizer runs
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, png: &[u8]) -> Result<String> {
        let mut child = Command::new(&self.executable)
            .args(["-", "-", "--oem", "1", "--psm", "6"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CompareError::Recognition(format!("failed to start tesseract: {}", e)))?;

        // stdin is dropped before waiting so tesseract sees the end of the image
        let sent = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(png),
            None => Ok(()),
        };
        if let Err(e) = sent {
            // Reap the child so failed frames don't leave zombies behind
            if let Err(kill_error) = child.kill() {
                log::debug!("tesseract already exited: {}", kill_error);
            }
            if let Err(wait_error) = child.wait() {
                log::warn!("Failed to wait for tesseract: {}", wait_error);
            }
            return Err(CompareError::Recognition(format!("failed to send image: {}", e)));
        }

        let output = child
            .wait_with_output()
            .map_err(|e| CompareError::Recognition(format!("tesseract did not finish: {}", e)))?;
        if !output.status.success() {
            return Err(CompareError::Recognition(format!(
                "tesseract exited with {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_a_recognition_error() {
        let recognizer = TesseractRecognizer::new("/nonexistent/tesseract");
        let err = recognizer.recognize(&[]).unwrap_err();
        assert!(matches!(err, CompareError::Recognition(_)));
    }

    /// Children of this process that exited but were never waited for
    #[cfg(target_os = "linux")]
    fn zombie_children() -> usize {
        let parent = std::process::id().to_string();
        std::fs::read_dir("/proc")
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| std::fs::read_to_string(entry.path().join("stat")).ok())
            .filter(|stat| {
                // "pid (comm) state ppid ...", comm may contain spaces
                let Some((_, rest)) = stat.rsplit_once(')') else {
                    return false;
                };
                let mut fields = rest.split_whitespace();
                fields.next() == Some("Z") && fields.next() == Some(parent.as_str())
            })
            .count()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_send_reaps_the_child() {
        let exits_immediately = Path::new("/bin/true");
        if !exits_immediately.is_file() {
            return;
        }

        let recognizer = TesseractRecognizer::new(exits_immediately);
        // Far larger than a pipe buffer, so the write fails once the child exits
        let png = vec![0u8; 8 * 1024 * 1024];
        for _ in 0..3 {
            let err = recognizer.recognize(&png).unwrap_err();
            assert!(matches!(err, CompareError::Recognition(_)));
        }
        assert_eq!(zombie_children(), 0);
    }

    #[test]
    fn test_locate_returns_existing_file() {
        if let Some(recognizer) = TesseractRecognizer::locate() {
            assert!(recognizer.executable().is_file());
        }
    }
}
