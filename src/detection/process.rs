//! External-process backend.
//!
//! Runs the detector once per URL as `<command words> <url> <extra args>` and
//! parses its stdout as JSON. Stderr is side-channel output only.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use tokio::process::Command;

use super::backend::{truncate_chars, DetectionBackend, MAX_DETAIL_CHARS};
use crate::error_handling::{DetectionError, InitializationError};

/// Spawns the detector command for every URL.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    program: String,
    leading_args: Vec<String>,
    trailing_args: Vec<String>,
}

impl ProcessBackend {
    /// Builds a backend from a command line and extra arguments.
    ///
    /// Both strings are split with shell-word rules, so quoted arguments such
    /// as `--user-agent="Mozilla/5.0 ..."` survive as a single word.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::InvalidCommand` if either string has
    /// unbalanced quotes or the command is empty.
    pub fn new(command: &str, extra_args: &str) -> Result<Self, InitializationError> {
        let mut words = split_words(command)?;
        if words.is_empty() {
            return Err(InitializationError::InvalidCommand(
                "detector command is empty".to_string(),
            ));
        }
        let program = words.remove(0);
        let trailing_args = split_words(extra_args)?;

        Ok(Self {
            program,
            leading_args: words,
            trailing_args,
        })
    }

    /// Full argv used for `target_url`, program first.
    pub fn command_line(&self, target_url: &str) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.leading_args.iter().cloned())
            .chain(std::iter::once(target_url.to_string()))
            .chain(self.trailing_args.iter().cloned())
            .collect()
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

fn split_words(line: &str) -> Result<Vec<String>, InitializationError> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }
    shlex::split(line).ok_or_else(|| InitializationError::InvalidCommand(line.to_string()))
}

/// Locates `program` the way a shell would.
///
/// Names containing a path separator are checked as paths; bare names are
/// searched for in `PATH`.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{program}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

#[async_trait]
impl DetectionBackend for ProcessBackend {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn preflight(&self) -> Result<(), InitializationError> {
        match resolve_program(&self.program) {
            Some(path) => {
                debug!("Detector program resolved to {}", path.display());
                Ok(())
            }
            None => Err(InitializationError::BackendUnavailable {
                program: self.program.clone(),
                reason: "not found or not a file (check --wappalyzerpath and PATH)".to_string(),
            }),
        }
    }

    async fn detect(
        &self,
        target_url: &str,
        diagnostics: &mut Vec<String>,
    ) -> Result<Value, DetectionError> {
        diagnostics.push(format!(
            "Running: {}",
            self.command_line(target_url).join(" ")
        ));

        // kill_on_drop: a timed-out or cancelled invocation drops this future
        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .arg(target_url)
            .args(&self.trailing_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(DetectionError::Spawn)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        diagnostics.extend(
            stderr
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );

        if !output.status.success() {
            return Err(DetectionError::NonZeroExit {
                code: output.status.code(),
                output: format!("{}{}", stdout, stderr),
            });
        }

        serde_json::from_str(stdout.trim()).map_err(|e| {
            DetectionError::Malformed(format!(
                "detector stdout is not valid JSON ({e}): {}",
                truncate_chars(stdout.trim(), MAX_DETAIL_CHARS)
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_places_url_between_command_and_args() {
        let backend = ProcessBackend::new(
            "docker run --rm wappalyzer/cli",
            "--pretty --user-agent=\"Mozilla/5.0 (X11)\"",
        )
        .unwrap();

        assert_eq!(backend.program(), "docker");
        assert_eq!(
            backend.command_line("http://a.com"),
            vec![
                "docker",
                "run",
                "--rm",
                "wappalyzer/cli",
                "http://a.com",
                "--pretty",
                "--user-agent=Mozilla/5.0 (X11)",
            ]
        );
    }

    #[test]
    fn test_empty_extra_args() {
        let backend = ProcessBackend::new("wappalyzer", "  ").unwrap();
        assert_eq!(backend.command_line("http://a.com"), vec!["wappalyzer", "http://a.com"]);
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = ProcessBackend::new("   ", "").unwrap_err();
        assert!(matches!(err, InitializationError::InvalidCommand(_)));
    }

    #[test]
    fn test_unbalanced_quotes_rejected() {
        let err = ProcessBackend::new("wappalyzer", "--user-agent=\"oops").unwrap_err();
        assert!(matches!(err, InitializationError::InvalidCommand(_)));
    }

    #[tokio::test]
    async fn test_preflight_missing_program() {
        let backend =
            ProcessBackend::new("definitely-not-a-real-detector-binary-4711", "").unwrap();
        let err = backend.preflight().await.unwrap_err();
        assert!(matches!(err, InitializationError::BackendUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_preflight_missing_absolute_path() {
        let backend = ProcessBackend::new("/nonexistent/dir/wappalyzer", "").unwrap();
        assert!(backend.preflight().await.is_err());
    }
}
