//! # External Converter Adapter
//!
//! Runs pandoc (or a compatible program) as a child process to turn the
//! assembled HTML shell into markdown:
//!
//! ```text
//! pandoc -f html -t markdown <input> -o <output>
//! ```
//!
//! The process is treated as a black box. A missing executable, a non-zero
//! exit or an elapsed timeout all become `HtmlSiftError::ConversionError`.

use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::core::config::ConverterConfig;
use crate::core::error::{HtmlSiftError, Result};
use crate::core::traits::DocumentConverter;

/// Interval between exit checks while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Converter backed by the pandoc command line.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
    from: String,
    to: String,
    timeout: Option<Duration>,
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::from_config(&ConverterConfig::default())
    }
}

impl PandocConverter {
    /// Creates a converter from the `[converter]` configuration section.
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self {
            program: config.program.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
            timeout: config.timeout(),
        }
    }

    /// Overrides the executable.
    pub fn with_program<S: Into<String>>(mut self, program: S) -> Self {
        self.program = program.into();
        self
    }

    /// Kills the converter if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        let _ = cmd
            .arg("-f")
            .arg(&self.from)
            .arg("-t")
            .arg(&self.to)
            .arg(input)
            .arg("-o")
            .arg(output);
        cmd
    }

    fn run_to_completion(&self, input: &Path, output: &Path) -> Result<()> {
        let result = self
            .command(input, output)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(input, e))?;

        if result.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&result.stderr);
        Err(HtmlSiftError::conversion_error(
            input.to_path_buf(),
            format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            ),
        ))
    }

    fn run_with_timeout(
        &self,
        input: &Path,
        output: &Path,
        timeout: Duration,
    ) -> Result<()> {
        let mut child = self
            .command(input, output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.spawn_error(input, e))?;

        let started = Instant::now();
        loop {
            let status = child.try_wait().map_err(|e| {
                HtmlSiftError::conversion_error(
                    input.to_path_buf(),
                    format!("failed to wait for {}: {}", self.program, e),
                )
            })?;
            match status {
                Some(status) if status.success() => return Ok(()),
                Some(status) => {
                    return Err(HtmlSiftError::conversion_error(
                        input.to_path_buf(),
                        format!("{} exited with {}", self.program, status),
                    ))
                }
                None if started.elapsed() >= timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(HtmlSiftError::conversion_error(
                        input.to_path_buf(),
                        format!(
                            "{} timed out after {}s",
                            self.program,
                            timeout.as_secs()
                        ),
                    ));
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }

    fn spawn_error(&self, input: &Path, err: std::io::Error) -> HtmlSiftError {
        HtmlSiftError::conversion_error(
            input.to_path_buf(),
            format!("failed to run {}: {}", self.program, err),
        )
    }
}

impl DocumentConverter for PandocConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        debug!(
            "Running {} -f {} -t {} {} -o {}",
            self.program,
            self.from,
            self.to,
            input.display(),
            output.display()
        );
        match self.timeout {
            Some(timeout) => self.run_with_timeout(input, output, timeout),
            None => self.run_to_completion(input, output),
        }
    }
}
