//! Invocation of the UI binary under test
//!
//! The binary is run once per scenario with `--actions=<script>`, its
//! standard streams inherited, and awaited to completion.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::common::{Error, Result};

/// How the UI binary finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    Code(i32),
    Signal,
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Success => write!(f, "exit code 0"),
            ExitOutcome::Code(code) => write!(f, "exit code {code}"),
            ExitOutcome::Signal => write!(f, "a signal"),
        }
    }
}

/// Something that can play an input script against the UI
#[async_trait]
pub trait UiProcess: Send + Sync {
    /// Run the UI with the given script and wait for it to exit
    async fn run(&self, scenario: &str, actions: &Path) -> Result<ExitOutcome>;
}

/// Runs the real UI binary as a child process
#[derive(Debug, Clone)]
pub struct CommandUiProcess {
    binary: PathBuf,
    working_dir: PathBuf,
    timeout: Option<Duration>,
}

impl CommandUiProcess {
    pub fn new(binary: PathBuf, working_dir: PathBuf) -> Self {
        Self {
            binary,
            working_dir,
            timeout: None,
        }
    }

    /// Kill the child if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl UiProcess for CommandUiProcess {
    async fn run(&self, scenario: &str, actions: &Path) -> Result<ExitOutcome> {
        tracing::debug!(
            binary = %self.binary.display(),
            actions = %actions.display(),
            "launching UI"
        );

        let mut child = Command::new(&self.binary)
            .arg(format!("--actions={}", actions.display()))
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::ProcessSpawn {
                path: self.binary.display().to_string(),
                reason: e.to_string(),
            })?;

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(scenario, error = %e, "failed to kill timed-out UI");
                    }
                    return Err(Error::ProcessTimeout {
                        scenario: scenario.to_string(),
                        secs: limit.as_secs_f64(),
                    });
                }
            },
            None => child.wait().await?,
        };

        Ok(if status.success() {
            ExitOutcome::Success
        } else {
            match status.code() {
                Some(code) => ExitOutcome::Code(code),
                None => ExitOutcome::Signal,
            }
        })
    }
}
