use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// One invocation of an external program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Upper bound on wall-clock time before the child is killed
    pub timeout: Duration,
    /// Upper bound on bytes captured per output stream
    pub max_output_bytes: usize,
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("output exceeded {0} bytes")]
    OutputTooLarge(usize),

    #[error("I/O error while collecting output: {0}")]
    Io(#[from] std::io::Error),
}

/// Core trait for running the external extraction tool
///
/// This isolates the prober and the orchestrator from real subprocesses so
/// they can be exercised against a scripted fake.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the program to completion. A non-zero exit is a successful run
    /// with a non-zero `exit_code`, not an `Err`.
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, ProcessError>;
}
