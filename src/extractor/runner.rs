//! Subprocess runner backed by `tokio::process`

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command as AsyncCommand;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::extractor::traits::{ProcessError, ProcessOutput, ProcessRequest, ProcessRunner};

/// Runs requests as real child processes.
///
/// Both pipes are drained concurrently. A stream that grows past the request's
/// byte limit, or a child that outlives its timeout, gets the child killed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

enum CollectError {
    Io(std::io::Error),
    Overflow,
}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

async fn read_bounded<R: AsyncRead + Unpin>(reader: R, limit: usize) -> Result<Vec<u8>, CollectError> {
    let mut buf = Vec::new();
    reader.take(limit as u64 + 1).read_to_end(&mut buf).await?;
    if buf.len() > limit {
        return Err(CollectError::Overflow);
    }
    Ok(buf)
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, ProcessError> {
        debug!("Executing command: {:?} {:?}", request.program, request.args);

        let mut child = AsyncCommand::new(&request.program)
            .args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: request.program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("stdout pipe unavailable"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("stderr pipe unavailable"))?;

        let limit = request.max_output_bytes;
        let collected = timeout(request.timeout, async {
            let (stdout, stderr) =
                tokio::try_join!(read_bounded(stdout, limit), read_bounded(stderr, limit))?;
            let status = child.wait().await?;
            Ok::<_, CollectError>((status, stdout, stderr))
        })
        .await;

        match collected {
            Ok(Ok((status, stdout, stderr))) => {
                debug!("status: {}", status);
                debug!("stdout: {} bytes long", stdout.len());
                trace!("stdout: {:?}", String::from_utf8_lossy(&stdout));
                debug!("stderr: {} bytes long", stderr.len());
                trace!("stderr: {:?}", String::from_utf8_lossy(&stderr));

                Ok(ProcessOutput {
                    exit_code: status.code(),
                    stdout: String::from_utf8_lossy(&stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                })
            }
            Ok(Err(CollectError::Io(e))) => {
                let _ = child.kill().await;
                Err(ProcessError::Io(e))
            }
            Ok(Err(CollectError::Overflow)) => {
                warn!(
                    "{:?} produced more than {} bytes of output, killing it",
                    request.program, limit
                );
                let _ = child.kill().await;
                Err(ProcessError::OutputTooLarge(limit))
            }
            Err(_) => {
                warn!(
                    "{:?} timed out after {}s, killing it",
                    request.program,
                    request.timeout.as_secs()
                );
                let _ = child.kill().await;
                Err(ProcessError::TimedOut(request.timeout))
            }
        }
    }
}
