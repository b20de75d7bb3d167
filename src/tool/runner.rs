//! Process execution for perltidy.
//!
//! One child process per run: the source goes in on stdin (which is then closed),
//! stdout and stderr are drained concurrently, and the exit status decides between
//! [`ProcessOutcome::Success`] and [`ProcessOutcome::Failure`].

use super::args::ToolArguments;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio_util::sync::CancellationToken;

/// How a run that reached process exit ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Exit code 0; stdout holds the formatted text.
    Success { formatted_text: String },
    /// Nonzero exit. stdout is kept because perltidy echoes the full source on some
    /// error paths, which is needed to place carets under truncated excerpts.
    Failure { stderr_text: String, stdout_text: String },
}

/// A run that never produced an exit status.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Failed to launch '{executable}': {source}")]
    Launch { executable: String, source: io::Error },

    #[error("'{executable}' timed out after {timeout_ms}ms")]
    Timeout { executable: String, timeout_ms: u64 },

    #[error("'{executable}' was cancelled")]
    Cancelled { executable: String },

    #[error("I/O error while running '{executable}': {source}")]
    Io { executable: String, source: io::Error },
}

enum Completion {
    Exited(io::Result<(ExitStatus, String, String)>),
    TimedOut,
    Cancelled,
}

/// Runs perltidy with a fixed executable, base arguments and timeout.
#[derive(Debug, Clone)]
pub struct FormatterRunner {
    executable: String,
    arguments: ToolArguments,
    timeout: Option<Duration>,
}

impl FormatterRunner {
    pub fn new(executable: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            executable: executable.into(),
            arguments,
            timeout: None,
        }
    }

    /// Kill the process if it has not exited after `timeout_ms`. `0` waits forever.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn arguments(&self) -> &ToolArguments {
        &self.arguments
    }

    pub async fn run(&self, source: &str, is_selection: bool) -> Result<ProcessOutcome, RunnerError> {
        self.run_cancellable(source, is_selection, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), but killing the process when `cancel` fires.
    pub async fn run_cancellable(
        &self,
        source: &str,
        is_selection: bool,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutcome, RunnerError> {
        let args = self.arguments.for_invocation(is_selection);
        log::debug!("Running {} {}", self.executable, args.join(" "));

        let mut child = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Launch {
                executable: self.executable.clone(),
                source,
            })?;

        let completion = {
            let io = collect(&mut child, source);
            tokio::pin!(io);
            tokio::select! {
                result = &mut io => Completion::Exited(result),
                _ = deadline(self.timeout) => Completion::TimedOut,
                _ = cancel.cancelled() => Completion::Cancelled,
            }
        };

        match completion {
            Completion::Exited(result) => {
                let (status, stdout, stderr) = result.map_err(|source| RunnerError::Io {
                    executable: self.executable.clone(),
                    source,
                })?;
                log::debug!("{} exited with {status}", self.executable);
                if status.success() {
                    Ok(ProcessOutcome::Success { formatted_text: stdout })
                } else {
                    Ok(ProcessOutcome::Failure {
                        stderr_text: stderr,
                        stdout_text: stdout,
                    })
                }
            }
            Completion::TimedOut => {
                terminate(&mut child, &self.executable).await;
                Err(RunnerError::Timeout {
                    executable: self.executable.clone(),
                    timeout_ms: self.timeout.map_or(0, |t| t.as_millis() as u64),
                })
            }
            Completion::Cancelled => {
                terminate(&mut child, &self.executable).await;
                Err(RunnerError::Cancelled {
                    executable: self.executable.clone(),
                })
            }
        }
    }
}

/// Feed stdin and drain both output pipes, then wait for exit.
async fn collect(child: &mut Child, source: &str) -> io::Result<(ExitStatus, String, String)> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (written, stdout, stderr) = tokio::join!(
        write_and_close(stdin, source.as_bytes()),
        read_pipe_to_string(stdout),
        read_pipe_to_string(stderr),
    );
    written?;

    let status = child.wait().await?;
    Ok((status, stdout?, stderr?))
}

/// Write everything, then drop the handle: perltidy only starts once stdin hits EOF.
async fn write_and_close(stdin: Option<ChildStdin>, input: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };

    let result = match stdin.write_all(input).await {
        Ok(()) => stdin.flush().await,
        Err(e) => Err(e),
    };
    drop(stdin);

    match result {
        // The tool quit without reading everything; its exit status says why
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            log::debug!("stdin closed early by the formatter");
            Ok(())
        }
        other => other,
    }
}

async fn read_pipe_to_string<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<String> {
    let Some(mut pipe) = pipe else {
        return Ok(String::new());
    };
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => std::future::pending::<()>().await,
    }
}

async fn terminate(child: &mut Child, executable: &str) {
    if let Err(e) = child.kill().await {
        log::warn!("Failed to kill '{executable}': {e}");
    }
}
