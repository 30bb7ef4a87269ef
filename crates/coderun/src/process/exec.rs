//! Child process spawning and output capture

use std::borrow::Cow;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::process::ProcessError;
use crate::process::command::{CommandPlan, CommandStep};
use crate::types::{RawOutput, duration_ms};

/// Longest wall clock timeout honored; larger values are clamped to it
const MAX_TIMEOUT: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Captured result of one step that ran to completion
#[derive(Debug)]
struct StepOutput {
    stdout: String,
    stderr: String,
    exit_code: Option<i32>,
}

impl StepOutput {
    fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Input as written to the run step's stdin
///
/// A trailing newline is appended when missing so that a program reading a
/// line sees a complete one. Empty input becomes a single newline.
pub fn stdin_payload(input: &str) -> Cow<'_, str> {
    if input.ends_with('\n') {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("{input}\n"))
    }
}

/// Run a command plan under one wall-clock deadline
///
/// Build steps run in order with stdin closed. The first build step that
/// exits non-zero ends the plan and its diagnostics become the output's
/// stderr. The run step receives `stdin` (see [`stdin_payload`]); `None`
/// closes its stdin without writing.
///
/// When the deadline passes, the running step's process group is killed and
/// the output is reported as timed out with nothing captured.
#[instrument(skip(plan, stdin), fields(steps = plan.len()))]
pub async fn execute(
    plan: &CommandPlan,
    stdin: Option<&str>,
    timeout: Duration,
) -> Result<RawOutput, ProcessError> {
    let started = Instant::now();
    let deadline = started + timeout.min(MAX_TIMEOUT);
    let mut stderr = String::new();

    for step in plan.build_steps() {
        debug!(argv = ?step.argv(), "running build step");

        let Some(output) = run_step(step, None, deadline).await? else {
            return Ok(RawOutput::timed_out(started.elapsed()));
        };
        stderr.push_str(&output.stderr);

        if !output.succeeded() {
            debug!(exit_code = ?output.exit_code, "build step failed");
            // Some toolchains print their diagnostics on stdout
            if stderr.is_empty() {
                stderr = output.stdout;
            }
            return Ok(RawOutput {
                stdout: String::new(),
                stderr,
                exit_code: output.exit_code,
                timed_out: false,
                elapsed: started.elapsed(),
            });
        }
    }

    let run = plan.run_step();
    debug!(argv = ?run.argv(), "running program");

    let payload = stdin.map(stdin_payload);
    let Some(output) = run_step(run, Some(payload.as_deref().unwrap_or("")), deadline).await?
    else {
        return Ok(RawOutput::timed_out(started.elapsed()));
    };
    stderr.push_str(&output.stderr);

    let result = RawOutput {
        stdout: output.stdout,
        stderr,
        exit_code: output.exit_code,
        timed_out: false,
        elapsed: started.elapsed(),
    };

    debug!(
        exit_code = ?result.exit_code,
        stdout_len = result.stdout.len(),
        stderr_len = result.stderr.len(),
        elapsed_ms = duration_ms(result.elapsed),
        "execution complete"
    );

    Ok(result)
}

/// Spawn one step and wait for it, returning `None` if the deadline passed
///
/// `stdin` of `None` connects the child's stdin to /dev/null. Otherwise the
/// data is written and the pipe closed while stdout and stderr are drained,
/// so a program that fills an output pipe before reading its input cannot
/// deadlock against us.
async fn run_step(
    step: &CommandStep,
    stdin: Option<&str>,
    deadline: Instant,
) -> Result<Option<StepOutput>, ProcessError> {
    if step.program().is_empty() {
        return Err(ProcessError::EmptyCommand);
    }

    let mut command = step.to_command();
    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // Lead a new process group so a timeout also reaches grandchildren
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
        program: step.program_name(),
        source,
    })?;
    let pid = child.id();

    let stdin_pipe = child.stdin.take();
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let waited = tokio::time::timeout_at(deadline, async {
        let write = async move {
            if let (Some(mut pipe), Some(data)) = (stdin_pipe, stdin) {
                match pipe.write_all(data.as_bytes()).await {
                    // The program exited or closed stdin without reading everything
                    Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
                    other => other?,
                }
                pipe.shutdown().await.or_else(ignore_broken_pipe)?;
            }
            Ok::<_, std::io::Error>(())
        };

        let (written, stdout, stderr, status) = tokio::join!(
            write,
            read_pipe(stdout_pipe),
            read_pipe(stderr_pipe),
            child.wait()
        );
        written?;
        let status = status?;

        Ok::<_, std::io::Error>(StepOutput {
            stdout: String::from_utf8_lossy(&stdout?).into_owned(),
            stderr: String::from_utf8_lossy(&stderr?).into_owned(),
            exit_code: status.code(),
        })
    })
    .await;

    match waited {
        Ok(output) => output.map(Some).map_err(|source| ProcessError::Io {
            program: step.program_name(),
            source,
        }),
        Err(_) => {
            warn!(program = %step.program_name(), ?pid, "deadline reached, killing process group");
            kill_process_group(pid);
            if let Err(err) = child.kill().await {
                debug!(%err, "child already gone");
            }
            Ok(None)
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

fn ignore_broken_pipe(err: std::io::Error) -> std::io::Result<()> {
    if err.kind() == std::io::ErrorKind::BrokenPipe {
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|pid| libc::pid_t::try_from(pid).ok()) else {
        return;
    };
    // SAFETY: killpg has no memory-safety preconditions. The group id is the
    // pid of a child we spawned as group leader and have not yet reaped.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            warn!(%err, pgid, "failed to kill process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
