//! Bounded external process invocation shared by the generation gateway and the export pipeline.
//!
//! Every invocation has a deadline and a stdout cap. Pipes are drained on background threads so a
//! chatty child never blocks on a full pipe while we wait on it. The deadline covers the whole
//! run, including pipes held open by grandchildren. On unix the child leads its own process
//! group, and the whole group is killed on timeout or overflow.

use std::io::{Read, Write as _};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const STDERR_CAP_BYTES: usize = 64 * 1024;

/// What to run and under which bounds.
#[derive(Clone, Debug)]
pub(crate) struct ProcessSpec {
    pub(crate) program: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: Option<PathBuf>,
    pub(crate) stdin: Option<Vec<u8>>,
    pub(crate) timeout: Duration,
    pub(crate) max_output_bytes: usize,
}

impl ProcessSpec {
    pub(crate) fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
            timeout,
            max_output_bytes: 1024 * 1024,
        }
    }

    pub(crate) fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub(crate) fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub(crate) fn stdin(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(bytes.into());
        self
    }

    pub(crate) fn max_output_bytes(mut self, n: usize) -> Self {
        self.max_output_bytes = n;
        self
    }

    fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Captured output of a successful run.
#[derive(Clone, Debug)]
pub(crate) struct ProcessOutput {
    pub(crate) stdout: Vec<u8>,
    pub(crate) stderr: Vec<u8>,
    pub(crate) elapsed: Duration,
}

impl ProcessOutput {
    pub(crate) fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Diagnostics the tool wrote on success, trimmed.
    pub(crate) fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_owned()
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum ProcessError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("'{command}' timed out after {}ms", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },

    #[error("'{command}' produced more than {limit} bytes of output")]
    OutputTooLarge { command: String, limit: usize },

    #[error("'{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed waiting for '{command}': {source}")]
    Wait {
        command: String,
        source: std::io::Error,
    },
}

/// Run `spec` to completion, enforcing its deadline and output cap.
pub(crate) fn run_process(spec: &ProcessSpec) -> Result<ProcessOutput, ProcessError> {
    let command = spec.display();
    let started = Instant::now();

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt as _;
        cmd.process_group(0);
    }

    tracing::info!(command = %command, timeout_ms = spec.timeout.as_millis() as u64, "spawning process");

    let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    if let (Some(bytes), Some(mut stdin)) = (spec.stdin.clone(), child.stdin.take()) {
        // A child that exits without reading stdin yields EPIPE here; its exit status decides.
        thread::spawn(move || {
            let _ = stdin.write_all(&bytes);
        });
    }

    let overflow = Arc::new(AtomicBool::new(false));
    let stdout = child
        .stdout
        .take()
        .map(|p| spawn_reader(p, spec.max_output_bytes, Some(overflow.clone())));
    let stderr = child
        .stderr
        .take()
        .map(|p| spawn_reader(p, STDERR_CAP_BYTES, None));

    let deadline = started + spec.timeout;
    let status: ExitStatus = loop {
        if overflow.load(Ordering::Acquire) {
            kill_and_reap(&mut child);
            return Err(ProcessError::OutputTooLarge {
                command,
                limit: spec.max_output_bytes,
            });
        }

        let now = Instant::now();
        if now >= deadline {
            kill_and_reap(&mut child);
            tracing::warn!(command = %command, "process timed out");
            return Err(ProcessError::Timeout {
                command,
                timeout: spec.timeout,
            });
        }

        match child.wait_timeout((deadline - now).min(POLL_INTERVAL)) {
            Ok(Some(status)) => break status,
            Ok(None) => continue,
            Err(source) => {
                kill_and_reap(&mut child);
                return Err(ProcessError::Wait { command, source });
            }
        }
    };

    let pid = child.id();
    let (Some(stdout), Some(stderr)) = (collect(stdout, deadline), collect(stderr, deadline)) else {
        // The child exited but something it spawned still holds a pipe open.
        kill_group(pid);
        tracing::warn!(command = %command, "process output still open at deadline");
        return Err(ProcessError::Timeout {
            command,
            timeout: spec.timeout,
        });
    };

    if overflow.load(Ordering::Acquire) {
        kill_group(pid);
        return Err(ProcessError::OutputTooLarge {
            command,
            limit: spec.max_output_bytes,
        });
    }

    if !status.success() {
        return Err(ProcessError::Failed {
            command,
            status: format_exit_status(status),
            stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
        });
    }

    let elapsed = started.elapsed();
    tracing::info!(
        command = %command,
        elapsed_ms = elapsed.as_millis() as u64,
        stdout_bytes = stdout.len(),
        "process finished"
    );

    Ok(ProcessOutput {
        stdout,
        stderr,
        elapsed,
    })
}

fn spawn_reader<R>(mut pipe: R, cap: usize, overflow: Option<Arc<AtomicBool>>) -> Receiver<Vec<u8>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let n = match pipe.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            };
            if buf.len() + n > cap {
                match &overflow {
                    Some(flag) => {
                        flag.store(true, Ordering::Release);
                        break;
                    }
                    None => {
                        // Keep draining so the child never blocks; drop the excess.
                        let room = cap.saturating_sub(buf.len());
                        buf.extend_from_slice(&chunk[..room]);
                        continue;
                    }
                }
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let _ = tx.send(buf);
    });
    rx
}

/// Wait for a reader's buffer until `deadline`; `None` if the pipe is still open then.
fn collect(reader: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<Vec<u8>> {
    let Some(rx) = reader else {
        return Some(Vec::new());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(buf) => Some(buf),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
    }
}

fn kill_and_reap(child: &mut std::process::Child) {
    kill_group(child.id());
    let _ = child.kill();
    let _ = child.wait();
}

/// Kill every process in the group led by `pid`.
#[cfg(unix)]
fn kill_group(pid: u32) {
    let _ = Command::new("kill")
        .args(["-KILL", "--", &format!("-{pid}")])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}

fn format_exit_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_owned(),
    }
}
