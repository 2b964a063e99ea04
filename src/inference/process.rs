// process.rs - Subprocess execution with timeout and cooperative cancellation

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{PythiaError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(25);
/// Lines of captured output kept in error diagnostics
pub const DIAGNOSTIC_LINES: usize = 20;

/// Shared flag checked while a subprocess runs; cancelling kills the child
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Captured result of a finished process
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Locate an executable, resolving bare names through `PATH`
pub fn resolve_executable(path: &Path) -> Result<PathBuf> {
    let not_found = |reason: &str| PythiaError::ExternalToolNotFound {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let candidate = if path.components().count() == 1 && !path.exists() {
        let paths = std::env::var_os("PATH").ok_or_else(|| not_found("PATH is not set"))?;
        std::env::split_paths(&paths)
            .map(|dir| dir.join(path))
            .find(|p| p.is_file())
            .ok_or_else(|| not_found("not found in PATH"))?
    } else {
        path.to_path_buf()
    };

    if !candidate.exists() {
        return Err(not_found("file does not exist"));
    }
    if !candidate.is_file() {
        return Err(not_found("not a regular file"));
    }
    if !is_executable(&candidate) {
        return Err(not_found("file is not executable"));
    }
    Ok(candidate)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Render a command for error messages and logs
pub fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `cmd` to completion, capturing stdout/stderr into files under `capture_dir`.
///
/// On Unix the child leads its own process group, and the whole group is
/// killed when `timeout` elapses or `cancel` is triggered, so helpers
/// started by wrapper scripts do not outlive the run.
pub fn run(
    mut cmd: Command,
    capture_dir: &Path,
    timeout: Option<Duration>,
    cancel: Option<&CancellationToken>,
) -> Result<ProcessOutput> {
    let stdout_path = capture_dir.join("stdout.txt");
    let stderr_path = capture_dir.join("stderr.txt");
    let stdout_file = File::create(&stdout_path).map_err(|e| PythiaError::io(&stdout_path, e))?;
    let stderr_file = File::create(&stderr_path).map_err(|e| PythiaError::io(&stderr_path, e))?;

    let command_line = describe(&cmd);
    debug!(command = %command_line, "spawning");

    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return Err(PythiaError::Cancelled);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let start = Instant::now();
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_file))
        .stderr(Stdio::from(stderr_file))
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => PythiaError::ExternalToolNotFound {
                path: PathBuf::from(cmd.get_program()),
                reason: e.to_string(),
            },
            _ => PythiaError::io(cmd.get_program(), e),
        })?;

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => return Err(PythiaError::io(cmd.get_program(), e)),
        }

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            warn!(command = %command_line, "cancellation requested, killing process");
            kill_tree(&mut child);
            return Err(PythiaError::Cancelled);
        }
        if let Some(limit) = timeout {
            if start.elapsed() >= limit {
                warn!(command = %command_line, "timeout reached, killing process");
                kill_tree(&mut child);
                return Err(PythiaError::ExternalToolTimeout {
                    command: command_line,
                    seconds: limit.as_secs_f64(),
                    details: captured_tails(&stdout_path, &stderr_path),
                });
            }
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    let stdout = read_lossy(&stdout_path)?;
    let stderr = read_lossy(&stderr_path)?;
    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
        elapsed: start.elapsed(),
    })
}

/// Kill the child's process group (or just the child elsewhere) and reap it
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: plain syscall on a group id we created; errors are ignored
            unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

/// Tails of whatever the killed process wrote before it stopped
fn captured_tails(stdout_path: &Path, stderr_path: &Path) -> String {
    let stdout = read_lossy(stdout_path).unwrap_or_default();
    let stderr = read_lossy(stderr_path).unwrap_or_default();
    format!(
        "stdout (last {n} lines):\n{}\nstderr (last {n} lines):\n{}",
        tail(&stdout, DIAGNOSTIC_LINES),
        tail(&stderr, DIAGNOSTIC_LINES),
        n = DIAGNOSTIC_LINES
    )
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| PythiaError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Last `n` lines of `text`
pub fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
