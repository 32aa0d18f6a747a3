//! # pliptab-invoke
//!
//! **Tier 2 (Utilities)**
//!
//! Runs the PLIP command-line tool against one structure file and returns
//! everything it printed.
//!
//! ## What belongs here
//! * Building the tool's argument vector
//! * Spawning, waiting, and the optional timeout
//! * Capturing stdout and stderr
//!
//! ## What does NOT belong here
//! * Locating or parsing the XML report (use pliptab-report)
//! * Retry decisions (the pipeline owns the retry policy)

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

pub use pliptab_types::ToolVerbosity;

/// Chain restriction passed to `--chains`: two groups, `H` and `T`.
pub const CHAIN_GROUPS: &str = "[['H'], ['T']]";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed with {status}")]
    Failed { command: String, status: ExitStatus },

    #[error("`{command}` timed out after {}s and was killed", .timeout.as_secs_f64())]
    TimedOut { command: String, timeout: Duration },

    #[error("I/O error while running `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl InvokeError {
    /// The rendered command line that triggered the error.
    pub fn command(&self) -> &str {
        match self {
            InvokeError::Spawn { command, .. }
            | InvokeError::Failed { command, .. }
            | InvokeError::TimedOut { command, .. }
            | InvokeError::Io { command, .. } => command,
        }
    }
}

/// The tool executable plus its fixed flag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `-x -O [-q] -f <file> --chains [['H'], ['T']]`
    pub fn args(&self, file: &Path, verbosity: ToolVerbosity) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-x".into(), "-O".into()];
        if verbosity == ToolVerbosity::Quiet {
            args.push("-q".into());
        }
        args.push("-f".into());
        args.push(file.as_os_str().to_owned());
        args.push("--chains".into());
        args.push(CHAIN_GROUPS.into());
        args
    }

    /// Shell-like rendering for diagnostics.
    pub fn render(&self, file: &Path, verbosity: ToolVerbosity) -> String {
        std::iter::once(self.program.as_os_str().to_owned())
            .chain(self.args(file, verbosity))
            .map(|arg| {
                let arg = arg.to_string_lossy().into_owned();
                if arg.contains(char::is_whitespace) {
                    format!("\"{arg}\"")
                } else {
                    arg
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self, file: &Path, verbosity: ToolVerbosity) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(file, verbosity))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

/// Captured output of one successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }
}

/// Run the tool on `file` and wait for it.
///
/// Without a timeout this blocks until the child exits and its output pipes
/// close. With one, the limit covers both: the child is killed once it
/// passes, and [`InvokeError::TimedOut`] is returned.
pub fn invoke(
    tool: &ToolCommand,
    file: &Path,
    verbosity: ToolVerbosity,
    timeout: Option<Duration>,
) -> Result<ToolOutput, InvokeError> {
    let command = tool.render(file, verbosity);
    debug!(%command, "running tool");

    let mut child = tool
        .command(file, verbosity)
        .spawn()
        .map_err(|source| InvokeError::Spawn {
            command: command.clone(),
            source,
        })?;

    let io_err = |source: io::Error| InvokeError::Io {
        command: command.clone(),
        source,
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io_err(io::Error::other("stdout was not captured")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io_err(io::Error::other("stderr was not captured")))?;
    let stdout = drain(stdout);
    let stderr = drain(stderr);

    let deadline = timeout.map(|limit| (Instant::now() + limit, limit));
    let timed_out = |limit: Duration| InvokeError::TimedOut {
        command: command.clone(),
        timeout: limit,
    };

    let status = match deadline {
        None => child.wait().map_err(io_err)?,
        Some((at, limit)) => match wait_until(&mut child, at).map_err(io_err)? {
            Some(status) => status,
            None => return Err(timed_out(limit)),
        },
    };

    // A grandchild may still hold the pipes after the child exits, so the
    // readers are bounded by the same deadline. On expiry they are detached.
    let (stdout, stderr) = match deadline {
        None => (collect(stdout), collect(stderr)),
        Some((at, limit)) => {
            if !join_until(&stdout, at) || !join_until(&stderr, at) {
                return Err(timed_out(limit));
            }
            (collect(stdout), collect(stderr))
        }
    };
    let stdout = stdout.map_err(io_err)?;
    let stderr = stderr.map_err(io_err)?;

    if !status.success() {
        debug!(%command, stderr = %stderr.trim_end(), "tool exited unsuccessfully");
        return Err(InvokeError::Failed { command, status });
    }

    Ok(ToolOutput { stdout, stderr })
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(handle: JoinHandle<io::Result<Vec<u8>>>) -> io::Result<String> {
    let bytes = handle
        .join()
        .map_err(|_| io::Error::other("output reader thread panicked"))??;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `Ok(None)` means the deadline passed and the child was killed.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            // The child may have exited between try_wait and kill.
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// True once the reader thread has finished, false if the deadline passed.
fn join_until<T>(handle: &JoinHandle<T>, deadline: Instant) -> bool {
    loop {
        if handle.is_finished() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}
