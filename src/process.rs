//! Captured subprocess execution.
//!
//! All subprocess use in this crate goes through [`run`]: spawn, block until
//! exit, hand back the exit code with captured output. No timeouts are imposed
//! here; callers that need one wrap the call themselves.

use crate::error::Result;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

/// Exit code plus captured output of a finished subprocess.
#[derive(Debug)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Best diagnostic line available: stderr if non-empty, else stdout.
    pub fn detail(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}

/// Run a prepared command to completion and capture its output.
pub fn run_command(command: &mut Command) -> Result<ProcessOutput> {
    let output = command.output()?;

    Ok(ProcessOutput {
        // A signal-terminated child has no code; report it as a failure.
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Run a program to completion and capture its output.
pub fn run<S: AsRef<OsStr>>(program: S, args: &[&str], cwd: Option<&Path>) -> Result<ProcessOutput> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    run_command(&mut command)
}

/// Probe an executable with `--version`; success means exit code 0.
pub fn version_probe(exe: &Path) -> Result<ProcessOutput> {
    run(exe, &["--version"], None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_run_captures_exit_code() {
        let output = run("false", &[], None).unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_stdout() {
        let output = run("echo", &["hello"], None).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.detail(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_detail_prefers_stderr() {
        let output = run("sh", &["-c", "echo out; echo err >&2"], None).unwrap();
        assert_eq!(output.detail(), "err");
    }
}
