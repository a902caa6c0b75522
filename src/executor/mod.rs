//! Synchronous wrapper around external process invocation.
//!
//! Non-zero exit is never an error here; callers inspect the captured
//! status and decide. Only a failure to spawn surfaces as `Err`.

use anyhow::{bail, Context, Result};
use std::process::Command;
use tracing::info;

pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run a command and capture its output
pub fn run<S: AsRef<str>>(args: &[S]) -> Result<CommandOutput> {
    let (program, rest) = split_args(args)?;
    info!("Running: {}", render(args));

    let output = Command::new(program)
        .args(rest)
        .output()
        .with_context(|| format!("Failed to execute {}", program))?;

    Ok(CommandOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Run a command with inherited stdio so progress is visible; used for
/// long-running build commands. Returns the exit code.
pub fn run_streaming<S: AsRef<str>>(args: &[S]) -> Result<i32> {
    let (program, rest) = split_args(args)?;
    info!("Running: {}", render(args));

    let status = Command::new(program)
        .args(rest)
        .status()
        .with_context(|| format!("Failed to execute {}", program))?;

    Ok(status.code().unwrap_or(-1))
}

fn split_args<S: AsRef<str>>(args: &[S]) -> Result<(&str, Vec<&str>)> {
    match args.split_first() {
        Some((program, rest)) => Ok((
            program.as_ref(),
            rest.iter().map(|a| a.as_ref()).collect(),
        )),
        None => bail!("Empty command"),
    }
}

fn render<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| a.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_captures_stdout() {
        let out = run(&["echo", "hello"]).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
        assert!(out.stderr.is_empty());
    }

    #[test]
    fn test_run_reports_nonzero_exit_without_error() {
        let out = run(&["false"]).unwrap();
        assert!(!out.success());
    }

    #[test]
    fn test_run_missing_binary_is_error() {
        let result = run(&["definitely-not-a-real-binary-2931"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_command_is_error() {
        let args: [&str; 0] = [];
        assert!(run(&args).is_err());
    }
}
