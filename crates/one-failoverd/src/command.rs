//! Shelling out to host management tooling

use std::{
    io::Error as IoError,
    process::{Command, ExitStatus, Output},
    result::Result as StdResult,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to run `{command}`: {source}")]
    Spawn { command: String, source: IoError },

    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: ExitStatus },
}

impl Error {
    /// Exit code of a command that ran but failed
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Spawn { .. } => None,
            Self::Failed { status, .. } => status.code(),
        }
    }
}

pub type Result<T> = StdResult<T, Error>;

/// Minimal interface for running management commands
///
/// Kept as a trait so the passes over the service fleet can be exercised
/// without a live service manager.
pub trait CommandRunner {
    /// Run `program` with `args` to completion
    ///
    /// Succeeds on a zero exit status. Captured output is logged, never
    /// returned.
    fn run(&self, program: &str, args: &[&str]) -> Result<()>;
}

/// Runs commands on the host
#[derive(Debug, Default, Clone)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        let command = render_command(program, args);
        log::debug!("Running `{}`", command);
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;
        log_output(&command, &output);
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::Failed {
                command,
                status: output.status,
            })
        }
    }
}

fn render_command(program: &str, args: &[&str]) -> String {
    let mut command = String::from(program);
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}

fn log_output(command: &str, output: &Output) {
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        log::debug!("`{}`: {}", command, line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        log::debug!("`{}` (stderr): {}", command, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_command_includes_args() {
        assert_eq!(
            "rc-service one-dns stop",
            render_command("rc-service", &["one-dns", "stop"])
        );
    }

    #[test]
    fn spawn_failure_has_no_exit_code() {
        let err = SystemCommandRunner
            .run("/nonexistent/program", &[])
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert_eq!(None, err.exit_code());
    }

    #[test]
    fn nonzero_exit_is_an_error() {
        let err = SystemCommandRunner.run("false", &[]).unwrap_err();
        assert_eq!(Some(1), err.exit_code());
    }

    #[test]
    fn zero_exit_succeeds() {
        assert!(SystemCommandRunner.run("true", &[]).is_ok());
    }
}
