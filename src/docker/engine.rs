use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::debug;

use super::ContainerRuntime;
use super::commands::{inspect_args, remove_args, run_args, stop_args};
use super::types::{ContainerSpec, ContainerState, RuntimeError};

/// [`ContainerRuntime`] backed by the `docker` command-line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
    prefix: Vec<String>,
}

impl DockerCli {
    /// Parse a command line such as `docker` or `sudo -n docker`.
    pub fn from_command(command: &str) -> Result<Self> {
        let mut words = shell_words::split(command)
            .with_context(|| format!("invalid docker command: {command:?}"))?;
        if words.is_empty() {
            bail!("docker command cannot be blank");
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            prefix: words,
        })
    }

    /// Verify that the Docker daemon is reachable.
    pub fn ensure_available(&self) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.prefix)
            .args(["version", "--format", "{{.Server.Version}}"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| {
                format!("failed to invoke `{}`; is it installed and on PATH?", self.program)
            })?;

        if !status.success() {
            bail!("docker daemon is not running (exit {})", status);
        }
        Ok(())
    }

    /// Run one docker subcommand, returning trimmed stdout.
    fn exec(&self, args: &[String]) -> Result<String, RuntimeError> {
        debug!(program = %self.program, ?args, "docker");
        let output = Command::new(&self.program)
            .args(&self.prefix)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RuntimeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(classify_failure(output.status.code(), stderr, args))
    }
}

/// Map a failed invocation to a [`RuntimeError`], recognising the daemon's
/// "no such container/object" replies.
fn classify_failure(exit_code: Option<i32>, stderr: String, args: &[String]) -> RuntimeError {
    if stderr.contains("No such container") || stderr.contains("No such object") {
        let name = args.last().cloned().unwrap_or_default();
        return RuntimeError::NotFound(name);
    }
    let message = if stderr.is_empty() {
        let subcommand = args.first().map_or("", String::as_str);
        format!("docker {subcommand} failed (exit {exit_code:?})")
    } else {
        stderr
    };
    RuntimeError::Command { exit_code, message }
}

impl ContainerRuntime for DockerCli {
    fn create(&self, spec: &ContainerSpec) -> Result<(), RuntimeError> {
        self.exec(&run_args(spec)).map(drop)
    }

    fn stop(&self, name: &str, timeout: Duration) -> Result<(), RuntimeError> {
        self.exec(&stop_args(name, timeout)).map(drop)
    }

    fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        self.exec(&remove_args(name)).map(drop)
    }

    fn state(&self, name: &str) -> Result<ContainerState, RuntimeError> {
        self.exec(&inspect_args(name)).map(|raw| ContainerState::parse(&raw))
    }
}
