//! Python interpreter process bootstrap.

use std::io::BufReader;
use std::process::{Command, Stdio};

use super::ProcessHandle;
use crate::error::{ReplError, Result};

pub fn start_python(program: &str, bootstrap: &str) -> Result<ProcessHandle> {
    let mut cmd = Command::new(program);
    cmd.arg("-u") // unbuffered
        .arg("-c")
        .arg(bootstrap)
        .env("PYTHONIOENCODING", "utf-8")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    let mut child = cmd.spawn().map_err(|source| ReplError::Spawn {
        program: program.to_string(),
        source,
    })?;
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| ReplError::Protocol("no stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ReplError::Protocol("no stdout".into()))?;

    tracing::debug!(program, pid = child.id(), "started python interpreter");

    Ok(ProcessHandle {
        child,
        stdin,
        stdout: BufReader::new(stdout),
    })
}
