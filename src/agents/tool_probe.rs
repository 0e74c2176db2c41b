use crate::config::BackendType;
use std::process::{Command, Stdio};

/// Reports whether a backend's command line tool can be run.
pub trait ToolProbe {
    fn is_installed(&self, backend: BackendType) -> bool;
}

/// Probes the tool on `PATH` by running `<tool> --version`
#[derive(Debug, Default)]
pub struct SystemToolProbe;

impl SystemToolProbe {
    fn command_available(program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

impl ToolProbe for SystemToolProbe {
    fn is_installed(&self, backend: BackendType) -> bool {
        Self::command_available(backend.program())
    }
}
