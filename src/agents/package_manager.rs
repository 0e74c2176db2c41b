use crate::agents::context::ReleaseContext;
use crate::config::{BackendType, PackageSpec};
use crate::error::{RelbumpError, Result};
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// How a package's manifest gets its new version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageManager {
    /// yarn 1.x, tolerant of re-applying the same version
    ClassicYarn,
    /// yarn 2+, which has no tag or same-version flags
    YarnNextGeneration,
    Npm,
    MavenPlain,
    /// Writes the version into the named `<properties>` entry of the pom
    MavenCustomProperty(String),
}

impl PackageManager {
    /// Pick the adapter for a backend, honouring maven's custom version property.
    pub fn resolve(backend: BackendType, spec: &PackageSpec) -> Self {
        match backend {
            BackendType::Yarn => PackageManager::ClassicYarn,
            BackendType::YarnNextGeneration => PackageManager::YarnNextGeneration,
            BackendType::Npm => PackageManager::Npm,
            BackendType::Maven => match spec.custom_version_property() {
                Some(property) => PackageManager::MavenCustomProperty(property.to_string()),
                None => PackageManager::MavenPlain,
            },
        }
    }

    pub fn backend(&self) -> BackendType {
        match self {
            PackageManager::ClassicYarn => BackendType::Yarn,
            PackageManager::YarnNextGeneration => BackendType::YarnNextGeneration,
            PackageManager::Npm => BackendType::Npm,
            PackageManager::MavenPlain | PackageManager::MavenCustomProperty(_) => {
                BackendType::Maven
            }
        }
    }

    /// Build the command line that sets `version` in the manifest
    pub fn command(&self, version: &str) -> VersionCommand {
        let args = match self {
            PackageManager::ClassicYarn => vec![
                "version".to_string(),
                format!("--new-version={version}"),
                "--no-git-tag-version".to_string(),
                "--allow-same-version".to_string(),
            ],
            PackageManager::YarnNextGeneration => vec!["version".to_string(), version.to_string()],
            PackageManager::Npm => vec![
                "version".to_string(),
                version.to_string(),
                "--no-git-tag-version".to_string(),
                "--allow-same-version".to_string(),
            ],
            PackageManager::MavenPlain => vec![
                "versions:set".to_string(),
                format!("-DnewVersion={version}"),
            ],
            PackageManager::MavenCustomProperty(property) => vec![
                "versions:set-property".to_string(),
                format!("-Dproperty={property}"),
                format!("-DnewVersion={version}"),
            ],
        };

        VersionCommand {
            program: self.backend().program().to_string(),
            args,
            forward_env: self.backend() == BackendType::Maven,
        }
    }
}

/// A fully built backend invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Whether the release environment must be passed to the child
    pub forward_env: bool,
}

impl VersionCommand {
    pub fn display(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }
}

/// Applies a version to the manifest under `path`.
pub trait VersionSetter {
    fn set_version(
        &self,
        manager: &PackageManager,
        version: &str,
        path: &Path,
        ctx: &mut ReleaseContext,
    ) -> Result<()>;
}

/// Runs the real package manager and streams its output into the context sinks
#[derive(Debug, Default)]
pub struct ProcessVersionSetter {
    /// Directory holding the package manager executables instead of `PATH`
    tool_dir: Option<PathBuf>,
}

#[cfg(test)]
impl ProcessVersionSetter {
    pub fn with_tool_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_dir: Some(dir.into()),
        }
    }
}

impl VersionSetter for ProcessVersionSetter {
    fn set_version(
        &self,
        manager: &PackageManager,
        version: &str,
        path: &Path,
        ctx: &mut ReleaseContext,
    ) -> Result<()> {
        let mut command = manager.command(version);
        if let Some(dir) = &self.tool_dir {
            command.program = dir.join(&command.program).display().to_string();
        }
        ctx.logger.log(&format!(
            "Updating version to {version} with {} at {}",
            manager.backend(),
            path.display()
        ));
        ctx.logger.debug(&format!("Executing: {}", command.display()));

        run_streaming(
            &command,
            path,
            &ctx.env,
            ctx.stdout.as_mut(),
            ctx.stderr.as_mut(),
        )
    }
}

/// Execute a command with live output streaming, blocking until it exits
pub fn run_streaming(
    command: &VersionCommand,
    dir: &Path,
    env: &HashMap<String, String>,
    stdout: &mut (dyn Write + Send),
    stderr: &mut (dyn Write + Send),
) -> Result<()> {
    let mut process = Command::new(&command.program);
    process
        .current_dir(dir)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if command.forward_env {
        process.envs(env);
    }

    let mut child = process.spawn().map_err(|source| RelbumpError::Spawn {
        program: command.program.clone(),
        source,
    })?;

    let child_stdout = child.stdout.take();
    let child_stderr = child.stderr.take();

    // Both pipes are drained at once so a chatty stderr cannot stall the child.
    let streamed = thread::scope(|scope| -> io::Result<()> {
        let stderr_pump = scope.spawn(move || pump(child_stderr, stderr));

        let copied = pump(child_stdout, stdout);
        if copied.is_err() {
            // Nobody reads stdout anymore; stop the child so stderr reaches EOF.
            let _ = child.kill();
        }

        let pumped = stderr_pump
            .join()
            .map_err(|_| io::Error::other("stderr stream thread panicked"))?;
        copied.and(pumped)
    });

    let status = child.wait();
    streamed?;
    let status = status?;
    if !status.success() {
        return Err(RelbumpError::Command {
            program: command.program.clone(),
            args: command.args.clone(),
            code: status.code().unwrap_or(-1),
        });
    }

    Ok(())
}

fn pump(pipe: Option<impl Read>, sink: &mut (dyn Write + Send)) -> io::Result<()> {
    if let Some(mut pipe) = pipe {
        io::copy(&mut pipe, &mut *sink)?;
        sink.flush()?;
    }
    Ok(())
}
