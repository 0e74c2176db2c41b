use crate::agents::{ReleaseContext, VersionUpdater};
use crate::config::PluginConfig;
use crate::error::Result;
use crate::logger::Logger;
use crate::manifest::ManifestReader;
use crate::plugin::Plugin;
use crate::utils::PathValidator;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Working directory and configuration shared by every command
struct Release {
    cwd: PathBuf,
    config: PluginConfig,
}

fn load_release(project_path: &Path, config_path: Option<&Path>, logger: &dyn Logger) -> Result<Release> {
    let cwd = PathValidator::validate_project_path(project_path)?;
    let (config, source) = PluginConfig::discover(&cwd, config_path)?;

    match source {
        Some(path) => logger.debug(&format!("Loaded configuration from {}", path.display())),
        None => logger.warn("No configuration file found, updating the root package with defaults"),
    }

    Ok(Release { cwd, config })
}

/// Execute the verify workflow
pub fn execute_verify(
    project_path: &Path,
    config_path: Option<&Path>,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    println!("{}", "Verifying release configuration...".cyan().bold());
    let release = load_release(project_path, config_path, logger.as_ref())?;

    // The version is irrelevant until prepare.
    let mut ctx = ReleaseContext::new(String::new(), &release.cwd, logger);
    Plugin::system().verify(&release.config, &mut ctx)?;

    println!("\n{}", "✨ Configuration is valid!".green().bold());
    Ok(())
}

/// Execute the prepare workflow
pub fn execute_prepare(
    project_path: &Path,
    config_path: Option<&Path>,
    version: &str,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    println!(
        "{}",
        format!("Preparing release {version}...").cyan().bold()
    );
    let release = load_release(project_path, config_path, logger.as_ref())?;

    let mut ctx = ReleaseContext::new(version, &release.cwd, logger).attached_to_terminal();
    Plugin::system().prepare(&release.config, &mut ctx)?;

    println!("\n{}", "✨ All manifests updated!".green().bold());
    Ok(())
}

/// Print the version recorded in every configured manifest
pub fn execute_versions(
    project_path: &Path,
    config_path: Option<&Path>,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    let release = load_release(project_path, config_path, logger.as_ref())?;
    let ctx = ReleaseContext::new(String::new(), &release.cwd, logger);

    println!("{}", "Current package versions:".cyan().bold());
    for update in VersionUpdater::plan(&release.config, &ctx)? {
        let shown = update
            .path
            .strip_prefix(&release.cwd)
            .ok()
            .filter(|relative| !relative.as_os_str().is_empty())
            .map(|relative| relative.display().to_string())
            .unwrap_or_else(|| ".".to_string());

        let version = match ManifestReader::read_version(&update.manager, &update.path) {
            Ok(Some(version)) => version.green().to_string(),
            Ok(None) => "no version".yellow().to_string(),
            Err(err) => err.to_string().red().to_string(),
        };

        println!(
            "   • {} ({}) {}",
            shown.bright_cyan(),
            update.manager.backend().to_string().dimmed(),
            version
        );
    }

    Ok(())
}
