use crate::agents::{
    ConfigValidator, ProcessVersionSetter, ReleaseContext, SystemToolProbe, ToolProbe,
    VerificationState, VersionSetter, VersionUpdater,
};
use crate::config::PluginConfig;
use crate::error::{RelbumpError, Result};
use crate::utils::{FsPathResolver, PathResolver};

/// The two operations a release pipeline calls: `verify` and `prepare`.
///
/// Both report failures as a single `RelbumpError::Aggregate`.
pub struct Plugin {
    probe: Box<dyn ToolProbe>,
    paths: Box<dyn PathResolver>,
    setter: Box<dyn VersionSetter>,
}

impl Plugin {
    pub fn new(
        probe: Box<dyn ToolProbe>,
        paths: Box<dyn PathResolver>,
        setter: Box<dyn VersionSetter>,
    ) -> Self {
        Self {
            probe,
            paths,
            setter,
        }
    }

    /// Plugin wired to the real tools and filesystem
    pub fn system() -> Self {
        Self::new(
            Box::new(SystemToolProbe),
            Box::new(FsPathResolver),
            Box::new(ProcessVersionSetter::default()),
        )
    }

    /// Validate the configuration once per release run.
    pub fn verify(&self, config: &PluginConfig, ctx: &mut ReleaseContext) -> Result<()> {
        self.ensure_verified(config, ctx)?;
        ctx.logger.success("Configuration verified");
        Ok(())
    }

    /// Validate if needed, then bring every package to `ctx.version`.
    pub fn prepare(&self, config: &PluginConfig, ctx: &mut ReleaseContext) -> Result<()> {
        self.ensure_verified(config, ctx)?;

        if let Err(err) = VersionUpdater::new(self.setter.as_ref()).run(config, ctx) {
            ctx.logger.error(&format!("Failed to update versions: {err}"));
            return Err(RelbumpError::aggregate(vec![err]));
        }

        ctx.logger
            .success(&format!("Updated all packages to {}", ctx.version));
        Ok(())
    }

    fn ensure_verified(&self, config: &PluginConfig, ctx: &mut ReleaseContext) -> Result<()> {
        if !ctx.verification.has_run() {
            let validator = ConfigValidator::new(self.probe.as_ref(), self.paths.as_ref());
            let errors = validator.validate(config, &ctx.cwd, ctx.logger.as_ref());
            ctx.verification = VerificationState::from_errors(errors);
        } else {
            ctx.logger.debug("Configuration already validated for this release");
        }

        match &ctx.verification {
            VerificationState::Failed(errors) => Err(RelbumpError::aggregate(
                errors.iter().cloned().map(RelbumpError::from).collect(),
            )),
            _ => Ok(()),
        }
    }
}
