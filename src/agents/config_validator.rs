use crate::agents::tool_probe::ToolProbe;
use crate::config::{BackendType, Dependencies, PackageSpec, PluginConfig, Setting};
use crate::error::ValidationError;
use crate::logger::Logger;
use crate::utils::{PathResolver, PathValidator};
use std::path::Path;

/// ConfigValidator checks that every declared package can be updated here.
///
/// Problems are collected, never raised: one bad entry does not stop the
/// remaining ones from being checked.
pub struct ConfigValidator<'a> {
    probe: &'a dyn ToolProbe,
    paths: &'a dyn PathResolver,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(probe: &'a dyn ToolProbe, paths: &'a dyn PathResolver) -> Self {
        Self { probe, paths }
    }

    pub fn validate(
        &self,
        config: &PluginConfig,
        cwd: &Path,
        logger: &dyn Logger,
    ) -> Vec<ValidationError> {
        logger.debug(&format!("Validating configuration: {config:?}"));
        let mut errors = Vec::new();

        if let Some(backend_type) = &config.backend_type {
            errors.extend(self.validate_type(Some(backend_type)));
        }

        if let Some(dependencies) = &config.dependencies {
            errors.extend(self.validate_dependencies(dependencies, cwd));
        }

        errors
    }

    /// An unsupported type is reported without probing for a tool.
    fn validate_type(&self, backend_type: Option<&Setting>) -> Option<ValidationError> {
        let parsed = backend_type
            .and_then(Setting::as_str)
            .and_then(|t| t.parse::<BackendType>().ok());
        let Some(backend) = parsed else {
            return Some(ValidationError::InvalidType(
                backend_type.map(Setting::literal),
            ));
        };

        if self.probe.is_installed(backend) {
            None
        } else {
            Some(ValidationError::TypeNotInstalled(backend.to_string()))
        }
    }

    fn validate_dependencies(
        &self,
        dependencies: &Dependencies,
        cwd: &Path,
    ) -> Vec<ValidationError> {
        let list = match dependencies {
            Dependencies::List(list) => list,
            Dependencies::Malformed(value) => {
                return vec![ValidationError::InvalidDependency(value.to_string())];
            }
        };

        list.iter()
            .flat_map(|entry| self.validate_dependency(&entry.spec(), cwd))
            .collect()
    }

    fn validate_dependency(&self, dependency: &PackageSpec, cwd: &Path) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let pkg_root = dependency.pkg_root.as_ref();

        let root_text = pkg_root.and_then(Setting::as_str);
        if !PathValidator::is_valid_pkg_root(root_text, cwd, self.paths) {
            errors.push(ValidationError::InvalidPkgRoot(pkg_root.map(Setting::literal)));
        }

        // Unlike the root package, a dependency must name its type.
        errors.extend(self.validate_type(dependency.backend_type.as_ref()));
        errors
    }
}
