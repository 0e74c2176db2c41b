use crate::agents::context::ReleaseContext;
use crate::agents::package_manager::{PackageManager, VersionSetter};
use crate::config::{
    BackendType, Dependencies, DependencyEntry, PackageSpec, PluginConfig, Setting,
};
use crate::error::{Result, ValidationError};
use crate::utils::PathValidator;
use std::path::PathBuf;

/// VersionUpdater drives the root package and then every dependency to the
/// release version, one backend invocation at a time.
///
/// It trusts the configuration to have been validated already and stops at
/// the first failing package.
pub struct VersionUpdater<'a> {
    setter: &'a dyn VersionSetter,
}

/// One package ready to be updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub manager: PackageManager,
    pub path: PathBuf,
}

impl<'a> VersionUpdater<'a> {
    pub fn new(setter: &'a dyn VersionSetter) -> Self {
        Self { setter }
    }

    pub fn run(&self, config: &PluginConfig, ctx: &mut ReleaseContext) -> Result<()> {
        let version = ctx.version.clone();
        for update in Self::plan(config, ctx)? {
            self.setter
                .set_version(&update.manager, &version, &update.path, ctx)?;
        }
        Ok(())
    }

    /// Resolve adapters and paths for the root package followed by each dependency.
    pub fn plan(config: &PluginConfig, ctx: &ReleaseContext) -> Result<Vec<PlannedUpdate>> {
        if let Some(Dependencies::Malformed(value)) = &config.dependencies {
            return Err(ValidationError::InvalidDependency(value.to_string()).into());
        }

        let dependencies = config
            .dependency_list()
            .iter()
            .map(Self::dependency_package)
            .collect::<Result<Vec<_>>>()?;

        std::iter::once(config.root_spec())
            .chain(dependencies)
            .map(|spec| Self::plan_package(&spec, ctx))
            .collect()
    }

    fn dependency_package(entry: &DependencyEntry) -> Result<PackageSpec> {
        entry
            .package()
            .ok_or_else(|| ValidationError::InvalidDependency(entry.literal()).into())
    }

    fn plan_package(spec: &PackageSpec, ctx: &ReleaseContext) -> Result<PlannedUpdate> {
        let backend = match &spec.backend_type {
            None => BackendType::default(),
            Some(raw) => raw
                .as_str()
                .and_then(|t| t.parse::<BackendType>().ok())
                .ok_or_else(|| ValidationError::InvalidType(Some(raw.literal())))?,
        };

        // A dependency without pkgRoot lands on the working directory, like the root.
        let path = match &spec.pkg_root {
            Some(Setting::Text(root)) => PathValidator::resolve(root, &ctx.cwd),
            Some(other) => {
                return Err(ValidationError::InvalidPkgRoot(Some(other.literal())).into());
            }
            None => ctx.cwd.clone(),
        };

        ctx.logger.debug(&format!(
            "updateVersion({}, {}, {backend}, {}, {:?})",
            ctx.version,
            ctx.cwd.display(),
            path.display(),
            spec.versioning_options
        ));

        Ok(PlannedUpdate {
            manager: PackageManager::resolve(backend, spec),
            path,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSetter;
    use super::*;
    use crate::error::RelbumpError;
    use crate::logger::testing::MemoryLogger;
    use std::path::Path;
    use std::sync::Arc;

    fn context() -> ReleaseContext {
        ReleaseContext::new("2.0.0", "/repo", Arc::new(MemoryLogger::default()))
    }

    fn config(content: &str) -> PluginConfig {
        PluginConfig::from_json(content).unwrap()
    }

    #[test]
    fn empty_configuration_updates_root_with_classic_yarn() {
        let setter = RecordingSetter::default();
        let mut ctx = context();
        VersionUpdater::new(&setter)
            .run(&PluginConfig::default(), &mut ctx)
            .unwrap();

        assert_eq!(
            *setter.calls.borrow(),
            vec![(
                PackageManager::ClassicYarn,
                "2.0.0".to_string(),
                PathBuf::from("/repo")
            )]
        );
    }

    #[test]
    fn updates_root_then_dependencies_in_order() {
        let setter = RecordingSetter::default();
        let mut ctx = context();
        let config = config(
            r#"{
                "type": "maven",
                "dependencies": [
                    { "type": "npm", "pkgRoot": "web" },
                    { "type": "yarn-next-generation", "pkgRoot": "packages/ui" },
                    { "type": "maven", "pkgRoot": "api",
                      "versioningOptions": { "customVersionProperty": "revision" } }
                ]
            }"#,
        );

        VersionUpdater::new(&setter).run(&config, &mut ctx).unwrap();

        let calls = setter.calls.borrow();
        let managers: Vec<&PackageManager> = calls.iter().map(|(m, _, _)| m).collect();
        assert_eq!(
            managers,
            vec![
                &PackageManager::MavenPlain,
                &PackageManager::Npm,
                &PackageManager::YarnNextGeneration,
                &PackageManager::MavenCustomProperty("revision".into()),
            ]
        );
        let paths: Vec<&Path> = calls.iter().map(|(_, _, p)| p.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("/repo"),
                Path::new("/repo/web"),
                Path::new("/repo/packages/ui"),
                Path::new("/repo/api"),
            ]
        );
        assert!(calls.iter().all(|(_, version, _)| version == "2.0.0"));
    }

    #[test]
    fn dependency_without_pkg_root_targets_working_directory() {
        let plan = VersionUpdater::plan(
            &config(r#"{ "dependencies": [ { "type": "npm" } ] }"#),
            &context(),
        )
        .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].path, PathBuf::from("/repo"));
    }

    #[test]
    fn stops_at_first_failing_package() {
        let setter = RecordingSetter {
            fail_at: Some(1),
            ..Default::default()
        };
        let mut ctx = context();
        let config = config(
            r#"{ "dependencies": [
                { "type": "npm", "pkgRoot": "a" },
                { "type": "npm", "pkgRoot": "b" }
            ] }"#,
        );

        let err = VersionUpdater::new(&setter).run(&config, &mut ctx).unwrap_err();

        assert!(matches!(err, RelbumpError::Command { .. }));
        assert_eq!(setter.calls.borrow().len(), 2);
    }

    #[test]
    fn unsupported_type_fails_before_any_update() {
        let setter = RecordingSetter::default();
        let mut ctx = context();
        let config = config(
            r#"{ "dependencies": [
                { "type": "npm", "pkgRoot": "a" },
                { "type": "cargo", "pkgRoot": "b" }
            ] }"#,
        );

        let err = VersionUpdater::new(&setter).run(&config, &mut ctx).unwrap_err();

        assert!(matches!(
            err,
            RelbumpError::Validation(ValidationError::InvalidType(Some(ref t))) if t == "cargo"
        ));
        assert!(setter.calls.borrow().is_empty());
    }

    #[test]
    fn malformed_entries_fail_before_any_update() {
        let ctx = context();

        let err = VersionUpdater::plan(
            &config(r#"{ "dependencies": [ { "type": "npm", "pkgRoot": "a" }, "b" ] }"#),
            &ctx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RelbumpError::Validation(ValidationError::InvalidDependency(ref found)) if found == r#""b""#
        ));

        let err = VersionUpdater::plan(
            &config(r#"{ "dependencies": [ { "type": "npm", "pkgRoot": 42 } ] }"#),
            &ctx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RelbumpError::Validation(ValidationError::InvalidPkgRoot(Some(ref root))) if root == "42"
        ));
    }
}
