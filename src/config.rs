use crate::error::{RelbumpError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration files probed in the working directory when none is given.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["relbump.toml", "relbump.json", ".relbumprc.json"];

/// Package manager backing a package's version manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BackendType {
    #[default]
    Yarn,
    YarnNextGeneration,
    Npm,
    Maven,
}

impl BackendType {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendType::Yarn => "yarn",
            BackendType::YarnNextGeneration => "yarn-next-generation",
            BackendType::Npm => "npm",
            BackendType::Maven => "maven",
        }
    }

    /// Executable that owns this backend's manifest
    pub fn program(self) -> &'static str {
        let windows = cfg!(target_os = "windows");
        match self {
            BackendType::Yarn | BackendType::YarnNextGeneration if windows => "yarn.cmd",
            BackendType::Yarn | BackendType::YarnNextGeneration => "yarn",
            BackendType::Npm if windows => "npm.cmd",
            BackendType::Npm => "npm",
            BackendType::Maven if windows => "mvn.cmd",
            BackendType::Maven => "mvn",
        }
    }

    pub fn is_node(self) -> bool {
        !matches!(self, BackendType::Maven)
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "yarn" => Ok(BackendType::Yarn),
            "yarn-next-generation" | "yarn-berry" => Ok(BackendType::YarnNextGeneration),
            "npm" => Ok(BackendType::Npm),
            "maven" => Ok(BackendType::Maven),
            other => Err(other.to_string()),
        }
    }
}

/// Backend specific versioning switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersioningOptions {
    /// Maven property that stores the release version instead of `project.version`
    pub custom_version_property: Option<String>,
}

/// A string option as written, or the non-string value found in its place.
///
/// Non-string values are kept so that validation can echo them back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Setting {
    Text(String),
    Other(Value),
}

impl Setting {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(Setting::Text(text.clone())),
            other => Some(Setting::Other(other.clone())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Setting::Text(text) => Some(text.as_str()),
            Setting::Other(_) => None,
        }
    }

    /// The value as it appears in error messages
    pub fn literal(&self) -> String {
        match self {
            Setting::Text(text) => text.clone(),
            Setting::Other(value) => value.to_string(),
        }
    }
}

/// One buildable unit: the root package or a dependency.
///
/// `type` and `pkgRoot` stay raw so that unsupported values reach the validator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    #[serde(rename = "type")]
    pub backend_type: Option<Setting>,
    pub pkg_root: Option<Setting>,
    pub versioning_options: Option<VersioningOptions>,
}

impl PackageSpec {
    pub fn custom_version_property(&self) -> Option<&str> {
        self.versioning_options
            .as_ref()
            .and_then(|o| o.custom_version_property.as_deref())
    }
}

#[cfg(test)]
impl PackageSpec {
    pub fn new(backend_type: &str, pkg_root: &str) -> Self {
        Self {
            backend_type: Some(Setting::Text(backend_type.to_string())),
            pkg_root: Some(Setting::Text(pkg_root.to_string())),
            versioning_options: None,
        }
    }

    pub fn with_custom_version_property(mut self, property: &str) -> Self {
        self.versioning_options = Some(VersioningOptions {
            custom_version_property: Some(property.to_string()),
        });
        self
    }
}

/// One `dependencies` entry, kept as written until it is checked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DependencyEntry(Value);

impl DependencyEntry {
    /// Whatever `type`, `pkgRoot` and versioning options can be read from the entry.
    ///
    /// An entry that is not a table has none of them.
    pub fn spec(&self) -> PackageSpec {
        PackageSpec {
            backend_type: self.0.get("type").and_then(Setting::from_value),
            pkg_root: self.0.get("pkgRoot").and_then(Setting::from_value),
            versioning_options: self
                .0
                .get("versioningOptions")
                .and_then(|options| VersioningOptions::deserialize(options).ok()),
        }
    }

    /// The entry as a package table, or `None` if it is not a well-formed one.
    pub fn package(&self) -> Option<PackageSpec> {
        if !self.0.is_object() {
            return None;
        }
        PackageSpec::deserialize(&self.0).ok()
    }

    pub fn literal(&self) -> String {
        self.0.to_string()
    }
}

/// The `dependencies` entry as written by the user
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Dependencies {
    List(Vec<DependencyEntry>),
    /// Anything that is not a list
    Malformed(Value),
}

impl Dependencies {
    pub fn as_list(&self) -> Option<&[DependencyEntry]> {
        match self {
            Dependencies::List(list) => Some(list),
            Dependencies::Malformed(_) => None,
        }
    }
}

/// Root package settings plus the ordered dependency packages.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    #[serde(rename = "type")]
    pub backend_type: Option<Setting>,
    pub versioning_options: Option<VersioningOptions>,
    pub dependencies: Option<Dependencies>,
}

impl PluginConfig {
    /// Load a configuration file, JSON by `.json` extension and TOML otherwise.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RelbumpError::Config(format!("Failed to read '{}': {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the configuration for a release rooted at `cwd`.
    ///
    /// An explicit path must exist; otherwise the first default file found is
    /// used and a missing one yields an empty configuration.
    pub fn discover(cwd: &Path, explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                cwd.join(path)
            };
            return Ok((Self::load(&path)?, Some(path)));
        }

        for name in DEFAULT_CONFIG_FILES {
            let candidate = cwd.join(name);
            if candidate.is_file() {
                return Ok((Self::load(&candidate)?, Some(candidate)));
            }
        }

        Ok((Self::default(), None))
    }

    /// The root package: type and versioning options, rooted at the working directory.
    pub fn root_spec(&self) -> PackageSpec {
        PackageSpec {
            backend_type: self.backend_type.clone(),
            pkg_root: None,
            versioning_options: self.versioning_options.clone(),
        }
    }

    pub fn dependency_list(&self) -> &[DependencyEntry] {
        self.dependencies
            .as_ref()
            .and_then(Dependencies::as_list)
            .unwrap_or(&[])
    }
}
