use crate::agents::PackageManager;
use crate::error::{RelbumpError, Result};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct PackageJson {
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Pom {
    version: Option<String>,
    #[serde(default)]
    properties: HashMap<String, String>,
}

/// Reads the version currently recorded in a package's manifest
pub struct ManifestReader;

impl ManifestReader {
    pub fn manifest_path(manager: &PackageManager, package_dir: &Path) -> PathBuf {
        if manager.backend().is_node() {
            package_dir.join("package.json")
        } else {
            package_dir.join("pom.xml")
        }
    }

    /// The version the given adapter would overwrite, if the manifest has one.
    pub fn read_version(manager: &PackageManager, package_dir: &Path) -> Result<Option<String>> {
        let path = Self::manifest_path(manager, package_dir);
        let content = fs::read_to_string(&path).map_err(|e| {
            RelbumpError::Config(format!("Failed to read manifest '{}': {e}", path.display()))
        })?;

        match manager {
            PackageManager::MavenPlain => Ok(Self::parse_pom(&content)?.version),
            PackageManager::MavenCustomProperty(property) => {
                Ok(Self::parse_pom(&content)?.properties.remove(property))
            }
            _ => Ok(serde_json::from_str::<PackageJson>(&content)?.version),
        }
    }

    fn parse_pom(content: &str) -> Result<Pom> {
        Ok(from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>org.example</groupId>
  <artifactId>api</artifactId>
  <version>${revision}</version>
  <properties>
    <revision>1.2.0</revision>
    <java.version>17</java.version>
  </properties>
</project>
"#;

    #[test]
    fn reads_package_json_version() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "web", "version": "0.3.1", "private": true }"#,
        )
        .unwrap();

        let version = ManifestReader::read_version(&PackageManager::Npm, dir.path()).unwrap();
        assert_eq!(version.as_deref(), Some("0.3.1"));
    }

    #[test]
    fn reads_pom_version_and_custom_property() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pom.xml"), POM).unwrap();

        let plain = ManifestReader::read_version(&PackageManager::MavenPlain, dir.path()).unwrap();
        assert_eq!(plain.as_deref(), Some("${revision}"));

        let custom = ManifestReader::read_version(
            &PackageManager::MavenCustomProperty("revision".into()),
            dir.path(),
        )
        .unwrap();
        assert_eq!(custom.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempdir().unwrap();
        let err = ManifestReader::read_version(&PackageManager::ClassicYarn, dir.path()).unwrap_err();
        assert!(matches!(err, RelbumpError::Config(_)));
    }
}
