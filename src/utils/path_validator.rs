use crate::error::{RelbumpError, Result};
use std::path::{Path, PathBuf};

/// Filesystem capability used to check that a package root exists.
pub trait PathResolver {
    fn exists(&self, path: &Path) -> bool;
}

/// Checks paths against the real filesystem
#[derive(Debug, Default)]
pub struct FsPathResolver;

impl PathResolver for FsPathResolver {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Path helpers shared by validation and the version updater.
pub struct PathValidator;

impl PathValidator {
    /// Validates and canonicalises the release working directory.
    pub fn validate_project_path(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();

        let canonical = path.canonicalize().map_err(|e| {
            RelbumpError::Config(format!("Invalid path '{}': {e}", path.display()))
        })?;

        if !canonical.is_dir() {
            return Err(RelbumpError::Config(format!(
                "Path '{}' is not a directory",
                canonical.display()
            )));
        }

        Ok(canonical)
    }

    /// Resolves `pkg_root` against `cwd` unless it is already absolute.
    ///
    /// Relative roots always use `/` as separator, whatever the host platform.
    pub fn resolve(pkg_root: &str, cwd: &Path) -> PathBuf {
        let candidate = Path::new(pkg_root);
        if candidate.is_absolute() {
            return candidate.to_path_buf();
        }

        let mut resolved = cwd.to_path_buf();
        for segment in pkg_root.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    resolved.pop();
                }
                other => resolved.push(other),
            }
        }
        resolved
    }

    /// A package root is usable when it is a non-blank string naming an existing path.
    pub fn is_valid_pkg_root(
        pkg_root: Option<&str>,
        cwd: &Path,
        resolver: &dyn PathResolver,
    ) -> bool {
        match pkg_root {
            Some(root) if !root.trim().is_empty() => resolver.exists(&Self::resolve(root, cwd)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn validate_project_path_accepts_directory() {
        let dir = tempdir().unwrap();
        assert!(PathValidator::validate_project_path(dir.path()).is_ok());
    }

    #[test]
    fn validate_project_path_rejects_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("file.txt");
        fs::write(&file_path, "test").unwrap();
        let err = PathValidator::validate_project_path(&file_path).unwrap_err();
        assert!(matches!(err, RelbumpError::Config(_)));
    }

    #[test]
    fn resolve_joins_relative_segments() {
        let cwd = Path::new("/work/repo");
        assert_eq!(
            PathValidator::resolve("packages/web", cwd),
            PathBuf::from("/work/repo/packages/web")
        );
        assert_eq!(
            PathValidator::resolve("./a/../b", cwd),
            PathBuf::from("/work/repo/b")
        );
    }

    #[cfg(unix)]
    #[test]
    fn resolve_keeps_absolute_paths() {
        let cwd = Path::new("/work/repo");
        assert_eq!(
            PathValidator::resolve("/opt/pkg", cwd),
            PathBuf::from("/opt/pkg")
        );
    }

    #[test]
    fn pkg_root_must_exist_and_not_be_blank() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("web")).unwrap();
        let fs_resolver = FsPathResolver;

        assert!(PathValidator::is_valid_pkg_root(Some("web"), dir.path(), &fs_resolver));
        assert!(!PathValidator::is_valid_pkg_root(Some("api"), dir.path(), &fs_resolver));
        assert!(!PathValidator::is_valid_pkg_root(Some("   "), dir.path(), &fs_resolver));
        assert!(!PathValidator::is_valid_pkg_root(None, dir.path(), &fs_resolver));
    }
}
