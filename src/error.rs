use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelbumpError {
    #[error("Configuration failed: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Command '{program} {}' failed with exit code: {code}", .args.join(" "))]
    Command {
        program: String,
        args: Vec<String>,
        code: i32,
    },

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", render_aggregate(.0))]
    Aggregate(Vec<RelbumpError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::de::DeError),
}

impl RelbumpError {
    /// Wraps any error into the single shape returned by the entry points.
    pub fn aggregate(mut errors: Vec<RelbumpError>) -> Self {
        if errors.len() == 1 && matches!(errors[0], RelbumpError::Aggregate(_)) {
            return errors.remove(0);
        }
        RelbumpError::Aggregate(errors)
    }
}

#[cfg(test)]
impl RelbumpError {
    /// Underlying errors of an aggregate, or the error itself.
    pub fn errors(&self) -> Vec<&RelbumpError> {
        match self {
            RelbumpError::Aggregate(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }

    pub fn validation_codes(&self) -> Vec<ErrorCode> {
        self.errors()
            .into_iter()
            .filter_map(|err| match err {
                RelbumpError::Validation(v) => Some(v.code()),
                _ => None,
            })
            .collect()
    }
}

fn render_aggregate(errors: &[RelbumpError]) -> String {
    let mut out = format!("{} error(s) occurred", errors.len());
    for err in errors {
        match err {
            RelbumpError::Validation(v) => {
                out.push_str(&format!("\n  - {}: {}\n    {}", v.code(), v.message(), v.details()));
            }
            other => out.push_str(&format!("\n  - {other}")),
        }
    }
    out
}

pub type Result<T> = std::result::Result<T, RelbumpError>;

/// Codes of the configuration problems reported by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidType,
    TypeNotInstalled,
    InvalidPkgRoot,
    InvalidDependency,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidType => "EINVALIDTYPE",
            ErrorCode::TypeNotInstalled => "ETYPENOTINSTALLED",
            ErrorCode::InvalidPkgRoot => "EINVALIDPKGROOT",
            ErrorCode::InvalidDependency => "EINVALIDDEPENDENCY",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration problem, carrying the offending value.
///
/// `None` payloads mean the value was absent from the configuration and
/// render as `<unset>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid package type option: {}", display_value(.0))]
    InvalidType(Option<String>),

    #[error("{0} is not installed")]
    TypeNotInstalled(String),

    #[error("Invalid package root: {}", display_value(.0))]
    InvalidPkgRoot(Option<String>),

    #[error("Invalid dependency list")]
    InvalidDependency(String),
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::InvalidType(_) => ErrorCode::InvalidType,
            ValidationError::TypeNotInstalled(_) => ErrorCode::TypeNotInstalled,
            ValidationError::InvalidPkgRoot(_) => ErrorCode::InvalidPkgRoot,
            ValidationError::InvalidDependency(_) => ErrorCode::InvalidDependency,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn details(&self) -> String {
        match self {
            ValidationError::InvalidType(_) => {
                "The type option must be one of yarn, yarn-next-generation, npm or maven"
                    .to_string()
            }
            ValidationError::TypeNotInstalled(tool) => {
                format!("Please install {tool} package and try again")
            }
            ValidationError::InvalidPkgRoot(root) => {
                format!("The package root {} does not exist", display_value(root))
            }
            ValidationError::InvalidDependency(found) => format!(
                "The dependency must be a list of objects with pkgRoot and type properties, found: {found}"
            ),
        }
    }
}

fn display_value(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<unset>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_echoes_offending_values() {
        let err = ValidationError::InvalidType(Some("gradle".into()));
        assert_eq!(err.code().as_str(), "EINVALIDTYPE");
        assert_eq!(err.message(), "Invalid package type option: gradle");

        let err = ValidationError::TypeNotInstalled("maven".into());
        assert_eq!(err.message(), "maven is not installed");
        assert_eq!(err.details(), "Please install maven package and try again");
    }

    #[test]
    fn absent_pkg_root_is_reported_as_unset() {
        let err = ValidationError::InvalidPkgRoot(None);
        assert_eq!(err.code(), ErrorCode::InvalidPkgRoot);
        assert_eq!(err.message(), "Invalid package root: <unset>");
        assert_eq!(err.details(), "The package root <unset> does not exist");
    }

    #[test]
    fn aggregate_lists_every_error() {
        let err = RelbumpError::aggregate(vec![
            ValidationError::InvalidType(Some("pip".into())).into(),
            ValidationError::InvalidPkgRoot(Some("missing".into())).into(),
        ]);
        let rendered = err.to_string();
        assert!(rendered.starts_with("2 error(s) occurred"));
        assert!(rendered.contains("EINVALIDTYPE: Invalid package type option: pip"));
        assert!(rendered.contains("Invalid package root: missing"));
        assert_eq!(
            err.validation_codes(),
            vec![ErrorCode::InvalidType, ErrorCode::InvalidPkgRoot]
        );
    }

    #[test]
    fn aggregate_does_not_nest() {
        let inner = RelbumpError::aggregate(vec![RelbumpError::Config("bad".into())]);
        let outer = RelbumpError::aggregate(vec![inner]);
        assert_eq!(outer.errors().len(), 1);
        assert!(matches!(outer.errors()[0], RelbumpError::Config(_)));
    }
}
