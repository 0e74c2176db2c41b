pub mod config_validator;
pub mod context;
pub mod package_manager;
pub mod tool_probe;
pub mod version_updater;

pub use config_validator::ConfigValidator;
pub use context::{ReleaseContext, VerificationState};
pub use package_manager::{PackageManager, ProcessVersionSetter, VersionSetter};
pub use tool_probe::{SystemToolProbe, ToolProbe};
pub use version_updater::VersionUpdater;
