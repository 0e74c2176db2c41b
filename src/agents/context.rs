use crate::error::ValidationError;
use crate::logger::Logger;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of configuration validation for one release run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VerificationState {
    #[default]
    NotRun,
    Passed,
    Failed(Vec<ValidationError>),
}

impl VerificationState {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            VerificationState::Passed
        } else {
            VerificationState::Failed(errors)
        }
    }

    pub fn has_run(&self) -> bool {
        !matches!(self, VerificationState::NotRun)
    }
}

/// Everything a release run hands to the version updater
pub struct ReleaseContext {
    /// Target version, passed through to the backends untouched
    pub version: String,
    pub cwd: PathBuf,
    /// Variables forwarded to backends that need the caller's environment
    pub env: HashMap<String, String>,
    pub stdout: Box<dyn Write + Send>,
    pub stderr: Box<dyn Write + Send>,
    pub logger: Arc<dyn Logger>,
    pub verification: VerificationState,
}

impl ReleaseContext {
    pub fn new(version: impl Into<String>, cwd: impl Into<PathBuf>, logger: Arc<dyn Logger>) -> Self {
        Self {
            version: version.into(),
            cwd: cwd.into(),
            env: HashMap::new(),
            stdout: Box::new(std::io::sink()),
            stderr: Box::new(std::io::sink()),
            logger,
            verification: VerificationState::NotRun,
        }
    }

    /// Stream backend output to the terminal and forward the current environment
    pub fn attached_to_terminal(mut self) -> Self {
        self.env = std::env::vars().collect();
        self.stdout = Box::new(std::io::stdout());
        self.stderr = Box::new(std::io::stderr());
        self
    }
}

#[cfg(test)]
pub mod testing {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// In-memory sink that can be handed to a context and read back afterwards
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
