//! Preflight checks run before synthesis writes anything.

use keel_core::{application::ports::Preflight, error::{KeelError, KeelResult}};
use tracing::debug;

/// Requires an executable to be resolvable on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOnPath {
    binary: String,
}

impl BinaryOnPath {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Preflight for BinaryOnPath {
    fn name(&self) -> String {
        self.binary.clone()
    }

    fn check(&self) -> KeelResult<()> {
        let path = which::which(&self.binary).map_err(|e| KeelError::Configuration {
            message: format!("'{}' not found on PATH: {e}", self.binary),
        })?;
        debug!(binary = %self.binary, path = %path.display(), "Found binary");
        Ok(())
    }
}
