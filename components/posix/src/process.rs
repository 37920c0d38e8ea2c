//! Process control entry point

use std::sync::Arc;

use host_platform::{ChildProcessHost, FsHost, HostValue};

use crate::config::PosixConfig;
use crate::error::{PosixError, Result};

/// Blocking POSIX process control over the host's child-process manager
///
/// Holds no per-process state; every call stands alone, so one instance can
/// serve any number of threads concurrently.
pub struct ProcessControl {
    pub(crate) host: Arc<dyn ChildProcessHost>,
    pub(crate) fs: Arc<dyn FsHost>,
    pub(crate) config: PosixConfig,
}

impl ProcessControl {
    /// Create a process controller with the default configuration
    pub fn new(host: Arc<dyn ChildProcessHost>, fs: Arc<dyn FsHost>) -> Self {
        Self {
            host,
            fs,
            config: PosixConfig::default(),
        }
    }

    /// Create a process controller with a validated configuration
    pub fn with_config(
        host: Arc<dyn ChildProcessHost>,
        fs: Arc<dyn FsHost>,
        config: PosixConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { host, fs, config })
    }

    pub fn config(&self) -> &PosixConfig {
        &self.config
    }

    /// Blocking call into the child-process manager
    ///
    /// Returns the host's result alongside the mapped error, since a failed
    /// operation may still report fields the caller needs.
    pub(crate) fn child_process_call(
        &self,
        operation: &str,
        args: Vec<HostValue>,
    ) -> (HostValue, Option<PosixError>) {
        let outcome = hostproc_ipc::call(&*self.host, operation, args);
        (outcome.value, outcome.error.map(PosixError::from))
    }
}
