//! Host capability traits
//!
//! These mirror the calling conventions of the host runtime rather than a
//! Rust-native process API: arguments and replies are [`HostValue`]s, and
//! asynchronous operations complete by invoking a previously registered
//! callback with positional `(error, result)` arguments.

use crate::value::HostValue;
use crate::Result;

/// Handle to a completion callback registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

impl CallbackId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A completion callback as the host sees it
///
/// The host calls it with positional arguments; by convention `args[0]` is
/// the error (null when none) and `args[1]`, if present, the result.
pub type Completion = Box<dyn Fn(Vec<HostValue>) + Send + Sync>;

/// Asynchronous host operations completed through registered callbacks
pub trait AsyncHost: Send + Sync {
    /// Make a callback visible to the host
    fn register_callback(&self, completion: Completion) -> CallbackId;

    /// Unregister a callback
    ///
    /// Releasing an id the host no longer knows is a no-op.
    fn release_callback(&self, id: CallbackId);

    /// Start a named asynchronous operation
    ///
    /// The host appends `callback` as the final argument and invokes it once
    /// the operation completes, possibly before this call returns. An `Err`
    /// means the operation was rejected up front and the callback will never
    /// fire.
    fn invoke(
        &self,
        operation: &str,
        args: Vec<HostValue>,
        callback: CallbackId,
    ) -> Result<()>;
}

/// The host's child-process manager
pub trait ChildProcessHost: AsyncHost {
    /// Spawn a process synchronously
    ///
    /// Returns the host's process object; `pid` is a number and `error` is
    /// present only on failure.
    fn spawn(&self, name: &str, args: Vec<HostValue>, options: HostValue) -> HostValue;
}

/// Filesystem and process-environment collaborator
pub trait FsHost: Send + Sync {
    /// Current working directory of the calling program
    fn getwd(&self) -> Result<String>;

    /// Current environment as `KEY=VALUE` strings
    fn environ(&self) -> Vec<String>;

    /// Synchronous filesystem call (`flock`, ...)
    fn fs_call(&self, operation: &str, args: Vec<HostValue>) -> Result<HostValue>;
}
