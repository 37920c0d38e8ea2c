//! POSIX Compatibility Layer - blocking process control over an async host
//!
//! # Purpose
//! Presents the traditional blocking process interface (`start_process`,
//! `wait4`, wait-status decoding, `flock`) on top of a host runtime whose
//! process manager is asynchronous and completes through callbacks.
//!
//! # Integration Points
//! - Depends on: host platform (spawn, filesystem), IPC bridge (blocking calls)
//! - Provides to: Applications expecting POSIX process semantics
//! - Host operations: `spawn` (synchronous), `wait` (asynchronous),
//!   `fs_call("flock", ..)` (synchronous)
//!
//! # Architecture
//! - [`ProcessControl`] owns the host and filesystem collaborators; no hidden
//!   process-wide state
//! - Spawning is a single synchronous host call; waiting goes through the
//!   bridge and blocks the calling thread
//! - Exit statuses are packed into [`WaitStatus`] words
//!
//! # Not supported
//! Signals, process groups and sessions, resource usage, and waiting on an
//! unspecified child. These are reported as errors, never approximated.
//!
//! # Testing Strategy
//! - Unit tests: codecs, error mapping, spawn and wait decoding against the
//!   mock host
//! - Integration tests: spawn/wait lifecycles, concurrent waiters, leak checks

pub mod attr;
pub mod config;
pub mod env;
pub mod error;
pub mod flock;
pub mod process;
mod spawn;
mod wait;
pub mod wait_status;

pub use attr::ProcAttr;
pub use config::PosixConfig;
pub use env::split_env_pairs;
pub use error::{map_host_error, Errno, PosixError, Result, WaitError};
pub use flock::LockOperation;
pub use process::ProcessControl;
pub use wait_status::{
    Rusage, WaitOptions, WaitStatus, EXITED_MASK, EXIT_CODE_SHIFT, MAX_EXIT_CODE, MIN_EXIT_CODE,
};

/// Process identifier
pub type Pid = i32;

/// Process handle returned alongside the pid; always `0`
pub type Handle = usize;
