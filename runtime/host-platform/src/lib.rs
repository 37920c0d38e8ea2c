//! # Host Platform Abstraction Layer
//!
//! The seams between the POSIX process layer and the host runtime it runs in.
//! The host only offers an asynchronous, callback-based process manager plus a
//! handful of synchronous filesystem calls; everything here is expressed as
//! traits so the same consumer code runs against the real host binding or the
//! in-memory mock used by tests.
//!
//! ## Capabilities
//!
//! - [`AsyncHost`]: completion-callback registration and named asynchronous
//!   operations (`wait`)
//! - [`ChildProcessHost`]: the synchronous `spawn` entry point
//! - [`FsHost`]: working directory, environment and synchronous `fs_call`s
//!
//! ## Host values
//!
//! Payloads crossing the boundary are weakly typed. They travel as
//! [`HostValue`] and are read back with tolerant probes such as
//! [`number_field`], which treat a missing or wrong-typed field as absent.

pub mod error;
pub mod host;
pub mod value;

pub use error::HostError;
pub use host::{AsyncHost, CallbackId, ChildProcessHost, Completion, FsHost};
pub use value::{error_field, is_present, number_field, HostValue};

pub type Result<T> = core::result::Result<T, HostError>;
