//! Async-Call Bridge - blocking calls over callback-completed host operations
//!
//! # Purpose
//! The host completes asynchronous operations by invoking a registered
//! callback exactly once. Callers of this crate want the opposite shape: a
//! call that blocks until the result is there. [`call`] converts one into the
//! other.
//!
//! # Integration Points
//! - Depends on: host platform ([`AsyncHost`])
//! - Provides to: POSIX process layer (`wait`), any other blocking host call
//!
//! # Architecture
//! Each call owns a [`PendingCall`]: a capacity-1 channel whose only sender
//! lives inside the completion closure registered with the host. The caller
//! blocks on the receiving end. The registration is a scoped guard released
//! on every return path.
//!
//! Capacity 1 with `try_send` means exactly one completion is ever consumed;
//! a host that fires twice has its second delivery discarded. If the host
//! drops the registration without firing it, the sender goes with it and the
//! caller wakes with [`CallError::Abandoned`] instead of blocking forever.
//!
//! There is no timeout. Callers needing bounded waits cancel above this layer.

use host_platform::{AsyncHost, HostError, HostValue};
use log::debug;
use thiserror::Error;

mod pending;

pub use pending::PendingCall;

/// Errors surfaced by a bridged host call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    #[error("host operation name must not be empty")]
    InvalidOperation,

    #[error("host rejected `{operation}`: {source}")]
    Rejected {
        operation: String,
        #[source]
        source: HostError,
    },

    #[error("`{operation}` failed: {source}")]
    Host {
        operation: String,
        #[source]
        source: HostError,
    },

    #[error("host released the completion for `{operation}` without calling it")]
    Abandoned { operation: String },
}

impl CallError {
    /// The host-reported error behind this failure, if any
    pub fn host_error(&self) -> Option<&HostError> {
        match self {
            CallError::Rejected { source, .. } | CallError::Host { source, .. } => Some(source),
            CallError::InvalidOperation | CallError::Abandoned { .. } => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, CallError>;

/// Result of a bridged call
///
/// A host may report an error and still hand back a result value, so both
/// are kept. `value` is [`HostValue::Null`] when the host supplied none.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    pub value: HostValue,
    pub error: Option<CallError>,
}

impl CallOutcome {
    pub(crate) fn failed(error: CallError) -> Self {
        Self {
            value: HostValue::Null,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Collapse into a `Result`, dropping the value on error
    pub fn into_result(self) -> Result<HostValue> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

/// Invoke a host operation and block until its completion callback fires
///
/// `args` are passed positionally; the host receives the completion callback
/// as the final argument.
pub fn call<H>(host: &H, operation: &str, args: Vec<HostValue>) -> CallOutcome
where
    H: AsyncHost + ?Sized,
{
    if operation.is_empty() {
        return CallOutcome::failed(CallError::InvalidOperation);
    }

    let pending = PendingCall::register(host, operation);
    debug!("host call `{}` with {} arg(s)", operation, args.len());

    if let Err(source) = host.invoke(operation, args, pending.callback_id()) {
        return CallOutcome::failed(CallError::Rejected {
            operation: operation.to_string(),
            source,
        });
    }

    pending.wait()
}
