//! One in-flight host request

use crossbeam::channel::{bounded, Receiver, TrySendError};
use host_platform::{is_present, AsyncHost, CallbackId, HostError, HostValue};
use log::{trace, warn};

use crate::{CallError, CallOutcome};

/// Completion arguments as delivered by the host
struct Completed {
    value: HostValue,
    error: Option<HostError>,
}

impl Completed {
    /// Decode positional `(error, result?)`
    fn from_args(args: Vec<HostValue>) -> Self {
        let mut args = args.into_iter();
        let error = args
            .next()
            .filter(is_present)
            .map(|raw| HostError::from_value(&raw));
        let value = args.next().unwrap_or(HostValue::Null);
        Self { value, error }
    }
}

/// Host-side callback registration, released on drop
struct Subscription<'h, H: AsyncHost + ?Sized> {
    host: &'h H,
    id: CallbackId,
}

impl<H: AsyncHost + ?Sized> Drop for Subscription<'_, H> {
    fn drop(&mut self) {
        self.host.release_callback(self.id);
        trace!("released host callback {}", self.id.raw());
    }
}

/// Bookkeeping for one in-flight host request awaiting its single callback
pub struct PendingCall<'h, H: AsyncHost + ?Sized> {
    operation: String,
    rx: Receiver<Completed>,
    subscription: Subscription<'h, H>,
}

impl<'h, H: AsyncHost + ?Sized> PendingCall<'h, H> {
    /// Register a one-shot completion for `operation` with the host
    pub fn register(host: &'h H, operation: &str) -> Self {
        let (tx, rx) = bounded::<Completed>(1);

        let op = operation.to_string();
        let id = host.register_callback(Box::new(move |args: Vec<HostValue>| {
            match tx.try_send(Completed::from_args(args)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!("discarding duplicate completion for `{op}`");
                }
                Err(TrySendError::Disconnected(_)) => {
                    trace!("completion for `{op}` arrived after the caller returned");
                }
            }
        }));
        trace!("registered host callback {} for `{}`", id.raw(), operation);

        Self {
            operation: operation.to_string(),
            rx,
            subscription: Subscription { host, id },
        }
    }

    /// Id to hand to the host as the completion argument
    pub fn callback_id(&self) -> CallbackId {
        self.subscription.id
    }

    /// Block until the completion fires, then release the registration
    pub fn wait(self) -> CallOutcome {
        match self.rx.recv() {
            Ok(Completed { value, error }) => CallOutcome {
                value,
                error: error.map(|source| CallError::Host {
                    operation: self.operation.clone(),
                    source,
                }),
            },
            Err(_) => CallOutcome::failed(CallError::Abandoned {
                operation: self.operation.clone(),
            }),
        }
    }
}
