//! Scripted behaviour of mock programs

use std::time::Duration;

use host_platform::HostError;

/// How the mock host completes a `wait` registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Invoke the callback once
    Once,
    /// Invoke the callback twice with the same arguments
    Twice,
    /// Never invoke the callback
    Never,
    /// Unregister the callback host-side without invoking it
    Drop,
}

/// What a program does when spawned and waited on
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) exit_code: Option<i64>,
    pub(crate) delay: Duration,
    pub(crate) spawn_error: Option<HostError>,
    pub(crate) wait_error: Option<HostError>,
    pub(crate) reported_pid: Option<i64>,
    pub(crate) completion: CompletionMode,
}

impl Program {
    /// A program that exits with `code`
    pub fn exits(code: i64) -> Self {
        Self {
            exit_code: Some(code),
            delay: Duration::ZERO,
            spawn_error: None,
            wait_error: None,
            reported_pid: None,
            completion: CompletionMode::Once,
        }
    }

    /// A program the host refuses to start
    pub fn fails_to_spawn(error: HostError) -> Self {
        Self {
            spawn_error: Some(error),
            ..Self::exits(0)
        }
    }

    /// A program whose wait completes with `error`
    pub fn wait_fails(error: HostError) -> Self {
        Self {
            exit_code: None,
            wait_error: Some(error),
            ..Self::exits(0)
        }
    }

    /// Delay the wait completion
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Report a different pid in the wait result
    pub fn reporting_pid(mut self, pid: i64) -> Self {
        self.reported_pid = Some(pid);
        self
    }

    /// Complete the wait without an `exitCode` field
    pub fn without_exit_code(mut self) -> Self {
        self.exit_code = None;
        self
    }

    pub fn completing(mut self, mode: CompletionMode) -> Self {
        self.completion = mode;
        self
    }
}
