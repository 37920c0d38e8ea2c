//! POSIX error domain and the host error mapper

use host_platform::HostError;
use hostproc_ipc::CallError;
use thiserror::Error;

use crate::Pid;

/// Error numbers understood by the POSIX layer
///
/// Values follow Linux numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Errno {
    EPERM = 1,
    ENOENT = 2,
    ESRCH = 3,
    EINTR = 4,
    EIO = 5,
    E2BIG = 7,
    ENOEXEC = 8,
    EBADF = 9,
    ECHILD = 10,
    EAGAIN = 11,
    ENOMEM = 12,
    EACCES = 13,
    EEXIST = 17,
    ENOTDIR = 20,
    EISDIR = 21,
    EINVAL = 22,
    EMFILE = 24,
    ENOSPC = 28,
    EPIPE = 32,
    ENOSYS = 38,
    ENOTEMPTY = 39,
}

const ALL_ERRNOS: [Errno; 21] = [
    Errno::EPERM,
    Errno::ENOENT,
    Errno::ESRCH,
    Errno::EINTR,
    Errno::EIO,
    Errno::E2BIG,
    Errno::ENOEXEC,
    Errno::EBADF,
    Errno::ECHILD,
    Errno::EAGAIN,
    Errno::ENOMEM,
    Errno::EACCES,
    Errno::EEXIST,
    Errno::ENOTDIR,
    Errno::EISDIR,
    Errno::EINVAL,
    Errno::EMFILE,
    Errno::ENOSPC,
    Errno::EPIPE,
    Errno::ENOSYS,
    Errno::ENOTEMPTY,
];

impl Errno {
    pub const fn raw(self) -> i32 {
        self as i32
    }

    pub const fn name(self) -> &'static str {
        match self {
            Errno::EPERM => "EPERM",
            Errno::ENOENT => "ENOENT",
            Errno::ESRCH => "ESRCH",
            Errno::EINTR => "EINTR",
            Errno::EIO => "EIO",
            Errno::E2BIG => "E2BIG",
            Errno::ENOEXEC => "ENOEXEC",
            Errno::EBADF => "EBADF",
            Errno::ECHILD => "ECHILD",
            Errno::EAGAIN => "EAGAIN",
            Errno::ENOMEM => "ENOMEM",
            Errno::EACCES => "EACCES",
            Errno::EEXIST => "EEXIST",
            Errno::ENOTDIR => "ENOTDIR",
            Errno::EISDIR => "EISDIR",
            Errno::EINVAL => "EINVAL",
            Errno::EMFILE => "EMFILE",
            Errno::ENOSPC => "ENOSPC",
            Errno::EPIPE => "EPIPE",
            Errno::ENOSYS => "ENOSYS",
            Errno::ENOTEMPTY => "ENOTEMPTY",
        }
    }

    /// Look up a symbolic code such as `"ENOENT"`
    pub fn from_code(code: &str) -> Option<Self> {
        ALL_ERRNOS.into_iter().find(|errno| errno.name() == code)
    }

    /// Look up a numeric errno; hosts may report it negated
    pub fn from_raw(raw: i64) -> Option<Self> {
        let raw = raw.checked_abs()?;
        ALL_ERRNOS.into_iter().find(|errno| i64::from(errno.raw()) == raw)
    }
}

impl core::fmt::Display for Errno {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// POSIX error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PosixError {
    #[error("Operation not supported: {operation}")]
    NotSupported { operation: &'static str },

    #[error("Host error: {source}")]
    Host {
        errno: Option<Errno>,
        #[source]
        source: HostError,
    },

    #[error("Host call failed: {0}")]
    Call(#[source] CallError),

    #[error("Invalid {operation} reply from host: {reason}")]
    InvalidReply {
        operation: &'static str,
        reason: String,
    },

    #[error("Host reported pid {reported} while waiting for pid {requested}")]
    PidMismatch { requested: Pid, reported: Pid },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PosixError {
    /// Closest errno for this error, if one applies
    pub fn errno(&self) -> Option<Errno> {
        match self {
            PosixError::NotSupported { .. } => Some(Errno::ENOSYS),
            PosixError::Host { errno, .. } => *errno,
            PosixError::Call(CallError::InvalidOperation) => Some(Errno::EINVAL),
            PosixError::Call(_) => Some(Errno::EIO),
            PosixError::InvalidReply { .. } => Some(Errno::EIO),
            PosixError::PidMismatch { .. } => Some(Errno::ECHILD),
            PosixError::Configuration(_) => Some(Errno::EINVAL),
        }
    }

    /// The untouched host error, when the failure came from the host
    pub fn host_error(&self) -> Option<&HostError> {
        match self {
            PosixError::Host { source, .. } => Some(source),
            PosixError::Call(err) => err.host_error(),
            _ => None,
        }
    }
}

/// Map a host-reported error into the POSIX domain
///
/// The host error is kept whole; the errno is derived from its symbolic code,
/// falling back to its numeric errno.
pub fn map_host_error(error: HostError) -> PosixError {
    let errno = error
        .code
        .as_deref()
        .and_then(Errno::from_code)
        .or_else(|| error.errno.and_then(Errno::from_raw));
    PosixError::Host {
        errno,
        source: error,
    }
}

impl From<HostError> for PosixError {
    fn from(error: HostError) -> Self {
        map_host_error(error)
    }
}

impl From<CallError> for PosixError {
    fn from(error: CallError) -> Self {
        match error {
            CallError::Host { source, .. } | CallError::Rejected { source, .. } => {
                map_host_error(source)
            }
            other => PosixError::Call(other),
        }
    }
}

pub type Result<T> = core::result::Result<T, PosixError>;

/// Failure of `wait4`
///
/// Carries the pid `wait4` reports alongside the error: `-1` when the request
/// was refused up front, otherwise the requested pid or the one the host
/// reported instead.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("wait4 (pid {wpid}): {error}")]
pub struct WaitError {
    pub wpid: Pid,
    #[source]
    pub error: PosixError,
}

impl WaitError {
    pub fn errno(&self) -> Option<Errno> {
        self.error.errno()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_lookup() {
        assert_eq!(Errno::from_code("ECHILD"), Some(Errno::ECHILD));
        assert_eq!(Errno::from_code("EWHATEVER"), None);
        assert_eq!(Errno::from_raw(-2), Some(Errno::ENOENT));
        assert_eq!(Errno::from_raw(38), Some(Errno::ENOSYS));
        assert_eq!(Errno::from_raw(i64::MIN), None);
        assert_eq!(Errno::ENOSYS.to_string(), "ENOSYS");
    }

    #[test]
    fn test_map_host_error_prefers_code() {
        let err = map_host_error(HostError::new("gone").with_code("ESRCH").with_errno(-2));
        assert_eq!(err.errno(), Some(Errno::ESRCH));
        assert_eq!(err.host_error().map(|e| e.message.as_str()), Some("gone"));
    }

    #[test]
    fn test_map_host_error_falls_back_to_errno() {
        let err = map_host_error(HostError::new("denied").with_errno(-13));
        assert_eq!(err.errno(), Some(Errno::EACCES));
    }

    #[test]
    fn test_map_host_error_is_lossless() {
        let raw = serde_json::json!({ "message": "weird", "code": "EWEIRD", "syscall": "spawn" });
        let host = HostError::from_value(&raw);
        let err = map_host_error(host.clone());
        assert_eq!(err.errno(), None);
        assert_eq!(err.host_error(), Some(&host));
        assert_eq!(err.to_string(), "Host error: weird");
    }

    #[test]
    fn test_call_error_conversion() {
        let err: PosixError = CallError::Host {
            operation: "wait".to_string(),
            source: HostError::new("no child").with_code("ECHILD"),
        }
        .into();
        assert_eq!(err.errno(), Some(Errno::ECHILD));

        let err: PosixError = CallError::Abandoned {
            operation: "wait".to_string(),
        }
        .into();
        assert!(matches!(err, PosixError::Call(CallError::Abandoned { .. })));
        assert_eq!(err.errno(), Some(Errno::EIO));
    }

    #[test]
    fn test_not_supported_is_enosys() {
        let err = WaitError {
            wpid: -1,
            error: PosixError::NotSupported { operation: "wait on any child" },
        };
        assert_eq!(err.errno(), Some(Errno::ENOSYS));
        assert_eq!(
            err.to_string(),
            "wait4 (pid -1): Operation not supported: wait on any child"
        );
    }
}
