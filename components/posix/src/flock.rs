//! Advisory locking pass-through

use bitflags::bitflags;
use host_platform::HostValue;
use log::debug;

use crate::error::{map_host_error, Result};
use crate::process::ProcessControl;

bitflags! {
    /// `flock` operations
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LockOperation: i32 {
        const LOCK_SH = 0x1;
        const LOCK_EX = 0x2;
        const LOCK_UN = 0x8;
    }
}

impl ProcessControl {
    /// Apply or remove an advisory lock on `fd`
    ///
    /// Forwarded to the host's synchronous filesystem call as `(fd, how)`;
    /// the host decides what the lock means.
    pub fn flock(&self, fd: i32, how: LockOperation) -> Result<()> {
        debug!("flock({}, {:?})", fd, how);
        self.fs
            .fs_call(
                &self.config.flock_operation,
                vec![HostValue::from(fd), HostValue::from(how.bits())],
            )
            .map(|_| ())
            .map_err(map_host_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Errno;
    use host_mock::MockHost;
    use std::sync::Arc;

    #[test]
    fn test_lock_constants() {
        assert_eq!(LockOperation::LOCK_SH.bits(), 0x1);
        assert_eq!(LockOperation::LOCK_EX.bits(), 0x2);
        assert_eq!(LockOperation::LOCK_UN.bits(), 0x8);
    }

    #[test]
    fn test_flock_call_shape() {
        let host = Arc::new(MockHost::new());
        let control = ProcessControl::new(host.clone(), host.clone());

        control.flock(3, LockOperation::LOCK_EX).expect("lock");
        control.flock(3, LockOperation::LOCK_UN).expect("unlock");

        let calls = host.fs_calls();
        assert_eq!(calls[0], ("flock".to_string(), vec![HostValue::from(3), HostValue::from(2)]));
        assert_eq!(calls[1].1[1], HostValue::from(8));
    }

    #[test]
    fn test_flock_error_is_mapped() {
        let host = Arc::new(MockHost::new());
        let control = ProcessControl::new(host.clone(), host.clone());

        let err = control.flock(-1, LockOperation::LOCK_SH).expect_err("bad fd");
        assert_eq!(err.errno(), Some(Errno::EBADF));
    }
}
