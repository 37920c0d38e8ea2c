//! `wait4`

use host_platform::{number_field, HostValue};
use log::{debug, warn};

use crate::error::{PosixError, WaitError};
use crate::process::ProcessControl;
use crate::wait_status::{Rusage, WaitOptions, WaitStatus};
use crate::Pid;

impl ProcessControl {
    /// Wait for the process `pid` to exit
    ///
    /// Blocks until the host completes the wait. On success returns the pid
    /// the host reported (the requested one unless the host says otherwise)
    /// and, if the host reported an exit code, stores it in `wstatus`.
    ///
    /// `options` and `rusage` are accepted and ignored. Waiting on any child
    /// (`pid <= 0`) is not supported and fails with `wpid == -1` without
    /// contacting the host.
    ///
    /// The host reaps a child once. Call this at most once per terminated
    /// child; a second call yields whatever error the host reports for an
    /// already-reaped pid (typically `ECHILD`).
    ///
    /// # Errors
    /// On failure `wstatus` is left untouched and the returned [`WaitError`]
    /// carries the pid `wait4` would report.
    pub fn wait4(
        &self,
        pid: Pid,
        wstatus: Option<&mut WaitStatus>,
        options: WaitOptions,
        rusage: Option<&mut Rusage>,
    ) -> Result<Pid, WaitError> {
        if pid <= 0 {
            return Err(WaitError {
                wpid: -1,
                error: PosixError::NotSupported {
                    operation: "waiting on an unspecified child",
                },
            });
        }

        if !options.is_empty() {
            debug!("wait4({}): ignoring options {:?}", pid, options);
        }
        if rusage.is_some() {
            debug!("wait4({}): resource usage is not collected", pid);
        }

        let (proc_state, error) =
            self.child_process_call(&self.config.wait_operation, vec![HostValue::from(pid)]);

        let reported = number_field(&proc_state, "pid").and_then(|reported| {
            let converted = Pid::try_from(reported).ok();
            if converted.is_none() {
                warn!("wait4({}): ignoring out-of-range pid {}", pid, reported);
            }
            converted
        });
        let wpid = reported.unwrap_or(pid);

        if let Some(error) = error {
            debug!("wait4({}) failed: {}", pid, error);
            return Err(WaitError { wpid, error });
        }

        if wpid != pid {
            if self.config.strict_wait_pid {
                return Err(WaitError {
                    wpid,
                    error: PosixError::PidMismatch {
                        requested: pid,
                        reported: wpid,
                    },
                });
            }
            warn!("wait4({}): host reported pid {}", pid, wpid);
        }

        if let Some(code) = number_field(&proc_state, "exitCode") {
            let packed = WaitStatus::try_exited_with(code).ok_or_else(|| WaitError {
                wpid,
                error: PosixError::InvalidReply {
                    operation: "wait",
                    reason: format!("exit code {code} does not fit a wait status"),
                },
            })?;
            if let Some(wstatus) = wstatus {
                *wstatus = packed;
            }
            debug!("wait4({}): exited with {}", pid, code);
        } else {
            debug!("wait4({}): no exit code reported", pid);
        }

        Ok(wpid)
    }
}
