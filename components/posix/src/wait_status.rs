//! Wait-status codec
//!
//! Only the "exited normally" shape is representable: the low seven bits
//! flag the exit, the exit code sits above bit 8. Signaled, stopped and
//! continued states never occur.

use bitflags::bitflags;
use static_assertions::const_assert;

/// Shift applied to the exit code
pub const EXIT_CODE_SHIFT: u32 = 8;

/// Low bits set when a process has exited
pub const EXITED_MASK: i32 = 0x7F;

const_assert!(EXITED_MASK < (1 << EXIT_CODE_SHIFT));

/// Smallest exit code a status word can carry
pub const MIN_EXIT_CODE: i32 = i32::MIN >> EXIT_CODE_SHIFT;

/// Largest exit code a status word can carry
pub const MAX_EXIT_CODE: i32 = i32::MAX >> EXIT_CODE_SHIFT;

/// Packed wait status
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct WaitStatus(i32);

impl WaitStatus {
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Status of a process that exited with `code`
    ///
    /// Codes round-trip exactly within 24 bits, negative ones included.
    /// Wider codes lose their high bits; use [`WaitStatus::try_exited_with`]
    /// when the code is not known to fit.
    pub const fn exited_with(code: i32) -> Self {
        Self((code << EXIT_CODE_SHIFT) | EXITED_MASK)
    }

    /// Status of a process that exited with `code`, if the code fits
    pub fn try_exited_with(code: i64) -> Option<Self> {
        let code = i32::try_from(code).ok()?;
        (MIN_EXIT_CODE..=MAX_EXIT_CODE)
            .contains(&code)
            .then(|| Self::exited_with(code))
    }

    pub const fn exited(self) -> bool {
        self.0 & EXITED_MASK != 0
    }

    pub const fn exit_status(self) -> i32 {
        self.0 >> EXIT_CODE_SHIFT
    }
}

bitflags! {
    /// `wait4` options. Accepted for signature compatibility and ignored.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WaitOptions: i32 {
        const WNOHANG = 0x1;
        const WUNTRACED = 0x2;
        const WCONTINUED = 0x8;
    }
}

/// Resource usage. Never collected; `wait4` leaves it untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rusage {
    pub utime_usec: i64,
    pub stime_usec: i64,
    pub maxrss: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_round_trip() {
        for code in [0, 1, 7, 127, 128, 255, 256, 4096, -1, -255] {
            let status = WaitStatus::exited_with(code);
            assert!(status.exited(), "code {code}");
            assert_eq!(status.exit_status(), code, "code {code}");
        }
    }

    #[test]
    fn test_checked_pack_at_24_bit_boundary() {
        assert_eq!(MAX_EXIT_CODE, (1 << 23) - 1);
        assert_eq!(MIN_EXIT_CODE, -(1 << 23));

        for code in [MAX_EXIT_CODE, MIN_EXIT_CODE, 0, -1] {
            let status = WaitStatus::try_exited_with(i64::from(code)).expect("code fits");
            assert_eq!(status.exit_status(), code);
        }

        for code in [1 << 23, 1 << 24, -(1 << 23) - 1, i64::from(i32::MAX), i64::MAX] {
            assert_eq!(WaitStatus::try_exited_with(code), None, "code {code}");
        }
    }

    #[test]
    fn test_packed_layout() {
        assert_eq!(WaitStatus::exited_with(7).raw(), (7 << 8) | 0x7F);
        assert_eq!(WaitStatus::exited_with(0).raw(), 0x7F);
    }

    #[test]
    fn test_default_has_not_exited() {
        let status = WaitStatus::default();
        assert!(!status.exited());
        assert_eq!(status.exit_status(), 0);
    }

    #[test]
    fn test_exited_reads_mask_only() {
        assert!(WaitStatus::from_raw(0x01).exited());
        assert!(!WaitStatus::from_raw(0x80).exited());
        assert!(!WaitStatus::from_raw(0x0500).exited());
        assert_eq!(WaitStatus::from_raw(0x0500).exit_status(), 5);
    }
}
