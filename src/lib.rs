mod os_impl;
mod request;

#[cfg(target_os = "windows")]
pub use os_impl::*;
pub use request::{PowerApi, PowerRequestGuard};

/// Raw error code reported by the operating system, e.g. a Win32 `GetLastError` value.
pub type OsErrorCode = u32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid power request reason: {reason}")]
    InvalidArgument { reason: &'static str },
    #[error("failed to create power request (os error {code})")]
    AcquisitionFailed { code: OsErrorCode },
    #[error("failed to activate power request (os error {code})")]
    ActivationFailed { code: OsErrorCode },
    #[error("failed to clear power request (os error {code})")]
    ReleaseFailed { code: OsErrorCode },
    #[error("power request was already released")]
    DoubleRelease,
}

impl Error {
    /// The OS error code carried by this error, if it came from an OS call.
    pub fn os_code(&self) -> Option<OsErrorCode> {
        match self {
            Error::AcquisitionFailed { code }
            | Error::ActivationFailed { code }
            | Error::ReleaseFailed { code } => Some(*code),
            Error::InvalidArgument { .. } | Error::DoubleRelease => None,
        }
    }
}

/// The power-saving behavior a request suppresses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestCategory {
    /// Prevents the display from turning off automatically.
    /// If the display is already off, it is turned back on.
    DisplayRequired,
    /// Prevents the system from entering sleep after a period of user inactivity.
    ///
    /// Not honored on systems capable of modern (connected) standby, use
    /// [`RequestCategory::ExecutionRequired`] there.
    SystemRequired,
    /// The system enters away mode instead of sleep when the user asks it to sleep.
    /// It keeps running but turns off audio and video to look asleep.
    AwayModeRequired,
    /// The calling process keeps running instead of being suspended or terminated
    /// by process lifetime management.
    ///
    /// On systems without modern standby this is equivalent to
    /// [`RequestCategory::SystemRequired`].
    #[default]
    ExecutionRequired,
}

impl RequestCategory {
    pub const ALL: [RequestCategory; 4] = [
        RequestCategory::DisplayRequired,
        RequestCategory::SystemRequired,
        RequestCategory::AwayModeRequired,
        RequestCategory::ExecutionRequired,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_code() {
        assert_eq!(Error::AcquisitionFailed { code: 5 }.os_code(), Some(5));
        assert_eq!(Error::ActivationFailed { code: 87 }.os_code(), Some(87));
        assert_eq!(Error::ReleaseFailed { code: 6 }.os_code(), Some(6));
        assert_eq!(Error::DoubleRelease.os_code(), None);
    }

    #[test]
    fn test_error_message_keeps_code() {
        let msg = Error::ActivationFailed { code: 1168 }.to_string();
        assert!(msg.contains("1168"), "{msg}");
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_acquire_and_release_on_host() {
        let mut guard = acquire(RequestCategory::ExecutionRequired, "keep-awake test").unwrap();
        assert!(guard.is_active());
        guard.release().unwrap();
        assert_eq!(guard.release(), Err(Error::DoubleRelease));
    }
}
