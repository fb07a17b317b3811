use std::iter;

use windows::{
    Win32::{
        Foundation::HANDLE,
        System::{
            Power::{
                POWER_REQUEST_TYPE, PowerClearRequest, PowerCreateRequest,
                PowerRequestAwayModeRequired, PowerRequestDisplayRequired,
                PowerRequestExecutionRequired, PowerRequestSystemRequired, PowerSetRequest,
            },
            Threading::{POWER_REQUEST_CONTEXT_SIMPLE_STRING, REASON_CONTEXT, REASON_CONTEXT_0},
        },
    },
    core::{Owned, PWSTR},
};

use crate::{Error, OsErrorCode, PowerApi, PowerRequestGuard, RequestCategory};

// Ref: https://learn.microsoft.com/en-us/windows/win32/api/minwinbase/ns-minwinbase-reason_context
const POWER_REQUEST_CONTEXT_VERSION: u32 = 0;
const FACILITY_WIN32_PREFIX: u32 = 0x8007_0000;

/// Power requests backed by `kernel32` (`PowerCreateRequest` and friends).
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32PowerApi;

fn request_type(category: RequestCategory) -> POWER_REQUEST_TYPE {
    match category {
        RequestCategory::DisplayRequired => PowerRequestDisplayRequired,
        RequestCategory::SystemRequired => PowerRequestSystemRequired,
        RequestCategory::AwayModeRequired => PowerRequestAwayModeRequired,
        RequestCategory::ExecutionRequired => PowerRequestExecutionRequired,
    }
}

/// Recovers the Win32 error code wrapped into an HRESULT by `windows::core::Error::from_thread`.
fn os_code(err: &windows::core::Error) -> OsErrorCode {
    let hr = err.code().0 as u32;
    if hr & 0xFFFF_0000 == FACILITY_WIN32_PREFIX {
        hr & 0xFFFF
    } else {
        hr
    }
}

impl PowerApi for Win32PowerApi {
    type Handle = Owned<HANDLE>;

    fn create(&self, reason: &str) -> Result<Self::Handle, OsErrorCode> {
        let mut wide: Vec<u16> = reason.encode_utf16().chain(iter::once(0)).collect();
        let context = REASON_CONTEXT {
            Version: POWER_REQUEST_CONTEXT_VERSION,
            Flags: POWER_REQUEST_CONTEXT_SIMPLE_STRING,
            Reason: REASON_CONTEXT_0 {
                SimpleReasonString: PWSTR(wide.as_mut_ptr()),
            },
        };

        match unsafe { PowerCreateRequest(&context) } {
            Ok(handle) => Ok(unsafe { Owned::new(handle) }),
            Err(e) => Err(os_code(&e)),
        }
    }

    fn activate(
        &self,
        handle: &Self::Handle,
        category: RequestCategory,
    ) -> Result<(), OsErrorCode> {
        unsafe { PowerSetRequest(**handle, request_type(category)) }.map_err(|e| os_code(&e))
    }

    fn clear(&self, handle: &Self::Handle, category: RequestCategory) -> Result<(), OsErrorCode> {
        unsafe { PowerClearRequest(**handle, request_type(category)) }.map_err(|e| os_code(&e))
    }

    fn close(&self, handle: Self::Handle) {
        // `Owned` calls CloseHandle.
        drop(handle);
    }
}

/// Creates and activates a power request on this machine.
pub fn acquire(
    category: RequestCategory,
    reason: &str,
) -> Result<PowerRequestGuard<Win32PowerApi>, Error> {
    PowerRequestGuard::acquire_with(Win32PowerApi, category, reason)
}
