use log::{debug, error, warn};

use crate::{Error, OsErrorCode, RequestCategory};

/// The operating system calls behind a power request.
///
/// A handle returned by [`PowerApi::create`] is handed back to [`PowerApi::close`]
/// exactly once.
pub trait PowerApi {
    type Handle;

    /// Allocates a request object described by a simple reason string.
    fn create(&self, reason: &str) -> Result<Self::Handle, OsErrorCode>;

    fn activate(
        &self,
        handle: &Self::Handle,
        category: RequestCategory,
    ) -> Result<(), OsErrorCode>;

    fn clear(&self, handle: &Self::Handle, category: RequestCategory) -> Result<(), OsErrorCode>;

    /// Disposes of the request object.
    fn close(&self, handle: Self::Handle);
}

impl<T: PowerApi + ?Sized> PowerApi for &T {
    type Handle = T::Handle;

    fn create(&self, reason: &str) -> Result<Self::Handle, OsErrorCode> {
        (**self).create(reason)
    }

    fn activate(
        &self,
        handle: &Self::Handle,
        category: RequestCategory,
    ) -> Result<(), OsErrorCode> {
        (**self).activate(handle, category)
    }

    fn clear(&self, handle: &Self::Handle, category: RequestCategory) -> Result<(), OsErrorCode> {
        (**self).clear(handle, category)
    }

    fn close(&self, handle: Self::Handle) {
        (**self).close(handle)
    }
}

enum State<H> {
    Active(H),
    Released,
    /// Clearing failed. The handle is gone but the OS may still honor the request.
    Indeterminate,
}

/// Owns one active power request and withdraws it when released or dropped.
pub struct PowerRequestGuard<A: PowerApi> {
    api: A,
    category: RequestCategory,
    state: State<A::Handle>,
}

fn validate_reason(reason: &str) -> Result<(), Error> {
    if reason.trim().is_empty() {
        return Err(Error::InvalidArgument {
            reason: "reason must not be empty",
        });
    }
    if reason.contains('\0') {
        return Err(Error::InvalidArgument {
            reason: "reason must not contain NUL characters",
        });
    }
    Ok(())
}

impl<A: PowerApi> PowerRequestGuard<A> {
    /// Creates a power request through `api` and activates it for `category`.
    ///
    /// If activation fails the allocated request object is closed before the
    /// error is returned.
    pub fn acquire_with(api: A, category: RequestCategory, reason: &str) -> Result<Self, Error> {
        validate_reason(reason)?;

        let handle = api.create(reason).map_err(|code| {
            warn!("Unable to create power request: os error {code}");
            Error::AcquisitionFailed { code }
        })?;

        if let Err(code) = api.activate(&handle, category) {
            warn!("Unable to activate {category:?} power request: os error {code}");
            api.close(handle);
            return Err(Error::ActivationFailed { code });
        }

        debug!("{category:?} power request active: {reason}");
        Ok(Self {
            api,
            category,
            state: State::Active(handle),
        })
    }

    pub fn category(&self) -> RequestCategory {
        self.category
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    /// Clears the request and closes its handle.
    ///
    /// Only the first call reaches the OS. Any later call, including one after a
    /// failed clear, returns [`Error::DoubleRelease`].
    pub fn release(&mut self) -> Result<(), Error> {
        let handle = match std::mem::replace(&mut self.state, State::Indeterminate) {
            State::Active(handle) => handle,
            state => {
                self.state = state;
                error!("{:?} power request released twice", self.category);
                return Err(Error::DoubleRelease);
            }
        };

        let cleared = self.api.clear(&handle, self.category);
        self.api.close(handle);
        match cleared {
            Ok(()) => {
                self.state = State::Released;
                debug!("{:?} power request released", self.category);
                Ok(())
            }
            Err(code) => {
                warn!(
                    "Unable to clear {:?} power request: os error {code}",
                    self.category
                );
                Err(Error::ReleaseFailed { code })
            }
        }
    }
}

impl<A: PowerApi> Drop for PowerRequestGuard<A> {
    fn drop(&mut self) {
        if self.is_active() {
            if let Err(e) = self.release() {
                warn!("Power request was not released cleanly: {e}");
            }
        }
    }
}

impl<A: PowerApi> std::fmt::Debug for PowerRequestGuard<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            State::Active(_) => "Active",
            State::Released => "Released",
            State::Indeterminate => "Indeterminate",
        };
        f.debug_struct("PowerRequestGuard")
            .field("category", &self.category)
            .field("state", &state)
            .finish()
    }
}
