//! Mapping from driver results to acquisition errors
//!
//! Drivers report through `nb::Result`. `WouldBlock` means the part has no
//! fresh conversion yet; anything else is a bus failure. Neither is retried
//! within a tick.

use core::fmt::Debug;

use overseer_core::AcquireError;

/// Translate a driver error for the part named `part`
pub(crate) fn acquire_error<E: Debug>(error: nb::Error<E>, part: &'static str) -> AcquireError {
    match error {
        nb::Error::WouldBlock => AcquireError::NotReady,
        nb::Error::Other(_cause) => {
            log_debug!("{} bus error: {:?}", part, _cause);
            AcquireError::Bus { reason: part }
        }
    }
}
