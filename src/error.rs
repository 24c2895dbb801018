//! Unified error type for ble-sensor.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Nothing in the core is fatal: these errors are logged at the BLE
//! boundary and the affected value simply stays stale.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),

    /// A switch edge arrived while the edge queue was full and was dropped.
    SwitchQueueFull,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// GAP / GATT raw error code from the SoftDevice.
    Raw(u32),
    /// Service or characteristic registration failed.
    RegisterFailed,
    /// Advertising could not start or was aborted.
    AdvertiseFailed,
    /// Updating a characteristic value failed.
    SetValueFailed,
    /// Sending a notification failed.
    NotifyFailed,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
