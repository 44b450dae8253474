/* aurad-rs — core of the Asus Aura Sync lighting driver.
 *
 * Normalizes vendor-enumerated RGB devices into a canonical device/LED
 * model (`classify`) and pushes batched color writes back to hardware
 * under a single-writer gate (`driver`). SDK lifecycle, product-image
 * loading, and the outer plugin surface live in the host shim, behind the
 * traits in `sdk`. */

pub mod classify;
pub mod device;
pub mod driver;
pub mod sdk;

#[cfg(any(test, feature = "dev-hooks"))]
pub mod test_device;

pub use device::{CanonicalDevice, Color, DeviceCategory, LedUnit};
pub use driver::{AuraDriver, DriverError, PushOutcome, PushPolicy};
