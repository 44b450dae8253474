/* Trait seam over the closed-source vendor lighting SDK.
 *
 * All hardware access is funneled through these traits so that the
 * classifier and the push synchronizer never touch SDK handles directly.
 * The COM-backed implementation lives in the host shim, which also owns
 * SDK initialization and teardown; the synthetic implementation lives in
 * `test_device`. */

use anyhow::Result;

use crate::device::Color;

/* One vendor-enumerated lighting device: a name, an opaque type code, and
 * an ordered array of mutable light slots with a single batch commit. */
pub trait AuraDevice: Send {
    /* Vendor device name. Stable for the lifetime of one enumeration and
     * used as the push-time lookup key. */
    fn name(&self) -> String;

    /* Opaque vendor type code (see the table in `classify`). */
    fn type_code(&self) -> u32;

    /* Number of light slots on this device. May be zero. */
    fn light_count(&self) -> Result<usize>;

    /* Vendor name of the light slot at `index`. */
    fn light_name(&self, index: usize) -> Result<String>;

    /* Stage an RGB write into the light slot at `index`. Staged values are
     * visible only to this process's handle until `apply`. */
    fn set_light(&mut self, index: usize, color: Color) -> Result<()>;

    /* Commit every staged write to hardware as one batch. The SDK applies
     * the batch atomically from an observer's perspective. */
    fn apply(&mut self) -> Result<()>;
}

/* The vendor enumeration handle: an ordered collection of devices.
 *
 * Callers must keep `index < len()`; the enumeration's own concurrency
 * guarantees are the SDK's responsibility. */
pub trait AuraEnumeration: Send {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn device(&self, index: usize) -> &dyn AuraDevice;

    fn device_mut(&mut self, index: usize) -> &mut dyn AuraDevice;

    /* Resolve a device name back to its current position. */
    fn position_by_name(&self, name: &str) -> Option<usize> {
        (0..self.len()).find(|&i| self.device(i).name() == name)
    }
}
