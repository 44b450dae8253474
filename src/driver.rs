/* The driver core: discovery over the vendor enumeration and batched
 * color pushes under a single-writer gate.
 *
 * All work happens on the calling thread. The only cross-call coordination
 * is the push gate, a non-reentrant try-lock: under the default policy a
 * contending push is dropped, not queued, so stale frames are discarded
 * instead of piling up behind hardware that accepts one batch at a time. */

use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classify;
use crate::device::{CanonicalDevice, Color};
use crate::sdk::AuraEnumeration;

/* What a push does when another push already holds the gate. */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PushPolicy {
    /* Drop-latest: the contending push returns immediately with zero
     * writes. This is the default. */
    #[default]
    DropWhenBusy,
    /* Wait for the gate, then apply. */
    Block,
}

/* Result of a push that did not fail. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /* All colors were written and the batch was committed. */
    Applied,
    /* The gate was busy under `DropWhenBusy`; hardware state is
     * unchanged. */
    Dropped,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("color count {actual} does not match LED count {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("device {name:?} is no longer present in the enumeration")]
    DeviceVanished { name: String },

    #[error("staging light writes failed")]
    Lights(#[source] anyhow::Error),

    #[error("hardware commit failed")]
    Commit(#[source] anyhow::Error),
}

/* A panic inside the critical section poisons the mutex; the flag itself
 * is still consistent, so later callers just take over the lock. */
fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The Aura driver core.
///
/// Owns the vendor enumeration handle and the push gate. `discover` and
/// `push` take `&self` so one driver instance can be shared across the
/// host's threads.
pub struct AuraDriver {
    enumeration: Mutex<Box<dyn AuraEnumeration>>,
    gate: Mutex<()>,
    policy: PushPolicy,
}

impl AuraDriver {
    pub fn new(enumeration: Box<dyn AuraEnumeration>) -> Self {
        Self::with_policy(enumeration, PushPolicy::default())
    }

    pub fn with_policy(enumeration: Box<dyn AuraEnumeration>, policy: PushPolicy) -> Self {
        Self {
            enumeration: Mutex::new(enumeration),
            gate: Mutex::new(()),
            policy,
        }
    }

    pub fn policy(&self) -> PushPolicy {
        self.policy
    }

    /* Classify every enumerated device into a fresh canonical snapshot.
     *
     * A device whose light data cannot be read is logged and skipped; one
     * malformed device never aborts the pass. */
    pub fn discover(&self) -> Vec<CanonicalDevice> {
        let enumeration = lock_or_recover(&self.enumeration);

        let mut devices = Vec::with_capacity(enumeration.len());
        for idx in 0..enumeration.len() {
            match classify::classify(enumeration.device(idx)) {
                Ok(device) => devices.push(device),
                Err(err) => {
                    warn!("Skipping device at index {idx}: {err:#}");
                }
            }
        }

        info!(
            "Discovery: {} of {} devices classified",
            devices.len(),
            enumeration.len()
        );
        devices
    }

    /* Push one batch of colors to a device.
     *
     * `colors[i]` is written into the vendor light slot at index `i`, then
     * the batch is committed with a single `apply`. The whole operation is
     * one critical section under the push gate; the gate is released on
     * every exit path, including errors. Commit failures propagate
     * unmodified and are not retried. */
    pub fn push(
        &self,
        device: &CanonicalDevice,
        colors: &[Color],
    ) -> Result<PushOutcome, DriverError> {
        let _permit = match self.policy {
            PushPolicy::DropWhenBusy => match self.gate.try_lock() {
                Ok(permit) => permit,
                Err(TryLockError::WouldBlock) => {
                    debug!("Push to {} dropped: another push is in flight", device.name);
                    return Ok(PushOutcome::Dropped);
                }
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            },
            PushPolicy::Block => lock_or_recover(&self.gate),
        };

        if colors.len() != device.leds.len() {
            return Err(DriverError::LengthMismatch {
                expected: device.leds.len(),
                actual: colors.len(),
            });
        }

        let mut enumeration = lock_or_recover(&self.enumeration);
        let idx = enumeration
            .position_by_name(&device.vendor_key)
            .ok_or_else(|| DriverError::DeviceVanished {
                name: device.vendor_key.clone(),
            })?;
        let record = enumeration.device_mut(idx);

        for (i, &color) in colors.iter().enumerate() {
            record.set_light(i, color).map_err(DriverError::Lights)?;
        }
        record.apply().map_err(DriverError::Commit)?;

        debug!("Pushed {} colors to {}", colors.len(), device.name);
        Ok(PushOutcome::Applied)
    }
}
