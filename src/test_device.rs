/* Synthetic Aura enumeration: an in-memory SDK backend plus a JSON spec
 * format for scripted test setups.
 *
 * Stands in for the vendor library so the classifier and push paths can be
 * exercised without Aura hardware. Only compiled for unit tests or when
 * the `dev-hooks` feature is enabled. */

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use anyhow::{bail, Result};

use crate::device::Color;
use crate::sdk::{AuraDevice, AuraEnumeration};

/* One-shot rendezvous that pins a push inside `apply()`.
 *
 * The holding thread waits on `entered` (signalling the test that the gate
 * is taken), then on `release`. Fires for the first `apply()` only; later
 * commits run through. */
pub struct ApplyHold {
    pub entered: Barrier,
    pub release: Barrier,
    armed: AtomicBool,
}

impl ApplyHold {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Barrier::new(2),
            release: Barrier::new(2),
            armed: AtomicBool::new(true),
        })
    }

    fn engage(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
    }
}

/* Observable hardware state of one synthetic device.
 *
 * Shared through an `Arc` so it stays inspectable after the enumeration
 * has been moved into the driver. */
#[derive(Default)]
pub struct SyntheticDeviceState {
    staged: Mutex<Vec<Color>>,
    committed: Mutex<Vec<Color>>,
    apply_count: AtomicUsize,
}

impl SyntheticDeviceState {
    fn with_lights(count: usize) -> Arc<Self> {
        Arc::new(Self {
            staged: Mutex::new(vec![Color::default(); count]),
            committed: Mutex::new(vec![Color::default(); count]),
            apply_count: AtomicUsize::new(0),
        })
    }

    /* Writes staged via `set_light`, not yet committed. */
    pub fn staged(&self) -> Vec<Color> {
        self.staged.lock().expect("state mutex poisoned").clone()
    }

    /* Hardware state as of the last `apply`. */
    pub fn committed(&self) -> Vec<Color> {
        self.committed.lock().expect("state mutex poisoned").clone()
    }

    pub fn apply_count(&self) -> usize {
        self.apply_count.load(Ordering::SeqCst)
    }
}

/* A scriptable `AuraDevice` with failure injection. */
pub struct SyntheticDevice {
    name: String,
    type_code: u32,
    light_names: Vec<String>,
    state: Arc<SyntheticDeviceState>,
    fail_light_at: Option<usize>,
    fail_apply: bool,
    hold: Option<Arc<ApplyHold>>,
}

impl SyntheticDevice {
    pub fn new(name: &str, type_code: u32, light_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            type_code,
            light_names: light_names.iter().map(|n| n.to_string()).collect(),
            state: SyntheticDeviceState::with_lights(light_names.len()),
            fail_light_at: None,
            fail_apply: false,
            hold: None,
        }
    }

    /* `light_name` fails at this index, simulating a record whose light
     * enumeration breaks partway. */
    pub fn with_light_failure_at(mut self, index: usize) -> Self {
        self.fail_light_at = Some(index);
        self
    }

    /* Every `apply` fails, simulating a commit fault in the SDK. */
    pub fn with_apply_failure(mut self) -> Self {
        self.fail_apply = true;
        self
    }

    pub fn with_apply_hold(mut self, hold: Arc<ApplyHold>) -> Self {
        self.hold = Some(hold);
        self
    }

    /* Handle for inspecting staged/committed colors from a test. */
    pub fn state(&self) -> Arc<SyntheticDeviceState> {
        Arc::clone(&self.state)
    }
}

impl AuraDevice for SyntheticDevice {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn type_code(&self) -> u32 {
        self.type_code
    }

    fn light_count(&self) -> Result<usize> {
        Ok(self.light_names.len())
    }

    fn light_name(&self, index: usize) -> Result<String> {
        if self.fail_light_at == Some(index) {
            bail!("synthetic light fault at index {index} on {}", self.name);
        }
        match self.light_names.get(index) {
            Some(name) => Ok(name.clone()),
            None => bail!("light index {index} out of range on {}", self.name),
        }
    }

    fn set_light(&mut self, index: usize, color: Color) -> Result<()> {
        let mut staged = self.state.staged.lock().expect("state mutex poisoned");
        match staged.get_mut(index) {
            Some(slot) => {
                *slot = color;
                Ok(())
            }
            None => bail!("light index {index} out of range on {}", self.name),
        }
    }

    fn apply(&mut self) -> Result<()> {
        if let Some(hold) = &self.hold {
            hold.engage();
        }
        if self.fail_apply {
            bail!("synthetic commit fault on {}", self.name);
        }

        let staged = self.state.staged.lock().expect("state mutex poisoned").clone();
        *self.state.committed.lock().expect("state mutex poisoned") = staged;
        self.state.apply_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/* An ordered in-memory device collection. */
pub struct SyntheticEnumeration {
    devices: Vec<SyntheticDevice>,
}

impl SyntheticEnumeration {
    pub fn new(devices: Vec<SyntheticDevice>) -> Self {
        Self { devices }
    }
}

impl AuraEnumeration for SyntheticEnumeration {
    fn len(&self) -> usize {
        self.devices.len()
    }

    fn device(&self, index: usize) -> &dyn AuraDevice {
        &self.devices[index]
    }

    fn device_mut(&mut self, index: usize) -> &mut dyn AuraDevice {
        &mut self.devices[index]
    }
}

/// JSON-based synthetic enumeration specification.
///
/// Lets scripted tests and the `aurad-smoke` harness describe a device
/// fleet without touching hardware:
///
/// ```json
/// { "devices": [
///     { "name": "AddressableHeader1", "type_code": 69632, "lights": ["L0", "L1"] },
///     { "name": "VgaCard", "type_code": 131072, "light_count": 4 }
/// ] }
/// ```
pub mod spec {
    use serde::Deserialize;

    use super::{SyntheticDevice, SyntheticEnumeration};

    #[derive(Debug, Default, Deserialize)]
    pub struct SyntheticEnumSpec {
        #[serde(default)]
        pub devices: Vec<SyntheticDeviceSpec>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct SyntheticDeviceSpec {
        #[serde(default = "default_name")]
        pub name: String,
        #[serde(default)]
        pub type_code: u32,
        /// Explicit light names, in slot order.
        #[serde(default)]
        pub lights: Vec<String>,
        /// Shorthand: generate this many lights named `"LED <i>"` when
        /// `lights` is omitted.
        #[serde(default)]
        pub light_count: Option<u32>,
    }

    fn default_name() -> String {
        "Synthetic Device".to_string()
    }

    fn default_device() -> SyntheticDeviceSpec {
        SyntheticDeviceSpec {
            name: default_name(),
            type_code: 0,
            lights: Vec::new(),
            light_count: Some(3),
        }
    }

    /// Parse a JSON string into a [`SyntheticEnumSpec`].
    ///
    /// An empty string or `"{}"` produces the minimum sane default: one
    /// unclassified device with three lights.
    pub fn parse_json(json: &str) -> Result<SyntheticEnumSpec, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(SyntheticEnumSpec::default());
        }
        serde_json::from_str(json)
    }

    /// Build a live [`SyntheticEnumeration`] from a parsed spec.
    pub fn build_enumeration(mut spec: SyntheticEnumSpec) -> SyntheticEnumeration {
        if spec.devices.is_empty() {
            spec.devices.push(default_device());
        }

        let devices = spec
            .devices
            .into_iter()
            .map(|d| {
                let lights: Vec<String> = if d.lights.is_empty() {
                    (0..d.light_count.unwrap_or(0))
                        .map(|i| format!("LED {i}"))
                        .collect()
                } else {
                    d.lights
                };
                let refs: Vec<&str> = lights.iter().map(String::as_str).collect();
                SyntheticDevice::new(&d.name, d.type_code, &refs)
            })
            .collect();

        SyntheticEnumeration::new(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_parse_device() {
        let parsed = spec::parse_json(
            r#"{ "devices": [ { "name": "VgaCard", "type_code": 131072, "lights": ["A", "B"] } ] }"#,
        )
        .unwrap();
        assert_eq!(parsed.devices.len(), 1);
        assert_eq!(parsed.devices[0].name, "VgaCard");
        assert_eq!(parsed.devices[0].type_code, 0x0002_0000);
        assert_eq!(parsed.devices[0].lights, vec!["A", "B"]);
    }

    #[test]
    fn test_spec_empty_input_is_default() {
        let parsed = spec::parse_json("").unwrap();
        assert!(parsed.devices.is_empty());

        let enumeration = spec::build_enumeration(parsed);
        assert_eq!(enumeration.len(), 1);
        assert_eq!(enumeration.device(0).light_count().unwrap(), 3);
    }

    #[test]
    fn test_spec_light_count_shorthand() {
        let parsed =
            spec::parse_json(r#"{ "devices": [ { "name": "Strip", "light_count": 5 } ] }"#)
                .unwrap();
        let enumeration = spec::build_enumeration(parsed);
        assert_eq!(enumeration.device(0).light_count().unwrap(), 5);
        assert_eq!(enumeration.device(0).light_name(4).unwrap(), "LED 4");
    }

    #[test]
    fn test_spec_invalid_json_is_error() {
        assert!(spec::parse_json("{ not json").is_err());
    }

    #[test]
    fn test_position_by_name() {
        let enumeration = SyntheticEnumeration::new(vec![
            SyntheticDevice::new("A", 0, &[]),
            SyntheticDevice::new("B", 0, &[]),
        ]);
        assert_eq!(enumeration.position_by_name("B"), Some(1));
        assert_eq!(enumeration.position_by_name("C"), None);
    }

    #[test]
    fn test_apply_copies_staged_to_committed() {
        let mut device = SyntheticDevice::new("D", 0, &["L0", "L1"]);
        let state = device.state();

        device.set_light(1, Color::new(1, 2, 3)).unwrap();
        assert_eq!(state.committed()[1], Color::default());

        device.apply().unwrap();
        assert_eq!(state.committed()[1], Color::new(1, 2, 3));
        assert_eq!(state.apply_count(), 1);
    }

    #[test]
    fn test_set_light_out_of_range() {
        let mut device = SyntheticDevice::new("D", 0, &["L0"]);
        assert!(device.set_light(1, Color::default()).is_err());
    }
}
