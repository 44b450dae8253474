/* Device classification: vendor type code → canonical category, display
 * name, and product-image tag.
 *
 * The per-type dispatch is a static lookup table so the mapping stays
 * data-driven and exhaustively testable. */

use anyhow::{Context, Result};
use tracing::debug;

use crate::device::{CanonicalDevice, DeviceCategory, LedUnit};
use crate::sdk::AuraDevice;

/* Cosmetic display-name rewrite applied for specific vendor codes. Must
 * never affect LED alignment. */
#[derive(Debug, Clone, Copy)]
enum NameTransform {
    Keep,
    Force(&'static str),
    Replace {
        from: &'static str,
        to: &'static str,
    },
}

impl NameTransform {
    fn apply(self, name: &str) -> String {
        match self {
            NameTransform::Keep => name.to_string(),
            NameTransform::Force(fixed) => fixed.to_string(),
            NameTransform::Replace { from, to } => name.replace(from, to),
        }
    }
}

struct TypeCodeEntry {
    code: u32,
    category: DeviceCategory,
    rename: NameTransform,
    image: Option<&'static str>,
}

/* Vendor type-code table. Codes absent from this table resolve to
 * `Other` with the name kept as-is — the default branch, not an error. */
static AURA_TYPE_CODES: &[TypeCodeEntry] = &[
    TypeCodeEntry { code: 0x0001_0000, category: DeviceCategory::MotherBoard, rename: NameTransform::Force("Motherboard"), image: Some("Motherboard") },
    TypeCodeEntry { code: 0x0001_1000, category: DeviceCategory::LedStrip, rename: NameTransform::Replace { from: "AddressableHeader", to: "ARGB Header" }, image: Some("AddressableHeader") },
    TypeCodeEntry { code: 0x0002_0000, category: DeviceCategory::Gpu, rename: NameTransform::Replace { from: "Vga", to: "GPU" }, image: Some("GPU") },
    TypeCodeEntry { code: 0x0004_0000, category: DeviceCategory::Headset, rename: NameTransform::Keep, image: Some("Headset") },
    TypeCodeEntry { code: 0x0007_0000, category: DeviceCategory::Memory, rename: NameTransform::Keep, image: Some("DRAM") },
    TypeCodeEntry { code: 0x0008_0000, category: DeviceCategory::Keyboard, rename: NameTransform::Keep, image: Some("Keyboard") },
    TypeCodeEntry { code: 0x0008_1000, category: DeviceCategory::Keyboard, rename: NameTransform::Keep, image: Some("LaptopKeyboard") }, /* notebook keyboard */
    TypeCodeEntry { code: 0x0008_1001, category: DeviceCategory::Keyboard, rename: NameTransform::Keep, image: Some("LaptopKeyboard") }, /* notebook keyboard, 4-zone */
    TypeCodeEntry { code: 0x0009_0000, category: DeviceCategory::Keyboard, rename: NameTransform::Keep, image: Some("Mouse") },
    TypeCodeEntry { code: 0x0003_0000, category: DeviceCategory::Other, rename: NameTransform::Keep, image: Some("Monitor") },
    TypeCodeEntry { code: 0x000B_0000, category: DeviceCategory::Other, rename: NameTransform::Keep, image: Some("Chassis") },
    TypeCodeEntry { code: 0x0005_0000, category: DeviceCategory::Other, rename: NameTransform::Keep, image: Some("Microphone") },
    TypeCodeEntry { code: 0x0006_0000, category: DeviceCategory::Other, rename: NameTransform::Keep, image: Some("HDD") },
    TypeCodeEntry { code: 0x000C_0000, category: DeviceCategory::Bulb, rename: NameTransform::Keep, image: Some("Projector") },
    TypeCodeEntry { code: 0x0000_0000, category: DeviceCategory::Other, rename: NameTransform::Keep, image: None }, /* "all devices" pseudo-entry */
    TypeCodeEntry { code: 0x0001_2000, category: DeviceCategory::Other, rename: NameTransform::Keep, image: None }, /* all-in-one PC */
    TypeCodeEntry { code: 0x0006_1000, category: DeviceCategory::Other, rename: NameTransform::Keep, image: None }, /* external BD drive */
];

fn lookup_type_code(code: u32) -> Option<&'static TypeCodeEntry> {
    AURA_TYPE_CODES.iter().find(|entry| entry.code == code)
}

/* Classify one vendor device record into a canonical device.
 *
 * Light slots are projected into `LedUnit`s in original order with
 * zero-based sequential indices; an empty light list is valid and yields
 * zero LEDs. Returns `Err` if the vendor light data cannot be read — the
 * caller decides whether that aborts anything (`discover` does not). */
pub fn classify(device: &dyn AuraDevice) -> Result<CanonicalDevice> {
    let vendor_name = device.name();
    let type_code = device.type_code();

    let count = device
        .light_count()
        .with_context(|| format!("Counting lights on {vendor_name}"))?;

    let mut leds = Vec::with_capacity(count);
    for index in 0..count {
        let light_name = device
            .light_name(index)
            .with_context(|| format!("Reading light {index} on {vendor_name}"))?;
        leds.push(LedUnit {
            index,
            name: light_name.clone(),
            vendor_light_name: light_name,
        });
    }

    let (category, name, image_key) = match lookup_type_code(type_code) {
        Some(entry) => (
            entry.category,
            entry.rename.apply(&vendor_name),
            entry.image.map(str::to_string),
        ),
        None => (DeviceCategory::Other, vendor_name.clone(), None),
    };

    debug!(
        "Classified {} (type 0x{:08x}) as {:?} with {} LEDs",
        vendor_name,
        type_code,
        category,
        leds.len()
    );

    Ok(CanonicalDevice {
        category,
        name,
        image_key,
        vendor_key: vendor_name,
        leds,
    })
}
