/* Canonical device model: what classification produces and push consumes. */

/* Color as an RGB byte triplet. */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/* Canonical device categories. Every vendor type code resolves to one of
 * these; unknown codes fall back to `Other`. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCategory {
    MotherBoard,
    LedStrip,
    Gpu,
    Headset,
    Memory,
    Keyboard,
    Bulb,
    Other,
}

/* One addressable light within a canonical device.
 *
 * A pure projection of the vendor light slot at the same index: it carries
 * the position and naming metadata, never color state. */
#[derive(Debug, Clone)]
pub struct LedUnit {
    /* Zero-based position in the originating light array. */
    pub index: usize,
    pub name: String,
    /* The vendor's own name for this light slot. */
    pub vendor_light_name: String,
}

/* Normalized description of one vendor lighting device.
 *
 * Rebuilt fresh on every discovery pass; never cached across passes.
 * `leds.len()` always equals the originating record's light count, and
 * `leds[i].index == i` — the push synchronizer relies on this alignment. */
#[derive(Debug, Clone)]
pub struct CanonicalDevice {
    pub category: DeviceCategory,
    pub name: String,
    /* Product-image tag the outer shim resolves to artwork; `None` when the
     * vendor code has no associated image. */
    pub image_key: Option<String>,
    /* Lookup key for the originating vendor record (its enumeration name),
     * resolved against the live enumeration at push time. Never a raw SDK
     * handle, so a refreshed enumeration cannot leave us dangling. */
    pub vendor_key: String,
    pub leds: Vec<LedUnit>,
}
