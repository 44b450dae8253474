/* Synthetic smoke harness: runs the full discover/push path against a
 * JSON-described device fleet (see `test_device::spec`). Built only with
 * the `dev-hooks` feature; it never touches real hardware. */

use anyhow::{Context, Result};
use tracing::info;

use aurad::device::Color;
use aurad::driver::{AuraDriver, PushOutcome};
use aurad::test_device::spec;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    /* Optional argument: path to a JSON enumeration spec. No argument
     * runs the built-in minimum device. */
    let json = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Reading device spec {path}"))?,
        None => String::new(),
    };

    let parsed = spec::parse_json(&json).context("Parsing device spec")?;
    let driver = AuraDriver::new(Box::new(spec::build_enumeration(parsed)));

    let devices = driver.discover();
    for device in &devices {
        info!(
            "{} [{:?}] {} LEDs (vendor key {:?})",
            device.name,
            device.category,
            device.leds.len(),
            device.vendor_key
        );

        let colors: Vec<Color> = device
            .leds
            .iter()
            .map(|led| match led.index % 3 {
                0 => Color::new(255, 0, 0),
                1 => Color::new(0, 255, 0),
                _ => Color::new(0, 0, 255),
            })
            .collect();

        match driver.push(device, &colors)? {
            PushOutcome::Applied => info!("{}: pushed {} colors", device.name, colors.len()),
            PushOutcome::Dropped => info!("{}: push dropped, gate was busy", device.name),
        }
    }

    Ok(())
}
