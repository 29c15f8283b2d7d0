//! Startup configuration of the emulated bulb
//!
//! Everything in here is supplied once before the bulb starts serving. Apart
//! from the owner, which `SetOwner` rewrites, the core treats it as read-only.

use crate::color::Hsbk;
use crate::protocol::{Collection, Firmware, Label, SignalInfo, Version, label};

/// Default LIFX LAN port
pub const DEFAULT_PORT: u16 = 56700;

/// Power level of a bulb that is on
pub const POWER_ON: u16 = 0xFFFF;

/// Power level of a bulb that is off
pub const POWER_OFF: u16 = 0;

const DEFAULT_KELVIN: u16 = 3500;

// Color 1000
const VENDOR_LIFX: u32 = 1;
const PRODUCT_COLOR_1000: u32 = 22;

/// Configuration for the emulated bulb
#[derive(Debug, Clone)]
pub struct BulbConfig {
    /// Port announced in `StateService`
    pub port: u16,
    pub label: Label,
    /// Initial power level
    pub power: u16,
    /// Initial color
    pub color: Hsbk,
    pub host_info: SignalInfo,
    pub host_firmware: Firmware,
    /// Signal strength reported in `StateWifiInfo`
    pub wifi_signal: f32,
    pub wifi_firmware: Firmware,
    pub version: Version,
    pub location: Collection,
    pub group: Collection,
    pub owner: Collection,
    /// Wall clock time at startup, in nanoseconds since the Unix epoch
    pub boot_time_ns: u64,
}

impl Default for BulbConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            label: label("Bias LED"),
            power: POWER_OFF,
            color: Hsbk::new(0, 0, 0, DEFAULT_KELVIN),
            host_info: SignalInfo::default(),
            host_firmware: Firmware {
                build: 1_467_178_139_000_000_000,
                version: 1_968_197_120,
            },
            wifi_signal: 1e-5,
            wifi_firmware: Firmware {
                build: 1_456_093_684_000_000_000,
                version: 0,
            },
            version: Version {
                vendor: VENDOR_LIFX,
                product: PRODUCT_COLOR_1000,
                version: 0,
            },
            location: Collection {
                id: [
                    187, 252, 158, 222, 71, 45, 6, 41, 96, 22, 178, 149, 88, 166, 163, 213,
                ],
                label: label("Home"),
                updated_at: 1_471_914_564_177_000_000,
            },
            group: Collection {
                id: [
                    99, 143, 185, 25, 104, 165, 213, 222, 97, 64, 189, 203, 251, 16, 207, 11,
                ],
                label: label("Bedroom"),
                updated_at: 1_471_914_564_104_000_000,
            },
            owner: Collection {
                id: [
                    48, 174, 196, 196, 45, 149, 64, 239, 165, 207, 65, 146, 54, 50, 147, 44,
                ],
                label: Label::new(),
                updated_at: 1_471_914_564_298_000_000,
            },
            boot_time_ns: 0,
        }
    }
}
