//! Authoritative bulb state
//!
//! Holds what the last commands asked for (target power, color and label)
//! next to the color the engine is currently rendering. Every access takes a
//! critical section, so readers never see a half-written value.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;

use crate::color::Hsbk;
use crate::config::BulbConfig;
use crate::protocol::{Collection, Firmware, Label, SignalInfo, Version};

/// Target state as set by the last commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulbState {
    /// 0 is off, `0xFFFF` is on
    pub power: u16,
    pub color: Hsbk,
    pub label: Label,
}

/// Read-only facts about the bulb
#[derive(Debug, Clone)]
pub struct BulbMetadata {
    pub port: u16,
    pub host_info: SignalInfo,
    pub host_firmware: Firmware,
    pub wifi_signal: f32,
    pub wifi_firmware: Firmware,
    pub version: Version,
    pub location: Collection,
    pub group: Collection,
    pub boot_time_ns: u64,
}

#[derive(Debug)]
struct Inner {
    state: BulbState,
    owner: Collection,
    rendered: Hsbk,
    wifi_tx: u32,
    wifi_rx: u32,
}

/// Thread-safe bulb state store
pub struct BulbStateStore {
    inner: Mutex<RefCell<Inner>>,
    metadata: BulbMetadata,
    started_at: Instant,
}

impl BulbStateStore {
    /// Create a store from the startup configuration
    ///
    /// `started_at` is the monotonic time the bulb came up, used for uptime.
    pub fn new(config: &BulbConfig, started_at: Instant) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                state: BulbState {
                    power: config.power,
                    color: config.color,
                    label: config.label.clone(),
                },
                owner: config.owner.clone(),
                rendered: config.color,
                wifi_tx: 0,
                wifi_rx: 0,
            })),
            metadata: BulbMetadata {
                port: config.port,
                host_info: config.host_info,
                host_firmware: config.host_firmware,
                wifi_signal: config.wifi_signal,
                wifi_firmware: config.wifi_firmware,
                version: config.version,
                location: config.location.clone(),
                group: config.group.clone(),
                boot_time_ns: config.boot_time_ns,
            },
            started_at,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    /// Snapshot of the target state
    pub fn get(&self) -> BulbState {
        self.with(|inner| inner.state.clone())
    }

    pub fn power(&self) -> u16 {
        self.with(|inner| inner.state.power)
    }

    /// Set the target power, returning the previous level
    pub fn set_power(&self, level: u16) -> u16 {
        self.with(|inner| core::mem::replace(&mut inner.state.power, level))
    }

    /// Set the target color, returning the state as it was before
    pub fn set_color(&self, color: Hsbk) -> BulbState {
        self.with(|inner| {
            let previous = inner.state.clone();
            inner.state.color = color;
            previous
        })
    }

    pub fn label(&self) -> Label {
        self.with(|inner| inner.state.label.clone())
    }

    pub fn set_label(&self, label: Label) {
        self.with(|inner| inner.state.label = label);
    }

    pub fn owner(&self) -> Collection {
        self.with(|inner| inner.owner.clone())
    }

    /// Replace the owner, returning the new value
    pub fn set_owner(&self, id: [u8; 16], label: Label, updated_at: u64) -> Collection {
        self.with(|inner| {
            inner.owner = Collection {
                id,
                label,
                updated_at,
            };
            inner.owner.clone()
        })
    }

    /// Color the engine is currently rendering
    pub fn rendered(&self) -> Hsbk {
        self.with(|inner| inner.rendered)
    }

    pub(crate) fn set_rendered(&self, color: Hsbk) {
        self.with(|inner| inner.rendered = color);
    }

    /// Account bytes received and sent by the transport
    pub fn record_traffic(&self, rx: usize, tx: usize) {
        self.with(|inner| {
            inner.wifi_rx = inner.wifi_rx.wrapping_add(saturate_u32(rx));
            inner.wifi_tx = inner.wifi_tx.wrapping_add(saturate_u32(tx));
        });
    }

    /// Wifi statistics with live traffic counters
    pub fn wifi_info(&self) -> SignalInfo {
        let (tx, rx) = self.with(|inner| (inner.wifi_tx, inner.wifi_rx));
        SignalInfo {
            signal: self.metadata.wifi_signal,
            tx,
            rx,
            mcu_temperature: 0,
        }
    }

    pub const fn metadata(&self) -> &BulbMetadata {
        &self.metadata
    }

    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Nanoseconds since the bulb started
    pub fn uptime_ns(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.started_at)
            .as_micros()
            .saturating_mul(1000)
    }

    /// Wall clock time in nanoseconds since the Unix epoch
    pub fn wall_clock_ns(&self, now: Instant) -> u64 {
        self.metadata
            .boot_time_ns
            .saturating_add(self.uptime_ns(now))
    }
}

fn saturate_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
