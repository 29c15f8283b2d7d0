//! Transition engine
//!
//! Owns the active transition and turns it into a stream of output colors.
//! Requests come in through the action queue; each one replaces whatever
//! transition is running, starting from the color rendered at that moment.

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::action_queue::{ActionReceiver, TransitionRequest};
use crate::color::{Hsbk, hsbk_to_rgb};
use crate::config::POWER_ON;
use crate::state::BulbStateStore;
use crate::transition::ActiveTransition;

/// Transition engine - renders the bulb color over time
pub struct TransitionEngine<'a, O: OutputDriver, const QUEUE_SIZE: usize> {
    // External dependencies
    output: O,
    actions: ActionReceiver<'a, QUEUE_SIZE>,
    store: &'a BulbStateStore,

    // Internal state
    current: Hsbk,
    active: Option<ActiveTransition>,
    /// Brightness to restore on the next power on
    last_brightness: u16,
    /// Initial state has not been written to the output yet
    needs_refresh: bool,
}

impl<'a, O: OutputDriver, const QUEUE_SIZE: usize> TransitionEngine<'a, O, QUEUE_SIZE> {
    /// Create a new engine rendering the store's current color
    ///
    /// A bulb that starts powered off is rendered dark, with its configured
    /// brightness kept for the next power on.
    pub fn new(output: O, actions: ActionReceiver<'a, QUEUE_SIZE>, store: &'a BulbStateStore) -> Self {
        let mut current = store.rendered();
        let mut last_brightness = 0;
        if store.power() != POWER_ON {
            last_brightness = current.brightness;
            current.brightness = 0;
        }
        store.set_rendered(current);

        Self {
            output,
            actions,
            store,
            current,
            active: None,
            last_brightness,
            needs_refresh: true,
        }
    }

    /// Color as of the last tick or request
    pub const fn current(&self) -> Hsbk {
        self.current
    }

    pub const fn active(&self) -> Option<&ActiveTransition> {
        self.active.as_ref()
    }

    /// Check if a transition is in progress
    pub const fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the bulb is lit or fading towards a lit color
    pub fn is_powered(&self) -> bool {
        self.heading_brightness() != 0
    }

    /// Brightness restored on the next power on
    pub const fn last_brightness(&self) -> u16 {
        self.last_brightness
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    /// Apply all queued requests in order (non-blocking)
    pub fn process_pending(&mut self, now: Instant) {
        while let Some(request) = self.actions.try_receive() {
            self.apply(request, now);
        }
    }

    /// Replace the active transition with `request`, starting at `now`
    pub fn apply(&mut self, request: TransitionRequest, now: Instant) {
        // Abandon the running transition where it is
        if let Some(active) = &self.active {
            self.current = active.sample(now);
        }

        match request {
            TransitionRequest::ColorChange { color, duration } => {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[TransitionEngine.apply] color {:?} -> {:?} over {}ms",
                    self.current,
                    color,
                    duration.as_millis()
                );
                self.active = Some(ActiveTransition::color(self.current, color, duration, now));
            }
            TransitionRequest::PowerChange { level, duration } => {
                let turning_on = level == POWER_ON;
                let heading = self.heading_brightness();
                if turning_on == (heading != 0) {
                    // Already lit (or already dark), keep whatever is running
                    return;
                }

                let brightness = if turning_on {
                    self.last_brightness
                } else {
                    self.last_brightness = heading;
                    0
                };

                #[cfg(feature = "esp32-log")]
                println!(
                    "[TransitionEngine.apply] power {} brightness {} -> {} over {}ms",
                    if turning_on { "on" } else { "off" },
                    self.current.brightness,
                    brightness,
                    duration.as_millis()
                );
                self.active = Some(ActiveTransition::brightness(
                    self.current,
                    brightness,
                    duration,
                    now,
                ));
            }
        }
    }

    /// Advance the active transition to `now` and write the result
    ///
    /// Does nothing while idle. Output errors are returned as is.
    pub fn tick(&mut self, now: Instant) -> Result<(), O::Error> {
        let Some(active) = self.active else {
            if self.needs_refresh {
                self.needs_refresh = false;
                return self.write();
            }
            return Ok(());
        };

        self.current = active.sample(now);
        if active.is_complete(now) {
            self.active = None;
        }
        self.needs_refresh = false;
        self.write()
    }

    /// Brightness the bulb is heading to: the transition target if one is
    /// running, the current value otherwise
    fn heading_brightness(&self) -> u16 {
        self.active
            .map_or(self.current.brightness, |active| active.target().brightness)
    }

    fn write(&mut self) -> Result<(), O::Error> {
        self.store.set_rendered(self.current);
        self.output.write(hsbk_to_rgb(self.current))
    }
}
