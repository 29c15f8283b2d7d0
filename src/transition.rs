use embassy_time::{Duration, Instant};

use crate::color::{Hsbk, lerp, shortest_hue_delta, wrap_hue};

/// Ramp of a single channel between two values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRamp {
    /// Value at the start of transition
    start: i32,
    /// Target value
    end: i32,
    /// Signed distance to travel, fixed when the ramp is created
    delta: i32,
}

impl ChannelRamp {
    /// Straight line from `start` to `end`
    pub fn linear(start: u16, end: u16) -> Self {
        let (start, end) = (i32::from(start), i32::from(end));
        Self {
            start,
            end,
            delta: end - start,
        }
    }

    /// Shortest arc around the hue circle
    pub fn circular(start: u16, end: u16) -> Self {
        Self {
            start: i32::from(start),
            end: i32::from(end),
            delta: shortest_hue_delta(start, end),
        }
    }

    /// Ramp that stays at `value`
    pub fn hold(value: u16) -> Self {
        Self::linear(value, value)
    }

    pub const fn start(&self) -> i32 {
        self.start
    }

    pub const fn end(&self) -> i32 {
        self.end
    }

    pub const fn delta(&self) -> i32 {
        self.delta
    }

    fn sample(&self, start_time: Instant, duration: Duration, now: Instant) -> i32 {
        lerp(start_time, duration, now, self.start, self.delta)
    }
}

/// The one transition the engine is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTransition {
    /// Time at which the transition started
    start_time: Instant,
    /// Total transition duration
    duration: Duration,
    hue: ChannelRamp,
    saturation: ChannelRamp,
    brightness: ChannelRamp,
    kelvin: ChannelRamp,
}

impl ActiveTransition {
    /// Move every channel from `from` to `to`
    pub fn color(from: Hsbk, to: Hsbk, duration: Duration, start_time: Instant) -> Self {
        Self {
            start_time,
            duration,
            hue: ChannelRamp::circular(from.hue, to.hue),
            saturation: ChannelRamp::linear(from.saturation, to.saturation),
            brightness: ChannelRamp::linear(from.brightness, to.brightness),
            kelvin: ChannelRamp::linear(from.kelvin, to.kelvin),
        }
    }

    /// Move brightness only, freezing the other channels where they are
    pub fn brightness(from: Hsbk, brightness: u16, duration: Duration, start_time: Instant) -> Self {
        Self {
            start_time,
            duration,
            hue: ChannelRamp::hold(from.hue),
            saturation: ChannelRamp::hold(from.saturation),
            brightness: ChannelRamp::linear(from.brightness, brightness),
            kelvin: ChannelRamp::hold(from.kelvin),
        }
    }

    pub const fn start_time(&self) -> Instant {
        self.start_time
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Color at the start of the transition
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn source(&self) -> Hsbk {
        Hsbk {
            hue: wrap_hue(self.hue.start),
            saturation: self.saturation.start as u16,
            brightness: self.brightness.start as u16,
            kelvin: self.kelvin.start as u16,
        }
    }

    /// Color the transition settles on
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn target(&self) -> Hsbk {
        Hsbk {
            hue: wrap_hue(self.hue.end),
            saturation: self.saturation.end as u16,
            brightness: self.brightness.end as u16,
            kelvin: self.kelvin.end as u16,
        }
    }

    /// Check if the transition has reached its end at `now`
    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start_time) >= self.duration
    }

    /// Interpolated color at `now`
    ///
    /// Clamped to the transition window: the source before it starts and
    /// exactly the target once it is over.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample(&self, now: Instant) -> Hsbk {
        if self.is_complete(now) {
            return self.target();
        }
        if now <= self.start_time {
            return self.source();
        }

        let at = |ramp: &ChannelRamp| ramp.sample(self.start_time, self.duration, now);
        Hsbk {
            hue: wrap_hue(at(&self.hue)),
            saturation: at(&self.saturation).clamp(0, i32::from(u16::MAX)) as u16,
            brightness: at(&self.brightness).clamp(0, i32::from(u16::MAX)) as u16,
            kelvin: at(&self.kelvin).clamp(0, i32::from(u16::MAX)) as u16,
        }
    }
}
