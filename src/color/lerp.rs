use embassy_time::{Duration, Instant};

/// Size of the hue circle in wire units
pub const HUE_RANGE: i32 = 0x1_0000;

/// Interpolate a channel value at `now`
///
/// Evaluated as `start + delta * elapsed / duration` in floating point and
/// truncated towards zero. The caller is responsible for clamping `now` into
/// the transition window.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
pub fn lerp(start_time: Instant, duration: Duration, now: Instant, start: i32, delta: i32) -> i32 {
    let total = duration.as_micros();
    if total == 0 {
        return start + delta;
    }
    let elapsed = now.saturating_duration_since(start_time).as_micros();
    let progress = elapsed as f32 / total as f32;
    (progress * delta as f32 + start as f32) as i32
}

/// Hue delta that travels the shorter way around the circle
pub fn shortest_hue_delta(start: u16, end: u16) -> i32 {
    let delta = i32::from(end) - i32::from(start);
    if delta.abs() > HUE_RANGE / 2 {
        if delta > 0 {
            delta - HUE_RANGE
        } else {
            delta + HUE_RANGE
        }
    } else {
        delta
    }
}

/// Fold an interpolated hue back onto the circle
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn wrap_hue(value: i32) -> u16 {
    value.rem_euclid(HUE_RANGE) as u16
}
