use super::UnitRgb;

/// Lowest color temperature the bulb tints its output for.
pub const MIN_TINT_KELVIN: u16 = 2500;

/// Highest color temperature the bulb tints its output for.
pub const MAX_TINT_KELVIN: u16 = 9000;

/// Convert a Kelvin temperature to normalized RGB multipliers
///
/// Piecewise blackbody approximation evaluated in 100K units. Each channel
/// is clamped to `0..=255` before it is normalized to `0.0..=1.0`.
#[allow(clippy::cast_lossless)]
pub fn kelvin_to_rgb(kelvin: u16) -> UnitRgb {
    let temp = kelvin as f32 / 100.0;

    let red = if temp <= 66.0 {
        255.0
    } else {
        329.698_727_446 * libm::powf(temp - 60.0, -0.133_204_759_2)
    };

    let green = if temp <= 66.0 {
        99.470_802_586_1 * libm::logf(temp) - 161.119_568_166_1
    } else {
        288.122_169_528_3 * libm::powf(temp - 60.0, -0.075_514_849_2)
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        138.517_731_223_1 * libm::logf(temp - 10.0) - 305.044_792_730_7
    };

    UnitRgb {
        r: normalize(red),
        g: normalize(green),
        b: normalize(blue),
    }
}

/// Tint applied on top of the HSB output for a given temperature
///
/// Temperatures outside of the supported white point range leave the color
/// untouched.
pub fn kelvin_tint(kelvin: u16) -> UnitRgb {
    if (MIN_TINT_KELVIN..=MAX_TINT_KELVIN).contains(&kelvin) {
        kelvin_to_rgb(kelvin)
    } else {
        UnitRgb::WHITE
    }
}

#[inline]
fn normalize(channel: f32) -> f32 {
    // NaN from logf of a zero temperature collapses to black
    if channel.is_nan() {
        return 0.0;
    }
    channel.clamp(0.0, 255.0) / 255.0
}
