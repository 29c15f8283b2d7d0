//! Color math for the bulb output
//!
//! Everything in here is pure: interpolation helpers used by transitions,
//! the HSL conversion and the Kelvin tint used when rendering.

mod hsl;
mod kelvin;
mod lerp;

use smart_leds::RGB8;

pub use hsl::hsb_to_rgb;
pub use kelvin::{MAX_TINT_KELVIN, MIN_TINT_KELVIN, kelvin_tint, kelvin_to_rgb};
pub use lerp::{HUE_RANGE, lerp, shortest_hue_delta, wrap_hue};

pub type Rgb = RGB8;

/// Largest value of a 16-bit wire channel
pub const CHANNEL_MAX: u16 = u16::MAX;

/// Bulb color in wire units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsbk {
    pub hue: u16,
    pub saturation: u16,
    pub brightness: u16,
    pub kelvin: u16,
}

impl Hsbk {
    pub const fn new(hue: u16, saturation: u16, brightness: u16, kelvin: u16) -> Self {
        Self {
            hue,
            saturation,
            brightness,
            kelvin,
        }
    }

    /// Same color with a different brightness
    pub const fn with_brightness(self, brightness: u16) -> Self {
        Self { brightness, ..self }
    }
}

/// RGB color with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl UnitRgb {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Multiply channel-wise
    pub fn tinted(self, tint: Self) -> Self {
        Self {
            r: self.r * tint.r,
            g: self.g * tint.g,
            b: self.b * tint.b,
        }
    }

    /// Scale to 8-bit output
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb8(self) -> Rgb {
        Rgb {
            r: (self.r * 255.0) as u8,
            g: (self.g * 255.0) as u8,
            b: (self.b * 255.0) as u8,
        }
    }
}

/// Render a bulb color to the 8-bit output
///
/// Brightness is halved before the HSL conversion so that full brightness
/// maps to a fully saturated color instead of white.
#[allow(clippy::cast_lossless)]
pub fn hsbk_to_rgb(color: Hsbk) -> Rgb {
    let max = CHANNEL_MAX as f32;
    hsb_to_rgb(
        color.hue as f32 / max,
        color.saturation as f32 / max,
        color.brightness as f32 / max / 2.0,
    )
    .tinted(kelvin_tint(color.kelvin))
    .to_rgb8()
}
