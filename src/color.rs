// RGBA color model and the palette registry. A root carries a start and an
// end color and every painted segment interpolates between them, so colors
// here are kept as floats and only truncated when handed to the raster
// backend. Channels are clamped at construction so gradient arithmetic with
// large mixing coefficients cannot drift out of range.

use std::fmt;

use anyhow::{anyhow, Result};

use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r : f64,
    pub g : f64,
    pub b : f64,
    pub a : f64,
}

impl Color {
    pub fn init(r : f64, g : f64, b : f64) -> Color {
        Color::with_alpha(r, g, b, 1.0)
    }

    pub fn with_alpha(r : f64, g : f64, b : f64, a : f64) -> Color {
        Color {
            r : clamp_channel(r),
            g : clamp_channel(g),
            b : clamp_channel(b),
            a : a.max(0.0).min(1.0),
        }
    }

    // A color with every channel drawn uniformly from [0, 255)
    pub fn random(rng : &mut dyn RandomSource) -> Color {
        Color::init(
            (rng.next() * 255.0).floor(),
            (rng.next() * 255.0).floor(),
            (rng.next() * 255.0).floor(),
        )
    }

    // Parse a 6 digit hex string, with or without a leading '#'
    pub fn from_hex(hex : &str) -> Result<Color> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(anyhow!("expected 6 hex digits, got {:?}", hex));
        }
        let channel = |range : std::ops::Range<usize>| -> Result<f64> {
            let pair = digits
                .get(range)
                .ok_or_else(|| anyhow!("malformed hex color {:?}", hex))?;
            let value = u8::from_str_radix(pair, 16)
                .map_err(|_| anyhow!("malformed hex color {:?}", hex))?;
            Ok(f64::from(value))
        };
        Ok(Color::init(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    // Linear interpolation between two colors. The coefficient is not
    // clamped, extrapolated channels saturate at construction instead.
    pub fn lerp(self : &Self, other : &Color, t : f64) -> Color {
        Color::with_alpha(
            self.r * (1.0 - t) + other.r * t,
            self.g * (1.0 - t) + other.g * t,
            self.b * (1.0 - t) + other.b * t,
            self.a * (1.0 - t) + other.a * t,
        )
    }

    pub fn inverted(self : &Self) -> Color {
        Color::with_alpha(255.0 - self.r, 255.0 - self.g, 255.0 - self.b, self.a)
    }
}

fn clamp_channel(value : f64) -> f64 {
    value.max(0.0).min(255.0)
}

impl fmt::Display for Color {
    fn fmt(&self, f : &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r as i64, self.g as i64, self.b as i64, self.a
        )
    }
}

// Fixed 5 color palettes. A root at index i pairs palette[i % 5] with
// palette[(i + 3) % 5]; the offset walks a 5-cycle so the two are never
// the same entry.
pub struct Palette {
    pub name : &'static str,
    hex : [&'static str; 5],
}

pub const PALETTES : [Palette; 4] = [
    Palette {
        name : "night",
        hex : ["2C3359", "37538C", "1A1E26", "F2F2F2", "F44526"],
    },
    Palette {
        name : "ladek",
        hex : ["B265B2", "FFF2C3", "FFAAFF", "74CCBF", "6EB2A8"],
    },
    Palette {
        name : "theme",
        hex : ["655FE3", "E3966B", "5499E3", "E3C83D", "49E3E1"],
    },
    Palette {
        name : "neon",
        hex : ["B33230", "FFFF5E", "FF625E", "45B2FF", "3980B3"],
    },
];

// The palette the neon variant is restricted to
pub const NEON_PALETTE : usize = 3;

impl Palette {
    pub fn colors(self : &Self) -> Result<Vec<Color>> {
        self.hex.iter().map(|hex| Color::from_hex(hex)).collect()
    }
}

// Pick a palette index: forced by the neon variant, taken modulo the
// registry size when given, uniform otherwise.
pub fn choose_palette(index : Option<usize>, neon : bool, rng : &mut dyn RandomSource) -> usize {
    if neon {
        NEON_PALETTE
    } else if let Some(index) = index {
        index % PALETTES.len()
    } else {
        rng.pick(PALETTES.len())
    }
}
