//! Background theming for the highlighted title.
//!
//! The background starts at the poster's dominant color and fades toward
//! black once the viewer scrolls past half of the poster height.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scroll distance over which the fade completes
pub const FADE_DISTANCE: f64 = 300.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css())
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Accepts `r,g,b` with optional whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!("Invalid color '{}': expected r,g,b", s));
        }
        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("Invalid color channel '{}': expected 0-255", part))?;
        }
        Ok(Rgb::new(channels[0], channels[1], channels[2]))
    }
}

/// Linear per-channel interpolation, `round(from + (to - from) * progress)`.
pub fn interpolate(from: Rgb, to: Rgb, progress: f64) -> Rgb {
    let mix = |a: u8, b: u8| -> u8 {
        let value = a as f64 + (b as f64 - a as f64) * progress;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(mix(from.r, to.r), mix(from.g, to.g), mix(from.b, to.b))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTheme {
    pub initial: Rgb,
    pub start_scroll: f64,
}

impl ScrollTheme {
    /// `poster_height` is the rendered height of the highlight poster
    pub fn new(dominant: Rgb, poster_height: f64) -> Self {
        Self {
            initial: dominant,
            start_scroll: poster_height / 2.0,
        }
    }

    pub fn progress(&self, scroll_top: f64) -> f64 {
        ((scroll_top - self.start_scroll) / FADE_DISTANCE).clamp(0.0, 1.0)
    }

    pub fn background_at(&self, scroll_top: f64) -> Rgb {
        if scroll_top < self.start_scroll {
            return self.initial;
        }
        interpolate(self.initial, Rgb::BLACK, self.progress(scroll_top))
    }
}
