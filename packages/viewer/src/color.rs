//! RGB colour values used by the material, light and scene parameters.
//!
//! Colours are stored as linear `0..=1` floats and serialized as `#rrggbb`
//! strings so that colour-picker values round-trip through JSON unchanged.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// An RGB colour with channels in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };

    /// Create a colour from float channels, clamping each into `0..=1`.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Create a colour from a packed `0xRRGGBB` value.
    pub fn from_hex_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb`, `rrggbb` or the short `#rgb` form.
    pub fn parse_hex(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        let expanded = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            n => return Err(anyhow!("expected 3 or 6 hex digits in colour '{}', got {}", s, n)),
        };
        let packed = u32::from_str_radix(&expanded, 16)
            .with_context(|| format!("invalid hex colour '{}'", s))?;
        Ok(Self::from_hex_u32(packed))
    }

    /// Pack into `0xRRGGBB`.
    pub fn to_hex_u32(&self) -> u32 {
        let r = (clamp_channel(self.r) * 255.0).round() as u32;
        let g = (clamp_channel(self.g) * 255.0).round() as u32;
        let b = (clamp_channel(self.b) * 255.0).round() as u32;
        (r << 16) | (g << 8) | b
    }

    /// Format as a lowercase `#rrggbb` string.
    pub fn to_hex_string(&self) -> String {
        format!("#{:06x}", self.to_hex_u32())
    }

    /// Build a colour from hue/saturation/lightness, each in `0..=1`.
    ///
    /// Hue wraps, so `1.25` is treated as `0.25`.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self { r: l, g: l, b: l };
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;

        Self {
            r: hue_to_channel(q, p, h + 1.0 / 3.0),
            g: hue_to_channel(q, p, h),
            b: hue_to_channel(q, p, h - 1.0 / 3.0),
        }
    }

    /// Channels as an RGBA array with the given alpha.
    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// Component-wise closeness check.
    pub fn approx_eq(&self, other: &Color, epsilon: f32) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex_string()
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Color::parse_hex(&value)
    }
}

fn clamp_channel(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn hue_to_channel(low: f32, high: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        low + (high - low) * 6.0 * t
    } else if t < 0.5 {
        high
    } else if t < 2.0 / 3.0 {
        low + (high - low) * 6.0 * (2.0 / 3.0 - t)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        let c = Color::parse_hex("#ff6b35").unwrap();
        assert_eq!(c.to_hex_u32(), 0xff6b35);

        let short = Color::parse_hex("#0f0").unwrap();
        assert_eq!(short.to_hex_u32(), 0x00ff00);

        let bare = Color::parse_hex("00bcd4").unwrap();
        assert_eq!(bare.to_hex_string(), "#00bcd4");
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(Color::parse_hex("#12345").is_err());
        assert!(Color::parse_hex("#zzzzzz").is_err());
        assert!(Color::parse_hex("").is_err());
    }

    #[test]
    fn test_hsl_primary_hues() {
        let red = Color::from_hsl(0.0, 1.0, 0.5);
        assert!(red.approx_eq(&Color::new(1.0, 0.0, 0.0), 1e-5));

        let cyan = Color::from_hsl(0.5, 1.0, 0.5);
        assert!(cyan.approx_eq(&Color::new(0.0, 1.0, 1.0), 1e-5));

        let green = Color::from_hsl(1.0 / 3.0, 1.0, 0.5);
        assert!(green.approx_eq(&Color::new(0.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_hsl_grey_and_wrap() {
        let grey = Color::from_hsl(0.7, 0.0, 0.25);
        assert!(grey.approx_eq(&Color::new(0.25, 0.25, 0.25), 1e-6));

        let wrapped = Color::from_hsl(1.5, 1.0, 0.5);
        let direct = Color::from_hsl(0.5, 1.0, 0.5);
        assert!(wrapped.approx_eq(&direct, 1e-5));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::from_hex_u32(0x6366f1)).unwrap();
        assert_eq!(json, "\"#6366f1\"");

        let back: Color = serde_json::from_str("\"#1a1a2e\"").unwrap();
        assert_eq!(back.to_hex_u32(), 0x1a1a2e);
    }
}
