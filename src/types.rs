// Core types shared by the field, the canvas and the window.

use glam::Vec2;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// 8-bit RGB with a float alpha in [0,1], the way CSS writes `rgba(...)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color, different opacity (clamped).
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Packed 0x00RRGGBB, alpha dropped.
    #[cfg(test)]
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseColorError {
    #[error("unrecognized color syntax: {0:?}")]
    Syntax(String),
    #[error("color channel out of range: {0:?}")]
    Channel(String),
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Accepts `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#rrggbb`, `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let syntax = || ParseColorError::Syntax(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
                return Err(syntax());
            }
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| syntax());
            let a = if hex.len() == 8 { byte(6)? as f32 / 255.0 } else { 1.0 };
            return Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, a));
        }

        let (body, want) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, 4)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, 3)
        } else {
            return Err(syntax());
        };
        let body = body.strip_suffix(')').ok_or_else(syntax)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != want {
            return Err(syntax());
        }

        let channel = |p: &str| -> Result<u8, ParseColorError> {
            let v: f32 = p.parse().map_err(|_| syntax())?;
            if !(0.0..=255.0).contains(&v) {
                return Err(ParseColorError::Channel(p.to_string()));
            }
            Ok(v.round() as u8)
        };
        let a = match parts.get(3) {
            Some(p) => {
                let a: f32 = p.parse().map_err(|_| syntax())?;
                if !(0.0..=1.0).contains(&a) {
                    return Err(ParseColorError::Channel(p.to_string()));
                }
                a
            }
            None => 1.0,
        };
        Ok(Rgba::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, a))
    }
}

/// One node of the network. Visual: a glowing dot drifting across the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2, // logical surface coordinates
    pub vel: Vec2, // units per frame
}

/// Where the pointer is relative to the surface, and whether it is over it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub pos: Vec2,
    pub inside: bool,
}

/// Counters from one `step`; handy for logging and for tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub pairs: usize, // unordered pairs evaluated
    pub links: usize, // pairs close enough to get a line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_rgba() {
        let c: Rgba = "rgba(56, 189, 248, 0.25)".parse().unwrap();
        assert_eq!(c, Rgba::new(56, 189, 248, 0.25));
    }

    #[test]
    fn parses_rgb_and_hex() {
        assert_eq!("rgb(1,2,3)".parse::<Rgba>().unwrap(), Rgba::new(1, 2, 3, 1.0));
        assert_eq!("#020617".parse::<Rgba>().unwrap(), Rgba::new(2, 6, 23, 1.0));
        let c: Rgba = "#ff000080".parse().unwrap();
        assert_eq!((c.r, c.g, c.b), (255, 0, 0));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_colors() {
        assert!(matches!("blue".parse::<Rgba>(), Err(ParseColorError::Syntax(_))));
        assert!(matches!("rgba(1,2,3)".parse::<Rgba>(), Err(ParseColorError::Syntax(_))));
        assert!(matches!("rgb(300,0,0)".parse::<Rgba>(), Err(ParseColorError::Channel(_))));
        assert!(matches!("rgba(0,0,0,2)".parse::<Rgba>(), Err(ParseColorError::Channel(_))));
        assert!("#12345".parse::<Rgba>().is_err());
    }

    #[test]
    fn packs_for_minifb() {
        assert_eq!(Rgba::new(0x12, 0x34, 0x56, 0.5).to_u32(), 0x00_12_34_56);
    }
}
