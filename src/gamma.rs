// sRGB <-> linear lookup tables.
// The canvas blends in linear light (no dark fringes where a glow overlaps a
// line); these tables keep that from costing a powf per channel per pixel.

/// Steps in the linear -> sRGB table.
const ENCODE_STEPS: usize = 4096;

pub struct GammaLut {
    decode: [f32; 256],          // sRGB byte -> linear 0..1
    encode: [u8; ENCODE_STEPS],  // quantized linear 0..1 -> sRGB byte
}

/// sRGB transfer curve, inverted: encoded 0..1 -> linear 0..1.
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

/// sRGB transfer curve: linear 0..1 -> encoded 0..1.
fn linear_to_srgb(l: f32) -> f32 {
    if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 }
}

impl GammaLut {
    pub fn new() -> Self {
        let top = (ENCODE_STEPS - 1) as f32;
        Self {
            decode: std::array::from_fn(|v| srgb_to_linear(v as f32 / 255.0)),
            encode: std::array::from_fn(|i| {
                (linear_to_srgb(i as f32 / top) * 255.0).round().clamp(0.0, 255.0) as u8
            }),
        }
    }

    #[inline]
    pub fn decode(&self, v: u8) -> f32 {
        self.decode[v as usize]
    }

    #[inline]
    pub fn encode(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * (ENCODE_STEPS - 1) as f32).round() as usize;
        self.encode[idx]
    }

    /// An sRGB color's channels in linear light.
    #[inline]
    pub fn decode_rgb(&self, r: u8, g: u8, b: u8) -> [f32; 3] {
        [self.decode(r), self.decode(g), self.decode(b)]
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let lut = GammaLut::new();
        assert_eq!(lut.decode(0), 0.0);
        assert!((lut.decode(255) - 1.0).abs() < 1e-6);
        assert_eq!(lut.encode(0.0), 0);
        assert_eq!(lut.encode(1.0), 255);
        assert_eq!(lut.encode(7.0), 255);
    }

    #[test]
    fn curves_meet_at_the_knee() {
        // mid-gray is ~21.4% linear light
        assert!((srgb_to_linear(0.5) - 0.214).abs() < 1e-3);
        assert!((linear_to_srgb(srgb_to_linear(0.04045)) - 0.04045).abs() < 1e-5);
        assert!((linear_to_srgb(0.003_130_8) - 12.92 * 0.003_130_8).abs() < 1e-5);
    }

    #[test]
    fn round_trips_every_byte() {
        let lut = GammaLut::new();
        for v in 0..=255u8 {
            assert_eq!(lut.encode(lut.decode(v)), v);
        }
    }
}
