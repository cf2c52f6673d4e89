// Headless rendering: run the field for a while without a window and write
// the final frame as a PNG. Useful for previews and for eyeballing a config.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use log::info;

use crate::types::FrameBuffer;

/// Unpack 0x00RRGGBB pixels into an RGB image.
pub fn to_rgb_image(fb: &FrameBuffer) -> RgbImage {
    ImageBuffer::from_fn(fb.width as u32, fb.height as u32, |x, y| {
        let px = fb.pixels[y as usize * fb.width + x as usize];
        Rgb([(px >> 16) as u8, (px >> 8) as u8, px as u8])
    })
}

/// Write `fb` to `path`; the format follows the extension.
pub fn save(fb: &FrameBuffer, path: &Path) -> Result<(), image::ImageError> {
    to_rgb_image(fb).save(path)?;
    info!("wrote {}x{} snapshot to {}", fb.width, fb.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_channels_in_order() {
        let fb = FrameBuffer { width: 2, height: 1, pixels: vec![0x00_12_34_56, 0x00_FF_00_80] };
        let img = to_rgb_image(&fb);
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0x12, 0x34, 0x56]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([0xFF, 0x00, 0x80]));
    }
}
