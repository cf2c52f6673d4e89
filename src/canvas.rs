// Software 2D canvas: anti-aliased dots and lines with a soft glow, all in
// a premultiplied linear-light RGBA layer that gets flattened over the page
// background when it is time to present.
// Visual: the glowing network you see behind the page content.

use glam::Vec2;

use crate::gamma::GammaLut;
use crate::surface::Surface;
use crate::types::{FrameBuffer, Rgba};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shadow {
    blur: f32,
    color: Rgba,
}

const NO_SHADOW: Shadow = Shadow { blur: 0.0, color: Rgba::TRANSPARENT };

pub struct Canvas {
    width: usize,
    height: usize,
    layer: Vec<[f32; 4]>, // premultiplied linear RGBA, row-major
    scale: f32,
    shadow: Shadow,
    stack: Vec<(f32, Shadow)>,
    lut: GammaLut,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            layer: vec![[0.0; 4]; width * height],
            scale: 1.0,
            shadow: NO_SHADOW,
            stack: Vec::new(),
            lut: GammaLut::new(),
        }
    }

    /// Premultiplied linear RGBA at (x, y), if inside.
    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f32; 4]> {
        (x < self.width && y < self.height).then(|| self.layer[y * self.width + x])
    }

    /// Flatten the layer over a solid `background`, the layer faded by `opacity`.
    /// Visual: this is the frame the window shows.
    pub fn composite(&self, background: Rgba, opacity: f32) -> FrameBuffer {
        let mut out = FrameBuffer::new(self.width, self.height);
        self.composite_into(&mut out, background, opacity);
        out
    }

    /// Same as `composite`, reusing `out` (reallocated only when the size changed).
    pub fn composite_into(&self, out: &mut FrameBuffer, background: Rgba, opacity: f32) {
        if out.width != self.width || out.height != self.height {
            *out = FrameBuffer::new(self.width, self.height);
        }
        let opacity = opacity.clamp(0.0, 1.0);
        let bg = self.lut.decode_rgb(background.r, background.g, background.b);

        for (dst, src) in out.pixels.iter_mut().zip(&self.layer) {
            let keep = 1.0 - src[3] * opacity;
            let r = self.lut.encode(src[0] * opacity + bg[0] * keep) as u32;
            let g = self.lut.encode(src[1] * opacity + bg[1] * keep) as u32;
            let b = self.lut.encode(src[2] * opacity + bg[2] * keep) as u32;
            *dst = (r << 16) | (g << 8) | b;
        }
    }

    /// Source-over one pixel. `alpha` already includes coverage.
    #[inline]
    fn blend(&mut self, x: i32, y: i32, rgb: [f32; 3], alpha: f32) {
        if x < 0 || y < 0 || alpha <= 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let px = &mut self.layer[y * self.width + x];
        let keep = 1.0 - alpha;
        px[0] = rgb[0] * alpha + px[0] * keep;
        px[1] = rgb[1] * alpha + px[1] * keep;
        px[2] = rgb[2] * alpha + px[2] * keep;
        px[3] = alpha + px[3] * keep;
    }

    /// Paint a shape given its signed distance (device pixels, negative
    /// inside) over the box `lo..hi`: first the glow, then the shape itself
    /// with a one-pixel anti-aliased edge.
    fn paint<F>(&mut self, lo: Vec2, hi: Vec2, color: Rgba, sdf: F)
    where
        F: Fn(Vec2) -> f32,
    {
        let glow = (self.shadow.blur > 0.0 && self.shadow.color.a > 0.0).then_some(self.shadow);
        let sigma = glow.map_or(0.0, |s| s.blur * self.scale * 0.5);
        let pad = 3.0 * sigma + 1.0;

        let x0 = (lo.x - pad).floor().max(0.0) as i32;
        let y0 = (lo.y - pad).floor().max(0.0) as i32;
        let x1 = (hi.x + pad).ceil().min(self.width as f32) as i32;
        let y1 = (hi.y + pad).ceil().min(self.height as f32) as i32;

        let fill = self.lut.decode_rgb(color.r, color.g, color.b);

        if let Some(shadow) = glow {
            let rgb = self.lut.decode_rgb(shadow.color.r, shadow.color.g, shadow.color.b);
            let denom = 2.0 * sigma * sigma;
            for y in y0..y1 {
                for x in x0..x1 {
                    let d = sdf(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                    let w = if d <= 0.0 { 1.0 } else { (-d * d / denom).exp() };
                    self.blend(x, y, rgb, shadow.color.a * w);
                }
            }
        }

        for y in y0..y1 {
            for x in x0..x1 {
                let d = sdf(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                let coverage = (0.5 - d).clamp(0.0, 1.0);
                self.blend(x, y, fill, color.a * coverage);
            }
        }
    }
}

/// Distance from `p` to the segment `a..b`.
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for Canvas {
    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.layer = vec![[0.0; 4]; width * height];
    }

    fn pixel_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.layer.fill([0.0; 4]);
    }

    fn save(&mut self) {
        self.stack.push((self.scale, self.shadow));
    }

    fn scale(&mut self, factor: f32) {
        self.scale *= factor;
    }

    fn restore(&mut self) {
        if let Some((scale, shadow)) = self.stack.pop() {
            self.scale = scale;
            self.shadow = shadow;
        }
    }

    fn set_shadow(&mut self, blur: f32, color: Rgba) {
        self.shadow = if blur > 0.0 { Shadow { blur, color } } else { NO_SHADOW };
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let c = center * self.scale;
        let r = radius * self.scale;
        if r <= 0.0 {
            return;
        }
        self.paint(c - Vec2::splat(r), c + Vec2::splat(r), color, |p| p.distance(c) - r);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let a = from * self.scale;
        let b = to * self.scale;
        let half = width * self.scale * 0.5;
        if half <= 0.0 {
            return;
        }
        let lo = a.min(b) - Vec2::splat(half);
        let hi = a.max(b) + Vec2::splat(half);
        self.paint(lo, hi, color, |p| segment_distance(p, a, b) - half);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);

    #[test]
    fn circle_covers_center_not_far_corner() {
        let mut c = Canvas::new(20, 20);
        c.fill_circle(Vec2::new(10.0, 10.0), 3.0, Rgba::new(255, 255, 255, 1.0));

        let center = c.pixel(10, 10).unwrap();
        assert!((center[3] - 1.0).abs() < 1e-6);
        assert_eq!(c.pixel(0, 0).unwrap(), [0.0; 4]);
    }

    #[test]
    fn scale_moves_shapes_to_device_pixels() {
        let mut c = Canvas::new(40, 40);
        c.save();
        c.scale(2.0);
        c.fill_circle(Vec2::new(10.0, 10.0), 2.0, Rgba::new(255, 0, 0, 1.0));
        c.restore();

        assert!(c.pixel(20, 20).unwrap()[3] > 0.99);
        assert_eq!(c.pixel(10, 10).unwrap()[3], 0.0);

        // back to unit scale after restore
        c.fill_circle(Vec2::new(5.0, 30.0), 1.0, Rgba::new(255, 0, 0, 1.0));
        assert!(c.pixel(5, 30).unwrap()[3] > 0.0);
    }

    #[test]
    fn restore_on_empty_stack_is_harmless() {
        let mut c = Canvas::new(4, 4);
        c.restore();
        c.fill_circle(Vec2::new(2.0, 2.0), 1.0, Rgba::new(255, 255, 255, 1.0));
        assert!(c.pixel(2, 2).unwrap()[3] > 0.0);
    }

    #[test]
    fn glow_reaches_past_the_shape() {
        let dot = Rgba::new(14, 165, 233, 1.0);
        let mut plain = Canvas::new(40, 40);
        plain.fill_circle(Vec2::new(20.0, 20.0), 2.0, dot);

        let mut glowing = Canvas::new(40, 40);
        glowing.set_shadow(6.0, Rgba::new(56, 189, 248, 0.5));
        glowing.fill_circle(Vec2::new(20.0, 20.0), 2.0, dot);

        assert_eq!(plain.pixel(25, 20).unwrap()[3], 0.0);
        assert!(glowing.pixel(25, 20).unwrap()[3] > 0.0);
        assert_eq!(glowing.pixel(39, 39).unwrap()[3], 0.0);
    }

    #[test]
    fn line_is_drawn_along_segment_only() {
        let mut c = Canvas::new(30, 10);
        c.stroke_line(Vec2::new(2.0, 5.0), Vec2::new(28.0, 5.0), 1.2, Rgba::new(148, 163, 184, 1.0));

        assert!(c.pixel(15, 4).unwrap()[3] > 0.0 || c.pixel(15, 5).unwrap()[3] > 0.0);
        assert_eq!(c.pixel(15, 0).unwrap()[3], 0.0);
        assert_eq!(c.pixel(0, 5).unwrap()[3], 0.0);
    }

    #[test]
    fn clear_and_resize_empty_the_layer() {
        let mut c = Canvas::new(10, 10);
        c.fill_circle(Vec2::new(5.0, 5.0), 3.0, BLACK);
        c.clear();
        assert_eq!(c.pixel(5, 5).unwrap(), [0.0; 4]);

        c.resize(3, 2);
        assert_eq!(c.pixel_size(), (3, 2));
        assert!(c.pixel(3, 0).is_none());
    }

    #[test]
    fn composite_shows_background_where_layer_is_empty() {
        let mut c = Canvas::new(8, 8);
        c.fill_circle(Vec2::new(4.0, 4.0), 2.0, Rgba::new(255, 255, 255, 1.0));
        let bg = Rgba::new(2, 6, 23, 1.0);

        let fb = c.composite(bg, 1.0);
        assert_eq!((fb.width, fb.height), (8, 8));
        assert_eq!(fb.pixels[0], bg.to_u32());
        assert_eq!(fb.pixels[4 * 8 + 4], 0x00_FF_FF_FF);

        let mut reused = FrameBuffer::new(1, 1);
        c.composite_into(&mut reused, bg, 0.0);
        assert_eq!((reused.width, reused.height), (8, 8));
        assert!(reused.pixels.iter().all(|&p| p == bg.to_u32()));
    }

    #[test]
    fn segment_distance_handles_endpoints_and_degenerate() {
        let a = Vec2::ZERO;
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(segment_distance(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(segment_distance(Vec2::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(segment_distance(Vec2::new(3.0, 4.0), a, a), 5.0);
    }
}
