// The 2D drawing contract the field renders through.
// Visual: whatever implements this is the layer you see behind the page content.

use crate::types::Rgba;
use glam::Vec2;

/// A 2D drawing target with a backing resolution in device pixels and a
/// current transform (uniform scale) applied to every shape.
pub trait Surface {
    /// Reallocate the backing store. Contents are lost.
    fn resize(&mut self, width: usize, height: usize);

    /// Backing resolution in device pixels.
    fn pixel_size(&self) -> (usize, usize);

    /// Wipe every pixel to transparent, ignoring the transform.
    fn clear(&mut self);

    /// Push the current scale and shadow onto the state stack.
    fn save(&mut self);

    /// Multiply the current scale by `factor`.
    fn scale(&mut self, factor: f32);

    /// Pop the state stack. Popping an empty stack does nothing.
    fn restore(&mut self);

    /// Glow applied under subsequent shapes; `blur <= 0` turns it off.
    fn set_shadow(&mut self, blur: f32, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}
