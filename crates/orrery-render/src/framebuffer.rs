//! CPU framebuffers and presented frames.

use crate::color::{aces_tonemap, linear_to_srgb};

/// Body slot value for pixels that hit no body.
pub const NO_BODY: u32 = u32::MAX;

/// HDR render target with the geometry attributes later passes read.
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// Linear HDR color, alpha unused until presentation.
    pub color: Vec<[f32; 4]>,
    /// Distance along the pixel ray, `f32::INFINITY` for background.
    pub depth: Vec<f32>,
    /// Index into the frame's body list, or [`NO_BODY`].
    pub body: Vec<u32>,
    /// World-space surface normal.
    pub normal: Vec<[f32; 3]>,
    /// Spherical surface coordinates.
    pub uv: Vec<[f32; 2]>,
}

impl Framebuffer {
    /// A cleared framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            color: vec![[0.0, 0.0, 0.0, 1.0]; len],
            depth: vec![f32::INFINITY; len],
            body: vec![NO_BODY; len],
            normal: vec![[0.0; 3]; len],
            uv: vec![[0.0; 2]; len],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.color.len()
    }

    /// Returns true for a zero-sized framebuffer.
    pub fn is_empty(&self) -> bool {
        self.color.is_empty()
    }

    /// Linear index of pixel `(x, y)`.
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Reset every attribute, resizing if the dimensions changed.
    pub fn clear(&mut self, width: u32, height: u32) {
        if width != self.width || height != self.height {
            *self = Self::new(width, height);
            return;
        }
        self.color.fill([0.0, 0.0, 0.0, 1.0]);
        self.depth.fill(f32::INFINITY);
        self.body.fill(NO_BODY);
        self.normal.fill([0.0; 3]);
        self.uv.fill([0.0; 2]);
    }

    /// Tonemap to sRGB RGBA8 with the given exposure.
    pub fn to_rgba8(&self, exposure: f32) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.color.len() * 4);
        for pixel in &self.color {
            for channel in &pixel[..3] {
                let mapped = linear_to_srgb(aces_tonemap(channel.max(0.0) * exposure));
                bytes.push((mapped.clamp(0.0, 1.0) * 255.0 + 0.5) as u8);
            }
            bytes.push(255);
        }
        bytes
    }
}

/// A finished frame handed to the display host.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Sequence number, starting at 0.
    pub index: u64,
    /// Simulation time the frame was rendered at.
    pub time: f64,
    /// Row-major sRGB RGBA8 pixels.
    pub pixels: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_cleared() {
        let fb = Framebuffer::new(4, 3);
        assert_eq!(fb.len(), 12);
        assert!(fb.depth.iter().all(|d| d.is_infinite()));
        assert!(fb.body.iter().all(|&b| b == NO_BODY));
    }

    #[test]
    fn test_clear_resizes() {
        let mut fb = Framebuffer::new(2, 2);
        fb.body[0] = 3;
        fb.clear(2, 2);
        assert_eq!(fb.body[0], NO_BODY);
        fb.clear(5, 1);
        assert_eq!((fb.width(), fb.height(), fb.len()), (5, 1, 5));
    }

    #[test]
    fn test_rgba8_black_and_bright() {
        let mut fb = Framebuffer::new(2, 1);
        fb.color[1] = [50.0, 50.0, 50.0, 1.0];
        let bytes = fb.to_rgba8(1.0);
        assert_eq!(&bytes[..4], &[0, 0, 0, 255]);
        assert_eq!(&bytes[4..], &[255, 255, 255, 255]);
    }
}
