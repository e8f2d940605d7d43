use cgmath::Vector2;
use image::{Rgba, RgbaImage};

use crate::shape::Shape;

/// Indigo `#6366F1`.
pub const INDIGO: Rgba<u8> = Rgba([99, 102, 241, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// RGBA drawing surface with straight (non premultiplied) alpha.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, TRANSPARENT),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Fills `shape` with `color`, anti-aliasing its outline over one pixel.
    pub fn fill<S: Shape>(&mut self, shape: &S, color: Rgba<u8>) {
        let (width, height) = self.dimensions();
        let (min, max) = shape.bounds();

        let x0 = (min.x.floor().max(0.0) as u32).min(width);
        let y0 = (min.y.floor().max(0.0) as u32).min(height);
        let x1 = (max.x.ceil().max(0.0) as u32).min(width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(height);

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (0.5 - shape.signed_distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x as i32, y as i32, color, coverage);
                }
            }
        }
    }

    /// Composites `color` over the pixel at `(x, y)` (source-over), scaled by
    /// `coverage` in `0.0..=1.0`. Out-of-bounds writes are ignored.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
        let (width, height) = self.dimensions();
        if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
            return;
        }

        let src_a = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }

        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        if src_a >= 1.0 {
            *pixel = color;
            return;
        }

        let dst_a = pixel[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mut out = [0u8; 4];
        for (i, channel) in out.iter_mut().take(3).enumerate() {
            let src = color[i] as f32 / 255.0;
            let dst = pixel[i] as f32 / 255.0;
            let value = (src * src_a + dst * dst_a * (1.0 - src_a)) / out_a;
            *channel = to_channel(value);
        }
        out[3] = to_channel(out_a);
        *pixel = Rgba(out);
    }
}

fn to_channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Circle, RoundedRect};

    #[test]
    fn new_canvas_is_transparent() {
        let canvas = Canvas::new(8, 4);
        assert_eq!(canvas.dimensions(), (8, 4));
        assert!(canvas.image().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn fill_rounded_rect() {
        let mut canvas = Canvas::new(256, 256);
        canvas.fill(&RoundedRect::inset(256, 10.0, 40.0), INDIGO);

        let image = canvas.image();
        for (x, y) in [(0, 0), (255, 0), (0, 255), (255, 255), (12, 12), (5, 128)] {
            assert_eq!(*image.get_pixel(x, y), TRANSPARENT, "pixel {x},{y}");
        }
        for (x, y) in [(128, 128), (10, 128), (245, 128), (128, 10), (50, 50)] {
            assert_eq!(*image.get_pixel(x, y), INDIGO, "pixel {x},{y}");
        }
    }

    #[test]
    fn fill_edge_is_antialiased() {
        let mut canvas = Canvas::new(32, 32);
        canvas.fill(&Circle::new(Vector2::new(16.0, 16.0), 10.3), WHITE);
        // (26, 16) is sampled at 26.5, 0.2px outside of the outline
        let edge = canvas.image().get_pixel(26, 16);
        assert!(edge[3] > 0 && edge[3] < 255, "alpha {}", edge[3]);
    }

    #[test]
    fn blend_over_opaque_keeps_opacity() {
        let mut canvas = Canvas::new(1, 1);
        canvas.blend(0, 0, INDIGO, 1.0);
        canvas.blend(0, 0, WHITE, 0.5);
        let p = canvas.image().get_pixel(0, 0);
        assert_eq!(p[3], 255);
        assert_eq!(p[0], 177);
        assert_eq!(p[2], 248);
    }

    #[test]
    fn blend_over_transparent_keeps_color() {
        let mut canvas = Canvas::new(1, 1);
        canvas.blend(0, 0, WHITE, 0.25);
        let p = canvas.image().get_pixel(0, 0);
        assert_eq!(*p, Rgba([255, 255, 255, 64]));
    }

    #[test]
    fn blend_ignores_out_of_bounds() {
        let mut canvas = Canvas::new(2, 2);
        canvas.blend(-1, 0, WHITE, 1.0);
        canvas.blend(0, 2, WHITE, 1.0);
        assert!(canvas.image().pixels().all(|p| *p == TRANSPARENT));
    }
}
