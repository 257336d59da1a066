use super::Rgba;

/// A mutable RGBA8 pixel buffer with clipped fill primitives.
///
/// Coordinates are in buffer pixels with the origin at the top-left corner
/// and +y pointing down. Shapes may extend past the buffer; only the visible
/// part is written.
pub struct Frame<'a> {
    pixels: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(pixels: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &*self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        let offset = self.byte_offset(x, y)?;
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(Rgba(color))
    }

    pub fn clear(&mut self, color: Rgba) {
        let bytes = color.bytes();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&bytes);
        }
    }

    pub fn fill_rect(&mut self, left: i32, top: i32, width: u32, height: u32, color: Rgba) {
        let right = left.saturating_add(width.min(i32::MAX as u32) as i32);
        let bottom = top.saturating_add(height.min(i32::MAX as u32) as i32);
        let draw_left = left.max(0);
        let draw_top = top.max(0);
        let draw_right = right.min(self.width as i32);
        let draw_bottom = bottom.min(self.height as i32);
        for y in draw_top..draw_bottom {
            for x in draw_left..draw_right {
                self.write_pixel(x, y, color);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: u32, color: Rgba) {
        let r = radius.min(i32::MAX as u32 / 2) as i32;
        let r_squared = i64::from(r) * i64::from(r);
        let top = (cy - r).max(0);
        let bottom = (cy + r).min(self.height as i32 - 1);
        let left = (cx - r).max(0);
        let right = (cx + r).min(self.width as i32 - 1);
        for y in top..=bottom {
            let dy = i64::from(y - cy);
            for x in left..=right {
                let dx = i64::from(x - cx);
                if dx * dx + dy * dy <= r_squared {
                    self.write_pixel(x, y, color);
                }
            }
        }
    }

    /// Fills the triangle `a`, `b`, `c` in either winding order.
    ///
    /// A pixel is covered when its centre lies inside or on an edge.
    pub fn fill_triangle(&mut self, a: (i32, i32), b: (i32, i32), c: (i32, i32), color: Rgba) {
        let area = edge(a, b, c);
        if area == 0 {
            return;
        }
        let top = a.1.min(b.1).min(c.1).max(0);
        let bottom = a.1.max(b.1).max(c.1).min(self.height as i32 - 1);
        let left = a.0.min(b.0).min(c.0).max(0);
        let right = a.0.max(b.0).max(c.0).min(self.width as i32 - 1);

        // Work in half-pixel units so pixel centres are integral.
        let scale = |p: (i32, i32)| (i64::from(p.0) * 2, i64::from(p.1) * 2);
        let (a2, b2, c2) = (scale(a), scale(b), scale(c));
        for y in top..=bottom {
            for x in left..=right {
                let p = (i64::from(x) * 2 + 1, i64::from(y) * 2 + 1);
                let w0 = edge_i64(b2, c2, p);
                let w1 = edge_i64(c2, a2, p);
                let w2 = edge_i64(a2, b2, p);
                let inside = if area > 0 {
                    w0 >= 0 && w1 >= 0 && w2 >= 0
                } else {
                    w0 <= 0 && w1 <= 0 && w2 <= 0
                };
                if inside {
                    self.write_pixel(x, y, color);
                }
            }
        }
    }

    fn byte_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let pixel_offset = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        let byte_offset = pixel_offset.checked_mul(4)?;
        let end = byte_offset.checked_add(4)?;
        (end <= self.pixels.len()).then_some(byte_offset)
    }

    fn write_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        let Some(offset) = self.byte_offset(x, y) else {
            return;
        };
        self.pixels[offset..offset + 4].copy_from_slice(&color.bytes());
    }
}

fn edge(a: (i32, i32), b: (i32, i32), p: (i32, i32)) -> i64 {
    edge_i64(
        (i64::from(a.0), i64::from(a.1)),
        (i64::from(b.0), i64::from(b.1)),
        (i64::from(p.0), i64::from(p.1)),
    )
}

fn edge_i64(a: (i64, i64), b: (i64, i64), p: (i64, i64)) -> i64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba([255, 0, 0, 255]);

    fn buffer(width: u32, height: u32) -> Vec<u8> {
        vec![0; width as usize * height as usize * 4]
    }

    fn count_color(frame: &Frame<'_>, color: Rgba) -> usize {
        frame
            .as_bytes()
            .chunks_exact(4)
            .filter(|chunk| *chunk == color.bytes())
            .count()
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut pixels = buffer(4, 3);
        let mut frame = Frame::new(&mut pixels, 4, 3);
        frame.clear(RED);
        assert_eq!(count_color(&frame, RED), 12);
    }

    #[test]
    fn fill_rect_covers_exact_area() {
        let mut pixels = buffer(10, 10);
        let mut frame = Frame::new(&mut pixels, 10, 10);
        frame.fill_rect(2, 3, 4, 2, RED);

        assert_eq!(count_color(&frame, RED), 8);
        assert_eq!(frame.pixel(2, 3), Some(RED));
        assert_eq!(frame.pixel(5, 4), Some(RED));
        assert_eq!(frame.pixel(6, 4), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(frame.pixel(2, 5), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn fill_rect_is_clipped_to_buffer() {
        let mut pixels = buffer(5, 5);
        let mut frame = Frame::new(&mut pixels, 5, 5);
        frame.fill_rect(-3, 3, 100, 100, RED);
        assert_eq!(count_color(&frame, RED), 10);
    }

    #[test]
    fn fill_circle_is_symmetric_and_clipped() {
        let mut pixels = buffer(21, 21);
        let mut frame = Frame::new(&mut pixels, 21, 21);
        frame.fill_circle(10, 10, 5, RED);

        assert_eq!(frame.pixel(10, 10), Some(RED));
        assert_eq!(frame.pixel(15, 10), Some(RED));
        assert_eq!(frame.pixel(5, 10), Some(RED));
        assert_eq!(frame.pixel(10, 5), Some(RED));
        assert_eq!(frame.pixel(14, 14), Some(Rgba([0, 0, 0, 0])));

        let mut edge_pixels = buffer(8, 8);
        let mut edge_frame = Frame::new(&mut edge_pixels, 8, 8);
        edge_frame.fill_circle(-2, -2, 4, RED);
        assert_eq!(edge_frame.pixel(0, 0), Some(RED));
    }

    #[test]
    fn fill_triangle_accepts_either_winding() {
        let mut clockwise = buffer(16, 16);
        let mut counter = buffer(16, 16);
        Frame::new(&mut clockwise, 16, 16).fill_triangle((8, 1), (14, 14), (2, 14), RED);
        Frame::new(&mut counter, 16, 16).fill_triangle((8, 1), (2, 14), (14, 14), RED);

        assert_eq!(clockwise, counter);
        let frame = Frame::new(&mut clockwise, 16, 16);
        assert_eq!(frame.pixel(8, 10), Some(RED));
        assert_eq!(frame.pixel(1, 1), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let mut pixels = buffer(8, 8);
        let mut frame = Frame::new(&mut pixels, 8, 8);
        frame.fill_triangle((0, 0), (3, 3), (6, 6), RED);
        assert_eq!(count_color(&frame, RED), 0);
    }

    #[test]
    fn pixel_outside_buffer_is_none() {
        let mut pixels = buffer(2, 2);
        let frame = Frame::new(&mut pixels, 2, 2);
        assert_eq!(frame.pixel(-1, 0), None);
        assert_eq!(frame.pixel(2, 0), None);
    }
}
