//! Concrete render surfaces: the per-line framebuffer and the stacked
//! document compositor.

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    Pixel,
};

/// Owned RGB surface one line renders into.
///
/// Fresh framebuffers are white; out-of-bounds writes are dropped.
#[derive(Clone, Debug)]
pub struct Framebuffer {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width.saturating_mul(height) as usize;
        Self {
            size: Size::new(width, height),
            pixels: vec![Rgb888::WHITE; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Color at (`x`, `y`), or `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb888> {
        if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
            return None;
        }
        let index = (y as u32 * self.size.width + x as u32) as usize;
        self.pixels.get(index).copied()
    }

    /// Copies the surface into an [`image::RgbImage`].
    pub fn to_image(&self) -> image::RgbImage {
        let mut out = image::RgbImage::new(self.size.width, self.size.height);
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let index = (y * self.size.width + x) as usize;
            let color = self.pixels[index];
            *pixel = image::Rgb([color.r(), color.g(), color.b()]);
        }
        out
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = self.size.width as i32;
        let h = self.size.height as i32;
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= w || point.y >= h {
                continue;
            }
            let index = (point.y as u32 * self.size.width + point.x as u32) as usize;
            self.pixels[index] = color;
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for pixel in &mut self.pixels {
            *pixel = color;
        }
        Ok(())
    }
}

/// Zero-gap vertical stack of independently sized line surfaces.
///
/// The composite width is the widest line and the height the sum of line
/// heights. Lookups outside every line, or to the right of the owning
/// line's own extent, read as white.
#[derive(Clone, Debug, Default)]
pub struct LineStack {
    lines: Vec<Framebuffer>,
}

impl LineStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Framebuffer) {
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.lines.iter().map(Framebuffer::width).max().unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        self.lines.iter().map(Framebuffer::height).sum()
    }

    /// Color of the composite at (`x`, `y`).
    ///
    /// Walks the lines in order, accumulating vertical extents, and routes
    /// the lookup into the line whose range contains `y`.
    pub fn color_at(&self, x: i32, y: i32) -> Rgb888 {
        let mut top = 0i32;
        for line in &self.lines {
            let bottom = top + line.height() as i32;
            if y >= top && y < bottom {
                return line.pixel(x, y - top).unwrap_or(Rgb888::WHITE);
            }
            top = bottom;
        }
        Rgb888::WHITE
    }

    /// Flattens the stack into one [`image::RgbImage`].
    pub fn to_image(&self) -> image::RgbImage {
        let width = self.width();
        let height = self.height();
        let mut out = image::RgbImage::new(width, height);
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let color = self.color_at(x as i32, y as i32);
            *pixel = image::Rgb([color.r(), color.g(), color.b()]);
        }
        out
    }
}
