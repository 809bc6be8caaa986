//! embedded-graphics execution backend for `runic-render` draw commands.
//!
//! The render crate emits backend-agnostic stroke commands; this crate
//! executes them on any [`DrawTarget`], realizing round caps and joins by
//! stamping filled end dots on every stroke. It also owns the concrete
//! surfaces: the [`Framebuffer`] a single line renders into, the
//! [`LineStack`] compositor that stacks lines into one document image, and
//! the legacy [`SpriteGlyphs`] sheet backend.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod sprite;
mod surface;

pub use sprite::{SheetLayout, SpriteGlyphs, SpriteSheetError, SHEET_COLUMNS};
pub use surface::{Framebuffer, LineStack};

use embedded_graphics::{
    pixelcolor::{PixelColor, Rgb888},
    prelude::*,
    primitives::{Circle, Ellipse, Line, PrimitiveStyle},
};
use runic_render::{
    ArcCommand, DotCommand, DrawCommand, EllipseCommand, LineCommand, SpriteCommand,
};

/// Number of straight spans used to approximate one arc.
const ARC_STEPS: usize = 24;

/// Executes draw commands with one stroke color.
///
/// Holds no mutable state; one renderer may serve any number of documents
/// drawn to independent targets.
#[derive(Clone, Debug)]
pub struct EgRenderer<C> {
    color: C,
    sprites: Option<SpriteGlyphs>,
}

impl Default for EgRenderer<Rgb888> {
    fn default() -> Self {
        Self::new(Rgb888::BLACK)
    }
}

impl<C: PixelColor> EgRenderer<C> {
    pub fn new(color: C) -> Self {
        Self {
            color,
            sprites: None,
        }
    }

    /// Registers the sprite sheet that [`DrawCommand::Sprite`] regions
    /// refer to. Without one, sprite commands are skipped with a warning.
    pub fn with_sprites(mut self, sprites: SpriteGlyphs) -> Self {
        self.sprites = Some(sprites);
        self
    }

    pub fn color(&self) -> C {
        self.color
    }

    /// Executes `commands` onto `display`.
    pub fn render<D>(&self, commands: &[DrawCommand], display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        for command in commands {
            self.draw_command(display, command)?;
        }
        Ok(())
    }

    fn draw_command<D>(&self, display: &mut D, command: &DrawCommand) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        match command {
            DrawCommand::Line(line) => self.draw_line(display, line),
            DrawCommand::Ellipse(ellipse) => self.draw_ellipse(display, ellipse),
            DrawCommand::Arc(arc) => self.draw_arc(display, arc),
            DrawCommand::Dot(dot) => self.draw_dot(display, dot),
            DrawCommand::Sprite(sprite) => self.draw_sprite(display, sprite),
        }
    }

    fn draw_line<D>(&self, display: &mut D, line: &LineCommand) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        self.stroke(display, line.x0, line.y0, line.x1, line.y1, line.thickness)
    }

    fn draw_ellipse<D>(&self, display: &mut D, ellipse: &EllipseCommand) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let width = stroke_width(ellipse.thickness);
        let top_left = device_point(ellipse.cx - ellipse.rx, ellipse.cy - ellipse.ry);
        let size = Size::new(
            (ellipse.rx * 2.0).round().max(1.0) as u32,
            (ellipse.ry * 2.0).round().max(1.0) as u32,
        );
        Ellipse::new(top_left, size)
            .into_styled(PrimitiveStyle::with_stroke(self.color, width))
            .draw(display)
    }

    fn draw_arc<D>(&self, display: &mut D, arc: &ArcCommand) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let start = arc.start_deg.to_radians();
        let sweep = arc.sweep_deg.to_radians();
        let point_at = |angle: f32| {
            (
                arc.cx + arc.rx * angle.cos(),
                arc.cy + arc.ry * angle.sin(),
            )
        };

        let (mut prev_x, mut prev_y) = point_at(start);
        for step in 1..=ARC_STEPS {
            let angle = start + sweep * step as f32 / ARC_STEPS as f32;
            let (x, y) = point_at(angle);
            self.stroke(display, prev_x, prev_y, x, y, arc.thickness)?;
            prev_x = x;
            prev_y = y;
        }
        Ok(())
    }

    fn draw_dot<D>(&self, display: &mut D, dot: &DotCommand) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let diameter = (dot.r * 2.0).round().max(1.0) as u32;
        Circle::with_center(device_point(dot.cx, dot.cy), diameter)
            .into_styled(PrimitiveStyle::with_fill(self.color))
            .draw(display)
    }

    fn draw_sprite<D>(&self, display: &mut D, sprite: &SpriteCommand) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let Some(sprites) = &self.sprites else {
            log::warn!("sprite draw command without a registered sheet; skipping");
            return Ok(());
        };
        sprites.blit(display, self.color, sprite)
    }

    /// One thick stroke segment with round end caps.
    ///
    /// Consecutive segments of an arc and crossing strokes within a cell
    /// share end dots, which is what makes their joins round.
    fn stroke<D>(
        &self,
        display: &mut D,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        thickness: f32,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let width = stroke_width(thickness);
        Line::new(device_point(x0, y0), device_point(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(self.color, width))
            .draw(display)?;

        if width > 1 {
            for (x, y) in [(x0, y0), (x1, y1)] {
                Circle::with_center(device_point(x, y), width)
                    .into_styled(PrimitiveStyle::with_fill(self.color))
                    .draw(display)?;
            }
        }
        Ok(())
    }
}

fn stroke_width(thickness: f32) -> u32 {
    thickness.round().max(1.0) as u32
}

fn device_point(x: f32, y: f32) -> Point {
    Point::new(x.round() as i32, y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use runic_render::{Document, VectorGlyphs};

    fn ink_count(frame: &Framebuffer) -> usize {
        let mut count = 0;
        for y in 0..frame.height() as i32 {
            for x in 0..frame.width() as i32 {
                if frame.pixel(x, y) != Some(Rgb888::WHITE) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn rendering_a_letter_marks_pixels() {
        let mut doc = Document::new();
        doc.append("t");
        let (w, h) = doc.size();
        let mut frame = Framebuffer::new(w + 40, h + 40);
        let commands = doc
            .draw_commands(20.0, 20.0, VectorGlyphs::shared())
            .unwrap();
        EgRenderer::default().render(&commands, &mut frame).unwrap();
        assert!(ink_count(&frame) > 0);
    }

    #[test]
    fn empty_document_renders_nothing() {
        let doc = Document::new();
        let mut frame = Framebuffer::new(16, 16);
        let commands = doc
            .draw_commands(0.0, 0.0, VectorGlyphs::shared())
            .unwrap();
        EgRenderer::default().render(&commands, &mut frame).unwrap();
        assert_eq!(ink_count(&frame), 0);
    }

    #[test]
    fn stroke_color_is_respected() {
        let red = Rgb888::new(200, 0, 0);
        let mut doc = Document::new();
        doc.append("t");
        let (w, h) = doc.size();
        let mut frame = Framebuffer::new(w + 40, h + 40);
        let commands = doc
            .draw_commands(20.0, 20.0, VectorGlyphs::shared())
            .unwrap();
        EgRenderer::new(red).render(&commands, &mut frame).unwrap();

        let mut saw_red = false;
        for y in 0..frame.height() as i32 {
            for x in 0..frame.width() as i32 {
                match frame.pixel(x, y) {
                    Some(c) if c == red => saw_red = true,
                    Some(c) => assert_eq!(c, Rgb888::WHITE),
                    None => {}
                }
            }
        }
        assert!(saw_red);
    }

    #[test]
    fn round_caps_widen_segment_endpoints() {
        // A single thick diagonal stroke must mark pixels around both of
        // its endpoints, not just along the spine.
        let command = DrawCommand::Line(LineCommand {
            x0: 10.0,
            y0: 10.0,
            x1: 30.0,
            y1: 24.0,
            thickness: 6.0,
        });
        let mut frame = Framebuffer::new(44, 40);
        EgRenderer::default().render(&[command], &mut frame).unwrap();
        assert_ne!(frame.pixel(8, 10), Some(Rgb888::WHITE));
        assert_ne!(frame.pixel(32, 24), Some(Rgb888::WHITE));
    }
}
