//! Legacy sprite-sheet glyph source.
//!
//! The sheet is a fixed-layout grid: [`SHEET_COLUMNS`] columns of
//! fixed-size cells separated by fixed gaps, one cell per tag in
//! [`runic::universe`] order, filling rows top to bottom. Dark sheet pixels
//! are ink; everything else is background.

use core::fmt;
use std::path::Path;
use std::sync::Arc;

use embedded_graphics::{pixelcolor::PixelColor, prelude::*, Pixel};
use image::GrayImage;
use runic::{universe, Tag};
use runic_render::{GlyphDrawable, GlyphSource, MissingGlyph, SpriteCommand, SpriteRegion};

/// Number of glyph columns in a sheet.
pub const SHEET_COLUMNS: u32 = 6;

/// Luma threshold below which a sheet pixel counts as ink.
const INK_THRESHOLD: u8 = 128;

/// Fixed cell and gap geometry of a sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    pub gap_x: u32,
    pub gap_y: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            cell_width: 64,
            cell_height: 208,
            gap_x: 8,
            gap_y: 8,
        }
    }
}

impl SheetLayout {
    /// Minimum sheet width required to hold a full row.
    fn required_width(&self) -> u32 {
        SHEET_COLUMNS * self.cell_width + (SHEET_COLUMNS - 1) * self.gap_x
    }
}

/// Error loading or validating a sprite sheet.
#[derive(Debug)]
pub enum SpriteSheetError {
    /// The sheet file could not be opened or decoded.
    Image(image::ImageError),
    /// The sheet is narrower than one full row of cells.
    TooNarrow { width: u32, required: u32 },
}

impl fmt::Display for SpriteSheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(err) => write!(f, "unable to load sprite sheet: {}", err),
            Self::TooNarrow { width, required } => write!(
                f,
                "sprite sheet too narrow for {} columns: {} < {}",
                SHEET_COLUMNS, width, required
            ),
        }
    }
}

impl std::error::Error for SpriteSheetError {}

impl From<image::ImageError> for SpriteSheetError {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

/// Alternative implementation of the glyph-source contract backed by a
/// bitmap sheet instead of the vector table.
///
/// Honors the same tag universe and the same [`MissingGlyph`] signal: a tag
/// whose cell falls below the bottom of the sheet is reported missing, never
/// substituted.
#[derive(Clone, Debug)]
pub struct SpriteGlyphs {
    sheet: Arc<GrayImage>,
    layout: SheetLayout,
}

impl SpriteGlyphs {
    /// Loads a sheet with the default layout.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SpriteSheetError> {
        Self::load_with_layout(path, SheetLayout::default())
    }

    pub fn load_with_layout<P: AsRef<Path>>(
        path: P,
        layout: SheetLayout,
    ) -> Result<Self, SpriteSheetError> {
        let sheet = image::open(path)?.to_luma8();
        Self::from_image(sheet, layout)
    }

    pub fn from_image(sheet: GrayImage, layout: SheetLayout) -> Result<Self, SpriteSheetError> {
        if sheet.width() < layout.required_width() {
            return Err(SpriteSheetError::TooNarrow {
                width: sheet.width(),
                required: layout.required_width(),
            });
        }
        log::debug!(
            "sprite sheet loaded: {}x{} px, cell {}x{}",
            sheet.width(),
            sheet.height(),
            layout.cell_width,
            layout.cell_height
        );
        Ok(Self {
            sheet: Arc::new(sheet),
            layout,
        })
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Sheet region of `tag`, addressed by its position in the universe
    /// enumeration.
    pub fn region(&self, tag: Tag) -> Result<SpriteRegion, MissingGlyph> {
        let index = universe()
            .iter()
            .position(|t| *t == tag)
            .ok_or(MissingGlyph { tag })?;

        let column = index as u32 % SHEET_COLUMNS;
        let row = index as u32 / SHEET_COLUMNS;
        let region = SpriteRegion {
            x: column * (self.layout.cell_width + self.layout.gap_x),
            y: row * (self.layout.cell_height + self.layout.gap_y),
            width: self.layout.cell_width,
            height: self.layout.cell_height,
        };

        if region.y + region.height > self.sheet.height() {
            return Err(MissingGlyph { tag });
        }
        Ok(region)
    }

    /// Blits `command`'s region into its destination rectangle, nearest
    /// neighbor, painting ink pixels in `color`.
    pub(crate) fn blit<D, C>(
        &self,
        display: &mut D,
        color: C,
        command: &SpriteCommand,
    ) -> Result<(), D::Error>
    where
        C: PixelColor,
        D: DrawTarget<Color = C>,
    {
        let dst_w = command.width.round().max(1.0) as u32;
        let dst_h = command.height.round().max(1.0) as u32;
        let dst_x = command.x.round() as i32;
        let dst_y = command.y.round() as i32;
        let region = command.region;

        let mut ink = Vec::new();
        for y in 0..dst_h {
            let src_y = region.y + y * region.height / dst_h;
            for x in 0..dst_w {
                let src_x = region.x + x * region.width / dst_w;
                let Some(pixel) = self.sheet.get_pixel_checked(src_x, src_y) else {
                    continue;
                };
                if pixel.0[0] < INK_THRESHOLD {
                    ink.push(Pixel(
                        Point::new(dst_x + x as i32, dst_y + y as i32),
                        color,
                    ));
                }
            }
        }
        display.draw_iter(ink)
    }
}

impl GlyphSource for SpriteGlyphs {
    fn resolve(&self, tag: Tag) -> Result<GlyphDrawable<'_>, MissingGlyph> {
        self.region(tag).map(GlyphDrawable::Sprite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Framebuffer;
    use embedded_graphics::pixelcolor::Rgb888;
    use image::Luma;

    fn layout() -> SheetLayout {
        SheetLayout {
            cell_width: 4,
            cell_height: 8,
            gap_x: 2,
            gap_y: 2,
        }
    }

    fn full_sheet() -> GrayImage {
        let layout = layout();
        let rows = (universe().len() as u32).div_ceil(SHEET_COLUMNS);
        let width = SHEET_COLUMNS * (layout.cell_width + layout.gap_x);
        let height = rows * (layout.cell_height + layout.gap_y);
        // Ink everywhere; gaps stay irrelevant because regions never span
        // them.
        GrayImage::from_pixel(width, height, Luma([0]))
    }

    #[test]
    fn regions_follow_row_major_universe_order() {
        let sprites = SpriteGlyphs::from_image(full_sheet(), layout()).unwrap();
        let first = universe()[0];
        let seventh = universe()[SHEET_COLUMNS as usize];

        let region = sprites.region(first).unwrap();
        assert_eq!((region.x, region.y), (0, 0));
        assert_eq!(region.width, 4);
        assert_eq!(region.height, 8);

        let region = sprites.region(seventh).unwrap();
        assert_eq!((region.x, region.y), (0, 10));
    }

    #[test]
    fn every_tag_has_a_region_on_a_full_sheet() {
        let sprites = SpriteGlyphs::from_image(full_sheet(), layout()).unwrap();
        for tag in universe() {
            assert!(sprites.region(*tag).is_ok(), "no region for {:?}", tag);
        }
    }

    #[test]
    fn undersized_sheet_reports_missing_glyphs() {
        let layout = layout();
        let width = SHEET_COLUMNS * (layout.cell_width + layout.gap_x);
        // Room for exactly one row of cells.
        let sheet = GrayImage::from_pixel(width, layout.cell_height, Luma([255]));
        let sprites = SpriteGlyphs::from_image(sheet, layout).unwrap();

        assert!(sprites.region(universe()[0]).is_ok());
        let below = universe()[SHEET_COLUMNS as usize];
        assert_eq!(sprites.region(below), Err(MissingGlyph { tag: below }));
    }

    #[test]
    fn too_narrow_sheet_is_rejected_at_load() {
        let sheet = GrayImage::from_pixel(8, 64, Luma([255]));
        match SpriteGlyphs::from_image(sheet, layout()) {
            Err(SpriteSheetError::TooNarrow { width: 8, .. }) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn blit_paints_ink_pixels_in_the_stroke_color() {
        let sprites = SpriteGlyphs::from_image(full_sheet(), layout()).unwrap();
        let region = sprites.region(universe()[0]).unwrap();
        let command = SpriteCommand {
            region,
            x: 2.0,
            y: 3.0,
            width: 4.0,
            height: 8.0,
        };
        let mut frame = Framebuffer::new(12, 16);
        sprites
            .blit(&mut frame, Rgb888::BLACK, &command)
            .unwrap();
        assert_eq!(frame.pixel(2, 3), Some(Rgb888::BLACK));
        assert_eq!(frame.pixel(5, 10), Some(Rgb888::BLACK));
        assert_eq!(frame.pixel(0, 0), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(7, 3), Some(Rgb888::WHITE));
    }
}
