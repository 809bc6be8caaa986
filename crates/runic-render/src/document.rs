//! Cell document, layout, and the device-space draw-command stream.

use runic::{cells, normalize, RuneCell};
use serde::{Deserialize, Serialize};

use crate::glyph::{GlyphDrawable, GlyphSource, MissingGlyph, PathElement, SpriteRegion};
use crate::{CELL_UNITS_TALL, CELL_UNITS_WIDE};

/// Cell width as a fraction of the text height.
pub const LETTER_WIDTH_RATIO: f32 = 0.6;

/// Presentation parameters for a rendered line.
///
/// Stroke color is a backend concern and is configured on the executing
/// renderer, not here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Cell text height in pixels.
    pub text_height: f32,
    /// Stroke thickness in pixels, before scaling.
    pub thickness: f32,
    /// Extra horizontal advance between cells; negative tightens spacing.
    pub kerning: f32,
    /// Output scale multiplier applied to every emitted coordinate.
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            text_height: 72.0,
            thickness: 5.0,
            kerning: 0.0,
            scale: 1.0,
        }
    }
}

impl RenderConfig {
    /// Width of one cell in unscaled pixels.
    pub fn cell_width(&self) -> f32 {
        LETTER_WIDTH_RATIO * self.text_height
    }

    /// Horizontal pitch between consecutive cells in unscaled pixels.
    pub fn advance(&self) -> f32 {
        self.cell_width() + self.kerning
    }
}

/// Straight stroke in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineCommand {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub thickness: f32,
}

/// Stroked ellipse outline in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseCommand {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
    pub thickness: f32,
}

/// Stroked elliptical arc in device pixels. Angles are degrees with 0 at +x
/// and positive values sweeping toward +y (downward on screen).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcCommand {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
    pub start_deg: f32,
    pub sweep_deg: f32,
    pub thickness: f32,
}

/// Filled dot in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotCommand {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

/// Blit of a sprite-sheet region into a destination cell rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteCommand {
    pub region: SpriteRegion,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One backend-agnostic drawing operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Line(LineCommand),
    Ellipse(EllipseCommand),
    Arc(ArcCommand),
    Dot(DotCommand),
    Sprite(SpriteCommand),
}

/// An append-only sequence of rune cells forming one rendered line.
///
/// A document is owned by exactly one caller; separate documents may be laid
/// out and drawn in parallel because the glyph table behind them is
/// read-only.
#[derive(Clone, Debug, Default)]
pub struct Document {
    cells: Vec<RuneCell>,
    config: RenderConfig,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            cells: Vec::new(),
            config,
        }
    }

    /// Appends a run of IPA words.
    ///
    /// The text is normalized, split on whitespace runs, and each word is
    /// tokenized independently; one empty cell separates consecutive words,
    /// and one is inserted ahead of the first word when the document already
    /// has content. Text that normalizes to nothing appends nothing.
    pub fn append(&mut self, text: &str) {
        let normalized = normalize(text);
        let mut first = true;
        for word in normalized.split_whitespace() {
            if !first || !self.cells.is_empty() {
                self.cells.push(RuneCell::empty());
            }
            first = false;
            self.cells.extend(cells(word));
        }
    }

    /// Appends a single pre-built cell. This is the low-level path under
    /// [`append`](Self::append); it never inserts separators.
    pub fn push_cell(&mut self, cell: RuneCell) {
        self.cells.push(cell);
    }

    pub fn cells(&self) -> &[RuneCell] {
        &self.cells
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Content size in device pixels for the current cell count, with the
    /// origin at (0, 0).
    ///
    /// This is a minimum content bound: strokes have thickness and round
    /// caps, so callers should pad outward proportionally to the configured
    /// thickness before sizing a surface.
    pub fn size(&self) -> (u32, u32) {
        let width = self.cells.len() as f32 * self.config.advance() * self.config.scale;
        let height = self.config.text_height * self.config.scale;
        (width.max(0.0).ceil() as u32, height.ceil() as u32)
    }

    /// Lays the document out with its top-left corner at
    /// (`origin_x`, `origin_y`) unscaled pixels and resolves every cell
    /// against `source`.
    ///
    /// Cell `i` sits at horizontal offset `i × advance`. Empty cells occupy
    /// their slot and emit nothing. The tags of one cell are resolved in tag
    /// order and emitted through one shared cell transform, so strokes from
    /// different tags land in the same space and cross cleanly.
    pub fn draw_commands<S>(
        &self,
        origin_x: f32,
        origin_y: f32,
        source: &S,
    ) -> Result<Vec<DrawCommand>, MissingGlyph>
    where
        S: GlyphSource + ?Sized,
    {
        let scale = self.config.scale;
        let sx = self.config.cell_width() / CELL_UNITS_WIDE;
        let sy = self.config.text_height / CELL_UNITS_TALL;
        let thickness = self.config.thickness * scale;

        let mut out = Vec::new();
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }

            let left = origin_x + i as f32 * self.config.advance();
            for tag in cell.tags() {
                match source.resolve(*tag)? {
                    GlyphDrawable::Path(path) => {
                        for element in path.elements() {
                            out.push(transform_element(
                                element, left, origin_y, sx, sy, scale, thickness,
                            ));
                        }
                    }
                    GlyphDrawable::Sprite(region) => {
                        out.push(DrawCommand::Sprite(SpriteCommand {
                            region,
                            x: left * scale,
                            y: origin_y * scale,
                            width: self.config.cell_width() * scale,
                            height: self.config.text_height * scale,
                        }));
                    }
                }
            }
        }

        log::debug!(
            "laid out {} cells into {} draw commands",
            self.cells.len(),
            out.len()
        );
        Ok(out)
    }
}

fn transform_element(
    element: &PathElement,
    left: f32,
    top: f32,
    sx: f32,
    sy: f32,
    scale: f32,
    thickness: f32,
) -> DrawCommand {
    let px = |x: f32| (left + x * sx) * scale;
    let py = |y: f32| (top + y * sy) * scale;

    match *element {
        PathElement::Line { x0, y0, x1, y1 } => DrawCommand::Line(LineCommand {
            x0: px(x0),
            y0: py(y0),
            x1: px(x1),
            y1: py(y1),
            thickness,
        }),
        PathElement::Ellipse { cx, cy, rx, ry } => DrawCommand::Ellipse(EllipseCommand {
            cx: px(cx),
            cy: py(cy),
            rx: rx * sx * scale,
            ry: ry * sy * scale,
            thickness,
        }),
        PathElement::Arc {
            cx,
            cy,
            r,
            start_deg,
            sweep_deg,
        } => DrawCommand::Arc(ArcCommand {
            cx: px(cx),
            cy: py(cy),
            rx: r * sx * scale,
            ry: r * sy * scale,
            start_deg,
            sweep_deg,
            thickness,
        }),
        PathElement::Dot { cx, cy, r } => DrawCommand::Dot(DotCommand {
            cx: px(cx),
            cy: py(cy),
            r: r * sy * scale,
        }),
    }
}
