//! Glyph table, cell layout, and backend-agnostic draw commands for `runic`.

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

mod document;
mod glyph;

pub use document::{
    ArcCommand, Document, DotCommand, DrawCommand, EllipseCommand, LineCommand, RenderConfig,
    SpriteCommand, LETTER_WIDTH_RATIO,
};
pub use glyph::{
    GlyphDrawable, GlyphPath, GlyphSource, MissingGlyph, PathElement, SpriteRegion, VectorGlyphs,
    CELL_UNITS_TALL, CELL_UNITS_WIDE, SEGMENT_COUNT,
};
