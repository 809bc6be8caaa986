//! The vector glyph table.
//!
//! Letters are not authored individually. A single ordered list of 14
//! lattice segments is the whole stroke vocabulary; each consonant or vowel
//! is a bitmask selecting a subset of it, so every letter is guaranteed to
//! sit on the same lattice as every other. Vowels use only the outer
//! segments and consonants only the inner ones, which is what lets a paired
//! vowel and consonant overlay in one cell without colliding. Punctuation
//! and the reversing circle do not decompose onto the lattice and are
//! defined as parametric primitives instead.

use core::fmt;
use std::collections::HashMap;
use std::sync::OnceLock;

use runic::{universe, Tag};

/// Width of the normalized glyph cell in lattice units.
pub const CELL_UNITS_WIDE: f32 = 2.0;
/// Height of the normalized glyph cell in lattice units.
pub const CELL_UNITS_TALL: f32 = 6.5;

/// Number of entries in the shared segment list.
pub const SEGMENT_COUNT: usize = 14;

/// The shared segment vocabulary, as (x0, y0, x1, y1) lattice coordinates.
///
/// Index 0 is the mid bar every letter carries. Indices 1, 2, 7, 8, 9 and
/// 10 are the outer segments (vowels); 3, 4, 5, 6, 11, 12 and 13 are the
/// inner segments (consonants).
const SEGMENTS: [(f32, f32, f32, f32); SEGMENT_COUNT] = [
    (0.0, 3.0, 2.0, 3.0), // mid bar
    (0.0, 1.0, 1.0, 0.0), // upper-left outer
    (1.0, 0.0, 2.0, 1.0), // upper-right outer
    (0.0, 1.0, 1.0, 2.0), // upper-left inner
    (1.0, 2.0, 2.0, 1.0), // upper-right inner
    (1.0, 0.0, 1.0, 2.0), // top stem
    (1.0, 2.0, 1.0, 3.0), // center stem
    (0.0, 1.0, 0.0, 3.0), // left post, upper
    (0.0, 4.0, 0.0, 5.0), // left post, lower
    (0.0, 5.0, 1.0, 6.0), // lower-left outer
    (1.0, 6.0, 2.0, 5.0), // lower-right outer
    (1.0, 4.0, 1.0, 6.0), // lower stem
    (0.0, 5.0, 1.0, 4.0), // lower-left inner
    (1.0, 4.0, 2.0, 5.0), // lower-right inner
];

/// Segment masks for consonants. Bit `k`, counted from the most significant
/// used bit down, enables `SEGMENTS[k]`.
const CONSONANT_MASKS: &[(&str, u16)] = &[
    ("b", 0b10_0000_1000_0010),
    ("tʃ", 0b10_0010_1000_0001),
    ("d", 0b10_0001_1000_0011),
    ("f", 0b10_0100_1000_0001),
    ("ɡ", 0b10_0010_1000_0010),
    ("h", 0b10_0001_1000_0001),
    ("dʒ", 0b10_0000_1000_0001),
    ("k", 0b10_0011_1000_0000),
    ("l", 0b10_0001_1000_0100),
    ("ɫ", 0b10_0001_1000_0110),
    ("m", 0b10_0110_0000_0000),
    ("n", 0b10_0110_0000_0001),
    ("ŋ", 0b10_0110_0000_0011),
    ("p", 0b10_0101_0000_0100),
    ("ɹ", 0b10_0100_1000_0010),
    ("s", 0b10_0001_1000_0010),
    ("ʃ", 0b10_0111_1000_0100),
    ("t", 0b10_0110_1000_0100),
    ("θ", 0b10_0111_1000_0000),
    ("ð", 0b10_0111_1000_0011),
    ("v", 0b10_0000_1000_0110),
    ("w", 0b10_0011_0000_0000),
    ("j", 0b10_0001_0000_0010),
    ("z", 0b10_0001_0000_0011),
    ("ʒ", 0b10_0000_1000_0101),
];

/// Segment masks for vowels.
const VOWEL_MASKS: &[(&str, u16)] = &[
    ("æ", 0b10_0000_0110_0000),
    ("ɑɹ", 0b11_1000_0110_0000),
    ("ɑ", 0b11_1000_0111_1000),
    ("ɔ", 0b10_0000_0111_0000),
    ("eɪ", 0b11_0000_0100_0000),
    ("ɛ", 0b10_0000_0111_1000),
    ("i", 0b10_0000_0110_1000),
    ("ɪɹ", 0b11_0000_0001_0000),
    ("ə", 0b11_1000_0000_0000),
    ("ɛɹ", 0b11_1000_0001_1000),
    ("ɪ", 0b10_0000_0001_0000),
    ("aɪ", 0b10_0000_0100_0000),
    ("ɝ", 0b11_1000_0110_1000),
    ("oʊ", 0b10_1000_0001_1000),
    ("ɔɪ", 0b10_1000_0000_1000),
    ("u", 0b11_1000_0001_0000),
    ("ʊ", 0b11_1000_0000_1000),
    ("aʊ", 0b11_0000_0000_0000),
    ("ɔɹ", 0b10_1000_0001_0000),
    ("ʊɹ", 0b10_0000_0001_1000),
];

/// Outer-segment bits available to vowels, plus the mid bar.
const VOWEL_SEGMENT_BITS: u16 = mask_of(&[0, 1, 2, 7, 8, 9, 10]);
/// Inner-segment bits available to consonants, plus the mid bar.
const CONSONANT_SEGMENT_BITS: u16 = mask_of(&[0, 3, 4, 5, 6, 11, 12, 13]);

const fn mask_of(segments: &[usize]) -> u16 {
    let mut mask = 0u16;
    let mut i = 0;
    while i < segments.len() {
        mask |= 1 << (SEGMENT_COUNT - 1 - segments[i]);
        i += 1;
    }
    mask
}

/// One primitive of a glyph path, in normalized cell coordinates
/// (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathElement {
    /// Straight stroke.
    Line { x0: f32, y0: f32, x1: f32, y1: f32 },
    /// Stroked ellipse outline.
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    /// Stroked circular arc. Angles are degrees with 0 at +x and positive
    /// values sweeping toward +y (downward on screen).
    Arc {
        cx: f32,
        cy: f32,
        r: f32,
        start_deg: f32,
        sweep_deg: f32,
    },
    /// Filled dot.
    Dot { cx: f32, cy: f32, r: f32 },
}

/// The immutable vector shape of one tag.
///
/// Built once at table construction and shared read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphPath {
    elements: Vec<PathElement>,
}

impl GlyphPath {
    fn from_mask(mask: u16) -> Self {
        let mut elements = Vec::new();
        for (k, &(x0, y0, x1, y1)) in SEGMENTS.iter().enumerate() {
            if mask & (1 << (SEGMENT_COUNT - 1 - k)) != 0 {
                elements.push(PathElement::Line { x0, y0, x1, y1 });
            }
        }
        Self { elements }
    }

    fn from_elements(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    /// The primitives of this path, in draw order.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Pixel-space region of a sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// What a glyph source hands back for a tag: either a vector path or a
/// region of a backend-registered sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlyphDrawable<'a> {
    Path(&'a GlyphPath),
    Sprite(SpriteRegion),
}

/// Internal-invariant violation: a tag with no glyph reached the renderer.
///
/// The tag universe and the glyph table are built from the same fixed data,
/// so this is unreachable for anything the tokenizer emits; hitting it means
/// the two are out of sync, not that the input was bad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissingGlyph {
    pub tag: Tag,
}

impl fmt::Display for MissingGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no glyph for tag {:?}: glyph source and tokenizer are out of sync",
            self.tag.as_str()
        )
    }
}

impl std::error::Error for MissingGlyph {}

/// Capability to resolve a tag to something drawable.
///
/// The vector table and the legacy sprite-sheet backend both implement this;
/// layout code depends only on the trait.
pub trait GlyphSource {
    fn resolve(&self, tag: Tag) -> Result<GlyphDrawable<'_>, MissingGlyph>;
}

/// The built-in vector glyph table.
#[derive(Debug)]
pub struct VectorGlyphs {
    paths: HashMap<Tag, GlyphPath>,
}

impl VectorGlyphs {
    /// The process-wide table, built on first use and never mutated after.
    pub fn shared() -> &'static VectorGlyphs {
        static TABLE: OnceLock<VectorGlyphs> = OnceLock::new();
        TABLE.get_or_init(Self::build)
    }

    fn build() -> Self {
        let mut paths = HashMap::with_capacity(universe().len());

        for &(name, mask) in CONSONANT_MASKS.iter().chain(VOWEL_MASKS) {
            if let Some(tag) = Tag::parse(name) {
                paths.insert(tag, GlyphPath::from_mask(mask));
            } else {
                debug_assert!(false, "glyph mask entry {:?} outside the tag universe", name);
            }
        }

        for (name, path) in symbol_paths() {
            if let Some(tag) = Tag::parse(name) {
                paths.insert(tag, path);
            } else {
                debug_assert!(false, "symbol entry {:?} outside the tag universe", name);
            }
        }

        // The space occupies a slot but draws nothing.
        paths.insert(Tag::SPACE, GlyphPath::default());

        log::debug!("vector glyph table built with {} entries", paths.len());
        Self { paths }
    }

    /// The path for `tag`, or [`MissingGlyph`] for a tag outside the table.
    pub fn path(&self, tag: Tag) -> Result<&GlyphPath, MissingGlyph> {
        self.paths.get(&tag).ok_or(MissingGlyph { tag })
    }
}

impl GlyphSource for VectorGlyphs {
    fn resolve(&self, tag: Tag) -> Result<GlyphDrawable<'_>, MissingGlyph> {
        self.path(tag).map(GlyphDrawable::Path)
    }
}

fn symbol_paths() -> Vec<(&'static str, GlyphPath)> {
    vec![
        (
            ".",
            GlyphPath::from_elements(vec![PathElement::Dot {
                cx: 1.0,
                cy: 5.75,
                r: 0.22,
            }]),
        ),
        (
            ",",
            GlyphPath::from_elements(vec![PathElement::Line {
                x0: 1.15,
                y0: 5.4,
                x1: 0.8,
                y1: 6.4,
            }]),
        ),
        (
            "!",
            GlyphPath::from_elements(vec![
                PathElement::Line {
                    x0: 1.0,
                    y0: 3.9,
                    x1: 1.0,
                    y1: 5.3,
                },
                PathElement::Dot {
                    cx: 1.0,
                    cy: 6.1,
                    r: 0.22,
                },
            ]),
        ),
        (
            "?",
            GlyphPath::from_elements(vec![
                PathElement::Arc {
                    cx: 1.0,
                    cy: 4.35,
                    r: 0.55,
                    start_deg: 180.0,
                    sweep_deg: 270.0,
                },
                PathElement::Line {
                    x0: 1.0,
                    y0: 4.9,
                    x1: 1.0,
                    y1: 5.3,
                },
                PathElement::Dot {
                    cx: 1.0,
                    cy: 6.1,
                    r: 0.22,
                },
            ]),
        ),
        (
            "-",
            GlyphPath::from_elements(vec![PathElement::Line {
                x0: 0.5,
                y0: 3.0,
                x1: 1.5,
                y1: 3.0,
            }]),
        ),
        (
            "*",
            GlyphPath::from_elements(vec![PathElement::Ellipse {
                cx: 1.0,
                cy: 6.0,
                rx: 0.45,
                ry: 0.45,
            }]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use runic::{cells, TagClass};

    #[test]
    fn every_universe_tag_resolves() {
        let table = VectorGlyphs::shared();
        for tag in universe() {
            assert!(table.path(*tag).is_ok(), "no glyph for {:?}", tag);
        }
    }

    #[test]
    fn only_the_space_glyph_is_empty() {
        let table = VectorGlyphs::shared();
        for tag in universe() {
            let path = table.path(*tag).unwrap();
            if *tag == Tag::SPACE {
                assert!(path.is_empty());
            } else {
                assert!(!path.is_empty(), "blank glyph for {:?}", tag);
            }
        }
    }

    #[test]
    fn letter_masks_are_distinct_within_their_class() {
        for masks in [CONSONANT_MASKS, VOWEL_MASKS] {
            for (i, (name_a, mask_a)) in masks.iter().enumerate() {
                for (name_b, mask_b) in &masks[i + 1..] {
                    assert_ne!(mask_a, mask_b, "{} and {} share a shape", name_a, name_b);
                }
            }
        }
    }

    #[test]
    fn masks_cover_exactly_the_letters() {
        let consonants = universe().iter().filter(|t| t.is_consonant()).count();
        let vowels = universe().iter().filter(|t| t.is_vowel()).count();
        assert_eq!(CONSONANT_MASKS.len(), consonants);
        assert_eq!(VOWEL_MASKS.len(), vowels);
        for (name, _) in CONSONANT_MASKS {
            assert_eq!(Tag::parse(name).map(Tag::class), Some(TagClass::Consonant));
        }
        for (name, _) in VOWEL_MASKS {
            assert_eq!(Tag::parse(name).map(Tag::class), Some(TagClass::Vowel));
        }
    }

    #[test]
    fn vowels_and_consonants_use_disjoint_segments() {
        for (name, mask) in CONSONANT_MASKS {
            assert_eq!(
                mask & !CONSONANT_SEGMENT_BITS,
                0,
                "{} uses outer segments",
                name
            );
        }
        for (name, mask) in VOWEL_MASKS {
            assert_eq!(mask & !VOWEL_SEGMENT_BITS, 0, "{} uses inner segments", name);
        }
        // Outside the shared mid bar the two vocabularies are disjoint.
        let mid_bar = mask_of(&[0]);
        assert_eq!(CONSONANT_SEGMENT_BITS & VOWEL_SEGMENT_BITS, mid_bar);
    }

    #[test]
    fn every_letter_carries_the_mid_bar() {
        let mid_bar = mask_of(&[0]);
        for (name, mask) in CONSONANT_MASKS.iter().chain(VOWEL_MASKS) {
            assert_ne!(mask & mid_bar, 0, "{} is missing the mid bar", name);
        }
    }

    #[test]
    fn mask_segment_count_matches_popcount() {
        for (_, mask) in CONSONANT_MASKS.iter().chain(VOWEL_MASKS) {
            let path = GlyphPath::from_mask(*mask);
            assert_eq!(path.elements().len(), mask.count_ones() as usize);
        }
    }

    #[test]
    fn missing_glyph_is_unreachable_for_tokenizer_output() {
        let table = VectorGlyphs::shared();
        // Exercise every pairing the state machine can produce, including
        // the circle marker, and require a glyph for each emitted tag.
        let mut probe = String::new();
        for tag in universe() {
            probe.push_str(tag.as_str());
        }
        probe.push_str(" ɛt tɛ !? ");
        for cell in cells(&probe) {
            for tag in cell.tags() {
                assert!(table.resolve(*tag).is_ok(), "missing glyph for {:?}", tag);
            }
        }
    }

    #[test]
    fn segment_lattice_stays_inside_the_cell() {
        for &(x0, y0, x1, y1) in &SEGMENTS {
            for (x, y) in [(x0, y0), (x1, y1)] {
                assert!((0.0..=CELL_UNITS_WIDE).contains(&x));
                assert!((0.0..=CELL_UNITS_TALL).contains(&y));
            }
        }
    }
}
