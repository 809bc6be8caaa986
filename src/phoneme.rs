//! The fixed tag universe: consonants, vowels, punctuation, the space, and
//! the reversing-circle marker.
//!
//! The universe is closed. A [`Tag`] can only name one of the entries below,
//! so downstream code may treat tag equality as entry identity and rely on
//! every tag having a glyph.

use core::fmt;
use std::sync::OnceLock;

/// American-English IPA consonants recognized by the tokenizer.
const CONSONANTS: &[&str] = &[
    "b", "tʃ", "d", "f", "ɡ", "h", "dʒ", "k", "l", "ɫ", "m", "n", "ŋ", "p",
    "ɹ", "s", "ʃ", "t", "θ", "ð", "v", "w", "j", "z", "ʒ",
];

/// American-English IPA vowels recognized by the tokenizer.
const VOWELS: &[&str] = &[
    "æ", "ɑɹ", "ɑ", "ɔ", "eɪ", "ɛ", "i", "ɪɹ", "ə", "ɛɹ", "ɪ", "aɪ", "ɝ",
    "oʊ", "ɔɪ", "u", "ʊ", "aʊ", "ɔɹ", "ʊɹ",
];

/// Punctuation carried through from the source text.
const PUNCTUATION: &[&str] = &[".", ",", "!", "?", "-"];

/// One recognized phoneme, punctuation mark, the inter-word space, or the
/// reversing-circle marker.
///
/// A `Tag` is a handle to the canonical spelling of one universe entry; two
/// tags compare equal exactly when they name the same entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(&'static str);

/// Phonetic class of a [`Tag`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagClass {
    Consonant,
    Vowel,
    Punctuation,
    Space,
    Circle,
}

impl Tag {
    /// The inter-word space.
    pub const SPACE: Tag = Tag(" ");
    /// The marker appended to a cell whose vowel precedes its consonant.
    pub const CIRCLE: Tag = Tag("*");

    /// Looks up `text` in the universe, returning its canonical tag.
    pub fn parse(text: &str) -> Option<Tag> {
        universe().iter().copied().find(|tag| tag.0 == text)
    }

    /// Canonical spelling of this tag.
    pub fn as_str(self) -> &'static str {
        self.0
    }

    /// Phonetic class of this tag.
    pub fn class(self) -> TagClass {
        if self == Self::SPACE {
            TagClass::Space
        } else if self == Self::CIRCLE {
            TagClass::Circle
        } else if CONSONANTS.contains(&self.0) {
            TagClass::Consonant
        } else if VOWELS.contains(&self.0) {
            TagClass::Vowel
        } else {
            // Tags only come from the universe tables, so the remainder is
            // punctuation by construction.
            TagClass::Punctuation
        }
    }

    pub fn is_consonant(self) -> bool {
        self.class() == TagClass::Consonant
    }

    pub fn is_vowel(self) -> bool {
        self.class() == TagClass::Vowel
    }

    /// True for consonants and vowels.
    pub fn is_letter(self) -> bool {
        matches!(self.class(), TagClass::Consonant | TagClass::Vowel)
    }

    /// True for punctuation and the reversing circle.
    pub fn is_symbol(self) -> bool {
        matches!(self.class(), TagClass::Punctuation | TagClass::Circle)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Every valid tag, in the fixed enumeration order: consonants, vowels,
/// punctuation, space, circle.
///
/// The order is part of the public contract; the sprite-sheet glyph backend
/// addresses its cells by position in this sequence.
pub fn universe() -> &'static [Tag] {
    static UNIVERSE: OnceLock<Vec<Tag>> = OnceLock::new();
    UNIVERSE.get_or_init(|| {
        let mut out = Vec::with_capacity(CONSONANTS.len() + VOWELS.len() + PUNCTUATION.len() + 2);
        out.extend(CONSONANTS.iter().copied().map(Tag));
        out.extend(VOWELS.iter().copied().map(Tag));
        out.extend(PUNCTUATION.iter().copied().map(Tag));
        out.push(Tag::SPACE);
        out.push(Tag::CIRCLE);
        out
    })
}

/// All valid tags sorted by descending encoded length.
///
/// Longest-prefix matching scans this list in order, so a two-character tag
/// such as `ɑɹ` always matches before the one-character `ɑ` that is its
/// textual prefix.
pub fn prefixes() -> &'static [Tag] {
    static PREFIXES: OnceLock<Vec<Tag>> = OnceLock::new();
    PREFIXES.get_or_init(|| {
        let mut out: Vec<Tag> = universe().to_vec();
        out.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_has_expected_shape() {
        assert_eq!(CONSONANTS.len(), 25);
        assert_eq!(VOWELS.len(), 20);
        assert_eq!(PUNCTUATION.len(), 5);
        assert_eq!(universe().len(), 25 + 20 + 5 + 2);
    }

    #[test]
    fn universe_entries_are_unique() {
        for (i, a) in universe().iter().enumerate() {
            for b in &universe()[i + 1..] {
                assert_ne!(a, b, "duplicate universe entry {}", a);
            }
        }
    }

    #[test]
    fn parse_roundtrips_every_tag() {
        for tag in universe() {
            assert_eq!(Tag::parse(tag.as_str()), Some(*tag));
        }
        assert_eq!(Tag::parse("x"), None);
        assert_eq!(Tag::parse("ɑɹɹ"), None);
    }

    #[test]
    fn prefixes_sorted_by_descending_length() {
        let table = prefixes();
        for pair in table.windows(2) {
            assert!(pair[0].as_str().len() >= pair[1].as_str().len());
        }
        assert_eq!(table.len(), universe().len());
    }

    #[test]
    fn no_tag_shadowed_by_a_shorter_prefix() {
        // Wherever one tag is a strict textual prefix of another, the longer
        // tag must sort earlier so greedy matching picks it first.
        let table = prefixes();
        let index_of = |tag: &Tag| table.iter().position(|t| t == tag);
        for long in table {
            for short in table {
                if long.as_str().len() > short.as_str().len()
                    && long.as_str().starts_with(short.as_str())
                {
                    assert!(
                        index_of(long) < index_of(short),
                        "{} shadowed by {}",
                        long,
                        short
                    );
                }
            }
        }
    }

    #[test]
    fn classes_partition_the_universe() {
        assert_eq!(Tag::SPACE.class(), TagClass::Space);
        assert_eq!(Tag::CIRCLE.class(), TagClass::Circle);
        assert!(Tag::parse("tʃ").is_some_and(Tag::is_consonant));
        assert!(Tag::parse("aʊ").is_some_and(Tag::is_vowel));
        assert!(Tag::parse("?").is_some_and(Tag::is_symbol));
        assert!(Tag::CIRCLE.is_symbol());
        assert!(!Tag::SPACE.is_letter());
        assert!(!Tag::SPACE.is_symbol());
        for tag in universe() {
            let class = tag.class();
            assert_eq!(tag.is_letter(), matches!(class, TagClass::Consonant | TagClass::Vowel));
        }
    }
}
