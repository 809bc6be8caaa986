//! Longest-prefix tag matching and rune-cell grouping.
//!
//! [`normalize`] and [`tags`] share one scanning rule: at each position the
//! longest valid tag wins, and a code point that starts no tag is dropped.
//! [`cells`] layers the pairing state machine on top, merging a consonant
//! and a vowel into one cell and marking vowel-first pairs with the
//! reversing circle.

use crate::phoneme::{self, Tag};

/// Everything drawn in one character slot.
///
/// Holds at most one vowel, one consonant, and the reversing circle, in
/// input order; the circle is present exactly when the vowel came first. A
/// cell with no tags is the blank placeholder emitted for a space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuneCell {
    tags: heapless::Vec<Tag, 3>,
}

impl RuneCell {
    /// The blank placeholder cell. It occupies a full slot but draws
    /// nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A cell holding one tag.
    pub fn single(tag: Tag) -> Self {
        let mut cell = Self::default();
        cell.push(tag);
        cell
    }

    /// A consonant-then-vowel cell in natural stroke order.
    pub fn pair(consonant: Tag, vowel: Tag) -> Self {
        let mut cell = Self::default();
        cell.push(consonant);
        cell.push(vowel);
        cell
    }

    /// A vowel-then-consonant cell. Input order is preserved and the
    /// reversing circle is appended to signal the swapped stroke order.
    pub fn reversed(vowel: Tag, consonant: Tag) -> Self {
        let mut cell = Self::default();
        cell.push(vowel);
        cell.push(consonant);
        cell.push(Tag::CIRCLE);
        cell
    }

    /// The tags of this cell, in draw order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn push(&mut self, tag: Tag) {
        // Capacity 3 is structural: one vowel, one consonant, the circle.
        debug_assert!(self.tags.len() < 3);
        let _ = self.tags.push(tag);
    }
}

/// Returns a copy of `text` with everything that is not a valid tag removed.
///
/// Unrecognized code points are dropped one at a time and scanning resumes
/// after them, so the result is the concatenation of exactly the tags that
/// [`tags`] would yield. Normalizing twice is a no-op.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for tag in tags(text) {
        out.push_str(tag.as_str());
    }
    out
}

/// Iterator over the valid tags of `text`, longest match first.
pub fn tags(text: &str) -> Tags<'_> {
    Tags { rest: text }
}

/// See [`tags`].
#[derive(Clone, Debug)]
pub struct Tags<'a> {
    rest: &'a str,
}

impl Iterator for Tags<'_> {
    type Item = Tag;

    fn next(&mut self) -> Option<Tag> {
        while !self.rest.is_empty() {
            if let Some((tag, after)) = cut_valid_prefix(self.rest) {
                self.rest = after;
                return Some(tag);
            }

            let mut chars = self.rest.chars();
            if let Some(dropped) = chars.next() {
                log::trace!("dropping unrecognized input character {:?}", dropped);
            }
            self.rest = chars.as_str();
        }
        None
    }
}

fn cut_valid_prefix(text: &str) -> Option<(Tag, &str)> {
    if let Some(after) = text.strip_prefix(' ') {
        return Some((Tag::SPACE, after));
    }

    for tag in phoneme::prefixes() {
        if let Some(after) = text.strip_prefix(tag.as_str()) {
            return Some((*tag, after));
        }
    }

    None
}

/// Iterator over the rune cells of `text`.
///
/// A letter waits for its successor before a cell is emitted: a consonant
/// followed by a vowel shares the cell in natural order, a vowel followed by
/// a consonant shares the cell with the circle marker appended, and two
/// letters of the same class never merge. Symbols and spaces always get a
/// cell of their own (the space's cell is empty), flushing any waiting
/// letter first. A letter still waiting at end of input is emitted alone.
pub fn cells(text: &str) -> Cells<'_> {
    Cells {
        tags: tags(text),
        pending: None,
        queued: None,
    }
}

/// See [`cells`].
#[derive(Clone, Debug)]
pub struct Cells<'a> {
    tags: Tags<'a>,
    pending: Option<Tag>,
    queued: Option<RuneCell>,
}

impl Iterator for Cells<'_> {
    type Item = RuneCell;

    fn next(&mut self) -> Option<RuneCell> {
        if let Some(cell) = self.queued.take() {
            return Some(cell);
        }

        loop {
            let Some(tag) = self.tags.next() else {
                return self.pending.take().map(RuneCell::single);
            };

            match self.pending.take() {
                None => {
                    if tag.is_letter() {
                        self.pending = Some(tag);
                    } else {
                        return Some(symbol_cell(tag));
                    }
                }
                Some(pending) => {
                    if !tag.is_letter() {
                        // The waiting letter comes out now; the symbol's own
                        // cell follows on the next call.
                        self.queued = Some(symbol_cell(tag));
                        return Some(RuneCell::single(pending));
                    }
                    if pending.is_vowel() && tag.is_consonant() {
                        return Some(RuneCell::reversed(pending, tag));
                    }
                    if pending.is_consonant() && tag.is_vowel() {
                        return Some(RuneCell::pair(pending, tag));
                    }
                    // Same class: the earlier letter is emitted alone and
                    // the newcomer becomes the pairing candidate.
                    self.pending = Some(tag);
                    return Some(RuneCell::single(pending));
                }
            }
        }
    }
}

fn symbol_cell(tag: Tag) -> RuneCell {
    if tag == Tag::SPACE {
        RuneCell::empty()
    } else {
        RuneCell::single(tag)
    }
}
