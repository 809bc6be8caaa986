//! Phoneme tokenizer and rune-cell segmenter for a constructed alphabetic
//! script.
//!
//! Input text is expected to already be IPA. [`normalize`] strips everything
//! that is not a recognized phoneme tag, [`tags`] iterates the tags
//! themselves, and [`cells`] groups them into the rune cells that the
//! rendering crates draw: a consonant and a vowel share a cell, and a cell
//! whose vowel arrived first carries the reversing-circle marker.
//!
//! ```
//! use runic::{cells, Tag};
//!
//! let mut iter = cells("tɛs");
//! let cell = iter.next().unwrap();
//! assert_eq!(cell.tags().len(), 2); // t + ɛ share a cell
//! assert_eq!(iter.next().unwrap().tags(), &[Tag::parse("s").unwrap()]);
//! ```

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

pub mod phoneme;
pub mod tokenize;

pub use phoneme::{prefixes, universe, Tag, TagClass};
pub use tokenize::{cells, normalize, tags, Cells, RuneCell, Tags};
