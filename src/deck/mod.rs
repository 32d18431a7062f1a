//! Minimal `.pptx` reader.
//!
//! Only what the slide model needs is read: slide order from
//! `ppt/presentation.xml`, and for every slide the top-level shapes of its
//! shape tree with their name and text frame. Nothing is ever written back.

mod reader;
#[cfg(test)]
pub(crate) mod fixture;

pub use reader::{parse_deck, RawDeck, RawShape};
#[cfg(test)]
pub use reader::RawSlide;
