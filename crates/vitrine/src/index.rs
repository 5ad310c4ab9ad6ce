//! # Entry References: Id vs Display Position
//!
//! Categories and items carry opaque ids (`cat_3f…`, `it_9a…`). They are the right
//! identity for storage but painful to type, so clients may also refer to an entry by
//! its 1-based position in the unfiltered, archive-ordered list.
//!
//! Positions are always taken from the full list, never from a filtered view, so
//! `vitrine item rm 2 3` targets the same item regardless of the search used to find it.
//!
//! ## Resolution Order
//!
//! 1. An exact id match wins, whatever the input looks like (imported ids may be numeric).
//! 2. Otherwise a purely numeric input is a position.
//! 3. Otherwise the reference does not resolve.

use crate::error::{Result, VitrineError};
use crate::model::{Archive, Category, Item};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryRef(String);

impl EntryRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn position(&self) -> Option<usize> {
        self.0.parse::<usize>().ok().filter(|n| *n > 0)
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntryRef {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VitrineError::InvalidInput(
                "An id or position is required".to_string(),
            ));
        }
        Ok(EntryRef(s.to_string()))
    }
}

pub fn find_category<'a>(archive: &'a Archive, r: &EntryRef) -> Option<&'a Category> {
    archive
        .categories
        .iter()
        .find(|c| c.id.as_str() == r.as_str())
        .or_else(|| {
            r.position()
                .and_then(|pos| archive.categories.get(pos - 1))
        })
}

pub fn find_item<'a>(category: &'a Category, r: &EntryRef) -> Option<&'a Item> {
    category
        .items
        .iter()
        .find(|it| it.id.as_str() == r.as_str())
        .or_else(|| r.position().and_then(|pos| category.items.get(pos - 1)))
}
