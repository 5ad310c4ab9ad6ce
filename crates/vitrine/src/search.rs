//! # Search and Filtering
//!
//! Matching is a case-insensitive substring test of the trimmed query against a
//! per-entity haystack:
//!
//! - **Item**: `title + " " + desc + " " + tags joined by spaces`
//! - **Category**: its `name`, its `description`, or any of its items
//!
//! An empty (or whitespace-only) query matches everything. Every function here borrows
//! the archive and returns references in archive order; nothing is ever reordered or
//! mutated, so the same query over the same archive always yields the same sequence.

use crate::model::{Archive, Category, CategoryId, Item};

/// Where a search looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Items of one category.
    Category(CategoryId),
    /// Categories of the whole archive.
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit<'a> {
    Category(&'a Category),
    Item {
        category: &'a Category,
        item: &'a Item,
    },
}

/// An item match from an archive-wide item search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHit<'a> {
    pub category: &'a Category,
    pub item: &'a Item,
}

/// The item-view query: free text AND an optional favorites-only filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub text: Option<String>,
    pub favorites_only: bool,
}

impl ItemQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            favorites_only: false,
        }
    }

    pub fn favorites() -> Self {
        Self {
            text: None,
            favorites_only: true,
        }
    }

    pub fn apply<'a>(&self, category: &'a Category) -> Vec<&'a Item> {
        let matched = items_in(category, self.text.as_deref().unwrap_or(""));
        if self.favorites_only {
            filter_favorites(matched)
        } else {
            matched
        }
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

fn item_matches(item: &Item, needle: &str) -> bool {
    let hay = format!(
        "{} {} {}",
        item.title,
        item.desc.as_deref().unwrap_or(""),
        item.tags.join(" ")
    )
    .to_lowercase();
    hay.contains(needle)
}

fn category_matches(category: &Category, needle: &str) -> bool {
    category.name.to_lowercase().contains(needle)
        || category
            .description
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(needle)
        || category.items.iter().any(|it| item_matches(it, needle))
}

/// Items of `category` matching `query`.
pub fn items_in<'a>(category: &'a Category, query: &str) -> Vec<&'a Item> {
    let needle = normalize(query);
    category
        .items
        .iter()
        .filter(|it| needle.is_empty() || item_matches(it, &needle))
        .collect()
}

/// Categories matching `query` by name, description, or contents.
pub fn categories<'a>(archive: &'a Archive, query: &str) -> Vec<&'a Category> {
    let needle = normalize(query);
    archive
        .categories
        .iter()
        .filter(|c| needle.is_empty() || category_matches(c, &needle))
        .collect()
}

/// Items matching `query` across every category.
pub fn items<'a>(archive: &'a Archive, query: &str) -> Vec<ItemHit<'a>> {
    archive
        .categories
        .iter()
        .flat_map(|category| {
            items_in(category, query)
                .into_iter()
                .map(move |item| ItemHit { category, item })
        })
        .collect()
}

/// Keeps only favorites, preserving order.
pub fn filter_favorites<'a, I>(items: I) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    items.into_iter().filter(|it| it.favorite).collect()
}

/// Scoped search. An unknown category yields no hits.
pub fn search<'a>(archive: &'a Archive, query: &str, scope: &SearchScope) -> Vec<Hit<'a>> {
    match scope {
        SearchScope::Global => categories(archive, query)
            .into_iter()
            .map(Hit::Category)
            .collect(),
        SearchScope::Category(id) => match archive.category(id) {
            Some(category) => items_in(category, query)
                .into_iter()
                .map(|item| Hit::Item { category, item })
                .collect(),
            None => Vec::new(),
        },
    }
}
