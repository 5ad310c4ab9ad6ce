//! # Data Model
//!
//! The archive is a single document: an ordered list of categories, each holding an
//! ordered list of items. It is persisted wholesale, so every type here round-trips
//! through `serde_json` exactly as stored.
//!
//! ```json
//! { "title": "...", "categories": [
//!     { "id": "cat_…", "name": "...", "description": "...", "items": [
//!         { "id": "it_…", "title": "...", "desc": "...", "url": "...",
//!           "tags": ["..."], "image": "data:image/png;base64,…", "favorite": false } ] } ] }
//! ```
//!
//! Parsing is strict: unknown fields and missing required fields (`title`, `categories`,
//! `id`, `name`, `items`) are rejected. Optional fields default when absent.
//!
//! ## Identifiers
//!
//! [`CategoryId`] and [`ItemId`] are opaque strings. Fresh ones are `cat_<uuid>` and
//! `it_<uuid>`; anything found in an imported document is accepted verbatim.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! opaque_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh, never-before-seen identifier.
            pub fn generate() -> Self {
                Self(format!("{}_{}", $prefix, Uuid::new_v4().simple()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

opaque_id!(CategoryId, "cat");
opaque_id!(ItemId, "it");

pub const DEFAULT_ARCHIVE_TITLE: &str = "Sports Car Archive";

/// Categories written into a brand new archive.
const DEFAULT_CATEGORIES: [(&str, &str); 3] = [
    ("🏎️ Super Cars", "Hypercars and supercars collection"),
    ("🚗 Sports Sedans", "High-performance luxury sedans"),
    ("🏁 Race Cars", "Track monsters and racing legends"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Archive {
    pub title: String,
    pub categories: Vec<Category>,
}

impl Archive {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            categories: Vec::new(),
        }
    }

    /// A fresh archive holding the three default categories.
    pub fn seeded(title: impl Into<String>) -> Self {
        let mut archive = Self::new(title);
        archive.categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, description)| Category::new(*name, Some(description.to_string())))
            .collect();
        archive
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn category_mut(&mut self, id: &CategoryId) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| &c.id == id)
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE_TITLE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub items: Vec<Item>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: CategoryId::generate(),
            name: name.into(),
            description: non_empty(description),
            items: Vec::new(),
        }
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|it| &it.id == id)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|it| &it.id == id)
    }

    pub fn favorite_count(&self) -> usize {
        self.items.iter().filter(|it| it.favorite).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub favorite: bool,
}

impl Item {
    /// Builds a new item from a draft. The caller validates the title.
    pub fn from_draft(draft: ItemDraft) -> Self {
        let favorite = draft.favorite.unwrap_or(false);
        let mut item = Self {
            id: ItemId::generate(),
            title: String::new(),
            desc: None,
            url: None,
            tags: Vec::new(),
            image: None,
            favorite,
        };
        item.apply(draft);
        item
    }

    /// Replaces every user-editable field. The id never changes and the favorite
    /// flag only changes when the draft carries one.
    pub fn apply(&mut self, draft: ItemDraft) {
        self.title = draft.title.trim().to_string();
        self.desc = non_empty(draft.desc);
        self.url = non_empty(draft.url);
        self.tags = draft.tags;
        self.image = non_empty(draft.image);
        if let Some(favorite) = draft.favorite {
            self.favorite = favorite;
        }
    }
}

/// User-supplied fields for creating an item or replacing an existing one's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub desc: Option<String>,
    pub url: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub favorite: Option<bool>,
}

impl ItemDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Prefills a draft from an existing item, leaving the favorite flag untouched.
    pub fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            desc: item.desc.clone(),
            url: item.url.clone(),
            tags: item.tags.clone(),
            image: item.image.clone(),
            favorite: None,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Splits a comma separated tag list, trimming and dropping blanks.
/// Duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Encodes image bytes as a `data:` URI, the form items store images in.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Best-effort image mime type from a file extension.
pub fn image_mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let a = CategoryId::generate();
        let b = CategoryId::generate();
        assert!(a.as_str().starts_with("cat_"));
        assert_ne!(a, b);
        assert!(ItemId::generate().as_str().starts_with("it_"));
    }

    #[test]
    fn seeded_archive_has_three_empty_categories() {
        let archive = Archive::seeded("Mine");
        assert_eq!(archive.title, "Mine");
        assert_eq!(archive.categories.len(), 3);
        assert!(archive.categories.iter().all(|c| c.items.is_empty()));
        assert_eq!(archive.categories[0].name, "🏎️ Super Cars");
    }

    #[test]
    fn parse_tags_trims_and_drops_blanks() {
        assert_eq!(
            parse_tags(" v12 , , italian,v12 "),
            vec!["v12", "italian", "v12"]
        );
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn apply_preserves_id_and_favorite() {
        let mut item = Item::from_draft(ItemDraft::new("Veneno").with_favorite(true));
        let id = item.id.clone();
        item.apply(ItemDraft::new("Centenario").with_desc("  "));
        assert_eq!(item.id, id);
        assert_eq!(item.title, "Centenario");
        assert!(item.favorite);
        assert_eq!(item.desc, None);

        item.apply(ItemDraft::new("Centenario").with_favorite(false));
        assert!(!item.favorite);
    }

    #[test]
    fn item_parses_with_defaults() {
        let item: Item = serde_json::from_str(r#"{"id":"it_1","title":"Chiron"}"#).unwrap();
        assert_eq!(item.id.as_str(), "it_1");
        assert!(item.tags.is_empty());
        assert!(!item.favorite);
        assert_eq!(item.image, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: std::result::Result<Archive, _> =
            serde_json::from_str(r#"{"title":"x","cats":[]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn legacy_empty_strings_are_accepted() {
        let raw = r#"{"title":"t","categories":[{"id":"cat_a","name":"A","description":"",
            "items":[{"id":"it_a","title":"T","desc":"","url":"","tags":[],"image":null,"favorite":true}]}]}"#;
        let archive: Archive = serde_json::from_str(raw).unwrap();
        assert_eq!(archive.item_count(), 1);
        assert_eq!(archive.categories[0].description.as_deref(), Some(""));
    }

    #[test]
    fn data_uri_encodes_base64() {
        assert_eq!(data_uri("image/png", b"abc"), "data:image/png;base64,YWJj");
        assert_eq!(image_mime_for_extension("JPG"), "image/jpeg");
        assert_eq!(image_mime_for_extension("xyz"), "application/octet-stream");
    }
}
