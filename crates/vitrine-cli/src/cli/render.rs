//! # Rendering Module
//!
//! Every function here builds a `String`; handlers decide where it goes. Keeping the
//! output as plain values lets the layout be unit tested with [`Styles::plain`].
//!
//! ## List Layout
//!
//! Category and item lists share one row shape:
//!
//! ```text
//!   1. ★ Veneno                                   #v12 #lamborghini ▣
//! ```
//!
//! - `index` (right-aligned, 3 chars + `.`): position in the full, unfiltered list,
//!   which is what other commands accept as a reference
//! - favorite marker (2 chars)
//! - title, truncated to fit
//! - trailing detail (tags, image marker, item counts)
//!
//! Widths are measured with `unicode-width`, so emoji category names line up.

use super::styles::Styles;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vitrine::model::{Category, Item};
use vitrine::prefs::Preferences;

pub const LINE_WIDTH: usize = 100;
pub const FAVORITE_MARKER: &str = "★";
pub const IMAGE_MARKER: &str = "▣";

/// Number of columns taken by `"  1. ★ "`.
const PREFIX_WIDTH: usize = 7;

/// A category paired with its 1-based position in the archive.
pub type CategoryRow<'a> = (usize, &'a Category);

/// An item paired with its 1-based position in its category.
pub type ItemRow<'a> = (usize, &'a Item);

pub fn render_category_list(rows: &[CategoryRow<'_>], styles: &Styles) -> String {
    if rows.is_empty() {
        return format!("{}\n", styles.muted.apply_to("No categories found."));
    }
    let mut out = String::new();
    for (pos, category) in rows {
        let favorites = category.favorite_count();
        let mut detail = format!(
            "{} {}",
            category.items.len(),
            if category.items.len() == 1 { "item" } else { "items" }
        );
        if favorites > 0 {
            detail.push_str(&format!(", {} {}", favorites, FAVORITE_MARKER));
        }
        out.push_str(&row(*pos, false, &category.name, &detail, styles));
        if let Some(description) = category.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!(
                "{}{}\n",
                " ".repeat(PREFIX_WIDTH),
                styles
                    .muted
                    .apply_to(truncate_to_width(description, LINE_WIDTH - PREFIX_WIDTH))
            ));
        }
    }
    out
}

pub fn render_item_list(rows: &[ItemRow<'_>], styles: &Styles) -> String {
    if rows.is_empty() {
        return format!("{}\n", styles.muted.apply_to("No items found."));
    }
    rows.iter()
        .map(|(pos, item)| row(*pos, item.favorite, &item.title, &item_detail(item), styles))
        .collect()
}

/// Header plus item list, used by `category show`.
pub fn render_category(category: &Category, styles: &Styles) -> String {
    let mut out = format!("{}\n", styles.heading.apply_to(&category.name));
    out.push_str(&format!("{}\n", styles.muted.apply_to(category.id.as_str())));
    if let Some(description) = category.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(description);
        out.push('\n');
    }
    out.push('\n');
    let rows: Vec<ItemRow<'_>> = category
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| (i + 1, item))
        .collect();
    out.push_str(&render_item_list(&rows, styles));
    out
}

/// Archive-wide search output: matching categories, then matching items.
pub fn render_search(
    categories: &[CategoryRow<'_>],
    items: &[(CategoryRow<'_>, ItemRow<'_>)],
    styles: &Styles,
) -> String {
    let mut out = format!("{}\n", styles.heading.apply_to("Categories"));
    out.push_str(&render_category_list(categories, styles));
    out.push('\n');
    out.push_str(&format!("{}\n", styles.heading.apply_to("Items")));
    if items.is_empty() {
        out.push_str(&format!("{}\n", styles.muted.apply_to("No items found.")));
        return out;
    }
    for ((cat_pos, category), (item_pos, item)) in items {
        let index = format!("{}/{}", cat_pos, item_pos);
        let detail = format!("in {}", category.name);
        out.push_str(&labeled_row(&index, item.favorite, &item.title, &detail, styles));
    }
    out
}

pub fn render_preferences(prefs: &Preferences, styles: &Styles) -> String {
    vitrine::prefs::PrefKey::ALL
        .iter()
        .map(|key| {
            let name = key.as_str();
            format!(
                "{}{}{}\n",
                styles.muted.apply_to(name),
                " ".repeat(8usize.saturating_sub(name.len())),
                prefs.get(*key)
            )
        })
        .collect()
}

pub fn render_success(message: &str, styles: &Styles) -> String {
    format!("{}\n", styles.success.apply_to(message))
}

pub fn render_warning(message: &str, styles: &Styles) -> String {
    format!("{}\n", styles.warning.apply_to(message))
}

fn item_detail(item: &Item) -> String {
    let mut parts: Vec<String> = item.tags.iter().map(|t| format!("#{}", t)).collect();
    if item.image.is_some() {
        parts.push(IMAGE_MARKER.to_string());
    }
    parts.join(" ")
}

fn row(pos: usize, favorite: bool, title: &str, detail: &str, styles: &Styles) -> String {
    labeled_row(&format!("{:>3}", pos), favorite, title, detail, styles)
}

fn labeled_row(index: &str, favorite: bool, title: &str, detail: &str, styles: &Styles) -> String {
    let marker = if favorite {
        styles.favorite.apply_to(FAVORITE_MARKER).to_string()
    } else {
        " ".to_string()
    };
    let prefix_width = index.width() + 1 + 1 + 2;
    let detail_width = detail.width();
    let available = LINE_WIDTH
        .saturating_sub(prefix_width)
        .saturating_sub(detail_width)
        .saturating_sub(2);
    let title = truncate_to_width(title, available);
    let padding = available.saturating_sub(title.width());

    let mut line = format!(
        "{}. {} {}",
        styles.index.apply_to(index),
        marker,
        styles.title.apply_to(&title)
    );
    if !detail.is_empty() {
        line.push_str(&" ".repeat(padding + 2));
        line.push_str(&styles.tag.apply_to(detail).to_string());
    }
    line.push('\n');
    line
}

/// Cuts `s` to at most `max_width` columns, ending in `…` when anything was dropped.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let limit = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
