//! # Archive Repository
//!
//! [`ArchiveRepository`] owns the in-memory [`Archive`] and is its single source of
//! truth. Every mutating operation is write-through: the full document is persisted
//! before the call returns.
//!
//! ## Commit Protocol
//!
//! Mutations are applied in place and the archive is persisted right away. If the
//! write fails, the change is undone before the error is returned, so the in-memory
//! archive and the stored document stay equal. Only the touched entry is ever copied;
//! item images are never cloned just to flip a flag.
//!
//! ## Missing Ids
//!
//! Operations addressing an unknown category or item are no-ops that return
//! `Ok(None)` and write nothing. The exception is [`ArchiveRepository::create_item`],
//! which has nothing to attach the item to and fails with `CategoryNotFound`.
//!
//! ## Loading
//!
//! - No stored document: a fresh archive is built from the [`ArchiveSeed`] and persisted.
//! - Corrupt, wrong-shaped, or invalid document (duplicate ids, empty names or
//!   titles): logged, and a fresh archive is used in memory.
//!   The stored bytes stay on disk until the next successful mutation replaces them.

use crate::error::{Result, VitrineError};
use crate::model::{Archive, Category, CategoryId, Item, ItemDraft, ItemId};
use crate::store::{load_json, save_json, KeyValueStore, StoreKey};
use log::{error, info};
use std::collections::HashSet;

/// How to build an archive when none is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSeed {
    pub title: String,
    pub default_categories: bool,
}

impl Default for ArchiveSeed {
    fn default() -> Self {
        Self {
            title: crate::model::DEFAULT_ARCHIVE_TITLE.to_string(),
            default_categories: true,
        }
    }
}

impl ArchiveSeed {
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            default_categories: false,
        }
    }

    pub fn build(&self) -> Archive {
        if self.default_categories {
            Archive::seeded(self.title.clone())
        } else {
            Archive::new(self.title.clone())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories: usize,
    pub items: usize,
}

pub struct ArchiveRepository<S: KeyValueStore> {
    store: S,
    archive: Archive,
}

impl<S: KeyValueStore> ArchiveRepository<S> {
    pub fn load(store: S, seed: &ArchiveSeed) -> Result<Self> {
        let archive = match load_json::<_, Archive>(&store, StoreKey::Archive)? {
            Some(Ok(archive)) => match validate(&archive) {
                Ok(()) => archive,
                Err(e) => {
                    error!("Stored archive is invalid, starting fresh: {}", e);
                    seed.build()
                }
            },
            Some(Err(e)) => {
                error!("Could not parse archive from storage, starting fresh: {}", e);
                seed.build()
            }
            None => {
                let archive = seed.build();
                info!(
                    "No stored archive, seeding '{}' with {} categories",
                    archive.title,
                    archive.categories.len()
                );
                save_json(&store, StoreKey::Archive, &archive)?;
                archive
            }
        };
        Ok(Self { store, archive })
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn categories(&self) -> &[Category] {
        &self.archive.categories
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.archive.category(id)
    }

    pub fn item(&self, category_id: &CategoryId, item_id: &ItemId) -> Option<&Item> {
        self.archive.category(category_id)?.item(item_id)
    }

    fn save(&self) -> Result<()> {
        save_json(&self.store, StoreKey::Archive, &self.archive)
    }

    fn category_index(&self, id: &CategoryId) -> Option<usize> {
        self.archive.categories.iter().position(|c| &c.id == id)
    }

    fn item_index(&self, category_id: &CategoryId, item_id: &ItemId) -> Option<(usize, usize)> {
        let ci = self.category_index(category_id)?;
        let ii = self.archive.categories[ci]
            .items
            .iter()
            .position(|it| &it.id == item_id)?;
        Some((ci, ii))
    }

    pub fn create_category(
        &mut self,
        name: &str,
        description: Option<String>,
    ) -> Result<Category> {
        let name = require_name(name)?;
        let category = Category::new(name, description);
        self.archive.categories.push(category.clone());
        if let Err(e) = self.save() {
            self.archive.categories.pop();
            return Err(e);
        }
        Ok(category)
    }

    pub fn rename_category(
        &mut self,
        id: &CategoryId,
        name: &str,
        description: Option<String>,
    ) -> Result<Option<Category>> {
        let name = require_name(name)?;
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let Some(ci) = self.category_index(id) else {
            return Ok(None);
        };
        let category = &mut self.archive.categories[ci];
        let old_name = std::mem::replace(&mut category.name, name);
        let old_description = std::mem::replace(&mut category.description, description);
        if let Err(e) = self.save() {
            let category = &mut self.archive.categories[ci];
            category.name = old_name;
            category.description = old_description;
            return Err(e);
        }
        Ok(Some(self.archive.categories[ci].clone()))
    }

    /// Removes a category together with all of its items.
    pub fn delete_category(&mut self, id: &CategoryId) -> Result<Option<Category>> {
        let Some(ci) = self.category_index(id) else {
            return Ok(None);
        };
        let removed = self.archive.categories.remove(ci);
        if let Err(e) = self.save() {
            self.archive.categories.insert(ci, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    pub fn create_item(&mut self, category_id: &CategoryId, draft: ItemDraft) -> Result<Item> {
        require_title(&draft)?;
        let ci = self
            .category_index(category_id)
            .ok_or_else(|| VitrineError::CategoryNotFound(category_id.to_string()))?;
        let item = Item::from_draft(draft);
        self.archive.categories[ci].items.push(item.clone());
        if let Err(e) = self.save() {
            self.archive.categories[ci].items.pop();
            return Err(e);
        }
        Ok(item)
    }

    pub fn update_item(
        &mut self,
        category_id: &CategoryId,
        item_id: &ItemId,
        draft: ItemDraft,
    ) -> Result<Option<Item>> {
        require_title(&draft)?;
        let Some((ci, ii)) = self.item_index(category_id, item_id) else {
            return Ok(None);
        };
        let slot = &mut self.archive.categories[ci].items[ii];
        let mut updated = slot.clone();
        updated.apply(draft);
        let previous = std::mem::replace(slot, updated);
        if let Err(e) = self.save() {
            self.archive.categories[ci].items[ii] = previous;
            return Err(e);
        }
        Ok(Some(self.archive.categories[ci].items[ii].clone()))
    }

    pub fn delete_item(
        &mut self,
        category_id: &CategoryId,
        item_id: &ItemId,
    ) -> Result<Option<Item>> {
        let Some((ci, ii)) = self.item_index(category_id, item_id) else {
            return Ok(None);
        };
        let removed = self.archive.categories[ci].items.remove(ii);
        if let Err(e) = self.save() {
            self.archive.categories[ci].items.insert(ii, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    /// Flips the favorite flag and returns its new value.
    pub fn toggle_favorite(
        &mut self,
        category_id: &CategoryId,
        item_id: &ItemId,
    ) -> Result<Option<bool>> {
        let Some((ci, ii)) = self.item_index(category_id, item_id) else {
            return Ok(None);
        };
        let item = &mut self.archive.categories[ci].items[ii];
        item.favorite = !item.favorite;
        let favorite = item.favorite;
        if let Err(e) = self.save() {
            let item = &mut self.archive.categories[ci].items[ii];
            item.favorite = !favorite;
            return Err(e);
        }
        Ok(Some(favorite))
    }

    /// Substitutes the whole archive.
    pub fn replace_all(&mut self, archive: Archive) -> Result<()> {
        save_json(&self.store, StoreKey::Archive, &archive)?;
        self.archive = archive;
        Ok(())
    }

    /// The full archive as pretty-printed JSON.
    pub fn export_snapshot(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.archive)?)
    }

    /// Parses, validates, and installs an archive document.
    ///
    /// Anything that fails to parse into the archive schema or fails validation is
    /// rejected as a whole and the current archive is kept.
    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<ImportSummary> {
        let archive: Archive = serde_json::from_slice(bytes)?;
        validate(&archive)?;
        let summary = ImportSummary {
            categories: archive.categories.len(),
            items: archive.item_count(),
        };
        self.replace_all(archive)?;
        info!(
            "Imported archive: {} categories, {} items",
            summary.categories, summary.items
        );
        Ok(summary)
    }
}

fn require_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VitrineError::InvalidInput(
            "Category name is required".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn require_title(draft: &ItemDraft) -> Result<()> {
    if !draft.has_title() {
        return Err(VitrineError::InvalidInput(
            "Item title is required".to_string(),
        ));
    }
    Ok(())
}

/// Checks the invariants serde cannot: unique ids and non-empty names and titles.
pub fn validate(archive: &Archive) -> Result<()> {
    let mut category_ids = HashSet::new();
    for category in &archive.categories {
        if !category_ids.insert(&category.id) {
            return Err(VitrineError::InvalidImport(format!(
                "duplicate category id '{}'",
                category.id
            )));
        }
        if category.name.trim().is_empty() {
            return Err(VitrineError::InvalidImport(format!(
                "category '{}' has an empty name",
                category.id
            )));
        }

        let mut item_ids = HashSet::new();
        for item in &category.items {
            if !item_ids.insert(&item.id) {
                return Err(VitrineError::InvalidImport(format!(
                    "duplicate item id '{}' in category '{}'",
                    item.id, category.name
                )));
            }
            if item.title.trim().is_empty() {
                return Err(VitrineError::InvalidImport(format!(
                    "item '{}' in category '{}' has an empty title",
                    item.id, category.name
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search;
    use crate::store::memory::MemStore;

    fn empty_repo(store: &MemStore) -> ArchiveRepository<&MemStore> {
        ArchiveRepository::load(store, &ArchiveSeed::empty("Test")).unwrap()
    }

    #[test]
    fn first_load_seeds_and_persists() {
        let store = MemStore::new();
        let repo = ArchiveRepository::load(&store, &ArchiveSeed::default()).unwrap();
        assert_eq!(repo.categories().len(), 3);
        assert_eq!(repo.archive().title, "Sports Car Archive");
        assert!(store.raw(StoreKey::Archive).is_some());
    }

    #[test]
    fn reload_reads_the_persisted_archive() {
        let store = MemStore::new();
        let ids: Vec<CategoryId> = {
            let repo = ArchiveRepository::load(&store, &ArchiveSeed::default()).unwrap();
            repo.categories().iter().map(|c| c.id.clone()).collect()
        };
        let repo = ArchiveRepository::load(&store, &ArchiveSeed::default()).unwrap();
        let reloaded: Vec<CategoryId> = repo.categories().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, reloaded);
    }

    #[test]
    fn corrupt_archive_falls_back_without_overwriting() {
        let store = MemStore::new();
        store.set(StoreKey::Archive, b"{broken").unwrap();

        let repo = ArchiveRepository::load(&store, &ArchiveSeed::default()).unwrap();
        assert_eq!(repo.categories().len(), 3);
        assert_eq!(store.raw(StoreKey::Archive), Some(b"{broken".to_vec()));
    }

    #[test]
    fn invalid_stored_archive_falls_back_without_overwriting() {
        let store = MemStore::new();
        let raw = br#"{"title":"x","categories":[
            {"id":"c1","name":"A","items":[]},
            {"id":"c1","name":"B","items":[]}]}"#;
        store.set(StoreKey::Archive, raw).unwrap();

        let repo = ArchiveRepository::load(&store, &ArchiveSeed::default()).unwrap();
        assert_eq!(repo.categories().len(), 3);
        assert!(repo.category(&CategoryId::from("c1")).is_none());
        assert_eq!(store.raw(StoreKey::Archive), Some(raw.to_vec()));
    }

    #[test]
    fn create_category_is_retrievable_and_empty() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let cat = repo
            .create_category("  Super Cars ", Some("".into()))
            .unwrap();
        let found = repo.category(&cat.id).unwrap();
        assert_eq!(found.name, "Super Cars");
        assert_eq!(found.description, None);
        assert!(found.items.is_empty());
    }

    #[test]
    fn empty_category_name_is_rejected() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let err = repo.create_category("   ", None).unwrap_err();
        assert!(matches!(err, VitrineError::InvalidInput(_)));
        assert!(repo.categories().is_empty());
    }

    #[test]
    fn rename_unknown_category_is_a_no_op() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let writes = store.write_count();
        let res = repo
            .rename_category(&CategoryId::from("cat_nope"), "X", None)
            .unwrap();
        assert!(res.is_none());
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn rename_updates_in_place() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let first = repo.create_category("A", None).unwrap();
        repo.create_category("B", None).unwrap();
        let renamed = repo
            .rename_category(&first.id, "A2", Some("desc".into()))
            .unwrap()
            .unwrap();
        assert_eq!(renamed.id, first.id);
        assert_eq!(repo.categories()[0].name, "A2");
        assert_eq!(repo.categories()[0].description.as_deref(), Some("desc"));
    }

    #[test]
    fn delete_category_cascades_items() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let cat = repo.create_category("Race Cars", None).unwrap();
        repo.create_item(&cat.id, ItemDraft::new("917K")).unwrap();
        repo.create_item(&cat.id, ItemDraft::new("F40 LM")).unwrap();

        let removed = repo.delete_category(&cat.id).unwrap().unwrap();
        assert_eq!(removed.items.len(), 2);
        assert!(search::items(repo.archive(), "").is_empty());
        assert!(repo.delete_category(&cat.id).unwrap().is_none());
    }

    #[test]
    fn create_item_requires_title_and_category() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let cat = repo.create_category("Super Cars", None).unwrap();

        let err = repo.create_item(&cat.id, ItemDraft::new("  ")).unwrap_err();
        assert!(matches!(err, VitrineError::InvalidInput(_)));
        assert_eq!(repo.archive().item_count(), 0);

        let err = repo
            .create_item(&CategoryId::from("cat_nope"), ItemDraft::new("Veneno"))
            .unwrap_err();
        assert!(matches!(err, VitrineError::CategoryNotFound(_)));
    }

    #[test]
    fn update_item_preserves_id_and_favorite() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let cat = repo.create_category("Super Cars", None).unwrap();
        let item = repo
            .create_item(&cat.id, ItemDraft::new("Veneno").with_url("https://x"))
            .unwrap();
        repo.toggle_favorite(&cat.id, &item.id).unwrap();

        let updated = repo
            .update_item(&cat.id, &item.id, ItemDraft::new("Veneno Roadster"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, item.id);
        assert!(updated.favorite);
        assert_eq!(updated.url, None);
        assert_eq!(updated.title, "Veneno Roadster");

        let missing = repo
            .update_item(&cat.id, &ItemId::from("it_nope"), ItemDraft::new("X"))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn toggle_favorite_is_its_own_inverse() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let cat = repo.create_category("Super Cars", None).unwrap();
        let item = repo.create_item(&cat.id, ItemDraft::new("Veneno")).unwrap();

        assert_eq!(repo.toggle_favorite(&cat.id, &item.id).unwrap(), Some(true));
        assert_eq!(repo.toggle_favorite(&cat.id, &item.id).unwrap(), Some(false));
        assert!(!repo.item(&cat.id, &item.id).unwrap().favorite);
    }

    #[test]
    fn delete_item_removes_only_that_item() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let cat = repo.create_category("Super Cars", None).unwrap();
        let a = repo.create_item(&cat.id, ItemDraft::new("A")).unwrap();
        let b = repo.create_item(&cat.id, ItemDraft::new("B")).unwrap();

        assert!(repo.delete_item(&cat.id, &a.id).unwrap().is_some());
        assert!(repo.delete_item(&cat.id, &a.id).unwrap().is_none());
        let remaining: Vec<_> = repo.category(&cat.id).unwrap().items.iter().map(|i| &i.id).collect();
        assert_eq!(remaining, vec![&b.id]);
    }

    #[test]
    fn failed_write_leaves_archive_unchanged() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let cat = repo.create_category("Super Cars", None).unwrap();
        let before = store.raw(StoreKey::Archive);

        store.set_simulate_write_error(true);
        let err = repo.create_item(&cat.id, ItemDraft::new("Veneno")).unwrap_err();
        assert!(matches!(err, VitrineError::Store(_)));
        assert_eq!(repo.archive().item_count(), 0);
        assert_eq!(store.raw(StoreKey::Archive), before);
    }

    #[test]
    fn every_mutation_rolls_back_when_the_write_fails() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let a = repo.create_category("A", Some("first".into())).unwrap();
        let b = repo.create_category("B", None).unwrap();
        let x = repo
            .create_item(&a.id, ItemDraft::new("X").with_tags(vec!["t".into()]))
            .unwrap();
        let y = repo.create_item(&a.id, ItemDraft::new("Y")).unwrap();
        repo.create_item(&b.id, ItemDraft::new("Z")).unwrap();

        let before = repo.archive().clone();
        let stored = store.raw(StoreKey::Archive);
        store.set_simulate_write_error(true);

        assert!(repo.create_category("C", None).is_err());
        assert_eq!(repo.archive(), &before);
        assert!(repo.rename_category(&a.id, "A2", None).is_err());
        assert_eq!(repo.archive(), &before);
        assert!(repo.delete_category(&a.id).is_err());
        assert_eq!(repo.archive(), &before);
        assert!(repo.create_item(&b.id, ItemDraft::new("W")).is_err());
        assert_eq!(repo.archive(), &before);
        assert!(repo.update_item(&a.id, &x.id, ItemDraft::new("X2")).is_err());
        assert_eq!(repo.archive(), &before);
        assert!(repo.delete_item(&a.id, &x.id).is_err());
        assert_eq!(repo.archive(), &before);
        assert!(repo.toggle_favorite(&a.id, &y.id).is_err());
        assert_eq!(repo.archive(), &before);

        assert_eq!(store.raw(StoreKey::Archive), stored);
    }

    #[test]
    fn export_then_import_round_trips() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let cat = repo.create_category("Super Cars", Some("fast".into())).unwrap();
        repo.create_item(
            &cat.id,
            ItemDraft::new("Veneno")
                .with_tags(vec!["v12".into()])
                .with_image("data:image/png;base64,AA=="),
        )
        .unwrap();
        let before = repo.archive().clone();
        let snapshot = repo.export_snapshot().unwrap();

        let other = MemStore::new();
        let mut fresh = empty_repo(&other);
        let summary = fresh.import_snapshot(&snapshot).unwrap();
        assert_eq!(summary, ImportSummary { categories: 1, items: 1 });
        assert_eq!(fresh.archive(), &before);
    }

    #[test]
    fn import_with_wrong_shape_is_rejected() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let cat = repo.create_category("Keep me", None).unwrap();

        let err = repo
            .import_snapshot(br#"{"title":"x","cats":[{"id":"c","name":"n","items":[]}]}"#)
            .unwrap_err();
        assert!(matches!(err, VitrineError::Parse(_)));
        assert!(repo.category(&cat.id).is_some());

        let err = repo.import_snapshot(b"not json at all").unwrap_err();
        assert!(matches!(err, VitrineError::Parse(_)));
    }

    #[test]
    fn import_with_duplicate_ids_is_rejected() {
        let store = MemStore::new();
        let mut repo = empty_repo(&store);
        let raw = br#"{"title":"x","categories":[
            {"id":"c1","name":"A","items":[]},
            {"id":"c1","name":"B","items":[]}]}"#;
        let err = repo.import_snapshot(raw).unwrap_err();
        assert!(matches!(err, VitrineError::InvalidImport(_)));
        assert!(repo.categories().is_empty());
    }
}
