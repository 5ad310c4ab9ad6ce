//! # API Facade
//!
//! [`VitrineApi`] is the single entry point for every vitrine operation, whatever the
//! UI. It is constructed once at startup and handed to the client by value or reference;
//! there is no global state.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Owns** one store handle shared by the repository, the preferences manager and
//!   the access gate.
//! - **Normalizes inputs**: clients pass [`EntryRef`]s (ids or 1-based positions),
//!   which are resolved to ids before reaching the repository.
//! - **Enforces the gate**: reading or changing archive contents while locked fails
//!   with [`VitrineError::Locked`]. Preferences and `set_pin` stay available.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `repo.rs`, `search.rs`, `prefs.rs`, `gate.rs`.
//! - **I/O presentation**: no stdout, no prompts, no confirmations.
//!
//! ## Not-Found Handling
//!
//! The repository treats unknown ids as silent no-ops. At this layer, a reference that
//! does not resolve is reported as `CategoryNotFound` / `ItemNotFound` so the client can
//! tell the user.
//!
//! ## Generic Over KeyValueStore
//!
//! - Production: `VitrineApi<FsStore>`
//! - Testing: `VitrineApi<MemStore>`

use crate::config::VitrineConfig;
use crate::error::{Result, VitrineError};
use crate::gate::{AccessGate, GateState};
use crate::index::{find_category, find_item, EntryRef};
use crate::model::{Archive, Category, CategoryId, Item, ItemDraft, ItemId};
use crate::prefs::{Animation, PrefKey, Preferences, PreferencesManager, Theme};
use crate::repo::{ArchiveRepository, ImportSummary};
use crate::search::{self, Hit, ItemHit, ItemQuery, SearchScope};
use crate::store::KeyValueStore;
use std::rc::Rc;

pub struct VitrineApi<S: KeyValueStore> {
    store: Rc<S>,
    repo: ArchiveRepository<Rc<S>>,
    prefs: PreferencesManager<Rc<S>>,
    gate: AccessGate<Rc<S>>,
    config: VitrineConfig,
}

impl<S: KeyValueStore> VitrineApi<S> {
    /// Loads every document from `store`.
    pub fn open(store: S, config: VitrineConfig) -> Result<Self> {
        let store = Rc::new(store);
        let gate = AccessGate::load(Rc::clone(&store))?;
        let prefs = PreferencesManager::load(Rc::clone(&store), gate.is_locked())?;
        let repo = ArchiveRepository::load(Rc::clone(&store), &config.seed())?;
        Ok(Self {
            store,
            repo,
            prefs,
            gate,
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &VitrineConfig {
        &self.config
    }

    // --- Access gate ---

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    pub fn has_pin(&self) -> Result<bool> {
        self.gate.has_pin()
    }

    pub fn unlock(&mut self, pin: &str) -> Result<bool> {
        self.gate.unlock(pin)
    }

    /// Sets a new PIN from any state, opening the gate and marking preferences locked.
    pub fn set_pin(&mut self, pin: &str) -> Result<()> {
        self.gate.set_pin(pin)?;
        self.prefs.set_locked(true)
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.gate.is_locked() {
            return Err(VitrineError::Locked);
        }
        Ok(())
    }

    // --- Preferences ---

    pub fn preferences(&self) -> &Preferences {
        self.prefs.prefs()
    }

    pub fn get_preference(&self, key: &str) -> Result<String> {
        let key: PrefKey = key.parse()?;
        Ok(self.prefs.prefs().get(key))
    }

    pub fn set_preference(&mut self, key: &str, value: &str) -> Result<()> {
        let key: PrefKey = key.parse()?;
        self.prefs.set(key, value)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.prefs.set_theme(theme)
    }

    pub fn set_anim(&mut self, anim: Animation) -> Result<()> {
        self.prefs.set_anim(anim)
    }

    /// Writes the current preferences, creating the document if it does not exist yet.
    pub fn save_preferences(&self) -> Result<()> {
        self.prefs.save()
    }

    // --- Reading ---

    pub fn archive(&self) -> Result<&Archive> {
        self.ensure_unlocked()?;
        Ok(self.repo.archive())
    }

    pub fn category(&self, category: &EntryRef) -> Result<&Category> {
        let archive = self.archive()?;
        find_category(archive, category)
            .ok_or_else(|| VitrineError::CategoryNotFound(category.to_string()))
    }

    pub fn item(&self, category: &EntryRef, item: &EntryRef) -> Result<(&Category, &Item)> {
        let cat = self.category(category)?;
        let found =
            find_item(cat, item).ok_or_else(|| VitrineError::ItemNotFound(item.to_string()))?;
        Ok((cat, found))
    }

    /// Items of one category, filtered by text and/or favorites.
    pub fn list_items(&self, category: &EntryRef, query: &ItemQuery) -> Result<Vec<&Item>> {
        Ok(query.apply(self.category(category)?))
    }

    pub fn search(&self, query: &str, scope: &SearchScope) -> Result<Vec<Hit<'_>>> {
        Ok(search::search(self.archive()?, query, scope))
    }

    pub fn search_categories(&self, query: &str) -> Result<Vec<&Category>> {
        Ok(search::categories(self.archive()?, query))
    }

    pub fn search_items(&self, query: &str) -> Result<Vec<ItemHit<'_>>> {
        Ok(search::items(self.archive()?, query))
    }

    // --- Mutations ---

    fn resolve_category(&self, category: &EntryRef) -> Result<CategoryId> {
        Ok(self.category(category)?.id.clone())
    }

    fn resolve_item(&self, category: &EntryRef, item: &EntryRef) -> Result<(CategoryId, ItemId)> {
        let (cat, found) = self.item(category, item)?;
        Ok((cat.id.clone(), found.id.clone()))
    }

    pub fn create_category(&mut self, name: &str, description: Option<String>) -> Result<Category> {
        self.ensure_unlocked()?;
        self.repo.create_category(name, description)
    }

    pub fn rename_category(
        &mut self,
        category: &EntryRef,
        name: &str,
        description: Option<String>,
    ) -> Result<Category> {
        let id = self.resolve_category(category)?;
        self.repo
            .rename_category(&id, name, description)?
            .ok_or_else(|| VitrineError::CategoryNotFound(id.to_string()))
    }

    pub fn delete_category(&mut self, category: &EntryRef) -> Result<Category> {
        let id = self.resolve_category(category)?;
        self.repo
            .delete_category(&id)?
            .ok_or_else(|| VitrineError::CategoryNotFound(id.to_string()))
    }

    pub fn create_item(&mut self, category: &EntryRef, draft: ItemDraft) -> Result<Item> {
        let id = self.resolve_category(category)?;
        self.repo.create_item(&id, draft)
    }

    pub fn update_item(
        &mut self,
        category: &EntryRef,
        item: &EntryRef,
        draft: ItemDraft,
    ) -> Result<Item> {
        let (cat_id, item_id) = self.resolve_item(category, item)?;
        self.repo
            .update_item(&cat_id, &item_id, draft)?
            .ok_or_else(|| VitrineError::ItemNotFound(item_id.to_string()))
    }

    pub fn delete_item(&mut self, category: &EntryRef, item: &EntryRef) -> Result<Item> {
        let (cat_id, item_id) = self.resolve_item(category, item)?;
        self.repo
            .delete_item(&cat_id, &item_id)?
            .ok_or_else(|| VitrineError::ItemNotFound(item_id.to_string()))
    }

    pub fn toggle_favorite(&mut self, category: &EntryRef, item: &EntryRef) -> Result<bool> {
        let (cat_id, item_id) = self.resolve_item(category, item)?;
        self.repo
            .toggle_favorite(&cat_id, &item_id)?
            .ok_or_else(|| VitrineError::ItemNotFound(item_id.to_string()))
    }

    // --- Import / export ---

    pub fn export_snapshot(&self) -> Result<Vec<u8>> {
        self.ensure_unlocked()?;
        self.repo.export_snapshot()
    }

    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<ImportSummary> {
        self.ensure_unlocked()?;
        self.repo.import_snapshot(bytes)
    }
}
