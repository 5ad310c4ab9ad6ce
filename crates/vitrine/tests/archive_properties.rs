use std::rc::Rc;
use vitrine::api::VitrineApi;
use vitrine::config::VitrineConfig;
use vitrine::error::VitrineError;
use vitrine::gate::GateState;
use vitrine::index::EntryRef;
use vitrine::model::ItemDraft;
use vitrine::search::{ItemQuery, SearchScope};
use vitrine::store::memory::MemStore;

fn r(s: &str) -> EntryRef {
    s.parse().unwrap()
}

fn open(store: &Rc<MemStore>) -> VitrineApi<Rc<MemStore>> {
    let config = VitrineConfig {
        seed_defaults: false,
        ..Default::default()
    };
    VitrineApi::open(Rc::clone(store), config).unwrap()
}

/// A document as written by the browser version of the archive.
const LEGACY_EXPORT: &str = r#"{
  "title": "Sports Car Archive",
  "categories": [
    {
      "id": "cat_k2j4h5g6f",
      "name": "🏎️ Super Cars",
      "description": "Hypercars and supercars collection",
      "items": [
        {
          "id": "it_a1b2c3d4e",
          "title": "Veneno",
          "desc": "",
          "url": "",
          "tags": ["v12", "lamborghini"],
          "image": null,
          "favorite": true
        },
        {
          "id": "it_z9y8x7w6v",
          "title": "Chiron",
          "desc": "Quad-turbo W16",
          "url": "https://www.bugatti.com",
          "tags": [],
          "image": null,
          "favorite": false
        }
      ]
    },
    {
      "id": "cat_q1w2e3r4t",
      "name": "🏁 Race Cars",
      "description": "",
      "items": []
    }
  ]
}"#;

#[test]
fn legacy_export_imports_and_is_searchable() {
    let store = Rc::new(MemStore::new());
    let mut api = open(&store);

    let summary = api.import_snapshot(LEGACY_EXPORT.as_bytes()).unwrap();
    assert_eq!(summary.categories, 2);
    assert_eq!(summary.items, 2);

    let hits = api.search_items("LAMBORGHINI").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].item.id.as_str(), "it_a1b2c3d4e");

    let favorites = api
        .list_items(&r("cat_k2j4h5g6f"), &ItemQuery::favorites())
        .unwrap();
    assert_eq!(favorites.len(), 1);

    // survives a reload from the same store
    let reopened = open(&store);
    assert_eq!(reopened.archive().unwrap().item_count(), 2);
}

#[test]
fn deleted_category_items_never_come_back_from_search() {
    let store = Rc::new(MemStore::new());
    let mut api = open(&store);
    api.import_snapshot(LEGACY_EXPORT.as_bytes()).unwrap();

    api.delete_category(&r("cat_k2j4h5g6f")).unwrap();
    assert!(api.search_items("").unwrap().is_empty());
    assert!(api.search_items("veneno").unwrap().is_empty());
    assert_eq!(api.search_categories("").unwrap().len(), 1);
}

#[test]
fn search_is_idempotent_and_order_preserving() {
    let store = Rc::new(MemStore::new());
    let mut api = open(&store);
    api.import_snapshot(LEGACY_EXPORT.as_bytes()).unwrap();

    let scope = SearchScope::Category("cat_k2j4h5g6f".into());
    let first: Vec<String> = api
        .search("", &scope)
        .unwrap()
        .iter()
        .map(|h| format!("{:?}", h))
        .collect();
    let second: Vec<String> = api
        .search("", &scope)
        .unwrap()
        .iter()
        .map(|h| format!("{:?}", h))
        .collect();
    assert_eq!(first, second);

    let titles: Vec<&str> = api
        .search_items("")
        .unwrap()
        .iter()
        .map(|h| h.item.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Veneno", "Chiron"]);
}

#[test]
fn renamed_top_level_field_is_rejected_and_archive_kept() {
    let store = Rc::new(MemStore::new());
    let mut api = open(&store);
    api.import_snapshot(LEGACY_EXPORT.as_bytes()).unwrap();

    let wrong = LEGACY_EXPORT.replacen("\"categories\"", "\"cats\"", 1);
    let err = api.import_snapshot(wrong.as_bytes()).unwrap_err();
    assert!(matches!(err, VitrineError::Parse(_)));
    assert_eq!(api.archive().unwrap().categories.len(), 2);
}

#[test]
fn empty_title_leaves_item_count_unchanged() {
    let store = Rc::new(MemStore::new());
    let mut api = open(&store);
    let cat = api.create_category("Super Cars", None).unwrap();
    let err = api
        .create_item(&r(cat.id.as_str()), ItemDraft::new(""))
        .unwrap_err();
    assert!(matches!(err, VitrineError::InvalidInput(_)));
    assert_eq!(api.archive().unwrap().item_count(), 0);
}

#[test]
fn pin_lifecycle_across_sessions() {
    let store = Rc::new(MemStore::new());
    {
        let mut api = open(&store);
        api.set_pin("1234").unwrap();
        assert_eq!(api.gate_state(), GateState::Unlocked);
    }

    let mut api = open(&store);
    assert_eq!(api.gate_state(), GateState::Locked);
    assert!(!api.unlock("0000").unwrap());
    assert_eq!(api.gate_state(), GateState::Locked);
    assert!(api.unlock("1234").unwrap());
    assert_eq!(api.gate_state(), GateState::Unlocked);
}

#[test]
fn write_failure_is_surfaced() {
    let store = Rc::new(MemStore::new());
    let mut api = open(&store);
    let cat = api.create_category("Super Cars", None).unwrap();

    store.set_simulate_write_error(true);
    let err = api.toggle_favorite(&r(cat.id.as_str()), &r("1")).unwrap_err();
    assert!(matches!(err, VitrineError::ItemNotFound(_)));

    let err = api.create_category("Sedans", None).unwrap_err();
    assert!(matches!(err, VitrineError::Store(_)));
    assert_eq!(api.archive().unwrap().categories.len(), 1);
}
