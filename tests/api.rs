use doc_sync::{path, Error, JsonCodec, Store, StoreConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::TempDir;

fn open(dir: &TempDir) -> Store {
    Store::open(StoreConfig::in_dir(dir.path()), JsonCodec::new()).unwrap()
}

// ---- construct ----------------------------------------------------------------

#[test]
fn open_creates_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    assert!(db.path().exists());
    assert_eq!(std::fs::read(db.path()).unwrap(), b"{}");
    assert!(!db.has("x"));
    assert!(db.is_empty());
}

#[test]
fn open_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let db = Store::builder(JsonCodec::new())
        .directory(dir.path().join("a/b/c"))
        .name("state")
        .build()
        .unwrap();
    assert_eq!(db.path(), dir.path().join("a/b/c/state.json"));
    assert!(db.path().exists());
}

#[test]
fn extension_is_normalized_once() {
    let dir = tempfile::tempdir().unwrap();
    let db = Store::builder(JsonCodec::new())
        .directory(dir.path())
        .name("cfg")
        .extension("conf")
        .build()
        .unwrap();
    assert_eq!(db.extension(), ".conf");
    assert_eq!(db.name(), "cfg");
    assert!(db.path().ends_with("cfg.conf"));
}

#[test]
fn open_existing_malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("database.json"), "{ not json").unwrap();
    let err = Store::open(StoreConfig::in_dir(dir.path()), JsonCodec::new()).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn open_empty_file_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("database.json"), "").unwrap();
    let db = open(&dir);
    assert!(db.is_empty());
}

// ---- set / get / has / delete -------------------------------------------------

#[test]
fn set_returns_value_and_get_reads_it() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    let stored = db.set("k", json!({"n": 1})).unwrap();
    assert_eq!(stored, json!({"n": 1}));
    assert_eq!(db.get("k"), Some(json!({"n": 1})));
    assert!(db.has("k"));
}

#[test]
fn dotted_keys_are_not_expanded() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("a.b", json!(1)).unwrap();
    assert_eq!(db.get("a.b"), Some(json!(1)));
    assert!(!db.has("a"));
    assert_eq!(db.keys(), vec!["a.b".to_string()]);
}

#[test]
fn falsy_values_are_present() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("zero", json!(0)).unwrap();
    db.set("no", json!(false)).unwrap();
    db.set("nothing", json!(null)).unwrap();
    assert!(db.has("zero"));
    assert!(db.has("no"));
    assert!(db.has("nothing"));
}

#[test]
fn set_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("k", json!(1)).unwrap();
    db.set("k", json!("two")).unwrap();
    assert_eq!(db.get("k"), Some(json!("two")));
    assert_eq!(db.len(), 1);
}

#[test]
fn empty_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    assert!(matches!(db.set("", json!(1)), Err(Error::InvalidKey(_))));
    assert!(matches!(db.delete(""), Err(Error::InvalidKey(_))));
    assert!(db.is_empty());
}

#[test]
fn delete_reports_removal() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("k", json!(1)).unwrap();
    assert!(db.delete("k").unwrap());
    assert!(!db.has("k"));
    assert!(!db.delete("k").unwrap());
}

#[test]
fn delete_missing_keeps_file_content() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("k", json!(1)).unwrap();
    let before = std::fs::read(db.path()).unwrap();
    assert!(!db.delete("missing").unwrap());
    assert_eq!(std::fs::read(db.path()).unwrap(), before);
}

// ---- snapshots ----------------------------------------------------------------

#[test]
fn to_mapping_preserves_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("z", json!(1)).unwrap();
    db.set("a", json!(2)).unwrap();
    db.set("m", json!(3)).unwrap();

    let map = db.to_mapping();
    let keys: Vec<_> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn to_key_value_lists_is_parallel() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("x", json!(10)).unwrap();
    db.set("y", json!([1, 2])).unwrap();

    let (keys, values) = db.to_key_value_lists();
    assert_eq!(keys, vec!["x".to_string(), "y".to_string()]);
    assert_eq!(values, vec![json!(10), json!([1, 2])]);
    assert_eq!(db.values(), values);
}

#[test]
fn to_expanded_nests_dotted_keys() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("server.port", json!(8080)).unwrap();
    db.set("server.host", json!("localhost")).unwrap();
    db.set("debug", json!(true)).unwrap();

    let nested = db.to_expanded().unwrap();
    assert_eq!(
        serde_json::Value::Object(nested),
        json!({"server": {"port": 8080, "host": "localhost"}, "debug": true})
    );
    // the flat view is unchanged
    assert!(db.has("server.port"));
}

// ---- extend / clear / modify --------------------------------------------------

#[test]
fn extend_bulk_insert() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    let batch: Vec<_> = (0..50).map(|i| (format!("k{i}"), json!(i))).collect();
    db.extend(batch).unwrap();
    assert_eq!(db.len(), 50);
    assert_eq!(db.get("k49"), Some(json!(49)));
}

#[test]
fn extend_with_bad_key_inserts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    let batch = vec![("ok".to_string(), json!(1)), (String::new(), json!(2))];
    assert!(matches!(db.extend(batch), Err(Error::InvalidKey(_))));
    assert!(db.is_empty());
}

#[test]
fn clear_removes_all_entries() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("a", json!(1)).unwrap();
    db.set("b", json!(2)).unwrap();
    db.clear().unwrap();
    assert!(db.is_empty());
    assert_eq!(std::fs::read(db.path()).unwrap(), b"{}");
}

#[test]
fn modify_applies_path_edit() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("prefs", json!({"theme": {"color": "light"}})).unwrap();

    let done = db
        .modify("prefs", |doc| path::set_path(doc, "theme.color", json!("dark")))
        .unwrap();
    assert_eq!(done, Some(()));
    assert_eq!(db.get("prefs"), Some(json!({"theme": {"color": "dark"}})));
}

#[test]
fn modify_missing_key_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    let out = db.modify("nope", |_| Ok(1)).unwrap();
    assert_eq!(out, None);
    assert!(db.is_empty());
}

#[test]
fn modify_error_leaves_value_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("list", json!([1, 2])).unwrap();
    let err = db
        .modify("list", |doc| path::set_path(doc, "a", json!(1)))
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { actual: "array", .. }));
    assert_eq!(db.get("list"), Some(json!([1, 2])));
}

// ---- typed access -------------------------------------------------------------

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Window {
    width: u32,
    height: u32,
    title: String,
}

#[test]
fn typed_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    let win = Window {
        width: 800,
        height: 600,
        title: "main".into(),
    };
    db.set_as("window", &win).unwrap();
    assert_eq!(db.get_as::<Window>("window").unwrap(), Some(win));
    assert_eq!(db.get_as::<Window>("missing").unwrap(), None);
}

#[test]
fn typed_get_with_wrong_shape_errors() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set("window", json!("not a window")).unwrap();
    assert!(matches!(db.get_as::<Window>("window"), Err(Error::Parse(_))));
}

// ---- debug --------------------------------------------------------------------

#[test]
fn debug_impls_dont_panic() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    let dbg_store = format!("{:?}", db);
    assert!(dbg_store.contains("Store"));
    assert!(dbg_store.contains("path"));

    let builder = Store::builder(JsonCodec::new()).directory(dir.path());
    assert!(format!("{:?}", builder).contains("StoreBuilder"));
}
