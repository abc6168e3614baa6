use doc_sync::{path, JsonCodec, Store, StoreConfig};
use serde_json::json;

fn main() -> Result<(), doc_sync::Error> {
    let dir = std::env::temp_dir().join("doc_sync_example_nested");
    let db = Store::open(StoreConfig::in_dir(&dir), JsonCodec::with_indent(4))?;

    db.set("settings", json!({"ui": {"theme": "light"}}))?;

    // edit inside a field with dotted paths
    db.modify("settings", |doc| {
        path::set_path(doc, "ui.theme", json!("dark"))?;
        path::set_path(doc, "ui.font.size", json!(14))?;
        path::merge(doc, &json!({"net": {"retries": 3}}))
    })?;

    if let Some(settings) = db.get("settings") {
        println!("theme     = {:?}", path::get_path(&settings, "ui.theme")?);
        println!("has proxy = {}", path::has_path(&settings, "net.proxy")?);
    }

    db.modify("settings", |doc| path::unset_path(doc, "ui.font"))?;
    println!("{}", std::fs::read_to_string(db.path()).unwrap_or_default());

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
