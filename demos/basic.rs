use doc_sync::{JsonCodec, Store, StoreConfig};
use serde_json::json;

fn main() -> Result<(), doc_sync::Error> {
    let dir = std::env::temp_dir().join("doc_sync_example_basic");
    let db = Store::open(StoreConfig::in_dir(&dir), JsonCodec::new())?;
    println!("backing file = {}", db.path().display());

    // set / get / delete, each one rewrites the file
    db.set("apples", json!(3))?;
    db.set("bananas", json!({"ripe": 5, "green": 2}))?;
    println!("apples  = {:?}", db.get("apples"));
    println!("bananas = {:?}", db.get("bananas"));

    // defer a write, then save explicitly
    db.set_with("oranges", json!(0), false)?;
    db.save()?;

    // snapshots
    let (keys, values) = db.to_key_value_lists();
    println!("keys   = {keys:?}");
    println!("values = {values:?}");
    println!("len    = {}", db.len());

    println!("deleted apples? {}", db.delete("apples")?);
    println!("deleted apples again? {}", db.delete("apples")?);

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
