use doc_sync::{FlushPolicy, MsgPackCodec, Store};
use serde_json::json;

fn main() -> Result<(), doc_sync::Error> {
    let dir = std::env::temp_dir().join("doc_sync_example_builder");
    let db = Store::builder(MsgPackCodec::new())
        .directory(&dir)
        .name("cache")
        .policy(FlushPolicy::Manual)
        .build()?;

    db.set("hits", json!(10))?;
    db.update("hits", json!(11))?;
    db.save()?;
    println!("{} -> {:?}", db.path().display(), db.get("hits"));

    let copy = db.clone_to(None)?;
    println!("cloned to {}", copy.display());

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
