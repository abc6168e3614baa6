//! Embedded, file-backed document store.
//!
//! A [`Store`] is bound to one file and keeps its top-level fields in memory.
//! Every `set`/`delete` rewrites the whole file (unless you opt out per call
//! or pick [`FlushPolicy::Manual`]). Pick a codec (JSON text or MessagePack
//! binary) and you're good to go. Values are arbitrary nested documents; the
//! [`path`] module reads and writes inside them with dotted paths.
//!
//! ```rust,no_run
//! use doc_sync::{path, JsonCodec, Store};
//! use serde_json::json;
//!
//! let db = Store::builder(JsonCodec::new()).directory("data").build().unwrap();
//! db.set("user", json!({"name": "ada"})).unwrap();
//!
//! let mut user = db.get("user").unwrap();
//! path::set_path(&mut user, "langs.first", json!("rust")).unwrap();
//! db.set("user", user).unwrap();
//! ```
//!
//! **Single-process only.** If multiple processes open the same file they will
//! clobber each other; the last full-file write wins.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod error;
pub mod flush;
pub mod path;
pub mod persist;
pub mod store;
pub mod value;

pub use codec::{Codec, JsonCodec, MsgPackCodec};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use flush::FlushPolicy;
pub use store::{Store, StoreBuilder};
pub use value::{Mapping, Value};
