//! Core store type and builder.

use crate::codec::{Codec, JsonCodec, MsgPackCodec};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::flush::FlushPolicy;
use crate::path;
use crate::persist::{atomic_write, ensure_parent, read_bytes, write_if_missing};
use crate::value::{Mapping, Value};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File-backed store of top-level fields.
///
/// Keys are flat: `"a.b"` is one key named `a.b`, never a path. Values can be
/// any nested [`Value`]; use the helpers in [`path`](crate::path) (or
/// [`modify`](Self::modify)) to reach inside them.
///
/// With the default [`FlushPolicy::Immediate`] every `set`/`delete`
/// rewrites the whole file before returning. The file is never held open
/// between calls and is not locked against other processes.
pub struct Store<C = JsonCodec> {
    map: RwLock<Mapping>,
    path: PathBuf,
    name: String,
    extension: String,
    codec: C,
    policy: FlushPolicy,
}

impl<C: Codec> Store<C> {
    /// Open (or create) the store described by `config`.
    ///
    /// Creates the parent directory and, if the file is missing, an empty
    /// document, then loads the file into memory.
    pub fn open(config: StoreConfig, codec: C) -> Result<Self> {
        let (path, extension) = config.resolve(codec.extension())?;
        ensure_parent(&path)?;

        let store = Store {
            map: RwLock::new(Mapping::new()),
            path,
            name: config.name,
            extension,
            codec,
            policy: config.policy,
        };

        let empty = store.codec.serialize(&Mapping::new())?;
        if write_if_missing(&store.path, &empty)? {
            log::debug!("Created empty store at {}", store.path.display());
        }
        store.read()?;
        Ok(store)
    }

    /// Start configuring a new store. Call [`.build()`](StoreBuilder::build)
    /// when ready.
    pub fn builder(codec: C) -> StoreBuilder<C> {
        StoreBuilder::new(codec)
    }

    // ---- reads ----

    /// Get the value for `key`, or `None` if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.map.read().get(key).cloned()
    }

    /// Get the value for `key` decoded into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| Error::Parse(e.to_string()))
    }

    /// `true` if the key exists, whatever its value.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.map.read().contains_key(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// `true` when the store has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all keys, in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.map.read().keys().cloned().collect()
    }

    /// Snapshot of all values, in insertion order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.map.read().values().cloned().collect()
    }

    /// Snapshot of every field as a flat mapping.
    #[must_use]
    pub fn to_mapping(&self) -> Mapping {
        self.map.read().clone()
    }

    /// Snapshot split into parallel key and value lists.
    #[must_use]
    pub fn to_key_value_lists(&self) -> (Vec<String>, Vec<Value>) {
        self.map
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .unzip()
    }

    /// Snapshot with dotted keys expanded into nested objects.
    pub fn to_expanded(&self) -> Result<Mapping> {
        path::expand(&self.map.read())
    }

    /// Absolute path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured base name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized extension, always starting with `.`.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Write policy in effect.
    #[must_use]
    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    /// Codec bound at construction.
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    // ---- writes ----

    /// Store `value` under `key` and write through. Returns the stored value.
    pub fn set(&self, key: impl Into<String>, value: Value) -> Result<Value> {
        self.set_with(key, value, true)
    }

    /// Like [`set`](Self::set), but only writes when `auto_persist` is true
    /// (and the policy is [`FlushPolicy::Immediate`]).
    pub fn set_with(
        &self,
        key: impl Into<String>,
        value: Value,
        auto_persist: bool,
    ) -> Result<Value> {
        let key = key.into();
        check_key(&key)?;
        log::trace!("set {key}");
        self.map.write().insert(key, value.clone());
        self.after_mutation(auto_persist)?;
        Ok(value)
    }

    /// Serialize `value` and store it under `key`.
    pub fn set_as<T: Serialize>(&self, key: impl Into<String>, value: &T) -> Result<Value> {
        let value = serde_json::to_value(value).map_err(|e| Error::Serialize(e.to_string()))?;
        self.set(key, value)
    }

    /// Remove `key` and write through. Returns whether anything was removed.
    pub fn delete(&self, key: &str) -> Result<bool> {
        self.delete_with(key, true)
    }

    /// Like [`delete`](Self::delete), but only writes when `auto_persist`
    /// is true (and the policy is [`FlushPolicy::Immediate`]).
    pub fn delete_with(&self, key: &str, auto_persist: bool) -> Result<bool> {
        check_key(key)?;
        log::trace!("delete {key}");
        let removed = self.map.write().shift_remove(key).is_some();
        self.after_mutation(auto_persist)?;
        Ok(removed)
    }

    /// Bulk-insert from an iterator. Only writes once at the end, not once
    /// per entry. Nothing is inserted if any key is invalid.
    pub fn extend<I>(&self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let entries: Vec<(String, Value)> = iter.into_iter().collect();
        for (k, _) in &entries {
            check_key(k)?;
        }
        {
            let mut map = self.map.write();
            for (k, v) in entries {
                map.insert(k, v);
            }
        }
        self.after_mutation(true)
    }

    /// Drop all fields from the store.
    pub fn clear(&self) -> Result<()> {
        self.map.write().clear();
        self.after_mutation(true)
    }

    /// Edit the value at `key` in place, then write through once.
    ///
    /// `f` works on a copy, so an error from it leaves the store untouched.
    /// Returns `Ok(None)` when the key doesn't exist (nothing happens then).
    ///
    /// ```rust,no_run
    /// use doc_sync::{path, Store, StoreConfig, JsonCodec};
    /// use serde_json::json;
    ///
    /// let db = Store::open(StoreConfig::default(), JsonCodec::new()).unwrap();
    /// db.set("prefs", json!({})).unwrap();
    /// db.modify("prefs", |doc| path::set_path(doc, "theme.color", json!("dark")))
    ///     .unwrap();
    /// ```
    pub fn modify<F, R>(&self, key: &str, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut Value) -> Result<R>,
    {
        let Some(mut value) = self.get(key) else {
            return Ok(None);
        };
        let out = f(&mut value)?;
        self.set(key, value)?;
        Ok(Some(out))
    }

    // ---- persistence ----

    /// Write the full mapping to disk, whatever the policy.
    pub fn save(&self) -> Result<()> {
        let bytes = self.snapshot()?;
        atomic_write(&self.path, &bytes)
    }

    /// Load the backing file into memory.
    ///
    /// Loading is additive: loaded keys overwrite their in-memory values,
    /// but keys that exist only in memory are kept.
    pub fn read(&self) -> Result<()> {
        let bytes = read_bytes(&self.path)?;
        if bytes.is_empty() {
            return Ok(());
        }
        let loaded = self.codec.deserialize(&bytes)?;
        log::trace!("loaded {} fields from {}", loaded.len(), self.path.display());
        let mut map = self.map.write();
        for (k, v) in loaded {
            map.insert(k, v);
        }
        Ok(())
    }

    /// Current mapping serialized with the bound codec.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        self.codec.serialize(&self.map.read())
    }

    /// Write an already-serialized `snapshot` to `dest`, creating its parent
    /// directory first. The store itself is not touched.
    pub fn clone_with(&self, dest: impl AsRef<Path>, snapshot: &[u8]) -> Result<()> {
        let dest = dest.as_ref();
        if dest.as_os_str().is_empty() {
            return Err(Error::Config("clone destination is empty".to_string()));
        }
        ensure_parent(dest)?;
        log::debug!("Cloning {} to {}", self.path.display(), dest.display());
        atomic_write(dest, snapshot)
    }

    /// Serialize the current mapping and clone it to `dest`, or to
    /// [`default_clone_path`](Self::default_clone_path) when `None`.
    /// Returns where the copy was written.
    pub fn clone_to(&self, dest: Option<&Path>) -> Result<PathBuf> {
        let dest = dest.map_or_else(|| self.default_clone_path(), Path::to_path_buf);
        let snapshot = self.snapshot()?;
        self.clone_with(&dest, &snapshot)?;
        Ok(dest)
    }

    /// `<path>-clone<extension>`, next to the backing file.
    #[must_use]
    pub fn default_clone_path(&self) -> PathBuf {
        let mut p: OsString = self.path.clone().into_os_string();
        p.push("-clone");
        p.push(&self.extension);
        PathBuf::from(p)
    }

    // ---- internal ----

    fn after_mutation(&self, auto_persist: bool) -> Result<()> {
        if self.policy.writes_on_mutation(auto_persist) {
            self.save()?;
        }
        Ok(())
    }
}

impl Store<MsgPackCodec> {
    /// Replace the value at `key` by deleting it and setting it again.
    ///
    /// This is two separate writes and is not atomic: if the second one
    /// fails the key is left absent, both in memory and on disk.
    pub fn update(&self, key: impl Into<String>, value: Value) -> Result<Value> {
        let key = key.into();
        if self.has(&key) {
            self.delete(&key)?;
        }
        self.set(key, value)
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidKey("key is empty".to_string()));
    }
    Ok(())
}

impl<C> std::fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`Store`].
///
/// ```rust,no_run
/// use doc_sync::{FlushPolicy, JsonCodec, Store};
///
/// let db = Store::builder(JsonCodec::with_indent(4))
///     .directory("data")
///     .name("settings")
///     .policy(FlushPolicy::Manual)
///     .build()
///     .unwrap();
/// ```
pub struct StoreBuilder<C> {
    config: StoreConfig,
    codec: C,
}

impl<C: Codec> StoreBuilder<C> {
    fn new(codec: C) -> Self {
        Self {
            config: StoreConfig::default(),
            codec,
        }
    }

    /// Directory holding the file (default: current working directory).
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.directory = Some(directory.into());
        self
    }

    /// Base file name (default: [`DEFAULT_NAME`](crate::config::DEFAULT_NAME)).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Override the codec's extension.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.config.extension = Some(extension.into());
        self
    }

    /// Set the flush policy (default: [`FlushPolicy::Immediate`]).
    pub fn policy(mut self, policy: FlushPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Replace the whole config at once.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Load (or create) the store.
    pub fn build(self) -> Result<Store<C>> {
        Store::open(self.config, self.codec)
    }
}

impl<C> std::fmt::Debug for StoreBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
