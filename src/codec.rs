//! Codec layer: how a mapping becomes bytes on disk and back.
//!
//! Two codecs ship with the crate: [`JsonCodec`] (human-readable text) and
//! [`MsgPackCodec`] (compact binary). Implement [`Codec`] to plug in another
//! format.

use crate::error::{Error, Result};
use crate::value::Mapping;
use serde::Serialize;
use std::io::Cursor;

/// Converts the store's mapping to/from bytes for persistence.
///
/// `deserialize(serialize(m))` must give back `m`. Codecs may normalize
/// number formatting, but key order is kept.
pub trait Codec: Send + Sync {
    /// File extension this codec writes, with or without the leading dot.
    fn extension(&self) -> &str;

    /// Encode a mapping to bytes.
    fn serialize(&self, data: &Mapping) -> Result<Vec<u8>>;

    /// Decode bytes back into a mapping. Anything that is not a well-formed
    /// document with a mapping at its root is an [`Error::Parse`].
    fn deserialize(&self, bytes: &[u8]) -> Result<Mapping>;
}

/// Default indentation width for [`JsonCodec`].
pub const DEFAULT_INDENT: usize = 2;

/// JSON text codec with a fixed indentation width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonCodec {
    indent: usize,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl JsonCodec {
    /// Pretty JSON indented by [`DEFAULT_INDENT`] spaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty JSON indented by `indent` spaces. `0` means compact,
    /// single-line output.
    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }

    /// Indentation width used for every write.
    pub fn indent(&self) -> usize {
        self.indent
    }
}

impl Codec for JsonCodec {
    fn extension(&self) -> &str {
        ".json"
    }

    fn serialize(&self, data: &Mapping) -> Result<Vec<u8>> {
        if self.indent == 0 {
            return serde_json::to_vec(data).map_err(|e| Error::Serialize(e.to_string()));
        }
        let indent = vec![b' '; self.indent];
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        data.serialize(&mut ser).map_err(|e| Error::Serialize(e.to_string()))?;
        Ok(out)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Mapping> {
        serde_json::from_slice(bytes).map_err(|e| Error::Parse(e.to_string()))
    }
}

/// MessagePack binary codec.
///
/// Used with a [`Store`](crate::Store), the store's own mapping doubles as
/// this codec's cache, and [`Store::update`](crate::Store::update) becomes
/// available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for MsgPackCodec {
    fn extension(&self) -> &str {
        ".msgpack"
    }

    fn serialize(&self, data: &Mapping) -> Result<Vec<u8>> {
        rmp_serde::to_vec(data).map_err(Error::from)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Mapping> {
        let mut cursor = Cursor::new(bytes);
        let map: Mapping = rmp_serde::from_read(&mut cursor)?;
        let consumed = cursor.position();
        if consumed != bytes.len() as u64 {
            return Err(Error::Parse(format!(
                "trailing bytes after document: {} of {} bytes read",
                consumed,
                bytes.len()
            )));
        }
        Ok(map)
    }
}
