//! Serialization formats.
//!
//! A [`Codec`] converts between bytes and a [`Document`], the format-neutral
//! tree that providers pass around. Typed access goes through [`CodecExt`],
//! which is implemented for every codec, including trait objects.
//!
//! Decoding is visitor driven: [`Codec::decode_with`] hands the parsed document
//! to an `accept` callback that performs the final conversion. A failure in the
//! callback counts as a failure of the codec, so a [`CodecGroup`] moves on to
//! its next member when bytes parse but do not fit the requested type.

use crate::error::CodecError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Format-neutral document exchanged between codecs and providers.
pub type Document = serde_json::Value;

/// Callback receiving a decoded document.
pub type Accept<'a> = dyn FnMut(Document) -> Result<(), CodecError> + 'a;

/// A serialization format.
pub trait Codec: Send + Sync {
    /// Short format name, used for diagnostics only.
    fn name(&self) -> &'static str;

    /// Encode a document into bytes.
    fn encode(&self, document: &Document) -> Result<Vec<u8>, CodecError>;

    /// Parse bytes into a document.
    fn decode(&self, data: &[u8]) -> Result<Document, CodecError>;

    /// Parse bytes and pass the document to `accept`.
    ///
    /// An error returned by `accept` is reported as this codec's failure.
    fn decode_with(&self, data: &[u8], accept: &mut Accept<'_>) -> Result<(), CodecError> {
        accept(self.decode(data)?)
    }
}

/// Typed encode/decode on top of [`Codec`].
pub trait CodecExt: Codec {
    /// Encode a serializable value.
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let document = serde_json::to_value(value)?;
        self.encode(&document)
    }

    /// Decode bytes into a value of type `T`.
    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        let mut decoded = None;
        self.decode_with(data, &mut |document: Document| -> Result<(), CodecError> {
            decoded = Some(serde_json::from_value::<T>(document)?);
            Ok(())
        })?;
        decoded.ok_or(CodecError::Exhausted("decode"))
    }
}

impl<C: Codec + ?Sized> CodecExt for C {}

impl<C: Codec + ?Sized> Codec for Arc<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>, CodecError> {
        (**self).encode(document)
    }

    fn decode(&self, data: &[u8]) -> Result<Document, CodecError> {
        (**self).decode(data)
    }

    fn decode_with(&self, data: &[u8], accept: &mut Accept<'_>) -> Result<(), CodecError> {
        (**self).decode_with(data, accept)
    }
}

/// JSON codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact JSON output.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// JSON output indented with two spaces.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>, CodecError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(document)
        } else {
            serde_json::to_vec(document)
        };
        encoded.map_err(|e| CodecError::Encode {
            format: "json",
            message: e.to_string(),
        })
    }

    fn decode(&self, data: &[u8]) -> Result<Document, CodecError> {
        serde_json::from_slice(data).map_err(|e| CodecError::Decode {
            format: "json",
            message: e.to_string(),
        })
    }
}

/// TOML codec.
///
/// The top level of a TOML document must be a table, so any other document is
/// rejected when encoding. Null entries inside a table have no TOML spelling
/// and are left out. Datetimes decode to their RFC 3339 text and are written
/// back as strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TomlCodec {
    pretty: bool,
}

impl TomlCodec {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Multi-line arrays and table headers for nested tables.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for TomlCodec {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>, CodecError> {
        let encoded = if self.pretty {
            toml::to_string_pretty(document)
        } else {
            toml::to_string(document)
        };
        encoded.map(String::into_bytes).map_err(|e| CodecError::Encode {
            format: "toml",
            message: e.to_string(),
        })
    }

    fn decode(&self, data: &[u8]) -> Result<Document, CodecError> {
        let text = std::str::from_utf8(data)?;
        let table: toml::Table = toml::from_str(text).map_err(|e| CodecError::Decode {
            format: "toml",
            message: e.to_string(),
        })?;
        toml_to_document(toml::Value::Table(table))
    }
}

fn toml_to_document(value: toml::Value) -> Result<Document, CodecError> {
    Ok(match value {
        toml::Value::String(s) => Document::String(s),
        toml::Value::Integer(i) => Document::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Document::Number)
            .ok_or_else(|| CodecError::Decode {
                format: "toml",
                message: format!("non-finite float {f} has no document form"),
            })?,
        toml::Value::Boolean(b) => Document::Bool(b),
        toml::Value::Datetime(dt) => Document::String(dt.to_string()),
        toml::Value::Array(items) => Document::Array(
            items
                .into_iter()
                .map(toml_to_document)
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => Document::Object(
            table
                .into_iter()
                .map(|(key, value)| Ok((key, toml_to_document(value)?)))
                .collect::<Result<_, CodecError>>()?,
        ),
    })
}

/// Ordered fallback chain of codecs.
///
/// Every operation returns the result of the first member that succeeds.
/// When all members fail the error does not say which member rejected what;
/// put the strictest codec first.
#[derive(Clone, Default)]
pub struct CodecGroup {
    codecs: Vec<Arc<dyn Codec>>,
}

impl CodecGroup {
    pub fn new(codecs: Vec<Arc<dyn Codec>>) -> Self {
        Self { codecs }
    }

    /// Append a codec with the lowest priority so far.
    pub fn with(mut self, codec: impl Codec + 'static) -> Self {
        self.codecs.push(Arc::new(codec));
        self
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl fmt::Debug for CodecGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.codecs.iter().map(|c| c.name()))
            .finish()
    }
}

impl Codec for CodecGroup {
    fn name(&self) -> &'static str {
        "group"
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>, CodecError> {
        if self.codecs.is_empty() {
            return Err(CodecError::Empty);
        }
        for codec in &self.codecs {
            match codec.encode(document) {
                Ok(bytes) => return Ok(bytes),
                Err(e) => trace!("{} codec could not encode: {}", codec.name(), e),
            }
        }
        Err(CodecError::Exhausted("encode"))
    }

    fn decode(&self, data: &[u8]) -> Result<Document, CodecError> {
        let mut decoded = None;
        self.decode_with(data, &mut |document: Document| -> Result<(), CodecError> {
            decoded = Some(document);
            Ok(())
        })?;
        decoded.ok_or(CodecError::Exhausted("decode"))
    }

    fn decode_with(&self, data: &[u8], accept: &mut Accept<'_>) -> Result<(), CodecError> {
        if self.codecs.is_empty() {
            return Err(CodecError::Empty);
        }
        for codec in &self.codecs {
            match codec.decode_with(data, accept) {
                Ok(()) => return Ok(()),
                Err(e) => trace!("{} codec could not decode: {}", codec.name(), e),
            }
        }
        Err(CodecError::Exhausted("decode"))
    }
}

/// Serialization format selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Toml,
}

impl Format {
    /// Build the codec for this format.
    pub fn codec(self, pretty: bool) -> Arc<dyn Codec> {
        match (self, pretty) {
            (Format::Json, false) => Arc::new(JsonCodec::new()),
            (Format::Json, true) => Arc::new(JsonCodec::pretty()),
            (Format::Toml, false) => Arc::new(TomlCodec::new()),
            (Format::Toml, true) => Arc::new(TomlCodec::pretty()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Toml => write!(f, "toml"),
        }
    }
}
