//! Structural decoders for Tika's JSON responses.
//!
//! # Design
//! Tika's JSON is loosely typed: a metadata field is a bare string when it
//! has one value and an array when it has several, and manifest trees omit
//! any field that holds its default. Every decoder here parses into
//! `serde_json::Value` first and then walks it by hand, branching on the
//! value kind at each decision point. That keeps one stable output shape for
//! callers and lets a wrong kind anywhere fail the whole decode with the JSON
//! path of the offending value. No decoder returns a partial result.
//!
//! All functions are pure and take the raw response body.

use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::types::{Detector, MetadataRecord, MimeRegistry, MimeType, Parser};

/// Key under which the recursive endpoint reports extracted content.
pub const CONTENT_KEY: &str = "X-TIKA:content";

const ROOT: &str = "$";

/// Extracts the `X-TIKA:content` value of every unit in a recursive response.
///
/// Units without the key (or with a `null` value) contribute nothing.
pub fn parse_recursive(body: &[u8]) -> Result<Vec<String>, DecodeError> {
    let root: Value = serde_json::from_slice(body)?;
    let units = expect_array(&root, ROOT)?;

    let mut content = Vec::new();
    for (i, unit) in units.iter().enumerate() {
        let path = index_path(ROOT, i);
        let fields = Fields::new(unit, &path)?;
        if let Some(text) = fields.optional_str(CONTENT_KEY)? {
            content.push(text.to_string());
        }
    }
    Ok(content)
}

/// Normalizes every unit of a recursive response into a [`MetadataRecord`].
///
/// A string value becomes a one-element list and an array of strings is
/// kept in order. Any other value kind fails the whole decode.
pub fn meta_recursive(body: &[u8]) -> Result<Vec<MetadataRecord>, DecodeError> {
    let root: Value = serde_json::from_slice(body)?;
    expect_array(&root, ROOT)?
        .iter()
        .enumerate()
        .map(|(i, unit)| metadata_record(unit, &index_path(ROOT, i)))
        .collect()
}

fn metadata_record(value: &Value, path: &str) -> Result<MetadataRecord, DecodeError> {
    expect_object(value, path)?
        .iter()
        .map(|(key, value)| {
            let values = metadata_values(value, &field_path(path, key))?;
            Ok::<_, DecodeError>((key.clone(), values))
        })
        .collect()
}

fn metadata_values(value: &Value, path: &str) -> Result<Vec<String>, DecodeError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(unexpected(&index_path(path, i), "string", other)),
            })
            .collect(),
        other => Err(unexpected(path, "string or array of strings", other)),
    }
}

/// Decodes the parser manifest tree.
pub fn decode_parser(body: &[u8]) -> Result<Parser, DecodeError> {
    let root: Value = serde_json::from_slice(body)?;
    parser_node(&root, ROOT)
}

/// Decodes the detector manifest tree.
pub fn decode_detector(body: &[u8]) -> Result<Detector, DecodeError> {
    let root: Value = serde_json::from_slice(body)?;
    detector_node(&root, ROOT)
}

fn parser_node(value: &Value, path: &str) -> Result<Parser, DecodeError> {
    let fields = Fields::new(value, path)?;
    Ok(Parser {
        name: fields.required_string("name")?,
        composite: fields.optional_bool("composite")?,
        decorated: fields.optional_bool("decorated")?,
        supported_types: fields.optional_strings("supportedTypes")?,
        children: fields.children("children", parser_node)?,
    })
}

fn detector_node(value: &Value, path: &str) -> Result<Detector, DecodeError> {
    let fields = Fields::new(value, path)?;
    Ok(Detector {
        name: fields.required_string("name")?,
        composite: fields.optional_bool("composite")?,
        children: fields.children("children", detector_node)?,
    })
}

/// Decodes the MIME type registry: an object of MIME name to entry object.
pub fn decode_mime_types(body: &[u8]) -> Result<MimeRegistry, DecodeError> {
    let root: Value = serde_json::from_slice(body)?;
    expect_object(&root, ROOT)?
        .iter()
        .map(|(name, entry)| {
            let path = field_path(ROOT, name);
            let fields = Fields::new(entry, &path)?;
            let mime = MimeType {
                super_type: fields.optional_str("supertype")?.unwrap_or_default().to_string(),
                alias: fields.optional_strings("alias")?,
            };
            Ok::<_, DecodeError>((name.clone(), mime))
        })
        .collect()
}

/// Typed field access on one JSON object, reporting errors at `path`.
///
/// Optional accessors treat an absent key and an explicit `null` alike.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value, path: &'a str) -> Result<Self, DecodeError> {
        Ok(Self {
            map: expect_object(value, path)?,
            path,
        })
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn required_string(&self, key: &str) -> Result<String, DecodeError> {
        let value = self.get(key).ok_or_else(|| DecodeError::MissingField {
            path: field_path(self.path, key),
        })?;
        Ok(expect_str(value, &field_path(self.path, key))?.to_string())
    }

    fn optional_str(&self, key: &str) -> Result<Option<&'a str>, DecodeError> {
        self.get(key)
            .map(|v| expect_str(v, &field_path(self.path, key)))
            .transpose()
    }

    fn optional_bool(&self, key: &str) -> Result<bool, DecodeError> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(unexpected(&field_path(self.path, key), "boolean", other)),
        }
    }

    fn optional_strings(&self, key: &str) -> Result<Vec<String>, DecodeError> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let path = field_path(self.path, key);
        expect_array(value, &path)?
            .iter()
            .enumerate()
            .map(|(i, item)| expect_str(item, &index_path(&path, i)).map(str::to_string))
            .collect()
    }

    /// Decodes each element of an optional array with `decode`, in order.
    fn children<T>(
        &self,
        key: &str,
        decode: fn(&Value, &str) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let path = field_path(self.path, key);
        expect_array(value, &path)?
            .iter()
            .enumerate()
            .map(|(i, child)| decode(child, &index_path(&path, i)))
            .collect()
    }
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| unexpected(path, "object", value))
}

fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, DecodeError> {
    value
        .as_array()
        .ok_or_else(|| unexpected(path, "array", value))
}

fn expect_str<'a>(value: &'a Value, path: &str) -> Result<&'a str, DecodeError> {
    value
        .as_str()
        .ok_or_else(|| unexpected(path, "string", value))
}

fn unexpected(path: &str, expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::UnexpectedType {
        path: path.to_string(),
        expected,
        found: kind_name(found),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// `$.name` for plain identifiers, `$["X-TIKA:content"]` otherwise.
fn field_path(parent: &str, key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if plain {
        format!("{parent}.{key}")
    } else {
        format!("{parent}[{key:?}]")
    }
}
