//! Domain types returned by the Tika client.
//!
//! # Design
//! These types derive `Serialize` with the service's wire names so callers
//! can re-emit them as JSON, but they deliberately do not derive
//! `Deserialize`: decoding goes through `crate::decode`, which checks the
//! payload shape explicitly instead of trusting serde's lenient struct
//! visitors (which, for instance, accept a JSON array in place of an object).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Metadata of one document unit: field name to its values, in source order.
pub type MetadataRecord = BTreeMap<String, Vec<String>>;

/// MIME type name to its registry entry.
pub type MimeRegistry = BTreeMap<String, MimeType>;

/// A node of the parser manifest returned by `/parsers/details`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parser {
    pub name: String,
    /// The parser delegates to its children rather than parsing directly.
    pub composite: bool,
    pub decorated: bool,
    pub supported_types: Vec<String>,
    pub children: Vec<Parser>,
}

/// A node of the detector manifest returned by `/detectors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Detector {
    pub name: String,
    pub composite: bool,
    pub children: Vec<Detector>,
}

/// One entry of the MIME type registry returned by `/mime-types`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MimeType {
    /// Parent type in the hierarchy; empty when there is none.
    #[serde(rename = "supertype")]
    pub super_type: String,
    pub alias: Vec<String>,
}

impl MimeType {
    pub fn super_type(&self) -> Option<&str> {
        (!self.super_type.is_empty()).then_some(self.super_type.as_str())
    }
}

/// Walks a manifest tree depth-first, parent before children.
pub trait TreeNode: Sized {
    fn name(&self) -> &str;
    fn children(&self) -> &[Self];

    /// Depth-first, pre-order list of every node name in the tree.
    fn names(&self) -> Vec<&str> {
        let mut out = vec![self.name()];
        for child in self.children() {
            out.extend(child.names());
        }
        out
    }
}

impl TreeNode for Parser {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

impl TreeNode for Detector {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Content rendering requested from the recursive metadata endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecursiveFormat {
    #[default]
    Text,
    Html,
    Xml,
    /// Metadata only; no `X-TIKA:content` field is produced.
    Ignore,
}

impl RecursiveFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            RecursiveFormat::Text => "text",
            RecursiveFormat::Html => "html",
            RecursiveFormat::Xml => "xml",
            RecursiveFormat::Ignore => "ignore",
        }
    }
}

/// Translation backend, named by its server-side class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Translator {
    Lingo24,
    Google,
    Moses,
    Joshua,
    Microsoft,
    Yandex,
    /// Any other translator class name, passed through verbatim.
    Custom(String),
}

impl Translator {
    pub fn as_str(&self) -> &str {
        match self {
            Translator::Lingo24 => "org.apache.tika.language.translate.Lingo24Translator",
            Translator::Google => "org.apache.tika.language.translate.GoogleTranslator",
            Translator::Moses => "org.apache.tika.language.translate.MosesTranslator",
            Translator::Joshua => "org.apache.tika.language.translate.JoshuaTranslator",
            Translator::Microsoft => "org.apache.tika.language.translate.MicrosoftTranslator",
            Translator::Yandex => "org.apache.tika.language.translate.YandexTranslator",
            Translator::Custom(name) => name,
        }
    }
}

impl fmt::Display for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Translator {
    fn from(name: &str) -> Self {
        Translator::Custom(name.to_string())
    }
}
