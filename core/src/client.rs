//! Tika client: one generic dispatcher plus one method per endpoint.
//!
//! # Design
//! `TikaClient` holds only a base URL and a shared `Transport`. It carries
//! no mutable state between calls, so a single client can be cloned or
//! shared across threads freely. Every operation funnels through
//! [`TikaClient::call`], which builds the request, runs it on the
//! transport, and checks the status. The operation then applies exactly one
//! decoder from `crate::decode`, or reads the body as text.

use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::decode;
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::transport::UreqTransport;
use crate::types::{Detector, MetadataRecord, MimeRegistry, Parser, RecursiveFormat, Translator};

const ACCEPT: &str = "Accept";
const CONTENT_TYPE: &str = "Content-Type";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain";

/// Headers applied to every call unless the caller overrides them by name.
const DEFAULT_HEADERS: &[(&str, &str)] = &[(ACCEPT, TEXT)];

/// Synchronous, stateless client for a Tika server.
#[derive(Clone)]
pub struct TikaClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for TikaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TikaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TikaClient {
    /// A client for `base_url` using the default [`UreqTransport`].
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, Arc::new(UreqTransport::new()))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(
            &config.base_url,
            Arc::new(UreqTransport::with_timeout(config.timeout)),
        )
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues one request and returns the raw body of a 2xx response.
    ///
    /// `headers` replace the defaults (`Accept: text/plain`) by
    /// case-insensitive name and are otherwise appended. The body is not
    /// parsed here.
    pub fn call(
        &self,
        body: Option<Vec<u8>>,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>, Error> {
        let method: HttpMethod = method
            .parse()
            .map_err(|_| Error::InvalidMethod(method.to_string()))?;
        let raw_url = format!("{}{}", self.base_url, path);
        let url = Url::parse(&raw_url).map_err(|source| Error::InvalidUrl {
            url: raw_url.clone(),
            source,
        })?;

        let request = HttpRequest {
            method,
            url: url.into(),
            headers: merge_headers(headers),
            body,
        };
        debug!(method = %request.method, url = %request.url, "tika request");

        let response = self.transport.execute(&request).map_err(|e| {
            debug!(url = %request.url, error = %e, "tika transport failed");
            Error::from(e)
        })?;
        debug!(
            url = %request.url,
            status = response.status,
            bytes = response.body.len(),
            "tika response"
        );

        if !response.is_success() {
            return Err(Error::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        Ok(response.body)
    }

    fn call_string(
        &self,
        body: Option<Vec<u8>>,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, Error> {
        let bytes = self.call(body, method, path, headers)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Extracts the plain text of a document.
    pub fn parse(&self, input: impl Read) -> Result<String, Error> {
        self.parse_with_headers(input, &[])
    }

    /// Like [`parse`](Self::parse) with extra request headers, e.g.
    /// `X-Tika-OCRLanguage` or `X-Tika-PDFextractInlineImages`.
    pub fn parse_with_headers(
        &self,
        input: impl Read,
        headers: &[(&str, &str)],
    ) -> Result<String, Error> {
        self.call_string(Some(read_document(input)?), "PUT", "/tika", headers)
    }

    /// Extracts the text of a document and every embedded document, one
    /// entry per unit that produced content.
    pub fn parse_recursive(&self, input: impl Read) -> Result<Vec<String>, Error> {
        self.parse_recursive_as(input, RecursiveFormat::Text)
    }

    pub fn parse_recursive_as(
        &self,
        input: impl Read,
        format: RecursiveFormat,
    ) -> Result<Vec<String>, Error> {
        let body = self.recursive(input, format)?;
        Ok(decode::parse_recursive(&body)?)
    }

    /// Document metadata in the server's flat text form.
    pub fn meta(&self, input: impl Read) -> Result<String, Error> {
        self.call_string(Some(read_document(input)?), "PUT", "/meta", &[])
    }

    /// A single metadata field.
    pub fn meta_field(&self, input: impl Read, field: &str) -> Result<String, Error> {
        let path = format!("/meta/{}", segment(field)?);
        self.call_string(Some(read_document(input)?), "PUT", &path, &[])
    }

    /// Metadata of a document and every embedded document, normalized so
    /// each field maps to a list of values.
    pub fn meta_recursive(&self, input: impl Read) -> Result<Vec<MetadataRecord>, Error> {
        self.meta_recursive_as(input, RecursiveFormat::Text)
    }

    pub fn meta_recursive_as(
        &self,
        input: impl Read,
        format: RecursiveFormat,
    ) -> Result<Vec<MetadataRecord>, Error> {
        let body = self.recursive(input, format)?;
        Ok(decode::meta_recursive(&body)?)
    }

    fn recursive(&self, input: impl Read, format: RecursiveFormat) -> Result<Vec<u8>, Error> {
        let path = format!("/rmeta/{}", format.as_str());
        self.call(Some(read_document(input)?), "PUT", &path, &[(ACCEPT, JSON)])
    }

    /// Detected MIME type of a document.
    pub fn detect(&self, input: impl Read) -> Result<String, Error> {
        self.call_string(Some(read_document(input)?), "PUT", "/detect/stream", &[])
    }

    /// Detected language code of a document.
    pub fn language(&self, input: impl Read) -> Result<String, Error> {
        self.call_string(Some(read_document(input)?), "PUT", "/language/stream", &[])
    }

    /// Detected language code of a piece of text.
    pub fn language_string(&self, text: &str) -> Result<String, Error> {
        self.call_string(
            Some(text.as_bytes().to_vec()),
            "PUT",
            "/language/string",
            &[(CONTENT_TYPE, TEXT)],
        )
    }

    /// Translates a document from language `src` to `dst`.
    pub fn translate(
        &self,
        input: impl Read,
        translator: &Translator,
        src: &str,
        dst: &str,
    ) -> Result<String, Error> {
        let path = format!(
            "/translate/all/{}/{}/{}",
            segment(translator.as_str())?,
            segment(src)?,
            segment(dst)?
        );
        self.call_string(Some(read_document(input)?), "PUT", &path, &[])
    }

    /// The server's version string.
    pub fn version(&self) -> Result<String, Error> {
        self.call_string(None, "GET", "/version", &[])
    }

    /// The parser manifest tree.
    pub fn parsers(&self) -> Result<Parser, Error> {
        let body = self.call(None, "GET", "/parsers/details", &[(ACCEPT, JSON)])?;
        Ok(decode::decode_parser(&body)?)
    }

    /// The detector manifest tree.
    pub fn detectors(&self) -> Result<Detector, Error> {
        let body = self.call(None, "GET", "/detectors", &[(ACCEPT, JSON)])?;
        Ok(decode::decode_detector(&body)?)
    }

    /// Every MIME type the server knows, keyed by name.
    pub fn mime_types(&self) -> Result<MimeRegistry, Error> {
        let body = self.call(None, "GET", "/mime-types", &[(ACCEPT, JSON)])?;
        Ok(decode::decode_mime_types(&body)?)
    }
}

fn read_document(mut input: impl Read) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Percent-encodes a caller-supplied value as a single path segment.
///
/// Empty and dot segments are rejected: URL parsing would collapse them and
/// route the call elsewhere.
fn segment(raw: &str) -> Result<Cow<'_, str>, Error> {
    if matches!(raw, "" | "." | "..") {
        return Err(Error::InvalidPathSegment(raw.to_string()));
    }
    Ok(urlencoding::encode(raw))
}

fn merge_headers(overrides: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = DEFAULT_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    for (name, value) in overrides {
        match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value.to_string(),
            None => merged.push((name.to_string(), value.to_string())),
        }
    }
    merged
}
