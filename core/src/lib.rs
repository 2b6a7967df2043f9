//! Synchronous client core for an Apache Tika server.
//!
//! # Overview
//! `TikaClient` exposes one method per Tika endpoint (text extraction,
//! metadata, MIME and language detection, translation, and the parser,
//! detector and MIME-type manifests). Every method goes through a single
//! dispatcher and then applies one decoder to the response body.
//!
//! # Design
//! - `TikaClient` is stateless. It holds only a base URL and an
//!   `Arc<dyn Transport>`.
//! - The network sits behind the `Transport` trait. `UreqTransport` is the
//!   default, and tests inject closures or canned responders.
//! - Decoders in [`decode`] are pure functions over the body bytes. They
//!   normalize Tika's loosely typed JSON into fixed shapes and reject
//!   anything else with a path-bearing `DecodeError`.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::TikaClient;
pub use config::ClientConfig;
pub use error::{DecodeError, Error, ErrorKind, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use transport::UreqTransport;
pub use types::{
    Detector, MetadataRecord, MimeRegistry, MimeType, Parser, RecursiveFormat, Translator, TreeNode,
};
