//! In-memory fake of the Tika REST endpoints.
//!
//! Responses are deterministic and derived from the request body, so tests
//! can predict them exactly. `failing_app` answers 500 to everything.

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

pub const VERSION: &str = "Apache Tika 1.14";
pub const CONTENT_KEY: &str = "X-TIKA:content";
pub const EMBEDDED_CONTENT: &str = "embedded attachment";

pub fn app() -> Router {
    Router::new()
        .route("/tika", put(parse))
        .route("/meta", put(meta))
        .route("/meta/{field}", put(meta_field))
        .route("/rmeta/{format}", put(rmeta))
        .route("/detect/stream", put(detect))
        .route("/language/stream", put(language))
        .route("/language/string", put(language))
        .route("/translate/all/{translator}/{src}/{dst}", put(translate))
        .route("/version", get(version))
        .route("/parsers/details", get(parsers))
        .route("/detectors", get(detectors))
        .route("/mime-types", get(mime_types))
}

/// A server that is reachable but broken: every request gets a 500.
pub fn failing_app() -> Router {
    Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR })
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_app(listener, app()).await
}

pub async fn run_app(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

fn text(body: &Bytes) -> String {
    String::from_utf8_lossy(body).into_owned()
}

fn detect_type(body: &[u8]) -> &'static str {
    if body.starts_with(b"%PDF-") {
        "application/pdf"
    } else if std::str::from_utf8(body).is_ok() {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("application/json"))
}

async fn parse(body: Bytes) -> String {
    text(&body)
}

async fn meta(body: Bytes) -> String {
    format!(
        "\"Content-Type\",\"{}\"\n\"Content-Length\",\"{}\"\n",
        detect_type(&body),
        body.len()
    )
}

async fn meta_field(Path(field): Path<String>, body: Bytes) -> Result<String, StatusCode> {
    match field.as_str() {
        "Content-Type" => Ok(detect_type(&body).to_string()),
        "Content-Length" => Ok(body.len().to_string()),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

/// One unit for the uploaded document and one for a fixed embedded
/// attachment. Single-valued fields are bare strings and `X-Parsed-By` is an
/// array, as on a real server.
async fn rmeta(
    Path(format): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    if !accepts_json(&headers) {
        return Err(StatusCode::NOT_ACCEPTABLE);
    }
    let render: fn(&str) -> Option<String> = match format.as_str() {
        "text" => |s| Some(s.to_string()),
        "html" => |s| Some(format!("<html><body><p>{s}</p></body></html>")),
        "xml" => |s| Some(format!("<doc><p>{s}</p></doc>")),
        "ignore" => |_| None,
        _ => return Err(StatusCode::NOT_FOUND),
    };

    let mut container = Map::new();
    container.insert("Content-Type".into(), detect_type(&body).into());
    container.insert(
        "X-Parsed-By".into(),
        json!([
            "org.apache.tika.parser.DefaultParser",
            "org.apache.tika.parser.txt.TXTParser"
        ]),
    );
    if let Some(content) = render(&text(&body)) {
        container.insert(CONTENT_KEY.into(), content.into());
    }

    let mut embedded = Map::new();
    embedded.insert("Content-Type".into(), "text/plain".into());
    embedded.insert("resourceName".into(), "attachment.txt".into());
    if let Some(content) = render(EMBEDDED_CONTENT) {
        embedded.insert(CONTENT_KEY.into(), content.into());
    }

    Ok(Json(Value::Array(vec![container.into(), embedded.into()])))
}

async fn detect(body: Bytes) -> &'static str {
    detect_type(&body)
}

async fn language(body: Bytes) -> &'static str {
    let lower = text(&body).to_lowercase();
    if lower.contains("bonjour") || lower.contains("merci") {
        "fr"
    } else {
        "en"
    }
}

async fn translate(
    Path((translator, src, dst)): Path<(String, String, String)>,
    body: Bytes,
) -> Result<String, StatusCode> {
    if !translator.starts_with("org.apache.tika.language.translate.") {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(format!("[{src}->{dst}] {}", text(&body)))
}

async fn version() -> &'static str {
    VERSION
}

async fn parsers() -> Json<Value> {
    Json(json!({
        "name": "org.apache.tika.parser.DefaultParser",
        "composite": true,
        "decorated": false,
        "children": [
            {
                "name": "org.apache.tika.parser.pdf.PDFParser",
                "composite": false,
                "decorated": false,
                "supportedTypes": ["application/pdf"]
            },
            {
                "name": "org.apache.tika.parser.txt.TXTParser",
                "composite": false,
                "decorated": true,
                "supportedTypes": ["text/plain"]
            }
        ]
    }))
}

async fn detectors() -> Json<Value> {
    Json(json!({
        "name": "org.apache.tika.detect.DefaultDetector",
        "composite": true,
        "children": [
            { "name": "org.apache.tika.mime.MimeTypes", "composite": false },
            {
                "name": "org.apache.tika.detect.CompositeDetector",
                "composite": true,
                "children": [
                    { "name": "org.apache.tika.parser.microsoft.POIFSContainerDetector", "composite": false }
                ]
            }
        ]
    }))
}

async fn mime_types() -> Json<Value> {
    Json(json!({
        "application/octet-stream": {},
        "application/pdf": {
            "alias": ["application/x-pdf"],
            "supertype": "application/octet-stream"
        },
        "text/plain": {
            "supertype": "application/octet-stream"
        }
    }))
}
