//! Every client operation against the live mock server over real HTTP.
//!
//! # Design
//! Starts `tika-mock-server` on a random port in its own tokio runtime
//! thread, then drives the client through the default `UreqTransport`. A
//! second server built from `failing_app` checks that every operation turns
//! a 500 into a status error.

use std::net::SocketAddr;

use tika_core::{
    ClientConfig, Error, ErrorKind, RecursiveFormat, TikaClient, Translator, TreeNode,
};

/// Serve `router` on an ephemeral port and return its address.
fn spawn(router: axum::Router) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            tika_mock_server::run_app(listener, router).await
        })
        .unwrap();
    });
    addr
}

fn live_client() -> TikaClient {
    let addr = spawn(tika_mock_server::app());
    TikaClient::new(&format!("http://{addr}"))
}

#[test]
fn scalar_endpoints() {
    let client = live_client();

    assert_eq!(client.parse(&b"plain words"[..]).unwrap(), "plain words");
    assert_eq!(client.detect(&b"%PDF-1.7"[..]).unwrap(), "application/pdf");
    assert_eq!(client.language(&b"hello there"[..]).unwrap(), "en");
    assert_eq!(client.language_string("merci beaucoup").unwrap(), "fr");
    assert_eq!(client.version().unwrap(), tika_mock_server::VERSION);
    assert_eq!(
        client.meta_field(&b"abc"[..], "Content-Length").unwrap(),
        "3"
    );
    assert!(client.meta(&b"abc"[..]).unwrap().contains("\"Content-Type\",\"text/plain\""));
    assert_eq!(
        client
            .translate(&b"bonjour"[..], &Translator::Google, "fr", "en")
            .unwrap(),
        "[fr->en] bonjour"
    );
}

#[test]
fn unknown_meta_field_is_status_error() {
    let err = live_client().meta_field(&b"abc"[..], "dc:title").unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[test]
fn recursive_endpoints_normalize_units() {
    let client = live_client();

    let content = client.parse_recursive(&b"top level"[..]).unwrap();
    assert_eq!(content, vec!["top level", tika_mock_server::EMBEDDED_CONTENT]);

    let records = client.meta_recursive(&b"top level"[..]).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["Content-Type"], vec!["text/plain"]);
    assert_eq!(
        records[0]["X-Parsed-By"],
        vec![
            "org.apache.tika.parser.DefaultParser",
            "org.apache.tika.parser.txt.TXTParser"
        ]
    );
    assert_eq!(records[1]["resourceName"], vec!["attachment.txt"]);
}

#[test]
fn recursive_formats() {
    let client = live_client();

    let html = client
        .parse_recursive_as(&b"x"[..], RecursiveFormat::Html)
        .unwrap();
    assert_eq!(html[0], "<html><body><p>x</p></body></html>");

    let ignored = client
        .parse_recursive_as(&b"x"[..], RecursiveFormat::Ignore)
        .unwrap();
    assert!(ignored.is_empty());

    let records = client
        .meta_recursive_as(&b"x"[..], RecursiveFormat::Ignore)
        .unwrap();
    assert!(records.iter().all(|r| !r.contains_key("X-TIKA:content")));
}

#[test]
fn manifests() {
    let client = live_client();

    let parsers = client.parsers().unwrap();
    assert!(parsers.composite);
    assert_eq!(parsers.children.len(), 2);
    assert_eq!(parsers.children[0].supported_types, vec!["application/pdf"]);
    assert!(parsers.children[1].decorated);

    let detectors = client.detectors().unwrap();
    assert_eq!(
        detectors.names(),
        vec![
            "org.apache.tika.detect.DefaultDetector",
            "org.apache.tika.mime.MimeTypes",
            "org.apache.tika.detect.CompositeDetector",
            "org.apache.tika.parser.microsoft.POIFSContainerDetector",
        ]
    );

    let mimes = client.mime_types().unwrap();
    assert_eq!(mimes.len(), 3);
    assert_eq!(mimes["application/octet-stream"].super_type(), None);
    assert_eq!(mimes["application/pdf"].alias, vec!["application/x-pdf"]);
    assert_eq!(mimes["text/plain"].super_type, "application/octet-stream");
}

#[test]
fn from_config_reaches_server() {
    let addr = spawn(tika_mock_server::app());
    let config = ClientConfig {
        base_url: format!("http://{addr}/"),
        timeout: Some(std::time::Duration::from_secs(10)),
    };
    let client = TikaClient::from_config(&config);
    assert_eq!(client.base_url(), format!("http://{addr}"));
    assert_eq!(client.version().unwrap(), tika_mock_server::VERSION);
}

#[test]
fn failing_server_yields_status_errors() {
    let addr = spawn(tika_mock_server::failing_app());
    let client = TikaClient::new(&format!("http://{addr}"));
    let doc = &b"doc"[..];

    let errors: Vec<(&str, Error)> = vec![
        ("parse", client.parse(doc).unwrap_err()),
        ("parse_recursive", client.parse_recursive(doc).unwrap_err()),
        ("meta", client.meta(doc).unwrap_err()),
        ("meta_field", client.meta_field(doc, "k").unwrap_err()),
        ("meta_recursive", client.meta_recursive(doc).unwrap_err()),
        ("detect", client.detect(doc).unwrap_err()),
        ("language", client.language(doc).unwrap_err()),
        ("language_string", client.language_string("t").unwrap_err()),
        (
            "translate",
            client
                .translate(doc, &Translator::from("translator"), "src", "dst")
                .unwrap_err(),
        ),
        ("parsers", client.parsers().unwrap_err()),
        ("detectors", client.detectors().unwrap_err()),
        ("mime_types", client.mime_types().unwrap_err()),
        ("version", client.version().unwrap_err()),
    ];
    for (name, err) in errors {
        assert_eq!(err.kind(), ErrorKind::Status, "{name}");
        assert_eq!(err.status(), Some(500), "{name}");
    }
}

#[test]
fn call_errors() {
    // Bind then drop a listener so the port is known to be closed.
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let cases = [
        ("bad method", "http://127.0.0.1:9998".to_string()),
        ("GET", String::new()),
        ("GET", format!("http://{closed}")),
    ];
    for (method, url) in cases {
        let client = TikaClient::new(&url);
        let err = client.call(None, method, "", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport, "call({method}, {url})");
    }
}
