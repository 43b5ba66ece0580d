//! End-to-end tests against a live listener on an ephemeral port.

mod common;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use common::split_response;
use sar::content::controllers::ActionRegistry;
use sar::content::debug;
use sar::content::error_page::ErrorPage;
use sar::content::files::FileSystem;
use sar::content::pdf::HttpPdfRenderer;
use sar::content::{Content, ContentSources};
use sar::server::listener::serve;
use sar::session::SessionStore;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn site_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("sar-test-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(root.join("docs")).unwrap();
    std::fs::write(root.join("hello.txt"), b"hello world").unwrap();
    std::fs::write(root.join("docs").join("index.html"), b"<p>docs</p>").unwrap();
    root
}

async fn start(name: &str) -> (SocketAddr, SessionStore) {
    let sessions = SessionStore::new();
    let info_sessions = sessions.clone();
    let controllers = ActionRegistry::new()
        .action("Report", "Index", |_| Ok(Content::html("<h1>report</h1>")))
        .default_action("Report", "Index")
        .action("Debug", "Info", move |req| Ok(debug::info_page(req, &info_sessions)));

    let sources = ContentSources::new(
        Arc::new(controllers),
        Arc::new(FileSystem),
        Arc::new(ErrorPage),
        Arc::new(HttpPdfRenderer::new(Duration::from_secs(5))),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, site_root(name), sources));
    (addr, sessions)
}

async fn send(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    out
}

async fn get(addr: SocketAddr, target: &str) -> (String, Vec<u8>) {
    let raw = format!("GET {} HTTP/1.0\r\nHost: localhost\r\n\r\n", target);
    split_response(&send(addr, raw.as_bytes()).await)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_static_file_round_trip() {
    let (addr, _) = start("static").await;

    let (head, body) = get(addr, "/hello.txt").await;

    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(head.contains("Content-Type: text/plain\r\n"));
    assert!(head.contains("Content-Length: 11\r\n"));
    assert!(head.ends_with("Connection: close"));
    assert_eq!(body, b"hello world".to_vec());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_directory_serves_index() {
    let (addr, _) = start("index").await;

    let (head, body) = get(addr, "/docs").await;

    assert!(head.contains("Content-Type: text/html\r\n"));
    assert_eq!(body, b"<p>docs</p>".to_vec());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_file_and_traversal_are_500() {
    let (addr, _) = start("missing").await;

    for target in ["/nope.html", "/../etc/passwd"] {
        let (head, body) = get(addr, target).await;

        assert!(head.starts_with("HTTP/1.0 500 SERVERERROR\r\n"));
        assert!(String::from_utf8(body).unwrap().contains("404 NOTFOUND"));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_path_without_primary() {
    let (addr, _) = start("primary").await;

    let (head, body) = get(addr, "/").await;

    assert!(head.starts_with("HTTP/1.0 500 SERVERERROR\r\n"));
    assert!(String::from_utf8(body).unwrap().contains("Primary Controller Not Defined"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_info_page_creates_session() {
    let (addr, sessions) = start("info").await;

    let (head, body) = get(addr, "/INFO").await;
    let body = String::from_utf8(body).unwrap();

    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
    let id = body
        .lines()
        .find_map(|l| l.strip_prefix("session: "))
        .unwrap();
    assert!(sessions.contains(id));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pdf_render_leg_carries_marker_header() {
    let (addr, _) = start("pdf-render").await;

    let (head, body) = get(addr, "/report-pdf-render").await;

    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(head.contains("X-Content-Type-Options: pdf-render\r\n"));
    assert_eq!(body, b"<h1>report</h1>".to_vec());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pdf_request_makes_nested_round_trip() {
    let (addr, _) = start("pdf").await;

    let (head, body) = get(addr, "/report-pdf").await;

    // Body and type come from the nested /report-pdf-render response.
    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(head.contains("Content-Type: text/html\r\n"));
    assert!(!head.contains("X-Content-Type-Options"));
    assert_eq!(body, b"<h1>report</h1>".to_vec());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_nested_round_trip_is_500() {
    let (addr, _) = start("pdf-missing").await;

    let (head, _) = get(addr, "/absent-pdf").await;

    assert!(head.starts_with("HTTP/1.0 500 SERVERERROR\r\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_request_closes_without_response() {
    let (addr, _) = start("malformed").await;

    let out = send(addr, b"BREW /pot HTTP/1.0\r\n\r\n").await;

    assert!(out.is_empty());
}
