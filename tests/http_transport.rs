//! `HttpTransport` and `RestQueryClient` against a minimal in-process HTTP server.
//!
//! The server speaks just enough HTTP/1.1 for reqwest: one request per
//! connection, JSON bodies with `Content-Length`, `Connection: close`.

use artic_gal::artic::{ArtworkById, Artworks, DetailParams, ListParams};
use artic_gal::gallery::{Gallery, GallerySettings};
use artic_gal::rest::{HttpTransport, QueryError, RequestConfig, RestQueryClient, Transport, TransportError};
use serde_json::{Value, json};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// ===========================================================================
// Test server
// ===========================================================================

struct TestServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    _stop: std::sync::mpsc::Sender<()>,
}

impl TestServer {
    fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            listener.set_nonblocking(true).unwrap();
            loop {
                if rx.try_recv().is_ok() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, _)) => {
                        let log = Arc::clone(&log);
                        thread::spawn(move || serve_request(stream, &log));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            port,
            requests,
            _stop: tx,
        }
    }

    fn url(&self) -> String {
        format!("http://127.0.0.1:{}/api/v1", self.port)
    }

    /// Request targets (path and query) in arrival order.
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve_request(mut stream: std::net::TcpStream, log: &Mutex<Vec<String>>) {
    // Accepted sockets may inherit the listener's non-blocking mode.
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(n) if n > 0 => n,
        _ => return,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
    log.lock().unwrap().push(target.clone());

    let path = target.split('?').next().unwrap_or("/");
    let (status, body) = route(path);
    let body = body.to_string();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn route(path: &str) -> (&'static str, Value) {
    match path {
        "/api/v1/artworks" | "/api/v1/artworks/search" => ("200 OK", list_body()),
        "/api/v1/artworks/27992" => ("200 OK", detail_body()),
        _ => ("404 Not Found", json!({"status": 404, "error": "Not found"})),
    }
}

fn config_json() -> Value {
    json!({
        "iiif_url": "https://www.artic.edu/iiif/2",
        "website_url": "https://www.artic.edu"
    })
}

fn list_body() -> Value {
    json!({
        "pagination": {
            "total": 2, "limit": 20, "offset": 0,
            "total_pages": 1, "current_page": 1, "next_url": null
        },
        "data": [
            {"id": 1, "title": "Water Lilies", "image_id": "abc", "artist_title": "Claude Monet"},
            {"id": 2, "title": "Study", "image_id": null}
        ],
        "config": config_json()
    })
}

fn detail_body() -> Value {
    json!({
        "data": {
            "id": 27992,
            "title": "A Sunday on La Grande Jatte",
            "image_id": "2d484387",
            "artist_title": "Georges Seurat",
            "date_display": "1884-86",
            "medium_display": "Oil on canvas",
            "description": "<p>Seurat's <em>masterpiece</em>.</p>",
            "department_title": null
        },
        "config": config_json()
    })
}

fn list_params() -> ListParams {
    ListParams {
        page: 1,
        limit: 20,
        fields: vec!["id".into(), "title".into()],
    }
}

// ===========================================================================
// HttpTransport
// ===========================================================================

#[tokio::test]
async fn transport_decodes_json_and_sends_query() {
    let server = TestServer::start();
    let transport = HttpTransport::new();
    let query = vec![("page".to_string(), "2".to_string())];

    let body = transport
        .get(&format!("{}/artworks", server.url()), &query)
        .await
        .unwrap();

    assert_eq!(body["data"][0]["title"], "Water Lilies");
    assert_eq!(server.requests(), vec!["/api/v1/artworks?page=2"]);
}

#[tokio::test]
async fn transport_reports_status_errors() {
    let server = TestServer::start();
    let transport = HttpTransport::with_timeout(Duration::from_secs(5)).unwrap();

    let err = transport
        .get(&format!("{}/nope", server.url()), &[])
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        TransportError::Status { message, .. } => assert!(message.contains("Not found")),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_connection_failure_is_http_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = HttpTransport::new()
        .get(&format!("http://127.0.0.1:{port}/"), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
    assert_eq!(err.status(), None);
}

// ===========================================================================
// RestQueryClient over HTTP
// ===========================================================================

#[tokio::test]
async fn client_serves_repeat_requests_from_cache() {
    let server = TestServer::start();
    let client = RestQueryClient::new(server.url(), HttpTransport::new());

    let first = client
        .get::<Artworks>(&list_params(), RequestConfig::default())
        .await
        .unwrap();
    let second = client
        .get::<Artworks>(&list_params(), RequestConfig::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(server.requests().len(), 1);
    assert_eq!(client.cache_stats().hits, 1);
}

#[tokio::test]
async fn client_refetches_after_invalidation() {
    let server = TestServer::start();
    let client = RestQueryClient::new(server.url(), HttpTransport::new());

    client
        .get::<Artworks>(&list_params(), RequestConfig::default())
        .await
        .unwrap();
    client.invalidate_endpoint::<Artworks>();
    client
        .get::<Artworks>(&list_params(), RequestConfig::default())
        .await
        .unwrap();

    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn client_sends_path_params_as_query_too() {
    let server = TestServer::start();
    let client = RestQueryClient::new(server.url(), HttpTransport::new());

    let response = client
        .get::<ArtworkById>(
            &DetailParams {
                id: 27992,
                fields: None,
            },
            RequestConfig::no_cache(),
        )
        .await
        .unwrap();

    assert_eq!(response.data.id, 27992);
    assert_eq!(server.requests(), vec!["/api/v1/artworks/27992?id=27992"]);
}

#[tokio::test]
async fn client_status_error_is_not_cached() {
    let server = TestServer::start();
    let client = RestQueryClient::new(server.url(), HttpTransport::new());
    let params = DetailParams {
        id: 404,
        fields: None,
    };

    for _ in 0..2 {
        let err = client
            .get::<ArtworkById>(&params, RequestConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::Transport(TransportError::Status { status: 404, .. })
        ));
    }
    assert_eq!(server.requests().len(), 2);
    assert_eq!(client.cache_stats().entries, 0);
}

// ===========================================================================
// Gallery over HTTP
// ===========================================================================

#[tokio::test]
async fn gallery_drops_imageless_records_and_maps_details() {
    let server = TestServer::start();
    let client = Arc::new(RestQueryClient::new(server.url(), HttpTransport::new()));
    let gallery = Gallery::new(client, GallerySettings::default());

    let page = gallery.cards("", 1).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(
        page.items[0].image_url,
        "https://www.artic.edu/iiif/2/abc/full/843,/0/default.jpg"
    );

    let details = gallery.details(Some(27992)).await.unwrap().unwrap();
    assert_eq!(details.description, "Seurat's masterpiece.");
    assert_eq!(details.collection, "Art Institute of Chicago");
    assert_eq!(details.museum_url, "https://www.artic.edu/artworks/27992");
}
