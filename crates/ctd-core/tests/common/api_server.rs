//! Minimal HTTP/1.1 server that mimics the paged studies endpoint for
//! integration tests.
//!
//! Serves a fixed study list in pages. The first page reports `totalCount`
//! when asked via `countTotal=true`; later pages are addressed by opaque
//! offset tokens handed out as `nextPageToken`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApiServerOptions {
    /// Respond 503 to this many requests before serving normally.
    pub fail_first: usize,
    /// Never report totalCount, even when asked.
    pub omit_total: bool,
    /// Hand out one more page token after the last study, leading to a page
    /// with an empty `studies` array (simulates a server that keeps paging).
    pub extra_empty_page: bool,
}

/// Handle to a running test server.
pub struct ApiServer {
    /// Endpoint URL to put into the client config.
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl ApiServer {
    /// Total number of requests the server has seen (including failed ones).
    pub fn request_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `studies` in pages of
/// `page_size` (unless the client requests a different `pageSize`). The
/// server runs until the process exits.
pub fn start(studies: Vec<serde_json::Value>, page_size: usize) -> ApiServer {
    start_with_options(studies, page_size, ApiServerOptions::default())
}

/// Like `start` but allows customizing server behavior (failures, missing
/// totals, trailing empty page).
pub fn start_with_options(
    studies: Vec<serde_json::Value>,
    page_size: usize,
    opts: ApiServerOptions,
) -> ApiServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let studies = Arc::new(studies);
    {
        let hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let studies = Arc::clone(&studies);
                let hits = Arc::clone(&hits);
                thread::spawn(move || handle(stream, &studies, page_size, opts, &hits));
            }
        });
    }
    ApiServer {
        base_url: format!("http://127.0.0.1:{}/studies", port),
        hits,
    }
}

/// Study object shaped like real registry records (identification module only).
pub fn make_studies(n: usize) -> Vec<serde_json::Value> {
    (1..=n)
        .map(|i| {
            serde_json::json!({
                "protocolSection": {
                    "identificationModule": {
                        "nctId": format!("NCT{:08}", i),
                        "briefTitle": format!("Study {}", i)
                    }
                }
            })
        })
        .collect()
}

fn handle(
    mut stream: TcpStream,
    studies: &[serde_json::Value],
    default_page_size: usize,
    opts: ApiServerOptions,
    hits: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };

    let seen = hits.fetch_add(1, Ordering::SeqCst) + 1;
    if seen <= opts.fail_first {
        let _ = stream.write_all(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    let (page_size, count_total, start) = parse_request(request, default_page_size);

    let total = studies.len();
    let start = start.min(total);
    let end = (start + page_size).min(total);
    let slice = &studies[start..end];

    let has_more = end < total;
    let next_token = if has_more || (opts.extra_empty_page && !slice.is_empty()) {
        Some(format!("off-{}", end))
    } else {
        None
    };

    let mut obj = serde_json::Map::new();
    obj.insert(
        "studies".to_string(),
        serde_json::Value::Array(slice.to_vec()),
    );
    if count_total && !opts.omit_total {
        obj.insert("totalCount".to_string(), serde_json::json!(total));
    }
    if let Some(token) = next_token {
        obj.insert("nextPageToken".to_string(), serde_json::json!(token));
    }
    let body = serde_json::Value::Object(obj).to_string();

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Returns (page size, countTotal requested, start offset from pageToken).
fn parse_request(request: &str, default_page_size: usize) -> (usize, bool, usize) {
    let mut page_size = default_page_size;
    let mut count_total = false;
    let mut start = 0usize;

    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    if let Some((_, query)) = target.split_once('?') {
        for pair in query.split('&') {
            let Some((k, v)) = pair.split_once('=') else {
                continue;
            };
            match k {
                "pageSize" => {
                    if let Ok(n) = v.parse::<usize>() {
                        page_size = n;
                    }
                }
                "countTotal" => count_total = v == "true",
                "pageToken" => {
                    if let Some(off) = v.strip_prefix("off-") {
                        start = off.parse::<usize>().unwrap_or(0);
                    }
                }
                _ => {}
            }
        }
    }
    (page_size.max(1), count_total, start)
}
