//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, cross-origin isolation headers, and access logging.

use crate::config::Config;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use crate::logger::AccessLogEntry;
use chrono::Local;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
///
/// Generic over the request body: only the head of the request is ever
/// inspected, so tests can drive it without a live connection.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    config: Arc<Config>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let is_head = method == Method::HEAD;
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = version_str(req.version());
    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    let mut response = if matches!(method, Method::GET | Method::HEAD) {
        let ctx = RequestContext {
            path: &path,
            is_head,
        };
        static_files::serve(&ctx, &config.server.root, &config.server.index_files).await
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        http::build_405_response()
    };

    // Every response carries the isolation headers, errors included,
    // otherwise the browser drops crossOriginIsolated for the whole page
    http::apply_isolation_headers(response.headers_mut());

    if config.logging.access_log {
        let entry = AccessLogEntry {
            remote_addr: peer_addr.ip().to_string(),
            time: Local::now(),
            method: method.to_string(),
            path,
            query,
            http_version: http_version.to_string(),
            status: response.status().as_u16(),
            body_bytes: body_bytes_sent(&response),
            referer,
            user_agent,
            request_time_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        logger::log_access(&entry, &config.logging.format);
    }

    Ok(response)
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

/// Body size as reported by Content-Length (0 when the header is absent)
fn body_bytes_sent(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn demo_root(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("glserve-router-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("newton.frag"), "void main() {}").unwrap();
        dir
    }

    fn test_config(root: &Path) -> Arc<Config> {
        let mut cfg = crate::config::Config::load_from("nonexistent-config-for-test").unwrap();
        cfg.server.root = root.to_str().unwrap().to_string();
        cfg.logging.access_log = false;
        Arc::new(cfg)
    }

    fn request(method: &str, path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn assert_isolation_headers(response: &Response<Full<Bytes>>) {
        assert_eq!(
            response
                .headers()
                .get("Cross-Origin-Opener-Policy")
                .unwrap(),
            "same-origin"
        );
        assert_eq!(
            response
                .headers()
                .get("Cross-Origin-Embedder-Policy")
                .unwrap(),
            "require-corp"
        );
    }

    #[tokio::test]
    async fn every_dispatched_response_is_cross_origin_isolated() {
        let root = demo_root("isolation");
        let config = test_config(&root);
        let peer: SocketAddr = "127.0.0.1:55555".parse().unwrap();

        // Existing file: 200 with the shader override
        let response = handle_request(request("GET", "/newton.frag"), peer, Arc::clone(&config))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("Content-Type").unwrap(), "text/plain");
        assert_isolation_headers(&response);

        // Missing file: 404
        let response = handle_request(request("GET", "/missing.js"), peer, Arc::clone(&config))
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
        assert_isolation_headers(&response);

        // Rejected method: 405
        let response = handle_request(request("POST", "/"), peer, Arc::clone(&config))
            .await
            .unwrap();
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers().get("Allow").unwrap(), "GET, HEAD");
        assert_isolation_headers(&response);

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn head_request_is_served_with_headers() {
        let root = demo_root("head");
        let config = test_config(&root);
        let peer: SocketAddr = "127.0.0.1:55556".parse().unwrap();

        let response = handle_request(request("HEAD", "/newton.frag"), peer, config)
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("Content-Length").unwrap(), "14");
        assert_isolation_headers(&response);

        let _ = fs::remove_dir_all(&root);
    }
}
