//! Static file serving module
//!
//! Resolves request paths against the document root, picks index files for
//! directory requests, and guards against path traversal.

use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a request from the document root
pub async fn serve(
    ctx: &RequestContext<'_>,
    root: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_root(root, ctx.path, index_files).await {
        Some((content, content_type)) => {
            http::response::build_file_response(content, content_type, ctx.is_head)
        }
        None => http::build_404_response(ctx.is_head),
    }
}

/// Load a file from the document root with index file support
pub async fn load_from_root(
    root: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    let clean_path = sanitize_request_path(path);
    let mut file_path = Path::new(root).join(&clean_path);

    let root_canonical = match Path::new(root).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Document root not found or inaccessible '{root}': {e}"
            ));
            return None;
        }
    };

    // Directory request: try index files in order
    if file_path.is_dir() || clean_path.is_empty() || path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(
        file_path_canonical
            .extension()
            .and_then(|e| e.to_str()),
    );

    Some((content, content_type))
}

/// Percent-decode a request path and drop `..` path segments.
///
/// Only whole segments are dropped, so filenames that merely contain
/// consecutive dots (`a..b.js`) pass through intact. Decoding happens
/// before the segment filter so an encoded `%2e%2e` cannot sneak past;
/// the canonicalization containment check above is the backstop either way.
fn sanitize_request_path(path: &str) -> String {
    percent_decode(path)
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "..")
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode %XX escapes; malformed escapes are kept verbatim
fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[allow(clippy::cast_possible_truncation)]
fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use std::path::PathBuf;

    /// Create a throwaway document root with demo-like content
    fn demo_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("glserve-test-{}-{name}", std::process::id()));
        let _ = std_fs::remove_dir_all(&dir);
        std_fs::create_dir_all(dir.join("shaders")).unwrap();
        std_fs::write(dir.join("index.html"), "<html>fractal</html>").unwrap();
        std_fs::write(dir.join("main.js"), "export {};").unwrap();
        std_fs::write(dir.join("shaders/newton.frag"), "void main() {}").unwrap();
        dir
    }

    #[test]
    fn sanitize_strips_traversal_segments() {
        assert_eq!(sanitize_request_path("/../etc/passwd"), "etc/passwd");
        assert_eq!(sanitize_request_path("/a/../../b"), "a/b");
        assert_eq!(sanitize_request_path("/%2e%2e/secret"), "secret");
        assert_eq!(sanitize_request_path("/main.js"), "main.js");
    }

    #[test]
    fn sanitize_keeps_filenames_with_consecutive_dots() {
        assert_eq!(sanitize_request_path("/a..b.js"), "a..b.js");
        assert_eq!(sanitize_request_path("/shaders/v1..2.frag"), "shaders/v1..2.frag");
    }

    #[test]
    fn percent_decode_handles_spaces_and_malformed_escapes() {
        assert_eq!(percent_decode("/my%20file.js"), "/my file.js");
        assert_eq!(percent_decode("/100%"), "/100%");
        assert_eq!(percent_decode("/%zz"), "/%zz");
    }

    #[tokio::test]
    async fn serves_shader_as_plain_text() {
        let root = demo_root("shader");
        let (content, content_type) =
            load_from_root(root.to_str().unwrap(), "/shaders/newton.frag", &[])
                .await
                .unwrap();
        assert_eq!(content, b"void main() {}");
        assert_eq!(content_type, "text/plain");
        let _ = std_fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn serves_index_for_directory_request() {
        let root = demo_root("index");
        let index_files = vec!["index.html".to_string()];
        let (content, content_type) = load_from_root(root.to_str().unwrap(), "/", &index_files)
            .await
            .unwrap();
        assert_eq!(content, b"<html>fractal</html>");
        assert_eq!(content_type, "text/html; charset=utf-8");
        let _ = std_fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn serves_filenames_containing_consecutive_dots() {
        let root = demo_root("dotted-name");
        std_fs::write(root.join("a..b.js"), "dots").unwrap();
        let (content, content_type) = load_from_root(root.to_str().unwrap(), "/a..b.js", &[])
            .await
            .unwrap();
        assert_eq!(content, b"dots");
        assert_eq!(content_type, "application/javascript");
        let _ = std_fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn missing_file_is_none() {
        let root = demo_root("missing");
        assert!(
            load_from_root(root.to_str().unwrap(), "/nope.js", &[])
                .await
                .is_none()
        );
        let _ = std_fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn traversal_never_escapes_the_root() {
        let root = demo_root("traversal");
        // A sibling file outside the root that must stay unreachable
        let outside = root.parent().unwrap().join("glserve-test-outside.txt");
        std_fs::write(&outside, "secret").unwrap();

        for path in ["/../glserve-test-outside.txt", "/%2e%2e/glserve-test-outside.txt"] {
            assert!(
                load_from_root(root.to_str().unwrap(), path, &[])
                    .await
                    .is_none(),
                "path {path} escaped the document root"
            );
        }

        let _ = std_fs::remove_file(&outside);
        let _ = std_fs::remove_dir_all(&root);
    }
}
