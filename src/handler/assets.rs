//! Static asset chain handler
//!
//! Serves files beneath a public directory as the tail of the handler
//! chain. GET requests are always answered (200 with the file bytes or 404
//! when the file is absent); other methods decline so the chain policy
//! stays with the application.

use crate::handler::{decline, HandlerFuture, RequestHandler};
use crate::http::{build_404_response, build_bytes_response, mime, HttpRequest, HttpResponse};
use crate::logger;
use hyper::body::Bytes;
use hyper::Method;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Chain fallback serving files from a fixed root directory.
pub struct AssetHandler {
    root: PathBuf,
}

impl AssetHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RequestHandler for AssetHandler {
    fn handle(&self, request: Arc<HttpRequest>) -> HandlerFuture {
        if request.method() != Method::GET {
            return decline();
        }
        let root = self.root.clone();
        let path = request.path().to_string();
        Box::pin(async move { Ok(Some(serve_asset(&root, &path).await)) })
    }
}

/// Resolve and read a file for `path`, or a 404 when it does not exist.
async fn serve_asset(root: &Path, path: &str) -> HttpResponse {
    match load_asset(root, path).await {
        Some((content, content_type)) => build_bytes_response(Bytes::from(content), content_type),
        None => build_404_response(),
    }
}

/// Load a file beneath `root` with directory traversal protection.
async fn load_asset(root: &Path, path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let mut file_path = root.join(&clean_path);

    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    // A directory path falls back to its index file
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        file_path = file_path.join(INDEX_FILE);
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read asset '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}
