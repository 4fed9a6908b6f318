//! Static file serving.
//!
//! `/static/<rest>` resolves to `<root>/<rest>`; `/static` alone serves
//! `<root>/index.html`. Any path containing `..` is refused outright.

use std::path::{Path, PathBuf};

use mime::Mime;
use nano_http::handler::Handler;
use nano_http::protocol::{Request, Response};
use tracing::debug;

const PREFIX: &str = "/static";

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Handler for StaticFiles {
    fn call(&self, req: &Request) -> Response {
        let path = match req.path() {
            PREFIX => "/index.html",
            path => path.strip_prefix(PREFIX).unwrap_or(path),
        };

        if path.contains("..") {
            return Response::bad_request("Invalid path");
        }

        let file_path = self.root.join(path.trim_start_matches('/'));
        match std::fs::read(&file_path) {
            Ok(content) => {
                let mut response = Response::ok(content);
                response.set_content_type(content_type(path).to_string());
                response
            }
            Err(e) => {
                debug!(file = %file_path.display(), cause = %e, "can't read static file");
                Response::not_found(format!("File not found: {path}"))
            }
        }
    }
}

fn content_type(path: &str) -> Mime {
    let extension = Path::new(path).extension().and_then(|ext| ext.to_str()).unwrap_or_default();

    match extension {
        "html" => mime::TEXT_HTML_UTF_8,
        "css" => mime::TEXT_CSS,
        "js" => mime::APPLICATION_JAVASCRIPT,
        "json" => mime::APPLICATION_JSON,
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
