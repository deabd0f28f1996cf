//! Static file serving module
//!
//! The base responder: maps a request path onto the root directory and
//! answers with the file, an index file, a listing, a redirect or an error.

use crate::config::StaticFilesConfig;
use crate::handler::listing;
use crate::handler::resolve;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// What the static responder needs from a GET or HEAD request
pub struct StaticRequest<'a> {
    /// URI path, still percent-encoded
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    /// Only set when the client sent no `If-None-Match`
    pub if_modified_since: Option<&'a str>,
}

/// Answer a request from files below `root` (which must be canonical)
pub async fn serve(
    req: &StaticRequest<'_>,
    root: &Path,
    options: &StaticFilesConfig,
) -> Response<Full<Bytes>> {
    let Ok(relative) = resolve::relative_path(req.path) else {
        logger::log_warning(&format!("Undecodable request path: {}", req.path));
        return http::build_error_response(StatusCode::BAD_REQUEST, req.is_head);
    };
    let target = root.join(relative);

    let Ok(metadata) = fs::metadata(&target).await else {
        return not_found(req);
    };

    if let Err(status) = ensure_within_root(&target, root, req.path).await {
        return http::build_error_response(status, req.is_head);
    }

    if metadata.is_dir() {
        return serve_directory(req, &target, root, options).await;
    }

    // A file cannot have children
    if req.path.ends_with('/') {
        return not_found(req);
    }

    serve_file(req, &target).await
}

async fn serve_directory(
    req: &StaticRequest<'_>,
    dir: &Path,
    root: &Path,
    options: &StaticFilesConfig,
) -> Response<Full<Bytes>> {
    // Relative links in the page only resolve against a slash-terminated URL
    if !req.path.ends_with('/') {
        // A leading `//` would make the Location a scheme-relative URL to another host
        let path = format!("/{}", req.path.trim_start_matches('/'));
        let location = match req.query {
            Some(q) => format!("{path}/?{q}"),
            None => format!("{path}/"),
        };
        return http::build_redirect_response(&location);
    }

    if let Some(index) = find_index_file(dir, &options.index_files).await {
        if let Err(status) = ensure_within_root(&index, root, req.path).await {
            return http::build_error_response(status, req.is_head);
        }
        return serve_file(req, &index).await;
    }

    if !options.directory_listing {
        return http::build_error_response(StatusCode::FORBIDDEN, req.is_head);
    }

    let display_path =
        resolve::percent_decode(req.path).unwrap_or_else(|_| req.path.to_string());
    match listing::render(dir, &display_path).await {
        Ok(page) => http::response::build_html_response(page, req.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_error_response(StatusCode::FORBIDDEN, req.is_head)
        }
    }
}

async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for name in index_files {
        let candidate = dir.join(name);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

async fn serve_file(req: &StaticRequest<'_>, file: &Path) -> Response<Full<Bytes>> {
    let modified = match fs::metadata(file).await.and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(e) => return read_failed(req, file, &e),
    };
    let last_modified = cache::http_date(modified);

    if cache::is_not_modified(req.if_modified_since, modified) {
        return http::build_304_response(&last_modified);
    }

    let content = match fs::read(file).await {
        Ok(c) => c,
        Err(e) => return read_failed(req, file, &e),
    };

    http::response::build_file_response(
        Bytes::from(content),
        mime::content_type_for(file),
        &last_modified,
        req.is_head,
    )
}

/// Reject targets whose real location (after symlinks) is outside `root`
async fn ensure_within_root(
    target: &Path,
    root: &Path,
    request_path: &str,
) -> Result<(), StatusCode> {
    match fs::canonicalize(target).await {
        Ok(real) if real.starts_with(root) => Ok(()),
        Ok(real) => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {request_path} -> {}",
                real.display()
            ));
            Err(StatusCode::FORBIDDEN)
        }
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

fn not_found(req: &StaticRequest<'_>) -> Response<Full<Bytes>> {
    http::build_error_response(StatusCode::NOT_FOUND, req.is_head)
}

fn read_failed(req: &StaticRequest<'_>, file: &Path, err: &io::Error) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Failed to read file '{}': {err}", file.display()));
    not_found(req)
}
