//! Request entry point
//!
//! Composes the layers every request passes through:
//! method check → static responder → CORS headers → access log.

use crate::config::AppState;
use crate::handler::static_files::{self, StaticRequest};
use crate::http::{self, cors};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = cors::apply(respond(&req, &state).await);

    if state.access_log_enabled() {
        log_access(&req, &response, peer_addr, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Dispatch on the method and run the static responder for GET/HEAD
async fn respond<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let method = req.method();
    let is_head = *method == Method::HEAD;

    match *method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => return http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            return http::build_405_response(is_head);
        }
    }

    // If-None-Match takes precedence; without ETags it can never match
    let if_modified_since = if req.headers().contains_key(IF_NONE_MATCH) {
        None
    } else {
        req.headers()
            .get(IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok())
    };

    let static_req = StaticRequest {
        path: req.uri().path(),
        query: req.uri().query(),
        is_head,
        if_modified_since,
    };

    static_files::serve(&static_req, &state.root, &state.config.static_files).await
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    format: &str,
) {
    logger::log_access(&build_entry(req, response, peer_addr), format);
}

/// Collect the access log fields of a finished exchange
fn build_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
) -> AccessLogEntry {
    let uri = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().to_string(), ToString::to_string);

    let mut entry = AccessLogEntry::new(
        peer_addr.ip(),
        req.method().to_string(),
        uri,
        format!("{:?}", req.version()),
    );
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_string(req, REFERER);
    entry.user_agent = header_string(req, USER_AGENT);
    entry
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
