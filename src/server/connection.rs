// Connection handling module
// Serves one accepted TCP connection on its own local task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve a connection in a spawned local task.
///
/// The task:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Serves HTTP/1.1 with the configured keep-alive behavior
/// 3. Closes connections whose request headers take longer than
///    `performance.request_timeout` seconds to arrive
/// 4. Decrements the in-flight counter when done
///
/// Must be called from inside a `LocalSet`.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    in_flight: &Arc<AtomicUsize>,
) {
    in_flight.fetch_add(1, Ordering::SeqCst);

    let state = Arc::clone(state);
    let in_flight = Arc::clone(in_flight);

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let header_timeout = Duration::from_secs(state.config.performance.request_timeout);

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(header_timeout)
            .keep_alive(state.config.performance.keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
        );

        // An idle client running into the header timeout is routine
        if let Err(err) = conn.await {
            if !err.is_timeout() {
                logger::log_connection_error(&err);
            }
        }

        in_flight.fetch_sub(1, Ordering::SeqCst);
    });
}
