// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections on `listener` until `shutdown` resolves.
///
/// On shutdown the listener is closed before the shutdown message is logged;
/// connections already in flight are left to their tasks. Accept errors are
/// logged and do not stop the loop.
///
/// Must run inside a `LocalSet`.
pub async fn start_server_loop<S>(listener: TcpListener, state: Arc<AppState>, shutdown: S)
where
    S: Future<Output = &'static str>,
{
    let in_flight = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &in_flight);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            signal = &mut shutdown => {
                drop(listener);
                logger::log_shutdown(signal, in_flight.load(Ordering::SeqCst));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_listener;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn fetch(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn get(path: &str) -> String {
        format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
    }

    #[tokio::test]
    async fn test_serves_over_tcp_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "hello world").unwrap();

        let mut config = Config::default();
        config.logging.access_log = false;
        let state = Arc::new(AppState::with_root(&config, dir.path()).unwrap());

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let server = tokio::task::spawn_local(start_server_loop(listener, state, async move {
                    let _ = stop_rx.await;
                    "test"
                }));

                let ok = fetch(addr, &get("/hello.txt")).await;
                assert!(ok.starts_with("HTTP/1.1 200 OK\r\n"), "{ok}");
                let lower = ok.to_ascii_lowercase();
                assert!(lower.contains("access-control-allow-origin: *\r\n"));
                assert!(lower.contains("access-control-allow-methods: get, post, options\r\n"));
                assert!(lower.contains("access-control-allow-headers: *\r\n"));
                assert!(ok.ends_with("\r\n\r\nhello world"));

                let missing = fetch(addr, &get("/../../etc/passwd")).await;
                assert!(missing.starts_with("HTTP/1.1 404 Not Found\r\n"), "{missing}");
                assert!(!missing.contains("root:"));
                assert!(missing
                    .to_ascii_lowercase()
                    .contains("access-control-allow-origin: *\r\n"));

                stop_tx.send(()).unwrap();
                server.await.unwrap();

                // The listening socket is gone once the loop returns
                assert!(create_listener(addr).is_ok());
            })
            .await;
    }
}
