use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use error::ServerError;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger::log_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ServerError> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Connections are served as local tasks on a single thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), ServerError> {
    let addr = cfg.get_socket_addr().map_err(ServerError::Address)?;

    let state = config::AppState::new(&cfg).map_err(|source| ServerError::RootDirectory {
        path: PathBuf::from(&cfg.static_files.root),
        source,
    })?;

    let listener = server::create_listener(addr)?;
    let shutdown = server::signal::shutdown_signal()?;

    logger::log_server_start(&addr, &state.root, &cfg);

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, Arc::new(state), shutdown))
        .await;

    Ok(())
}
