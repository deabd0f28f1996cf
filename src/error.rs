//! Process-level errors
//!
//! Per-request failures are answered with 4xx responses inside the handler and
//! never reach this type.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("port {} is already in use on {addr}; stop the other process or choose another port", .addr.port())]
    PortInUse { addr: SocketAddr },

    #[error("cannot serve from '{}': {source}", .path.display())]
    RootDirectory { path: PathBuf, source: io::Error },

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address: {0}")]
    Address(String),

    #[error(transparent)]
    Os(#[from] io::Error),
}

impl ServerError {
    /// Classify a bind failure on `addr`
    pub fn from_bind(addr: SocketAddr, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::AddrInUse {
            Self::PortInUse { addr }
        } else {
            Self::Os(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_in_use_is_port_in_use() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let err = ServerError::from_bind(addr, io::Error::from(io::ErrorKind::AddrInUse));
        assert!(matches!(err, ServerError::PortInUse { .. }));
        assert!(err.to_string().contains("port 8080 is already in use"));
    }

    #[test]
    fn test_other_bind_errors_are_os_errors() {
        let addr: SocketAddr = "0.0.0.0:80".parse().unwrap();
        let err = ServerError::from_bind(
            addr,
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert!(matches!(err, ServerError::Os(_)));
        assert_eq!(err.to_string(), "permission denied");
    }
}
