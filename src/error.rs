use std::io;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Errors surfaced to callers of the scan engine.
///
/// Per-attempt timeouts and ordinary connection failures are not errors; they
/// resolve to a closed port inside the engine and never reach this type.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Malformed host/CIDR or port-spec syntax.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A syntactically valid port value outside 0-65535.
    #[error("port value out of range 0-65535: {0}")]
    InvalidValue(i64),

    /// An unexpected failure inside a worker (e.g. fd exhaustion). The scan
    /// aborts on the first one of these.
    #[error("probe of {addr}:{port} failed: {source}")]
    Probe {
        addr: Ipv4Addr,
        port: u16,
        #[source]
        source: io::Error,
    },
}
