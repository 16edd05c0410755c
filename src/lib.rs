pub mod cli;
pub mod engine;
pub mod error;
pub mod hosts;
pub mod logging;
pub mod ports;
pub mod pretty;
pub mod types;

// Re-export key types and functions at the crate root
pub use engine::{scan, Sweeper, MAX_WORKERS};
pub use error::ScanError;
pub use hosts::expand_hosts;
pub use logging::{get_log_file_path, init_logging};
pub use ports::{parse_ports, DEFAULT_PORT_SPEC};
pub use types::{ConnectionTask, OpenEndpoint, PortState};
