use std::collections::{BTreeSet, VecDeque};
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::error::ScanError;
use crate::hosts::expand_hosts;
use crate::ports::{parse_ports, DEFAULT_PORT_SPEC};
use crate::types::{ConnectionTask, OpenEndpoint, PortState};

/// Upper bound on concurrently running workers.
pub const MAX_WORKERS: usize = 1000;

const DEFAULT_TIMEOUT_SECS: f64 = 2.0;

/// Pending tasks, fully populated before the pool starts. An empty pop means
/// the scan is done; nothing is ever re-queued.
type TaskQueue = Arc<Mutex<VecDeque<ConnectionTask>>>;

/// The scan engine. Holds the per-attempt timeout and the worker cap; each
/// call to [`Sweeper::scan`] runs one complete sweep and shares no state with
/// any other.
#[derive(Debug, Clone)]
pub struct Sweeper {
    timeout: Duration,
    max_workers: usize,
}

impl Default for Sweeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Sweeper {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            max_workers: MAX_WORKERS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Probe every (host, port) pair and return the open endpoints, sorted by
    /// address octets then port.
    ///
    /// `port_spec` falls back to [`DEFAULT_PORT_SPEC`] when `None`. Spec
    /// errors abort before any connection is attempted; an unexpected worker
    /// failure aborts the sweep in progress and discards partial results.
    pub async fn scan(
        &self,
        host: &str,
        port_spec: Option<&str>,
    ) -> Result<Vec<OpenEndpoint>, ScanError> {
        let ports = parse_ports(port_spec.unwrap_or(DEFAULT_PORT_SPEC))?;
        let hosts = expand_hosts(host)?;

        let tasks = build_tasks(&hosts, &ports, self.timeout);
        let task_count = tasks.len();
        if task_count == 0 {
            log::debug!("[engine] no_tasks: host={}", host);
            return Ok(Vec::new());
        }

        let pool_size = self.max_workers.min(task_count);
        log::debug!(
            "[engine] scan: host={} tasks={} workers={} timeout={}ms",
            host,
            task_count,
            pool_size,
            self.timeout.as_millis()
        );

        let queue: TaskQueue = Arc::new(Mutex::new(tasks));
        let (results_tx, mut results_rx) = mpsc::unbounded_channel();

        let mut workers = JoinSet::new();
        for _ in 0..pool_size {
            workers.spawn(run_worker(Arc::clone(&queue), results_tx.clone()));
        }
        drop(results_tx);

        // First unexpected failure wins: cancel the siblings instead of
        // letting them keep burning connection attempts.
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    log::error!("[engine] worker_failed: error={}", err);
                    workers.abort_all();
                    return Err(err);
                }
                Err(join_err) if join_err.is_cancelled() => {}
                Err(join_err) => {
                    workers.abort_all();
                    std::panic::resume_unwind(join_err.into_panic());
                }
            }
        }

        // All workers returned and the senders are gone; the channel holds
        // every result there will ever be.
        let mut open = Vec::new();
        while let Ok(endpoint) = results_rx.try_recv() {
            open.push(endpoint);
        }
        open.sort_unstable();

        log::debug!("[engine] scan_complete: host={} open={}", host, open.len());
        Ok(open)
    }
}

/// One scan with the given per-attempt timeout: the plain function boundary
/// over [`Sweeper`].
pub async fn scan(
    host: &str,
    port_spec: Option<&str>,
    timeout: Duration,
) -> Result<Vec<OpenEndpoint>, ScanError> {
    Sweeper::new().with_timeout(timeout).scan(host, port_spec).await
}

/// Cartesian product of hosts and ports, each paired with the timeout. Hosts
/// and ports are individually unique, so no (addr, port) pair repeats.
fn build_tasks(
    hosts: &[Ipv4Addr],
    ports: &BTreeSet<u16>,
    timeout: Duration,
) -> VecDeque<ConnectionTask> {
    hosts
        .iter()
        .flat_map(|&addr| {
            ports
                .iter()
                .map(move |&port| ConnectionTask { addr, port, timeout })
        })
        .collect()
}

/// Worker loop: pull tasks until the queue is empty. Open ports go out on the
/// result channel; closed ports are dropped; an unexpected probe failure ends
/// the worker with an error.
async fn run_worker(
    queue: TaskQueue,
    results: mpsc::UnboundedSender<OpenEndpoint>,
) -> Result<(), ScanError> {
    loop {
        let task = queue.lock().unwrap().pop_front();
        let Some(task) = task else {
            return Ok(());
        };

        match probe(&task).await {
            PortState::Open => {
                log::trace!("[engine] open: addr={} port={}", task.addr, task.port);
                // The receiver only disappears when the scan is being torn
                // down, so a send failure is not worth surfacing.
                let _ = results.send(OpenEndpoint { addr: task.addr, port: task.port });
            }
            PortState::Closed => {}
            PortState::Error(source) => {
                return Err(ScanError::Probe {
                    addr: task.addr,
                    port: task.port,
                    source,
                });
            }
        }
    }
}

/// One timed TCP connect. The stream is dropped immediately; reachability is
/// all we ask of it.
async fn probe(task: &ConnectionTask) -> PortState {
    let addr = SocketAddr::from((task.addr, task.port));
    match timeout(task.timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_stream)) => PortState::Open,
        Ok(Err(err)) => classify(err),
        Err(_elapsed) => PortState::Closed,
    }
}

/// Connection failures that mean "port closed" rather than "scan broken".
fn classify(err: io::Error) -> PortState {
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::HostUnreachable
        | io::ErrorKind::NetworkUnreachable
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::PermissionDenied
        | io::ErrorKind::TimedOut => PortState::Closed,
        _ => PortState::Error(err),
    }
}
