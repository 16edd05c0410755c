use eyre::Result;
use indicatif::ProgressBar;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = portsweep::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let args = portsweep::cli::parse();
    eyre::ensure!(
        args.timeout.is_finite() && args.timeout >= 0.0,
        "timeout must be a non-negative number of seconds"
    );

    log::info!(
        "[main] scan_starting: host={} ports={:?} timeout={}s",
        args.host,
        args.ports,
        args.timeout
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Scanning...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = portsweep::scan(
        &args.host,
        args.ports.as_deref(),
        Duration::from_secs_f64(args.timeout),
    )
    .await;
    spinner.finish_and_clear();

    let endpoints = result?;
    log::info!("[main] scan_complete: host={} open={}", args.host, endpoints.len());

    portsweep::pretty::print_endpoints(&endpoints);
    Ok(())
}
