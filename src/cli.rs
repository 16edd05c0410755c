use clap::Parser;

#[derive(Parser)]
#[command(name = "portsweep")]
#[command(about = "A concurrent TCP port scanner")]
pub struct Cli {
    /// Target IPv4 address or CIDR block (e.g. "192.168.1.0/24")
    pub host: String,

    /// Ports to probe, as single ports and ranges (e.g. "80,443,8080-9000");
    /// defaults to a built-in list of common ports
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Per-connection timeout in seconds
    #[arg(short, long, default_value_t = 2.0)]
    pub timeout: f64,
}

pub fn parse() -> Cli {
    Cli::parse()
}
