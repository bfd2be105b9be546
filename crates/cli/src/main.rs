use clap::Parser;
use dnswalk_domain::CliOverrides;
use std::net::IpAddr;
use tracing::info;

mod bootstrap;
mod di;
mod repl;
mod trace;

#[derive(Parser)]
#[command(name = "dnswalk")]
#[command(version)]
#[command(about = "Iterative DNS resolver with an interactive lookup shell")]
struct Cli {
    /// Root DNS server to start every lookup from (dotted IP form)
    root_server: Option<IpAddr>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        root_server: cli.root_server,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting dnswalk v{}", env!("CARGO_PKG_VERSION"));

    let services = di::Services::new(&config)?;
    println!("Root DNS server is: {}", config.resolver.root_server);

    repl::run(&services)?;

    println!("Goodbye!");
    Ok(())
}
