use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process;

use mikrolease::backend::MikrotikBackend;
use mikrolease::config::{self, DEFAULT_CONFIG_PATH};
use mikrolease::dispatch::{self, Action};
use mikrolease::error::Error;
use mikrolease::machine::MachineContext;

/// Mikrotik RouterOS DHCP lease hook for virtual machine managers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Lifecycle action requested by the orchestrator
    /// (lookup-ip, assign-ip or release-ip)
    action: String,

    /// Path to the configuration YAML file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

/// Map an error to the exit code the orchestrator distinguishes.
fn exit_code(error: &Error) -> i32 {
    match error {
        Error::UnknownAction(_) => 2,
        Error::AddressPoolExhausted { .. } => 3,
        _ => 1,
    }
}

fn run(args: &Args) -> std::result::Result<Option<String>, Error> {
    // Input validation happens before any network I/O.
    let action = args.action.parse::<Action>()?;
    let machine = MachineContext::from_env()?;
    let config = config::load_config(&args.config)?;

    info!(
        "Action {} for machine {} via router {}",
        action, machine.hwaddr, config.router.host
    );

    let mut backend = MikrotikBackend::connect(&config)?;
    dispatch::run(action, &mut backend, &config.network, &machine)
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run(&args) {
        Ok(Some(line)) => {
            // The only stdout the orchestrator consumes.
            println!("{}", line);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => {
            error!("{}", err);
            process::exit(exit_code(&err));
        }
    }
}
