mod commands;

use rust_tde::cli::{Cli, Commands};
use rust_tde::config::TdeConfig;
use rust_tde::error::Result;
use rust_tde::logger;
use tracing::{debug, error, info};

fn main() {
    let args = Cli::parse_args();

    let config = match TdeConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging system
    let log_format = args.log_format.unwrap_or(config.log_format);
    if let Err(e) = logger::init(args.verbose, log_format) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    debug!("RustTDE CLI starting");

    match run(args, &config) {
        Ok(_) => {
            info!("Operation completed successfully");
        }
        Err(e) => {
            error!("Operation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Cli, config: &TdeConfig) -> Result<()> {
    match args.command {
        Commands::SetKey { device, key } => commands::set_key::execute(&device, &key, config),

        Commands::ClearKey { device } => commands::clear_key::execute(&device, config),

        Commands::Status { device, json } => commands::status::execute(&device, json),

        Commands::CheckEod { device } => commands::check_eod::execute(&device),
    }
}
