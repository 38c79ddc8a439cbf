use clap::Parser;
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use std::process;

use atm_simulator::cli::session::Session;
use atm_simulator::cli::utils::Console;
use atm_simulator::config::{self, Config};
use atm_simulator::directory::AccountDirectory;

/// ATM Simulator - an interactive console ATM over an in-memory account store
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Sets the configuration file (TOML if it ends in .toml, JSON otherwise)
    #[clap(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Turn debugging information on
    #[clap(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    // Log to stderr so the session on stdout stays readable; RUST_LOG wins over -d
    let default_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let config = match &cli.config {
        Some(path) => match config::load_config(path) {
            Ok(config) => {
                info!("Configuration loaded from {}", path);
                config
            }
            Err(err) => {
                error!("Failed to load configuration: {:#}", err);
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    let mut directory = match AccountDirectory::from_seed(&config.accounts) {
        Ok(directory) => directory,
        Err(err) => {
            error!("Failed to create account directory: {}", err);
            process::exit(1);
        }
    };

    info!("Starting {} v{}", config.app_name, config.version);

    let mut console = Console::stdio();
    let mut session = Session::new(&mut directory, &config);
    match session.run(&mut console) {
        Ok(outcome) => info!("Session finished: {:?}", outcome),
        Err(err) => {
            error!("Session aborted: {:#}", err);
            process::exit(1);
        }
    }
}
