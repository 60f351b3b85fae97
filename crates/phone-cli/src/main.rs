//! Mockphone - interactive simulated phone in the terminal
//!
//! Configuration is layered: built-in defaults, then an optional JSON config
//! file, then `MOCKPHONE_*` environment variables, then flags.

mod app;
mod commands;
mod logging;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use mockphone_core::{CallController, ContactDirectory, PhoneConfig, TransitionPolicy};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::app::App;
use crate::logging::{parse_log_level, setup_logging, LoggingConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulated phone with contacts, calls and call history", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file with the contact directory (defaults to the built-in list)
    #[arg(long)]
    contacts: Option<PathBuf>,

    /// Do not ring the phone automatically after start
    #[arg(long)]
    no_simulated_call: bool,

    /// Delay before the simulated incoming call, in milliseconds
    #[arg(long)]
    incoming_delay_ms: Option<u64>,

    /// How long the blocked-contact screen stays up, in milliseconds
    #[arg(long)]
    blocked_delay_ms: Option<u64>,

    /// Seed for picking the simulated caller
    #[arg(long)]
    seed: Option<u64>,

    /// Report illegal commands as errors instead of ignoring them
    #[arg(long)]
    strict: bool,

    /// Skip the registration form
    #[arg(long)]
    skip_registration: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MOCKPHONE_LOG", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Include source file and line in log lines
    #[arg(long)]
    log_source: bool,
}

impl Args {
    fn phone_config(&self) -> Result<PhoneConfig> {
        let base = match &self.config {
            Some(path) => PhoneConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => PhoneConfig::default(),
        };
        let mut config = base.merge_env().context("Invalid MOCKPHONE_* environment")?;

        if self.no_simulated_call {
            config = config.without_simulated_incoming();
        }
        if let Some(ms) = self.incoming_delay_ms {
            config = config.with_incoming_call_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = self.blocked_delay_ms {
            config = config.with_blocked_clear_delay(Duration::from_millis(ms));
        }
        if let Some(seed) = self.seed {
            config = config.with_rng_seed(seed);
        }
        if self.strict {
            config = config.with_transition_policy(TransitionPolicy::Strict);
        }
        config.validate()?;
        Ok(config)
    }

    fn directory(&self) -> Result<ContactDirectory> {
        match &self.contacts {
            Some(path) => ContactDirectory::load_json(path)
                .with_context(|| format!("Failed to load contacts from {}", path.display())),
            None => Ok(ContactDirectory::with_default_contacts()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::new(parse_log_level(&args.log_level)?).with_json(args.json_logs);
    if args.log_source {
        logging = logging.with_file_info();
    }
    setup_logging(&logging)?;
    info!("Starting mockphone v{}", mockphone_core::VERSION);

    let config = args.phone_config()?;
    let directory = args.directory()?;
    let mut lines = app::stdin_lines();

    if !args.skip_registration {
        match app::register(&mut lines).await? {
            Some(profile) => println!("Welcome, {}!", profile.full_name),
            None => return Ok(()),
        }
    }

    // The simulated call timer starts once the main screen is up
    let controller = CallController::new(config, directory)?;
    println!("{}", commands::HELP);

    let mut app = App::new(controller);
    app.run(&mut lines).await?;
    info!("Mockphone stopped");
    Ok(())
}
