use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showcase_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "showcase")]
#[command(author, version, about = "Motion coordinator and page behaviors for the showcase portfolio site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scenario file on the virtual platform
    Simulate {
        /// Scenario JSON file
        file: PathBuf,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the "now" widget rotation on real timers
    Rotate {
        /// Item to rotate through (repeatable; defaults to rotation.items)
        #[arg(short = 'i', long = "item")]
        items: Vec<String>,
        /// Stop after this many rotations
        #[arg(short = 't', long)]
        ticks: Option<u32>,
        /// Behave as if the user asked for reduced motion
        #[arg(long)]
        reduced_motion: bool,
    },
    /// Print the time-of-day greeting and footer year
    Greet {
        /// Hour of day (0-23) instead of the local clock
        #[arg(long)]
        hour: Option<u32>,
    },
    /// Show or change the stored color theme
    Theme {
        /// Treat the system color scheme as dark
        #[arg(long, global = true)]
        system_dark: bool,
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Submit the contact form
    Submit {
        /// Form action URL (defaults to contact.action)
        #[arg(short = 'a', long)]
        action: Option<String>,
        /// Form field as name=value (repeatable)
        #[arg(short = 'f', long = "field")]
        fields: Vec<String>,
    },
    /// Inspect the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the effective theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Store an explicit theme
    Set {
        /// light or dark
        theme: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Simulate { file, json } => commands::simulate::run(&config, &file, json),
        Commands::Rotate {
            items,
            ticks,
            reduced_motion,
        } => commands::rotate::run(&config, items, ticks, !reduced_motion).await,
        Commands::Greet { hour } => commands::greet::run(hour),
        Commands::Theme {
            system_dark,
            action,
        } => match action {
            ThemeAction::Show => commands::theme::show(&config, system_dark),
            ThemeAction::Toggle => commands::theme::toggle(&config, system_dark),
            ThemeAction::Set { theme } => commands::theme::set(&config, system_dark, &theme),
        },
        Commands::Submit { action, fields } => {
            commands::submit::run(&config, action.as_deref(), &fields).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init => commands::config::init(),
        },
    }
}
