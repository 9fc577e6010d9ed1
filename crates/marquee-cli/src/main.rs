use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "Preview and simulate the Marquee marketing site interactions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the landing page preview in the terminal
    Preview,
    /// Run a controller under a manual clock and print its timeline
    Simulate {
        #[command(subcommand)]
        target: SimulateTarget,
    },
    /// Print the width class for a viewport width in pixels
    Classify {
        width: u32,
    },
    /// Send a contact form submission
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Resolve remotely configurable section copy
    Content {
        /// Collection holding the section rows
        collection: String,
        /// Row filter, `field=value`
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Show the config path, optionally writing defaults
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum SimulateTarget {
    /// Testimonials carousel
    Carousel {
        /// Number of items
        #[arg(long, default_value_t = 4)]
        items: usize,
        /// Auto-advance period in ms (defaults to config)
        #[arg(long)]
        period: Option<u64>,
        /// Transition lock in ms (defaults to config)
        #[arg(long)]
        transition: Option<u64>,
        /// Idle window after user input in ms (defaults to config)
        #[arg(long)]
        idle: Option<u64>,
        /// Simulated duration in ms
        #[arg(long = "for", default_value_t = 10_000)]
        duration: u64,
        /// User input at a time, e.g. `1500:next`, `2000:goto=2`, `3000:hold`
        #[arg(long = "user")]
        user: Vec<String>,
    },
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        // The preview owns the terminal, so logs go to a file
        std::fs::create_dir_all(config.data_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_path())?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    let preview = matches!(cli.command, Some(Commands::Preview) | None);
    init_logging(&config, preview)?;

    // Handle commands
    match cli.command {
        Some(Commands::Preview) | None => commands::preview::run(config).await,
        Some(Commands::Simulate { target }) => match target {
            SimulateTarget::Carousel {
                items,
                period,
                transition,
                idle,
                duration,
                user,
            } => {
                let mut carousel = config.carousel.clone();
                if let Some(period) = period {
                    carousel.period_ms = period;
                }
                if let Some(transition) = transition {
                    carousel.transition_ms = transition;
                }
                if let Some(idle) = idle {
                    carousel.idle_resume_ms = idle;
                }
                commands::simulate::carousel(items, &carousel, duration, &user)
            }
        },
        Some(Commands::Classify { width }) => commands::classify::run(&config, width),
        Some(Commands::Submit {
            name,
            email,
            message,
            company,
            phone,
        }) => {
            let fields = marquee_core::backend::ContactFields {
                full_name: name,
                email,
                company_name: company,
                contact_number: phone,
                message,
            };
            commands::submit::run(&config, fields).await
        }
        Some(Commands::Content { collection, filter }) => {
            commands::content::run(&config, &collection, filter.as_deref()).await
        }
        Some(Commands::Config { init }) => commands::config::run(&config, init),
    }
}
