use clap::Parser;
use expense_compare::args::{Args, Command};
use expense_compare::load::FileLoader;
use expense_compare::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config_path = args.common().config().path();
    let loader = FileLoader::new();

    // Route to appropriate command handler
    match args.command() {
        Command::Init(init_args) => {
            commands::init(config_path, init_args.invoice(), init_args.statement())
                .await?
                .print()
        }

        Command::Overview(overview_args) => {
            let config = Config::load(config_path).await?;
            commands::overview(&config, &loader, overview_args.top())
                .await?
                .print()
        }

        Command::Monthly(monthly_args) => {
            let config = Config::load(config_path).await?;
            commands::monthly(&config, &loader, monthly_args.categories())
                .await?
                .print()
        }

        Command::Categories(categories_args) => {
            let config = Config::load(config_path).await?;
            commands::categories(
                &config,
                &loader,
                categories_args.period(),
                categories_args.threshold(),
            )
            .await?
            .print()
        }

        Command::Summary(summary_args) => {
            let config = Config::load(config_path).await?;
            commands::summary(&config, &loader, summary_args.period())
                .await?
                .print()
        }

        Command::Trend => {
            let config = Config::load(config_path).await?;
            commands::trend(&config, &loader).await?.print()
        }
    }
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "expense_compare={},{}={}",
                level,
                env!("CARGO_CRATE_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
