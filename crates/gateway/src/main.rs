//! Scheduling gateway - HTTP API for counselor calendars and reservations.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::config::GatewayConfig;

/// Booking and lifecycle logs at info, HTTP request spans at debug
const DEFAULT_LOG_FILTER: &str = "gateway=info,gateway_lib=info,scheduling_service_lib=info,tower_http=debug";

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "Counseling session scheduling API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "GATEWAY_PORT", default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // SCHEDULING_* and GATEWAY_* may come from a local .env
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let config = GatewayConfig {
                host,
                port,
                ..GatewayConfig::from_env()
            };
            gateway_lib::run_server(config).await?;
        }
    }

    Ok(())
}
