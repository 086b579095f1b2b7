//! CLI application for the slotwatch service.

mod routes;

use clap::{Args, Parser, Subcommand};
use reqwest::Url;
use slotwatch_rewards::{QueryError, SlotService};
use slotwatch_telemetry::{init_logging, Metrics};
use slotwatch_transport::CancelToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "slotwatch")]
#[command(about = "Block rewards and sync committee duties for Ethereum beacon slots")]
struct Cli {
    /// Log filter (e.g. "info", "slotwatch_rewards=debug")
    #[arg(long, env = "LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct UpstreamArgs {
    /// Node URL serving both the beacon REST API and execution JSON-RPC
    #[arg(long, env = "RPC_URL")]
    rpc_url: Url,

    /// Sustained requests per second towards the node, REST and RPC combined
    #[arg(long, env = "RPC_RATE_LIMIT", default_value = "10")]
    rpc_rate_limit: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        #[command(flatten)]
        upstream: UpstreamArgs,

        /// Address the API binds to
        #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8080")]
        server_addr: String,
    },
    /// Print the block reward of one slot as JSON
    Reward {
        #[command(flatten)]
        upstream: UpstreamArgs,

        /// Beacon slot number
        slot: String,
    },
    /// Print the sync committee pubkeys of one slot as JSON
    Duties {
        #[command(flatten)]
        upstream: UpstreamArgs,

        /// Beacon slot or state id
        slot: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Serve {
            upstream,
            server_addr,
        } => {
            let (service, metrics) = connect(&upstream)?;
            serve(service, metrics, &server_addr).await?;
        }
        Commands::Reward { upstream, slot } => {
            let (service, _) = connect(&upstream)?;
            let cancel = cancel_on_ctrl_c();
            let report = service.block_reward(&slot, &cancel).await.map_err(report_error)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&routes::RewardResponse::from(&report))?
            );
        }
        Commands::Duties { upstream, slot } => {
            let (service, _) = connect(&upstream)?;
            let cancel = cancel_on_ctrl_c();
            let pubkeys = service.sync_duties(&slot, &cancel).await.map_err(report_error)?;
            println!("{}", serde_json::to_string_pretty(&pubkeys)?);
        }
    }

    Ok(())
}

fn connect(upstream: &UpstreamArgs) -> anyhow::Result<(SlotService, Metrics)> {
    let metrics = Metrics::new()?;
    let service = SlotService::connect(&upstream.rpc_url, upstream.rpc_rate_limit, metrics.clone())?;
    Ok((service, metrics))
}

async fn serve(service: SlotService, metrics: Metrics, addr: &str) -> anyhow::Result<()> {
    let app = routes::router(service, metrics);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Slotwatch API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Slotwatch API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Token cancelled when the user interrupts a one-shot query.
fn cancel_on_ctrl_c() -> CancelToken {
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

fn report_error(e: QueryError) -> anyhow::Error {
    if !e.is_slot_error() {
        error!("Slot query failed: {}", e);
    }
    e.into()
}
