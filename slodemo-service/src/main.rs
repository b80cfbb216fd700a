use clap::Parser;
use slodemo_common::{validate_failure_probability, FLAKY_FAILURE_PROBABILITY};
use slodemo_service::config::DEFAULT_BIND_ADDR;
use slodemo_service::{Server, ServerConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "slodemo-service", about = "Mock service with fast, slow and flaky endpoints")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    bind: SocketAddr,

    /// Probability that a /flaky call answers 500.
    #[arg(long, default_value_t = FLAKY_FAILURE_PROBABILITY)]
    flaky_failure_rate: f64,

    /// Seed for latency and failure draws, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slodemo_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = ServerConfig {
        address: args.bind,
        flaky_failure_probability: validate_failure_probability(args.flaky_failure_rate)?,
        seed: args.seed,
    };

    let (ready_tx, _ready_rx) = tokio::sync::oneshot::channel();
    Server::new(config).run(ready_tx).await?;
    Ok(())
}
