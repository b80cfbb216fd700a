use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slodemo_client::{Client, ClientConfig};
use slodemo_common::{SloDemoError, DEFAULT_BASE_URL};
use slodemo_driver::config::{interval_for, parse_rate, request_timeout, BASE_URL_ENV};
use slodemo_driver::mix::TrafficMix;
use slodemo_driver::pacer::Pacer;
use slodemo_driver::selector::WeightedSelector;
use slodemo_driver::stats::RunStats;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "slodemo-driver", about = "Weighted synthetic traffic for the SLO demo service")]
struct Args {
    /// Target requests per second [default: 5.0]
    rate: Option<String>,

    /// Base URL of the mock service
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Traffic mix: steady | recover | burn
    #[arg(long, default_value = "steady")]
    mix: String,

    /// Per-request timeout (seconds, at least 1)
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Seed for endpoint selection, for reproducible traffic
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slodemo_driver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let rps = parse_rate(args.rate.as_deref())?;
    let interval = interval_for(rps)?;
    let timeout = request_timeout(args.timeout_secs)?;
    let mix = TrafficMix::from_name(&args.mix).ok_or_else(|| {
        SloDemoError::InvalidConfig(format!(
            "unknown mix {:?}; valid values: steady, recover, burn",
            args.mix
        ))
    })?;
    let selector = WeightedSelector::new(mix.profiles())?;

    let client = Client::new(ClientConfig {
        base_url: args.base_url.clone(),
        timeout,
    });
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut pacer = Pacer::new(client, selector, interval, rng);

    info!(target_url = %args.base_url, mix = mix.as_name(), "~{} req/s. Ctrl+C to stop.", rps);

    let stats = pacer.run_until(None, tokio::signal::ctrl_c()).await;

    print_summary(&stats);
    Ok(())
}

fn print_summary(stats: &RunStats) {
    info!(
        sent = stats.sent,
        ok = stats.succeeded,
        failed = stats.failed,
        transport_errors = stats.transport_errors,
        "stopped after {:.1}s: {:.1} req/s achieved, {:.2}% errors",
        stats.elapsed_secs,
        stats.throughput_rps(),
        stats.error_rate() * 100.0,
    );
}
