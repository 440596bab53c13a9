use clap::Parser;
use tracing_subscriber::EnvFilter;

use sensu_cluster_metrics::check::{self, CheckOutcome};
use sensu_cluster_metrics::config::{CheckArgs, CheckConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // stdout is reserved for metric lines
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("sensu_cluster_metrics=warn")
        }))
        .with_writer(std::io::stderr)
        .init();

    let args = CheckArgs::parse();

    let outcome = match CheckConfig::resolve(args) {
        Ok(config) => {
            tracing::debug!("config: {config:?}");
            let timestamp = chrono::Utc::now().timestamp();
            check::execute(&config, timestamp).await
        }
        Err(e) => CheckOutcome::failed(&e),
    };

    let state = outcome.emit(std::io::stdout().lock(), std::io::stderr().lock());
    std::process::exit(state.exit_code());
}
