use tracing_subscriber::EnvFilter;

use p2p_report::config::{self, ServiceConfig};
use p2p_report::server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    server::serve(ServiceConfig::from_env()).await
}
