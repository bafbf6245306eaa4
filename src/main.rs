use clap::Parser;
use std::sync::Arc;
use tracing::info;

use mq_gateway::logging::init_logging;
use mq_gateway::messaging::{AwsMessaging, InMemoryMessaging, Messaging};
use mq_gateway::server::start_server;

#[derive(Parser)]
#[command(name = "mq-gateway")]
#[command(about = "GraphQL gateway for Amazon SQS queues and SNS topics")]
#[command(version = "0.1.0")]
struct Cli {
    /// Port to run the server on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Serve an in-memory backend instead of AWS (for local development)
    #[arg(long)]
    local: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    init_logging();

    let messaging: Arc<dyn Messaging> = if cli.local {
        info!("Using the in-memory messaging backend");
        Arc::new(InMemoryMessaging::new())
    } else {
        info!("Loading AWS configuration from the environment");
        Arc::new(AwsMessaging::from_env().await)
    };

    start_server(messaging, cli.port).await
}
