//! tandem-relay binary: load config, start the router, serve WebSockets.

use std::path::PathBuf;

use clap::Parser;
use tandem_common::TandemError;
use tandem_config::{config_to_json, load_config};
use tandem_relay::{logging, serve, spawn_router, RouterConfig};
use tokio::net::TcpListener;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "tandem-relay", about = "WebSocket room relay for two-player games")]
struct Args {
    /// Config file to read instead of the platform default.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on. Takes precedence over config and `PORT`.
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), TandemError> {
    let args = Args::parse();

    let rust_log = std::env::var("RUST_LOG").ok();
    let (subscriber, log_filter) = logging::subscriber(rust_log.as_deref());
    subscriber.init();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    log_filter.apply_config(&config.logging.filter)?;

    if args.print_config {
        println!("{}", config_to_json(&config));
        return Ok(());
    }

    let router = spawn_router(RouterConfig::from(&config.rooms));

    let addr = config.server.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        allowed_origin = %config.server.allowed_origin,
        "tandem-relay listening"
    );

    serve(listener, config.server, router).await;
    Ok(())
}
