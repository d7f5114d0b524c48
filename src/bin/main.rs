use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "moodcanvas-server")]
#[command(about = "Emotion based music recommendation server", long_about = None)]
struct Args {
    /// Optional YAML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Listen port, overrides both the config file and $PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Log as JSON lines instead of plain text
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "moodcanvas_rs=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if let Err(e) = moodcanvas_rs::run(args.config.as_deref(), args.port).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
