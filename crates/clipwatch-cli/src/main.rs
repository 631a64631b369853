use clap::{Parser, Subcommand};

mod collect;
mod history;

#[derive(Debug, Parser)]
#[command(name = "clipwatch")]
#[command(about = "Cross-platform viral short-video tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect the current batch for a query, score it against the previous
    /// run, and archive the ranked snapshot
    Collect {
        /// Search query or topic
        #[arg(long)]
        query: String,

        /// Number of videos to collect per platform
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Comma-separated platforms (youtube,tiktok,instagram,vk) or "all"
        #[arg(long, default_value = "all")]
        platforms: String,
    },
    /// Show the recorded metric history for one video
    History {
        #[arg(long)]
        video_id: String,

        /// Restrict to one platform
        #[arg(long)]
        platform: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = clipwatch_core::load_app_config()?;
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    match cli.command {
        Commands::Collect {
            query,
            limit,
            platforms,
        } => collect::run_collect(&config, &query, limit, &platforms).await,
        Commands::History { video_id, platform } => {
            history::run_history(&config, &video_id, platform.as_deref())
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    // RUST_LOG wins over the configured default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
