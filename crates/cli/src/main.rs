mod plugin_commands;

use {
    clap::{Parser, Subcommand},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "ferrule", about = "Ferrule — extension kernel for host applications")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plugin management.
    Plugins {
        #[command(subcommand)]
        action: plugin_commands::PluginAction,
    },
    /// Dispatch a host event through registered event processors.
    Emit {
        /// Event kind, e.g. "issue.created".
        kind: String,
        /// Event data as a JSON value.
        #[arg(long)]
        data: Option<String>,
    },
    /// Resolve a URL through registered link unfurlers.
    Unfurl {
        url: String,
    },
}

fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::Plugins { action } => plugin_commands::handle_plugins(action).await,
        Commands::Emit { kind, data } => plugin_commands::handle_emit(kind, data).await,
        Commands::Unfurl { url } => plugin_commands::handle_unfurl(url).await,
    }
}
