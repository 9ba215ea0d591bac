mod app;
mod auth_commands;
mod config_commands;
mod nav_commands;
mod output;
mod task_commands;
mod user_commands;

use {
    clap::{Parser, Subcommand},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "taskdesk", about = "Taskdesk: departmental task assignment from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Custom config directory (overrides default ~/.config/taskdesk/).
    #[arg(long, global = true, env = "TASKDESK_CONFIG_DIR")]
    config_dir: Option<std::path::PathBuf>,

    /// Base URL of the task API (overrides config value).
    #[arg(long, global = true, env = "TASKDESK_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out, and inspect the current session.
    Auth {
        #[command(subcommand)]
        action: auth_commands::AuthAction,
    },
    /// Resolve a client route for the current session (e.g. `/`, `/admin`).
    Open {
        #[arg(default_value = "/")]
        path: String,
        /// Print external redirects instead of launching a browser.
        #[arg(long)]
        no_browser: bool,
    },
    /// Task statistics on your home dashboard.
    Dashboard,
    /// User directory management.
    Users {
        #[command(subcommand)]
        action: user_commands::UserAction,
    },
    /// Task management.
    Tasks {
        #[command(subcommand)]
        action: task_commands::TaskAction,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_telemetry(&cli);
    debug!(version = env!("CARGO_PKG_VERSION"), "taskdesk starting");

    if let Some(ref dir) = cli.config_dir {
        taskdesk_config::set_config_dir(dir.clone());
    }
    let mut config = taskdesk_config::discover_and_load();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    match cli.command {
        Commands::Auth { action } => auth_commands::handle_auth(config, action).await,
        Commands::Open { path, no_browser } => {
            nav_commands::open_path(config, &path, no_browser).await
        },
        Commands::Dashboard => nav_commands::dashboard(config).await,
        Commands::Users { action } => user_commands::handle_users(config, action).await,
        Commands::Tasks { action } => task_commands::handle_tasks(config, action).await,
        Commands::Config { action } => config_commands::handle_config(config, action),
    }
}
