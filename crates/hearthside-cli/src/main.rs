use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hearthside-cli", version, about = "Hearthside CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print the seed household state
    State {
        /// Print as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Apply actions (JSON) to the seed state and print the result
    Apply {
        /// One or more actions, e.g. '{"type":"LOG_EMOTION","emotion":"happy"}'
        #[arg(required = true)]
        actions: Vec<String>,
    },
    /// Run a live session driven by stdin
    Run,
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearthside_core=info,hearthside_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::State { json } => commands::state::show(json),
        Commands::Apply { actions } => commands::state::apply(&actions),
        Commands::Run => commands::session::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
