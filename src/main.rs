use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use yada::agent::Agent;
use yada::config::Config;
use yada::oracle::OpenAiOracle;

#[derive(Parser)]
#[command(name = "yada", about = "Autonomous creator agent", version)]
struct Cli {
    /// Path to config.toml (defaults to the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a task to the agent
    Run {
        /// The task, free text
        task: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = Config::load(cli.config.as_deref())?;
    let oracle = Arc::new(OpenAiOracle::new(&config.oracle));
    let agent = Agent::new(oracle, &config);

    match cli.command {
        Command::Run { task } => {
            let result = agent.run(&task).await?;
            println!("{}", result.text);
            if result.rejected {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
