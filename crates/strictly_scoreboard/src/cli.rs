//! Command-line interface for strictly_scoreboard.

use clap::{Parser, Subcommand};

/// Strictly Scoreboard - live tennis scoring server
#[derive(Parser, Debug)]
#[command(name = "strictly_scoreboard")]
#[command(about = "Live tennis scoring with undo and WebSocket viewers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP and WebSocket server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides config)
        #[arg(long, env = "DATABASE_URL")]
        database: Option<String>,
    },

    /// Create or upgrade the database schema and exit
    Migrate {
        /// SQLite database file
        #[arg(long, env = "DATABASE_URL", default_value = "strictly_scoreboard.db")]
        database: String,
    },
}
