use clap::{Parser, Subcommand};

/// Top-level CLI interface for Insight Atlas
#[derive(Parser)]
#[command(
    name = "atlasctl",
    version,
    about = "Insight Atlas explainable scoring engine CLI"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (report routes, health, versioned endpoints)
    Serve {
        /// Host/IP to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the full pipeline on an intake file and print the report JSON
    Analyze {
        /// Path to an intake JSON file, or "-" for stdin
        #[arg(short, long)]
        input: String,
        /// Print the full engine report instead of the wire shape
        #[arg(long)]
        full: bool,
    },

    /// Run only the intake gate on a payload (structural check, no scoring)
    Validate {
        /// Path to an intake JSON file, or "-" for stdin
        #[arg(short, long)]
        input: String,
    },

    /// Print the extracted feature vector for an intake
    Features {
        /// Path to an intake JSON file, or "-" for stdin
        #[arg(short, long)]
        input: String,
    },

    /// Print the trait weight tables and narrative rules, after the
    /// configuration-integrity check
    Catalog,
}
