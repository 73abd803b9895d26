// Insight Atlas - atlasctl
// CLI and server entry point for the explainable scoring engine

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use insight_atlas::atlasweb::{build_report_router, cors_layer};
use insight_atlas::cli::{Cli, Commands};
use insight_atlas::config_loader::load_config;
use insight_atlas::engine::Engine;
use insight_atlas::intake::{validate, RawIntake};
use insight_atlas::narrative::RULE_TABLE;
use insight_atlas::trait_map::TRAIT_TABLE;

fn read_intake(input: &str) -> anyhow::Result<RawIntake> {
    let payload = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading intake from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading intake file {input}"))?
    };
    serde_json::from_str(&payload).context("parsing intake JSON")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = load_config().context("loading configuration")?;
    let engine = Engine::new(config.engine.clone()).context("engine construction")?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let app = build_report_router(Arc::new(engine))
                .layer(cors_layer(&config.server.cors_origins));

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            tracing::info!(%addr, "insight-atlas listening");
            axum::serve(listener, app).await.context("serving HTTP")?;
        }
        Commands::Analyze { input, full } => {
            let raw = read_intake(&input)?;
            let report = engine.produce_report(&raw)?;
            let json = if full {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string_pretty(&report.wire())?
            };
            println!("{json}");
        }
        Commands::Validate { input } => {
            let raw = read_intake(&input)?;
            match validate(&raw, engine.config().max_free_text_len) {
                Ok(record) => {
                    println!("intake valid; digest {}", record.digest()?);
                }
                Err(err) => {
                    eprintln!("intake rejected: {err}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Features { input } => {
            let raw = read_intake(&input)?;
            let record = validate(&raw, engine.config().max_free_text_len)?;
            let features = insight_atlas::features::extract(&record);
            println!("{}", serde_json::to_string_pretty(features.values())?);
        }
        Commands::Catalog => {
            // Engine::new above already ran the integrity checks.
            println!("{}", serde_json::to_string_pretty(&TRAIT_TABLE)?);
            for rule in RULE_TABLE {
                println!("{:>3}  {:<26}  {}", rule.salience, rule.id, rule.template);
            }
        }
    }

    Ok(())
}
