//! mcpi: command-line client for Minecraft: Pi Edition
//!
//! Connects to the game's API socket (localhost:4711 by default), runs one
//! command and prints the result as text or JSON. Logs go to stderr and are
//! filtered with `RUST_LOG`.

mod args;

use anyhow::Result;
use args::{CameraMode, CheckpointAction, Cli, Commands};
use clap::Parser;
use mcpi_client::{BlockData, BlockType, EntityApi, Vec3, World};
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Result of an action, in both output formats
struct Report {
    text: String,
    json: Value,
}

impl Report {
    fn done() -> Self {
        Self {
            text: String::new(),
            json: json!({ "ok": true }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = cli.config();

    info!("Connecting to {}:{}", config.host, config.port);
    let world = World::connect(config);
    world.ready().await?;

    let result = run(&world, cli.command).await;
    world.close();
    let report = result?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.json)?);
    } else if !report.text.is_empty() {
        println!("{}", report.text);
    }

    Ok(())
}

async fn run(world: &World, command: Commands) -> Result<Report> {
    let report = match command {
        Commands::Raw { command } => {
            let reply = world.connection().request(&command.join(" ")).await?;
            Report {
                json: json!({ "reply": reply }),
                text: reply,
            }
        }
        Commands::Exec { command } => {
            world.connection().execute(&command.join(" ")).await?;
            Report::done()
        }
        Commands::Height { x, z } => {
            let height = world.blocks.fetch_height(x, z).await?;
            Report {
                text: height.to_string(),
                json: json!({ "x": x, "z": z, "height": height }),
            }
        }
        Commands::Block { x, y, z } => {
            let block = world.blocks.fetch([x, y, z]).await?;
            let name = block.block_type.name().unwrap_or("UNKNOWN");
            Report {
                text: format!("{} ({}:{})", name, block.block_type, block.data),
                json: serde_json::to_value(block)?,
            }
        }
        Commands::SetBlock { x, y, z, id, data } => {
            let block = world
                .blocks
                .set([x, y, z], BlockType(id), data.map(BlockData))
                .await?;
            Report {
                text: String::new(),
                json: serde_json::to_value(block)?,
            }
        }
        Commands::Players => {
            let ids: Vec<_> = world.players().await?.iter().map(|p| p.id()).collect();
            Report {
                text: ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join("\n"),
                json: json!(ids),
            }
        }
        Commands::Pos => {
            let position = world.me.fetch_position().await?;
            Report {
                text: position.to_string(),
                json: serde_json::to_value(position)?,
            }
        }
        Commands::Tp { x, y, z } => {
            world.me.set_position(Vec3::new(x, y, z)).await?;
            Report::done()
        }
        Commands::Chat { message } => {
            world.chat.send(&message.join(" ")).await?;
            Report::done()
        }
        Commands::Hits => {
            let hits = world.blocks.poll_hits().await?;
            Report {
                text: hits
                    .iter()
                    .map(|hit| {
                        format!("{} {:?} by {}", hit.location, hit.face, hit.player_id)
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
                json: serde_json::to_value(hits)?,
            }
        }
        Commands::Posts => {
            let messages = world.chat.poll().await?;
            Report {
                text: messages
                    .iter()
                    .map(|message| format!("<{}> {}", message.author_id, message.content))
                    .collect::<Vec<_>>()
                    .join("\n"),
                json: serde_json::to_value(messages)?,
            }
        }
        Commands::Checkpoint { action } => {
            match action {
                CheckpointAction::Save => world.checkpoint.create().await?,
                CheckpointAction::Restore => world.checkpoint.restore().await?,
            }
            Report::done()
        }
        Commands::Camera { mode } => {
            match mode {
                CameraMode::Normal => world.camera.normal(None).await?,
                CameraMode::Follow => world.camera.follow(None).await?,
                CameraMode::Fixed => world.camera.fixed().await?,
            }
            Report::done()
        }
    };
    Ok(report)
}
