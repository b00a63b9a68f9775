//! Command line interface

use clap::{Parser, Subcommand, ValueEnum};
use mcpi_client::ConnectionConfig;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "mcpi", version)]
#[command(about = "Command-line client for the Minecraft: Pi Edition API")]
pub struct Cli {
    /// Game host
    #[arg(long, env = "MCPI_HOST", default_value = "localhost")]
    pub host: String,

    /// API port
    #[arg(long, env = "MCPI_PORT", default_value_t = 4711)]
    pub port: u16,

    /// Response timeout in milliseconds
    #[arg(long = "timeout", env = "MCPI_RESPONSE_TIMEOUT_MS", default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.host.clone(), self.port)
            .with_response_timeout(Duration::from_millis(self.timeout_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Send a raw command and print the reply
    Raw {
        #[arg(required = true)]
        command: Vec<String>,
    },
    /// Send a raw command without waiting for a reply
    Exec {
        #[arg(required = true)]
        command: Vec<String>,
    },
    /// Y of the highest non-air block
    Height {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        z: i32,
    },
    /// Block type and data at a location
    Block {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(allow_negative_numbers = true)]
        z: i32,
    },
    /// Place a block
    SetBlock {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(allow_negative_numbers = true)]
        z: i32,
        id: u16,
        data: Option<u8>,
    },
    /// Ids of the players in the world
    Players,
    /// Position of the host player
    Pos,
    /// Move the host player
    Tp {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
    },
    /// Post a chat message
    Chat {
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Poll block hits
    Hits,
    /// Poll chat posts
    Posts,
    /// Save or restore the world
    Checkpoint { action: CheckpointAction },
    /// Change the camera mode
    Camera { mode: CameraMode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckpointAction {
    Save,
    Restore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CameraMode {
    Normal,
    Follow,
    Fixed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mcpi").chain(line.split_whitespace()))
    }

    fn command(line: &str) -> Commands {
        parse(line).unwrap().command
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_options_build_config() {
        let cli = parse("--host pi.local --port 4712 --timeout 250 --json pos").unwrap();
        let config = cli.config();

        assert_eq!(config.host, "pi.local");
        assert_eq!(config.port, 4712);
        assert_eq!(config.response_timeout, Duration::from_millis(250));
        assert!(cli.json);
        assert_eq!(cli.command, Commands::Pos);
    }

    #[test]
    fn test_commands() {
        assert_eq!(command("height 3 -4"), Commands::Height { x: 3, z: -4 });
        assert_eq!(
            command("set-block 1 -2 3 35 14"),
            Commands::SetBlock {
                x: 1,
                y: -2,
                z: 3,
                id: 35,
                data: Some(14),
            }
        );
        assert_eq!(
            command("set-block 1 2 3 1"),
            Commands::SetBlock {
                x: 1,
                y: 2,
                z: 3,
                id: 1,
                data: None,
            }
        );
        assert_eq!(
            command("raw world.getBlock(0,0,0)"),
            Commands::Raw {
                command: vec!["world.getBlock(0,0,0)".into()]
            }
        );
        assert_eq!(
            command("chat hello there"),
            Commands::Chat {
                message: vec!["hello".into(), "there".into()]
            }
        );
        assert_eq!(
            command("tp 0.5 70 -0.5"),
            Commands::Tp {
                x: 0.5,
                y: 70.0,
                z: -0.5
            }
        );
        assert_eq!(
            command("checkpoint restore"),
            Commands::Checkpoint {
                action: CheckpointAction::Restore
            }
        );
        assert_eq!(
            command("camera follow"),
            Commands::Camera {
                mode: CameraMode::Follow
            }
        );
    }

    #[test]
    fn test_help_and_errors() {
        let err = parse("--json --help").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        for bad in [
            "",
            "height 1",
            "block a b c",
            "--port",
            "--port x pos",
            "--verbose pos",
            "fly",
            "camera sideways",
            "chat",
        ] {
            assert!(parse(bad).is_err(), "accepted `{}`", bad);
        }
    }
}
