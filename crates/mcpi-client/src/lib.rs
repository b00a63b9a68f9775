//! High-level client for Minecraft: Pi Edition
//!
//! Wraps a [`Connection`] session with typed adapters for each command
//! group of the API:
//!
//! - **World**: players, settings, checkpoints
//! - **Blocks**: reading, placing and filling blocks, polling block hits
//! - **Camera**: camera modes and position
//! - **Chat**: posting and polling messages
//! - **Entities**: position and tile of players and mobs
//!
//! ```no_run
//! use mcpi_client::{ConnectionConfig, World};
//!
//! # async fn demo() -> mcpi_client::Result<()> {
//! let world = World::connect(ConnectionConfig::default());
//! world.chat.send("Hello, Pi!").await?;
//! let height = world.blocks.fetch_height(0, 0).await?;
//! println!("Ground level at the origin: {}", height);
//! # Ok(())
//! # }
//! ```

mod blocks;
mod camera;
mod chat;
mod entity;
mod world;

pub use blocks::BlockManager;
pub use camera::Camera;
pub use chat::Chat;
pub use entity::{ClientPlayer, Entity, EntityApi};
pub use world::{World, WorldCheckpoint};

pub use mcpi_bridge::{Connection, ConnectionConfig, SessionEvent, SessionState};
pub use mcpi_core::{
    Block, BlockData, BlockFace, BlockHit, BlockType, ChatMessage, EntityId, McpiError,
    PlayerSetting, Result, Vec3, WorldSetting,
};
