//! # mcpi-core
//!
//! Core types for the Minecraft: Pi Edition API client.
//!
//! This crate provides the types shared by the session and the command adapters:
//! - Error taxonomy and call-site tracking
//! - World coordinates
//! - Block ids, block data and faces
//! - Polled events (block hits, chat posts)
//! - Setting keys

pub mod block;
pub mod error;
pub mod event;
pub mod settings;
pub mod vec3;

pub use block::{Block, BlockData, BlockFace, BlockType};
pub use error::{CallSite, McpiError, Result};
pub use event::{BlockHit, ChatMessage, EntityId};
pub use settings::{PlayerSetting, WorldSetting};
pub use vec3::Vec3;
