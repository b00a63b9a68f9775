//! Events polled from the game

use crate::block::BlockFace;
use crate::vec3::Vec3;
use serde::{Deserialize, Serialize};

/// Entity id assigned by the game
pub type EntityId = i32;

/// A block hit.
///
/// On Minecraft: Pi Edition this means right-clicking a block with a sword.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockHit {
    /// Location of the block that was hit
    pub location: Vec3,
    /// Face of the block that was hit
    pub face: BlockFace,
    /// Player who hit the block
    pub player_id: EntityId,
}

/// A chat message posted in game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Player who sent the message
    pub author_id: EntityId,
    pub content: String,
}
