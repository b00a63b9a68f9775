//! Block identifiers, block metadata and block faces
//!
//! Values follow the Minecraft: Pi Edition block list. Block ids are kept as
//! open newtypes rather than closed enums because servers may report ids
//! that are not listed here.

use crate::vec3::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! block_types {
    ($($name:ident = $id:literal,)*) => {
        impl BlockType {
            $(pub const $name: BlockType = BlockType($id);)*

            /// Name of a known block id
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($id => Some(stringify!($name)),)*
                    _ => None,
                }
            }
        }
    };
}

/// A block id, such as wool or stone
///
/// ```
/// use mcpi_core::BlockType;
/// assert_eq!(BlockType::STONE.id(), 1);
/// assert_eq!(BlockType::from(35).name(), Some("WOOL"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockType(pub u16);

block_types! {
    AIR = 0,
    STONE = 1,
    GRASS_BLOCK = 2,
    DIRT = 3,
    COBBLESTONE = 4,
    PLANKS = 5,
    SAPLING = 6,
    BEDROCK = 7,
    WATER = 8,
    STILL_WATER = 9,
    LAVA = 10,
    STILL_LAVA = 11,
    SAND = 12,
    GRAVEL = 13,
    GOLD_ORE = 14,
    IRON_ORE = 15,
    COAL_ORE = 16,
    LOG = 17,
    LEAVES = 18,
    GLASS = 20,
    LAPIS_ORE = 21,
    LAPIS_BLOCK = 22,
    SANDSTONE = 24,
    BED = 26,
    COBWEB = 30,
    BUSH = 31,
    WOOL = 35,
    DANDELION = 37,
    BLUE_ROSE = 38,
    BROWN_MUSHROOM = 39,
    RED_MUSHROOM = 40,
    GOLD_BLOCK = 41,
    IRON_BLOCK = 42,
    DOUBLE_SLAB = 43,
    SLAB = 44,
    BRICKS = 45,
    TNT = 46,
    BOOKSHELF = 47,
    MOSSY_COBBLESTONE = 48,
    OBSIDIAN = 49,
    TORCH = 50,
    FIRE = 51,
    WOODEN_STAIRS = 53,
    CHEST = 54,
    DIAMOND_ORE = 56,
    DIAMOND_BLOCK = 57,
    CRAFTING_TABLE = 58,
    WHEAT = 59,
    FARMLAND = 60,
    FURNACE = 61,
    LIT_FURNACE = 62,
    SIGN = 63,
    WOODEN_DOOR = 64,
    LADDER = 65,
    COBBLESTONE_STAIRS = 67,
    WALL_SIGN = 68,
    IRON_DOOR = 71,
    REDSTONE_ORE = 73,
    LIT_REDSTONE_ORE = 74,
    SNOW = 78,
    ICE = 79,
    SNOW_BLOCK = 80,
    CACTUS = 81,
    CLAY = 82,
    SUGARCANE = 83,
    FENCE = 85,
    NETHERRACK = 87,
    GLOWSTONE = 89,
    INVISIBLE_BEDROCK = 95,
    TRAPDOOR = 96,
    STONE_BRICKS = 98,
    GLASS_PANE = 102,
    MELON = 103,
    MELON_STEM = 105,
    FENCE_GATE = 107,
    BRICK_STAIRS = 108,
    STONE_BRICK_STAIRS = 109,
    NETHER_BRICKS = 112,
    NETHER_BRICK_STAIRS = 114,
    SANDSTONE_STAIRS = 128,
    QUARTZ = 155,
    QUARTZ_STAIRS = 156,
    STONECUTTER = 245,
    GLOWING_OBSIDIAN = 246,
    NETHER_REACTOR_CORE = 247,
    UPDATE = 248,
    ATEUPD = 249,
    GRASS_BLOCK_CARRIED = 253,
    LEAVES_CARRIED = 254,
    STONE_255 = 255,
}

impl BlockType {
    pub fn id(self) -> u16 {
        self.0
    }
}

impl From<u16> for BlockType {
    fn from(id: u16) -> Self {
        BlockType(id)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extra data about a block, such as colour, rotation or growth stage.
///
/// The meaning of a value depends on the block type, so names overlap:
/// `BlockData::SPRUCE` and `BlockData::ORANGE` are both `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockData(pub u8);

impl BlockData {
    // LOG, LEAVES, SAPLING
    pub const OAK: BlockData = BlockData(0);
    pub const SPRUCE: BlockData = BlockData(1);
    pub const BIRCH: BlockData = BlockData(2);

    // WATER, STILL_WATER, LAVA, STILL_LAVA
    pub const LIQUID_FULL: BlockData = BlockData(0);
    pub const LIQUID_7: BlockData = BlockData(1);
    pub const LIQUID_6: BlockData = BlockData(2);
    pub const LIQUID_5: BlockData = BlockData(3);
    pub const LIQUID_4: BlockData = BlockData(4);
    pub const LIQUID_3: BlockData = BlockData(5);
    pub const LIQUID_2: BlockData = BlockData(6);
    pub const LIQUID_1: BlockData = BlockData(7);
    pub const LIQUID_FLOWING_DOWN: BlockData = BlockData(8);

    // SANDSTONE
    pub const SANDSTONE_NORMAL: BlockData = BlockData(0);
    pub const SANDSTONE_CHISELLED: BlockData = BlockData(1);
    pub const SANDSTONE_SMOOTH: BlockData = BlockData(2);

    // BED
    pub const BED_BOTTOM_Z_POSITIVE: BlockData = BlockData(0);
    pub const BED_BOTTOM_X_POSITIVE: BlockData = BlockData(1);
    pub const BED_BOTTOM_Z_NEGATIVE: BlockData = BlockData(2);
    pub const BED_BOTTOM_X_NEGATIVE: BlockData = BlockData(3);
    pub const BED_TOP_Z_POSITIVE: BlockData = BlockData(8);
    pub const BED_TOP_X_POSITIVE: BlockData = BlockData(9);
    pub const BED_TOP_Z_NEGATIVE: BlockData = BlockData(10);
    pub const BED_TOP_X_NEGATIVE: BlockData = BlockData(11);

    // BUSH
    pub const BUSH_DEAD: BlockData = BlockData(0);
    pub const BUSH_GRASS: BlockData = BlockData(1);
    pub const BUSH_FERN: BlockData = BlockData(3);

    // WOOL
    pub const WHITE: BlockData = BlockData(0);
    pub const ORANGE: BlockData = BlockData(1);
    pub const MAGENTA: BlockData = BlockData(2);
    pub const LIGHT_BLUE: BlockData = BlockData(3);
    pub const YELLOW: BlockData = BlockData(4);
    pub const LIME: BlockData = BlockData(5);
    pub const PINK: BlockData = BlockData(6);
    pub const GRAY: BlockData = BlockData(7);
    pub const LIGHT_GRAY: BlockData = BlockData(8);
    pub const CYAN: BlockData = BlockData(9);
    pub const PURPLE: BlockData = BlockData(10);
    pub const BLUE: BlockData = BlockData(11);
    pub const BROWN: BlockData = BlockData(12);
    pub const GREEN: BlockData = BlockData(13);
    pub const RED: BlockData = BlockData(14);
    pub const BLACK: BlockData = BlockData(15);

    // SLAB, DOUBLE_SLAB
    pub const SLAB_STONE: BlockData = BlockData(0);
    pub const SLAB_SANDSTONE: BlockData = BlockData(1);
    pub const SLAB_WOOD: BlockData = BlockData(2);
    pub const SLAB_COBBLESTONE: BlockData = BlockData(3);
    pub const SLAB_BRICKS: BlockData = BlockData(4);
    pub const SLAB_STONE_BRICKS: BlockData = BlockData(5);
    pub const SLAB_POLISHED_STONE: BlockData = BlockData(6);
    pub const SLAB_STONE_TOP: BlockData = BlockData(8);
    pub const SLAB_SANDSTONE_TOP: BlockData = BlockData(9);
    pub const SLAB_WOOD_TOP: BlockData = BlockData(10);
    pub const SLAB_COBBLESTONE_TOP: BlockData = BlockData(11);
    pub const SLAB_BRICKS_TOP: BlockData = BlockData(12);
    pub const SLAB_STONE_BRICKS_TOP: BlockData = BlockData(13);
    pub const SLAB_POLISHED_STONE_TOP: BlockData = BlockData(14);

    // TNT
    pub const TNT_INACTIVE: BlockData = BlockData(0);
    pub const TNT_ACTIVE: BlockData = BlockData(1);

    // All stair blocks
    pub const STAIRS_X_POSITIVE: BlockData = BlockData(0);
    pub const STAIRS_X_NEGATIVE: BlockData = BlockData(1);
    pub const STAIRS_Z_POSITIVE: BlockData = BlockData(2);
    pub const STAIRS_Z_NEGATIVE: BlockData = BlockData(3);
    pub const STAIRS_X_POSITIVE_UPSIDE_DOWN: BlockData = BlockData(4);
    pub const STAIRS_X_NEGATIVE_UPSIDE_DOWN: BlockData = BlockData(5);
    pub const STAIRS_Z_POSITIVE_UPSIDE_DOWN: BlockData = BlockData(6);
    pub const STAIRS_Z_NEGATIVE_UPSIDE_DOWN: BlockData = BlockData(7);

    // CHEST
    pub const CHEST_NOT_FACING: BlockData = BlockData(0);
    pub const CHEST_Z_NEGATIVE: BlockData = BlockData(2);
    pub const CHEST_Z_POSITIVE: BlockData = BlockData(3);
    pub const CHEST_X_NEGATIVE: BlockData = BlockData(4);
    pub const CHEST_X_POSITIVE: BlockData = BlockData(5);

    // MELON_STEM, WHEAT
    pub const GROWTH_STAGE_0: BlockData = BlockData(0);
    pub const GROWTH_STAGE_1: BlockData = BlockData(1);
    pub const GROWTH_STAGE_2: BlockData = BlockData(2);
    pub const GROWTH_STAGE_3: BlockData = BlockData(3);
    pub const GROWTH_STAGE_4: BlockData = BlockData(4);
    pub const GROWTH_STAGE_5: BlockData = BlockData(5);
    pub const GROWTH_STAGE_6: BlockData = BlockData(6);
    pub const GROWTH_STAGE_7: BlockData = BlockData(7);

    // SIGN (rotation in sixteenths, starting at +Z)
    pub const SIGN_Z_POSITIVE: BlockData = BlockData(0);
    pub const SIGN_Z_POSITIVE_POSITIVE_X_NEGATIVE: BlockData = BlockData(1);
    pub const SIGN_Z_POSITIVE_X_NEGATIVE: BlockData = BlockData(2);
    pub const SIGN_Z_POSITIVE_X_NEGATIVE_NEGATIVE: BlockData = BlockData(3);
    pub const SIGN_X_NEGATIVE: BlockData = BlockData(4);
    pub const SIGN_X_NEGATIVE_NEGATIVE_Z_NEGATIVE: BlockData = BlockData(5);
    pub const SIGN_X_NEGATIVE_Z_NEGATIVE: BlockData = BlockData(6);
    pub const SIGN_X_NEGATIVE_Z_NEGATIVE_NEGATIVE: BlockData = BlockData(7);
    pub const SIGN_Z_NEGATIVE: BlockData = BlockData(8);
    pub const SIGN_Z_NEGATIVE_NEGATIVE_X_POSITIVE: BlockData = BlockData(9);
    pub const SIGN_Z_NEGATIVE_X_POSITIVE: BlockData = BlockData(10);
    pub const SIGN_Z_NEGATIVE_X_POSITIVE_POSITIVE: BlockData = BlockData(11);
    pub const SIGN_X_POSITIVE: BlockData = BlockData(12);
    pub const SIGN_X_POSITIVE_POSITIVE_Z_POSITIVE: BlockData = BlockData(13);
    pub const SIGN_X_POSITIVE_Z_POSITIVE: BlockData = BlockData(14);
    pub const SIGN_X_POSITIVE_Z_POSITIVE_POSITIVE: BlockData = BlockData(15);

    // WOODEN_DOOR, IRON_DOOR
    pub const DOOR_OPENED_BOTTOM_X_NEGATIVE: BlockData = BlockData(0);
    pub const DOOR_OPENED_BOTTOM_Z_NEGATIVE: BlockData = BlockData(1);
    pub const DOOR_OPENED_BOTTOM_X_POSITIVE: BlockData = BlockData(2);
    pub const DOOR_OPENED_BOTTOM_Z_POSITIVE: BlockData = BlockData(3);
    pub const DOOR_CLOSED_BOTTOM_X_NEGATIVE: BlockData = BlockData(4);
    pub const DOOR_CLOSED_BOTTOM_Z_NEGATIVE: BlockData = BlockData(5);
    pub const DOOR_CLOSED_BOTTOM_X_POSITIVE: BlockData = BlockData(6);
    pub const DOOR_CLOSED_BOTTOM_Z_POSITIVE: BlockData = BlockData(7);
    pub const DOOR_CLOSED_TOP_X_NEGATIVE: BlockData = BlockData(8);

    // TRAPDOOR
    pub const TRAPDOOR_CLOSED_Z_POSITIVE: BlockData = BlockData(0);
    pub const TRAPDOOR_CLOSED_Z_NEGATIVE: BlockData = BlockData(1);
    pub const TRAPDOOR_CLOSED_X_POSITIVE: BlockData = BlockData(2);
    pub const TRAPDOOR_CLOSED_X_NEGATIVE: BlockData = BlockData(3);
    pub const TRAPDOOR_OPENED_Z_POSITIVE: BlockData = BlockData(4);
    pub const TRAPDOOR_OPENED_Z_NEGATIVE: BlockData = BlockData(5);
    pub const TRAPDOOR_OPENED_X_POSITIVE: BlockData = BlockData(6);
    pub const TRAPDOOR_OPENED_X_NEGATIVE: BlockData = BlockData(7);

    // FENCE_GATE
    pub const FENCE_GATE_CLOSED_Z_POSITIVE: BlockData = BlockData(0);
    pub const FENCE_GATE_CLOSED_X_POSITIVE: BlockData = BlockData(1);
    pub const FENCE_GATE_CLOSED_Z_NEGATIVE: BlockData = BlockData(2);
    pub const FENCE_GATE_CLOSED_X_NEGATIVE: BlockData = BlockData(3);
    pub const FENCE_GATE_OPENED_Z_POSITIVE: BlockData = BlockData(4);
    pub const FENCE_GATE_OPENED_X_POSITIVE: BlockData = BlockData(5);
    pub const FENCE_GATE_OPENED_Z_NEGATIVE: BlockData = BlockData(6);
    pub const FENCE_GATE_OPENED_X_NEGATIVE: BlockData = BlockData(7);

    // QUARTZ
    pub const QUARTZ_NORMAL: BlockData = BlockData(0);
    pub const QUARTZ_CHISELLED: BlockData = BlockData(1);
    pub const QUARTZ_PILLAR: BlockData = BlockData(2);

    // FARMLAND
    pub const FARMLAND_DRY: BlockData = BlockData(0);
    pub const FARMLAND_WET: BlockData = BlockData(1);

    // NETHER_REACTOR_CORE
    pub const NETHER_REACTOR_CORE_NORMAL: BlockData = BlockData(0);
    pub const NETHER_REACTOR_CORE_ACTIVE: BlockData = BlockData(1);
    pub const NETHER_REACTOR_CORE_BURNED: BlockData = BlockData(2);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for BlockData {
    fn from(value: u8) -> Self {
        BlockData(value)
    }
}

impl fmt::Display for BlockData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A face of a block, as reported by block hit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum BlockFace {
    YNegative = 0,
    YPositive = 1,
    ZNegative = 2,
    ZPositive = 3,
    XNegative = 4,
    XPositive = 5,
}

impl TryFrom<i32> for BlockFace {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BlockFace::YNegative),
            1 => Ok(BlockFace::YPositive),
            2 => Ok(BlockFace::ZNegative),
            3 => Ok(BlockFace::ZPositive),
            4 => Ok(BlockFace::XNegative),
            5 => Ok(BlockFace::XPositive),
            other => Err(format!("unknown block face {}", other)),
        }
    }
}

impl From<BlockFace> for i32 {
    fn from(face: BlockFace) -> Self {
        face as i32
    }
}

/// A block at a known location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub block_type: BlockType,
    pub data: BlockData,
    pub location: Vec3,
}
