//! Block access

use mcpi_bridge::Connection;
use mcpi_bridge::protocol::{Command, fields, parse_field, records};
use mcpi_core::{Block, BlockData, BlockFace, BlockHit, BlockType, McpiError, Result, Vec3};
use tracing::debug;

/// Reads and writes blocks
#[derive(Debug, Clone)]
pub struct BlockManager {
    connection: Connection,
}

impl BlockManager {
    pub(crate) fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Fetch new block hits since the last poll.
    ///
    /// On Minecraft: Pi Edition a hit is right-clicking a block with a sword.
    pub async fn poll_hits(&self) -> Result<Vec<BlockHit>> {
        let reply = self
            .connection
            .request(&Command::new("events.block.hits").render()?)
            .await?;

        let hits = records(&reply).map(parse_hit).collect::<Result<Vec<_>>>()?;
        if !hits.is_empty() {
            debug!("{} block hit(s)", hits.len());
        }
        Ok(hits)
    }

    /// Fetch the block at a location
    pub async fn fetch(&self, coords: impl Into<Vec3>) -> Result<Block> {
        let location = block_coords(coords.into())?;
        let reply = self
            .connection
            .request(&Command::new("world.getBlockWithData").arg(location).render()?)
            .await?;

        match fields(&reply)[..] {
            [id, data] => Ok(Block {
                block_type: BlockType(parse_field(id)?),
                data: BlockData(parse_field(data)?),
                location,
            }),
            _ => Err(McpiError::InvalidResponse(format!(
                "expected id,data but got `{}`",
                reply
            ))),
        }
    }

    /// Fetch the block a polled hit landed on
    pub async fn fetch_hit_block(&self, hit: &BlockHit) -> Result<Block> {
        self.fetch(hit.location).await
    }

    /// Y of the highest non-air block at `x`, `z`
    pub async fn fetch_height(&self, x: i32, z: i32) -> Result<i32> {
        let reply = self
            .connection
            .request(&Command::new("world.getHeight").arg(x).arg(z).render()?)
            .await?;
        parse_field(&reply)
    }

    /// Place a block. `data` is only sent when given.
    pub async fn set(
        &self,
        coords: impl Into<Vec3>,
        block_type: BlockType,
        data: Option<BlockData>,
    ) -> Result<Block> {
        let location = coords.into();
        let command = Command::new("world.setBlock")
            .arg(location)
            .arg(block_type)
            .opt_arg(data);
        self.connection.execute(&command.render()?).await?;

        Ok(Block {
            block_type,
            data: data.unwrap_or_default(),
            location,
        })
    }

    /// Fill the cuboid between two corners (inclusive) with one block type
    pub async fn fill(
        &self,
        corner1: impl Into<Vec3>,
        corner2: impl Into<Vec3>,
        block_type: BlockType,
        data: Option<BlockData>,
    ) -> Result<()> {
        let corner1 = block_coords(corner1.into())?;
        let corner2 = block_coords(corner2.into())?;
        let command = Command::new("world.setBlocks")
            .arg(corner1)
            .arg(corner2)
            .arg(block_type)
            .opt_arg(data);
        self.connection.execute(&command.render()?).await
    }
}

/// Block addresses must be whole numbers
fn block_coords(coords: Vec3) -> Result<Vec3> {
    if coords.is_integral() {
        Ok(coords)
    } else {
        Err(McpiError::InvalidArgument(format!(
            "block coordinates must be integers, got {}",
            coords
        )))
    }
}

/// `x,y,z,face,playerId`
fn parse_hit(record: &str) -> Result<BlockHit> {
    match fields(record)[..] {
        [x, y, z, face, player_id] => {
            let face = BlockFace::try_from(parse_field::<i32>(face)?)
                .map_err(McpiError::InvalidResponse)?;
            Ok(BlockHit {
                location: Vec3::new(parse_field(x)?, parse_field(y)?, parse_field(z)?),
                face,
                player_id: parse_field(player_id)?,
            })
        }
        _ => Err(McpiError::InvalidResponse(format!(
            "expected x,y,z,face,playerId but got `{}`",
            record
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scripted;

    #[tokio::test(start_paused = true)]
    async fn test_poll_hits() {
        let world = scripted(&[("events.block.hits()", Some("1,2,3,1,42|-4,5,6,5,7"))]);

        let hits = world.blocks.poll_hits().await.unwrap();
        assert_eq!(
            hits,
            vec![
                BlockHit {
                    location: Vec3::new(1.0, 2.0, 3.0),
                    face: BlockFace::YPositive,
                    player_id: 42,
                },
                BlockHit {
                    location: Vec3::new(-4.0, 5.0, 6.0),
                    face: BlockFace::XPositive,
                    player_id: 7,
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_hits_empty() {
        let world = scripted(&[("events.block.hits()", Some(""))]);
        assert!(world.blocks.poll_hits().await.unwrap().is_empty());
    }

    #[test]
    fn test_parse_hit_rejects_bad_records() {
        assert!(matches!(parse_hit("1,2,3,9,1"), Err(McpiError::InvalidResponse(_))));
        assert!(matches!(parse_hit("1,2,3"), Err(McpiError::InvalidResponse(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch() {
        let world = scripted(&[("world.getBlockWithData(10,64,-3)", Some("35,14"))]);

        let block = world.blocks.fetch([10, 64, -3]).await.unwrap();
        assert_eq!(block.block_type, BlockType::WOOL);
        assert_eq!(block.data, BlockData(14));
        assert_eq!(block.location, Vec3::new(10.0, 64.0, -3.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_hit_block() {
        let world = scripted(&[
            ("events.block.hits()", Some("4,70,-8,0,1")),
            ("world.getBlockWithData(4,70,-8)", Some("1,0")),
        ]);

        let hits = world.blocks.poll_hits().await.unwrap();
        let block = world.blocks.fetch_hit_block(&hits[0]).await.unwrap();
        assert_eq!(block.block_type, BlockType::STONE);
        assert_eq!(block.location, hits[0].location);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_requires_integral_coords() {
        let world = scripted(&[]);
        let result = world.blocks.fetch([0.5, 64.0, 0.0]).await;
        assert!(matches!(result, Err(McpiError::InvalidArgument(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_height() {
        let world = scripted(&[("world.getHeight(3,-4)", Some("12"))]);
        assert_eq!(world.blocks.fetch_height(3, -4).await.unwrap(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_with_and_without_data() {
        let world = scripted(&[
            ("world.setBlock(1,2,3,35,14)", None),
            ("world.setBlock(1,2,3,0)", None),
            ("world.setBlock(1,2,3,35,0)", None),
        ]);

        let block = world
            .blocks
            .set([1, 2, 3], BlockType::WOOL, Some(BlockData(14)))
            .await
            .unwrap();
        assert_eq!(block.data, BlockData(14));

        let air = world.blocks.set([1, 2, 3], BlockType::AIR, None).await.unwrap();
        assert_eq!(air.data, BlockData(0));

        // Explicit zero data is still sent
        world
            .blocks
            .set([1, 2, 3], BlockType::WOOL, Some(BlockData(0)))
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_reports_fail() {
        let world = scripted(&[("world.setBlock(0,0,0,999)", Some("Fail"))]);
        let result = world.blocks.set([0, 0, 0], BlockType(999), None).await;
        assert!(matches!(result, Err(McpiError::Command { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fill() {
        let world = scripted(&[("world.setBlocks(0,0,0,4,1,4,1)", None)]);
        world
            .blocks
            .fill([0, 0, 0], [4, 1, 4], BlockType::STONE, None)
            .await
            .unwrap();

        let result = world
            .blocks
            .fill([0.0, 0.0, 0.0], [4.5, 1.0, 4.0], BlockType::STONE, None)
            .await;
        assert!(matches!(result, Err(McpiError::InvalidArgument(_))));
    }
}
