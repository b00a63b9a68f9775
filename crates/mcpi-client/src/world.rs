//! The world: entry point to the API

use crate::blocks::BlockManager;
use crate::camera::Camera;
use crate::chat::Chat;
use crate::entity::{ClientPlayer, Entity};
use mcpi_bridge::protocol::{Command, parse_field, records};
use mcpi_bridge::{Connection, ConnectionConfig};
use mcpi_core::{EntityId, Result, WorldSetting};
use tracing::{debug, info};

/// A connection to a Minecraft: Pi Edition game.
///
/// Every adapter holds a clone of the same session, so commands issued
/// through any of them are served in call order.
#[derive(Debug, Clone)]
pub struct World {
    connection: Connection,
    pub chat: Chat,
    pub blocks: BlockManager,
    pub camera: Camera,
    /// The player the API is attached to
    pub me: ClientPlayer,
    pub checkpoint: WorldCheckpoint,
}

impl World {
    /// Connect to the game over TCP. Must be called inside a tokio runtime.
    pub fn connect(config: ConnectionConfig) -> Self {
        info!("Opening world at {}:{}", config.host, config.port);
        Self::from_connection(Connection::open(config))
    }

    /// Build the adapters around an existing session
    pub fn from_connection(connection: Connection) -> Self {
        Self {
            chat: Chat::new(connection.clone()),
            blocks: BlockManager::new(connection.clone()),
            camera: Camera::new(connection.clone()),
            me: ClientPlayer::new(connection.clone()),
            checkpoint: WorldCheckpoint::new(connection.clone()),
            connection,
        }
    }

    /// The underlying session, for raw commands
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Wait for the connection to open
    pub async fn ready(&self) -> Result<()> {
        self.connection.ready().await
    }

    /// Destroy the session, disconnecting from the game
    pub fn close(&self) {
        self.connection.destroy();
    }

    /// All players currently in the world
    pub async fn players(&self) -> Result<Vec<Entity>> {
        let reply = self
            .connection
            .request(&Command::new("world.getPlayerIds").render()?)
            .await?;

        let players = records(&reply)
            .map(|id| parse_field::<EntityId>(id).map(|id| self.entity(id)))
            .collect::<Result<Vec<_>>>()?;
        debug!("{} player(s) online", players.len());
        Ok(players)
    }

    /// Change a world-wide setting
    pub async fn change_setting(&self, setting: WorldSetting, enabled: bool) -> Result<()> {
        let command = Command::new("world.setting")
            .arg(setting)
            .arg(u8::from(enabled))
            .render()?;
        self.connection.execute(&command).await
    }

    /// Handle to an entity by id. Does not contact the game.
    pub fn entity(&self, id: EntityId) -> Entity {
        Entity::new(self.connection.clone(), id)
    }
}

/// Saving and restoring world snapshots
#[derive(Debug, Clone)]
pub struct WorldCheckpoint {
    connection: Connection,
}

impl WorldCheckpoint {
    pub(crate) fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Save the current state of the world, to be restored with [`restore`](Self::restore)
    pub async fn create(&self) -> Result<()> {
        self.connection
            .execute(&Command::new("world.checkpoint.save").render()?)
            .await
    }

    /// Restore the world to the last saved checkpoint
    pub async fn restore(&self) -> Result<()> {
        self.connection
            .execute(&Command::new("world.checkpoint.restore").render()?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::EntityApi;
    use crate::testing::scripted;
    use mcpi_core::{McpiError, Vec3, WorldSetting};

    #[tokio::test(start_paused = true)]
    async fn test_players() {
        let world = scripted(&[
            ("world.getPlayerIds()", Some("1|7")),
            ("entity.getPos(7)", Some("0.5,64,-2.5")),
        ]);

        let players = world.players().await.unwrap();
        let ids: Vec<_> = players.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![1, 7]);
        assert_eq!(
            players[1].fetch_position().await.unwrap(),
            Vec3::new(0.5, 64.0, -2.5)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_players() {
        let world = scripted(&[("world.getPlayerIds()", Some(""))]);
        assert!(world.players().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_player_ids() {
        let world = scripted(&[("world.getPlayerIds()", Some("1|steve"))]);
        assert!(matches!(
            world.players().await,
            Err(McpiError::InvalidResponse(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_setting() {
        let world = scripted(&[
            ("world.setting(world_immutable,1)", None),
            ("world.setting(nametags_visible,0)", None),
        ]);

        world
            .change_setting(WorldSetting::WorldImmutable, true)
            .await
            .unwrap();
        world
            .change_setting(WorldSetting::NametagsVisible, false)
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_setting_key_is_never_sent() {
        let world = scripted(&[("world.setting(world_immutable,0)", None)]);

        let result = world
            .change_setting(WorldSetting::Custom("fly\nchat.post(x)".into()), true)
            .await;
        assert!(matches!(result, Err(McpiError::InvalidArgument(_))));

        // Only the valid command reaches the game
        world
            .change_setting(WorldSetting::WorldImmutable, false)
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkpoint_save_and_restore() {
        let world = scripted(&[
            ("world.checkpoint.save()", None),
            ("world.checkpoint.restore()", None),
        ]);

        world.checkpoint.create().await.unwrap();
        world.checkpoint.restore().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_rejects_further_commands() {
        let world = scripted(&[]);
        world.ready().await.unwrap();
        world.close();

        assert!(matches!(
            world.checkpoint.create().await,
            Err(McpiError::Destroyed)
        ));
    }
}
