//! Players and other entities

use async_trait::async_trait;
use mcpi_bridge::Connection;
use mcpi_bridge::protocol::{Command, parse_vec3};
use mcpi_core::{EntityId, PlayerSetting, Result, Vec3};

/// Position access shared by the client player and other entities
#[async_trait]
pub trait EntityApi: Send + Sync {
    /// The block the entity stands in; like
    /// [`fetch_position`](Self::fetch_position) without decimals
    async fn fetch_tile(&self) -> Result<Vec3>;

    /// Absolute position
    async fn fetch_position(&self) -> Result<Vec3>;

    /// Move to the center of a block
    async fn set_tile(&self, coords: Vec3) -> Result<()>;

    /// Move to an absolute position
    async fn set_position(&self, coords: Vec3) -> Result<()>;
}

/// Who an entity command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// The player the API is attached to (`player.*`)
    Player,
    /// Any entity by id (`entity.*`)
    Entity(EntityId),
}

impl Target {
    fn command(self, player: &'static str, entity: &'static str) -> Command {
        match self {
            Target::Player => Command::new(player),
            Target::Entity(id) => Command::new(entity).arg(id),
        }
    }
}

/// Command plumbing behind both entity handles
#[derive(Debug, Clone)]
struct EntityCommands {
    connection: Connection,
    target: Target,
}

impl EntityCommands {
    async fn fetch(&self, command: Command) -> Result<Vec3> {
        let reply = self.connection.request(&command.render()?).await?;
        parse_vec3(&reply)
    }

    async fn apply(&self, command: Command) -> Result<()> {
        self.connection.execute(&command.render()?).await
    }
}

#[async_trait]
impl EntityApi for EntityCommands {
    async fn fetch_tile(&self) -> Result<Vec3> {
        self.fetch(self.target.command("player.getTile", "entity.getTile"))
            .await
    }

    async fn fetch_position(&self) -> Result<Vec3> {
        self.fetch(self.target.command("player.getPos", "entity.getPos"))
            .await
    }

    async fn set_tile(&self, coords: Vec3) -> Result<()> {
        let command = self
            .target
            .command("player.setTile", "entity.setTile")
            .arg(coords);
        self.apply(command).await
    }

    async fn set_position(&self, coords: Vec3) -> Result<()> {
        let command = self
            .target
            .command("player.setPos", "entity.setPos")
            .arg(coords);
        self.apply(command).await
    }
}

/// An entity, such as a player or mob
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    commands: EntityCommands,
}

impl Entity {
    /// Handle for an entity id; does not check the entity exists
    pub fn new(connection: Connection, id: EntityId) -> Self {
        Self {
            id,
            commands: EntityCommands {
                connection,
                target: Target::Entity(id),
            },
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }
}

#[async_trait]
impl EntityApi for Entity {
    async fn fetch_tile(&self) -> Result<Vec3> {
        self.commands.fetch_tile().await
    }

    async fn fetch_position(&self) -> Result<Vec3> {
        self.commands.fetch_position().await
    }

    async fn set_tile(&self, coords: Vec3) -> Result<()> {
        self.commands.set_tile(coords).await
    }

    async fn set_position(&self, coords: Vec3) -> Result<()> {
        self.commands.set_position(coords).await
    }
}

/// The player the API is attached to
#[derive(Debug, Clone)]
pub struct ClientPlayer {
    commands: EntityCommands,
}

impl ClientPlayer {
    pub(crate) fn new(connection: Connection) -> Self {
        Self {
            commands: EntityCommands {
                connection,
                target: Target::Player,
            },
        }
    }

    /// Change a setting for the client player
    pub async fn change_setting(&self, setting: PlayerSetting, enabled: bool) -> Result<()> {
        let command = Command::new("player.setting")
            .arg(setting)
            .arg(u8::from(enabled))
            .render()?;
        self.commands.connection.execute(&command).await
    }
}

#[async_trait]
impl EntityApi for ClientPlayer {
    async fn fetch_tile(&self) -> Result<Vec3> {
        self.commands.fetch_tile().await
    }

    async fn fetch_position(&self) -> Result<Vec3> {
        self.commands.fetch_position().await
    }

    async fn set_tile(&self, coords: Vec3) -> Result<()> {
        self.commands.set_tile(coords).await
    }

    async fn set_position(&self, coords: Vec3) -> Result<()> {
        self.commands.set_position(coords).await
    }
}
