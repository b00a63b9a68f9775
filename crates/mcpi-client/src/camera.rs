//! Camera control

use mcpi_bridge::Connection;
use mcpi_bridge::protocol::Command;
use mcpi_core::{EntityId, Result, Vec3};

/// Controls the client's camera
#[derive(Debug, Clone)]
pub struct Camera {
    connection: Connection,
}

impl Camera {
    pub(crate) fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Follow an entity's head (default: the host player)
    pub async fn normal(&self, entity: Option<EntityId>) -> Result<()> {
        let command = Command::new("camera.mode.setNormal").opt_arg(entity);
        self.connection.execute(&command.render()?).await
    }

    /// Look straight down at an entity from a few blocks above
    /// (default: the host player)
    pub async fn follow(&self, entity: Option<EntityId>) -> Result<()> {
        let command = Command::new("camera.mode.setFollow").opt_arg(entity);
        self.connection.execute(&command.render()?).await
    }

    /// Fix the camera in place. Enables [`set_position`](Self::set_position).
    pub async fn fixed(&self) -> Result<()> {
        self.connection
            .execute(&Command::new("camera.mode.setFixed").render()?)
            .await
    }

    /// Move a fixed camera
    pub async fn set_position(&self, coords: impl Into<Vec3>) -> Result<()> {
        let command = Command::new("camera.setPos").arg(coords.into());
        self.connection.execute(&command.render()?).await
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::scripted;

    #[tokio::test(start_paused = true)]
    async fn test_camera_modes() {
        let world = scripted(&[
            ("camera.mode.setNormal()", None),
            ("camera.mode.setFollow(12)", None),
            ("camera.mode.setFixed()", None),
            ("camera.setPos(0.5,80,-10)", None),
        ]);

        world.camera.normal(None).await.unwrap();
        world.camera.follow(Some(12)).await.unwrap();
        world.camera.fixed().await.unwrap();
        world.camera.set_position([0.5, 80.0, -10.0]).await.unwrap();
    }
}
