//! Setting keys for `world.setting` and `player.setting`

use serde::{Deserialize, Serialize};
use std::fmt;

/// World-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldSetting {
    /// Whether in-game players can change the world
    WorldImmutable,
    /// Whether player nametags are visible
    NametagsVisible,
    /// Key not known to this crate, passed through verbatim
    Custom(String),
}

impl WorldSetting {
    pub fn key(&self) -> &str {
        match self {
            WorldSetting::WorldImmutable => "world_immutable",
            WorldSetting::NametagsVisible => "nametags_visible",
            WorldSetting::Custom(key) => key,
        }
    }
}

impl fmt::Display for WorldSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Settings for the client player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSetting {
    /// Whether the player jumps automatically when running into a block
    Autojump,
    /// Key not known to this crate, passed through verbatim
    Custom(String),
}

impl PlayerSetting {
    pub fn key(&self) -> &str {
        match self {
            PlayerSetting::Autojump => "autojump",
            PlayerSetting::Custom(key) => key,
        }
    }
}

impl fmt::Display for PlayerSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(WorldSetting::WorldImmutable.to_string(), "world_immutable");
        assert_eq!(WorldSetting::NametagsVisible.key(), "nametags_visible");
        assert_eq!(PlayerSetting::Autojump.key(), "autojump");
        assert_eq!(PlayerSetting::Custom("fly".into()).key(), "fly");
    }
}
