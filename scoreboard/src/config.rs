use serde::{Deserialize, Serialize};
pub use scoreboard_common::config::Game;
use scoreboard_common::bundles::HomeAwayBundle;
use tokio::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub number: u8,
    pub name: String,
}

/// A team as it appears before the game starts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSetup {
    pub name: String,
    #[serde(default)]
    pub players: Vec<PlayerSetup>,
}

impl TeamSetup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            players: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub tick_interval_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
        }
    }
}

impl Timing {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub game: Game,
    pub teams: HomeAwayBundle<TeamSetup>,
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: Default::default(),
            teams: HomeAwayBundle::new(TeamSetup::new("Home Team"), TeamSetup::new("Away Team")),
            timing: Default::default(),
        }
    }
}
