use core::time::Duration;
use log::*;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;

/// Rules of play. All durations are in whole seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub quarter_play_duration: u16,
    pub num_quarters: u8,
    pub has_overtime: bool,
    pub ot_play_duration: u16,
    pub shot_clock_full: u16,
    pub shot_clock_partial: u16,
    pub bonus_foul_threshold: u16,
    pub team_timeouts_per_half: u16,
}

impl Default for Game {
    fn default() -> Self {
        Self {
            quarter_play_duration: 720,
            num_quarters: 4,
            has_overtime: true,
            ot_play_duration: 300,
            shot_clock_full: 24,
            shot_clock_partial: 14,
            bonus_foul_threshold: 5,
            team_timeouts_per_half: 4,
        }
    }
}

impl Game {
    pub fn new_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let config_file = match read_to_string(path) {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to read game rules file: {}", e);
                return Err(Box::new(e));
            }
        };

        match toml::from_str(&config_file) {
            Ok(c) => Ok(c),
            Err(e) => {
                error!("Failed to parse game rules file: {}", e);
                Err(Box::new(e))
            }
        }
    }

    pub fn shot_clock_full_duration(&self) -> Duration {
        Duration::from_secs(self.shot_clock_full.into())
    }

    pub fn shot_clock_partial_duration(&self) -> Duration {
        Duration::from_secs(self.shot_clock_partial.into())
    }

    /// Quarter number of the first period of the second half
    pub fn second_half_start(&self) -> u8 {
        self.num_quarters / 2 + 1
    }
}
