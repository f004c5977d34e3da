use super::{GameManagerError, Result};
use crate::config::TeamSetup;
use indexmap::IndexMap;
use log::*;
use scoreboard_common::{
    game_snapshot::{PlayerStats, StatKind, TeamSnapshot},
    team::Team,
};

/// Point values the operator can post. `-1` is a correction.
pub const VALID_POINTS: [i8; 4] = [-1, 1, 2, 3];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    team: Team,
    name: String,
    score: u16,
    fouls: u16,
    technical_fouls: u16,
    timeouts_left: u16,
    in_bonus: bool,
    players: IndexMap<u8, PlayerStats>,
}

impl ScoreBoard {
    pub fn new(team: Team, setup: &TeamSetup, timeouts: u16) -> Self {
        Self {
            team,
            name: setup.name.clone(),
            score: 0,
            fouls: 0,
            technical_fouls: 0,
            timeouts_left: timeouts,
            in_bonus: false,
            players: setup
                .players
                .iter()
                .map(|p| (p.number, PlayerStats::new(p.name.clone())))
                .collect(),
        }
    }

    pub fn score(&self) -> u16 {
        self.score
    }

    pub fn fouls(&self) -> u16 {
        self.fouls
    }

    pub fn in_bonus(&self) -> bool {
        self.in_bonus
    }

    pub fn timeouts_left(&self) -> u16 {
        self.timeouts_left
    }

    pub fn player(&self, number: u8) -> Option<&PlayerStats> {
        self.players.get(&number)
    }

    /// Corrections clamp at zero
    pub fn add_score(&mut self, points: i8) -> Result<()> {
        if !VALID_POINTS.contains(&points) {
            return Err(GameManagerError::InvalidCommand(format!(
                "{points} is not a valid point value, expected one of {VALID_POINTS:?}"
            )));
        }
        if points < 0 {
            if self.score == 0 {
                warn!("Ignoring a correction for {}, score is already 0", self.team);
            }
            self.score = self.score.saturating_sub(points.unsigned_abs().into());
        } else {
            self.score = self.score.saturating_add(points as u16);
        }
        Ok(())
    }

    /// Returns `true` if this foul put the team in the bonus
    pub fn add_foul(&mut self, bonus_threshold: u16) -> bool {
        self.fouls = self.fouls.saturating_add(1);
        if !self.in_bonus && self.fouls >= bonus_threshold {
            self.in_bonus = true;
            true
        } else {
            false
        }
    }

    pub fn add_technical_foul(&mut self) {
        self.technical_fouls = self.technical_fouls.saturating_add(1);
    }

    /// Returns the number of timeouts left after this one
    pub fn use_timeout(&mut self) -> Result<u16> {
        if self.timeouts_left == 0 {
            return Err(GameManagerError::ExhaustedResource(self.team));
        }
        self.timeouts_left -= 1;
        Ok(self.timeouts_left)
    }

    pub fn increment_player_stat(&mut self, number: u8, stat: StatKind) -> Result<()> {
        self.players
            .get_mut(&number)
            .ok_or(GameManagerError::UnknownPlayer(self.team, number))?
            .increment(stat);
        Ok(())
    }

    pub fn add_player(&mut self, number: u8, name: String) -> Result<()> {
        if self.players.contains_key(&number) {
            return Err(GameManagerError::InvalidCommand(format!(
                "The {} team already has a player #{number}",
                self.team
            )));
        }
        self.players.insert(number, PlayerStats::new(name));
        Ok(())
    }

    pub fn remove_player(&mut self, number: u8) -> Result<PlayerStats> {
        self.players
            .shift_remove(&number)
            .ok_or(GameManagerError::UnknownPlayer(self.team, number))
    }

    pub fn substitute(&mut self, player_in: u8, player_out: u8) -> Result<()> {
        for number in [player_in, player_out] {
            if !self.players.contains_key(&number) {
                return Err(GameManagerError::UnknownPlayer(self.team, number));
            }
        }
        if let Some(p) = self.players.get_mut(&player_out) {
            p.in_game = false;
        }
        if let Some(p) = self.players.get_mut(&player_in) {
            p.in_game = true;
        }
        Ok(())
    }

    pub fn reset_period_fouls(&mut self) {
        self.fouls = 0;
        self.in_bonus = false;
    }

    pub fn restore_timeouts(&mut self, timeouts: u16) {
        self.timeouts_left = timeouts;
    }

    /// Zeroes everything but the name and roster
    pub fn reset_for_new_game(&mut self, timeouts: u16) {
        self.score = 0;
        self.technical_fouls = 0;
        self.reset_period_fouls();
        self.restore_timeouts(timeouts);
        self.players
            .values_mut()
            .for_each(PlayerStats::clear_counters);
    }

    pub fn as_snapshot(&self) -> TeamSnapshot {
        TeamSnapshot {
            name: self.name.clone(),
            score: self.score,
            fouls: self.fouls,
            technical_fouls: self.technical_fouls,
            timeouts_left: self.timeouts_left,
            in_bonus: self.in_bonus,
            players: self.players.clone(),
        }
    }
}
