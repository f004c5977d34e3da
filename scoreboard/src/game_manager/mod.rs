use crate::config::TeamSetup;
use enum_iterator::all;
use log::*;
use scoreboard_common::{
    bundles::HomeAwayBundle,
    config::Game as GameConfig,
    game_snapshot::{GameSnapshot, Period, StatKind},
    team::Team,
};
use thiserror::Error;
use tokio::time::Duration;

pub mod command;
use command::*;

pub mod event;
use event::*;

pub mod possession;
use possession::*;

pub mod score_board;
use score_board::*;

pub mod shot_clock;
use shot_clock::*;

pub mod timer;
use timer::*;

/// The new state after a command or tick, plus what happened on the way there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub snapshot: GameSnapshot,
    pub events: Vec<GameEvent>,
}

/// Owns all game state and enforces the rules that couple the score, clocks and possession.
///
/// Every command is validated against the current state before anything is changed, so a
/// rejected command leaves the game exactly as it was.
#[derive(Debug, Clone)]
pub struct GameManager {
    config: GameConfig,
    quarter: u8,
    game_clock: Timer,
    shot_clock: ShotClock,
    teams: HomeAwayBundle<ScoreBoard>,
    possession: PossessionTracker,
}

impl GameManager {
    pub fn new(config: GameConfig, teams: &HomeAwayBundle<TeamSetup>) -> Self {
        let timeouts = config.team_timeouts_per_half;
        Self {
            quarter: 1,
            game_clock: Timer::new(Period::Quarter(1).duration(&config)),
            shot_clock: ShotClock::new(&config),
            teams: HomeAwayBundle::new(
                ScoreBoard::new(Team::Home, &teams.home, timeouts),
                ScoreBoard::new(Team::Away, &teams.away, timeouts),
            ),
            possession: PossessionTracker::new(Team::Home),
            config,
        }
    }

    pub fn current_period(&self) -> Period {
        Period::from_quarter(self.quarter, &self.config)
    }

    pub fn apply(&mut self, command: Command) -> Result<Transition> {
        let events = match command {
            Command::Score { team, points } => self.add_score(team, points)?,
            Command::Foul { team } => self.add_foul(team),
            Command::TechnicalFoul { team } => self.add_technical_foul(team),
            Command::Timeout { team } => self.use_timeout(team)?,
            Command::Clock { action } => self.clock_action(action)?,
            Command::ShotClock { action } => self.shot_clock_action(action)?,
            Command::Possession { team } => self.set_possession(team),
            Command::PlayerStat { team, player, stat } => {
                self.increment_player_stat(team, player, stat)?
            }
            Command::Quarter { action } => self.quarter_action(action)?,
            Command::AddPlayer { team, player, name } => self.add_player(team, player, name)?,
            Command::RemovePlayer { team, player } => self.remove_player(team, player)?,
            Command::Substitution {
                team,
                player_in,
                player_out,
            } => self.substitute(team, player_in, player_out)?,
            Command::ResetGame => self.reset_game(),
        };
        Ok(self.transition(events))
    }

    /// Advances both clocks. Ticks can't fail, running clocks floor at zero.
    ///
    /// The tick is split at every expiry, so a clock halted by the other one is only charged
    /// for the time before it was halted.
    pub fn tick(&mut self, elapsed: Duration) -> Transition {
        let mut events = Vec::new();
        let mut left = elapsed;

        loop {
            let step = self.time_to_next_expiry().map_or(left, |t| t.min(left));
            left -= step;

            let game_clock_expired = self.game_clock.tick(step);
            if self.shot_clock.tick(step) {
                info!("{} Shot clock expired", self.status_string());
                self.handle_violation(&mut events);
            }

            if game_clock_expired {
                info!(
                    "{} Game clock expired, ending {}",
                    self.status_string(),
                    self.current_period()
                );
                self.game_clock.stop();
                if self.shot_clock.is_running() {
                    self.shot_clock.stop();
                }
                events.push(GameEvent::GameClockExpired {
                    quarter: self.quarter,
                });
            }

            if left.is_zero() || self.time_to_next_expiry().is_none() {
                break;
            }
        }

        self.transition(events)
    }

    /// `None` when neither clock is running
    fn time_to_next_expiry(&self) -> Option<Duration> {
        [
            self.game_clock.is_running().then(|| self.game_clock.remaining()),
            self.shot_clock.is_running().then(|| self.shot_clock.remaining()),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn add_score(&mut self, team: Team, points: i8) -> Result<Vec<GameEvent>> {
        self.teams[team].add_score(points)?;
        info!(
            "{} {points:+} for {team}, score is now {}",
            self.status_string(),
            self.score_string()
        );

        let mut events = Vec::new();
        if points > 0 {
            self.change_possession(team.other(), &mut events);
        }
        Ok(events)
    }

    pub fn add_foul(&mut self, team: Team) -> Vec<GameEvent> {
        let entered_bonus = self.teams[team].add_foul(self.config.bonus_foul_threshold);
        info!(
            "{} Foul on {team}, {} team fouls this period",
            self.status_string(),
            self.teams[team].fouls()
        );
        if entered_bonus {
            info!("{} {team} is in the bonus", self.status_string());
            vec![GameEvent::BonusEntered { team }]
        } else {
            Vec::new()
        }
    }

    pub fn add_technical_foul(&mut self, team: Team) -> Vec<GameEvent> {
        info!("{} Technical foul on {team}", self.status_string());
        self.teams[team].add_technical_foul();
        Vec::new()
    }

    pub fn use_timeout(&mut self, team: Team) -> Result<Vec<GameEvent>> {
        let remaining = self.teams[team].use_timeout()?;
        info!(
            "{} Timeout for {team}, {remaining} left",
            self.status_string()
        );
        Ok(vec![GameEvent::TimeoutCalled { team, remaining }])
    }

    pub fn can_start_game_clock(&self) -> Result<()> {
        if self.game_clock.is_expired() {
            Err(GameManagerError::IllegalTransition(
                "the game clock has expired, advance the quarter or reset the clock",
            ))
        } else {
            Ok(())
        }
    }

    pub fn clock_action(&mut self, action: ClockAction) -> Result<Vec<GameEvent>> {
        match action {
            ClockAction::Start => {
                self.can_start_game_clock()?;
                if self.game_clock.start() {
                    info!("{} Starting the game clock", self.status_string());
                }
            }
            ClockAction::Stop => {
                // A stoppage halts both clocks, but must not clear a latched violation
                if self.game_clock.stop() {
                    info!("{} Stopping the game clock", self.status_string());
                }
                if self.shot_clock.is_running() {
                    info!("{} Stopping the shot clock", self.status_string());
                    self.shot_clock.stop();
                }
            }
            ClockAction::Reset => {
                self.game_clock.stop();
                self.game_clock
                    .reset(self.current_period().duration(&self.config));
                info!("{} Game clock reset", self.status_string());
            }
        }
        Ok(Vec::new())
    }

    pub fn can_start_shot_clock(&self) -> Result<()> {
        if self.shot_clock.in_violation() {
            Err(GameManagerError::IllegalTransition(
                "the shot clock is in violation, reset or stop it first",
            ))
        } else {
            Ok(())
        }
    }

    pub fn shot_clock_action(&mut self, action: ShotClockAction) -> Result<Vec<GameEvent>> {
        let mut events = Vec::new();
        match action {
            ShotClockAction::Start => {
                self.can_start_shot_clock()?;
                if self.shot_clock.start() {
                    info!("{} Starting the shot clock", self.status_string());
                }
            }
            ShotClockAction::Stop => {
                info!("{} Stopping the shot clock", self.status_string());
                self.shot_clock.stop();
            }
            ShotClockAction::Reset(length) => {
                self.shot_clock.reset(length);
                info!("{} Shot clock reset ({length:?})", self.status_string());
            }
            ShotClockAction::Violation => {
                if !self.shot_clock.force_violation() {
                    return Err(GameManagerError::IllegalTransition(
                        "the shot clock is already in violation",
                    ));
                }
                info!("{} Shot clock violation called", self.status_string());
                self.handle_violation(&mut events);
            }
        }
        Ok(events)
    }

    pub fn set_possession(&mut self, team: Team) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.change_possession(team, &mut events);
        events
    }

    pub fn increment_player_stat(
        &mut self,
        team: Team,
        player: u8,
        stat: StatKind,
    ) -> Result<Vec<GameEvent>> {
        self.teams[team].increment_player_stat(player, stat)?;
        info!(
            "{} {stat} for {team} player #{player}",
            self.status_string()
        );
        Ok(Vec::new())
    }

    pub fn quarter_action(&mut self, action: QuarterAction) -> Result<Vec<GameEvent>> {
        match action {
            QuarterAction::Next => self.next_quarter()?,
            QuarterAction::Previous => self.previous_quarter()?,
        }
        Ok(Vec::new())
    }

    fn next_quarter(&mut self) -> Result<()> {
        let next = self
            .current_period()
            .next_period(&self.config)
            .ok_or(GameManagerError::IllegalTransition(
                "the last period has been played",
            ))?;
        let quarter = self
            .quarter
            .checked_add(1)
            .ok_or(GameManagerError::IllegalTransition(
                "no more periods can be played",
            ))?;

        self.quarter = quarter;
        self.game_clock = Timer::new(next.duration(&self.config));
        self.shot_clock.reset(ResetLength::Full);
        self.shot_clock.stop();
        for team in all::<Team>() {
            self.teams[team].reset_period_fouls();
            if quarter == self.config.second_half_start() {
                self.teams[team].restore_timeouts(self.config.team_timeouts_per_half);
            }
        }
        info!("{} Entering {next}", self.status_string());
        Ok(())
    }

    fn previous_quarter(&mut self) -> Result<()> {
        if self.quarter <= 1 {
            return Err(GameManagerError::IllegalTransition(
                "already in the first quarter",
            ));
        }
        self.quarter -= 1;
        self.game_clock
            .set_capacity(self.current_period().duration(&self.config));
        info!(
            "{} Period corrected back to {}",
            self.status_string(),
            self.current_period()
        );
        Ok(())
    }

    pub fn add_player(&mut self, team: Team, player: u8, name: String) -> Result<Vec<GameEvent>> {
        info!(
            "{} Adding {name} as {team} player #{player}",
            self.status_string()
        );
        self.teams[team].add_player(player, name)?;
        Ok(Vec::new())
    }

    pub fn remove_player(&mut self, team: Team, player: u8) -> Result<Vec<GameEvent>> {
        let removed = self.teams[team].remove_player(player)?;
        info!(
            "{} Removed {} ({team} player #{player})",
            self.status_string(),
            removed.name
        );
        Ok(Vec::new())
    }

    pub fn substitute(
        &mut self,
        team: Team,
        player_in: u8,
        player_out: u8,
    ) -> Result<Vec<GameEvent>> {
        self.teams[team].substitute(player_in, player_out)?;
        info!(
            "{} {team} substitution, #{player_in} in for #{player_out}",
            self.status_string()
        );
        Ok(Vec::new())
    }

    pub fn reset_game(&mut self) -> Vec<GameEvent> {
        info!("{} Resetting Game", self.status_string());
        self.quarter = 1;
        self.game_clock = Timer::new(Period::Quarter(1).duration(&self.config));
        self.shot_clock = ShotClock::new(&self.config);
        self.possession = PossessionTracker::new(Team::Home);
        for team in all::<Team>() {
            self.teams[team].reset_for_new_game(self.config.team_timeouts_per_half);
        }
        Vec::new()
    }

    /// Any possession command leaves the shot clock full and dead until play resumes
    fn change_possession(&mut self, team: Team, events: &mut Vec<GameEvent>) {
        let from = self.possession.set_possession(team);
        self.shot_clock.reset(ResetLength::Full);
        self.shot_clock.stop();
        if from != team {
            info!("{} Possession to {team}", self.status_string());
            events.push(GameEvent::PossessionChanged { from, to: team });
        }
    }

    fn handle_violation(&mut self, events: &mut Vec<GameEvent>) {
        if self.game_clock.stop() {
            info!(
                "{} Stopping the game clock for the violation",
                self.status_string()
            );
        }
        events.push(GameEvent::ShotClockViolation {
            team: self.possession.possession(),
        });
    }

    fn transition(&self, events: Vec<GameEvent>) -> Transition {
        Transition {
            snapshot: self.generate_snapshot(),
            events,
        }
    }

    pub fn generate_snapshot(&self) -> GameSnapshot {
        trace!("Generating snapshot");
        GameSnapshot {
            quarter: self.quarter,
            game_clock: self.game_clock.as_snapshot(),
            shot_clock: self.shot_clock.as_snapshot(),
            teams: self.teams.map(ScoreBoard::as_snapshot),
            possession: self.possession.possession(),
        }
    }

    fn score_string(&self) -> String {
        self.teams.map(ScoreBoard::score).to_string()
    }

    fn status_string(&self) -> String {
        let time = self.game_clock.remaining().as_secs_f64();
        format!(
            "[{:02.0}:{:06.3} {} SC {:04.1}]",
            (time / 60.0).floor(),
            time % 60.0,
            self.current_period(),
            self.shot_clock.remaining().as_secs_f64()
        )
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum GameManagerError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("The {0} team has no more timeouts to use")]
    ExhaustedResource(Team),
    #[error("The {0} team has no player #{1}")]
    UnknownPlayer(Team, u8),
    #[error("Can't do that now, {0}")]
    IllegalTransition(&'static str),
}

pub type Result<T> = std::result::Result<T, GameManagerError>;
