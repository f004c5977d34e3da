use crate::{bundles::HomeAwayBundle, config::Game, team::Team};
use core::time::Duration;
use derivative::Derivative;
use enum_derive_2018::EnumDisplay;
use enum_iterator::Sequence;
use indexmap::IndexMap;
use macro_attr_2018::macro_attr;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub quarter: u8,
    pub game_clock: TimerSnapshot,
    pub shot_clock: ShotClockSnapshot,
    pub teams: HomeAwayBundle<TeamSnapshot>,
    pub possession: Team,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub remaining: Duration,
    pub running: bool,
    pub capacity: Duration,
}

/// Formats like a scoreboard face: `M:SS` above one minute, `SS.t` below it
impl core::fmt::Display for TimerSnapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let secs = self.remaining.as_secs();
        if secs >= 60 {
            write!(f, "{}:{:02}", secs / 60, secs % 60)
        } else {
            write!(f, "{}.{}", secs, self.remaining.subsec_millis() / 100)
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct ShotClockSnapshot {
    pub remaining: Duration,
    pub running: bool,
    pub capacity: Duration,
    pub violation: bool,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub name: String,
    pub score: u16,
    pub fouls: u16,
    pub technical_fouls: u16,
    pub timeouts_left: u16,
    pub in_bonus: bool,
    pub players: IndexMap<u8, PlayerStats>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct PlayerStats {
    pub name: String,
    pub points: u16,
    pub fouls: u16,
    pub assists: u16,
    pub rebounds: u16,
    pub steals: u16,
    pub blocks: u16,
    #[derivative(Default(value = "true"))]
    pub in_game: bool,
}

impl PlayerStats {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn increment(&mut self, stat: StatKind) {
        let counter = match stat {
            StatKind::Points => &mut self.points,
            StatKind::Fouls => &mut self.fouls,
            StatKind::Assists => &mut self.assists,
            StatKind::Rebounds => &mut self.rebounds,
            StatKind::Steals => &mut self.steals,
            StatKind::Blocks => &mut self.blocks,
        };
        *counter = counter.saturating_add(1);
    }

    /// Zeroes every counter, keeping the name and court status
    pub fn clear_counters(&mut self) {
        *self = Self {
            name: core::mem::take(&mut self.name),
            in_game: self.in_game,
            ..Default::default()
        };
    }
}

macro_attr! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Sequence, EnumDisplay!)]
    #[serde(rename_all = "snake_case")]
    pub enum StatKind {
        Points,
        Fouls,
        Assists,
        Rebounds,
        Steals,
        Blocks,
    }
}

/// A regulation quarter or an overtime period, both numbered from 1
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Period {
    Quarter(u8),
    Overtime(u8),
}

impl Period {
    /// `quarter` is the running period count shown on the board, overtime continues after the
    /// last regulation quarter
    pub fn from_quarter(quarter: u8, config: &Game) -> Self {
        if quarter <= config.num_quarters {
            Self::Quarter(quarter)
        } else {
            Self::Overtime(quarter - config.num_quarters)
        }
    }

    pub fn duration(self, config: &Game) -> Duration {
        match self {
            Self::Quarter(_) => Duration::from_secs(config.quarter_play_duration.into()),
            Self::Overtime(_) => Duration::from_secs(config.ot_play_duration.into()),
        }
    }

    pub fn next_period(self, config: &Game) -> Option<Period> {
        match self {
            Self::Quarter(q) if q < config.num_quarters => Some(Self::Quarter(q + 1)),
            Self::Quarter(_) if config.has_overtime => Some(Self::Overtime(1)),
            Self::Quarter(_) => None,
            Self::Overtime(n) => Some(Self::Overtime(n.checked_add(1)?)),
        }
    }
}

impl core::fmt::Display for Period {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Period::Quarter(q) => write!(f, "Q{q}"),
            Period::Overtime(n) => write!(f, "OT{n}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use enum_iterator::all;

    #[test]
    fn test_timer_display() {
        let mut timer = TimerSnapshot {
            remaining: Duration::from_secs(720),
            running: false,
            capacity: Duration::from_secs(720),
        };
        assert_eq!(timer.to_string(), "12:00");
        timer.remaining = Duration::from_secs(65);
        assert_eq!(timer.to_string(), "1:05");
        timer.remaining = Duration::from_millis(59_950);
        assert_eq!(timer.to_string(), "59.9");
        timer.remaining = Duration::from_millis(4_230);
        assert_eq!(timer.to_string(), "4.2");
        timer.remaining = Duration::ZERO;
        assert_eq!(timer.to_string(), "0.0");
    }

    #[test]
    fn test_player_stats_increment() {
        let mut stats = PlayerStats::new("John Doe".to_string());
        assert!(stats.in_game);
        for stat in all::<StatKind>() {
            stats.increment(stat);
        }
        stats.increment(StatKind::Rebounds);
        assert_eq!(
            stats,
            PlayerStats {
                name: "John Doe".to_string(),
                points: 1,
                fouls: 1,
                assists: 1,
                rebounds: 2,
                steals: 1,
                blocks: 1,
                in_game: true,
            }
        );

        stats.in_game = false;
        stats.clear_counters();
        assert_eq!(
            stats,
            PlayerStats {
                name: "John Doe".to_string(),
                in_game: false,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_stat_kind_names() {
        assert_eq!(StatKind::Assists.to_string(), "Assists");
        assert_eq!(
            serde_json::from_str::<StatKind>(r#""rebounds""#).unwrap(),
            StatKind::Rebounds
        );
        assert!(serde_json::from_str::<StatKind>(r#""dunks""#).is_err());
    }

    #[test]
    fn test_period_from_quarter() {
        let config = Game::default();
        assert_eq!(Period::from_quarter(1, &config), Period::Quarter(1));
        assert_eq!(Period::from_quarter(4, &config), Period::Quarter(4));
        assert_eq!(Period::from_quarter(5, &config), Period::Overtime(1));
        assert_eq!(Period::from_quarter(7, &config), Period::Overtime(3));
        assert_eq!(Period::Overtime(2).to_string(), "OT2");
        assert_eq!(Period::Quarter(3).to_string(), "Q3");
    }

    #[test]
    fn test_period_duration() {
        let config = Game {
            quarter_play_duration: 600,
            ot_play_duration: 120,
            ..Default::default()
        };
        assert_eq!(
            Period::Quarter(2).duration(&config),
            Duration::from_secs(600)
        );
        assert_eq!(
            Period::Overtime(1).duration(&config),
            Duration::from_secs(120)
        );
    }

    #[test]
    fn test_next_period() {
        let config = Game::default();
        assert_eq!(
            Period::Quarter(1).next_period(&config),
            Some(Period::Quarter(2))
        );
        assert_eq!(
            Period::Quarter(4).next_period(&config),
            Some(Period::Overtime(1))
        );
        assert_eq!(
            Period::Overtime(1).next_period(&config),
            Some(Period::Overtime(2))
        );

        let no_ot = Game {
            has_overtime: false,
            ..Default::default()
        };
        assert_eq!(Period::Quarter(4).next_period(&no_ot), None);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut home = TeamSnapshot {
            name: "Home Team".to_string(),
            ..Default::default()
        };
        home.players
            .insert(11, PlayerStats::new("John Doe".to_string()));
        let snapshot = GameSnapshot {
            quarter: 1,
            game_clock: TimerSnapshot::default(),
            shot_clock: ShotClockSnapshot::default(),
            teams: HomeAwayBundle::new(
                home,
                TeamSnapshot {
                    name: "Away Team".to_string(),
                    ..Default::default()
                },
            ),
            possession: Team::Home,
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["teams"]["home"]["name"], "Home Team");
        assert_eq!(value["teams"]["away"]["name"], "Away Team");
        assert_eq!(value["teams"]["home"]["players"]["11"]["name"], "John Doe");
        assert_eq!(value["possession"], "home");

        let back: GameSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snapshot);
    }
}
