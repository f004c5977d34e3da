use super::{GameManagerError, Result, shot_clock::ResetLength};
use scoreboard_common::{game_snapshot::StatKind, team::Team};
use serde::{Deserialize, Serialize};

/// Everything an operator can ask of the game. On the wire each command is a JSON object tagged
/// by `kind`, e.g. `{"kind": "score", "team": "home", "points": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Score {
        team: Team,
        points: i8,
    },
    Foul {
        team: Team,
    },
    TechnicalFoul {
        team: Team,
    },
    Timeout {
        team: Team,
    },
    Clock {
        action: ClockAction,
    },
    ShotClock {
        action: ShotClockAction,
    },
    Possession {
        team: Team,
    },
    PlayerStat {
        team: Team,
        player: u8,
        stat: StatKind,
    },
    Quarter {
        action: QuarterAction,
    },
    AddPlayer {
        team: Team,
        player: u8,
        name: String,
    },
    RemovePlayer {
        team: Team,
        player: u8,
    },
    Substitution {
        team: Team,
        player_in: u8,
        player_out: u8,
    },
    ResetGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
    Start,
    Stop,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotClockAction {
    Start,
    Stop,
    Reset(ResetLength),
    Violation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarterAction {
    Next,
    Previous,
}

impl Command {
    /// Unknown teams, stat names, actions or missing fields all map to
    /// [`GameManagerError::InvalidCommand`]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GameManagerError::InvalidCommand(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        assert_eq!(
            Command::from_json(r#"{"kind": "score", "team": "home", "points": 3}"#),
            Ok(Command::Score {
                team: Team::Home,
                points: 3
            })
        );
        assert_eq!(
            Command::from_json(r#"{"kind": "shot_clock", "action": {"reset": "partial"}}"#),
            Ok(Command::ShotClock {
                action: ShotClockAction::Reset(ResetLength::Partial)
            })
        );
        assert_eq!(
            Command::from_json(r#"{"kind": "shot_clock", "action": "violation"}"#),
            Ok(Command::ShotClock {
                action: ShotClockAction::Violation
            })
        );
        assert_eq!(
            Command::from_json(r#"{"kind": "clock", "action": "reset"}"#),
            Ok(Command::Clock {
                action: ClockAction::Reset
            })
        );
        assert_eq!(
            Command::from_json(
                r#"{"kind": "player_stat", "team": "away", "player": 11, "stat": "steals"}"#
            ),
            Ok(Command::PlayerStat {
                team: Team::Away,
                player: 11,
                stat: StatKind::Steals
            })
        );
        assert_eq!(
            Command::from_json(r#"{"kind": "reset_game"}"#),
            Ok(Command::ResetGame)
        );
    }

    #[test]
    fn test_malformed_commands() {
        for json in [
            r#"{"kind": "score", "team": "visitors", "points": 2}"#,
            r#"{"kind": "player_stat", "team": "home", "player": 11, "stat": "dunks"}"#,
            r#"{"kind": "score", "team": "home"}"#,
            r#"{"kind": "jump_ball"}"#,
            r#"{"kind": "clock", "action": "pause"}"#,
            r#"{"kind": "player_stat", "team": "home", "player": 300, "stat": "blocks"}"#,
            "not json",
        ] {
            assert!(
                matches!(
                    Command::from_json(json),
                    Err(GameManagerError::InvalidCommand(_))
                ),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_round_trip() {
        let command = Command::Substitution {
            team: Team::Away,
            player_in: 4,
            player_out: 12,
        };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(Command::from_json(&json), Ok(command));
    }
}
