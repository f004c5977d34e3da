use scoreboard_common::team::Team;
use serde::{Deserialize, Serialize};

/// Side effects of a command or tick that presentation layers react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// `team` held the ball when the shot clock ran out and turns it over
    ShotClockViolation { team: Team },
    PossessionChanged { from: Team, to: Team },
    BonusEntered { team: Team },
    TimeoutCalled { team: Team, remaining: u16 },
    GameClockExpired { quarter: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ShotClockViolation,
    PossessionChanged,
    BonusEntered,
    TimeoutCalled,
    GameClockExpired,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ShotClockViolation { .. } => EventKind::ShotClockViolation,
            Self::PossessionChanged { .. } => EventKind::PossessionChanged,
            Self::BonusEntered { .. } => EventKind::BonusEntered,
            Self::TimeoutCalled { .. } => EventKind::TimeoutCalled,
            Self::GameClockExpired { .. } => EventKind::GameClockExpired,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_json_shape() {
        let event = GameEvent::PossessionChanged {
            from: Team::Home,
            to: Team::Away,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"possession_changed","from":"home","to":"away"}"#
        );
        assert_eq!(event.kind(), EventKind::PossessionChanged);
    }
}
