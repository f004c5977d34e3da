use scoreboard_common::team::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PossessionTracker {
    team: Team,
}

impl PossessionTracker {
    pub fn new(team: Team) -> Self {
        Self { team }
    }

    pub fn possession(&self) -> Team {
        self.team
    }

    /// Always succeeds, returns the team that held the ball before
    pub fn set_possession(&mut self, team: Team) -> Team {
        core::mem::replace(&mut self.team, team)
    }
}
