use crate::team::Team;
use core::ops::{Index, IndexMut};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One value per team, addressable with `bundle[Team::Home]`
#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeAwayBundle<T> {
    pub home: T,
    pub away: T,
}

impl<T> HomeAwayBundle<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> HomeAwayBundle<U> {
        HomeAwayBundle {
            home: f(&self.home),
            away: f(&self.away),
        }
    }
}

impl<T> Index<Team> for HomeAwayBundle<T> {
    type Output = T;

    fn index(&self, team: Team) -> &Self::Output {
        match team {
            Team::Home => &self.home,
            Team::Away => &self.away,
        }
    }
}

impl<T> IndexMut<Team> for HomeAwayBundle<T> {
    fn index_mut(&mut self, team: Team) -> &mut Self::Output {
        match team {
            Team::Home => &mut self.home,
            Team::Away => &mut self.away,
        }
    }
}

impl<T: Display> Display for HomeAwayBundle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Home: {}, Away: {}", self.home, self.away)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_index() {
        let mut bundle = HomeAwayBundle::new(3u16, 7u16);
        assert_eq!(bundle[Team::Home], 3);
        assert_eq!(bundle[Team::Away], 7);
        bundle[Team::Away] += 2;
        assert_eq!(bundle.away, 9);
    }

    #[test]
    fn test_map() {
        let bundle = HomeAwayBundle::new("Hawks", "Owls");
        let lens = bundle.map(|name| name.len());
        assert_eq!(lens, HomeAwayBundle::new(5, 4));
        assert_eq!(format!("{lens}"), "Home: 5, Away: 4");
    }
}
