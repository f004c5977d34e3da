use derivative::Derivative;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};

#[derive(Derivative, Serialize, Deserialize, Sequence)]
#[derivative(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[derivative(Default)]
    Home,
    Away,
}

impl Team {
    pub fn other(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

impl core::fmt::Display for Team {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Self::Home => write!(f, "Home"),
            Self::Away => write!(f, "Away"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use enum_iterator::all;

    #[test]
    fn test_other() {
        assert_eq!(Team::Home.other(), Team::Away);
        assert_eq!(Team::Away.other(), Team::Home);
        for team in all::<Team>() {
            assert_eq!(team.other().other(), team);
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Team::Home).unwrap(), r#""home""#);
        assert_eq!(
            serde_json::from_str::<Team>(r#""away""#).unwrap(),
            Team::Away
        );
        assert!(serde_json::from_str::<Team>(r#""visitors""#).is_err());
    }
}
