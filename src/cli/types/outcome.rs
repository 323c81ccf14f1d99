//! Fight outcome enumeration.

use crate::error::UfcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of a fight from the perspective of the stored corner order.
///
/// Persisted as lowercase text; the `fights.outcome` CHECK constraint admits
/// exactly these four values (or NULL for an unresolved fight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FightOutcome {
    Fighter1,
    Fighter2,
    Draw,
    NoContest,
}

impl FightOutcome {
    /// The value stored in the `outcome` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            FightOutcome::Fighter1 => "fighter1",
            FightOutcome::Fighter2 => "fighter2",
            FightOutcome::Draw => "draw",
            FightOutcome::NoContest => "no_contest",
        }
    }

    /// Parse a column value written by [`as_str`](Self::as_str).
    ///
    /// The schema CHECK constraint guarantees stored values parse; anything
    /// else maps to `None`.
    pub fn from_db(value: Option<String>) -> Option<Self> {
        value.and_then(|s| s.parse().ok())
    }

    /// The same outcome seen from the opposite corner order.
    pub fn swap_corners(self) -> Self {
        match self {
            FightOutcome::Fighter1 => FightOutcome::Fighter2,
            FightOutcome::Fighter2 => FightOutcome::Fighter1,
            other => other,
        }
    }
}

impl fmt::Display for FightOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FightOutcome {
    type Err = UfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fighter1" => Ok(FightOutcome::Fighter1),
            "fighter2" => Ok(FightOutcome::Fighter2),
            "draw" => Ok(FightOutcome::Draw),
            "no_contest" | "no contest" | "nc" => Ok(FightOutcome::NoContest),
            other => Err(UfcError::InputFormat(format!("invalid outcome: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_round_trip() {
        for outcome in [
            FightOutcome::Fighter1,
            FightOutcome::Fighter2,
            FightOutcome::Draw,
            FightOutcome::NoContest,
        ] {
            assert_eq!(outcome.as_str().parse::<FightOutcome>().unwrap(), outcome);
        }
    }

    #[test]
    fn test_swap_corners() {
        assert_eq!(FightOutcome::Fighter1.swap_corners(), FightOutcome::Fighter2);
        assert_eq!(FightOutcome::Fighter2.swap_corners(), FightOutcome::Fighter1);
        assert_eq!(FightOutcome::Draw.swap_corners(), FightOutcome::Draw);
        assert_eq!(
            FightOutcome::NoContest.swap_corners(),
            FightOutcome::NoContest
        );
    }

    #[test]
    fn test_outcome_aliases() {
        assert_eq!("NC".parse::<FightOutcome>().unwrap(), FightOutcome::NoContest);
        assert_eq!(
            "no contest".parse::<FightOutcome>().unwrap(),
            FightOutcome::NoContest
        );
        assert!("submission".parse::<FightOutcome>().is_err());
    }
}
