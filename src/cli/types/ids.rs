//! Surrogate-key id types for the UFC database.
//!
//! Every table hands out an `INTEGER PRIMARY KEY`; these newtypes keep the
//! different id spaces from being mixed up in function signatures.

use crate::error::UfcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! surrogate_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

surrogate_id!(
    /// Row id in `fighters`.
    FighterId
);
surrogate_id!(
    /// Row id in `events`.
    EventId
);
surrogate_id!(
    /// Row id in `weight_classes`.
    WeightClassId
);
surrogate_id!(
    /// Row id in `fights`.
    FightId
);
surrogate_id!(
    /// Row id in `prediction_models`.
    ModelId
);
surrogate_id!(
    /// Row id in `predictions`.
    PredictionId
);
surrogate_id!(
    /// Row id in `draftkings_lineups`.
    LineupId
);

// FromStr only where the CLI accepts the id as an argument.

impl FromStr for FightId {
    type Err = UfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .parse()
            .map_err(|_| UfcError::InputFormat(format!("invalid fight id: {s}")))?;
        Ok(Self(id))
    }
}

impl FromStr for ModelId {
    type Err = UfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .parse()
            .map_err(|_| UfcError::InputFormat(format!("invalid model id: {s}")))?;
        Ok(Self(id))
    }
}
