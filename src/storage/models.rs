//! Data models for the storage layer.

use crate::cli::types::{
    EventId, FighterId, FightId, FightOutcome, LineupId, ModelId, PredictionId, WeightClassId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of a natural-key resolution: the row either already existed or
/// was created by this call. Callers that need replay detection (the
/// migrator's created-counters, mostly) branch on it; everyone else calls
/// [`id`](Resolved::id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<T> {
    Found(T),
    Created(T),
}

impl<T: Copy> Resolved<T> {
    pub fn id(&self) -> T {
        match self {
            Resolved::Found(id) | Resolved::Created(id) => *id,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Resolved::Created(_))
    }
}

/// A fighter, identified by unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub fighter_id: FighterId,
    pub name: String,
    pub height_cm: Option<f64>,
    pub reach_cm: Option<f64>,
    pub stance: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Physical attributes used when creating or backfilling a fighter row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FighterAttrs {
    pub height_cm: Option<f64>,
    pub reach_cm: Option<f64>,
    pub stance: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl FighterAttrs {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An event, identified by the (name, date) natural key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: EventId,
    pub name: String,
    pub event_date: NaiveDate,
    pub location: Option<String>,
}

/// Static weight-class reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightClass {
    pub weight_class_id: WeightClassId,
    pub name: String,
    pub weight_limit_lbs: Option<f64>,
    pub gender: String,
}

/// A fight between two fighters on one event card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fight {
    pub fight_id: FightId,
    pub event_id: EventId,
    pub fighter1_id: FighterId,
    pub fighter2_id: FighterId,
    pub weight_class_id: Option<WeightClassId>,
    pub outcome: Option<FightOutcome>,
    pub method: Option<String>,
    pub round: Option<u32>,
    pub time: Option<String>,
    pub referee: Option<String>,
}

/// Insert payload for a fight.
#[derive(Debug, Clone)]
pub struct NewFight {
    pub event_id: EventId,
    pub fighter1_id: FighterId,
    pub fighter2_id: FighterId,
    pub weight_class_id: Option<WeightClassId>,
    pub outcome: Option<FightOutcome>,
    pub method: Option<String>,
    pub round: Option<u32>,
    pub time: Option<String>,
    pub referee: Option<String>,
}

/// Point-in-time performance snapshot for one fighter in one fight.
/// Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFighterStat {
    pub fight_id: FightId,
    pub fighter_id: FighterId,
    pub sig_strikes_landed: Option<u32>,
    pub sig_strikes_attempted: Option<u32>,
    pub takedowns: Option<u32>,
    pub knockdowns: Option<u32>,
    pub control_time_seconds: Option<u32>,
}

/// One bookmaker/time price point for a fight. Multiple rows per fight are
/// allowed; exact duplicates are skipped on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingOdds {
    pub odds_id: i64,
    pub fight_id: FightId,
    pub favourite_fighter_id: FighterId,
    pub bookmaker: String,
    pub favourite_odds: f64,
    pub underdog_odds: f64,
    pub odds_date: Option<String>,
    pub source_link: Option<String>,
}

/// Insert payload for a betting-odds row.
#[derive(Debug, Clone)]
pub struct NewBettingOdds {
    pub fight_id: FightId,
    pub favourite_fighter_id: FighterId,
    pub bookmaker: String,
    pub favourite_odds: f64,
    pub underdog_odds: f64,
    pub odds_date: Option<String>,
    pub source_link: Option<String>,
}

/// Configuration stored with a prediction model.
///
/// All fields are optional; unknown keys are rejected on load so a typo in a
/// hyperparameter name fails loudly instead of being silently accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Name of the feature set the model was trained on.
    pub feature_set: Option<String>,
    /// Learning rate, for gradient-based models.
    pub learning_rate: Option<f64>,
    /// Number of estimators, for ensemble models.
    pub n_estimators: Option<u32>,
    /// Fights on or after this date were excluded from training.
    pub train_cutoff: Option<NaiveDate>,
    /// Free-form operator notes.
    pub notes: Option<String>,
}

/// Metadata for one registered prediction model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionModel {
    pub model_id: ModelId,
    pub name: String,
    pub version: String,
    pub config: ModelConfig,
    pub created_at: String,
}

/// A model's call on one fight. `actual_outcome` is backfilled exactly once
/// after the fight resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction_id: PredictionId,
    pub model_id: ModelId,
    pub fight_id: FightId,
    pub predicted_outcome: FightOutcome,
    pub confidence: f64,
    pub actual_outcome: Option<FightOutcome>,
}

/// Insert payload for a prediction.
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub model_id: ModelId,
    pub fight_id: FightId,
    pub predicted_outcome: FightOutcome,
    pub confidence: f64,
}

/// A DraftKings lineup for one event. Composition is fixed at creation;
/// actual points are backfilled after the card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lineup {
    pub lineup_id: LineupId,
    pub event_id: EventId,
    pub name: String,
    pub salary_cap: i64,
    pub total_projected_points: Option<f64>,
    pub total_actual_points: Option<f64>,
    pub created_at: String,
}

/// Insert payload for a lineup header.
#[derive(Debug, Clone)]
pub struct NewLineup {
    pub event_id: EventId,
    pub name: String,
    pub salary_cap: i64,
}

/// One fighter slot in a lineup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupFighter {
    pub fighter_id: FighterId,
    pub salary: i64,
    pub projected_points: Option<f64>,
    pub actual_points: Option<f64>,
}

/// Insert payload for a lineup slot.
#[derive(Debug, Clone)]
pub struct NewLineupFighter {
    pub fighter_id: FighterId,
    pub salary: i64,
    pub projected_points: Option<f64>,
}

/// Win/loss record for one fighter over completed fights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterRecord {
    pub fighter_id: FighterId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub no_contests: u32,
}

impl FighterRecord {
    pub fn total_fights(&self) -> u32 {
        self.wins + self.losses + self.draws + self.no_contests
    }

    /// Wins over completed fights; zero when no fights are recorded.
    pub fn win_rate(&self) -> f64 {
        let total = self.total_fights();
        if total == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(total)
        }
    }
}

/// One row in a rankings report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub fighter_id: FighterId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub total_fights: u32,
    pub win_rate: f64,
}

/// Head-to-head record between two fighters.
///
/// Swapping the arguments swaps the `a`/`b` fields and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadToHead {
    pub fighter_a_id: FighterId,
    pub fighter_a_name: String,
    pub fighter_b_id: FighterId,
    pub fighter_b_name: String,
    pub fighter_a_wins: u32,
    pub fighter_b_wins: u32,
    pub draws: u32,
    pub no_contests: u32,
    pub total_meetings: u32,
}

/// Full card report for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventReport {
    pub event: Event,
    pub fights: Vec<EventFightLine>,
}

/// One fight line in an event report, with the most recent favourite price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFightLine {
    pub fight_id: FightId,
    pub fighter1_name: String,
    pub fighter2_name: String,
    pub weight_class: Option<String>,
    pub outcome: Option<FightOutcome>,
    pub method: Option<String>,
    pub round: Option<u32>,
    pub favourite_name: Option<String>,
    pub favourite_odds: Option<f64>,
}

/// Feature vector for one fight, consumed by the prediction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionFeatures {
    pub fight_id: FightId,
    pub event_date: NaiveDate,
    pub weight_class: Option<String>,
    pub fighter1: FighterFeatures,
    pub fighter2: FighterFeatures,
}

/// Per-corner slice of [`PredictionFeatures`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterFeatures {
    pub fighter_id: FighterId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub height_cm: Option<f64>,
    pub reach_cm: Option<f64>,
    pub stance: Option<String>,
    pub avg_sig_strikes_landed: Option<f64>,
    pub avg_takedowns: Option<f64>,
    pub avg_knockdowns: Option<f64>,
    /// Most recent decimal price recorded for this fighter in this fight.
    pub latest_odds: Option<f64>,
}

/// Accuracy summary for one prediction model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAccuracy {
    pub model_id: ModelId,
    pub model_name: String,
    pub total_predictions: u32,
    /// Predictions whose fight has resolved.
    pub resolved: u32,
    pub correct: u32,
    /// `correct / resolved`; `None` until at least one prediction resolves.
    pub accuracy: Option<f64>,
    pub mean_confidence: Option<f64>,
}
