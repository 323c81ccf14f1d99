//! Basic database query operations: one insert / get / update per entity.
//!
//! Natural-key inserts are get-or-create so migration replay is safe.
//! Reads return `Option` (absent row is an empty result, not an error);
//! updates return `Ok(false)` when the target row is absent, the silent
//! no-op convention used across the whole layer.

use super::{models::*, schema::UfcDatabase};
use crate::cli::types::{
    EventId, FighterId, FightId, FightOutcome, LineupId, ModelId, PredictionId, WeightClassId,
};
use crate::error::{Result, UfcError};
use chrono::NaiveDate;
use rusqlite::{params, Row};

impl UfcDatabase {
    // ---- fighters -------------------------------------------------------

    /// Resolve a fighter by name, creating the row when absent.
    pub fn get_or_create_fighter(
        &self,
        name: &str,
        attrs: &FighterAttrs,
    ) -> Result<Resolved<FighterId>> {
        if let Some(id) = self.get_fighter_id_by_name(name)? {
            return Ok(Resolved::Found(id));
        }

        self.conn.execute(
            "INSERT INTO fighters (name, height_cm, reach_cm, stance, date_of_birth)
             VALUES (?, ?, ?, ?, ?)",
            params![
                name,
                attrs.height_cm,
                attrs.reach_cm,
                attrs.stance,
                attrs.date_of_birth
            ],
        )?;
        Ok(Resolved::Created(FighterId::new(
            self.conn.last_insert_rowid(),
        )))
    }

    pub fn get_fighter_id_by_name(&self, name: &str) -> Result<Option<FighterId>> {
        let result = self.conn.query_row(
            "SELECT fighter_id FROM fighters WHERE name = ?",
            params![name],
            |row| row.get::<_, i64>(0),
        );

        match result {
            Ok(id) => Ok(Some(FighterId::new(id))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_fighter(&self, id: FighterId) -> Result<Option<Fighter>> {
        let result = self.conn.query_row(
            "SELECT fighter_id, name, height_cm, reach_cm, stance, date_of_birth
             FROM fighters WHERE fighter_id = ?",
            params![id.as_i64()],
            row_to_fighter,
        );

        match result {
            Ok(fighter) => Ok(Some(fighter)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Backfill attribute columns that are still NULL. Columns that already
    /// hold a value are left alone (attributes are corrected, not churned).
    /// Returns false when the fighter does not exist.
    pub fn update_fighter_attrs(&self, id: FighterId, attrs: &FighterAttrs) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE fighters SET
                height_cm = COALESCE(height_cm, ?),
                reach_cm = COALESCE(reach_cm, ?),
                stance = COALESCE(stance, ?),
                date_of_birth = COALESCE(date_of_birth, ?)
             WHERE fighter_id = ?",
            params![
                attrs.height_cm,
                attrs.reach_cm,
                attrs.stance,
                attrs.date_of_birth,
                id.as_i64()
            ],
        )?;
        Ok(updated > 0)
    }

    pub fn get_all_fighters(&self) -> Result<Vec<Fighter>> {
        let mut stmt = self.conn.prepare(
            "SELECT fighter_id, name, height_cm, reach_cm, stance, date_of_birth
             FROM fighters ORDER BY name",
        )?;

        let rows = stmt.query_map([], row_to_fighter)?;
        let mut fighters = Vec::new();
        for row in rows {
            fighters.push(row?);
        }
        Ok(fighters)
    }

    // ---- events ---------------------------------------------------------

    /// Resolve an event by its (name, date) natural key, creating it when
    /// absent.
    pub fn get_or_create_event(
        &self,
        name: &str,
        event_date: NaiveDate,
        location: Option<&str>,
    ) -> Result<Resolved<EventId>> {
        if let Some(event) = self.get_event_by_natural_key(name, event_date)? {
            return Ok(Resolved::Found(event.event_id));
        }

        self.conn.execute(
            "INSERT INTO events (name, event_date, location) VALUES (?, ?, ?)",
            params![name, event_date, location],
        )?;
        Ok(Resolved::Created(EventId::new(self.conn.last_insert_rowid())))
    }

    pub fn get_event_by_natural_key(
        &self,
        name: &str,
        event_date: NaiveDate,
    ) -> Result<Option<Event>> {
        let result = self.conn.query_row(
            "SELECT event_id, name, event_date, location
             FROM events WHERE name = ? AND event_date = ?",
            params![name, event_date],
            row_to_event,
        );

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Backfill an event's location when it is still NULL (odds-only scrapes
    /// create events without one). Returns false when the event is absent.
    pub fn update_event_location(&self, id: EventId, location: &str) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE events SET location = COALESCE(location, ?) WHERE event_id = ?",
            params![location, id.as_i64()],
        )?;
        Ok(updated > 0)
    }

    pub fn get_event(&self, id: EventId) -> Result<Option<Event>> {
        let result = self.conn.query_row(
            "SELECT event_id, name, event_date, location FROM events WHERE event_id = ?",
            params![id.as_i64()],
            row_to_event,
        );

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ---- weight classes -------------------------------------------------

    /// Resolve a weight class by name, creating a bare row when absent
    /// (scraped division names outside the seeded set still resolve).
    pub fn get_or_create_weight_class(&self, name: &str) -> Result<Resolved<WeightClassId>> {
        if let Some(id) = self.get_weight_class_id_by_name(name)? {
            return Ok(Resolved::Found(id));
        }

        self.conn.execute(
            "INSERT INTO weight_classes (name, gender) VALUES (?, 'male')",
            params![name],
        )?;
        Ok(Resolved::Created(WeightClassId::new(
            self.conn.last_insert_rowid(),
        )))
    }

    pub fn get_weight_class_id_by_name(&self, name: &str) -> Result<Option<WeightClassId>> {
        let result = self.conn.query_row(
            "SELECT weight_class_id FROM weight_classes WHERE name = ?",
            params![name],
            |row| row.get::<_, i64>(0),
        );

        match result {
            Ok(id) => Ok(Some(WeightClassId::new(id))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ---- fights ---------------------------------------------------------

    /// Insert a fight. The two corners must be different fighters.
    pub fn insert_fight(&self, fight: &NewFight) -> Result<FightId> {
        if fight.fighter1_id == fight.fighter2_id {
            return Err(UfcError::InputFormat(format!(
                "fight pairs fighter {} against themselves",
                fight.fighter1_id
            )));
        }

        self.conn.execute(
            "INSERT INTO fights
                (event_id, fighter1_id, fighter2_id, weight_class_id,
                 outcome, method, round, time, referee)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                fight.event_id.as_i64(),
                fight.fighter1_id.as_i64(),
                fight.fighter2_id.as_i64(),
                fight.weight_class_id.map(|id| id.as_i64()),
                fight.outcome.map(|o| o.as_str()),
                fight.method,
                fight.round,
                fight.time,
                fight.referee
            ],
        )?;
        Ok(FightId::new(self.conn.last_insert_rowid()))
    }

    /// Find a fight by event and pairing, ignoring corner order. This is the
    /// natural key the migrator dedupes on.
    pub fn find_fight(
        &self,
        event_id: EventId,
        fighter_a: FighterId,
        fighter_b: FighterId,
    ) -> Result<Option<FightId>> {
        let result = self.conn.query_row(
            "SELECT fight_id FROM fights
             WHERE event_id = ?1
               AND ((fighter1_id = ?2 AND fighter2_id = ?3)
                 OR (fighter1_id = ?3 AND fighter2_id = ?2))",
            params![event_id.as_i64(), fighter_a.as_i64(), fighter_b.as_i64()],
            |row| row.get::<_, i64>(0),
        );

        match result {
            Ok(id) => Ok(Some(FightId::new(id))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_fight(&self, id: FightId) -> Result<Option<Fight>> {
        let result = self.conn.query_row(
            "SELECT fight_id, event_id, fighter1_id, fighter2_id, weight_class_id,
                    outcome, method, round, time, referee
             FROM fights WHERE fight_id = ?",
            params![id.as_i64()],
            row_to_fight,
        );

        match result {
            Ok(fight) => Ok(Some(fight)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_fights_for_event(&self, event_id: EventId) -> Result<Vec<Fight>> {
        let mut stmt = self.conn.prepare(
            "SELECT fight_id, event_id, fighter1_id, fighter2_id, weight_class_id,
                    outcome, method, round, time, referee
             FROM fights WHERE event_id = ? ORDER BY fight_id",
        )?;

        let rows = stmt.query_map(params![event_id.as_i64()], row_to_fight)?;
        let mut fights = Vec::new();
        for row in rows {
            fights.push(row?);
        }
        Ok(fights)
    }

    /// Record the result of a fight that has none yet. Returns false when
    /// the fight is absent or its outcome is already set (results are
    /// written once).
    pub fn record_fight_result(
        &self,
        id: FightId,
        outcome: FightOutcome,
        method: Option<&str>,
        round: Option<u32>,
        time: Option<&str>,
    ) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE fights SET
                outcome = ?,
                method = COALESCE(?, method),
                round = COALESCE(?, round),
                time = COALESCE(?, time)
             WHERE fight_id = ? AND outcome IS NULL",
            params![outcome.as_str(), method, round, time, id.as_i64()],
        )?;
        Ok(updated > 0)
    }

    /// Backfill fight columns that are still NULL: the division and referee,
    /// which odds-only rows never carry. Columns that already hold a value
    /// are left alone. Returns false when the fight does not exist.
    pub fn update_fight_details(
        &self,
        id: FightId,
        weight_class_id: Option<WeightClassId>,
        referee: Option<&str>,
    ) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE fights SET
                weight_class_id = COALESCE(weight_class_id, ?),
                referee = COALESCE(referee, ?)
             WHERE fight_id = ?",
            params![
                weight_class_id.map(|wc| wc.as_i64()),
                referee,
                id.as_i64()
            ],
        )?;
        Ok(updated > 0)
    }

    // ---- fighter stats --------------------------------------------------

    /// Insert a performance snapshot. Snapshots are immutable: a second
    /// write for the same (fight, fighter) pair is ignored and returns None.
    pub fn insert_fighter_stat(&self, stat: &NewFighterStat) -> Result<Option<i64>> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO fighter_stats
                (fight_id, fighter_id, sig_strikes_landed, sig_strikes_attempted,
                 takedowns, knockdowns, control_time_seconds)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                stat.fight_id.as_i64(),
                stat.fighter_id.as_i64(),
                stat.sig_strikes_landed,
                stat.sig_strikes_attempted,
                stat.takedowns,
                stat.knockdowns,
                stat.control_time_seconds
            ],
        )?;
        Ok((inserted > 0).then(|| self.conn.last_insert_rowid()))
    }

    // ---- betting odds ---------------------------------------------------

    /// Insert a price point. Rows identical in every recorded field are
    /// skipped (returns None) so replaying a CSV or re-importing an export
    /// adds nothing; distinct bookmaker/time rows for the same fight are
    /// kept.
    pub fn insert_betting_odds(&self, odds: &NewBettingOdds) -> Result<Option<i64>> {
        let existing = self.conn.query_row(
            "SELECT odds_id FROM betting_odds
             WHERE fight_id = ? AND favourite_fighter_id = ? AND bookmaker = ?
               AND favourite_odds = ? AND underdog_odds = ?
               AND COALESCE(odds_date, '') = COALESCE(?, '')",
            params![
                odds.fight_id.as_i64(),
                odds.favourite_fighter_id.as_i64(),
                odds.bookmaker,
                odds.favourite_odds,
                odds.underdog_odds,
                odds.odds_date
            ],
            |row| row.get::<_, i64>(0),
        );

        match existing {
            Ok(_) => return Ok(None),
            Err(rusqlite::Error::QueryReturnedNoRows) => {}
            Err(e) => return Err(e.into()),
        }

        self.conn.execute(
            "INSERT INTO betting_odds
                (fight_id, favourite_fighter_id, bookmaker, favourite_odds,
                 underdog_odds, odds_date, source_link)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                odds.fight_id.as_i64(),
                odds.favourite_fighter_id.as_i64(),
                odds.bookmaker,
                odds.favourite_odds,
                odds.underdog_odds,
                odds.odds_date,
                odds.source_link
            ],
        )?;
        Ok(Some(self.conn.last_insert_rowid()))
    }

    pub fn get_odds_for_fight(&self, fight_id: FightId) -> Result<Vec<BettingOdds>> {
        let mut stmt = self.conn.prepare(
            "SELECT odds_id, fight_id, favourite_fighter_id, bookmaker,
                    favourite_odds, underdog_odds, odds_date, source_link
             FROM betting_odds WHERE fight_id = ? ORDER BY odds_id",
        )?;

        let rows = stmt.query_map(params![fight_id.as_i64()], |row| {
            Ok(BettingOdds {
                odds_id: row.get(0)?,
                fight_id: FightId::new(row.get(1)?),
                favourite_fighter_id: FighterId::new(row.get(2)?),
                bookmaker: row.get(3)?,
                favourite_odds: row.get(4)?,
                underdog_odds: row.get(5)?,
                odds_date: row.get(6)?,
                source_link: row.get(7)?,
            })
        })?;

        let mut odds = Vec::new();
        for row in rows {
            odds.push(row?);
        }
        Ok(odds)
    }

    // ---- prediction models ----------------------------------------------

    /// Resolve a model by (name, version), registering it when absent.
    pub fn get_or_create_model(
        &self,
        name: &str,
        version: &str,
        config: &ModelConfig,
    ) -> Result<Resolved<ModelId>> {
        let existing = self.conn.query_row(
            "SELECT model_id FROM prediction_models WHERE name = ? AND version = ?",
            params![name, version],
            |row| row.get::<_, i64>(0),
        );

        match existing {
            Ok(id) => return Ok(Resolved::Found(ModelId::new(id))),
            Err(rusqlite::Error::QueryReturnedNoRows) => {}
            Err(e) => return Err(e.into()),
        }

        let config_json = serde_json::to_string(config)?;
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO prediction_models (name, version, config, created_at)
             VALUES (?, ?, ?, ?)",
            params![name, version, config_json, created_at],
        )?;
        Ok(Resolved::Created(ModelId::new(self.conn.last_insert_rowid())))
    }

    pub fn get_model(&self, id: ModelId) -> Result<Option<PredictionModel>> {
        let result = self.conn.query_row(
            "SELECT model_id, name, version, config, created_at
             FROM prediction_models WHERE model_id = ?",
            params![id.as_i64()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        );

        let (model_id, name, version, config_json, created_at) = match result {
            Ok(fields) => fields,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let config = match config_json {
            Some(json) => serde_json::from_str(&json)?,
            None => ModelConfig::default(),
        };

        Ok(Some(PredictionModel {
            model_id: ModelId::new(model_id),
            name,
            version,
            config,
            created_at,
        }))
    }

    // ---- predictions ----------------------------------------------------

    pub fn insert_prediction(&self, prediction: &NewPrediction) -> Result<PredictionId> {
        self.conn.execute(
            "INSERT INTO predictions (model_id, fight_id, predicted_outcome, confidence)
             VALUES (?, ?, ?, ?)",
            params![
                prediction.model_id.as_i64(),
                prediction.fight_id.as_i64(),
                prediction.predicted_outcome.as_str(),
                prediction.confidence
            ],
        )?;
        Ok(PredictionId::new(self.conn.last_insert_rowid()))
    }

    /// Fill in a prediction's actual outcome. This column is written exactly
    /// once: a second call (or an absent prediction) returns false.
    pub fn record_actual_outcome(
        &self,
        id: PredictionId,
        outcome: FightOutcome,
    ) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE predictions SET actual_outcome = ?
             WHERE prediction_id = ? AND actual_outcome IS NULL",
            params![outcome.as_str(), id.as_i64()],
        )?;
        Ok(updated > 0)
    }

    pub fn get_predictions_for_model(&self, model_id: ModelId) -> Result<Vec<Prediction>> {
        let mut stmt = self.conn.prepare(
            "SELECT prediction_id, model_id, fight_id, predicted_outcome,
                    confidence, actual_outcome
             FROM predictions WHERE model_id = ? ORDER BY prediction_id",
        )?;

        let rows = stmt.query_map(params![model_id.as_i64()], |row| {
            let predicted: String = row.get(3)?;
            let predicted_outcome =
                FightOutcome::from_db(Some(predicted.clone())).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        format!("invalid stored outcome: {predicted}").into(),
                    )
                })?;
            Ok(Prediction {
                prediction_id: PredictionId::new(row.get(0)?),
                model_id: ModelId::new(row.get(1)?),
                fight_id: FightId::new(row.get(2)?),
                predicted_outcome,
                confidence: row.get(4)?,
                actual_outcome: FightOutcome::from_db(row.get(5)?),
            })
        })?;

        let mut predictions = Vec::new();
        for row in rows {
            predictions.push(row?);
        }
        Ok(predictions)
    }

    // ---- lineups ----------------------------------------------------------

    /// Insert a lineup and its fighter slots atomically. Any failure (an
    /// unknown fighter id included) rolls the whole lineup back.
    pub fn insert_lineup(
        &mut self,
        lineup: &NewLineup,
        fighters: &[NewLineupFighter],
    ) -> Result<LineupId> {
        let total_projected: Option<f64> = fighters
            .iter()
            .map(|f| f.projected_points)
            .sum::<Option<f64>>();
        let created_at = chrono::Utc::now().to_rfc3339();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO draftkings_lineups
                (event_id, name, salary_cap, total_projected_points, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                lineup.event_id.as_i64(),
                lineup.name,
                lineup.salary_cap,
                total_projected,
                created_at
            ],
        )?;
        let lineup_id = tx.last_insert_rowid();

        for fighter in fighters {
            tx.execute(
                "INSERT INTO lineup_fighters (lineup_id, fighter_id, salary, projected_points)
                 VALUES (?, ?, ?, ?)",
                params![
                    lineup_id,
                    fighter.fighter_id.as_i64(),
                    fighter.salary,
                    fighter.projected_points
                ],
            )?;
        }

        tx.commit()?;
        Ok(LineupId::new(lineup_id))
    }

    pub fn get_lineup(&self, id: LineupId) -> Result<Option<(Lineup, Vec<LineupFighter>)>> {
        let result = self.conn.query_row(
            "SELECT lineup_id, event_id, name, salary_cap,
                    total_projected_points, total_actual_points, created_at
             FROM draftkings_lineups WHERE lineup_id = ?",
            params![id.as_i64()],
            |row| {
                Ok(Lineup {
                    lineup_id: LineupId::new(row.get(0)?),
                    event_id: EventId::new(row.get(1)?),
                    name: row.get(2)?,
                    salary_cap: row.get(3)?,
                    total_projected_points: row.get(4)?,
                    total_actual_points: row.get(5)?,
                    created_at: row.get(6)?,
                })
            },
        );

        let lineup = match result {
            Ok(lineup) => lineup,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut stmt = self.conn.prepare(
            "SELECT fighter_id, salary, projected_points, actual_points
             FROM lineup_fighters WHERE lineup_id = ? ORDER BY salary DESC",
        )?;
        let rows = stmt.query_map(params![id.as_i64()], |row| {
            Ok(LineupFighter {
                fighter_id: FighterId::new(row.get(0)?),
                salary: row.get(1)?,
                projected_points: row.get(2)?,
                actual_points: row.get(3)?,
            })
        })?;

        let mut fighters = Vec::new();
        for row in rows {
            fighters.push(row?);
        }
        Ok(Some((lineup, fighters)))
    }

    /// Backfill actual points for lineup slots and refresh the lineup total,
    /// in one transaction. Returns false when nothing matched.
    pub fn update_lineup_actuals(
        &mut self,
        id: LineupId,
        actuals: &[(FighterId, f64)],
    ) -> Result<bool> {
        let tx = self.conn.transaction()?;

        let mut touched = false;
        for (fighter_id, points) in actuals {
            let updated = tx.execute(
                "UPDATE lineup_fighters SET actual_points = ?
                 WHERE lineup_id = ? AND fighter_id = ?",
                params![points, id.as_i64(), fighter_id.as_i64()],
            )?;
            touched |= updated > 0;
        }

        if touched {
            tx.execute(
                "UPDATE draftkings_lineups SET total_actual_points =
                    (SELECT SUM(actual_points) FROM lineup_fighters WHERE lineup_id = ?1)
                 WHERE lineup_id = ?1",
                params![id.as_i64()],
            )?;
        }

        tx.commit()?;
        Ok(touched)
    }
}

fn row_to_fighter(row: &Row) -> rusqlite::Result<Fighter> {
    Ok(Fighter {
        fighter_id: FighterId::new(row.get(0)?),
        name: row.get(1)?,
        height_cm: row.get(2)?,
        reach_cm: row.get(3)?,
        stance: row.get(4)?,
        date_of_birth: row.get(5)?,
    })
}

fn row_to_event(row: &Row) -> rusqlite::Result<Event> {
    Ok(Event {
        event_id: EventId::new(row.get(0)?),
        name: row.get(1)?,
        event_date: row.get(2)?,
        location: row.get(3)?,
    })
}

fn row_to_fight(row: &Row) -> rusqlite::Result<Fight> {
    Ok(Fight {
        fight_id: FightId::new(row.get(0)?),
        event_id: EventId::new(row.get(1)?),
        fighter1_id: FighterId::new(row.get(2)?),
        fighter2_id: FighterId::new(row.get(3)?),
        weight_class_id: row.get::<_, Option<i64>>(4)?.map(WeightClassId::new),
        outcome: FightOutcome::from_db(row.get(5)?),
        method: row.get(6)?,
        round: row.get(7)?,
        time: row.get(8)?,
        referee: row.get(9)?,
    })
}
