//! Read-only analytics queries: rankings, head-to-head, event reports,
//! prediction features and model accuracy.
//!
//! "No data" is an empty or zero result, never an error; only a genuinely
//! unknown id or name raises `NotFound`.

use super::{models::*, schema::UfcDatabase};
use crate::cli::types::{EventId, FighterId, FightId, FightOutcome, ModelId};
use crate::error::{Result, UfcError};
use rusqlite::params;

impl UfcDatabase {
    /// Career record for one fighter over fights with a recorded outcome.
    pub fn get_fighter_record(&self, id: FighterId) -> Result<FighterRecord> {
        let fighter = self.get_fighter(id)?.ok_or(UfcError::NotFound {
            entity: "fighter",
            key: id.to_string(),
        })?;

        let (wins, losses, draws, no_contests) = self.conn.query_row(
            "SELECT
                COALESCE(SUM(CASE
                    WHEN (outcome = 'fighter1' AND fighter1_id = ?1)
                      OR (outcome = 'fighter2' AND fighter2_id = ?1) THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE
                    WHEN (outcome = 'fighter1' AND fighter2_id = ?1)
                      OR (outcome = 'fighter2' AND fighter1_id = ?1) THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN outcome = 'draw' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN outcome = 'no_contest' THEN 1 ELSE 0 END), 0)
             FROM fights
             WHERE (fighter1_id = ?1 OR fighter2_id = ?1) AND outcome IS NOT NULL",
            params![id.as_i64()],
            |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, u32>(3)?,
                ))
            },
        )?;

        Ok(FighterRecord {
            fighter_id: id,
            name: fighter.name,
            wins,
            losses,
            draws,
            no_contests,
        })
    }

    /// Win-rate rankings over completed fights, optionally restricted to one
    /// weight class. Ordered by win rate, then win count.
    pub fn get_rankings(
        &self,
        weight_class: Option<&str>,
        min_fights: u32,
        limit: u32,
    ) -> Result<Vec<RankingEntry>> {
        let mut query = String::from(
            "SELECT f.fighter_id, f.name,
                    SUM(CASE
                        WHEN (ft.outcome = 'fighter1' AND ft.fighter1_id = f.fighter_id)
                          OR (ft.outcome = 'fighter2' AND ft.fighter2_id = f.fighter_id)
                        THEN 1 ELSE 0 END) AS wins,
                    SUM(CASE
                        WHEN (ft.outcome = 'fighter1' AND ft.fighter2_id = f.fighter_id)
                          OR (ft.outcome = 'fighter2' AND ft.fighter1_id = f.fighter_id)
                        THEN 1 ELSE 0 END) AS losses,
                    COUNT(*) AS total
             FROM fighters f
             JOIN fights ft ON f.fighter_id IN (ft.fighter1_id, ft.fighter2_id)
             WHERE ft.outcome IS NOT NULL",
        );

        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(name) = weight_class {
            query.push_str(
                " AND ft.weight_class_id =
                    (SELECT weight_class_id FROM weight_classes WHERE name = ?)",
            );
            params.push(Box::new(name.to_string()));
        }

        query.push_str(" GROUP BY f.fighter_id, f.name HAVING COUNT(*) >= ?");
        params.push(Box::new(min_fights));

        query.push_str(" ORDER BY CAST(wins AS REAL) / total DESC, wins DESC LIMIT ?");
        params.push(Box::new(limit));

        let mut stmt = self.conn.prepare(&query)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt.query_map(&param_refs[..], |row| {
            let wins: u32 = row.get(2)?;
            let losses: u32 = row.get(3)?;
            let total: u32 = row.get(4)?;
            Ok(RankingEntry {
                fighter_id: FighterId::new(row.get(0)?),
                name: row.get(1)?,
                wins,
                losses,
                total_fights: total,
                win_rate: if total == 0 {
                    0.0
                } else {
                    f64::from(wins) / f64::from(total)
                },
            })
        })?;

        let mut rankings = Vec::new();
        for row in rows {
            rankings.push(row?);
        }
        Ok(rankings)
    }

    /// Head-to-head record between two fighters.
    ///
    /// Symmetric: swapping the arguments swaps the a/b fields and nothing
    /// else. Fighters who never met yield an all-zero record.
    pub fn get_head_to_head(&self, a: FighterId, b: FighterId) -> Result<HeadToHead> {
        let fighter_a = self.get_fighter(a)?.ok_or(UfcError::NotFound {
            entity: "fighter",
            key: a.to_string(),
        })?;
        let fighter_b = self.get_fighter(b)?.ok_or(UfcError::NotFound {
            entity: "fighter",
            key: b.to_string(),
        })?;

        let mut stmt = self.conn.prepare(
            "SELECT fighter1_id, fighter2_id, outcome FROM fights
             WHERE ((fighter1_id = ?1 AND fighter2_id = ?2)
                 OR (fighter1_id = ?2 AND fighter2_id = ?1))
               AND outcome IS NOT NULL",
        )?;

        let rows = stmt.query_map(params![a.as_i64(), b.as_i64()], |row| {
            let fighter1: i64 = row.get(0)?;
            let outcome: Option<String> = row.get(2)?;
            Ok((fighter1, FightOutcome::from_db(outcome)))
        })?;

        let mut h2h = HeadToHead {
            fighter_a_id: a,
            fighter_a_name: fighter_a.name,
            fighter_b_id: b,
            fighter_b_name: fighter_b.name,
            fighter_a_wins: 0,
            fighter_b_wins: 0,
            draws: 0,
            no_contests: 0,
            total_meetings: 0,
        };

        for row in rows {
            let (fighter1, outcome) = row?;
            h2h.total_meetings += 1;
            match outcome {
                Some(FightOutcome::Fighter1) | Some(FightOutcome::Fighter2) => {
                    let winner = if outcome == Some(FightOutcome::Fighter1) {
                        fighter1
                    } else if fighter1 == a.as_i64() {
                        b.as_i64()
                    } else {
                        a.as_i64()
                    };
                    if winner == a.as_i64() {
                        h2h.fighter_a_wins += 1;
                    } else {
                        h2h.fighter_b_wins += 1;
                    }
                }
                Some(FightOutcome::Draw) => h2h.draws += 1,
                Some(FightOutcome::NoContest) | None => h2h.no_contests += 1,
            }
        }

        Ok(h2h)
    }

    /// Full card for one event, with the most recent favourite price per
    /// fight when odds are recorded.
    pub fn get_event_report(&self, event_id: EventId) -> Result<EventReport> {
        let event = self.get_event(event_id)?.ok_or(UfcError::NotFound {
            entity: "event",
            key: event_id.to_string(),
        })?;

        let mut stmt = self.conn.prepare(
            "SELECT ft.fight_id, f1.name, f2.name, wc.name,
                    ft.outcome, ft.method, ft.round, fav.name, bo.favourite_odds
             FROM fights ft
             JOIN fighters f1 ON f1.fighter_id = ft.fighter1_id
             JOIN fighters f2 ON f2.fighter_id = ft.fighter2_id
             LEFT JOIN weight_classes wc ON wc.weight_class_id = ft.weight_class_id
             LEFT JOIN betting_odds bo ON bo.odds_id =
                (SELECT odds_id FROM betting_odds
                 WHERE fight_id = ft.fight_id ORDER BY odds_id DESC LIMIT 1)
             LEFT JOIN fighters fav ON fav.fighter_id = bo.favourite_fighter_id
             WHERE ft.event_id = ?
             ORDER BY ft.fight_id",
        )?;

        let rows = stmt.query_map(params![event_id.as_i64()], |row| {
            Ok(EventFightLine {
                fight_id: FightId::new(row.get(0)?),
                fighter1_name: row.get(1)?,
                fighter2_name: row.get(2)?,
                weight_class: row.get(3)?,
                outcome: FightOutcome::from_db(row.get(4)?),
                method: row.get(5)?,
                round: row.get(6)?,
                favourite_name: row.get(7)?,
                favourite_odds: row.get(8)?,
            })
        })?;

        let mut fights = Vec::new();
        for row in rows {
            fights.push(row?);
        }

        Ok(EventReport { event, fights })
    }

    /// Feature vector for one fight: per-corner record, physical attributes,
    /// career stat averages and the latest recorded price.
    pub fn get_prediction_features_for_fight(&self, id: FightId) -> Result<PredictionFeatures> {
        let fight = self.get_fight(id)?.ok_or(UfcError::NotFound {
            entity: "fight",
            key: id.to_string(),
        })?;
        let event = self.get_event(fight.event_id)?.ok_or(UfcError::NotFound {
            entity: "event",
            key: fight.event_id.to_string(),
        })?;

        let weight_class = match fight.weight_class_id {
            Some(wc_id) => self.conn.query_row(
                "SELECT name FROM weight_classes WHERE weight_class_id = ?",
                params![wc_id.as_i64()],
                |row| row.get(0),
            )?,
            None => None,
        };

        Ok(PredictionFeatures {
            fight_id: id,
            event_date: event.event_date,
            weight_class,
            fighter1: self.fighter_features(id, fight.fighter1_id)?,
            fighter2: self.fighter_features(id, fight.fighter2_id)?,
        })
    }

    fn fighter_features(&self, fight_id: FightId, fighter_id: FighterId) -> Result<FighterFeatures> {
        let fighter = self.get_fighter(fighter_id)?.ok_or(UfcError::NotFound {
            entity: "fighter",
            key: fighter_id.to_string(),
        })?;
        let record = self.get_fighter_record(fighter_id)?;

        let (avg_sig_strikes_landed, avg_takedowns, avg_knockdowns) = self.conn.query_row(
            "SELECT AVG(sig_strikes_landed), AVG(takedowns), AVG(knockdowns)
             FROM fighter_stats WHERE fighter_id = ?",
            params![fighter_id.as_i64()],
            |row| {
                Ok((
                    row.get::<_, Option<f64>>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                ))
            },
        )?;

        let latest_odds = {
            let result = self.conn.query_row(
                "SELECT CASE WHEN favourite_fighter_id = ?2
                        THEN favourite_odds ELSE underdog_odds END
                 FROM betting_odds WHERE fight_id = ?1
                 ORDER BY odds_id DESC LIMIT 1",
                params![fight_id.as_i64(), fighter_id.as_i64()],
                |row| row.get::<_, f64>(0),
            );
            match result {
                Ok(odds) => Some(odds),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            }
        };

        Ok(FighterFeatures {
            fighter_id,
            name: fighter.name,
            wins: record.wins,
            losses: record.losses,
            win_rate: record.win_rate(),
            height_cm: fighter.height_cm,
            reach_cm: fighter.reach_cm,
            stance: fighter.stance,
            avg_sig_strikes_landed,
            avg_takedowns,
            avg_knockdowns,
            latest_odds,
        })
    }

    /// Accuracy of one model over its resolved predictions.
    pub fn get_model_accuracy(&self, id: ModelId) -> Result<ModelAccuracy> {
        let model = self.get_model(id)?.ok_or(UfcError::NotFound {
            entity: "prediction model",
            key: id.to_string(),
        })?;

        let (total, resolved, correct, mean_confidence) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN actual_outcome IS NOT NULL THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN actual_outcome = predicted_outcome THEN 1 ELSE 0 END), 0),
                    AVG(confidence)
             FROM predictions WHERE model_id = ?",
            params![id.as_i64()],
            |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                ))
            },
        )?;

        Ok(ModelAccuracy {
            model_id: id,
            model_name: model.name,
            total_predictions: total,
            resolved,
            correct,
            accuracy: (resolved > 0).then(|| f64::from(correct) / f64::from(resolved)),
            mean_confidence,
        })
    }
}
