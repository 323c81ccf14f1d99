//! CSV row shapes and row-level field parsing.
//!
//! Scrapers emit UTF-8 CSVs with stable column names; these structs mirror
//! those headers exactly. Field validation lives here so the migrator's
//! batch loop only sees typed values or an `InputFormat` error.

use crate::cli::types::FightOutcome;
use crate::error::{Result, UfcError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Scraper odds wire format:
/// `link,date,event,fighter1,fighter2,fighter1_odds,fighter2_odds,result,timestamp`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsCsvRow {
    pub link: String,
    pub date: String,
    pub event: String,
    pub fighter1: String,
    pub fighter2: String,
    pub fighter1_odds: Option<f64>,
    pub fighter2_odds: Option<f64>,
    pub result: String,
    pub timestamp: String,
}

/// Complete fight-data shape produced by the main scraping pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightCsvRow {
    pub event: String,
    pub date: String,
    pub location: String,
    pub weight_class: String,
    pub fighter1: String,
    pub fighter2: String,
    pub winner: String,
    pub method: String,
    pub round: Option<u32>,
    pub time: String,
    pub referee: String,

    pub fighter1_height_cm: Option<f64>,
    pub fighter1_reach_cm: Option<f64>,
    pub fighter1_stance: String,
    pub fighter1_dob: String,
    pub fighter2_height_cm: Option<f64>,
    pub fighter2_reach_cm: Option<f64>,
    pub fighter2_stance: String,
    pub fighter2_dob: String,

    pub fighter1_sig_strikes_landed: Option<u32>,
    pub fighter1_sig_strikes_attempted: Option<u32>,
    pub fighter1_takedowns: Option<u32>,
    pub fighter1_knockdowns: Option<u32>,
    pub fighter1_control_time_seconds: Option<u32>,
    pub fighter2_sig_strikes_landed: Option<u32>,
    pub fighter2_sig_strikes_attempted: Option<u32>,
    pub fighter2_takedowns: Option<u32>,
    pub fighter2_knockdowns: Option<u32>,
    pub fighter2_control_time_seconds: Option<u32>,
}

/// Date formats the scrapers have been seen to emit.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %y", "%d %b %Y", "%m/%d/%Y", "%B %d, %Y"];

/// Parse an event date in any known scraper format.
pub fn parse_event_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    Err(UfcError::InputFormat(format!("unparseable date: {raw:?}")))
}

/// Require a non-empty field.
pub fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(UfcError::InputFormat(format!("missing required field: {field}")))
    } else {
        Ok(value)
    }
}

/// Map a scraper `result`/`winner` value onto a fight outcome.
///
/// Empty means the fight has not happened yet. A fighter's name (matched
/// case-insensitively against either corner) means that fighter won.
pub fn resolve_result(
    raw: &str,
    fighter1: &str,
    fighter2: &str,
) -> Result<Option<FightOutcome>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.eq_ignore_ascii_case(fighter1) {
        return Ok(Some(FightOutcome::Fighter1));
    }
    if raw.eq_ignore_ascii_case(fighter2) {
        return Ok(Some(FightOutcome::Fighter2));
    }
    match raw.parse::<FightOutcome>() {
        Ok(outcome @ (FightOutcome::Draw | FightOutcome::NoContest)) => Ok(Some(outcome)),
        _ => Err(UfcError::InputFormat(format!(
            "result {raw:?} matches neither fighter nor draw/no-contest"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 19).unwrap();
        assert_eq!(parse_event_date("2025-07-19").unwrap(), expected);
        assert_eq!(parse_event_date("19 Jul 25").unwrap(), expected);
        assert_eq!(parse_event_date("19 Jul 2025").unwrap(), expected);
        assert_eq!(parse_event_date("07/19/2025").unwrap(), expected);
        assert_eq!(parse_event_date("July 19, 2025").unwrap(), expected);
        assert!(parse_event_date("someday").is_err());
        assert!(parse_event_date("").is_err());
    }

    #[test]
    fn test_resolve_result() {
        assert_eq!(resolve_result("", "A", "B").unwrap(), None);
        assert_eq!(
            resolve_result("a", "A", "B").unwrap(),
            Some(FightOutcome::Fighter1)
        );
        assert_eq!(
            resolve_result("B", "A", "B").unwrap(),
            Some(FightOutcome::Fighter2)
        );
        assert_eq!(
            resolve_result("draw", "A", "B").unwrap(),
            Some(FightOutcome::Draw)
        );
        assert_eq!(
            resolve_result("NC", "A", "B").unwrap(),
            Some(FightOutcome::NoContest)
        );
        assert!(resolve_result("Somebody Else", "A", "B").is_err());
        // "fighter1" is only valid as a stored value, not a scraper result
        assert!(resolve_result("fighter1", "A", "B").is_err());
    }

    #[test]
    fn test_required() {
        assert_eq!(required(" x ", "event").unwrap(), "x");
        assert!(required("  ", "event").is_err());
    }
}
