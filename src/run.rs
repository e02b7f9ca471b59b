//! The run entity and its field validation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where a run took place.
///
/// Serialized and stored as its upper-case text form (`INDOOR`, `OUTDOOR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    Indoor,
    Outdoor,
}

impl Location {
    pub const ALL: [Location; 2] = [Location::Indoor, Location::Outdoor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indoor => "INDOOR",
            Self::Outdoor => "OUTDOOR",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = Error;

    /// Parses a location name, ignoring ASCII case.
    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|location| location.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown location '{value}', expected one of INDOOR, OUTDOOR"
                ))
            })
    }
}

/// One recorded exercise session.
///
/// `id` is optional on input: a run created without one receives a
/// store-assigned id. Runs read back from a store always carry `Some(id)`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use runnerz::{Location, Run};
///
/// let started = NaiveDate::from_ymd_opt(2024, 3, 4)
///     .unwrap()
///     .and_hms_opt(7, 0, 0)
///     .unwrap();
/// let run = Run::new(Some(40), "Monday Morning Run", started, None, 3.0, Location::Indoor);
/// assert!(run.validate().is_ok());
///
/// let json = serde_json::to_value(&run).unwrap();
/// assert_eq!(json["startedOn"], "2024-03-04T07:00:00");
/// assert_eq!(json["location"], "INDOOR");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: Option<i64>,
    pub title: String,
    pub started_on: NaiveDateTime,
    pub completed_on: Option<NaiveDateTime>,
    pub miles: f64,
    pub location: Location,
    /// Optimistic-concurrency token. Carried through unchanged, never checked.
    pub version: Option<i64>,
}

impl Run {
    pub fn new(
        id: Option<i64>,
        title: impl Into<String>,
        started_on: NaiveDateTime,
        completed_on: Option<NaiveDateTime>,
        miles: f64,
        location: Location,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            started_on,
            completed_on,
            miles,
            location,
            version: None,
        }
    }

    /// Returns a copy of this run carrying `id`.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Checks the field constraints a run must satisfy before it is stored.
    ///
    /// The title must contain a non-whitespace character, `miles` must be a
    /// finite number above zero, and `completed_on` may not precede
    /// `started_on`.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }
        if !self.miles.is_finite() || self.miles <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "miles must be a positive number, got {}",
                self.miles
            )));
        }
        if let Some(completed_on) = self.completed_on {
            if completed_on < self.started_on {
                return Err(Error::InvalidInput(format!(
                    "completedOn {completed_on} is before startedOn {}",
                    self.started_on
                )));
            }
        }
        Ok(())
    }
}
