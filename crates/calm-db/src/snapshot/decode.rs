//! Row decoder: raw snapshot rows to typed records.
//!
//! Column names are normalized first (`pulse_start_time` → `pulseStartTime`,
//! `emwave_session_id` → `emWaveSessionId`) so decoding does not depend on
//! the client's column spelling. Missing or mistyped required fields fail
//! the whole decode.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use calm_core::civil::instant_from_unix;
use calm_core::entities::{CognitiveResult, Session, WeightedScores};
use calm_core::enums::Stage;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, value_kind};

pub(crate) const SESSIONS_TABLE: &str = "emwave_sessions";
pub(crate) const COGNITIVE_TABLE: &str = "cognitive_results";

/// Normalize a snapshot column name to its canonical camelCase form.
#[must_use]
pub fn canonical_field_name(column: &str) -> String {
    let mut name = String::with_capacity(column.len());
    for (i, word) in column
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let word = word.to_ascii_lowercase();
        if i == 0 {
            name.push_str(&word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                name.push(first.to_ascii_uppercase());
                name.push_str(chars.as_str());
            }
        }
    }
    if let Some(rest) = name.strip_prefix("emwave") {
        name = format!("emWave{rest}");
    }
    name
}

/// One snapshot row keyed by canonical field name.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    table: &'static str,
    fields: BTreeMap<String, libsql::Value>,
}

impl RawRow {
    #[must_use]
    pub const fn new(table: &'static str) -> Self {
        Self {
            table,
            fields: BTreeMap::new(),
        }
    }

    /// Insert a value under the canonical form of `column`.
    pub fn insert(&mut self, column: &str, value: libsql::Value) {
        self.fields.insert(canonical_field_name(column), value);
    }

    /// Build from a libSQL row given the result set's column names.
    pub(crate) fn from_row(
        table: &'static str,
        columns: &[String],
        row: &libsql::Row,
    ) -> Result<Self, DatabaseError> {
        let mut raw = Self::new(table);
        for (idx, column) in (0_i32..).zip(columns) {
            raw.insert(column, row.get_value(idx)?);
        }
        Ok(raw)
    }

    fn present(&self, field: &str) -> Option<&libsql::Value> {
        self.fields
            .get(field)
            .filter(|v| !matches!(v, libsql::Value::Null))
    }

    fn required(&self, field: &str) -> Result<&libsql::Value, DatabaseError> {
        self.present(field).ok_or_else(|| DatabaseError::MissingField {
            table: self.table,
            field: field.to_string(),
        })
    }

    fn invalid(&self, field: &str, reason: String) -> DatabaseError {
        DatabaseError::InvalidField {
            table: self.table,
            field: field.to_string(),
            reason,
        }
    }

    fn int(&self, field: &str) -> Result<i64, DatabaseError> {
        match self.required(field)? {
            libsql::Value::Integer(v) => Ok(*v),
            #[allow(clippy::cast_possible_truncation)]
            libsql::Value::Real(v) if v.fract() == 0.0 => Ok(*v as i64),
            other => Err(self.invalid(field, format!("expected integer, got {}", value_kind(other)))),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn real_value(&self, field: &str, value: &libsql::Value) -> Result<f64, DatabaseError> {
        match value {
            libsql::Value::Real(v) => Ok(*v),
            libsql::Value::Integer(v) => Ok(*v as f64),
            other => Err(self.invalid(field, format!("expected number, got {}", value_kind(other)))),
        }
    }

    fn real(&self, field: &str) -> Result<f64, DatabaseError> {
        self.real_value(field, self.required(field)?)
    }

    fn opt_real(&self, field: &str) -> Result<Option<f64>, DatabaseError> {
        self.present(field)
            .map(|v| self.real_value(field, v))
            .transpose()
    }

    fn text(&self, field: &str) -> Result<String, DatabaseError> {
        match self.required(field)? {
            libsql::Value::Text(s) => Ok(s.clone()),
            libsql::Value::Integer(v) => Ok(v.to_string()),
            other => Err(self.invalid(field, format!("expected text, got {}", value_kind(other)))),
        }
    }

    fn opt_text(&self, field: &str) -> Result<Option<String>, DatabaseError> {
        match self.present(field) {
            None => Ok(None),
            Some(libsql::Value::Text(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(field, format!("expected text, got {}", value_kind(other)))),
        }
    }

    fn stage(&self) -> Result<Stage, DatabaseError> {
        let raw = self.int("stage")?;
        Stage::try_from(raw).map_err(|e| self.invalid("stage", e.to_string()))
    }
}

/// Decode an `emwave_sessions` row.
///
/// Weighted scores present in the row are kept as-is. When the inverse score
/// is absent (older clients) it is derived from raw coherence and duration.
///
/// # Errors
///
/// Returns `MissingField`/`InvalidField` for absent or mistyped columns.
pub fn decode_session(row: &RawRow, max_session_minutes: u32) -> Result<Session, DatabaseError> {
    let avg_coherence = row.real("avgCoherence")?;
    let duration_seconds = row.int("durationSeconds")?;
    let start_secs = row.int("pulseStartTime")?;
    let start = instant_from_unix(start_secs)
        .map_err(|e| row.invalid("pulseStartTime", e.to_string()))?;

    let derived = WeightedScores::derive(avg_coherence, duration_seconds, max_session_minutes);
    let weighted_avg_coherence = row.real("weightedAvgCoherence")?;
    let weighted_inverse_coherence = row
        .opt_real("weightedInverseCoherence")?
        .unwrap_or(derived.weighted_inverse_coherence);

    Ok(Session {
        emwave_session_id: row.text("emWaveSessionId")?,
        start,
        duration_seconds,
        avg_coherence,
        weighted_avg_coherence,
        weighted_inverse_coherence,
        valid_status: row.int("validStatus")?,
        stage: row.stage()?,
        emo_pic_name: row.opt_text("emoPicName")?,
    })
}

/// The raw `date_time` text of a cognitive row and the instant it names.
///
/// # Errors
///
/// Returns `MissingField`/`InvalidField` if the column is absent or unparseable.
pub fn cognitive_recorded_at(row: &RawRow) -> Result<(String, DateTime<Utc>), DatabaseError> {
    let date_time = row.text("dateTime")?;
    let recorded_at =
        parse_datetime(&date_time).map_err(|e| row.invalid("dateTime", e.to_string()))?;
    Ok((date_time, recorded_at))
}

/// Decode a `cognitive_results` row.
///
/// # Errors
///
/// Returns `MissingField`/`InvalidField` for absent or mistyped columns,
/// including an unparseable `date_time`.
pub fn decode_cognitive_result(row: &RawRow) -> Result<CognitiveResult, DatabaseError> {
    let (date_time, recorded_at) = cognitive_recorded_at(row)?;
    let is_relevant = match row.int("isRelevant")? {
        0 => false,
        1 => true,
        other => return Err(row.invalid("isRelevant", format!("expected 0 or 1, got {other}"))),
    };

    Ok(CognitiveResult {
        experiment: row.text("experiment")?,
        is_relevant,
        date_time,
        recorded_at,
        results: row.text("results")?,
        stage: row.stage()?,
    })
}
