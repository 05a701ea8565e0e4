// File: crates/stream-core/src/record.rs
// Summary: Raw (loosely typed) records, CSV ingestion, and normalization into typed records.
// Notes:
// - Series values never fail: missing, non-numeric or non-finite input becomes 0.
// - Dates do fail, and a single bad date rejects the whole dataset.

use std::io;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{StreamError, StreamResult};

/// One loosely typed field of an input row.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self { RawValue::Number(v) }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self { RawValue::Number(v as f64) }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self { RawValue::Text(v.to_string()) }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self { RawValue::Text(v) }
}

/// One input row: named fields in column order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, RawValue)>,
}

impl RawRecord {
    pub fn new() -> Self { Self::default() }

    /// Builder-style insert; a repeated name replaces the earlier value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Field value, or `Missing` when the row has no such column.
    pub fn get(&self, name: &str) -> &RawValue {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .unwrap_or(&RawValue::Missing)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

/// A typed row: a UTC timestamp plus one finite, non-negative value per series key.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub date: DateTime<Utc>,
    /// `values[i]` belongs to key `i` of the key list used for normalization.
    pub values: Vec<f64>,
}

impl Record {
    pub fn new(date: DateTime<Utc>, values: Vec<f64>) -> Self {
        Self { date, values }
    }

    /// Milliseconds since the Unix epoch; the unit of the time scale domain.
    #[inline]
    pub fn timestamp_ms(&self) -> f64 {
        self.date.timestamp_millis() as f64
    }

    #[inline]
    pub fn value(&self, key_index: usize) -> f64 {
        self.values.get(key_index).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Coerce raw records into typed records for the ordered `keys`.
#[tracing::instrument(skip_all, fields(rows = raw.len(), keys = keys.len()))]
pub fn normalize(raw: &[RawRecord], keys: &[String], date_field: &str) -> StreamResult<Vec<Record>> {
    let mut out = Vec::with_capacity(raw.len());
    let mut coerced = 0usize;
    for (row, rec) in raw.iter().enumerate() {
        let date = match rec.get(date_field) {
            RawValue::Text(s) => parse_date(s).ok_or_else(|| StreamError::malformed_date(row, s.as_str()))?,
            RawValue::Number(ms) => date_from_millis(*ms)
                .ok_or_else(|| StreamError::malformed_date(row, ms.to_string()))?,
            RawValue::Missing => return Err(StreamError::malformed_date(row, "")),
        };
        let values = keys
            .iter()
            .map(|key| {
                let raw_value = rec.get(key);
                if is_discarded(raw_value) {
                    coerced += 1;
                }
                coerce_value(raw_value)
            })
            .collect();
        out.push(Record::new(date, values));
    }
    tracing::debug!(records = out.len(), coerced, "normalized records");
    Ok(out)
}

/// True when coercion throws the input away: text that is not a number, or a non-finite value.
/// Missing fields and blank text are absent rather than discarded.
pub fn is_discarded(value: &RawValue) -> bool {
    match value {
        RawValue::Number(n) => !n.is_finite(),
        RawValue::Text(s) => {
            let t = s.trim();
            !t.is_empty() && !t.parse::<f64>().is_ok_and(f64::is_finite)
        }
        RawValue::Missing => false,
    }
}

/// Numeric coercion for one series field. Anything that is not a finite number becomes 0;
/// negative numbers are clamped to 0 so stacked band thickness stays non-negative.
pub fn coerce_value(value: &RawValue) -> f64 {
    let v = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => {
            let t = s.trim();
            if t.is_empty() { 0.0 } else { t.parse::<f64>().unwrap_or(0.0) }
        }
        RawValue::Missing => 0.0,
    };
    if !v.is_finite() {
        return 0.0;
    }
    if v < 0.0 {
        tracing::warn!(value = v, "negative series value clamped to 0");
        return 0.0;
    }
    v
}

/// Parse a date-like string into a UTC timestamp. Naive forms are taken as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        if s.len() == 4 {
            let year = s.parse::<i32>().ok()?;
            return NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
        let n = s.parse::<i64>().ok()?;
        // epoch ms above 1e12, epoch seconds otherwise
        if n > 10_i64.pow(12) {
            return DateTime::from_timestamp_millis(n);
        }
        return DateTime::from_timestamp(n, 0);
    }
    None
}

fn date_from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64)
}

/// Read a headed CSV into raw records. Cells are kept as text; empty cells are `Missing`.
pub fn read_csv<R: io::Read>(reader: R) -> StreamResult<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    tracing::debug!(?headers, "csv headers");

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let mut rec = RawRecord::new();
        for (name, cell) in headers.iter().zip(row.iter()) {
            let value = if cell.is_empty() { RawValue::Missing } else { RawValue::Text(cell.to_string()) };
            rec.set(name, value);
        }
        out.push(rec);
    }
    Ok(out)
}

pub fn read_csv_path(path: impl AsRef<Path>) -> StreamResult<Vec<RawRecord>> {
    let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    read_csv(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn keys(ks: &[&str]) -> Vec<String> {
        ks.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn discarded_inputs_exclude_real_zeros() {
        assert!(!is_discarded(&"0".into()));
        assert!(!is_discarded(&RawValue::Number(0.0)));
        assert!(!is_discarded(&RawValue::Missing));
        assert!(!is_discarded(&"  ".into()));
        assert!(!is_discarded(&"-4".into()));
        assert!(is_discarded(&"n/a".into()));
        assert!(is_discarded(&"inf".into()));
        assert!(is_discarded(&RawValue::Number(f64::NAN)));
    }

    #[test]
    fn coercion_policy() {
        assert_eq!(coerce_value(&RawValue::Number(3.5)), 3.5);
        assert_eq!(coerce_value(&" 42 ".into()), 42.0);
        assert_eq!(coerce_value(&"n/a".into()), 0.0);
        assert_eq!(coerce_value(&"".into()), 0.0);
        assert_eq!(coerce_value(&"NaN".into()), 0.0);
        assert_eq!(coerce_value(&"inf".into()), 0.0);
        assert_eq!(coerce_value(&RawValue::Number(f64::NAN)), 0.0);
        assert_eq!(coerce_value(&RawValue::Missing), 0.0);
        assert_eq!(coerce_value(&RawValue::Number(-4.0)), 0.0);
        assert_eq!(coerce_value(&"-4".into()), 0.0);
    }

    #[test]
    fn date_forms() {
        let d = parse_date("2024-01-01").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2024, 1, 1, 0));
        assert_eq!(parse_date("2024/02/03").unwrap().month(), 2);
        assert_eq!(parse_date("02/03/2024").unwrap().day(), 3);
        assert_eq!(parse_date("2024-03-01T12:30:00Z").unwrap().hour(), 12);
        assert_eq!(parse_date("2024-03-01 06:15").unwrap().minute(), 15);
        assert_eq!(parse_date("2021").unwrap().year(), 2021);
        assert_eq!(parse_date("1704067200").unwrap(), parse_date("2024-01-01").unwrap());
        assert_eq!(parse_date("1704067200000").unwrap(), parse_date("2024-01-01").unwrap());
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("2024-13-01").is_none());
    }

    #[test]
    fn missing_keys_become_zero() {
        let raw = vec![RawRecord::new().with("Date", "2024-01-01").with("A", 1)];
        let recs = normalize(&raw, &keys(&["A", "B"]), "Date").unwrap();
        assert_eq!(recs[0].values, vec![1.0, 0.0]);
    }

    #[test]
    fn bad_date_fails_whole_dataset() {
        let raw = vec![
            RawRecord::new().with("Date", "2024-01-01").with("A", 1),
            RawRecord::new().with("Date", "someday").with("A", 2),
        ];
        match normalize(&raw, &keys(&["A"]), "Date") {
            Err(StreamError::MalformedDate { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "someday");
            }
            other => panic!("expected malformed date, got {other:?}"),
        }
        let no_date = vec![RawRecord::new().with("A", 1)];
        assert!(normalize(&no_date, &keys(&["A"]), "Date").is_err());
    }

    #[test]
    fn numeric_dates_are_epoch_millis() {
        let raw = vec![RawRecord::new().with("Date", 1_704_067_200_000.0).with("A", 1)];
        let recs = normalize(&raw, &keys(&["A"]), "Date").unwrap();
        assert_eq!(recs[0].timestamp_ms(), 1_704_067_200_000.0);
    }

    #[test]
    fn csv_rows_become_text_fields() {
        let data = "Date,A,B\n2024-01-01, 10 ,\n2024-02-01,20,x\n";
        let raw = read_csv(data.as_bytes()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].get("A"), &RawValue::Text("10".into()));
        assert_eq!(raw[0].get("B"), &RawValue::Missing);
        let recs = normalize(&raw, &keys(&["A", "B"]), "Date").unwrap();
        assert_eq!(recs[0].values, vec![10.0, 0.0]);
        assert_eq!(recs[1].values, vec![20.0, 0.0]);
        assert_eq!(recs[1].total(), 20.0);
    }

    #[test]
    fn set_replaces_existing_field() {
        let mut r = RawRecord::new().with("A", 1);
        r.set("A", "2");
        assert_eq!(r.field_names().count(), 1);
        assert_eq!(r.get("A"), &RawValue::Text("2".into()));
    }
}
