use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use tracing::warn;

use crate::calendar::event::{Event, normalize_type};
use crate::source::csv::Row;

// Accepted column names per logical field, in priority order. Sheet
// owners rename columns freely, so both English and Spanish headings
// are recognized.
const DATE_KEYS: &[&str] = &["date", "fecha", "fecha evento"];
const TITLE_KEYS: &[&str] = &["title", "titulo", "título", "nombre"];
const TYPE_KEYS: &[&str] = &["type", "tipo", "tipo evento"];
const SUBJECT_KEYS: &[&str] = &["subject", "materia", "asignatura"];
const DESCRIPTION_KEYS: &[&str] = &["description", "descripcion", "descripción", "detalle"];

fn iso_date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

fn day_first_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})[-/](\d{1,2})[-/](\d{4})$").expect("valid regex"))
}

/// Maps one parsed row onto an [`Event`], or drops it.
///
/// A row converts only when date, title and type all resolve to
/// non-empty values and the date normalizes to a real calendar date.
/// Rejected rows are logged and contribute nothing downstream.
pub fn convert(row: &Row) -> Option<Event> {
    let raw_date = resolve_field(row, DATE_KEYS);
    let title = resolve_field(row, TITLE_KEYS);
    let raw_type = resolve_field(row, TYPE_KEYS);
    let subject = resolve_field(row, SUBJECT_KEYS);
    let description = resolve_field(row, DESCRIPTION_KEYS);

    if raw_date.is_empty() || title.is_empty() || raw_type.is_empty() {
        warn!("Dropping row with missing date, title or type: {:?}", row);
        return None;
    }

    let Some(date) = normalize_date(&raw_date) else {
        warn!("Dropping row with unparseable date {:?}", raw_date);
        return None;
    };

    let event_type = normalize_type(&raw_type);
    if event_type.is_empty() {
        warn!("Dropping row whose type is empty after normalization: {:?}", raw_type);
        return None;
    }

    Some(Event::new(date, title, event_type, subject, description))
}

/// First synonym with a non-empty value wins. Column-name matching is
/// case-insensitive and tolerant of padded headers.
fn resolve_field(row: &Row, keys: &[&str]) -> String {
    for key in keys {
        let value = row
            .iter()
            .find(|(name, _)| name.trim().to_lowercase() == *key)
            .map(|(_, value)| value.trim());
        if let Some(value) = value
            && !value.is_empty()
        {
            return value.to_string();
        }
    }
    String::new()
}

// Spelled-out date forms accepted after the two numeric patterns.
const SPELLED_OUT_FORMATS: &[&str] = &["%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Normalizes the source date into a calendar date.
///
/// Tries, in order: ISO `YYYY-MM-DD` verbatim, day-first `D/M/YYYY` or
/// `D-M-YYYY` reordered, then a short list of spelled-out formats plus
/// RFC 3339. Impossible dates (`31/02/2025`) reject rather than roll
/// over.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if iso_date_pattern().is_match(raw) {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    }

    if let Some(caps) = day_first_pattern().captures(raw) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    for format in SPELLED_OUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()).ok()
}
