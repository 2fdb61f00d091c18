//! Person record model.
//!
//! Records are immutable once constructed; an update is a full replacement
//! written through the store. Field layout follows the randomuser.me
//! document format (<https://randomuser.me/documentation#format>).

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair from the record's `location.coordinates` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A person from the remote directory.
///
/// The identity fields, dates and phone numbers are guaranteed by the
/// source; everything else may be absent. `time_zone` is persisted as a
/// `±HH:MM` string (see [`offset_serde`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Stable numeric id, derived from the digits of `id_value`.
    pub id: i64,
    /// Raw identity value from the source (`id.value`), e.g. an SSN string.
    pub id_value: String,
    /// Identity document name (`id.name`), e.g. "SSN".
    pub id_name: Option<String>,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Nickname from the record's login section.
    pub username: Option<String>,
    pub email: Option<String>,
    pub birth_date: DateTime<Utc>,
    pub age: Option<u32>,
    pub registered_date: DateTime<Utc>,
    pub registered_age: Option<u32>,
    pub phone: String,
    pub cell: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub post_code: Option<String>,
    pub coordinates: Option<GeoPoint>,
    #[serde(with = "offset_serde")]
    pub time_zone: Option<FixedOffset>,
    pub thumbnail_url: Option<String>,
    pub medium_url: Option<String>,
    pub large_url: Option<String>,
}

impl Person {
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.id_value.clone(),
        }
    }

    /// "Last, First" form used by the roster listing.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{}, {}", last, first),
            _ => self.full_name(),
        }
    }

    pub fn address_line(&self) -> Option<String> {
        let street = self.street.as_deref().filter(|s| !s.trim().is_empty())?;
        let city = self.city.as_deref().unwrap_or("");
        let state = self.state.as_deref().unwrap_or("");
        match &self.post_code {
            Some(zip) => Some(format!("{}, {}, {} {}", street, city, state, zip)),
            None => Some(format!("{}, {}, {}", street, city, state)),
        }
    }

    /// Ordering key for roster queries: last name, then first name.
    /// Absent names sort first, matching NULLS-first SQL ordering.
    pub fn sort_key(&self) -> (Option<&str>, Option<&str>) {
        (self.last_name.as_deref(), self.first_name.as_deref())
    }
}

/// Parse a numeric UTC offset string (`"+5:30"`, `"-11:00"`, `"0:00"`)
/// into a fixed-offset zone. Returns `None` for anything malformed.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(rest) => (-1i32, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
        None => (rest.parse::<i32>().ok()?, 0),
    };
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Format a fixed-offset zone back into the `±HH:MM` wire form.
pub fn format_utc_offset(offset: &FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
}

/// Serialize `Option<FixedOffset>` as an offset string, lenient on read.
pub(crate) mod offset_serde {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        offset: &Option<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        offset
            .as_ref()
            .map(super::format_utc_offset)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<FixedOffset>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_utc_offset))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) fn sample_person(id: i64, first: &str, last: &str) -> Person {
    use chrono::TimeZone;

    Person {
        id,
        id_value: format!("000-{}", id),
        id_name: Some("SSN".to_string()),
        title: Some("Mr".to_string()),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        username: None,
        email: None,
        birth_date: Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap(),
        age: Some(44),
        registered_date: Utc.with_ymd_and_hms(2010, 6, 1, 12, 0, 0).unwrap(),
        registered_age: Some(14),
        phone: "011-962-7516".to_string(),
        cell: "081-454-0666".to_string(),
        street: None,
        city: None,
        state: None,
        post_code: None,
        coordinates: None,
        time_zone: None,
        thumbnail_url: None,
        medium_url: None,
        large_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_last_first() {
        let p = sample_person(1, "Brad", "Gibson");
        assert_eq!(p.display_name(), "Gibson, Brad");
        assert_eq!(p.full_name(), "Brad Gibson");
    }

    #[test]
    fn test_display_name_falls_back_to_id_value() {
        let mut p = sample_person(2, "x", "y");
        p.first_name = None;
        p.last_name = None;
        assert_eq!(p.display_name(), "000-2");
    }

    #[test]
    fn test_sort_key_orders_by_last_then_first() {
        let jones = sample_person(2, "Bob", "Jones");
        let smith = sample_person(1, "Alice", "Smith");
        assert!(jones.sort_key() < smith.sort_key());
    }

    #[test]
    fn test_sort_key_absent_name_sorts_first() {
        let mut anon = sample_person(3, "x", "y");
        anon.last_name = None;
        let named = sample_person(4, "Ann", "Abbot");
        assert!(anon.sort_key() < named.sort_key());
    }

    #[test]
    fn test_address_line() {
        let mut p = sample_person(5, "Brad", "Gibson");
        assert_eq!(p.address_line(), None);
        p.street = Some("9278 New Road".to_string());
        p.city = Some("Kilcoole".to_string());
        p.state = Some("Waterford".to_string());
        p.post_code = Some("93027".to_string());
        assert_eq!(
            p.address_line().as_deref(),
            Some("9278 New Road, Kilcoole, Waterford 93027")
        );
    }

    #[test]
    fn test_parse_utc_offset_forms() {
        assert_eq!(
            parse_utc_offset("+5:30"),
            FixedOffset::east_opt(5 * 3600 + 30 * 60)
        );
        assert_eq!(parse_utc_offset("-11:00"), FixedOffset::east_opt(-11 * 3600));
        assert_eq!(parse_utc_offset("0:00"), FixedOffset::east_opt(0));
        assert_eq!(parse_utc_offset("not an offset"), None);
        assert_eq!(parse_utc_offset("+25:00"), None);
    }

    #[test]
    fn test_format_utc_offset_round_trip() {
        for raw in ["+05:30", "-03:30", "+00:00", "-11:00"] {
            let parsed = parse_utc_offset(raw).unwrap();
            assert_eq!(format_utc_offset(&parsed), raw);
        }
    }

    #[test]
    fn test_person_serde_round_trip_keeps_time_zone() {
        let mut p = sample_person(6, "Ida", "Kohl");
        p.time_zone = parse_utc_offset("-3:30");
        let json = serde_json::to_string(&p).unwrap();
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
