//! Decoding of raw randomuser.me documents into [`Person`] records.
//!
//! The decoder is pure and stateless. Required fields (identity value,
//! birth date, registration date, phone, cell) fail the record when absent
//! or malformed; optional fields map nulls and junk to `None`.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use super::person::{parse_utc_offset, GeoPoint, Person};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("malformed field {field}: {reason}")]
    MalformedField {
        field: &'static str,
        reason: String,
    },
}

/// Decode one record from the remote `results` array.
pub fn decode_person(record: &Value) -> Result<Person, DecodeError> {
    let id_section = record.get("id");
    let id_value =
        string_at(id_section, "value").ok_or(DecodeError::MissingField("id.value"))?;
    let id = derive_id(&id_value)?;

    let name = record.get("name");
    let location = record.get("location");
    let login = record.get("login");
    let picture = record.get("picture");
    let dob = record.get("dob");
    let registered = record.get("registered");

    let birth_date = instant_at(dob, "date", "dob.date")?;
    let registered_date = instant_at(registered, "date", "registered.date")?;

    let phone = record
        .get("phone")
        .and_then(scalar_string)
        .ok_or(DecodeError::MissingField("phone"))?;
    let cell = record
        .get("cell")
        .and_then(scalar_string)
        .ok_or(DecodeError::MissingField("cell"))?;

    let time_zone = location
        .and_then(|l| l.get("timezone"))
        .and_then(|tz| tz.get("offset"))
        .and_then(scalar_string)
        .and_then(|raw| parse_utc_offset(&raw));

    let coordinates = location
        .and_then(|l| l.get("coordinates"))
        .and_then(decode_coordinates);

    Ok(Person {
        id,
        id_value,
        id_name: string_at(id_section, "name"),
        title: string_at(name, "title"),
        first_name: string_at(name, "first"),
        last_name: string_at(name, "last"),
        username: string_at(login, "username"),
        email: record.get("email").and_then(scalar_string),
        birth_date,
        age: count_at(dob, "age"),
        registered_date,
        registered_age: count_at(registered, "age"),
        phone,
        cell,
        street: string_at(location, "street"),
        city: string_at(location, "city"),
        state: string_at(location, "state"),
        post_code: string_at(location, "postcode"),
        coordinates,
        time_zone,
        thumbnail_url: string_at(picture, "thumbnail"),
        medium_url: string_at(picture, "medium"),
        large_url: string_at(picture, "large"),
    })
}

/// Derive the numeric record id from the digits of the source identity
/// value. Capped at 18 digits so the result always fits in an i64.
fn derive_id(id_value: &str) -> Result<i64, DecodeError> {
    let digits: String = id_value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(18)
        .collect();
    digits
        .parse::<i64>()
        .map_err(|_| DecodeError::MalformedField {
            field: "id.value",
            reason: format!("no usable digits in {:?}", id_value),
        })
}

/// Accept string and number scalars; the source is inconsistent about
/// postcodes and coordinates.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_at(section: Option<&Value>, key: &str) -> Option<String> {
    section?.get(key).and_then(scalar_string)
}

fn count_at(section: Option<&Value>, key: &str) -> Option<u32> {
    section?.get(key)?.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn instant_at(
    section: Option<&Value>,
    key: &str,
    field: &'static str,
) -> Result<DateTime<Utc>, DecodeError> {
    let raw = section
        .and_then(|s| s.get(key))
        .and_then(scalar_string)
        .ok_or(DecodeError::MissingField(field))?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DecodeError::MalformedField {
            field,
            reason: e.to_string(),
        })
}

fn decode_coordinates(value: &Value) -> Option<GeoPoint> {
    let latitude = scalar_f64(value.get("latitude")?)?;
    let longitude = scalar_f64(value.get("longitude")?)?;
    Some(GeoPoint {
        latitude,
        longitude,
    })
}

fn scalar_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> Value {
        serde_json::json!({
            "gender": "male",
            "name": { "title": "Mr", "first": "Brad", "last": "Gibson" },
            "location": {
                "street": "9278 New Road",
                "city": "Kilcoole",
                "state": "Waterford",
                "postcode": "93027",
                "coordinates": { "latitude": "20.9267", "longitude": "-7.9310" },
                "timezone": { "offset": "-3:30", "description": "Newfoundland" }
            },
            "email": "brad.gibson@example.com",
            "login": { "uuid": "155e77ee", "username": "silverswan131" },
            "dob": { "date": "1993-07-20T09:44:18.674Z", "age": 26 },
            "registered": { "date": "2002-05-21T10:59:49.966Z", "age": 17 },
            "phone": "011-962-7516",
            "cell": "081-454-0666",
            "id": { "name": "PPS", "value": "0390511T" },
            "picture": {
                "large": "https://randomuser.me/api/portraits/men/75.jpg",
                "medium": "https://randomuser.me/api/portraits/med/men/75.jpg",
                "thumbnail": "https://randomuser.me/api/portraits/thumb/men/75.jpg"
            },
            "nat": "IE"
        })
    }

    #[test]
    fn test_decode_full_record() {
        let person = decode_person(&sample_record()).unwrap();
        assert_eq!(person.id, 390511);
        assert_eq!(person.id_value, "0390511T");
        assert_eq!(person.id_name.as_deref(), Some("PPS"));
        assert_eq!(person.first_name.as_deref(), Some("Brad"));
        assert_eq!(person.last_name.as_deref(), Some("Gibson"));
        assert_eq!(person.username.as_deref(), Some("silverswan131"));
        assert_eq!(person.phone, "011-962-7516");
        assert_eq!(person.cell, "081-454-0666");
        assert_eq!(person.age, Some(26));
        assert_eq!(person.registered_age, Some(17));
        assert_eq!(
            person.birth_date,
            Utc.with_ymd_and_hms(1993, 7, 20, 9, 44, 18).unwrap()
                + chrono::Duration::milliseconds(674)
        );
        assert_eq!(person.post_code.as_deref(), Some("93027"));
        let geo = person.coordinates.unwrap();
        assert!((geo.latitude - 20.9267).abs() < 1e-9);
        assert!((geo.longitude + 7.9310).abs() < 1e-9);
        assert_eq!(
            person.time_zone,
            parse_utc_offset("-3:30")
        );
        assert!(person
            .large_url
            .as_deref()
            .unwrap()
            .ends_with("men/75.jpg"));
    }

    #[test]
    fn test_decode_numeric_postcode() {
        let mut record = sample_record();
        record["location"]["postcode"] = serde_json::json!(93027);
        let person = decode_person(&record).unwrap();
        assert_eq!(person.post_code.as_deref(), Some("93027"));
    }

    #[test]
    fn test_missing_phone_fails() {
        let mut record = sample_record();
        record.as_object_mut().unwrap().remove("phone");
        let err = decode_person(&record).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField("phone")));
    }

    #[test]
    fn test_missing_id_value_fails() {
        let mut record = sample_record();
        record["id"]["value"] = Value::Null;
        let err = decode_person(&record).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField("id.value")));
    }

    #[test]
    fn test_id_without_digits_fails() {
        let mut record = sample_record();
        record["id"]["value"] = serde_json::json!("N/A");
        let err = decode_person(&record).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedField { field: "id.value", .. }
        ));
    }

    #[test]
    fn test_malformed_birth_date_fails() {
        let mut record = sample_record();
        record["dob"]["date"] = serde_json::json!("yesterday");
        let err = decode_person(&record).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedField { field: "dob.date", .. }
        ));
    }

    #[test]
    fn test_null_optionals_map_to_absent() {
        let mut record = sample_record();
        record["name"]["title"] = Value::Null;
        record["location"]["timezone"]["offset"] = serde_json::json!("junk");
        record.as_object_mut().unwrap().remove("picture");
        let person = decode_person(&record).unwrap();
        assert_eq!(person.title, None);
        assert_eq!(person.time_zone, None);
        assert_eq!(person.thumbnail_url, None);
    }
}
