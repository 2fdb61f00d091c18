pub mod codec;
pub mod person;

pub use codec::{decode_person, DecodeError};
pub use person::{format_utc_offset, parse_utc_offset, GeoPoint, Person};
