use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::error::{Error, Result};

/// Wire format for birthdays, date granularity only.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A persisted patient record.
///
/// `image_identifier` is internal bookkeeping: it names exactly one live
/// object in the object store (or nothing) and never reaches API clients,
/// who only ever see the derived public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birthday: Date,
    pub description: String,
    pub primary_doctor: String,
    pub image_identifier: Option<String>,
}

impl Patient {
    /// Derive the public image URL, or an empty string for records without
    /// an image.
    pub fn image_url(&self, public_base: &str) -> String {
        match &self.image_identifier {
            Some(identifier) => format!("{public_base}{identifier}"),
            None => String::new(),
        }
    }
}

/// The scalar fields of a patient, validated.
///
/// Only constructible through [`PatientFields::parse`], so a value of this
/// type always carries non-empty text fields and a real calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientFields {
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "birthday_serde")]
    pub birthday: Date,
    pub description: String,
    pub primary_doctor: String,
}

impl PatientFields {
    pub fn parse(
        first_name: &str,
        last_name: &str,
        birthday: &str,
        description: &str,
        primary_doctor: &str,
    ) -> Result<Self> {
        Ok(Self {
            first_name: required("firstName", first_name)?,
            last_name: required("lastName", last_name)?,
            birthday: parse_birthday(birthday)?,
            description: required("description", description)?,
            primary_doctor: required("primaryDoctor", primary_doctor)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Parse a birthday from client input.
///
/// Browser clients tend to submit full ISO timestamps
/// (`2001-05-14T00:00:00.000Z`); only the date part is kept.
pub fn parse_birthday(raw: &str) -> Result<Date> {
    let raw = raw.trim();
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    Date::parse(date_part, DATE_FORMAT).map_err(|_| Error::InvalidBirthday(raw.to_string()))
}

/// serde adapter serializing `time::Date` as `YYYY-MM-DD`.
pub mod birthday_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_birthday("1984-03-07").unwrap(), date!(1984 - 03 - 07));
    }

    #[test]
    fn test_parse_iso_timestamp_keeps_date_part() {
        assert_eq!(
            parse_birthday("2001-05-14T00:00:00.000Z").unwrap(),
            date!(2001 - 05 - 14)
        );
        assert_eq!(
            parse_birthday("2001-05-14 13:22:01").unwrap(),
            date!(2001 - 05 - 14)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_birthday("not-a-date"),
            Err(Error::InvalidBirthday(_))
        ));
        assert!(matches!(
            parse_birthday("2020-13-40"),
            Err(Error::InvalidBirthday(_))
        ));
        assert!(parse_birthday("").is_err());
    }

    #[test]
    fn test_fields_require_non_empty_text() {
        let err = PatientFields::parse("", "Doe", "1984-03-07", "checkup", "Dr. Grey");
        assert!(matches!(err, Err(Error::MissingField("firstName"))));

        let err = PatientFields::parse("Jane", "Doe", "1984-03-07", "checkup", "   ");
        assert!(matches!(err, Err(Error::MissingField("primaryDoctor"))));
    }

    #[test]
    fn test_fields_trim_whitespace() {
        let fields =
            PatientFields::parse("  Jane ", "Doe", "1984-03-07", "checkup", "Dr. Grey").unwrap();
        assert_eq!(fields.first_name, "Jane");
    }

    #[test]
    fn test_image_url_derivation() {
        let mut patient = Patient {
            id: 1,
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            birthday: date!(1984 - 03 - 07),
            description: "checkup".into(),
            primary_doctor: "Dr. Grey".into(),
            image_identifier: Some("a1B2c3D4e5F6g7H8".into()),
        };
        assert_eq!(
            patient.image_url("https://img.example.com/"),
            "https://img.example.com/a1B2c3D4e5F6g7H8"
        );

        patient.image_identifier = None;
        assert_eq!(patient.image_url("https://img.example.com/"), "");
    }
}
