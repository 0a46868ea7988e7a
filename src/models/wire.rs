use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{
    de::{self, SeqAccess, Visitor},
    ser::SerializeTuple,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Server-assigned identifier. The API may hand out numbers or strings, so
/// both are kept in the shape they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(value) => write!(f, "{value}"),
            RecordId::Text(value) => f.write_str(value),
        }
    }
}

impl RecordId {
    /// Reads an id out of a URL segment. Only canonical digit strings
    /// (no sign, no leading zero) become `Int`, so `"007"` stays text.
    pub fn parse(raw: &str) -> Self {
        let canonical = raw == "0"
            || (!raw.is_empty()
                && !raw.starts_with('0')
                && raw.bytes().all(|b| b.is_ascii_digit()));
        canonical
            .then(|| raw.parse::<i64>().ok())
            .flatten()
            .map(RecordId::Int)
            .unwrap_or_else(|| RecordId::Text(raw.to_string()))
    }
}

impl FromStr for RecordId {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(RecordId::parse(raw))
    }
}

/// Instant as the API encodes it: `[year, month, day, hour, minute]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireDateTime {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

impl WireDateTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
        })
    }

    /// Calendar month, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn to_naive(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, 0))
            .unwrap_or_default()
    }

    pub fn display(&self) -> String {
        self.to_naive().format("%d.%m.%Y %H:%M").to_string()
    }
}

impl Serialize for WireDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(5)?;
        tuple.serialize_element(&self.year)?;
        tuple.serialize_element(&self.month)?;
        tuple.serialize_element(&self.day)?;
        tuple.serialize_element(&self.hour)?;
        tuple.serialize_element(&self.minute)?;
        tuple.end()
    }
}

struct WireDateTimeVisitor;

impl<'de> Visitor<'de> for WireDateTimeVisitor {
    type Value = WireDateTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array [year, month, day, hour, minute]")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let year: i32 = seq
            .next_element()?
            .ok_or_else(|| <A::Error as de::Error>::invalid_length(0, &self))?;
        let mut rest = [0u32; 4];
        for (index, slot) in rest.iter_mut().enumerate() {
            *slot = seq
                .next_element()?
                .ok_or_else(|| <A::Error as de::Error>::invalid_length(index + 1, &self))?;
        }
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(6, &self));
        }
        let [month, day, hour, minute] = rest;
        WireDateTime::new(year, month, day, hour, minute).ok_or_else(|| {
            de::Error::custom(format!(
                "no such instant: [{year}, {month}, {day}, {hour}, {minute}]"
            ))
        })
    }
}

impl<'de> Deserialize<'de> for WireDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(WireDateTimeVisitor)
    }
}

/// The `datetime-local` text the create endpoint accepts, `YYYY-MM-DDTHH:MM`.
pub mod datetime_local {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M";

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid datetime-local value {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_five_element_array_and_writes_it_back() {
        let decoded: WireDateTime = serde_json::from_str("[2024, 6, 1, 9, 0]").expect("decode");
        assert_eq!(decoded.month(), 6);
        assert_eq!(decoded.display(), "01.06.2024 09:00");
        assert_eq!(serde_json::to_string(&decoded).expect("encode"), "[2024,6,1,9,0]");
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(serde_json::from_str::<WireDateTime>("[2024, 6, 1, 9]").is_err());
        assert!(serde_json::from_str::<WireDateTime>("[2024, 6, 1, 9, 0, 30]").is_err());
        assert!(serde_json::from_str::<WireDateTime>("\"2024-06-01T09:00\"").is_err());
    }

    #[test]
    fn rejects_impossible_calendar_values() {
        assert!(serde_json::from_str::<WireDateTime>("[2024, 13, 1, 9, 0]").is_err());
        assert!(serde_json::from_str::<WireDateTime>("[2023, 2, 29, 9, 0]").is_err());
        assert!(serde_json::from_str::<WireDateTime>("[2024, 2, 29, 24, 0]").is_err());
    }

    #[test]
    fn record_ids_keep_their_json_shape() {
        let numeric: RecordId = serde_json::from_str("7").expect("number id");
        let textual: RecordId = serde_json::from_str("\"a7\"").expect("string id");
        assert_eq!(numeric, RecordId::Int(7));
        assert_eq!(serde_json::to_string(&numeric).expect("encode"), "7");
        assert_eq!(serde_json::to_string(&textual).expect("encode"), "\"a7\"");
        assert_eq!("7".parse::<RecordId>(), Ok(RecordId::Int(7)));
        assert_eq!("a7".parse::<RecordId>(), Ok(RecordId::Text("a7".into())));
    }

    #[test]
    fn only_canonical_digits_become_numeric_ids() {
        assert_eq!(RecordId::parse("0"), RecordId::Int(0));
        assert_eq!(RecordId::parse("42"), RecordId::Int(42));
        assert_eq!(RecordId::parse("007"), RecordId::Text("007".into()));
        assert_eq!(RecordId::parse("-1"), RecordId::Text("-1".into()));
        assert_eq!(RecordId::parse("+5"), RecordId::Text("+5".into()));
        assert_eq!(RecordId::parse(""), RecordId::Text(String::new()));
        assert_eq!(
            RecordId::parse("99999999999999999999"),
            RecordId::Text("99999999999999999999".into())
        );
        assert_eq!(RecordId::parse("007").to_string(), "007");
    }

    #[test]
    fn datetime_local_accepts_optional_seconds() {
        let minutes = datetime_local::parse("2024-08-01T10:00").expect("minutes");
        let seconds = datetime_local::parse("2024-08-01T10:00:00").expect("seconds");
        assert_eq!(minutes, seconds);
        assert!(datetime_local::parse("01.08.2024").is_none());
    }
}
