//! Core data types for hamlog

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// QSO identifier type, assigned by storage
pub type QsoId = i64;

/// A logged radio contact as exchanged with API clients
///
/// Field names serialize in camelCase. `date_time` and `date_time_off` accept
/// either an ISO-8601 string or epoch seconds on input; epoch values are
/// normalised to an RFC 3339 UTC string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qso {
    /// Storage-assigned identifier; `None` until the record is created
    #[serde(default)]
    pub id: Option<QsoId>,

    /// Contacted station's callsign
    #[serde(default)]
    pub callsign: Option<String>,

    /// When the contact started
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub date_time: Option<String>,

    /// When the contact ended
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub date_time_off: Option<String>,

    /// Transmission mode, e.g. `FT8`
    #[serde(default)]
    pub mode: Option<String>,

    /// Band label, e.g. `20M`
    #[serde(default)]
    pub band: Option<String>,

    /// Receive band label for split contacts
    #[serde(default)]
    pub band_rx: Option<String>,

    /// Transmit frequency in MHz
    #[serde(default)]
    pub freq: Option<f64>,

    /// Receive frequency in MHz
    #[serde(default)]
    pub freq_rx: Option<f64>,

    /// Contacted operator's name
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form comment
    #[serde(default)]
    pub comment: Option<String>,
    /// Contacted station's continent
    #[serde(default)]
    pub continent: Option<String>,
    /// Contacted station's country
    #[serde(default)]
    pub country: Option<String>,
    /// Contacted station's CQ zone
    #[serde(default)]
    pub cq_zone: Option<String>,
    /// Distance to the contacted station in km
    #[serde(default)]
    pub distance: Option<i32>,
    /// Contacted station's DXCC entity code
    #[serde(default)]
    pub dxcc: Option<String>,
    /// Contacted operator's email address
    #[serde(default)]
    pub email: Option<String>,
    /// Contacted station's Maidenhead locator
    #[serde(default)]
    pub gridsquare: Option<String>,
    /// Contacted station's ITU zone
    #[serde(default)]
    pub itu_zone: Option<String>,
    /// Contacted station's latitude
    #[serde(default)]
    pub lat: Option<String>,
    /// Contacted station's longitude
    #[serde(default)]
    pub lon: Option<String>,

    /// Logging station's city
    #[serde(default)]
    pub my_city: Option<String>,
    /// Logging station's country
    #[serde(default)]
    pub my_country: Option<String>,
    /// Logging station's CQ zone
    #[serde(default)]
    pub my_cq_zone: Option<String>,
    /// Logging station's Maidenhead locator
    #[serde(default)]
    pub my_gridsquare: Option<String>,
    /// Logging station's ITU zone
    #[serde(default)]
    pub my_itu_zone: Option<String>,
    /// Logging station's latitude
    #[serde(default)]
    pub my_lat: Option<String>,
    /// Logging station's longitude
    #[serde(default)]
    pub my_lon: Option<String>,
    /// Logging operator's name
    #[serde(default)]
    pub my_name: Option<String>,

    /// Callsign of the operator who made the contact
    #[serde(default)]
    pub operator: Option<String>,
    /// QSL received status
    #[serde(default)]
    pub qsl_rcvd: Option<String>,
    /// QSL sent status
    #[serde(default)]
    pub qsl_sent: Option<String>,
    /// QSL routing
    #[serde(default)]
    pub qsl_via: Option<String>,
    /// Contacted station's location
    #[serde(default)]
    pub qth: Option<String>,
    /// Signal report received
    #[serde(default)]
    pub rst_rcvd: Option<String>,
    /// Signal report sent
    #[serde(default)]
    pub rst_sent: Option<String>,
    /// Callsign used on air by the logging station
    #[serde(default)]
    pub station_callsign: Option<String>,
}

impl Qso {
    /// Parsed start time
    ///
    /// Accepts RFC 3339 and offset-less ISO-8601 values; the latter are read
    /// as UTC.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.date_time.as_deref().and_then(parse_timestamp)
    }
}

/// Parse an ISO-8601 timestamp, treating values without an offset as UTC
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    EpochSeconds(i64),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawTimestamp>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawTimestamp::Text(text)) => Ok(Some(text)),
        Some(RawTimestamp::EpochSeconds(secs)) => DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true)))
            .ok_or_else(|| serde::de::Error::custom(format!("epoch seconds out of range: {secs}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_camel_case_wire_names() {
        let qso = Qso {
            id: Some(7),
            callsign: Some("W1AW".to_string()),
            date_time_off: Some("2025-09-15T12:05:00Z".to_string()),
            cq_zone: Some("5".to_string()),
            my_cq_zone: Some("14".to_string()),
            station_callsign: Some("U2ABC".to_string()),
            freq_rx: Some(14.2),
            ..Qso::default()
        };

        let json = serde_json::to_value(&qso).expect("qso serializes");

        assert_eq!(json["id"], 7);
        assert_eq!(json["callsign"], "W1AW");
        assert_eq!(json["dateTimeOff"], "2025-09-15T12:05:00Z");
        assert_eq!(json["cqZone"], "5");
        assert_eq!(json["myCqZone"], "14");
        assert_eq!(json["stationCallsign"], "U2ABC");
        assert_eq!(json["freqRx"], 14.2);
        assert!(json.get("cq_zone").is_none());
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let qso: Qso = serde_json::from_str(r#"{"callsign": "K9AT"}"#).expect("sparse qso parses");

        assert_eq!(qso.callsign.as_deref(), Some("K9AT"));
        assert!(qso.id.is_none());
        assert!(qso.date_time.is_none());
        assert!(qso.freq.is_none());
    }

    #[test]
    fn test_iso_timestamp_is_kept_verbatim() {
        let qso: Qso = serde_json::from_str(r#"{"dateTime": "2025-09-15T12:00:00.0000000"}"#)
            .expect("iso timestamp parses");

        assert_eq!(qso.date_time.as_deref(), Some("2025-09-15T12:00:00.0000000"));
    }

    #[test]
    fn test_epoch_timestamp_is_normalised() {
        let qso: Qso = serde_json::from_str(r#"{"dateTime": 1757937600, "dateTimeOff": null}"#)
            .expect("epoch timestamp parses");

        assert_eq!(qso.date_time.as_deref(), Some("2025-09-15T12:00:00Z"));
        assert!(qso.date_time_off.is_none());
    }

    #[test]
    fn test_started_at_parses_rfc3339() {
        let qso = Qso {
            date_time: Some("2025-09-15T14:00:00+02:00".to_string()),
            ..Qso::default()
        };
        let expected = DateTime::parse_from_rfc3339("2025-09-15T12:00:00Z")
            .expect("valid literal")
            .with_timezone(&Utc);

        assert_eq!(qso.started_at(), Some(expected));

        let local = Qso {
            date_time: Some("2025-09-15T12:00:00.0000000".to_string()),
            ..Qso::default()
        };
        assert_eq!(local.started_at(), Some(expected));

        let unparsable = Qso {
            date_time: Some("yesterday".to_string()),
            ..Qso::default()
        };
        assert!(unparsable.started_at().is_none());
    }
}
