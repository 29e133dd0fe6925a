//! Business rules applied to a QSO before it is persisted
//!
//! Rules run in a fixed order and stop at the first failure, so the order
//! decides which message a caller sees when several rules are broken:
//!
//! 1. the record is present
//! 2. the callsign has at least three characters
//! 3. a start time is given and parses as a timestamp
//! 4. the mode is one of the known modes
//! 5. a band or a frequency is given
//! 6. when both are given, the frequency lies inside the band

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::ReferenceConfig;
use crate::types::Qso;
use crate::{Error, Result};

const MIN_CALLSIGN_LEN: usize = 3;
const MISSING_RECORD: &str = "QSO data is required.";

/// A broken business rule, carrying the message shown to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description of the failed rule
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Inclusive frequency range of a band, in MHz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    /// Lower edge
    pub min_mhz: f64,
    /// Upper edge
    pub max_mhz: f64,
}

impl BandRange {
    /// Whether `freq_mhz` lies within the range, edges included
    #[must_use]
    pub fn contains(&self, freq_mhz: f64) -> bool {
        (self.min_mhz..=self.max_mhz).contains(&freq_mhz)
    }
}

/// QSO validator over immutable band and mode tables
///
/// Lookups are case-insensitive: labels are stored upper-cased.
#[derive(Debug, Clone)]
pub struct Validator {
    modes: BTreeSet<String>,
    bands: BTreeMap<String, BandRange>,
    modes_message: String,
}

impl Default for Validator {
    fn default() -> Self {
        // The canonical tables are well-formed, so building cannot fail.
        Self::from_tables(&ReferenceConfig::default())
    }
}

impl Validator {
    /// Start an empty builder
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Build a validator from configured reference tables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a table is malformed.
    pub fn from_config(reference: &ReferenceConfig) -> Result<Self> {
        let mut builder = Self::builder().modes(reference.modes.iter().map(String::as_str));
        for band in &reference.bands {
            builder = builder.band(&band.label, band.min_mhz, band.max_mhz);
        }
        builder.build()
    }

    fn from_tables(reference: &ReferenceConfig) -> Self {
        let modes: BTreeSet<String> = reference.modes.iter().map(|m| normalize(m)).collect();
        let bands = reference
            .bands
            .iter()
            .map(|b| {
                (
                    normalize(&b.label),
                    BandRange {
                        min_mhz: b.min_mhz,
                        max_mhz: b.max_mhz,
                    },
                )
            })
            .collect();
        Self::assemble(modes, bands)
    }

    fn assemble(modes: BTreeSet<String>, bands: BTreeMap<String, BandRange>) -> Self {
        let list = modes.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
        Self {
            modes,
            bands,
            modes_message: format!("Invalid or missing Mode. Valid modes are: {list}."),
        }
    }

    /// Whether `mode` is a known mode, ignoring case
    #[must_use]
    pub fn is_known_mode(&self, mode: &str) -> bool {
        self.modes.contains(&normalize(mode))
    }

    /// Frequency range of `band`, ignoring case
    #[must_use]
    pub fn band_range(&self, band: &str) -> Option<BandRange> {
        self.bands.get(&normalize(band)).copied()
    }

    /// Known modes in sorted order
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.modes.iter().map(String::as_str)
    }

    /// Check `qso` against the business rules
    ///
    /// `None` stands for a request that carried no record at all.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self, qso: Option<&Qso>) -> std::result::Result<(), ValidationError> {
        let Some(qso) = qso else {
            return Err(ValidationError::new(MISSING_RECORD));
        };

        let callsign_len = qso.callsign.as_deref().map_or(0, |c| c.trim().chars().count());
        if callsign_len < MIN_CALLSIGN_LEN {
            return Err(ValidationError::new(
                "Callsign must be 3 or more characters long.",
            ));
        }

        if qso.started_at().is_none() {
            return Err(ValidationError::new("DateTime is a mandatory field."));
        }

        match non_blank(qso.mode.as_deref()) {
            Some(mode) if self.is_known_mode(mode) => {}
            _ => return Err(ValidationError::new(self.modes_message.clone())),
        }

        let band = non_blank(qso.band.as_deref());
        match (band, qso.freq) {
            (None, None) => Err(ValidationError::new(
                "Either 'Band' or 'Freq' must be present.",
            )),
            (Some(band), Some(freq)) => self.check_band_frequency(band, freq),
            _ => Ok(()),
        }
    }

    /// Check `qso` and hand it back when every rule passes
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validated(&self, qso: Option<Qso>) -> std::result::Result<Qso, ValidationError> {
        self.validate(qso.as_ref())?;
        qso.ok_or_else(|| ValidationError::new(MISSING_RECORD))
    }

    fn check_band_frequency(&self, band: &str, freq: f64) -> std::result::Result<(), ValidationError> {
        let Some(range) = self.band_range(band) else {
            return Err(ValidationError::new(
                "Invalid 'Band' value. Cannot validate against frequency.",
            ));
        };

        // A non-positive frequency is treated as unset and skips the range check.
        if freq > 0.0 && !range.contains(freq) {
            return Err(ValidationError::new(format!(
                "Frequency '{freq}' does not match the specified Band '{band}'. \
                 It should be within the range {}-{} MHz.",
                range.min_mhz, range.max_mhz
            )));
        }

        Ok(())
    }
}

/// Collects reference tables for a [`Validator`]
#[derive(Debug, Clone, Default)]
pub struct ValidatorBuilder {
    modes: Vec<String>,
    bands: Vec<(String, f64, f64)>,
}

impl ValidatorBuilder {
    /// Add one known mode
    #[must_use]
    pub fn mode(mut self, mode: &str) -> Self {
        self.modes.push(mode.to_string());
        self
    }

    /// Add several known modes
    #[must_use]
    pub fn modes<'a>(mut self, modes: impl IntoIterator<Item = &'a str>) -> Self {
        self.modes.extend(modes.into_iter().map(str::to_string));
        self
    }

    /// Add a band and its inclusive range in MHz
    #[must_use]
    pub fn band(mut self, label: &str, min_mhz: f64, max_mhz: f64) -> Self {
        self.bands.push((label.to_string(), min_mhz, max_mhz));
        self
    }

    /// Finish the validator
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the mode set is empty, a label is
    /// blank or duplicated, or a range is not finite or has `min > max`.
    pub fn build(self) -> Result<Validator> {
        let mut modes = BTreeSet::new();
        for mode in &self.modes {
            let key = normalize(mode);
            if key.is_empty() {
                return Err(config_error("mode labels must not be blank"));
            }
            modes.insert(key);
        }
        if modes.is_empty() {
            return Err(config_error("at least one mode must be configured"));
        }

        let mut bands = BTreeMap::new();
        for (label, min_mhz, max_mhz) in self.bands {
            let key = normalize(&label);
            if key.is_empty() {
                return Err(config_error("band labels must not be blank"));
            }
            if !min_mhz.is_finite() || !max_mhz.is_finite() || min_mhz > max_mhz {
                return Err(config_error(format!(
                    "band {label} has an invalid range {min_mhz}-{max_mhz}"
                )));
            }
            let range = BandRange { min_mhz, max_mhz };
            if bands.insert(key, range).is_some() {
                return Err(config_error(format!("band {label} is defined twice")));
            }
        }

        Ok(Validator::assemble(modes, bands))
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_uppercase()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Configuration {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BandConfig;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn valid_qso() -> Qso {
        Qso {
            callsign: Some("W1AW".to_string()),
            date_time: Some("2025-09-15T12:00:00Z".to_string()),
            mode: Some("SSB".to_string()),
            band: Some("20M".to_string()),
            freq: Some(14.25),
            ..Qso::default()
        }
    }

    fn message(result: std::result::Result<(), ValidationError>) -> String {
        result.expect_err("validation should fail").message().to_string()
    }

    #[test]
    fn test_valid_qso_passes() {
        let validator = Validator::default();
        assert_eq!(validator.validate(Some(&valid_qso())), Ok(()));
    }

    #[test]
    fn test_absent_record() {
        let validator = Validator::default();
        assert_eq!(message(validator.validate(None)), "QSO data is required.");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[case(Some("W1"))]
    #[case(Some("  K9  "))]
    fn test_short_callsign(#[case] callsign: Option<&str>) {
        let qso = Qso {
            callsign: callsign.map(str::to_string),
            ..valid_qso()
        };

        assert_eq!(
            message(Validator::default().validate(Some(&qso))),
            "Callsign must be 3 or more characters long."
        );
    }

    #[test]
    fn test_callsign_checked_before_other_rules() {
        let qso = Qso {
            callsign: Some("AB".to_string()),
            date_time: None,
            mode: None,
            band: None,
            freq: None,
            ..Qso::default()
        };

        assert_eq!(
            message(Validator::default().validate(Some(&qso))),
            "Callsign must be 3 or more characters long."
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  "))]
    #[case(Some("yesterday"))]
    #[case(Some("2025-13-40T25:00:00Z"))]
    fn test_missing_datetime(#[case] date_time: Option<&str>) {
        let qso = Qso {
            date_time: date_time.map(str::to_string),
            ..valid_qso()
        };

        assert_eq!(
            message(Validator::default().validate(Some(&qso))),
            "DateTime is a mandatory field."
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("OLIVIA"))]
    #[case(Some("FT-8"))]
    fn test_unknown_mode(#[case] mode: Option<&str>) {
        let qso = Qso {
            mode: mode.map(str::to_string),
            band: None,
            freq: None,
            ..valid_qso()
        };

        assert_eq!(
            message(Validator::default().validate(Some(&qso))),
            "Invalid or missing Mode. Valid modes are: AM, C4FM, CW, D-STAR, DMR, FM, FT8, JS8, \
             JT65, PSK31, RTTY, SSB, SSTV."
        );
    }

    #[rstest]
    #[case("ssb")]
    #[case("Ft8")]
    #[case("d-star")]
    #[case(" cw ")]
    fn test_mode_is_case_insensitive(#[case] mode: &str) {
        let qso = Qso {
            mode: Some(mode.to_string()),
            ..valid_qso()
        };

        assert_eq!(Validator::default().validate(Some(&qso)), Ok(()));
    }

    #[test]
    fn test_band_or_freq_required() {
        let qso = Qso {
            band: Some("  ".to_string()),
            freq: None,
            ..valid_qso()
        };

        assert_eq!(
            message(Validator::default().validate(Some(&qso))),
            "Either 'Band' or 'Freq' must be present."
        );
    }

    #[rstest]
    #[case(Some("40m"), None)]
    #[case(Some("600M"), None)]
    #[case(None, Some(7.074))]
    #[case(None, Some(-1.0))]
    fn test_band_or_freq_alone_passes(#[case] band: Option<&str>, #[case] freq: Option<f64>) {
        let qso = Qso {
            band: band.map(str::to_string),
            freq,
            ..valid_qso()
        };

        assert_eq!(Validator::default().validate(Some(&qso)), Ok(()));
    }

    #[test]
    fn test_unknown_band_with_freq() {
        let qso = Qso {
            band: Some("60M".to_string()),
            freq: Some(5.357),
            ..valid_qso()
        };

        assert_eq!(
            message(Validator::default().validate(Some(&qso))),
            "Invalid 'Band' value. Cannot validate against frequency."
        );
    }

    #[rstest]
    #[case("20M", 14.1)]
    #[case("20m", 14.0)]
    #[case("20M", 14.35)]
    #[case("70cm", 432.1)]
    #[case("17M", 18.123)]
    fn test_freq_inside_band(#[case] band: &str, #[case] freq: f64) {
        let qso = Qso {
            band: Some(band.to_string()),
            freq: Some(freq),
            ..valid_qso()
        };

        assert_eq!(Validator::default().validate(Some(&qso)), Ok(()));
    }

    #[test]
    fn test_freq_outside_band() {
        let qso = Qso {
            band: Some("20M".to_string()),
            freq: Some(30.0),
            ..valid_qso()
        };

        assert_eq!(
            message(Validator::default().validate(Some(&qso))),
            "Frequency '30' does not match the specified Band '20M'. \
             It should be within the range 14-14.35 MHz."
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(-14.1)]
    fn test_non_positive_freq_skips_range_check(#[case] freq: f64) {
        let qso = Qso {
            band: Some("20M".to_string()),
            freq: Some(freq),
            ..valid_qso()
        };

        assert_eq!(Validator::default().validate(Some(&qso)), Ok(()));
    }

    #[test]
    fn test_builder_with_alternate_tables() {
        let validator = Validator::builder()
            .mode("ft4")
            .band("60m", 5.3, 5.4)
            .band("70CM", 420.0, 450.0)
            .build()
            .expect("tables are valid");

        let qso = Qso {
            mode: Some("FT4".to_string()),
            band: Some("60M".to_string()),
            freq: Some(5.357),
            ..valid_qso()
        };
        assert_eq!(validator.validate(Some(&qso)), Ok(()));

        let wide_uhf = Qso {
            band: Some("70cm".to_string()),
            freq: Some(425.0),
            ..qso.clone()
        };
        assert_eq!(validator.validate(Some(&wide_uhf)), Ok(()));

        let default_mode = Qso {
            mode: Some("SSB".to_string()),
            ..qso
        };
        assert_eq!(
            message(validator.validate(Some(&default_mode))),
            "Invalid or missing Mode. Valid modes are: FT4."
        );
    }

    #[rstest]
    #[case(Validator::builder())]
    #[case(Validator::builder().mode("  "))]
    #[case(Validator::builder().mode("CW").band("", 1.0, 2.0))]
    #[case(Validator::builder().mode("CW").band("20M", 14.35, 14.0))]
    #[case(Validator::builder().mode("CW").band("20M", f64::NAN, 14.0))]
    #[case(Validator::builder().mode("CW").band("20M", 14.0, 14.35).band("20m", 14.0, 14.35))]
    fn test_builder_rejects_malformed_tables(#[case] builder: ValidatorBuilder) {
        assert!(matches!(builder.build(), Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_from_config_matches_default() {
        let from_config =
            Validator::from_config(&ReferenceConfig::default()).expect("default tables are valid");
        let default = Validator::default();

        assert_eq!(from_config.modes().collect::<Vec<_>>(), default.modes().collect::<Vec<_>>());
        assert_eq!(from_config.band_range("20m"), default.band_range("20M"));
    }

    #[test]
    fn test_from_config_rejects_inverted_band() {
        let reference = ReferenceConfig {
            modes: vec!["CW".to_string()],
            bands: vec![BandConfig {
                label: "40M".to_string(),
                min_mhz: 7.3,
                max_mhz: 7.0,
            }],
        };

        assert!(Validator::from_config(&reference).is_err());
    }

    proptest! {
        #[test]
        fn prop_short_callsign_always_fails(
            callsign in "[A-Z0-9]{0,2}",
            pad in " {0,3}",
            mode in proptest::option::of("[A-Z]{1,5}"),
            freq in proptest::option::of(-10.0f64..500.0),
        ) {
            let qso = Qso {
                callsign: Some(format!("{pad}{callsign}{pad}")),
                mode,
                freq,
                ..valid_qso()
            };
            let result = Validator::default().validate(Some(&qso));
            prop_assert_eq!(
                result.map_err(|e| e.message().to_string()),
                Err("Callsign must be 3 or more characters long.".to_string())
            );
        }

        #[test]
        fn prop_missing_or_unparsable_datetime_always_fails(
            callsign in "[A-Z0-9]{3,8}",
            date_time in proptest::option::of("[a-z ]{0,12}"),
        ) {
            let qso = Qso {
                callsign: Some(callsign),
                date_time,
                ..valid_qso()
            };
            let result = Validator::default().validate(Some(&qso));
            prop_assert_eq!(
                result.map_err(|e| e.message().to_string()),
                Err("DateTime is a mandatory field.".to_string())
            );
        }

        #[test]
        fn prop_unknown_mode_fails_regardless_of_band(
            mode in "[A-Z]{6,10}",
            band in proptest::option::of("(20M|40M|BOGUS)"),
            freq in proptest::option::of(0.0f64..500.0),
        ) {
            let qso = Qso { mode: Some(mode), band, freq, ..valid_qso() };
            let result = Validator::default().validate(Some(&qso));
            prop_assert!(result.is_err());
            prop_assert!(result.unwrap_err().message().starts_with("Invalid or missing Mode."));
        }

        #[test]
        fn prop_validate_is_idempotent(freq in proptest::option::of(-5.0f64..500.0)) {
            let validator = Validator::default();
            let qso = Qso { freq, ..valid_qso() };
            let before = qso.clone();
            prop_assert_eq!(validator.validate(Some(&qso)), validator.validate(Some(&qso)));
            prop_assert_eq!(qso, before);
        }
    }
}
