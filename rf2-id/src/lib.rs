//! Shared RF2 identifier and token validation primitives.
//!
//! This crate is the single source of truth for the cell-level formats of the
//! RF2 release format, used by both the `rf2` assembly library and the
//! `rf2-validator` column validators. Nothing here performs I/O.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Minimum number of digits in an SCTID.
pub const SCTID_MIN_LENGTH: usize = 6;

/// Maximum number of digits in an SCTID.
pub const SCTID_MAX_LENGTH: usize = 18;

/// Number of characters in a published effective time (`YYYYMMDD`).
pub const EFFECTIVE_TIME_LENGTH: usize = 8;

/// Token for an active component or member.
pub const STATUS_ACTIVE: &str = "1";

/// Token for an inactive component or member.
pub const STATUS_INACTIVE: &str = "0";

/// Errors from RF2 identifier and token validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rf2IdError {
    /// The value is not a well-formed SNOMED CT identifier.
    #[error("Invalid SCTID '{id}': {cause}")]
    Sctid {
        /// The raw value that failed validation.
        id: String,
        /// Human-readable description of the problem.
        cause: String,
    },

    /// The value is not a well-formed reference set member UUID.
    #[error("Invalid member UUID '{id}': {cause}")]
    Uuid {
        /// The raw value that failed validation.
        id: String,
        /// Human-readable description of the problem.
        cause: String,
    },

    /// The value is not a valid effective time.
    #[error("Invalid effective time '{value}': {cause}")]
    EffectiveTime {
        /// The raw value that failed validation.
        value: String,
        /// Human-readable description of the problem.
        cause: String,
    },

    /// The value is not one of the status tokens.
    #[error("Invalid status '{value}': must be '1' or '0'")]
    Status {
        /// The raw value that failed validation.
        value: String,
    },
}

/// The component kind encoded in the last digit of the partition identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Concept,
    Description,
    Relationship,
}

/// Result of successfully parsing an SCTID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSctid {
    /// The numeric value of the full identifier.
    pub value: u64,
    /// Item identifier digits (everything before the namespace or partition).
    pub item: String,
    /// Seven digit namespace for long format identifiers.
    pub namespace: Option<String>,
    /// Kind of component the identifier refers to.
    pub kind: ComponentKind,
    /// The trailing Verhoeff check digit.
    pub check_digit: u8,
}

impl ParsedSctid {
    /// Whether the identifier uses the long (namespaced) format.
    #[must_use]
    pub fn is_long_format(&self) -> bool {
        self.namespace.is_some()
    }
}

// Verhoeff dihedral group D5 multiplication table.
const VERHOEFF_D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

// Verhoeff position permutation table.
const VERHOEFF_P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

const VERHOEFF_INV: [u8; 10] = [0, 4, 3, 2, 1, 5, 6, 7, 8, 9];

fn digit_values(digits: &str) -> Option<Vec<u8>> {
    digits
        .bytes()
        .map(|b| b.is_ascii_digit().then(|| b - b'0'))
        .collect()
}

/// Compute the Verhoeff check digit for a string of decimal digits.
///
/// Returns `None` if `payload` is empty or contains a non-digit character.
#[must_use]
pub fn verhoeff_check_digit(payload: &str) -> Option<u8> {
    let digits = digit_values(payload)?;
    if digits.is_empty() {
        return None;
    }
    let check = digits
        .iter()
        .rev()
        .enumerate()
        .fold(0u8, |c, (i, &digit)| {
            VERHOEFF_D[usize::from(c)][usize::from(VERHOEFF_P[(i + 1) % 8][usize::from(digit)])]
        });
    Some(VERHOEFF_INV[usize::from(check)])
}

/// Check that the last digit of `digits` is the Verhoeff check digit of the rest.
#[inline]
#[must_use]
pub fn is_valid_verhoeff(digits: &str) -> bool {
    let Some(values) = digit_values(digits) else {
        return false;
    };
    if values.len() < 2 {
        return false;
    }
    let check = values
        .iter()
        .rev()
        .enumerate()
        .fold(0u8, |c, (i, &digit)| {
            VERHOEFF_D[usize::from(c)][usize::from(VERHOEFF_P[i % 8][usize::from(digit)])]
        });
    check == 0
}

/// Validate and parse a SNOMED CT identifier.
///
/// Checks, in order: digits only, length between [`SCTID_MIN_LENGTH`] and
/// [`SCTID_MAX_LENGTH`], no leading zero, a known partition identifier, and the
/// Verhoeff check digit.
///
/// # Errors
/// Returns [`Rf2IdError::Sctid`] describing the first rule the value breaks.
pub fn validate_sctid(id: &str) -> Result<ParsedSctid, Rf2IdError> {
    let fail = |cause: String| Rf2IdError::Sctid {
        id: id.to_owned(),
        cause,
    };

    if id.is_empty() {
        return Err(fail("must not be empty".to_owned()));
    }
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail("must contain only decimal digits".to_owned()));
    }
    if id.len() < SCTID_MIN_LENGTH || id.len() > SCTID_MAX_LENGTH {
        return Err(fail(format!(
            "length must be between {SCTID_MIN_LENGTH} and {SCTID_MAX_LENGTH} digits, got {}",
            id.len()
        )));
    }
    if id.starts_with('0') {
        return Err(fail("must not start with '0'".to_owned()));
    }

    let len = id.len();
    let partition = &id[len - 3..len - 1];
    let (long_format, kind) = match partition {
        "00" => (false, ComponentKind::Concept),
        "01" => (false, ComponentKind::Description),
        "02" => (false, ComponentKind::Relationship),
        "10" => (true, ComponentKind::Concept),
        "11" => (true, ComponentKind::Description),
        "12" => (true, ComponentKind::Relationship),
        _ => return Err(fail(format!("unknown partition identifier '{partition}'"))),
    };

    // Long format carries a seven digit namespace in front of the partition.
    if long_format && len < 3 + 7 + 1 {
        return Err(fail(
            "long format identifier is too short to hold a namespace".to_owned(),
        ));
    }
    let item_end = if long_format { len - 3 - 7 } else { len - 3 };

    if !is_valid_verhoeff(id) {
        return Err(fail("check digit does not match".to_owned()));
    }

    let value = id
        .parse::<u64>()
        .map_err(|e| fail(format!("not a 64-bit integer: {e}")))?;

    Ok(ParsedSctid {
        value,
        item: id[..item_end].to_owned(),
        namespace: long_format.then(|| id[len - 10..len - 3].to_owned()),
        kind,
        check_digit: id.as_bytes()[len - 1] - b'0',
    })
}

/// Validate a reference set member identifier.
///
/// Members are identified by UUIDs in the hyphenated lowercase form.
///
/// # Errors
/// Returns [`Rf2IdError::Uuid`] if the value does not parse or is not hyphenated.
pub fn validate_member_uuid(id: &str) -> Result<Uuid, Rf2IdError> {
    let parsed = Uuid::try_parse(id).map_err(|e| Rf2IdError::Uuid {
        id: id.to_owned(),
        cause: e.to_string(),
    })?;
    if parsed.hyphenated().to_string() != id.to_ascii_lowercase() {
        return Err(Rf2IdError::Uuid {
            id: id.to_owned(),
            cause: "must use the hyphenated 8-4-4-4-12 form".to_owned(),
        });
    }
    Ok(parsed)
}

/// Validate an effective time token.
///
/// An empty value denotes an unpublished row and yields `Ok(None)` when
/// `allow_empty` is set.
///
/// # Errors
/// Returns [`Rf2IdError::EffectiveTime`] if the value is empty but not allowed,
/// is not exactly [`EFFECTIVE_TIME_LENGTH`] ASCII digits, or is not a calendar date.
pub fn validate_effective_time(
    value: &str,
    allow_empty: bool,
) -> Result<Option<NaiveDate>, Rf2IdError> {
    let fail = |cause: &str| Rf2IdError::EffectiveTime {
        value: value.to_owned(),
        cause: cause.to_owned(),
    };

    if value.is_empty() {
        return if allow_empty {
            Ok(None)
        } else {
            Err(fail("must not be empty"))
        };
    }
    if value.len() != EFFECTIVE_TIME_LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail("must be 8 digits in YYYYMMDD format"));
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map(Some)
        .map_err(|_| fail("is not a valid calendar date"))
}

/// Validate a status token, returning whether it denotes an active row.
///
/// # Errors
/// Returns [`Rf2IdError::Status`] for anything but `"1"` or `"0"`.
pub fn validate_status(value: &str) -> Result<bool, Rf2IdError> {
    match value {
        STATUS_ACTIVE => Ok(true),
        STATUS_INACTIVE => Ok(false),
        _ => Err(Rf2IdError::Status {
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // ---- verhoeff ----

    #[test]
    fn test_verhoeff_reference_vectors() {
        assert_eq!(verhoeff_check_digit("236"), Some(3));
        assert_eq!(verhoeff_check_digit("12345"), Some(1));
        assert!(is_valid_verhoeff("2363"));
        assert!(is_valid_verhoeff("123451"));
        assert!(!is_valid_verhoeff("2364"));
    }

    #[test]
    fn test_verhoeff_rejects_non_digits() {
        assert_eq!(verhoeff_check_digit(""), None);
        assert_eq!(verhoeff_check_digit("12a"), None);
        assert!(!is_valid_verhoeff("12a3"));
        assert!(!is_valid_verhoeff("5"));
    }

    #[test]
    fn test_generated_digit_validates() {
        for payload in ["10000", "1000001", "90000000000020700"] {
            let digit = verhoeff_check_digit(payload).unwrap();
            assert!(is_valid_verhoeff(&format!("{payload}{digit}")), "{payload}");
        }
    }

    // ---- validate_sctid ----

    #[test]
    fn test_valid_concept_sctid() {
        let parsed = validate_sctid("100005").unwrap();
        assert_eq!(parsed.value, 100_005);
        assert_eq!(parsed.kind, ComponentKind::Concept);
        assert_eq!(parsed.item, "100");
        assert_eq!(parsed.check_digit, 5);
        assert!(!parsed.is_long_format());
    }

    #[test]
    fn test_valid_metadata_sctids() {
        for id in [
            "900000000000207008",
            "900000000000010007",
            "900000000000011006",
            "73211009",
            "138875005",
            "116680003",
        ] {
            assert!(validate_sctid(id).is_ok(), "{id}");
        }
    }

    #[test]
    fn test_valid_description_and_relationship_sctid() {
        assert_eq!(
            validate_sctid("1000015").unwrap().kind,
            ComponentKind::Description
        );
        assert_eq!(
            validate_sctid("1000027").unwrap().kind,
            ComponentKind::Relationship
        );
    }

    #[test]
    fn test_long_format_sctid_carries_namespace() {
        let payload = "1000000110";
        let id = format!("{payload}{}", verhoeff_check_digit(payload).unwrap());
        let parsed = validate_sctid(&id).unwrap();
        assert_eq!(parsed.namespace.as_deref(), Some("0000001"));
        assert_eq!(parsed.item, "1");
        assert_eq!(parsed.kind, ComponentKind::Concept);
    }

    #[test]
    fn test_sctid_bad_check_digit() {
        let err = validate_sctid("100006").unwrap_err();
        assert!(err.to_string().contains("check digit"), "got: {err}");
    }

    #[test]
    fn test_sctid_format_rules() {
        let cases = [
            ("", "must not be empty"),
            ("12a456", "only decimal digits"),
            ("10005", "length must be between"),
            ("1234567890123456789", "length must be between"),
            ("0100005", "must not start with '0'"),
            ("100095", "unknown partition identifier '09'"),
        ];
        for (id, expected) in cases {
            let err = validate_sctid(id).unwrap_err();
            assert!(err.to_string().contains(expected), "{id}: got {err}");
        }
    }

    // ---- validate_member_uuid ----

    #[test]
    fn test_valid_member_uuid() {
        assert!(validate_member_uuid("80000000-0000-4000-8000-000000000001").is_ok());
    }

    #[test]
    fn test_member_uuid_must_be_hyphenated() {
        let err = validate_member_uuid("80000000000040008000000000000001").unwrap_err();
        assert!(err.to_string().contains("hyphenated"), "got: {err}");
        assert!(validate_member_uuid("not-a-uuid").is_err());
    }

    // ---- validate_effective_time ----

    #[test]
    fn test_effective_time_valid() {
        let date = validate_effective_time("20200131", false).unwrap().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
    }

    #[test]
    fn test_effective_time_empty() {
        assert_eq!(validate_effective_time("", true).unwrap(), None);
        assert!(validate_effective_time("", false).is_err());
    }

    #[test]
    fn test_effective_time_rejects_bad_values() {
        for value in ["2020013", "202001311", "2020-1-31", "20200230", "20201301"] {
            assert!(validate_effective_time(value, true).is_err(), "{value}");
        }
    }

    // ---- validate_status ----

    #[test]
    fn test_status_tokens() {
        assert!(validate_status("1").unwrap());
        assert!(!validate_status("0").unwrap());
        assert_eq!(
            validate_status("true").unwrap_err(),
            Rf2IdError::Status {
                value: "true".to_owned()
            }
        );
    }
}
