//! Cell encodings used by the flat-file store.
//!
//! Stored rows are plain strings: flags are `Yes`/`No`, liked and skipped pets
//! are comma-joined id lists, sizes are free text. Everything is decoded to
//! proper types here and encoded back the same way. Malformed cells degrade
//! to safe defaults instead of failing the row.

use crate::models::{ActivityLevel, Gender, PetIdSet, PreferredGender};
use thiserror::Error;

/// Separator for id lists
pub const ID_LIST_SEPARATOR: char = ',';

/// Minimum number of digits in a shelter phone number
pub const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed exclusion field: {0:?}")]
    MalformedExclusionField(String),

    #[error("Phone number must be at least 10 digits and contain only numbers: {0:?}")]
    InvalidPhone(String),
}

pub fn parse_flag(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case("yes")
}

pub fn format_flag(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn parse_activity_level(cell: &str) -> ActivityLevel {
    match cell.trim().to_ascii_lowercase().as_str() {
        "low" => ActivityLevel::Low,
        "medium" => ActivityLevel::Medium,
        "high" => ActivityLevel::High,
        _ => ActivityLevel::Unspecified,
    }
}

pub fn parse_gender(cell: &str) -> Gender {
    match cell.trim().to_ascii_lowercase().as_str() {
        "male" => Gender::Male,
        "female" => Gender::Female,
        _ => Gender::Unspecified,
    }
}

pub fn parse_preferred_gender(cell: &str) -> Option<PreferredGender> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "male" => Some(PreferredGender::Male),
        "female" => Some(PreferredGender::Female),
        "any" => Some(PreferredGender::Any),
        _ => None,
    }
}

/// Parse a non-negative number, falling back to zero.
///
/// Used for apartment sizes and ages. Blank, unparseable, negative and
/// non-finite values all read as 0.
pub fn parse_non_negative(cell: &str) -> f64 {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => {
            tracing::debug!("Treating unparseable number {:?} as 0", trimmed);
            0.0
        }
    }
}

/// Ids are free text; only control characters (line breaks, NUL and the
/// like) can never be part of one.
fn is_valid_pet_id(token: &str) -> bool {
    !token.chars().any(char::is_control)
}

/// Non-empty, trimmed segments of a comma-joined cell
fn id_tokens(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(ID_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Decode a comma-joined id list
///
/// Each segment is trimmed, so `"PET1, PET2"` holds `PET1` and `PET2`.
/// Empty segments (`"PET1,,PET2"`, trailing commas) are skipped. Any other
/// comma-free text is an id. A segment containing control characters makes
/// the field malformed.
pub fn decode_id_list(cell: &str) -> Result<PetIdSet, CodecError> {
    let mut ids = PetIdSet::new();
    for token in id_tokens(cell) {
        if !is_valid_pet_id(token) {
            return Err(CodecError::MalformedExclusionField(cell.to_string()));
        }
        ids.insert(token);
    }
    Ok(ids)
}

/// Decode an id list, dropping malformed segments and keeping the rest
pub fn decode_id_list_lossy(cell: &str, field: &str, owner_id: &str) -> PetIdSet {
    let mut ids = PetIdSet::new();
    for token in id_tokens(cell) {
        if is_valid_pet_id(token) {
            ids.insert(token);
        } else {
            tracing::warn!(
                "Ignoring {} entry {:?} for {}: {}",
                field,
                token,
                owner_id,
                CodecError::MalformedExclusionField(token.to_string())
            );
        }
    }
    ids
}

pub fn encode_id_list(ids: &PetIdSet) -> String {
    ids.iter().collect::<Vec<_>>().join(",")
}

pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Strip `+` and spaces from a phone number and check it is all digits
pub fn normalize_phone(raw: &str) -> Result<String, CodecError> {
    let phone: String = raw.chars().filter(|c| *c != '+' && *c != ' ').collect();
    if phone.len() < MIN_PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(CodecError::InvalidPhone(raw.to_string()));
    }
    Ok(phone)
}

/// Generate a record id such as `PET3FA9C1`
pub fn generate_id(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, hex[..6].to_uppercase())
}
