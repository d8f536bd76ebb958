use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());
static STREET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s,.'-]{3,}$").unwrap());
static STATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());
static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap());

/// Customer profile fields editable from the details screen.
///
/// Validation mirrors the interactive form: a failing check blocks the
/// mutating call entirely, so the data layer never sees malformed input.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerProfileUpdate {
    #[validate(regex(path = *NAME_RE, message = "first name must contain only letters"))]
    pub first_name: String,

    #[validate(regex(path = *NAME_RE, message = "last name must contain only letters"))]
    pub last_name: String,

    #[validate(email(message = "invalid email address"))]
    pub email: String,

    #[validate(custom(function = validate_phone))]
    pub phone: String,
}

/// Address fields editable alongside the profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddressUpdate {
    #[validate(regex(path = *STREET_RE, message = "invalid street address"))]
    pub street: String,

    #[validate(regex(path = *NAME_RE, message = "city must contain only letters"))]
    pub city: String,

    #[validate(regex(path = *STATE_RE, message = "state must be a two-letter code"))]
    pub state: String,

    #[validate(regex(path = *ZIP_RE, message = "invalid ZIP code"))]
    pub zip_code: String,
}

/// Accepts any formatting as long as exactly ten digits remain after
/// stripping separators.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("phone must contain ten digits".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CustomerProfileUpdate {
        CustomerProfileUpdate {
            first_name: "Jordan".to_string(),
            last_name: "Avery".to_string(),
            email: "jordan.avery@example.com".to_string(),
            phone: "(555) 123-4567".to_string(),
        }
    }

    fn address() -> AddressUpdate {
        AddressUpdate {
            street: "456 New Ave".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(profile().validate().is_ok());
        assert!(address().validate().is_ok());
    }

    #[test]
    fn phone_accepts_formatting_but_requires_ten_digits() {
        let mut p = profile();
        p.phone = "555-123-4567".to_string();
        assert!(p.validate().is_ok());

        p.phone = "12345".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_numeric_name() {
        let mut p = profile();
        p.first_name = "J0rdan".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn state_must_be_two_letter_code() {
        let mut a = address();
        a.state = "Illinois".to_string();
        assert!(a.validate().is_err());
    }

    #[test]
    fn zip_plus_four_accepted() {
        let mut a = address();
        a.zip_code = "62704-1234".to_string();
        assert!(a.validate().is_ok());

        a.zip_code = "627".to_string();
        assert!(a.validate().is_err());
    }
}
