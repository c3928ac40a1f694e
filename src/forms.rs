// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Validation schemas for dashboard forms.
//!
//! Handlers call `validate()` before anything is sent to the gateway, so the
//! backend only ever sees well-formed requests.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

/// Up to six concatenated 153-character GSM segments.
pub const MAX_SMS_LENGTH: u64 = 918;

#[derive(Deserialize, Serialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 100, message = "Name is required (100 characters max)"))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(email(message = "Enter a valid email address"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct GroupForm {
    #[validate(length(min = 1, max = 50, message = "Group name is required (50 characters max)"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SendSmsForm {
    #[validate(
        length(min = 1, max = 1000, message = "Between 1 and 1000 recipients"),
        custom(function = "validate_recipients")
    )]
    pub recipients: Vec<String>,
    #[validate(length(min = 1, max = MAX_SMS_LENGTH, message = "Message must be 1 to 918 characters"))]
    pub message: String,
    /// Alphanumeric sender name shown on handsets
    #[validate(length(min = 1, max = 11, message = "Sender name is 1 to 11 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

/// `+` optional, then 8 to 15 digits. Spaces and dashes are ignored.
pub fn is_valid_phone(raw: &str) -> bool {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message(Cow::Borrowed("Enter a phone number with 8 to 15 digits")))
    }
}

fn validate_recipients(recipients: &[String]) -> Result<(), ValidationError> {
    match recipients.iter().find(|r| !is_valid_phone(r)) {
        None => Ok(()),
        Some(bad) => {
            let mut err = ValidationError::new("phone")
                .with_message(Cow::Borrowed("Every recipient must be a valid phone number"));
            err.add_param(Cow::Borrowed("value"), bad);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_numbers() {
        assert!(is_valid_phone("+221 77 000 00 00"));
        assert!(is_valid_phone("0612345678"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+2217700000000000"));
        assert!(!is_valid_phone("06-12-ab-56-78"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_login_form() {
        let ok = LoginForm {
            email: "user@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = LoginForm {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_send_sms_form() {
        let mut form = SendSmsForm {
            recipients: vec!["+221770000000".to_string()],
            message: "Bonjour".to_string(),
            sender: Some("MYSHOP".to_string()),
        };
        assert!(form.validate().is_ok());

        form.recipients.push("nope".to_string());
        assert!(form.validate().is_err());

        form.recipients = vec![];
        assert!(form.validate().is_err());

        form.recipients = vec!["+221770000000".to_string()];
        form.message = "x".repeat(MAX_SMS_LENGTH as usize + 1);
        assert!(form.validate().is_err());

        form.message = "ok".to_string();
        form.sender = Some("TWELVE_CHARS".to_string());
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_contact_form() {
        let form = ContactForm {
            name: "Awa".to_string(),
            phone: "+221770000000".to_string(),
            email: None,
            group_ids: vec![],
        };
        assert!(form.validate().is_ok());

        let form = ContactForm {
            name: String::new(),
            phone: "123".to_string(),
            email: Some("bad".to_string()),
            group_ids: vec![],
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }
}
