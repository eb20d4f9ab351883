use lazy_static::lazy_static;
use regex::Regex;
use time::{macros::format_description, Date};

use crate::error::FieldErrors;
use crate::leads::{
    dto::{CreateLeadRequest, UpdateLeadRequest},
    repo_types::{Attribution, LeadPatch, NewLead},
};

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid");
    }
    EMAIL_RE.is_match(email)
}

fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Area code plus an 8 or 9 digit number.
pub fn is_valid_phone(phone: &str) -> bool {
    matches!(phone_digits(phone).len(), 10 | 11)
}

/// Renders a phone number as `(DD) DDDD-DDDD` or `(DD) DDDDD-DDDD`.
/// Fewer than ten digits come back as bare digits; digits past the eleventh are kept at the end.
pub fn format_phone(phone: &str) -> String {
    let d = phone_digits(phone);
    match d.len() {
        0..=9 => d,
        10 => format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..]),
        _ => format!("({}) {}-{}{}", &d[..2], &d[2..7], &d[7..11], &d[11..]),
    }
}

pub fn is_valid_birth_date(value: &str) -> bool {
    Date::parse(value, format_description!("[year]-[month]-[day]")).is_ok()
}

fn required(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) -> bool {
    if value.is_empty() {
        errors.insert(field, message.to_string());
        return false;
    }
    true
}

fn check_email(errors: &mut FieldErrors, value: &str) {
    if required(errors, "email", value, "Email is required") && !is_valid_email(value) {
        errors.insert("email", "Invalid email".into());
    }
}

fn check_phone(errors: &mut FieldErrors, value: &str) {
    if required(errors, "phone", value, "Phone is required") && !is_valid_phone(value) {
        errors.insert("phone", "Invalid phone".into());
    }
}

fn check_birth_date(errors: &mut FieldErrors, value: &str) {
    if required(errors, "birth_date", value, "Birth date is required") && !is_valid_birth_date(value) {
        errors.insert("birth_date", "Invalid birth date".into());
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreateLeadRequest {
    pub fn validate(self) -> Result<NewLead, FieldErrors> {
        let full_name = self.full_name.trim().to_string();
        let email = self.email.trim().to_string();
        let phone = self.phone.trim().to_string();
        let role = self.role.trim().to_string();
        let birth_date = self.birth_date.trim().to_string();
        let message = self.message.trim().to_string();

        let mut errors = FieldErrors::new();
        required(&mut errors, "full_name", &full_name, "Full name is required");
        check_email(&mut errors, &email);
        check_phone(&mut errors, &phone);
        required(&mut errors, "role", &role, "Role is required");
        check_birth_date(&mut errors, &birth_date);
        required(&mut errors, "message", &message, "Message is required");
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewLead {
            full_name,
            email,
            phone: format_phone(&phone),
            role,
            birth_date,
            message,
            attribution: Attribution {
                utm_source: optional(self.utm_source),
                utm_medium: optional(self.utm_medium),
                utm_campaign: optional(self.utm_campaign),
                utm_term: optional(self.utm_term),
                utm_content: optional(self.utm_content),
                gclid: optional(self.gclid),
                fbclid: optional(self.fbclid),
            },
        })
    }
}

impl UpdateLeadRequest {
    /// Checks only the fields that were sent; a sent field must not be blank.
    pub fn validate(self) -> Result<LeadPatch, FieldErrors> {
        let trim = |v: Option<String>| v.map(|v| v.trim().to_string());
        let patch = LeadPatch {
            full_name: trim(self.full_name),
            email: trim(self.email),
            phone: trim(self.phone),
            role: trim(self.role),
            birth_date: trim(self.birth_date),
            message: trim(self.message),
        };

        let mut errors = FieldErrors::new();
        if let Some(v) = &patch.full_name {
            required(&mut errors, "full_name", v, "Full name is required");
        }
        if let Some(v) = &patch.email {
            check_email(&mut errors, v);
        }
        if let Some(v) = &patch.phone {
            check_phone(&mut errors, v);
        }
        if let Some(v) = &patch.role {
            required(&mut errors, "role", v, "Role is required");
        }
        if let Some(v) = &patch.birth_date {
            check_birth_date(&mut errors, v);
        }
        if let Some(v) = &patch.message {
            required(&mut errors, "message", v, "Message is required");
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(LeadPatch {
            phone: patch.phone.as_deref().map(format_phone),
            ..patch
        })
    }
}
