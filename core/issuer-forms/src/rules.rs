//! Validation rules, one function per input.
//!
//! Every rule returns the messages to show for a value; an empty list means
//! the value is acceptable. When a value is required and missing, only the
//! "is required" message is returned.

use std::collections::HashSet;
use std::sync::OnceLock;

use issuer_types::datetime::parse_datetime;
use issuer_types::{parse_tags, LicenseDataField};
use regex_lite::Regex;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 64;
pub const EMAIL_MAX: usize = 128;
pub const PHONE_NUMBER_MAX: usize = 24;
pub const PHONE_DIGITS_MIN: usize = 7;
pub const PHONE_DIGITS_MAX: usize = 15;
pub const NAME_MAX: usize = 64;
pub const NOTE_MAX: usize = 500;
pub const TAGS_MAX: usize = 20;
pub const TAG_LEN_MAX: usize = 64;

/// Minimum zxcvbn score (0..=4) for a new password.
pub const PASSWORD_MIN_SCORE: u8 = 3;

/// Words that make a password guessable for this service.
pub const PASSWORD_DICTIONARY: &[&str] = &[
    "online",
    "software",
    "licence",
    "license",
    "licensing",
    "system",
    "session",
    "server",
    "DRM",
    "digital",
    "rights",
    "management",
    "admin",
];

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|error| panic!("regex {pattern:?} is invalid: {error}"))
    })
}

fn len(s: &str) -> usize {
    s.chars().count()
}

fn max_len(s: &str, max: usize, label: &str, errors: &mut Vec<String>) {
    if len(s) > max {
        errors.push(format!("{label} must be at most {max} characters"));
    }
}

pub fn username(s: &str) -> Vec<String> {
    if s.is_empty() {
        return vec!["Username is required".to_string()];
    }
    let mut errors = Vec::new();
    if !compiled(&USERNAME_RE, r"^[A-Za-z0-9_-]+$").is_match(s) {
        errors.push("Username can only contain letters, numbers, _ or - characters".to_string());
    }
    if len(s) < USERNAME_MIN {
        errors.push(format!("Username must be at least {USERNAME_MIN} characters"));
    }
    max_len(s, USERNAME_MAX, "Username", &mut errors);
    errors
}

pub fn password(s: &str) -> Vec<String> {
    if s.is_empty() {
        return vec!["Password is required".to_string()];
    }
    Vec::new()
}

/// Checks a confirmation entry against the password it repeats.
pub fn password_confirm(confirm: &str, password: &str) -> Vec<String> {
    if confirm.is_empty() {
        return vec!["Password is required".to_string()];
    }
    if confirm != password {
        return vec!["Passwords must match".to_string()];
    }
    Vec::new()
}

/// Scores a new password with zxcvbn, penalizing the username and
/// [`PASSWORD_DICTIONARY`].
pub fn new_password(s: &str, username: &str) -> Vec<String> {
    if s.is_empty() {
        return vec!["Password is required".to_string()];
    }
    let mut inputs = Vec::with_capacity(PASSWORD_DICTIONARY.len() + 1);
    inputs.push(username);
    inputs.extend_from_slice(PASSWORD_DICTIONARY);

    // zxcvbn rejects blank input; treat any error as weak.
    let strong = zxcvbn::zxcvbn(s, &inputs)
        .is_ok_and(|entropy| entropy.score() >= PASSWORD_MIN_SCORE);
    if strong {
        Vec::new()
    } else {
        vec!["Password is too weak".to_string()]
    }
}

pub fn max_licenses(n: i64) -> Vec<String> {
    if n < 1 {
        return vec!["Max licenses must be at least 1".to_string()];
    }
    Vec::new()
}

/// An empty email is allowed.
pub fn email(s: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !s.is_empty() && !is_valid_email(s) {
        errors.push("Email must be a valid email address.".to_string());
    }
    max_len(s, EMAIL_MAX, "Email", &mut errors);
    errors
}

pub fn is_valid_email(s: &str) -> bool {
    compiled(
        &EMAIL_RE,
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .is_match(s)
}

/// An empty phone number is allowed.
pub fn phone_number(s: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !is_valid_phone_number(s) {
        errors.push("Phone number is invalid".to_string());
    }
    max_len(s, PHONE_NUMBER_MAX, "Phone number", &mut errors);
    errors
}

/// Accepts an optional leading `+`, digits, spaces, hyphens and at most one
/// open bracket pair at a time, with 7 to 15 digits in total.
pub fn is_valid_phone_number(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    let mut open = false;
    let mut digits = 0usize;
    for (i, c) in s.chars().enumerate() {
        match c {
            '+' if i == 0 => {}
            '0'..='9' => digits += 1,
            '(' if !open => open = true,
            ')' if open => open = false,
            ' ' | '-' => {}
            _ => return false,
        }
    }
    !open && (PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&digits)
}

pub fn license_name(s: &str) -> Vec<String> {
    let mut errors = Vec::new();
    max_len(s, NAME_MAX, "Name", &mut errors);
    errors
}

pub fn product_name(s: &str) -> Vec<String> {
    license_name(s)
}

/// Validates a `;`-delimited tag list as typed by the user.
pub fn license_tags(s: &str) -> Vec<String> {
    let tags = parse_tags(s);
    let ok = tags.len() <= TAGS_MAX && tags.iter().all(|t| (1..=TAG_LEN_MAX).contains(&len(t)));
    if ok {
        Vec::new()
    } else {
        vec![format!(
            "Up to {TAGS_MAX} tags are allowed, each 1 to {TAG_LEN_MAX} characters"
        )]
    }
}

pub fn license_note(s: &str) -> Vec<String> {
    let mut errors = Vec::new();
    max_len(s, NOTE_MAX, "Note", &mut errors);
    errors
}

pub fn max_sessions(n: i64) -> Vec<String> {
    if n < 1 {
        return vec!["Max sessions must be at least 1".to_string()];
    }
    Vec::new()
}

pub fn valid_until(s: &str) -> Vec<String> {
    if s.is_empty() {
        return vec!["Expiry is required".to_string()];
    }
    if parse_datetime(s).is_none() {
        return vec!["Expiry is in invalid format".to_string()];
    }
    Vec::new()
}

pub fn license_data_fields(fields: &[LicenseDataField]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(fields.len());
    let ok = fields
        .iter()
        .all(|f| !f.field.is_empty() && seen.insert(f.field.as_str()));
    if ok {
        Vec::new()
    } else {
        vec!["All field names must be unique and non-empty".to_string()]
    }
}
