//! Form validation and sanitization.
//!
//! Each form field declares an ordered list of [`Rule`]s. Values are trimmed,
//! checked rule by rule until the first failure for that field, and escaped for
//! HTML whether or not they passed. Failures are collected across all fields so
//! a form can be re-rendered with every message at once, pre-filled with the
//! sanitized input.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

/// What went wrong with a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    EmptyField,
    InvalidCharacters,
    LengthOutOfRange,
    InvalidDate,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: ValidationErrorKind,
    pub message: String,
}

/// A single check applied to a trimmed text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required {
        message: &'static str,
    },
    /// ASCII letters and digits only.
    Alphanumeric {
        message: &'static str,
    },
    /// Inclusive bounds, counted in characters.
    Length {
        min: usize,
        max: usize,
        message: &'static str,
    },
}

impl Rule {
    fn check(&self, value: &str) -> Result<(), (ValidationErrorKind, &'static str)> {
        match *self {
            Rule::Required { message } if value.is_empty() => {
                Err((ValidationErrorKind::EmptyField, message))
            }
            Rule::Alphanumeric { message } if !value.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Err((ValidationErrorKind::InvalidCharacters, message))
            }
            Rule::Length { min, max, message } => {
                let length = value.chars().count();
                if length < min || length > max {
                    Err((ValidationErrorKind::LengthOutOfRange, message))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

/// A text field and its ordered rules.
#[derive(Debug, Clone, Copy)]
pub struct TextField {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

/// An optional ISO-8601 calendar date. Blank input means "unset".
#[derive(Debug, Clone, Copy)]
pub struct DateField {
    pub name: &'static str,
    pub message: &'static str,
}

/// The outcome of validating a form. The draft is always present so the form
/// can be rendered again with what the user typed.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<D> {
    pub draft: D,
    pub errors: Vec<FieldError>,
}

impl<D> Validated<D> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Collects field errors while a draft is assembled.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a text value and return it trimmed and escaped.
    pub fn text(&mut self, field: &TextField, raw: Option<&str>) -> String {
        let value = raw.unwrap_or_default().trim();

        if let Some((kind, message)) = field.rules.iter().find_map(|rule| rule.check(value).err()) {
            self.reject(field.name, kind, message);
        }

        escape(value)
    }

    /// Validate an optional date. Invalid input is reported and left unset.
    pub fn date(&mut self, field: &DateField, raw: Option<&str>) -> Option<NaiveDate> {
        let value = raw.unwrap_or_default().trim();
        if value.is_empty() {
            return None;
        }

        let parsed = parse_iso_date(value);
        if parsed.is_none() {
            self.reject(field.name, ValidationErrorKind::InvalidDate, field.message);
        }
        parsed
    }

    /// Record a failure found outside the declared rules.
    pub fn reject(&mut self, field: &'static str, kind: ValidationErrorKind, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            kind,
            message: message.into(),
        });
    }

    pub fn finish<D>(self, draft: D) -> Validated<D> {
        Validated {
            draft,
            errors: self.errors,
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part kept).
fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Escape characters that carry meaning in HTML.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
