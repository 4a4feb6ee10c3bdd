//! Localized field validation messages.
//!
//! Every input check on the server reports failures as a [`FieldError`]
//! whose message is the same zh-TW text the data entry forms show, so a
//! client can surface API errors next to the offending field verbatim.

use std::fmt;

use validator::{ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;

/// The kind of input the value was supposed to be, for type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Email,
    Url,
    Other,
}

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidityIssue {
    ValueMissing,
    TypeMismatch(InputKind),
    PatternMismatch,
    TooShort { min: u64 },
    TooLong { max: u64 },
    RangeUnderflow { min: String },
    RangeOverflow { max: String },
    NotPositive,
    StepMismatch,
    Other,
}

impl ValidityIssue {
    /// The localized message shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::ValueMissing => "請填寫此欄位".to_string(),
            Self::TypeMismatch(InputKind::Email) => "請輸入有效的電子郵件地址".to_string(),
            Self::TypeMismatch(InputKind::Url) => "請輸入有效的網址".to_string(),
            Self::TypeMismatch(InputKind::Other) => "請輸入有效的格式".to_string(),
            Self::PatternMismatch => "請符合要求的格式".to_string(),
            Self::TooShort { min } => format!("請至少輸入 {min} 個字元"),
            Self::TooLong { max } => format!("請輸入不超過 {max} 個字元"),
            Self::RangeUnderflow { min } => format!("請輸入大於或等於 {min} 的值"),
            Self::RangeOverflow { max } => format!("請輸入小於或等於 {max} 的值"),
            Self::NotPositive => "請輸入大於 0 的值".to_string(),
            Self::StepMismatch => "請輸入有效的值".to_string(),
            Self::Other => "請檢查此欄位".to_string(),
        }
    }
}

/// A validation failure attached to a (possibly nested) field path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub issue: ValidityIssue,
}

impl FieldError {
    pub fn new(field: impl Into<String>, issue: ValidityIssue) -> Self {
        Self {
            field: field.into(),
            issue,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.issue.message())
    }
}

/// Accumulates field errors across a whole input.
#[derive(Debug, Default, Clone)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, issue: ValidityIssue) {
        self.errors.push(FieldError::new(field, issue));
    }

    /// Record [`ValidityIssue::ValueMissing`] when `value` is absent or blank.
    pub fn require_text(&mut self, field: &str, value: Option<&str>) {
        if value.map_or(true, |v| v.trim().is_empty()) {
            self.push(field, ValidityIssue::ValueMissing);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded, otherwise a [`CoreError::Validation`]
    /// listing every error.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.to_string()))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&joined.join("; "))
    }
}

// ---------------------------------------------------------------------------
// validator bridge
// ---------------------------------------------------------------------------

/// Translate derive-based `validator` failures into localized field errors.
pub fn from_validator(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect(errors, "", &mut out);
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    out.push(path.clone(), issue_for(err));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

fn issue_for(err: &validator::ValidationError) -> ValidityIssue {
    let param = |name: &str| err.params.get(name).map(|v| v.to_string());
    match err.code.as_ref() {
        "required" => ValidityIssue::ValueMissing,
        "email" => ValidityIssue::TypeMismatch(InputKind::Email),
        "url" => ValidityIssue::TypeMismatch(InputKind::Url),
        "regex" => ValidityIssue::PatternMismatch,
        "length" => {
            let value_len = err
                .params
                .get("value")
                .and_then(|v| v.as_str())
                .map(|s| s.chars().count() as u64);
            let min = err.params.get("min").and_then(|v| v.as_u64());
            let max = err.params.get("max").and_then(|v| v.as_u64());
            match (value_len, min, max) {
                (Some(0), Some(_), _) => ValidityIssue::ValueMissing,
                (Some(len), Some(min), _) if len < min => ValidityIssue::TooShort { min },
                (_, _, Some(max)) => ValidityIssue::TooLong { max },
                (_, Some(min), None) => ValidityIssue::TooShort { min },
                _ => ValidityIssue::Other,
            }
        }
        "range" => {
            let value = err.params.get("value").and_then(|v| v.as_f64());
            let min = err.params.get("min").and_then(|v| v.as_f64());
            match (value, min) {
                (Some(v), Some(m)) if v < m => ValidityIssue::RangeUnderflow {
                    min: param("min").unwrap_or_default(),
                },
                _ => match param("max") {
                    Some(max) => ValidityIssue::RangeOverflow { max },
                    None => ValidityIssue::Other,
                },
            }
        }
        _ => ValidityIssue::Other,
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Contact {
        #[validate(email)]
        email: String,
        #[validate(length(min = 1, max = 5))]
        name: String,
        #[validate(range(min = 0.0, max = 5.0))]
        rating: f64,
    }

    #[test]
    fn messages_match_form_text() {
        assert_eq!(ValidityIssue::ValueMissing.message(), "請填寫此欄位");
        assert_eq!(
            ValidityIssue::TypeMismatch(InputKind::Email).message(),
            "請輸入有效的電子郵件地址"
        );
        assert_eq!(
            ValidityIssue::TooShort { min: 3 }.message(),
            "請至少輸入 3 個字元"
        );
        assert_eq!(
            ValidityIssue::RangeOverflow { max: "5".into() }.message(),
            "請輸入小於或等於 5 的值"
        );
        assert_eq!(ValidityIssue::Other.message(), "請檢查此欄位");
    }

    #[test]
    fn require_text_flags_blank_values() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", Some("  "));
        errors.require_text("notes", None);
        errors.require_text("ok", Some("x"));
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "name: 請填寫此欄位; notes: 請填寫此欄位"
        );
    }

    #[test]
    fn empty_collector_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn bridges_validator_errors() {
        let contact = Contact {
            email: "not-an-email".into(),
            name: "much too long".into(),
            rating: 7.0,
        };
        let errs = contact.validate().unwrap_err();
        let fields = from_validator(&errs);
        let rendered = fields.to_string();
        assert!(rendered.contains("email: 請輸入有效的電子郵件地址"));
        assert!(rendered.contains("name: 請輸入不超過 5 個字元"));
        assert!(rendered.contains("rating: 請輸入小於或等於"));
    }
}
