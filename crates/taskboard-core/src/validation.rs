//! Per-field validation results.
//!
//! Forms collect every failing field before anything is sent to the server,
//! so a submit can report all problems at once instead of the first one.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Title,
    Name,
    Description,
    Priority,
    AssignedTo,
    Status,
    Columns,
    Username,
    Email,
    Password,
    ConfirmPassword,
    Token,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Name => "name",
            Self::Description => "description",
            Self::Priority => "priority",
            Self::AssignedTo => "assignedTo",
            Self::Status => "status",
            Self::Columns => "columns",
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::Token => "token",
        }
    }
}

/// Validation messages keyed by field, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<FormField, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. The first message for a field is kept.
    pub fn add(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn clear(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// `Ok(())` when nothing failed, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field.label(), message)?;
            first = false;
        }
        Ok(())
    }
}

/// Number of whitespace-delimited words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Normalized form used for case-insensitive uniqueness checks.
pub fn normalize_name(text: &str) -> String {
    text.trim().to_lowercase()
}
