//! Form parsing and validation.
//!
//! Every form follows the same path into the domain: trim the raw input,
//! check the field rules with `validator`, escape markup and build typed
//! values. Stored text is therefore always escaped; failures carry the
//! trimmed (unescaped) values back so the form can be re-rendered.

use std::fmt::{Debug, Display, Formatter};

use serde::Serialize;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod categories;
pub mod items;

/// A single rule violation reported back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A submitted form that failed validation.
///
/// `values` holds the normalized input for re-rendering; `errors` lists the
/// violations in form field order.
#[derive(Debug, Clone)]
pub struct InvalidForm<F> {
    pub values: F,
    pub errors: Vec<FieldError>,
}

impl<F> Display for InvalidForm<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let summary = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "form validation failed: {summary}")
    }
}

impl<F: Debug> std::error::Error for InvalidForm<F> {}

impl<F> InvalidForm<F> {
    pub(crate) fn from_validation(
        values: F,
        errors: &ValidationErrors,
        field_order: &[&str],
    ) -> Self {
        Self {
            values,
            errors: collect_field_errors(errors, field_order),
        }
    }

    pub(crate) fn from_constraint(
        values: F,
        field: &'static str,
        error: TypeConstraintError,
    ) -> Self {
        Self {
            values,
            errors: vec![FieldError::new(field, error.to_string())],
        }
    }
}

/// Flatten `validator` errors into [`FieldError`]s ordered by `field_order`.
///
/// Fields missing from `field_order` sort last, alphabetically.
pub fn collect_field_errors(errors: &ValidationErrors, field_order: &[&str]) -> Vec<FieldError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| {
        let name = field.to_string();
        let rank = field_order
            .iter()
            .position(|f| *f == name)
            .unwrap_or(field_order.len());
        (rank, name)
    });

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                FieldError::new(field.clone(), message)
            })
        })
        .collect()
}

/// Escape HTML-significant characters (`& < > " ' /`).
pub fn escape_markup(value: &str) -> String {
    tera::escape_html(value)
}

/// Reverse [`escape_markup`] so stored text can be placed back into a form
/// without being escaped twice on resubmission.
pub fn unescape_markup(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&")
}

/// Raw value of a select control that may allow multiple choices.
///
/// Browsers omit the key entirely when nothing is selected, send it once for
/// a single choice and repeat it for multiple choices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    Absent,
    Single(String),
    Many(Vec<String>),
}

impl CategorySelection {
    /// Build a selection from every value submitted under the field's key.
    pub fn from_values(mut values: Vec<String>) -> Self {
        match values.len() {
            0 => Self::Absent,
            1 => Self::Single(values.remove(0)),
            _ => Self::Many(values),
        }
    }

    /// Absent becomes an empty list, a single value a one-element list and a
    /// list is returned unchanged.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Absent => Vec::new(),
            Self::Single(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}
