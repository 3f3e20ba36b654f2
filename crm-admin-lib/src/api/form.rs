//! Mapping API error messages onto form fields

use crate::error::Error;
use crate::error::FieldValidationError;
use crate::model::fold_case;

/// Errors to show on a create or edit form after a failed submit.
///
/// The API reports validation failures as a single message
/// (`"Email already in use"`). The message is attached to the form field
/// it names; when it names none it becomes a general error.
///
/// # Example
///
/// ```
/// use crm_admin_lib::api::FormErrors;
///
/// let fields = ["name", "email", "phone_number"];
///
/// let errors = FormErrors::from_message("Email already in use", &fields);
/// assert_eq!(errors.field("email"), Some("Email already in use"));
///
/// let errors = FormErrors::from_message("Invalid phone number", &fields);
/// assert_eq!(errors.field("phone_number"), Some("Invalid phone number"));
///
/// let errors = FormErrors::from_message("Server unavailable", &fields);
/// assert_eq!(errors.general(), Some("Server unavailable"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: Vec<FieldValidationError>,
    general: Option<String>,
}

impl FormErrors {
    /// Attaches `message` to the field it mentions.
    ///
    /// Field names match case-insensitively, with `_` also matching a
    /// space. When several fields match, the longest name wins, so
    /// `username` beats `name`; ties go to the earlier field.
    pub fn from_message<S: AsRef<str>>(message: &str, fields: &[S]) -> Self {
        let haystack = fold_case(message);

        let mut best: Option<(&str, usize)> = None;
        for field in fields {
            let field = field.as_ref();
            let needle = fold_case(field);
            if needle.is_empty() {
                continue;
            }
            let spaced = needle.replace('_', " ");
            if (haystack.contains(&needle) || haystack.contains(&spaced))
                && best.is_none_or(|(_, len)| needle.len() > len)
            {
                best = Some((field, needle.len()));
            }
        }

        match best {
            Some((field, _)) => Self {
                fields: vec![FieldValidationError::new(field, message)],
                general: None,
            },
            None => Self {
                fields: Vec::new(),
                general: Some(message.to_string()),
            },
        }
    }

    /// Builds form errors from a failed create or update.
    ///
    /// Uses the server's message when there is one, otherwise the error's
    /// own description as a general error.
    pub fn from_error<S: AsRef<str>>(err: &Error, fields: &[S]) -> Self {
        match err.as_api().and_then(|api| api.server_message()) {
            Some(message) => Self::from_message(message, fields),
            None => Self {
                fields: Vec::new(),
                general: Some(err.to_string()),
            },
        }
    }

    /// Returns the message for `field`, if any.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Returns all field errors.
    pub fn fields(&self) -> &[FieldValidationError] {
        &self.fields
    }

    /// Returns the error not tied to any field.
    pub fn general(&self) -> Option<&str> {
        self.general.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }
}
