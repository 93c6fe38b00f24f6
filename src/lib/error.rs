//! Error type shared by every request, form and export.
use std::collections::BTreeMap;

use thiserror::Error;

use crate::helpers::extract_validation_message;

pub const NOT_FOUND_MESSAGE: &str = "No se encontró el registro solicitado.";

#[derive(Debug, Error)]
pub enum FacetError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The API rejected a create/update; the payload holds the field errors.
    #[error("validation failed: {0}")]
    Validation(serde_json::Value),

    #[error("not found: {0}")]
    NotFound(String),

    /// Business rule checked before submitting, e.g. a duplicate teacher.
    #[error("{0}")]
    Conflict(String),

    #[error("invalid url {0}")]
    InvalidUrl(String),

    #[error("server answered {status} for {url}")]
    Status { status: u16, url: String },

    /// Client-side form validation, field name to message.
    #[error("invalid form: {0:?}")]
    Form(BTreeMap<String, String>),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to write spreadsheet: {0}")]
    Sheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = FacetError> = std::result::Result<T, E>;

impl From<figment::Error> for FacetError {
    fn from(err: figment::Error) -> Self {
        FacetError::Config(Box::new(err))
    }
}

impl FacetError {
    /// Text to show the user. `fallback` is the page's generic message for
    /// failures whose shape carries nothing more specific.
    pub fn user_message(&self, fallback: &str) -> String {
        self.user_message_with(&[], fallback)
    }

    /// Like [`FacetError::user_message`], with a table of API field names
    /// mapped to the message shown when that field is rejected.
    pub fn user_message_with(&self, known_fields: &[(&str, &str)], fallback: &str) -> String {
        match self {
            FacetError::Validation(payload) => {
                extract_validation_message(payload, known_fields, fallback)
            }
            FacetError::Conflict(message) => message.clone(),
            FacetError::Form(errors) => errors.values().cloned().collect::<Vec<_>>().join(", "),
            FacetError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}
