use thiserror::Error;

use crate::surface::Element;

/// Fallback failure text when a rejected response carries nothing usable.
pub const REQUEST_FAILED: &str = "Błąd zapytania";

/// Failure of a single backend request.
///
/// The `Display` text is what the error classifier sees, so variants that
/// carry backend text print it verbatim.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Non-success HTTP status, with the best message the response offered.
    #[error("{0}")]
    Rejected(String),

    #[error("Pusty response od serwera")]
    EmptyResponse,

    /// Built without the request URL, whose text must not reach the classifier.
    #[error("Failed to reach backend: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No backend base URL configured")]
    NoBaseUrl,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to load map configuration: {0}")]
    Config(#[source] LookupError),
}

/// Required elements missing at widget construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("required UI element #{} not found", .0.id())]
    MissingElement(Element),
}
