//! Maps failure messages to what the user is shown.

pub const ENTER_CITY: &str = "Podaj nazwę miasta.";
pub const CITY_NOT_FOUND: &str = "Miasto nie znalezione.";
pub const MISSING_API_KEY: &str =
    "Brakuje klucza API (OPENWEATHER_API_KEY). Sprawdź konfigurację backendu.";
pub const FETCH_FAILED: &str = "Nie udało się pobrać danych pogodowych.";

/// Messages at or above this many UTF-16 code units are replaced by
/// [`FETCH_FAILED`].
pub const MAX_RAW_MESSAGE_CHARS: usize = 200;

const API_KEY_MARKERS: &[&str] = &[
    "openweather_api_key",
    "missing_openweather_apikey",
    "openweather",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    CityNotFound,
    MissingApiKey,
    /// Short backend message shown as-is.
    Raw(String),
    Generic,
}

impl Alert {
    pub fn text(&self) -> &str {
        match self {
            Alert::CityNotFound => CITY_NOT_FOUND,
            Alert::MissingApiKey => MISSING_API_KEY,
            Alert::Raw(msg) => msg,
            Alert::Generic => FETCH_FAILED,
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

pub fn classify(message: &str) -> Alert {
    let lower = message.to_lowercase();

    if lower.contains("city not found") {
        Alert::CityNotFound
    } else if API_KEY_MARKERS.iter().any(|m| lower.contains(m)) {
        Alert::MissingApiKey
    } else if message.is_empty() || message.encode_utf16().count() >= MAX_RAW_MESSAGE_CHARS {
        Alert::Generic
    } else {
        Alert::Raw(message.to_string())
    }
}
