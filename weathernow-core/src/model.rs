use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Body of a successful `/weather` response.
///
/// Every field is optional and of the wrong type counts as absent, so a
/// partial payload still renders whatever it does carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Degrees Celsius.
    #[serde(default, deserialize_with = "numeric")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "numeric")]
    pub feels_like: Option<f64>,
    /// Percent.
    #[serde(default, deserialize_with = "numeric")]
    pub humidity: Option<f64>,
    /// Metres per second.
    #[serde(default, deserialize_with = "numeric")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub coord: Option<Coord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Body of `/config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub default_city: Option<String>,
}

impl RemoteConfig {
    /// Default city, if one is set and not blank.
    pub fn default_city(&self) -> Option<&str> {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Body of `/map/config`.
///
/// Example:
/// ```json
/// {
///   "layers": {"precipitation": "precipitation_new"},
///   "default_layer": "precipitation",
///   "tile_url_template": "https://tile.openweathermap.org/map/{layer}/{z}/{x}/{y}.png?appid={apiKey}",
///   "apiKey": "..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub layers: BTreeMap<String, String>,
    pub default_layer: String,
    pub tile_url_template: String,
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
}

impl MapConfig {
    /// Tile code of the default layer. Falls back to the layer name itself
    /// when the mapping has no entry for it.
    pub fn default_layer_code(&self) -> &str {
        self.layers
            .get(&self.default_layer)
            .map(String::as_str)
            .unwrap_or(&self.default_layer)
    }

    /// Overlay URL template with `{layer}` and `{apiKey}` substituted.
    /// Tile placeholders (`{z}`, `{x}`, `{y}`, `{s}`) are left in place.
    pub fn overlay_template(&self) -> String {
        self.tile_url_template
            .replace("{layer}", self.default_layer_code())
            .replace("{apiKey}", &self.api_key)
    }
}

/// Deserialize through [`Value`] and treat anything of the wrong shape as
/// absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Numbers, or strings holding a finite number.
fn numeric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value))
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
