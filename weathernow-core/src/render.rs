use crate::{
    model::WeatherPayload,
    surface::{Element, Surface},
};

/// Shown in place of a value that is missing or not a number.
pub const PLACEHOLDER: &str = "—";

/// Format `value` with `fmt`, or return [`PLACEHOLDER`] when it is absent.
pub fn format_or_placeholder<T>(value: Option<T>, fmt: impl FnOnce(T) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// One decimal place, exact ties rounded away from zero.
///
/// The only binary values sitting exactly between two tenths are those with
/// a fractional part of .25 or .75, i.e. where `|v| * 4` is an odd integer.
/// `{:.1}` would round those to even.
fn one_decimal(v: f64) -> String {
    let quarters = v.abs() * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        let rounded = (v.abs() * 10.0).round() / 10.0;
        let sign = if v.is_sign_negative() { "-" } else { "" };
        return format!("{sign}{rounded:.1}");
    }
    format!("{v:.1}")
}

/// Display strings for one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedWeather {
    pub city: String,
    pub description: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
    pub icon: Option<String>,
}

impl RenderedWeather {
    pub fn from_payload(payload: &WeatherPayload) -> Self {
        Self {
            city: format_or_placeholder(payload.city.clone(), |c| c),
            description: format_or_placeholder(payload.description.clone(), |d| d),
            temperature: format_or_placeholder(payload.temperature, one_decimal),
            feels_like: format_or_placeholder(payload.feels_like, one_decimal),
            humidity: format_or_placeholder(payload.humidity, |h| h.to_string()),
            wind_speed: format_or_placeholder(payload.wind_speed, one_decimal),
            icon: payload.icon.clone().filter(|i| !i.is_empty()),
        }
    }

    /// Write every field to `surface` and reveal the result area.
    pub fn apply<S: Surface>(&self, surface: &mut S) {
        surface.set_text(Element::City, &self.city);
        surface.set_text(Element::Description, &self.description);
        surface.set_text(Element::Temperature, &self.temperature);
        surface.set_text(Element::FeelsLike, &self.feels_like);
        surface.set_text(Element::Humidity, &self.humidity);
        surface.set_text(Element::Wind, &self.wind_speed);
        if let Some(icon) = &self.icon {
            surface.set_image(Element::Icon, icon);
        }
        surface.set_hidden(Element::Result, false);
    }
}
