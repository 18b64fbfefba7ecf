use std::fmt::Write;

use chrono::{DateTime, TimeZone};
use weathernow_core::{
    CheckOutcome, Element, HeadlessMap, MapUpdate, MemorySurface, WeatherWidget, render::PLACEHOLDER,
};

const FIELDS: &[(Element, &str, &str)] = &[
    (Element::Description, "Conditions", ""),
    (Element::Temperature, "Temperature", " °C"),
    (Element::FeelsLike, "Feels like", " °C"),
    (Element::Humidity, "Humidity", " %"),
    (Element::Wind, "Wind", " m/s"),
];

/// Human-readable view of what the widget shows after `outcome`.
pub fn format<Tz>(
    widget: &WeatherWidget<MemorySurface, HeadlessMap>,
    outcome: &CheckOutcome,
    at: DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let surface = widget.surface();
    let mut out = String::new();

    match outcome {
        CheckOutcome::EmptyInput | CheckOutcome::Failed(_) => {
            let alert = surface.alert().unwrap_or_default();
            let _ = write!(out, "! {alert}");
        }
        CheckOutcome::Rendered { map, .. } => {
            let city = surface.text(Element::City).unwrap_or_default();
            let _ = writeln!(out, "{city} (as of {})", at.format("%H:%M"));

            for (element, label, unit) in FIELDS {
                if let Some(value) = surface.text(*element) {
                    let unit = if value == PLACEHOLDER { "" } else { *unit };
                    let _ = writeln!(out, "  {label:<12} {value}{unit}");
                }
            }
            if let Some(icon) = surface.image(Element::Icon) {
                let _ = writeln!(out, "  {:<12} {icon}", "Icon");
            }

            let _ = write!(out, "  {:<12} {}", "Map", map_line(widget, map.as_ref()));
        }
    }

    out
}

fn map_line(widget: &WeatherWidget<MemorySurface, HeadlessMap>, update: Option<&MapUpdate>) -> String {
    let session = widget.map_session();
    let overlay = match update {
        Some(MapUpdate::Created { overlay, .. } | MapUpdate::Recentered { overlay, .. }) => {
            session.library().and_then(|lib| lib.layer(*overlay))
        }
        Some(MapUpdate::Skipped) => return "unavailable".to_string(),
        None => return "not updated".to_string(),
    };

    let tile = session.library().and_then(HeadlessMap::center_tile);
    match (overlay, tile) {
        (Some(layer), Some(tile)) => layer.template.url(tile),
        _ => "not updated".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use weathernow_core::{Alert, Backend, BaseUrl, HttpBackend, MapSession, RenderedWeather, Surface};
    use std::sync::Arc;

    fn widget() -> WeatherWidget<MemorySurface, HeadlessMap> {
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(BaseUrl::new("http://localhost")));
        let map = MapSession::new(backend.clone(), Some(HeadlessMap::default()));
        WeatherWidget::new(backend, MemorySurface::full(), map).unwrap()
    }

    #[test]
    fn failure_prints_alert() {
        let mut w = widget();
        w.surface_mut().set_text(Element::Alert, "Miasto nie znalezione.");
        w.surface_mut().set_hidden(Element::Alert, false);

        let text = format(&w, &CheckOutcome::Failed(Alert::CityNotFound), Utc::now());
        assert_eq!(text, "! Miasto nie znalezione.");
    }

    #[test]
    fn rendered_prints_fields_with_units() {
        let mut w = widget();
        let weather = RenderedWeather {
            city: "Warsaw".into(),
            description: "light rain".into(),
            temperature: "12.3".into(),
            feels_like: "—".into(),
            humidity: "81".into(),
            wind_speed: "3.6".into(),
            icon: None,
        };
        weather.apply(w.surface_mut());

        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 5, 0).unwrap();
        let text = format(&w, &CheckOutcome::Rendered { weather, map: None }, at);

        assert!(text.starts_with("Warsaw (as of 09:05)\n"));
        assert!(text.contains("Temperature  12.3 °C"));
        assert!(text.contains("Feels like   —\n"));
        assert!(text.contains("Humidity     81 %"));
        assert!(text.ends_with("Map          not updated"));
    }
}
