use std::sync::Arc;

use log::{debug, error, warn};

use crate::{
    backend::Backend,
    classify::{Alert, ENTER_CITY, classify},
    error::SetupError,
    map::{MapLibrary, MapSession, MapUpdate},
    model::WeatherPayload,
    render::RenderedWeather,
    surface::{Element, Surface},
};

/// Input events the widget reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Click on the trigger button.
    Click,
    /// Key pressed in the city input; only `"Enter"` triggers a lookup.
    KeyDown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Blank input; no request was sent.
    EmptyInput,
    Rendered {
        weather: RenderedWeather,
        /// `None` when the payload had no coordinates or the map update failed.
        map: Option<MapUpdate>,
    },
    Failed(Alert),
}

/// Input controller, weather fetcher and display glue around one surface
/// and one map session.
///
/// Every async method takes `&mut self`, so lookups on one widget never
/// overlap and the last one started is the last one rendered.
#[derive(Debug)]
pub struct WeatherWidget<S, L> {
    backend: Arc<dyn Backend>,
    surface: S,
    map: MapSession<L>,
}

impl<S: Surface, L: MapLibrary> WeatherWidget<S, L> {
    /// Fails when the surface lacks the city input or the trigger.
    pub fn new(backend: Arc<dyn Backend>, surface: S, map: MapSession<L>) -> Result<Self, SetupError> {
        for required in [Element::CityInput, Element::Trigger] {
            if !surface.contains(required) {
                warn!("required UI element {required} not found, aborting setup");
                return Err(SetupError::MissingElement(required));
            }
        }

        Ok(Self { backend, surface, map })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn map_session(&self) -> &MapSession<L> {
        &self.map
    }

    pub async fn handle(&mut self, event: UiEvent) -> Option<CheckOutcome> {
        match event {
            UiEvent::Click => Some(self.check().await),
            UiEvent::KeyDown(key) if key == "Enter" => Some(self.check().await),
            UiEvent::KeyDown(_) => None,
        }
    }

    /// Load `/config` and, if it names a default city, pre-fill the input
    /// and look it up. Failures are skipped.
    pub async fn start(&mut self) -> Option<CheckOutcome> {
        let config = match self.backend.remote_config().await {
            Ok(config) => config,
            Err(err) => {
                debug!("no remote config: {err}");
                return None;
            }
        };

        let city = config.default_city()?.to_string();
        debug!("default city from config: {city}");
        self.surface.set_input_value(&city);
        Some(self.check().await)
    }

    /// Look up the city currently in the input.
    pub async fn check(&mut self) -> CheckOutcome {
        let input = self.surface.input_value();
        let city = input.trim();
        if city.is_empty() {
            self.show_alert(ENTER_CITY);
            return CheckOutcome::EmptyInput;
        }

        self.show_alert("");
        self.surface.set_disabled(Element::Trigger, true);
        let outcome = self.lookup(city).await;
        self.surface.set_disabled(Element::Trigger, false);
        outcome
    }

    async fn lookup(&mut self, city: &str) -> CheckOutcome {
        match self.backend.weather(city).await {
            Ok(payload) => {
                let weather = RenderedWeather::from_payload(&payload);
                weather.apply(&mut self.surface);
                let map = self.update_map(&payload).await;
                CheckOutcome::Rendered { weather, map }
            }
            Err(err) => {
                error!("weather lookup for '{city}' failed: {err}");
                let alert = classify(&err.to_string());
                self.show_alert(alert.text());
                self.surface.set_hidden(Element::Result, true);
                CheckOutcome::Failed(alert)
            }
        }
    }

    async fn update_map(&mut self, payload: &WeatherPayload) -> Option<MapUpdate> {
        let Some(coord) = payload.coord else {
            warn!("weather response has no coordinates, map not updated");
            return None;
        };

        let container = self
            .surface
            .contains(Element::MapContainer)
            .then(|| Element::MapContainer.id());

        match self.map.show(container, coord).await {
            Ok(update) => Some(update),
            Err(err) => {
                warn!("map update failed: {err}");
                None
            }
        }
    }

    fn show_alert(&mut self, msg: &str) {
        if !self.surface.contains(Element::Alert) {
            if !msg.is_empty() {
                warn!("alert (no {} element): {msg}", Element::Alert);
            }
            return;
        }
        self.surface.set_text(Element::Alert, msg);
        self.surface.set_hidden(Element::Alert, msg.is_empty());
    }
}
