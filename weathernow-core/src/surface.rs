//! The element contract between the widget and whatever displays it.
//!
//! A [`Surface`] is addressed by [`Element`]. Writes to elements the surface
//! does not contain are silently dropped, which is how optional display
//! elements degrade.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    CityInput,
    Trigger,
    Alert,
    Result,
    City,
    Description,
    Temperature,
    FeelsLike,
    Humidity,
    Wind,
    Icon,
    MapContainer,
}

impl Element {
    pub fn id(&self) -> &'static str {
        match self {
            Element::CityInput => "city",
            Element::Trigger => "checkBtn",
            Element::Alert => "alert",
            Element::Result => "result",
            Element::City => "r-city",
            Element::Description => "r-desc",
            Element::Temperature => "r-temp",
            Element::FeelsLike => "r-feels",
            Element::Humidity => "r-humidity",
            Element::Wind => "r-wind",
            Element::Icon => "r-icon",
            Element::MapContainer => "map",
        }
    }

    pub const fn all() -> &'static [Element] {
        &[
            Element::CityInput,
            Element::Trigger,
            Element::Alert,
            Element::Result,
            Element::City,
            Element::Description,
            Element::Temperature,
            Element::FeelsLike,
            Element::Humidity,
            Element::Wind,
            Element::Icon,
            Element::MapContainer,
        ]
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.id())
    }
}

/// Display-side operations the widget needs.
pub trait Surface {
    fn contains(&self, element: Element) -> bool;

    /// Current value of the city input.
    fn input_value(&self) -> String;

    fn set_input_value(&mut self, value: &str);

    fn set_text(&mut self, element: Element, text: &str);

    fn set_image(&mut self, element: Element, src: &str);

    fn set_hidden(&mut self, element: Element, hidden: bool);

    fn set_disabled(&mut self, element: Element, disabled: bool);
}

/// One recorded write, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Text(Element, String),
    Image(Element, String),
    Hidden(Element, bool),
    Disabled(Element, bool),
}

/// In-memory [`Surface`] that keeps the latest state of every element and a
/// log of every write.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    present: HashSet<Element>,
    input: String,
    text: HashMap<Element, String>,
    images: HashMap<Element, String>,
    hidden: HashMap<Element, bool>,
    disabled: HashMap<Element, bool>,
    events: Vec<SurfaceEvent>,
}

impl MemorySurface {
    /// Surface containing every known element.
    pub fn full() -> Self {
        Self::with_elements(Element::all())
    }

    pub fn with_elements(elements: &[Element]) -> Self {
        let mut surface = Self {
            present: elements.iter().copied().collect(),
            ..Self::default()
        };
        // The page starts with the alert and the result hidden.
        surface.hidden.insert(Element::Alert, true);
        surface.hidden.insert(Element::Result, true);
        surface
    }

    pub fn without(mut self, element: Element) -> Self {
        self.present.remove(&element);
        self
    }

    pub fn text(&self, element: Element) -> Option<&str> {
        self.text.get(&element).map(String::as_str)
    }

    pub fn image(&self, element: Element) -> Option<&str> {
        self.images.get(&element).map(String::as_str)
    }

    pub fn is_hidden(&self, element: Element) -> bool {
        self.hidden.get(&element).copied().unwrap_or(false)
    }

    pub fn is_disabled(&self, element: Element) -> bool {
        self.disabled.get(&element).copied().unwrap_or(false)
    }

    /// Visible alert text, if any.
    pub fn alert(&self) -> Option<&str> {
        if self.is_hidden(Element::Alert) {
            return None;
        }
        self.text(Element::Alert).filter(|t| !t.is_empty())
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }
}

impl Surface for MemorySurface {
    fn contains(&self, element: Element) -> bool {
        self.present.contains(&element)
    }

    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        if self.contains(Element::CityInput) {
            self.input = value.to_string();
        }
    }

    fn set_text(&mut self, element: Element, text: &str) {
        if !self.contains(element) {
            return;
        }
        self.text.insert(element, text.to_string());
        self.events.push(SurfaceEvent::Text(element, text.to_string()));
    }

    fn set_image(&mut self, element: Element, src: &str) {
        if !self.contains(element) {
            return;
        }
        self.images.insert(element, src.to_string());
        self.events.push(SurfaceEvent::Image(element, src.to_string()));
    }

    fn set_hidden(&mut self, element: Element, hidden: bool) {
        if !self.contains(element) {
            return;
        }
        self.hidden.insert(element, hidden);
        self.events.push(SurfaceEvent::Hidden(element, hidden));
    }

    fn set_disabled(&mut self, element: Element, disabled: bool) {
        if !self.contains(element) {
            return;
        }
        self.disabled.insert(element, disabled);
        self.events.push(SurfaceEvent::Disabled(element, disabled));
    }
}
