//! Core library for the WeatherNow widget.
//!
//! This crate defines:
//! - The backend proxy client (`/weather`, `/config`, `/map/config`)
//! - Defensive rendering of weather payloads onto a [`Surface`]
//! - Classification of failures into user-facing alerts
//! - The map session that owns the map and its weather overlay
//!
//! It is used by `weathernow-cli`, but the widget only talks to the
//! [`Surface`] and [`MapLibrary`] traits, so other front ends can reuse it.

pub mod backend;
pub mod classify;
pub mod config;
pub mod error;
pub mod map;
pub mod model;
pub mod render;
pub mod surface;
pub mod tiles;
pub mod widget;

#[cfg(test)]
mod test_support;

pub use backend::{Backend, BaseUrl, HttpBackend};
pub use classify::{Alert, classify};
pub use config::Config;
pub use error::{LookupError, MapError, SetupError};
pub use map::{HeadlessMap, MapLibrary, MapSession, MapUpdate};
pub use model::{Coord, MapConfig, RemoteConfig, WeatherPayload};
pub use render::{RenderedWeather, format_or_placeholder};
pub use surface::{Element, MemorySurface, Surface};
pub use tiles::{TileCoord, TileTemplate};
pub use widget::{CheckOutcome, UiEvent, WeatherWidget};
