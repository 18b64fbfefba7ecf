//! Map lifecycle: one map per session, one weather overlay at a time.

use std::{sync::Arc, time::Duration};

use log::{debug, warn};

use crate::{
    backend::Backend,
    error::MapError,
    model::{Coord, MapConfig},
    tiles::TileTemplate,
};

pub mod headless;

pub use headless::HeadlessMap;

pub const BASE_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const BASE_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const OVERLAY_PANE: &str = "weatherPane";
/// Above the tile pane (200) and the overlay pane (400), below markers (600+50).
pub const OVERLAY_PANE_Z_INDEX: i32 = 650;
pub const OVERLAY_OPACITY: f32 = 0.6;
pub const DEFAULT_ZOOM: u8 = 10;
pub const MAX_ZOOM: u8 = 19;
pub const INVALIDATE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerOptions {
    pub template: TileTemplate,
    pub pane: Option<String>,
    pub opacity: f32,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayerOptions {
    pub fn base() -> Self {
        Self {
            template: TileTemplate::new(BASE_TILE_URL),
            pane: None,
            opacity: 1.0,
            attribution: BASE_ATTRIBUTION.to_string(),
            max_zoom: MAX_ZOOM,
        }
    }

    pub fn overlay(config: &MapConfig) -> Self {
        Self {
            template: TileTemplate::new(config.overlay_template()),
            pane: Some(OVERLAY_PANE.to_string()),
            opacity: OVERLAY_OPACITY,
            attribution: String::new(),
            max_zoom: MAX_ZOOM,
        }
    }
}

/// The third-party mapping library, seen from the session.
pub trait MapLibrary {
    fn create_map(&mut self, container: &str, center: Coord, zoom: u8) -> MapId;

    fn set_view(&mut self, map: MapId, center: Coord, zoom: u8);

    fn create_pane(&mut self, map: MapId, name: &str, z_index: i32);

    fn add_tile_layer(&mut self, map: MapId, options: TileLayerOptions) -> LayerId;

    fn remove_layer(&mut self, map: MapId, layer: LayerId);

    /// Recompute the map size once `delay` has passed.
    fn schedule_invalidate_size(&mut self, map: MapId, delay: Duration);
}

/// What a [`MapSession::show`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapUpdate {
    /// Container or library missing; nothing happened.
    Skipped,
    Created { map: MapId, overlay: LayerId },
    Recentered { map: MapId, overlay: LayerId },
}

/// Owns the map instance and the current overlay layer.
#[derive(Debug)]
pub struct MapSession<L> {
    backend: Arc<dyn Backend>,
    library: Option<L>,
    zoom: u8,
    map: Option<MapId>,
    overlay: Option<LayerId>,
}

impl<L: MapLibrary> MapSession<L> {
    /// `library` is `None` when no mapping library is available.
    pub fn new(backend: Arc<dyn Backend>, library: Option<L>) -> Self {
        Self {
            backend,
            library,
            zoom: DEFAULT_ZOOM,
            map: None,
            overlay: None,
        }
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn library(&self) -> Option<&L> {
        self.library.as_ref()
    }

    pub fn map(&self) -> Option<MapId> {
        self.map
    }

    pub fn overlay(&self) -> Option<LayerId> {
        self.overlay
    }

    /// Show `center` on the map in `container` with a fresh weather overlay.
    pub async fn show(&mut self, container: Option<&str>, center: Coord) -> Result<MapUpdate, MapError> {
        let Some(container) = container else {
            warn!("map container not found, map disabled");
            return Ok(MapUpdate::Skipped);
        };
        if self.library.is_none() {
            warn!("map library not available, map disabled");
            return Ok(MapUpdate::Skipped);
        }

        let config = self.backend.map_config().await.map_err(MapError::Config)?;

        let (map, created) = match self.map {
            Some(map) => {
                self.recenter(center);
                (map, false)
            }
            None => match self.init(container, center) {
                Some(map) => (map, true),
                None => return Ok(MapUpdate::Skipped),
            },
        };

        let Some(overlay) = self.set_overlay(&config) else {
            return Ok(MapUpdate::Skipped);
        };

        if let Some(lib) = self.library.as_mut() {
            lib.schedule_invalidate_size(map, INVALIDATE_DELAY);
        }

        Ok(if created {
            MapUpdate::Created { map, overlay }
        } else {
            MapUpdate::Recentered { map, overlay }
        })
    }

    /// Create the map with its base layer and overlay pane. Returns the
    /// existing map if there already is one.
    pub fn init(&mut self, container: &str, center: Coord) -> Option<MapId> {
        if let Some(map) = self.map {
            return Some(map);
        }
        let lib = self.library.as_mut()?;

        let map = lib.create_map(container, center, self.zoom);
        lib.add_tile_layer(map, TileLayerOptions::base());
        lib.create_pane(map, OVERLAY_PANE, OVERLAY_PANE_Z_INDEX);
        debug!("map created in #{container} at {}, {}", center.lat, center.lon);

        self.map = Some(map);
        Some(map)
    }

    pub fn recenter(&mut self, center: Coord) {
        let (Some(map), Some(lib)) = (self.map, self.library.as_mut()) else {
            return;
        };
        lib.set_view(map, center, self.zoom);
        debug!("map recentered at {}, {}", center.lat, center.lon);
    }

    /// Replace the weather overlay. The previous one is always removed first.
    pub fn set_overlay(&mut self, config: &MapConfig) -> Option<LayerId> {
        let map = self.map?;
        let lib = self.library.as_mut()?;

        if let Some(old) = self.overlay.take() {
            lib.remove_layer(map, old);
        }

        let layer = lib.add_tile_layer(map, TileLayerOptions::overlay(config));
        debug!("overlay layer '{}' added", config.default_layer_code());
        self.overlay = Some(layer);
        Some(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubBackend, map_config_body};
    use reqwest::StatusCode;

    fn session(backend: StubBackend) -> (Arc<StubBackend>, MapSession<HeadlessMap>) {
        let backend = Arc::new(backend);
        let session = MapSession::new(backend.clone(), Some(HeadlessMap::default()));
        (backend, session)
    }

    #[tokio::test]
    async fn first_show_creates_map_with_base_layer_and_pane() {
        let (_, mut session) = session(StubBackend::new().with_map_config(map_config_body()));

        let update = session.show(Some("map"), Coord::new(52.2, 21.0)).await.unwrap();
        assert!(matches!(update, MapUpdate::Created { .. }));

        let lib = session.library().unwrap();
        assert_eq!(lib.map_count(), 1);
        assert_eq!(lib.center(), Some(Coord::new(52.2, 21.0)));
        assert_eq!(lib.pane_z_index(OVERLAY_PANE), Some(OVERLAY_PANE_Z_INDEX));
        assert_eq!(lib.layers().len(), 2);
        assert_eq!(lib.invalidations(), &[INVALIDATE_DELAY]);

        let overlay = lib.layer(session.overlay().unwrap()).unwrap();
        assert_eq!(overlay.pane.as_deref(), Some(OVERLAY_PANE));
        assert_eq!(overlay.opacity, OVERLAY_OPACITY);
        assert_eq!(
            overlay.template.as_str(),
            "https://tile.openweathermap.org/map/precipitation_new/{z}/{x}/{y}.png?appid=KEY"
        );
    }

    #[tokio::test]
    async fn later_show_recenters_and_swaps_overlay() {
        let (backend, mut session) = session(StubBackend::new().with_map_config(map_config_body()));

        session.show(Some("map"), Coord::new(52.2, 21.0)).await.unwrap();
        let first_overlay = session.overlay().unwrap();

        let update = session.show(Some("map"), Coord::new(50.06, 19.94)).await.unwrap();
        assert!(matches!(update, MapUpdate::Recentered { .. }));

        let lib = session.library().unwrap();
        assert_eq!(lib.map_count(), 1);
        assert_eq!(lib.center(), Some(Coord::new(50.06, 19.94)));
        // base layer plus exactly one overlay
        assert_eq!(lib.layers().len(), 2);
        assert!(lib.layer(first_overlay).is_none());
        assert_ne!(session.overlay(), Some(first_overlay));
        // map config is fetched on every call
        assert_eq!(backend.requests_to("/map/config"), 2);
    }

    #[tokio::test]
    async fn missing_container_or_library_is_a_no_op() {
        let (backend, mut session) = session(StubBackend::new().with_map_config(map_config_body()));
        let update = session.show(None, Coord::new(1.0, 2.0)).await.unwrap();
        assert_eq!(update, MapUpdate::Skipped);
        assert_eq!(session.library().unwrap().map_count(), 0);

        let mut bare: MapSession<HeadlessMap> = MapSession::new(backend.clone(), None);
        let update = bare.show(Some("map"), Coord::new(1.0, 2.0)).await.unwrap();
        assert_eq!(update, MapUpdate::Skipped);
        assert_eq!(backend.requests().len(), 0);
    }

    #[tokio::test]
    async fn rejected_map_config_aborts_without_touching_map() {
        let (_, mut session) = session(
            StubBackend::new().with("/map/config", StatusCode::INTERNAL_SERVER_ERROR, "oops"),
        );
        let err = session.show(Some("map"), Coord::new(1.0, 2.0)).await.unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
        assert_eq!(session.library().unwrap().map_count(), 0);
        assert_eq!(session.map(), None);
    }

    #[tokio::test]
    async fn zoom_is_passed_to_the_library() {
        let backend = Arc::new(StubBackend::new().with_map_config(map_config_body()));
        let mut session = MapSession::new(backend, Some(HeadlessMap::default())).with_zoom(6);
        session.show(Some("map"), Coord::new(1.0, 2.0)).await.unwrap();
        assert_eq!(session.library().unwrap().zoom(), Some(6));
    }
}
