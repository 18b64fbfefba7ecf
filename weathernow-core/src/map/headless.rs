use std::{collections::BTreeMap, time::Duration};

use log::debug;

use super::{LayerId, MapId, MapLibrary, TileLayerOptions};
use crate::{model::Coord, tiles::TileCoord};

/// A [`MapLibrary`] with no display: it keeps the map state in memory so it
/// can be inspected or printed.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMap {
    next_id: u64,
    maps: Vec<MapId>,
    container: Option<String>,
    center: Option<Coord>,
    zoom: Option<u8>,
    panes: BTreeMap<String, i32>,
    layers: BTreeMap<u64, TileLayerOptions>,
    invalidations: Vec<Duration>,
}

impl HeadlessMap {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn center(&self) -> Option<Coord> {
        self.center
    }

    pub fn zoom(&self) -> Option<u8> {
        self.zoom
    }

    pub fn pane_z_index(&self, name: &str) -> Option<i32> {
        self.panes.get(name).copied()
    }

    /// Layers currently on the map, oldest first.
    pub fn layers(&self) -> Vec<&TileLayerOptions> {
        self.layers.values().collect()
    }

    pub fn layer(&self, id: LayerId) -> Option<&TileLayerOptions> {
        self.layers.get(&id.0)
    }

    pub fn invalidations(&self) -> &[Duration] {
        &self.invalidations
    }

    /// Tile under the current center, at the current zoom.
    pub fn center_tile(&self) -> Option<TileCoord> {
        Some(TileCoord::from_coord(self.center?, self.zoom?))
    }
}

impl MapLibrary for HeadlessMap {
    fn create_map(&mut self, container: &str, center: Coord, zoom: u8) -> MapId {
        let id = MapId(self.next());
        self.maps.push(id);
        self.container = Some(container.to_string());
        self.center = Some(center);
        self.zoom = Some(zoom);
        id
    }

    fn set_view(&mut self, _map: MapId, center: Coord, zoom: u8) {
        self.center = Some(center);
        self.zoom = Some(zoom);
    }

    fn create_pane(&mut self, _map: MapId, name: &str, z_index: i32) {
        self.panes.insert(name.to_string(), z_index);
    }

    fn add_tile_layer(&mut self, _map: MapId, options: TileLayerOptions) -> LayerId {
        let id = self.next();
        self.layers.insert(id, options);
        LayerId(id)
    }

    fn remove_layer(&mut self, _map: MapId, layer: LayerId) {
        if self.layers.remove(&layer.0).is_none() {
            debug!("layer {} was not on the map", layer.0);
        }
    }

    fn schedule_invalidate_size(&mut self, _map: MapId, delay: Duration) {
        self.invalidations.push(delay);
    }
}
