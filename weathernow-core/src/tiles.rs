use std::f64::consts::PI;

use crate::model::Coord;

/// Web Mercator cuts off at this latitude.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

const SUBDOMAINS: &[&str] = &["a", "b", "c"];

/// A tile coordinate in the slippy map tile system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Tile containing `coord` at `zoom`.
    pub fn from_coord(coord: Coord, zoom: u8) -> Self {
        let lat_rad = coord.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let n = 2_f64.powi(zoom as i32);
        let max = n - 1.0;

        let x = ((coord.lon + 180.0) / 360.0 * n).floor().clamp(0.0, max) as u32;
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n)
            .floor()
            .clamp(0.0, max) as u32;

        Self::new(x, y, zoom)
    }
}

/// A tile URL template such as `https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileTemplate(String);

impl TileTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn url(&self, coord: TileCoord) -> String {
        let sub = SUBDOMAINS[((coord.x as usize) + (coord.y as usize)) % SUBDOMAINS.len()];
        self.0
            .replace("{s}", sub)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}
