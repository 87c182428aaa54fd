//! Viewer-wide constants: projection parameters, tile grid, and the default
//! addresses of the external services the viewer talks to.

/// Square tile size in pixels for both base imagery and WMS overlays.
pub const TILE_SIZE: u32 = 256;

/// WGS84 semi-major axis used by Web Mercator (EPSG:3857).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude where Web Mercator becomes a square world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Half the width of the projected world in meters.
pub const HALF_WORLD: f64 = std::f64::consts::PI * EARTH_RADIUS;

/// Deepest tile zoom requested from any source.
pub const MAX_TILE_ZOOM: u8 = 22;

/// Lookup service queried with the clicked `X`/`Y`.
pub const DEFAULT_ATTRIBUTE_ENDPOINT: &str = "http://10.100.100.41:1000/API/basemap/";

/// Satellite base imagery.
pub const DEFAULT_BASE_IMAGERY_URL: &str = "http://mt0.google.com/vt/lyrs=s&hl=en&x={x}&y={y}&z={z}";

/// Initial view center as (lon, lat).
pub const DEFAULT_CENTER_LON_LAT: (f64, f64) = (31.0, 31.0);

pub const DEFAULT_ZOOM: f64 = 5.7;

/// Projection code sent with WMS GetMap requests.
pub const WMS_CRS: &str = "EPSG:3857";

pub const WMS_VERSION: &str = "1.3.0";
