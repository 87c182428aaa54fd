use crate::core::{
    constants::{HALF_WORLD, MAX_TILE_ZOOM, TILE_SIZE},
    geo::{LatLng, Point, ProjectedBounds, TileCoord},
};
use serde::{Deserialize, Serialize};

/// Manages the current view of the map: center, zoom, and screen dimensions.
///
/// The center is kept in projected meters so that clicks map straight to the
/// EPSG:3857 coordinates the lookup service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in projected meters
    pub center: Point,
    /// The current zoom level (fractional)
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center: center.to_mercator(),
            zoom: zoom.clamp(0.0, MAX_TILE_ZOOM as f64),
            size,
            min_zoom: 0.0,
            max_zoom: MAX_TILE_ZOOM as f64,
        }
    }

    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
        self
    }

    /// Meters per pixel at the current zoom
    pub fn resolution(&self) -> f64 {
        2.0 * HALF_WORLD / (TILE_SIZE as f64 * 2_f64.powf(self.zoom))
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = Point::new(
            center.x.clamp(-HALF_WORLD, HALF_WORLD),
            center.y.clamp(-HALF_WORLD, HALF_WORLD),
        );
    }

    /// Converts a pixel position (origin top-left) to projected meters
    pub fn pixel_to_projected(&self, pixel: Point) -> Point {
        let res = self.resolution();
        Point::new(
            self.center.x + (pixel.x - self.size.x / 2.0) * res,
            self.center.y - (pixel.y - self.size.y / 2.0) * res,
        )
    }

    /// Converts projected meters to a pixel position (origin top-left)
    pub fn projected_to_pixel(&self, point: Point) -> Point {
        let res = self.resolution();
        Point::new(
            (point.x - self.center.x) / res + self.size.x / 2.0,
            (self.center.y - point.y) / res + self.size.y / 2.0,
        )
    }

    /// Moves the view so the content follows a drag of `delta` pixels
    pub fn pan_by_pixels(&mut self, delta: Point) {
        let res = self.resolution();
        self.set_center(Point::new(
            self.center.x - delta.x * res,
            self.center.y + delta.y * res,
        ));
    }

    /// Changes zoom while keeping the content under `anchor` (pixels) fixed
    pub fn zoom_around(&mut self, zoom: f64, anchor: Point) {
        let fixed = self.pixel_to_projected(anchor);
        self.set_zoom(zoom);
        let res = self.resolution();
        self.set_center(Point::new(
            fixed.x - (anchor.x - self.size.x / 2.0) * res,
            fixed.y + (anchor.y - self.size.y / 2.0) * res,
        ));
    }

    /// Projected extent currently on screen
    pub fn bounds(&self) -> ProjectedBounds {
        let top_left = self.pixel_to_projected(Point::new(0.0, 0.0));
        let bottom_right = self.pixel_to_projected(self.size);
        ProjectedBounds::new(top_left.x, bottom_right.y, bottom_right.x, top_left.y)
    }

    /// Integer zoom whose tiles best match the current resolution
    pub fn tile_zoom(&self) -> u8 {
        self.zoom.round().clamp(0.0, MAX_TILE_ZOOM as f64) as u8
    }

    /// Tiles at [`Self::tile_zoom`] that intersect the viewport, row by row
    pub fn visible_tiles(&self) -> Vec<TileCoord> {
        let z = self.tile_zoom();
        let bounds = self.bounds();
        let top_left = TileCoord::from_projected(Point::new(bounds.min_x, bounds.max_y), z);
        let bottom_right = TileCoord::from_projected(Point::new(bounds.max_x, bounds.min_y), z);

        let mut tiles = Vec::new();
        for y in top_left.y..=bottom_right.y {
            for x in top_left.x..=bottom_right.x {
                tiles.push(TileCoord::new(x, y, z));
            }
        }
        tiles
    }
}
