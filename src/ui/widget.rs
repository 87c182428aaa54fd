//! egui map canvas: base imagery, attached WMS overlays, pan/zoom input and
//! the click popup.

use crate::{
    core::{
        config::ViewerConfig,
        geo::{Point, TileCoord},
        viewport::Viewport,
    },
    layers::{manager::LayerStack, wms::WmsLayer},
    prelude::{HashMap, HashSet},
    tiles::{
        loader::{TileKey, TileLoader, TileResult},
        source::{TileSource, XyzSource},
    },
    traits::MapSurface,
    ui::content::{PopupBody, PopupContent},
    Result,
};
use egui::{
    Align2, Color32, ColorImage, CursorIcon, Id, Order, Pos2, Rect, Response, Sense, TextureHandle,
    TextureOptions, Ui, Vec2,
};

/// Tile key layer id used for the base imagery
pub const BASE_LAYER_ID: &str = "__base__";

const ZOOM_STEP: f64 = 1.0;
const SCROLL_ZOOM_RATE: f64 = 0.002;
const POPUP_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// What happened on the canvas this frame
#[derive(Debug)]
pub struct CanvasResponse {
    pub response: Response,
    /// Projected coordinate of a single click on the map
    pub clicked: Option<Point>,
    /// The popup's close button was pressed
    pub close_popup: bool,
}

pub struct MapCanvas {
    viewport: Viewport,
    base: XyzSource,
    overlays: LayerStack,
    loader: TileLoader,
    textures: HashMap<TileKey, TextureHandle>,
    /// Tiles that failed once; not requested again
    failed: HashSet<TileKey>,
}

impl MapCanvas {
    pub fn new(config: &ViewerConfig) -> Self {
        let viewport = Viewport::new(config.initial_center, config.initial_zoom, Point::new(0.0, 0.0))
            .with_zoom_limits(config.min_zoom, config.max_zoom);
        Self {
            viewport,
            base: XyzSource::new(config.base_imagery_url.clone()),
            overlays: LayerStack::new(),
            loader: TileLoader::new(),
            textures: HashMap::default(),
            failed: HashSet::default(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn overlays(&self) -> &LayerStack {
        &self.overlays
    }

    /// Whether tile downloads are still in flight
    pub fn is_loading(&self) -> bool {
        self.loader.pending_count() > 0
    }

    pub fn show(&mut self, ui: &mut Ui, popup: Option<&PopupContent>) -> CanvasResponse {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.viewport
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));

        self.handle_input(ui, rect, &response);
        let clicked = self.clicked_coordinate(rect, &response);

        self.receive_tiles(ui.ctx());
        let visible = self.viewport.visible_tiles();
        self.request_tiles(&visible);
        self.retain_visible(&visible);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_gray(24));
        self.paint_layer(&painter, rect, BASE_LAYER_ID, &visible, 1.0);
        let zoom = self.viewport.zoom;
        for layer in self.overlays.layers() {
            if layer.is_visible_at(zoom) {
                self.paint_layer(&painter, rect, layer.id(), &visible, layer.opacity());
            }
        }

        self.zoom_buttons(ui, rect);
        let close_popup = popup.map_or(false, |content| self.show_popup(ui, rect, content));

        if response.dragged() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        }

        CanvasResponse {
            response,
            clicked,
            close_popup,
        }
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.0 {
                self.viewport
                    .pan_by_pixels(Point::new(delta.x as f64, delta.y as f64));
            }
        }

        if !response.hovered() {
            return;
        }
        let (pinch, scroll) = ui.input(|i| (i.zoom_delta(), i.raw_scroll_delta.y));
        let zoom_change = if pinch != 1.0 {
            (pinch as f64).log2()
        } else {
            scroll as f64 * SCROLL_ZOOM_RATE
        };
        if zoom_change.abs() > f64::EPSILON {
            let anchor = response
                .hover_pos()
                .map(|pos| pos - rect.min)
                .map(|offset| Point::new(offset.x as f64, offset.y as f64))
                .unwrap_or_else(|| self.viewport.size.multiply(0.5));
            self.viewport.zoom_around(self.viewport.zoom + zoom_change, anchor);
        }
    }

    fn clicked_coordinate(&self, rect: Rect, response: &Response) -> Option<Point> {
        if !response.clicked() {
            return None;
        }
        let offset = response.interact_pointer_pos()? - rect.min;
        Some(
            self.viewport
                .pixel_to_projected(Point::new(offset.x as f64, offset.y as f64)),
        )
    }

    fn receive_tiles(&mut self, ctx: &egui::Context) {
        for TileResult { key, data } in self.loader.drain() {
            let wanted = key.layer_id == BASE_LAYER_ID || self.overlays.has_layer(&key.layer_id);
            if !wanted {
                continue;
            }
            match data.and_then(|bytes| decode_tile(&bytes)) {
                Ok(image) => {
                    let name = format!("{}/{}/{}/{}", key.layer_id, key.coord.z, key.coord.x, key.coord.y);
                    let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
                    self.textures.insert(key, texture);
                }
                Err(e) => {
                    log::debug!("dropping tile {:?}: {}", key, e);
                    self.failed.insert(key);
                }
            }
        }
    }

    fn request_tiles(&mut self, visible: &[TileCoord]) {
        let zoom = self.viewport.zoom;
        let mut wanted: Vec<(TileKey, String)> = Vec::new();
        for &coord in visible {
            wanted.push((TileKey::new(BASE_LAYER_ID, coord), self.base.url(coord)));
            for layer in self.overlays.layers() {
                if layer.is_visible_at(zoom) {
                    wanted.push((TileKey::new(layer.id(), coord), layer.tile_url(coord)));
                }
            }
        }

        for (key, url) in wanted {
            if self.textures.contains_key(&key) || self.failed.contains(&key) {
                continue;
            }
            self.loader.request(key, url);
        }
    }

    fn retain_visible(&mut self, visible: &[TileCoord]) {
        let visible: HashSet<TileCoord> = visible.iter().copied().collect();
        self.textures.retain(|key, _| visible.contains(&key.coord));
        self.failed.retain(|key| visible.contains(&key.coord));
    }

    fn paint_layer(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        layer_id: &str,
        visible: &[TileCoord],
        opacity: f32,
    ) {
        let tint = Color32::WHITE.gamma_multiply(opacity);
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        for &coord in visible {
            let key = TileKey::new(layer_id, coord);
            if let Some(texture) = self.textures.get(&key) {
                painter.image(texture.id(), self.tile_rect(rect, coord), uv, tint);
            }
        }
    }

    fn tile_rect(&self, rect: Rect, coord: TileCoord) -> Rect {
        let bounds = coord.projected_bounds();
        let top_left = self
            .viewport
            .projected_to_pixel(Point::new(bounds.min_x, bounds.max_y));
        let bottom_right = self
            .viewport
            .projected_to_pixel(Point::new(bounds.max_x, bounds.min_y));
        Rect::from_min_max(
            rect.min + Vec2::new(top_left.x as f32, top_left.y as f32),
            rect.min + Vec2::new(bottom_right.x as f32, bottom_right.y as f32),
        )
    }

    fn zoom_buttons(&mut self, ui: &mut Ui, rect: Rect) {
        let size = Vec2::splat(28.0);
        let zoom_in = Rect::from_min_size(rect.min + Vec2::new(10.0, 10.0), size);
        let zoom_out = Rect::from_min_size(zoom_in.left_bottom() + Vec2::new(0.0, 4.0), size);
        let center = self.viewport.size.multiply(0.5);

        if ui.put(zoom_in, egui::Button::new("+")).clicked() {
            self.viewport.zoom_around(self.viewport.zoom + ZOOM_STEP, center);
        }
        if ui.put(zoom_out, egui::Button::new("−")).clicked() {
            self.viewport.zoom_around(self.viewport.zoom - ZOOM_STEP, center);
        }
    }

    /// Draws the popup pinned to its anchor; returns whether it was closed
    fn show_popup(&self, ui: &Ui, rect: Rect, content: &PopupContent) -> bool {
        let Some(anchor) = popup_anchor(content, &self.viewport) else {
            return false;
        };
        let pos = rect.min + Vec2::new(anchor.x as f32, anchor.y as f32) + POPUP_OFFSET;
        ui.painter_at(rect)
            .circle_filled(pos - POPUP_OFFSET, 4.0, Color32::from_rgb(220, 60, 60));

        let mut closed = false;
        egui::Area::new(Id::new("layerview_popup"))
            .order(Order::Foreground)
            .fixed_pos(pos)
            .pivot(Align2::LEFT_TOP)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(280.0);
                    ui.horizontal(|ui| {
                        if ui.small_button("✕").clicked() {
                            closed = true;
                        }
                    });
                    popup_body(ui, &content.body);
                    ui.separator();
                    ui.label(content.caption);
                    ui.monospace(&content.x_line);
                    ui.monospace(&content.y_line);
                    ui.monospace(&content.hdms);
                });
            });
        closed
    }
}

impl MapSurface for MapCanvas {
    fn has_layer(&self, id: &str) -> bool {
        self.overlays.has_layer(id)
    }

    fn attached_ids(&self) -> Vec<String> {
        self.overlays.attached_ids()
    }

    fn attach(&mut self, layer: WmsLayer) -> Result<()> {
        self.overlays.attach(layer)
    }

    fn detach(&mut self, id: &str) -> Result<Option<WmsLayer>> {
        self.textures.retain(|key, _| key.layer_id != id);
        self.failed.retain(|key| key.layer_id != id);
        self.loader.forget_layer(id);
        self.overlays.detach(id)
    }
}

/// Pixel position of the popup anchor within the canvas
fn popup_anchor(content: &PopupContent, viewport: &Viewport) -> Option<Point> {
    let pixel = viewport.projected_to_pixel(content.anchor);
    pixel.is_finite().then_some(pixel)
}

fn popup_body(ui: &mut Ui, body: &PopupBody) {
    match body {
        PopupBody::Loading(text) => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(*text);
            });
        }
        PopupBody::Record { title, rows } => {
            ui.strong(*title);
            egui::Grid::new("layerview_popup_rows")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (label, value) in rows {
                        ui.label(*label);
                        ui.label(value);
                        ui.end_row();
                    }
                });
        }
        PopupBody::Empty(text) => {
            ui.label(*text);
        }
    }
}

fn decode_tile(bytes: &[u8]) -> Result<ColorImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| crate::MapError::Layer(format!("undecodable tile: {}", e)))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::registry::LayerRegistry;

    #[test]
    fn test_canvas_starts_at_configured_view() {
        let config = ViewerConfig::default();
        let canvas = MapCanvas::new(&config);

        assert_eq!(canvas.viewport().zoom, 5.7);
        assert_eq!(canvas.viewport().center, config.initial_center.to_mercator());
        assert!(canvas.overlays().is_empty());
        assert!(!canvas.is_loading());
    }

    #[test]
    fn test_canvas_is_a_map_surface() {
        let registry = LayerRegistry::default();
        let mut canvas = MapCanvas::new(&ViewerConfig::default());
        let gov = WmsLayer::from_descriptor(registry.get("gov").unwrap()).unwrap();

        canvas.attach(gov.clone()).unwrap();
        assert!(canvas.has_layer("gov"));
        assert!(canvas.attach(gov).is_err());

        assert!(canvas.detach("gov").unwrap().is_some());
        assert!(canvas.attached_ids().is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_tile(b"not an image").is_err());
    }
}
