use crate::layers::{registry::LayerRegistry, selection::LayerSelection};
use egui::{Align, Layout, RichText, ScrollArea, Sense, Ui};

pub const PANEL_TITLE: &str = "طبقات الخريطة";

/// Right-to-left checkbox list with one row per registry layer, in
/// registry order.
///
/// The panel never mutates the selection itself; it reports which ids the
/// user flipped so the session can toggle and reconcile them.
#[derive(Debug, Clone, Default)]
pub struct LayerPanel;

impl LayerPanel {
    pub fn new() -> Self {
        Self
    }

    /// Draws the panel and returns the ids toggled this frame
    pub fn show(&self, ui: &mut Ui, registry: &LayerRegistry, selection: &LayerSelection) -> Vec<String> {
        let mut toggled = Vec::new();

        ui.with_layout(Layout::top_down(Align::Max), |ui| {
            ui.heading(PANEL_TITLE);
            ui.separator();

            ScrollArea::vertical().show(ui, |ui| {
                for descriptor in registry.iter() {
                    let mut checked = selection.is_selected(&descriptor.id);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let boxed = ui.checkbox(&mut checked, "").changed();
                        let label = ui
                            .add(
                                egui::Label::new(RichText::new(descriptor.display_label()))
                                    .sense(Sense::click()),
                            )
                            .clicked();
                        if boxed || label {
                            toggled.push(descriptor.id.clone());
                        }
                    });
                }
            });
        });

        toggled
    }
}
