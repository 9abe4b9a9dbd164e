//! Right panel UI: layer toggles and view controls.

use crate::scene::GeometryKind;
use crate::state::AppState;
use eframe::egui::{self, RichText, ScrollArea};

pub fn render_right_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::right("right_panel")
        .resizable(true)
        .default_width(200.0)
        .min_width(160.0)
        .max_width(320.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Controls");
                ui.separator();

                render_layers_section(ui, state);
                ui.add_space(5.0);

                render_view_section(ui, state);
            });
        });
}

/// Stable widget id of the toggle for `kind`, e.g. `toggle_points`.
fn toggle_id(kind: GeometryKind) -> String {
    format!("toggle_{}", kind.label().to_lowercase())
}

fn render_layers_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Layers").strong())
        .default_open(true)
        .show(ui, |ui| {
            let mut flags = state.scene.flags();
            let mut changed = false;

            for kind in GeometryKind::all() {
                let count = state.scene.count(*kind);
                ui.push_id(toggle_id(*kind), |ui| {
                    ui.horizontal(|ui| {
                        changed |= ui.checkbox(flags.flag_mut(*kind), kind.label()).changed();
                        ui.label(RichText::new(format!("({})", count)).small().weak());
                    });
                });
            }

            if changed {
                log::debug!("Visibility changed: {:?}", flags);
                state.scene.set_flags(flags);
            }
        });
}

fn render_view_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("View").strong())
        .default_open(true)
        .show(ui, |ui| {
            ui.label(
                RichText::new(format!("Distance: {:.0}", state.camera.distance))
                    .monospace()
                    .small(),
            );

            if ui.button("Reset camera").clicked() {
                state.camera.reset();
            }

            ui.label(
                RichText::new("Drag to orbit, right-drag to pan, scroll to zoom")
                    .small()
                    .weak(),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_ids_are_stable() {
        assert_eq!(toggle_id(GeometryKind::Point), "toggle_points");
        assert_eq!(toggle_id(GeometryKind::LineString), "toggle_lines");
        assert_eq!(toggle_id(GeometryKind::Polygon), "toggle_polygons");
    }
}
