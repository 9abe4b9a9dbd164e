//! Central canvas UI: the 3D scene.
//!
//! Objects are painted back to front with egui shapes, projected through the
//! orbit camera.

use crate::scene::{Primitive, SceneObject, Style, Surface};
use crate::state::{AppState, OrbitCamera};
use eframe::egui::{self, Color32, Painter, Pos2, Rect, RichText, Sense, Shape, Stroke, Vec2};
use glam::{DVec2, DVec3, Vec3};
use std::f32::consts::TAU;

const AXIS_COLORS: [Color32; 3] = [Color32::RED, Color32::GREEN, Color32::BLUE];

pub fn render_canvas(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available_size = ui.available_size();

        // Allocate the full available space for the canvas
        let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());

        let rect = response.rect;

        painter.rect_filled(rect, 0.0, state.config.background_color());

        handle_canvas_interaction(&response, &rect, state);

        // Keep repainting until damped motion settles
        if state.camera.update() {
            ctx.request_repaint();
        }

        render_scene(&painter, &rect, state);

        draw_overlay_info(ui, &rect, state);
    });
}

fn handle_canvas_interaction(response: &egui::Response, rect: &Rect, state: &mut AppState) {
    let height = rect.height();

    if response.dragged_by(egui::PointerButton::Primary) {
        state.camera.rotate(response.drag_delta(), height);
    } else if response.dragged_by(egui::PointerButton::Secondary)
        || response.dragged_by(egui::PointerButton::Middle)
    {
        state.camera.pan(response.drag_delta(), height);
    }

    if response.hovered() {
        let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            state.camera.zoom(scroll_delta.y);
        }
    }

    // Reset view on double-click
    if response.double_clicked() {
        state.camera.reset();
    }

    state.cursor_geo = response
        .hover_pos()
        .and_then(|pos| state.camera.screen_to_ground(pos, *rect))
        .map(|ground| {
            state
                .projector()
                .unproject(DVec2::new(ground.x as f64, ground.y as f64))
        });
}

fn render_scene(painter: &Painter, rect: &Rect, state: &AppState) {
    if state.scene.is_empty() {
        return;
    }

    let camera = &state.camera;
    let eye = camera.eye();

    // Painter's algorithm: farthest anchor first
    let mut ordered: Vec<(f32, &SceneObject)> = state
        .scene
        .objects()
        .iter()
        .filter(|object| object.visible)
        .map(|object| (eye.distance(object.anchor().as_vec3()), object))
        .collect();
    ordered.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, object) in ordered {
        render_object(painter, rect, camera, object);
    }
}

fn render_object(painter: &Painter, rect: &Rect, camera: &OrbitCamera, object: &SceneObject) {
    let style = &object.style;

    match &object.primitive {
        Primitive::Sphere {
            center,
            radius,
            segments,
        } => {
            let Some(screen) = camera.world_to_screen(center.as_vec3(), *rect) else {
                return;
            };
            let screen_radius = *radius as f32 * camera.points_per_unit(screen.depth, *rect);
            let segments = (*segments).max(3);
            let outline: Vec<Pos2> = (0..segments)
                .map(|i| {
                    let angle = TAU * i as f32 / segments as f32;
                    screen.pos + screen_radius * Vec2::angled(angle)
                })
                .collect();
            painter.add(Shape::convex_polygon(
                outline,
                style.effective_color(),
                Stroke::NONE,
            ));
        }
        Primitive::Polyline { vertices } => {
            let stroke = Stroke::new(style.line_width, style.effective_color());
            draw_polyline(painter, rect, camera, vertices, stroke);
        }
        Primitive::Surface(surface) => {
            draw_surface(painter, rect, camera, surface, style);
        }
        Primitive::Axes { origin, length } => {
            let directions = [DVec3::X, DVec3::Y, DVec3::Z];
            for (direction, color) in directions.iter().zip(AXIS_COLORS) {
                let end = *origin + *direction * *length;
                draw_polyline(
                    painter,
                    rect,
                    camera,
                    &[*origin, end],
                    Stroke::new(style.line_width, color),
                );
            }
        }
    }
}

/// Draws the projected path, breaking it where vertices fall out of view.
fn draw_polyline(
    painter: &Painter,
    rect: &Rect,
    camera: &OrbitCamera,
    vertices: &[DVec3],
    stroke: Stroke,
) {
    let mut run: Vec<Pos2> = Vec::with_capacity(vertices.len());

    for vertex in vertices {
        match camera.world_to_screen(vertex.as_vec3(), *rect) {
            Some(screen) => run.push(screen.pos),
            None => flush_run(painter, &mut run, stroke),
        }
    }
    flush_run(painter, &mut run, stroke);
}

fn flush_run(painter: &Painter, run: &mut Vec<Pos2>, stroke: Stroke) {
    if run.len() >= 2 {
        painter.add(Shape::line(std::mem::take(run), stroke));
    } else {
        run.clear();
    }
}

fn draw_surface(
    painter: &Painter,
    rect: &Rect,
    camera: &OrbitCamera,
    surface: &Surface,
    style: &Style,
) {
    let color = style.effective_color();
    let mut mesh = egui::Mesh::default();

    for triangle in &surface.triangles {
        let projected: Option<Vec<Pos2>> = triangle
            .iter()
            .map(|corner| {
                let world = Vec3::new(corner.x as f32, corner.y as f32, surface.z as f32);
                camera.world_to_screen(world, *rect).map(|s| s.pos)
            })
            .collect();
        let Some(corners) = projected else {
            continue;
        };

        if !style.double_sided && is_back_facing(triangle, &corners) {
            continue;
        }

        let base = mesh.vertices.len() as u32;
        for corner in corners {
            mesh.colored_vertex(corner, color);
        }
        mesh.add_triangle(base, base + 1, base + 2);
    }

    if !mesh.is_empty() {
        painter.add(Shape::mesh(mesh));
    }
}

/// True when the +Z face of `triangle` points away from the viewer.
///
/// Screen y grows downwards, so a front-facing triangle flips its winding.
fn is_back_facing(triangle: &[DVec2; 3], screen: &[Pos2]) -> bool {
    let [a, b, c] = triangle;
    let world = (*b - *a).perp_dot(*c - *a);
    let screen = (screen[1] - screen[0]).x * (screen[2] - screen[0]).y
        - (screen[1] - screen[0]).y * (screen[2] - screen[0]).x;
    world as f32 * screen > 0.0
}

fn draw_overlay_info(ui: &mut egui::Ui, rect: &Rect, state: &AppState) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);

    // Create a small overlay area
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(220.0, 70.0));
    let text_color = Color32::from_rgb(60, 60, 80);

    let cursor = match state.cursor_geo {
        Some(coord) => format!("Lon: {:.5}  Lat: {:.5}", coord.x, coord.y),
        None => "Lon: --  Lat: --".to_string(),
    };
    let objects = format!(
        "Objects: {} ({} visible)",
        state.scene.len(),
        state.scene.visible_objects().count()
    );

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            ui.label(RichText::new(cursor).monospace().size(12.0).color(text_color));
            ui.label(RichText::new(objects).monospace().size(12.0).color(text_color));
            if state.pending_loads > 0 {
                ui.label(
                    RichText::new(format!("Loading: {}", state.pending_loads))
                        .monospace()
                        .size(12.0)
                        .color(text_color),
                );
            }
        });
    });
}
