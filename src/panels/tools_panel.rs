use crate::SpinCanvasApp;
use crate::brush::{BrushType, BrushUpdate};

pub fn tools_panel(app: &mut SpinCanvasApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Brush");

            let brush = app.canvas().brush();
            let mut update = BrushUpdate::default();

            // Use selectable labels for better visual feedback
            for brush_type in BrushType::ALL {
                let is_selected = brush.brush_type == brush_type;
                if ui.selectable_label(is_selected, brush_type.name()).clicked() && !is_selected {
                    log::info!("Brush selected from UI: {}", brush_type.name());
                    update.brush_type = Some(brush_type);
                }
            }
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Color");
                let mut rgb = [brush.color.r(), brush.color.g(), brush.color.b()];
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    update.color = Some(egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]));
                }
            });

            let mut size = brush.size;
            if ui
                .add(egui::Slider::new(&mut size, 1.0..=50.0).text("Size"))
                .changed()
            {
                update.size = Some(size);
            }

            let mut opacity = brush.opacity;
            if ui
                .add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"))
                .changed()
            {
                update.opacity = Some(opacity);
            }

            if update != BrushUpdate::default() {
                app.canvas_mut().update_brush(&update);
            }

            ui.separator();
            ui.heading("History");

            // Undo/Redo section
            ui.horizontal(|ui| {
                let can_undo = app.canvas().can_undo();
                let can_redo = app.canvas().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.canvas_mut().undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.canvas_mut().redo();
                }
            });

            let has_strokes = app.canvas().state().history.with(|history| !history.is_empty());
            if ui.add_enabled(has_strokes, egui::Button::new("Clear")).clicked() {
                app.canvas_mut().clear();
            }

            ui.separator();

            let (active, total) = app
                .canvas()
                .state()
                .history
                .with(|history| (history.active_len(), history.len()));
            ui.label(format!("Strokes: {}", active));
            ui.label(format!("Redo buffer: {}", total - active));
        });
}
