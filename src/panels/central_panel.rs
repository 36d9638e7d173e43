use crate::SpinCanvasApp;

pub fn central_panel(app: &mut SpinCanvasApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(ctx.style().visuals.extreme_bg_color))
        .show(ctx, |ui| {
            let available = ui.available_rect_before_wrap();
            app.canvas_mut().resize(available.size());

            let canvas_rect = egui::Rect::from_center_size(available.center(), app.canvas().settings().canvas_size());

            // Claim the area so egui does not treat drags on it as window moves
            ui.allocate_rect(available, egui::Sense::drag());

            // Handle input
            app.input_mut().set_canvas_rect(canvas_rect);
            let events = app.input_mut().process_input(ctx);
            for event in events {
                app.canvas_mut().handle_input(event);
            }

            // Render the canvas
            if let Some(texture) = app.canvas_texture(ctx) {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                ui.painter()
                    .image(texture, canvas_rect, uv, egui::Color32::WHITE);
            }
        });
}
