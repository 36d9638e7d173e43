use crate::SpinCanvasApp;
use crate::app::ExportOutcome;
use crate::settings::{RotationDirection, SettingsUpdate};

pub fn settings_panel(app: &mut SpinCanvasApp, ctx: &egui::Context) {
    egui::SidePanel::right("settings_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Canvas");

            let settings = app.canvas().settings();
            let mut update = SettingsUpdate::default();

            ui.horizontal(|ui| {
                ui.label("Background");
                let color = settings.background_color;
                let mut rgb = [color.r(), color.g(), color.b()];
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    update.background_color = Some(egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]));
                }
            });

            let mut speed = settings.rotation_speed;
            if ui
                .add(egui::Slider::new(&mut speed, 0.0..=90.0).text("Speed (°/s)"))
                .changed()
            {
                update.rotation_speed = Some(speed);
            }

            egui::ComboBox::from_label("Direction")
                .selected_text(settings.rotation_direction.name())
                .show_ui(ui, |ui| {
                    for direction in RotationDirection::ALL {
                        let selected = settings.rotation_direction == direction;
                        if ui.selectable_label(selected, direction.name()).clicked() && !selected {
                            update.rotation_direction = Some(direction);
                        }
                    }
                });

            // The slider range follows the viewport
            let limits = app.canvas().radius_limits();
            let max_radius = app
                .canvas()
                .viewport()
                .map_or(settings.radius.max(limits.min_radius), |viewport| limits.max_radius(viewport));
            let min_radius = limits.min_radius.min(max_radius);
            let mut radius = settings.radius;
            if ui
                .add(egui::Slider::new(&mut radius, min_radius..=max_radius).text("Radius"))
                .changed()
            {
                update.radius = Some(radius);
            }

            if update != SettingsUpdate::default() {
                app.canvas_mut().update_settings(&update);
            }

            ui.horizontal(|ui| {
                let label = if app.canvas().is_rotating() { "Pause" } else { "Rotate" };
                if ui.button(label).clicked() {
                    app.canvas_mut().toggle_rotation();
                }
                if ui.button("Reset center").clicked() {
                    app.canvas_mut().reset_rotation_center();
                }
            });
            ui.label(format!("Angle: {:.1}°", app.canvas().angle()));

            ui.separator();
            ui.heading("Export");

            let exporting = app.exports().is_exporting();
            let has_strokes = app.canvas().stroke_count() > 0;

            let config = app.export_config_mut();
            ui.add(egui::Slider::new(&mut config.frame_delay_ms, 20..=1000).text("Frame delay (ms)"));
            if ui
                .add_enabled(!exporting && has_strokes, egui::Button::new("Export drawing process"))
                .clicked()
            {
                app.export_drawing_process();
            }

            let config = app.export_config_mut();
            ui.add(egui::Slider::new(&mut config.duration_ms, 500..=10_000).text("Duration (ms)"));
            ui.add(egui::Slider::new(&mut config.frame_rate, 1..=60).text("Frame rate"));
            if ui
                .add_enabled(!exporting, egui::Button::new("Export rotating result"))
                .clicked()
            {
                app.export_rotating_result();
            }

            if exporting {
                let progress = app.exports().progress() as f32 / 100.0;
                ui.add(egui::ProgressBar::new(progress).show_percentage());
            }

            match app.last_export() {
                Some(ExportOutcome::Saved(path)) => {
                    ui.label(format!("Saved {}", path));
                }
                Some(ExportOutcome::Failed(message)) => {
                    let color = ui.visuals().error_fg_color;
                    ui.colored_label(color, message);
                }
                None => {}
            }
        });
}
