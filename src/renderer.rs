// src/renderer.rs
use egui::{Color32, Pos2};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    Stroke as LineStroke, StrokeDash, Transform,
};

use crate::brush::Brush;
use crate::color::to_skia_color;
use crate::settings::CanvasSettings;
use crate::stroke::{DrawingPoint, Stroke, StrokeRef};

const GRID_SPOKES: usize = 12;
const GRID_RINGS: usize = 4;
const GRID_COLOR: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);
const GRID_DASH: [f32; 2] = [3.0, 3.0];
const PIVOT_RADIUS: f32 = 5.0;

/// Paints canvas frames into tiny-skia pixmaps.
///
/// The same stroke rules serve the live canvas and every exported frame.
#[derive(Debug, Default)]
pub struct Renderer {
    // Scratch layer for pressure strokes, reused between frames
    layer: Option<Pixmap>,
}

fn circle(center: Pos2, radius: f32) -> Option<Path> {
    PathBuilder::from_circle(center.x, center.y, radius)
}

fn polyline(points: &[DrawingPoint]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.pos.x, first.pos.y);
    for point in rest {
        pb.line_to(point.pos.x, point.pos.y);
    }
    pb.finish()
}

fn segment(from: Pos2, to: Pos2) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    pb.finish()
}

fn solid_paint(color: Color32, opacity: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color, opacity));
    paint.anti_alias = true;
    paint
}

fn round_line(width: f32) -> LineStroke {
    LineStroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..LineStroke::default()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint one live frame: rotated, clipped to the disc, with grid and pivot.
    ///
    /// `strokes` are drawn in order, `in_progress` on top of them.
    pub fn render_frame(
        &mut self,
        target: &mut Pixmap,
        angle: f32,
        settings: &CanvasSettings,
        strokes: &[StrokeRef],
        in_progress: Option<&Stroke>,
    ) {
        target.fill(tiny_skia::Color::TRANSPARENT);

        let center = settings.rotation_center;
        let transform = Transform::from_rotate_at(angle, center.x, center.y);

        let Some(disc) = circle(center, settings.radius) else {
            return;
        };
        let Some(mut clip) = Mask::new(target.width(), target.height()) else {
            return;
        };
        clip.fill_path(&disc, FillRule::Winding, true, transform);

        target.fill_path(
            &disc,
            &solid_paint(settings.background_color, 1.0),
            FillRule::Winding,
            transform,
            None,
        );

        draw_grid(target, center, settings.radius, transform, &clip);

        for stroke in strokes {
            self.draw_stroke(target, stroke, transform, Some(&clip));
        }
        if let Some(stroke) = in_progress {
            self.draw_stroke(target, stroke, transform, Some(&clip));
        }

        if let Some(pivot) = circle(center, PIVOT_RADIUS) {
            target.fill_path(
                &pivot,
                &solid_paint(Color32::RED, 1.0),
                FillRule::Winding,
                transform,
                Some(&clip),
            );
        }
    }

    /// Paint the clean artwork: unrotated background and strokes only
    pub fn render_artwork(&mut self, target: &mut Pixmap, settings: &CanvasSettings, strokes: &[StrokeRef]) {
        target.fill(to_skia_color(settings.background_color, 1.0));
        for stroke in strokes {
            self.draw_stroke(target, stroke, Transform::identity(), None);
        }
    }

    /// Copy `source` into `target` turned by `angle` degrees around the middle
    pub fn render_rotated(&self, target: &mut Pixmap, source: &Pixmap, angle: f32) {
        target.fill(tiny_skia::Color::TRANSPARENT);
        let transform = Transform::from_rotate_at(
            angle,
            target.width() as f32 / 2.0,
            target.height() as f32 / 2.0,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }

    fn draw_stroke(&mut self, target: &mut Pixmap, stroke: &Stroke, transform: Transform, clip: Option<&Mask>) {
        let brush = stroke.brush();
        let points = stroke.points();

        match points {
            [] => {}
            [only] => {
                if let Some(dot) = circle(only.pos, brush.size / 2.0) {
                    target.fill_path(&dot, &solid_paint(brush.color, brush.opacity), FillRule::Winding, transform, clip);
                }
            }
            _ if brush.brush_type.uses_pressure() => {
                self.draw_pressure_stroke(target, brush, points, transform, clip);
            }
            _ => {
                if let Some(path) = polyline(points) {
                    target.stroke_path(
                        &path,
                        &solid_paint(brush.color, brush.line_opacity()),
                        &round_line(brush.line_width(1.0)),
                        transform,
                        clip,
                    );
                }
            }
        }
    }

    // Each segment gets its own width from the later point's pressure. The segments
    // are painted opaque on a scratch layer and composited once, so overlapping
    // round caps do not darken the joints.
    fn draw_pressure_stroke(
        &mut self,
        target: &mut Pixmap,
        brush: &Brush,
        points: &[DrawingPoint],
        transform: Transform,
        clip: Option<&Mask>,
    ) {
        let (width, height) = (target.width(), target.height());
        let reuse = matches!(&self.layer, Some(layer) if layer.width() == width && layer.height() == height);
        if !reuse {
            self.layer = Pixmap::new(width, height);
        }
        let Some(layer) = self.layer.as_mut() else {
            return;
        };
        layer.fill(tiny_skia::Color::TRANSPARENT);

        let paint = solid_paint(brush.color, 1.0);
        for pair in points.windows(2) {
            let line_width = brush.line_width(pair[1].pressure);
            if line_width <= 0.0 {
                continue;
            }
            if let Some(path) = segment(pair[0].pos, pair[1].pos) {
                layer.stroke_path(&path, &paint, &round_line(line_width), transform, None);
            }
        }

        let composite = PixmapPaint {
            opacity: brush.line_opacity().clamp(0.0, 1.0),
            ..PixmapPaint::default()
        };
        target.draw_pixmap(0, 0, layer.as_ref(), &composite, Transform::identity(), clip);
    }
}

// Fixed polar reference grid: spokes every 30 degrees and four rings
fn draw_grid(target: &mut Pixmap, center: Pos2, radius: f32, transform: Transform, clip: &Mask) {
    let paint = solid_paint(GRID_COLOR, 1.0);
    let line = LineStroke {
        width: 1.0,
        dash: StrokeDash::new(GRID_DASH.to_vec(), 0.0),
        ..LineStroke::default()
    };

    for spoke in 0..GRID_SPOKES {
        let theta = (spoke as f32 * 360.0 / GRID_SPOKES as f32).to_radians();
        let tip = Pos2::new(center.x + radius * theta.cos(), center.y + radius * theta.sin());
        if let Some(path) = segment(center, tip) {
            target.stroke_path(&path, &paint, &line, transform, Some(clip));
        }
    }

    for ring in 1..=GRID_RINGS {
        let ring_radius = radius * ring as f32 / GRID_RINGS as f32;
        if let Some(path) = circle(center, ring_radius) {
            target.stroke_path(&path, &paint, &line, transform, Some(clip));
        }
    }
}
