use egui::{Pos2, Vec2};

/// Wrap an angle in degrees into `[0, 360)`.
///
/// Non-finite input yields `0.0`.
pub fn wrap360(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut wrapped = angle;
    if !(-360.0..720.0).contains(&wrapped) {
        wrapped = wrapped.rem_euclid(360.0);
    }
    while wrapped >= 360.0 {
        wrapped -= 360.0;
    }
    while wrapped < 0.0 {
        wrapped += 360.0;
    }
    // rounding in `wrapped + 360.0` can land exactly on 360 for tiny negatives
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn rotate(offset: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos)
}

/// Rotate a canvas-space point by `+angle` degrees around `center`.
///
/// This is the rotation the render pass applies to the whole canvas.
pub fn to_screen_space(point: Pos2, angle: f32, center: Pos2) -> Pos2 {
    center + rotate(point - center, angle)
}

/// Rotate a canvas-relative pointer position by `-angle` degrees around `center`,
/// yielding the point in the unrotated frame strokes are stored in.
pub fn to_canvas_space(point: Pos2, angle: f32, center: Pos2) -> Pos2 {
    let d = point - center;
    let (sin, cos) = angle.to_radians().sin_cos();
    let rx = d.x * cos + d.y * sin;
    let ry = -d.x * sin + d.y * cos;
    Pos2::new(rx + center.x, ry + center.y)
}

/// Re-project the last recorded canvas-space point after the canvas turned by
/// `angle_delta` degrees, so it stays under a pointer that did not move on screen.
///
/// Works in polar form around `center`: the radius is kept and the polar angle is
/// reduced by the delta.
pub fn compensate_rotation(last_point: Pos2, angle_delta: f32, center: Pos2) -> Pos2 {
    let d = last_point - center;
    let r = d.length();
    let theta = d.y.atan2(d.x) - angle_delta.to_radians();
    Pos2::new(center.x + r * theta.cos(), center.y + r * theta.sin())
}
