mod transform;

pub use transform::{compensate_rotation, to_canvas_space, to_screen_space, wrap360};
