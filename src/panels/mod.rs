mod central_panel;
mod settings_panel;
mod tools_panel;

pub use central_panel::central_panel;
pub use settings_panel::settings_panel;
pub use tools_panel::tools_panel;
