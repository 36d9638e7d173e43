use crate::brush::Brush;
use crate::config::Config;
use crate::error::ConfigError;
use crate::event::Subject;
use crate::history::History;
use crate::settings::CanvasSettings;

/// The shared, observable state handed to each component at construction.
///
/// Every field has a single writer: the drawing service writes `brush` and
/// `history`, the canvas writes `settings`, the rotation engine writes
/// `rotating`. Everyone else only reads or subscribes.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    pub brush: Subject<Brush>,
    pub history: Subject<History>,
    pub settings: Subject<CanvasSettings>,
    pub rotating: Subject<bool>,
}

impl SharedState {
    pub fn new(brush: Brush, settings: CanvasSettings, rotating: bool) -> Self {
        Self {
            brush: Subject::new(brush),
            history: Subject::new(History::new()),
            settings: Subject::new(settings),
            rotating: Subject::new(rotating),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.brush()?, config.canvas_settings()?, config.canvas.rotating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let state = SharedState::from_config(&Config::default()).unwrap();
        assert!(state.rotating.get());
        assert!(state.history.get().is_empty());
        assert_eq!(state.brush.get(), Brush::default());
    }

    #[test]
    fn test_clones_share_subjects() {
        let state = SharedState::default();
        let other = state.clone();
        other.rotating.set(true);
        assert!(state.rotating.get());
    }
}
