use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::event::{Subject, SubscriptionId};
use crate::geometry::wrap360;
use crate::settings::CanvasSettings;

/// Turns timestamps from a refresh source into elapsed milliseconds.
///
/// The first tick after a reset reports zero elapsed time, so a paused
/// rotation never catches up on the time it spent stopped.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_tick_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous tick
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let elapsed = match self.last_tick_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);
        elapsed
    }

    /// Forget the previous tick
    pub fn reset(&mut self) {
        self.last_tick_ms = None;
    }
}

/// Owns the current rotation angle and advances it over wall-clock time
#[derive(Debug)]
pub struct RotationEngine {
    angle: f32,
    rotating: Subject<bool>,
    clock: FrameClock,
    // Set whenever the shared flag goes off, even between two ticks
    paused: Arc<AtomicBool>,
    subscription: SubscriptionId,
}

impl RotationEngine {
    /// `rotating` is the shared on/off flag; its current value is kept
    pub fn new(rotating: Subject<bool>) -> Self {
        let paused = Arc::new(AtomicBool::new(false));
        let sink = Arc::clone(&paused);
        let subscription = rotating.subscribe(move |on| {
            if !*on {
                sink.store(true, Ordering::Relaxed);
            }
        });
        Self {
            angle: 0.0,
            rotating,
            clock: FrameClock::new(),
            paused,
            subscription,
        }
    }

    /// Current angle in degrees, always in `[0, 360)`
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating.get()
    }

    /// Advance by `elapsed_ms` at the configured speed and direction.
    ///
    /// Returns the signed step in degrees that was applied before wrapping.
    pub fn advance(&mut self, elapsed_ms: f64, settings: &CanvasSettings) -> f32 {
        let delta = (settings.signed_speed() as f64 * elapsed_ms / 1000.0) as f32;
        if !delta.is_finite() {
            return 0.0;
        }
        self.angle = wrap360(self.angle + delta);
        delta
    }

    /// One refresh tick at time `now_ms`.
    ///
    /// Returns `None` while rotation is disabled, otherwise the applied step.
    pub fn tick(&mut self, now_ms: f64, settings: &CanvasSettings) -> Option<f32> {
        if self.paused.swap(false, Ordering::Relaxed) {
            self.clock.reset();
        }
        if !self.rotating.get() {
            return None;
        }
        let elapsed = self.clock.tick(now_ms);
        Some(self.advance(elapsed, settings))
    }

    /// Start or stop rotating. Restarting resumes timing from the next tick.
    pub fn set_rotating(&mut self, rotating: bool) {
        if rotating && !self.rotating.get() {
            self.clock.reset();
        }
        if self.rotating.update(|current| {
            let changed = *current != rotating;
            *current = rotating;
            changed
        }) {
            log::info!("Rotation {}", if rotating { "resumed" } else { "paused" });
        }
    }

    pub fn toggle(&mut self) -> bool {
        let rotating = !self.rotating.get();
        self.set_rotating(rotating);
        rotating
    }
}

impl Drop for RotationEngine {
    fn drop(&mut self) {
        self.rotating.unsubscribe(self.subscription);
    }
}
