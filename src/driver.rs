use crate::physics::{self, StepEvents};
use crate::session::Session;

/// Turns host frame timestamps into step sizes and sequences step and
/// render for each frame.
#[derive(Debug, Clone)]
pub struct LoopDriver {
    last_timestamp: Option<f64>,
    fallback_delta: f64,
}

impl LoopDriver {
    pub fn new(fallback_delta: f64) -> Self {
        Self {
            last_timestamp: None,
            fallback_delta,
        }
    }

    /// Milliseconds since the previous frame; the first frame has no
    /// predecessor and uses the fallback.
    pub fn delta(&mut self, timestamp: f64) -> f64 {
        let delta = match self.last_timestamp {
            Some(last) => (timestamp - last).max(0.0),
            None => self.fallback_delta,
        };
        self.last_timestamp = Some(timestamp);
        delta
    }

    /// Run one frame: step while the session is running, then render no
    /// matter what. The renderer only ever sees a shared borrow.
    pub fn frame<F, E>(
        &mut self,
        timestamp: f64,
        session: &mut Session,
        render: F,
    ) -> Result<StepEvents, E>
    where
        F: FnOnce(&Session) -> Result<(), E>,
    {
        let delta = self.delta(timestamp);
        let events = if session.is_running() {
            physics::step(session, delta)
        } else {
            StepEvents::default()
        };
        render(session)?;
        Ok(events)
    }
}
