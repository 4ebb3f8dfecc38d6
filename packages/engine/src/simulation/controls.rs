use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable stop flag for callers outside the loop (signal handlers, UI threads)
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Pause / single-step / stop state of one simulation
#[derive(Debug, Default)]
pub(crate) struct Controls {
    paused: bool,
    single_step: bool,
    stop: StopHandle,
}

impl Controls {
    pub(crate) fn new(start_paused: bool) -> Self {
        Self {
            paused: start_paused,
            ..Self::default()
        }
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Advance exactly one generation on the next tick, then stay paused
    pub(crate) fn single_step(&mut self) {
        self.paused = true;
        self.single_step = true;
    }

    /// Whether this tick computes a generation; consumes a pending single step
    pub(crate) fn take_advance(&mut self) -> bool {
        let advance = !self.paused || self.single_step;
        self.single_step = false;
        advance
    }

    pub(crate) fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub(crate) fn is_stop_requested(&self) -> bool {
        self.stop.is_stop_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_fires_once() {
        let mut controls = Controls::new(true);
        assert!(!controls.take_advance());
        controls.single_step();
        assert!(controls.take_advance());
        assert!(!controls.take_advance());
        assert!(controls.is_paused());
    }

    #[test]
    fn stop_handle_is_shared() {
        let controls = Controls::new(false);
        let handle = controls.stop_handle();
        assert!(!controls.is_stop_requested());
        handle.request_stop();
        assert!(controls.is_stop_requested());
    }
}
