//! Presentation loop / fixed-interval loop coordination
//!
//! The host calls [`DualLoop::pump`] once per display refresh. Each pump runs
//! one presentation frame (or the paused variant) and then every fixed-interval
//! sweep that has come due. Both loops share state only through the handler.

use crate::consts::MAX_SWEEP_CATCHUP;

/// Pause state driven by host visibility
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunState {
    Running,
    Paused,
    /// Visible again; running resumes at `at` unless hidden first
    Resuming { at: f64 },
}

/// Callbacks for the two loops
pub trait LoopHandler {
    /// Presentation frame while paused
    fn on_paused_frame(&mut self);
    /// Presentation frame: one logic tick plus presentation
    fn on_frame(&mut self, now: f64);
    /// Fixed-interval gameplay sweep
    fn on_sweep(&mut self, now: f64);
}

#[derive(Debug, Clone)]
pub struct DualLoop {
    state: RunState,
    sweep_interval: f64,
    settle_delay: f64,
    next_sweep: Option<f64>,
    frames: u64,
    sweeps: u64,
}

impl DualLoop {
    pub fn new(sweep_hz: f64, settle_delay: f64) -> Self {
        Self {
            state: RunState::Running,
            sweep_interval: 1.0 / sweep_hz.max(f64::EPSILON),
            settle_delay,
            next_sweep: None,
            frames: 0,
            sweeps: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state != RunState::Running
    }

    pub fn sweep_interval(&self) -> f64 {
        self.sweep_interval
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    /// The single pause transition
    ///
    /// Hiding pauses immediately. Showing schedules a resume after the settle
    /// delay; hiding again before then cancels it.
    pub fn set_host_hidden(&mut self, hidden: bool, now: f64) {
        let next = match (hidden, self.state) {
            (true, RunState::Paused) => RunState::Paused,
            (true, _) => {
                log::info!("Paused (host hidden)");
                RunState::Paused
            }
            (false, RunState::Paused) => RunState::Resuming {
                at: now + self.settle_delay,
            },
            (false, state) => state,
        };
        self.state = next;
    }

    fn settle(&mut self, now: f64) {
        if let RunState::Resuming { at } = self.state {
            if now >= at {
                log::info!("Resumed");
                self.state = RunState::Running;
            }
        }
    }

    /// Advance both loops to `now` (seconds)
    pub fn pump<H: LoopHandler>(&mut self, now: f64, handler: &mut H) {
        self.settle(now);
        if self.is_paused() {
            handler.on_paused_frame();
            // Sweep cadence restarts after the pause
            self.next_sweep = None;
            return;
        }

        handler.on_frame(now);
        self.frames += 1;

        let interval = self.sweep_interval;
        let mut due = *self.next_sweep.get_or_insert(now + interval);
        let mut ran = 0;
        while now >= due && ran < MAX_SWEEP_CATCHUP {
            handler.on_sweep(now);
            self.sweeps += 1;
            due += interval;
            ran += 1;
        }
        if now >= due {
            let dropped = ((now - due) / interval).floor() as u64 + 1;
            log::warn!("Fixed-interval loop behind, dropping {dropped} sweeps");
            due = now + interval;
        }
        self.next_sweep = Some(due);
    }
}
