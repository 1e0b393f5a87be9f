use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    /// Never started
    Idle,
    Running,
    /// Stopped for good, a session clock does not restart
    Stopped,
}

impl Default for ClockState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Elapsed-seconds counter advanced by the host, one `tick` per second of wall time.
///
/// Valid transitions:
/// - Idle -> Running
/// - Running -> Stopped
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    state: ClockState,
    elapsed_seconds: u32,
}

impl SessionClock {
    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running)
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Returns whether the clock actually started.
    pub fn start(&mut self) -> bool {
        match self.state {
            ClockState::Idle => {
                self.state = ClockState::Running;
                log::debug!("clock started");
                true
            }
            state => {
                log::warn!("Ignoring clock start, clock is {:?}", state);
                false
            }
        }
    }

    /// Returns whether the clock actually stopped.
    pub fn stop(&mut self) -> bool {
        match self.state {
            ClockState::Running => {
                self.state = ClockState::Stopped;
                log::debug!("clock stopped at {}s", self.elapsed_seconds);
                true
            }
            state => {
                log::warn!("Ignoring clock stop, clock is {:?}", state);
                false
            }
        }
    }

    /// Advances one second if running, returns the elapsed seconds either way.
    pub fn tick(&mut self) -> u32 {
        if self.is_running() {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
        self.elapsed_seconds
    }
}
