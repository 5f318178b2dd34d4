//! Auto-run Sequencing
//!
//! Periodic self-increment for the odometer. The pure [`Sequencer`] state
//! machine (Idle/Running) is kept separate from the thread-backed
//! [`TickTimer`] so the transition logic is testable without spawning
//! anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Default interval between auto-run ticks.
pub const DEFAULT_AUTO_INTERVAL: Duration = Duration::from_millis(200);

/// Auto-run sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// No timer active
    Idle,
    /// Periodic ticks are being produced
    Running,
}

impl SequencerState {
    /// Is this the running state?
    pub fn is_running(&self) -> bool {
        matches!(self, SequencerState::Running)
    }
}

/// Idle/Running toggle for the auto-run feature.
///
/// Initial state is `Idle`; there is no terminal state. Toggling has no
/// failure mode: cancelling when idle is a no-op by construction.
#[derive(Debug, Clone)]
pub struct Sequencer {
    state: SequencerState,
    interval: Duration,
}

impl Sequencer {
    /// Create an idle sequencer with the given tick interval
    pub fn new(interval: Duration) -> Self {
        Sequencer {
            state: SequencerState::Idle,
            interval,
        }
    }

    /// Current state
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Is the sequencer running?
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Tick interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Flip between Idle and Running; returns the new state
    pub fn toggle(&mut self) -> SequencerState {
        self.state = match self.state {
            SequencerState::Idle => SequencerState::Running,
            SequencerState::Running => SequencerState::Idle,
        };
        self.state
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_INTERVAL)
    }
}

/// Thread-backed periodic tick source.
///
/// Sends one `()` per interval over an mpsc channel until stopped.
/// [`TickTimer::stop`] joins the producer thread, so once it returns no
/// further ticks will be sent.
#[derive(Debug)]
pub struct TickTimer {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TickTimer {
    /// Spawn the timer thread, ticking into `sender` every `interval`
    pub fn start(interval: Duration, sender: Sender<()>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);

        let handle = std::thread::spawn(move || {
            while running_clone.load(Ordering::Relaxed) {
                std::thread::sleep(interval);
                if !running_clone.load(Ordering::Relaxed) {
                    break;
                }
                if sender.send(()).is_err() {
                    // receiver gone, nothing left to tick for
                    break;
                }
            }
        });

        TickTimer {
            running,
            handle: Some(handle),
        }
    }

    /// Is the timer thread still active?
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Cancel the timer and wait for the producer thread to exit.
    ///
    /// After this returns, no further ticks are sent. Ticks already
    /// queued in the channel remain for the consumer to drain.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
