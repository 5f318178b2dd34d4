//! Counter Engine
//!
//! The core of the odometer: counter value, per-drum rotation state, and
//! the event dispatch that turns discrete input events into render and
//! feedback commands. Everything in this module is synchronous and free
//! of rendering, audio and timer dependencies.

pub mod counter;
pub mod drum;
pub mod events;

pub use counter::CounterEngine;
pub use drum::{Drum, ANGLE_PER_FACE, FACES};
pub use events::{Command, InputEvent};

use crate::autorun::Sequencer;

/// Event-driven facade over the counter engine and auto-run sequencer.
///
/// Feeds one [`InputEvent`] at a time into [`Odometer::handle`], which
/// mutates state and returns the commands for the collaborator layer to
/// execute. Events are processed strictly in arrival order; each call
/// runs to completion before the next is observed.
#[derive(Debug, Clone)]
pub struct Odometer {
    engine: CounterEngine,
    sequencer: Sequencer,
}

impl Odometer {
    /// Create an odometer with `drum_count` drums and the default
    /// auto-run interval.
    pub fn new(drum_count: usize) -> Self {
        Odometer {
            engine: CounterEngine::new(drum_count),
            sequencer: Sequencer::default(),
        }
    }

    /// Create an odometer from a validated configuration.
    pub fn with_config(config: &crate::config::CounterConfig) -> Self {
        Odometer {
            engine: CounterEngine::new(config.drum_count),
            sequencer: Sequencer::new(config.auto_interval()),
        }
    }

    /// Access the counter engine
    pub fn engine(&self) -> &CounterEngine {
        &self.engine
    }

    /// Access the auto-run sequencer
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Is the auto-run sequencer currently running?
    pub fn auto_running(&self) -> bool {
        self.sequencer.is_running()
    }

    /// Initial un-animated render of all drums at zero
    pub fn initialize(&mut self) -> Vec<Command> {
        self.engine.initialize()
    }

    /// Dispatch one input event and return the resulting commands.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Command> {
        match event {
            InputEvent::Increment | InputEvent::Tick => self.engine.increment(),
            InputEvent::Decrement => self.engine.decrement(),
            InputEvent::Reset => self.engine.reset(),
            InputEvent::ToggleAuto => {
                let state = self.sequencer.toggle();
                vec![Command::AutoRunChanged(state.is_running())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_map_to_engine_operations() {
        let mut odometer = Odometer::new(6);
        odometer.initialize();

        odometer.handle(InputEvent::Increment);
        odometer.handle(InputEvent::Increment);
        assert_eq!(odometer.engine().count(), 2);

        odometer.handle(InputEvent::Decrement);
        assert_eq!(odometer.engine().count(), 1);

        odometer.handle(InputEvent::Reset);
        assert_eq!(odometer.engine().count(), 0);
    }

    #[test]
    fn test_tick_behaves_like_increment() {
        let mut odometer = Odometer::new(6);
        odometer.initialize();
        for _ in 0..3 {
            odometer.handle(InputEvent::Tick);
        }
        assert_eq!(odometer.engine().count(), 3);
    }

    #[test]
    fn test_toggle_auto_reports_new_state() {
        let mut odometer = Odometer::new(6);
        assert!(!odometer.auto_running());

        let commands = odometer.handle(InputEvent::ToggleAuto);
        assert_eq!(commands, vec![Command::AutoRunChanged(true)]);
        assert!(odometer.auto_running());

        let commands = odometer.handle(InputEvent::ToggleAuto);
        assert_eq!(commands, vec![Command::AutoRunChanged(false)]);
        assert!(!odometer.auto_running());
    }
}
