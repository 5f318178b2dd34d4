//! Input Events and Output Commands
//!
//! The core is driven by discrete input events and answers with a list of
//! commands for the presentation collaborators (drum renderer, feedback
//! emitter). Keeping both sides as plain enums makes the engine pure and
//! unit-testable without any rendering or timer dependency.

/// A discrete external event fed into the odometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// User requested +1
    Increment,
    /// User requested -1
    Decrement,
    /// User requested a reset to zero
    Reset,
    /// User toggled the auto-run sequencer
    ToggleAuto,
    /// The auto-run timer fired
    Tick,
}

/// A command emitted by the engine for the collaborator layer to execute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Rotate one drum's visual to an absolute angle.
    ///
    /// `angle_degrees` is unbounded; drums accumulate rotation over time
    /// and the renderer must not reduce it modulo 360. When `animate` is
    /// set the transition is smoothed, otherwise it is applied immediately.
    RenderDrum {
        /// Drum index, 0 = most significant digit
        index: usize,
        /// Absolute target rotation in degrees
        angle_degrees: f64,
        /// Smooth the transition vs. snap
        animate: bool,
    },
    /// Play the mechanical transition cue (at most once per update)
    PlayClick,
    /// The auto-run sequencer changed state (true = running)
    AutoRunChanged(bool),
}
