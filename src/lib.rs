//! Mechanical Odometer Drum Counter
//!
//! An emulation of a mechanical odometer: a fixed bank of rotating drums,
//! each carrying ten faces (digits 0-9), animated to display an integer
//! value with increment, decrement, reset and auto-run. The heart of the
//! crate is the rotation-continuity rule: each drum stores an unbounded
//! rotation angle, and every digit change resolves to the shortest angular
//! path, so increments always spin forward and decrements backward across
//! the 9/0 boundary without snapping or unwinding.
//!
//! # Features
//! - Per-drum unbounded rotation state with shortest-path retargeting
//! - Pure event dispatch: input events in, render/feedback commands out
//! - Auto-run sequencer with a cancellable periodic tick timer
//! - Mechanical click-cue synthesis with WAV export
//! - Terminal drum-bank rendering with eased, slightly overshooting spins
//!
//! # Crate feature flags
//! - `click` (default): Click-cue synthesis and WAV export (`click`)
//! - `visualization` (default): Terminal drum rendering (`visualization`)
//! - `streaming` (opt-in): Real-time click playback (enables optional `rodio` dep)
//!
//! # Quick start
//! ## Core engine only
//! ```no_run
//! use odometer::engine::{CounterEngine, Command};
//! let mut engine = CounterEngine::new(6);
//! engine.initialize();
//! let commands = engine.increment();
//! for command in &commands {
//!     if let Command::RenderDrum { index, angle_degrees, .. } = command {
//!         println!("drum {index} -> {angle_degrees} deg");
//!     }
//! }
//! ```
//!
//! ## Event-driven control
//! ```no_run
//! use odometer::engine::{InputEvent, Odometer};
//! let mut odometer = Odometer::new(6);
//! odometer.initialize();
//! odometer.handle(InputEvent::Increment);
//! odometer.handle(InputEvent::ToggleAuto);
//! assert!(odometer.auto_running());
//! ```

#![warn(missing_docs)]

// Domain modules (feature-gated for modular use)
pub mod autorun; // Auto-run Sequencing
pub mod config; // Configuration
pub mod engine; // Counter Engine (core)

#[cfg(feature = "click")]
pub mod click; // Click-Cue Synthesis
#[cfg(feature = "streaming")]
pub mod streaming; // Audio Output & Streaming
#[cfg(feature = "visualization")]
pub mod visualization; // Terminal Rendering

/// Error types for odometer operations
#[derive(thiserror::Error, Debug)]
pub enum OdometerError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for OdometerError {
    /// Converts a String into `OdometerError::Other`.
    ///
    /// Convenience conversion for generic string errors. Prefer the specific
    /// variant constructors (`ConfigError`, `AudioFileError`,
    /// `AudioDeviceError`) where the error class is known.
    fn from(msg: String) -> Self {
        OdometerError::Other(msg)
    }
}

impl From<&str> for OdometerError {
    /// Converts a string slice into `OdometerError::Other`.
    fn from(msg: &str) -> Self {
        OdometerError::Other(msg.to_string())
    }
}

/// Result type for odometer operations
pub type Result<T> = std::result::Result<T, OdometerError>;

// Public API exports
pub use autorun::{Sequencer, SequencerState, TickTimer};
pub use config::CounterConfig;
pub use engine::{Command, CounterEngine, Drum, InputEvent, Odometer, ANGLE_PER_FACE, FACES};

#[cfg(feature = "click")]
pub use click::ClickSynth;
#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, FeedbackStream, RingBuffer, StreamConfig};
#[cfg(feature = "visualization")]
pub use visualization::{ease_out_back, DrumRenderer, TerminalRenderer};
