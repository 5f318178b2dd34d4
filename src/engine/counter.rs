//! Counter Engine
//!
//! Owns the counter value and the drum bank, and reconciles every drum's
//! rotation whenever a new value is set. The single entry point is
//! [`CounterEngine::set_value`]; increment, decrement, reset and the
//! initial render are thin wrappers over it.

use super::drum::Drum;
use super::events::Command;

/// The counter engine: one value, one drum per decimal place.
///
/// The value is bounded to `[0, 10^D - 1]` where `D` is the drum count.
/// Targets outside that range wrap: below zero lands on the maximum,
/// above the maximum lands on zero, so every integer input is valid.
#[derive(Debug, Clone)]
pub struct CounterEngine {
    /// Current displayed value
    count: i64,
    /// Largest representable value, `10^D - 1`
    max_value: i64,
    /// Drum bank, index 0 = most significant digit
    drums: Vec<Drum>,
}

impl CounterEngine {
    /// Create an engine with `drum_count` drums, all at digit 0.
    ///
    /// `drum_count` must be in `1..=18` so the value range fits in an
    /// `i64`; configuration validation enforces this before construction.
    pub fn new(drum_count: usize) -> Self {
        debug_assert!((1..=18).contains(&drum_count));
        let max_value = 10i64.pow(drum_count as u32) - 1;
        CounterEngine {
            count: 0,
            max_value,
            drums: vec![Drum::new(); drum_count],
        }
    }

    /// Current counter value
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Largest displayable value (`10^D - 1`)
    pub fn max_value(&self) -> i64 {
        self.max_value
    }

    /// Number of drums
    pub fn drum_count(&self) -> usize {
        self.drums.len()
    }

    /// The drum bank, index 0 = most significant digit
    pub fn drums(&self) -> &[Drum] {
        &self.drums
    }

    /// Digits currently displayed, most significant first, zero-padded
    pub fn digits(&self) -> Vec<u8> {
        self.drums.iter().map(Drum::resting_digit).collect()
    }

    /// Set the counter to `new_value` and reconcile all drum rotations.
    ///
    /// Out-of-range targets wrap in a single step: a negative value lands
    /// on `max_value`, a value past `max_value` lands on 0. This is the
    /// wraparound rule that makes increment-past-max and
    /// decrement-below-zero behave like a real odometer rolling over.
    ///
    /// Emits one [`Command::RenderDrum`] per drum, plus one
    /// [`Command::PlayClick`] when `animate` is set and at least one drum
    /// actually moved.
    pub fn set_value(&mut self, new_value: i64, animate: bool) -> Vec<Command> {
        let value = if new_value < 0 {
            self.max_value
        } else if new_value > self.max_value {
            0
        } else {
            new_value
        };
        self.count = value;

        let mut commands = Vec::with_capacity(self.drums.len() + 1);
        let mut moved = false;

        // Peel digits least-significant first; drum order is not
        // externally observable since each drum is retargeted
        // independently.
        let mut remaining = value;
        for index in (0..self.drums.len()).rev() {
            let digit = (remaining % 10) as u8;
            remaining /= 10;

            let before = self.drums[index].rotation();
            let angle_degrees = self.drums[index].retarget(digit);
            if angle_degrees != before {
                moved = true;
            }
            commands.push(Command::RenderDrum {
                index,
                angle_degrees,
                animate,
            });
        }

        if animate && moved {
            commands.push(Command::PlayClick);
        }
        commands
    }

    /// Increment by one (wraps past the maximum to zero)
    pub fn increment(&mut self) -> Vec<Command> {
        self.set_value(self.count + 1, true)
    }

    /// Decrement by one (wraps below zero to the maximum)
    pub fn decrement(&mut self) -> Vec<Command> {
        self.set_value(self.count - 1, true)
    }

    /// Reset to zero, animated
    pub fn reset(&mut self) -> Vec<Command> {
        self.set_value(0, true)
    }

    /// Initial un-animated render of all drums at zero
    pub fn initialize(&mut self) -> Vec<Command> {
        self.set_value(0, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn render_angles(commands: &[Command]) -> Vec<(usize, f64)> {
        commands
            .iter()
            .filter_map(|c| match *c {
                Command::RenderDrum {
                    index,
                    angle_degrees,
                    ..
                } => Some((index, angle_degrees)),
                _ => None,
            })
            .collect()
    }

    fn has_click(commands: &[Command]) -> bool {
        commands.iter().any(|c| matches!(c, Command::PlayClick))
    }

    #[test]
    fn test_digits_match_decimal_representation() {
        let mut engine = CounterEngine::new(6);
        engine.set_value(420_137, false);
        assert_eq!(engine.digits(), vec![4, 2, 0, 1, 3, 7]);
        assert_eq!(engine.count(), 420_137);
    }

    #[test]
    fn test_zero_padding() {
        let mut engine = CounterEngine::new(6);
        engine.set_value(42, false);
        assert_eq!(engine.digits(), vec![0, 0, 0, 0, 4, 2]);
    }

    #[test]
    fn test_underflow_wraps_to_max() {
        let mut engine = CounterEngine::new(6);
        engine.set_value(-1, false);
        assert_eq!(engine.count(), 999_999);
        assert_eq!(engine.digits(), vec![9, 9, 9, 9, 9, 9]);
    }

    #[test]
    fn test_overflow_wraps_to_zero() {
        let mut engine = CounterEngine::new(6);
        engine.set_value(999_999, false);
        engine.set_value(1_000_000, false);
        assert_eq!(engine.count(), 0);
        assert_eq!(engine.digits(), vec![0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_one_render_command_per_drum() {
        let mut engine = CounterEngine::new(6);
        let commands = engine.set_value(7, true);
        assert_eq!(render_angles(&commands).len(), 6);
    }

    #[test]
    fn test_increment_rotates_only_units_drum() {
        let mut engine = CounterEngine::new(6);
        engine.initialize();

        for expected in 1..=6i64 {
            let commands = engine.increment();
            assert_eq!(engine.count(), expected);

            // all drums except the last stay at angle 0
            for (index, angle) in render_angles(&commands) {
                if index == 5 {
                    assert_relative_eq!(angle, expected as f64 * 36.0);
                } else {
                    assert_relative_eq!(angle, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_decade_carry_moves_both_drums_forward() {
        let mut engine = CounterEngine::new(6);
        engine.set_value(9, false);
        let units_before = engine.drums()[5].rotation();
        let tens_before = engine.drums()[4].rotation();
        assert_relative_eq!(units_before, 324.0);
        assert_relative_eq!(tens_before, 0.0);

        let commands = engine.increment();
        assert_eq!(engine.count(), 10);

        for (index, angle) in render_angles(&commands) {
            match index {
                5 => assert_relative_eq!(angle, 360.0), // 9 -> 0, forward
                4 => assert_relative_eq!(angle, 36.0),  // 0 -> 1
                _ => assert_relative_eq!(angle, 0.0),
            }
        }
    }

    #[test]
    fn test_decrement_spins_backward_through_wrap() {
        let mut engine = CounterEngine::new(6);
        engine.initialize();
        let commands = engine.decrement();
        assert_eq!(engine.count(), 999_999);
        for (_, angle) in render_angles(&commands) {
            assert_relative_eq!(angle, -36.0);
        }
        assert!(has_click(&commands));
    }

    #[test]
    fn test_set_value_is_idempotent() {
        let mut engine = CounterEngine::new(6);
        engine.set_value(271_828, true);
        let before: Vec<f64> = engine.drums().iter().map(|d| d.rotation()).collect();

        let commands = engine.set_value(271_828, true);
        let after: Vec<f64> = engine.drums().iter().map(|d| d.rotation()).collect();

        assert_eq!(before, after);
        assert!(!has_click(&commands), "no movement, no click");
    }

    #[test]
    fn test_ten_increments_accumulate_a_full_turn() {
        let mut engine = CounterEngine::new(6);
        engine.initialize();
        for _ in 0..10 {
            engine.increment();
        }
        assert_eq!(engine.count(), 10);
        // net +360 accumulated on the units drum, not reset to 0
        assert_relative_eq!(engine.drums()[5].rotation(), 360.0);
        assert_eq!(engine.drums()[5].resting_digit(), 0);
    }

    #[test]
    fn test_click_only_when_animated() {
        let mut engine = CounterEngine::new(6);
        let commands = engine.set_value(5, false);
        assert!(!has_click(&commands));

        let commands = engine.set_value(6, true);
        assert!(has_click(&commands));
    }

    #[test]
    fn test_single_drum_engine() {
        let mut engine = CounterEngine::new(1);
        assert_eq!(engine.max_value(), 9);
        engine.set_value(9, false);
        let commands = engine.increment();
        assert_eq!(engine.count(), 0);
        let angles = render_angles(&commands);
        assert_eq!(angles.len(), 1);
        assert_relative_eq!(angles[0].1, 360.0);
    }
}
