//! End-to-end counter scenarios driven through the event dispatch,
//! checking the displayed digits and drum rotation invariants together.

use approx::assert_relative_eq;
use odometer::autorun::TickTimer;
use odometer::engine::{Command, InputEvent, Odometer, ANGLE_PER_FACE};
use std::sync::mpsc;
use std::time::Duration;

fn drum_rotations(odometer: &Odometer) -> Vec<f64> {
    odometer
        .engine()
        .drums()
        .iter()
        .map(|d| d.rotation())
        .collect()
}

#[test]
fn counting_up_from_zero_touches_only_the_units_drum() {
    let mut odometer = Odometer::new(6);
    odometer.initialize();

    for expected in 1..=6 {
        odometer.handle(InputEvent::Increment);
        assert_eq!(odometer.engine().count(), expected);
    }

    let rotations = drum_rotations(&odometer);
    assert_eq!(rotations.len(), 6);
    for rotation in &rotations[..5] {
        assert_relative_eq!(*rotation, 0.0);
    }
    assert_relative_eq!(rotations[5], 6.0 * ANGLE_PER_FACE);
    assert_eq!(odometer.engine().digits(), vec![0, 0, 0, 0, 0, 6]);
}

#[test]
fn decade_boundary_carries_forward() {
    let mut odometer = Odometer::new(6);
    odometer.initialize();
    for _ in 0..9 {
        odometer.handle(InputEvent::Increment);
    }
    assert_eq!(odometer.engine().count(), 9);
    assert_relative_eq!(drum_rotations(&odometer)[5], 324.0);

    odometer.handle(InputEvent::Increment);
    assert_eq!(odometer.engine().count(), 10);

    let rotations = drum_rotations(&odometer);
    assert_relative_eq!(rotations[5], 360.0, epsilon = 1e-9); // 9 -> 0 forward
    assert_relative_eq!(rotations[4], 36.0, epsilon = 1e-9); // 0 -> 1 carry
    assert_eq!(odometer.engine().digits(), vec![0, 0, 0, 0, 1, 0]);
}

#[test]
fn ten_increments_accumulate_one_revolution_without_reset() {
    let mut odometer = Odometer::new(6);
    odometer.initialize();
    for _ in 0..10 {
        odometer.handle(InputEvent::Increment);
    }

    let units = drum_rotations(&odometer)[5];
    // congruent mod 360 to the start angle, accumulated rather than rewound
    assert_relative_eq!(units, 360.0);
    assert_relative_eq!(units.rem_euclid(360.0), 0.0);
}

#[test]
fn decrement_from_zero_wraps_to_all_nines() {
    let mut odometer = Odometer::new(6);
    odometer.initialize();

    let commands = odometer.handle(InputEvent::Decrement);
    assert_eq!(odometer.engine().count(), 999_999);
    assert_eq!(odometer.engine().digits(), vec![9; 6]);

    // every drum spins backward by one face
    for rotation in drum_rotations(&odometer) {
        assert_relative_eq!(rotation, -ANGLE_PER_FACE);
    }
    assert!(commands.iter().any(|c| matches!(c, Command::PlayClick)));

    // and incrementing again returns to zero spinning forward
    odometer.handle(InputEvent::Increment);
    assert_eq!(odometer.engine().count(), 0);
    for rotation in drum_rotations(&odometer) {
        assert_relative_eq!(rotation, 0.0);
    }
}

#[test]
fn a_full_up_down_cycle_returns_every_drum_to_its_start() {
    let mut odometer = Odometer::new(4);
    odometer.initialize();

    for _ in 0..25 {
        odometer.handle(InputEvent::Increment);
    }
    for _ in 0..25 {
        odometer.handle(InputEvent::Decrement);
    }

    assert_eq!(odometer.engine().count(), 0);
    for rotation in drum_rotations(&odometer) {
        assert_relative_eq!(rotation, 0.0);
    }
}

#[test]
fn reset_rewinds_along_the_shortest_path() {
    let mut odometer = Odometer::new(6);
    odometer.initialize();
    for _ in 0..3 {
        odometer.handle(InputEvent::Increment);
    }
    assert_relative_eq!(drum_rotations(&odometer)[5], 108.0);

    odometer.handle(InputEvent::Reset);
    assert_eq!(odometer.engine().count(), 0);
    // 108 -> 0 is the shorter way; no forward spin through 360
    assert_relative_eq!(drum_rotations(&odometer)[5], 0.0);
}

#[test]
fn auto_run_ticks_increment_and_stop_cleanly() {
    let mut odometer = Odometer::new(6);
    odometer.initialize();

    let commands = odometer.handle(InputEvent::ToggleAuto);
    assert_eq!(commands, vec![Command::AutoRunChanged(true)]);

    // collaborate with a real timer the way the CLI does
    let (tx, rx) = mpsc::channel();
    let mut timer = TickTimer::start(Duration::from_millis(10), tx);
    for _ in 0..3 {
        rx.recv_timeout(Duration::from_millis(500))
            .expect("tick expected");
        odometer.handle(InputEvent::Tick);
    }
    timer.stop();

    assert_eq!(odometer.engine().count(), 3);

    let commands = odometer.handle(InputEvent::ToggleAuto);
    assert_eq!(commands, vec![Command::AutoRunChanged(false)]);

    // no timer running: the counter stays put regardless of elapsed time
    std::thread::sleep(Duration::from_millis(50));
    while rx.try_recv().is_ok() {}
    assert_eq!(odometer.engine().count(), 3);
}

#[test]
fn jump_to_far_value_takes_minimal_magnitude_paths() {
    let mut odometer = Odometer::new(6);
    odometer.initialize();

    // 0 -> 7 on the units drum: residue 252 resolves to -108, not +252
    let mut engine = odometer.engine().clone();
    let commands = engine.set_value(7, true);
    let angle = commands
        .iter()
        .find_map(|c| match *c {
            Command::RenderDrum {
                index: 5,
                angle_degrees,
                ..
            } => Some(angle_degrees),
            _ => None,
        })
        .expect("units drum command");
    assert_relative_eq!(angle, -108.0);
    assert_eq!(engine.digits()[5], 7);
}
