//! Terminal Rendering
//!
//! Applies the engine's `RenderDrum` commands to a character-cell view of
//! the drum bank. Animated transitions are smoothed over a fixed duration
//! with an eased, slightly overshooting curve; un-animated commands snap.
//! Rotation angles arrive unbounded and are used as-is; only the mapping
//! to visible faces reduces them.

use crate::engine::{ANGLE_PER_FACE, FACES};
use std::f64::consts::PI;
use std::time::Duration;

/// Default spin animation duration
pub const DEFAULT_ANIMATION: Duration = Duration::from_millis(600);

/// Overshoot coefficient of the ease-out-back curve
const EASE_BACK_C1: f64 = 1.70158;

/// Collaborator interface the engine's render commands are applied to.
pub trait DrumRenderer {
    /// Rotate one drum's visual to an absolute angle.
    ///
    /// When `animate` is set the transition must be smoothed over a short
    /// fixed duration; otherwise it is applied immediately. Angles
    /// outside `[0, 360)` are legal and must not be normalized.
    fn render_drum(&mut self, index: usize, angle_degrees: f64, animate: bool);
}

/// Ease-out with a slight overshoot past the target before settling.
///
/// Mirrors the springy feel of the reference transition curve. `t` is
/// clamped to `[0, 1]`; the output starts at 0, ends at 1 and peaks at
/// roughly 1.1 around `t = 0.7`.
pub fn ease_out_back(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let c3 = EASE_BACK_C1 + 1.0;
    1.0 + c3 * (t - 1.0).powi(3) + EASE_BACK_C1 * (t - 1.0).powi(2)
}

/// Radius of a drum cylinder whose faces are `face_height` tall.
///
/// Ten flat faces form the cylinder, so `r = (h/2) / tan(pi/10)`.
pub fn drum_radius(face_height: f64) -> f64 {
    (face_height / 2.0) / (PI / FACES as f64).tan()
}

/// Is a face at `offset_deg` from the front at least partially inside
/// the viewing window of height `face_height`?
///
/// The face center projects to `r * sin(offset)`; the face overlaps the
/// window when that center is within one face height of the window edge.
pub fn face_visible(offset_deg: f64, face_height: f64) -> bool {
    let projected = drum_radius(face_height) * offset_deg.to_radians().sin().abs();
    projected < face_height
}

/// In-flight transition of one drum
#[derive(Debug, Clone, Copy)]
struct DrumAnimation {
    from: f64,
    to: f64,
    elapsed: Duration,
}

impl DrumAnimation {
    fn settled(angle: f64, duration: Duration) -> Self {
        DrumAnimation {
            from: angle,
            to: angle,
            elapsed: duration,
        }
    }

    fn angle(&self, duration: Duration) -> f64 {
        if self.elapsed >= duration || duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f64() / duration.as_secs_f64();
        self.from + (self.to - self.from) * ease_out_back(t)
    }
}

/// Character-cell drum bank renderer.
///
/// Keeps one animation per drum and steps them with [`advance`]; the
/// three-row window (previous face above, current face, next face below)
/// is produced by [`render_rows`].
///
/// [`advance`]: TerminalRenderer::advance
/// [`render_rows`]: TerminalRenderer::render_rows
pub struct TerminalRenderer {
    drums: Vec<DrumAnimation>,
    duration: Duration,
}

impl TerminalRenderer {
    /// Create a renderer for `drum_count` drums at rest angle 0
    pub fn new(drum_count: usize, duration: Duration) -> Self {
        TerminalRenderer {
            drums: vec![DrumAnimation::settled(0.0, duration); drum_count],
            duration,
        }
    }

    /// Number of drums
    pub fn drum_count(&self) -> usize {
        self.drums.len()
    }

    /// Step all running animations by `dt`
    pub fn advance(&mut self, dt: Duration) {
        for drum in &mut self.drums {
            if drum.elapsed < self.duration {
                drum.elapsed = (drum.elapsed + dt).min(self.duration);
            }
        }
    }

    /// Is any drum still mid-transition?
    pub fn is_animating(&self) -> bool {
        self.drums.iter().any(|d| d.elapsed < self.duration)
    }

    /// Currently displayed (possibly mid-transition) angle of a drum
    pub fn displayed_angle(&self, index: usize) -> f64 {
        self.drums[index].angle(self.duration)
    }

    /// Digit of the face nearest the front of a drum
    pub fn front_digit(&self, index: usize) -> u8 {
        let face = (self.displayed_angle(index) / ANGLE_PER_FACE).round() as i64;
        face.rem_euclid(FACES as i64) as u8
    }

    /// Three display rows: previous faces, front faces, next faces.
    ///
    /// Drums spin upward on increment, so the face above the front is the
    /// previous digit on the wheel and the face below is the next one.
    pub fn render_rows(&self) -> [String; 3] {
        let mut top = String::new();
        let mut mid = String::new();
        let mut bottom = String::new();

        for index in 0..self.drums.len() {
            let digit = u32::from(self.front_digit(index));
            let above = (digit + FACES - 1) % FACES;
            let below = (digit + 1) % FACES;

            top.push_str(&format!(" {} ", above));
            mid.push_str(&format!("[{}]", digit));
            bottom.push_str(&format!(" {} ", below));
        }

        [top, mid, bottom]
    }
}

impl DrumRenderer for TerminalRenderer {
    fn render_drum(&mut self, index: usize, angle_degrees: f64, animate: bool) {
        if index >= self.drums.len() {
            return;
        }
        if animate && !self.duration.is_zero() {
            let from = self.drums[index].angle(self.duration);
            self.drums[index] = DrumAnimation {
                from,
                to: angle_degrees,
                elapsed: Duration::ZERO,
            };
        } else {
            self.drums[index] = DrumAnimation::settled(angle_degrees, self.duration);
        }
    }
}
