//! Click-Cue Synthesis
//!
//! The mechanical transition cue: a short triangle-oscillator burst whose
//! pitch sweeps exponentially from around 100 Hz down to 40 Hz while the
//! gain decays from 0.3 to near silence over 50 ms. A small LFSR-derived
//! pitch variation keeps consecutive clicks from sounding machine-stamped.

use crate::Result;
use std::path::Path;

/// Click duration in seconds
pub const CLICK_DURATION_SECS: f32 = 0.05;

/// Sweep start pitch in Hz (before variation)
pub const CLICK_START_FREQ_HZ: f32 = 100.0;

/// Sweep end pitch in Hz
pub const CLICK_END_FREQ_HZ: f32 = 40.0;

/// Gain at the start of the click
pub const CLICK_START_GAIN: f32 = 0.3;

/// Gain at the end of the click
pub const CLICK_END_GAIN: f32 = 0.01;

/// Maximum pitch variation added to the start frequency, in Hz
pub const CLICK_PITCH_JITTER_HZ: f32 = 50.0;

/// Default sample rate for click rendering
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Renders mechanical click cues as mono f32 samples.
pub struct ClickSynth {
    sample_rate: u32,
    lfsr: u32,
}

impl ClickSynth {
    /// Create a click synthesizer at the given sample rate
    pub fn new(sample_rate: u32) -> Self {
        ClickSynth {
            sample_rate,
            lfsr: 1,
        }
    }

    /// Sample rate used for rendering
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Advance the 17-bit LFSR and map it to `[0.0, 1.0)`
    fn next_jitter(&mut self) -> f32 {
        let bit = ((self.lfsr & 1) ^ ((self.lfsr >> 2) & 1)) != 0;
        self.lfsr = (self.lfsr >> 1) | ((bit as u32) << 16);
        (self.lfsr & 0xFFFF) as f32 / 65_536.0
    }

    /// Number of samples in one click at this sample rate
    pub fn click_len(&self) -> usize {
        (CLICK_DURATION_SECS * self.sample_rate as f32) as usize
    }

    /// Render one click cue.
    ///
    /// Pitch and gain both follow exponential ramps over the click
    /// duration; the start pitch carries up to
    /// [`CLICK_PITCH_JITTER_HZ`] of variation.
    pub fn render_click(&mut self) -> Vec<f32> {
        let count = self.click_len();
        let start_freq = CLICK_START_FREQ_HZ + self.next_jitter() * CLICK_PITCH_JITTER_HZ;
        let freq_ratio = CLICK_END_FREQ_HZ / start_freq;
        let gain_ratio = CLICK_END_GAIN / CLICK_START_GAIN;

        let mut samples = Vec::with_capacity(count);
        let mut phase = 0.0f32;
        for i in 0..count {
            let t = i as f32 / count as f32;
            let freq = start_freq * freq_ratio.powf(t);
            let gain = CLICK_START_GAIN * gain_ratio.powf(t);

            phase += freq / self.sample_rate as f32;
            if phase >= 1.0 {
                phase -= 1.0;
            }
            // triangle: -1 at phase 0 and 1, +1 at phase 0.5
            let tri = 1.0 - 4.0 * (phase - 0.5).abs();
            samples.push(tri * gain);
        }
        samples
    }

    /// Render one click and write it to a 16-bit mono WAV file
    pub fn export_wav<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let samples = self.render_click();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| format!("Failed to create WAV file: {}", e))?;

        for &sample in &samples {
            let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| format!("Failed to write sample: {}", e))?;
        }

        writer
            .finalize()
            .map_err(|e| format!("Failed to finalize WAV file: {}", e))?;

        Ok(())
    }
}

impl Default for ClickSynth {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_click_length() {
        let mut synth = ClickSynth::default();
        let samples = synth.render_click();
        assert_eq!(samples.len(), 2205); // 50ms at 44.1kHz
        assert_eq!(samples.len(), synth.click_len());
    }

    #[test]
    fn test_click_peak_bounded_by_start_gain() {
        let mut synth = ClickSynth::default();
        let samples = synth.render_click();
        let p = peak(&samples);
        assert!(p > 0.0, "click must not be silent");
        assert!(p <= CLICK_START_GAIN + 1e-3, "peak {} above start gain", p);
    }

    #[test]
    fn test_click_decays() {
        let mut synth = ClickSynth::default();
        let samples = synth.render_click();
        let tenth = samples.len() / 10;
        let head = rms(&samples[..tenth]);
        let tail = rms(&samples[samples.len() - tenth..]);
        assert!(
            tail < head * 0.2,
            "tail rms {} not well below head rms {}",
            tail,
            head
        );
    }

    #[test]
    fn test_consecutive_clicks_vary_in_pitch() {
        let mut synth = ClickSynth::default();
        let first = synth.render_click();
        let second = synth.render_click();
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second, "LFSR variation should change the cue");
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let mut synth = ClickSynth::default();
        for _ in 0..1000 {
            let j = synth.next_jitter();
            assert!((0.0..1.0).contains(&j));
        }
    }

    #[test]
    fn test_export_wav_writes_file() {
        let mut synth = ClickSynth::default();
        let path = std::env::temp_dir().join("odometer_click_test.wav");
        synth.export_wav(&path).expect("WAV export failed");

        let reader = hound::WavReader::open(&path).expect("WAV readback failed");
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(reader.len() as usize, synth.click_len());
        let _ = std::fs::remove_file(&path);
    }
}
