//! Audio Output & Streaming
//!
//! Real-time playback of the click cue. The engine's `PlayClick` commands
//! are rendered by the click synthesizer and written into a ring buffer;
//! a rodio-backed [`AudioDevice`] drains the buffer on the audio thread,
//! playing silence on underrun so the stream never stalls.

mod audio_device;

pub use audio_device::AudioDevice;

use crate::click::DEFAULT_SAMPLE_RATE;
use crate::{OdometerError, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Stream configuration for click playback
#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Output channels (1 = mono)
    pub channels: u16,
    /// Ring buffer size in samples
    pub ring_buffer_size: usize,
}

impl StreamConfig {
    /// Low-latency configuration: room for roughly four overlapping clicks
    pub fn low_latency(sample_rate: u32) -> Self {
        StreamConfig {
            sample_rate,
            channels: 1,
            ring_buffer_size: 8 * 1024,
        }
    }

    /// Conservative configuration with a deeper buffer
    pub fn stable(sample_rate: u32) -> Self {
        StreamConfig {
            sample_rate,
            channels: 1,
            ring_buffer_size: 64 * 1024,
        }
    }

    /// Buffer latency in milliseconds
    pub fn latency_ms(&self) -> f32 {
        self.ring_buffer_size as f32 / self.sample_rate as f32 * 1000.0
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::low_latency(DEFAULT_SAMPLE_RATE)
    }
}

/// Ring buffer for streaming click samples between producer and audio
/// thread. Accessed under an external `parking_lot::Mutex`.
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Vec<f32>,
    capacity: usize,
    read_pos: usize,
    write_pos: usize,
    /// Distinguishes full from empty when read_pos == write_pos
    len: usize,
}

impl RingBuffer {
    /// Create a ring buffer; capacity is rounded up to a power of two
    pub fn new(requested_capacity: usize) -> Result<Self> {
        if requested_capacity == 0 {
            return Err(OdometerError::ConfigError(
                "ring buffer capacity must be greater than 0".to_string(),
            ));
        }
        let capacity = requested_capacity.next_power_of_two();
        Ok(RingBuffer {
            buffer: vec![0.0; capacity],
            capacity,
            read_pos: 0,
            write_pos: 0,
            len: 0,
        })
    }

    /// Buffer capacity in samples
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples available to read
    pub fn available_read(&self) -> usize {
        self.len
    }

    /// Free space available to write
    pub fn available_write(&self) -> usize {
        self.capacity - self.len
    }

    /// Fill level in `[0.0, 1.0]`
    pub fn fill_percentage(&self) -> f32 {
        self.len as f32 / self.capacity as f32
    }

    /// Write as many samples as fit; returns the number written
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let count = samples.len().min(self.available_write());
        for &sample in &samples[..count] {
            self.buffer[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) & (self.capacity - 1);
        }
        self.len += count;
        count
    }

    /// Read up to `out.len()` samples; returns the number read
    pub fn read(&mut self, out: &mut [f32]) -> usize {
        let count = out.len().min(self.len);
        for slot in &mut out[..count] {
            *slot = self.buffer[self.read_pos];
            self.read_pos = (self.read_pos + 1) & (self.capacity - 1);
        }
        self.len -= count;
        count
    }

    /// Discard all pending samples
    pub fn flush(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
        self.len = 0;
    }
}

/// Feedback statistics for monitoring clicks and buffer health
#[derive(Debug, Clone)]
pub struct FeedbackStats {
    /// Number of click cues written
    pub clicks_played: usize,
    /// Number of samples written into the buffer
    pub samples_written: usize,
    /// Number of overrun events (click truncated by a full buffer)
    pub overrun_count: usize,
    /// Buffer fill level after the last write
    pub fill_percentage: f32,
}

/// Producer side of click playback.
///
/// Owns the ring buffer shared with the [`AudioDevice`] and accounts for
/// clicks written and overruns. Writes are non-blocking: a click that
/// does not fit is truncated rather than delaying the caller, since the
/// engine's update must stay synchronous.
pub struct FeedbackStream {
    buffer: Arc<Mutex<RingBuffer>>,
    config: StreamConfig,
    stats: Arc<Mutex<FeedbackStats>>,
}

impl FeedbackStream {
    /// Create a feedback stream with the given configuration
    pub fn new(config: StreamConfig) -> Result<Self> {
        let buffer = Arc::new(Mutex::new(RingBuffer::new(config.ring_buffer_size)?));
        let stats = Arc::new(Mutex::new(FeedbackStats {
            clicks_played: 0,
            samples_written: 0,
            overrun_count: 0,
            fill_percentage: 0.0,
        }));
        Ok(FeedbackStream {
            buffer,
            config,
            stats,
        })
    }

    /// Queue one click cue for playback; returns samples written
    pub fn play_click(&self, samples: &[f32]) -> usize {
        let mut buffer = self.buffer.lock();
        let written = buffer.write(samples);
        let fill_pct = buffer.fill_percentage();
        drop(buffer);

        let mut stats = self.stats.lock();
        stats.clicks_played += 1;
        stats.samples_written += written;
        if written < samples.len() {
            stats.overrun_count += 1;
        }
        stats.fill_percentage = fill_pct;

        written
    }

    /// Snapshot of the playback statistics
    pub fn get_stats(&self) -> FeedbackStats {
        self.stats.lock().clone()
    }

    /// Buffer fill level in `[0.0, 1.0]`
    pub fn fill_percentage(&self) -> f32 {
        self.buffer.lock().fill_percentage()
    }

    /// Discard any queued samples
    pub fn flush(&self) {
        self.buffer.lock().flush();
    }

    /// Stream configuration
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Ring buffer handle for audio device integration
    pub fn get_buffer(&self) -> Arc<Mutex<RingBuffer>> {
        Arc::clone(&self.buffer)
    }
}
