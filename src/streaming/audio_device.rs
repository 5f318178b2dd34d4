//! Audio device integration using rodio
//!
//! Plays click samples from the shared ring buffer to the system audio
//! device. The source never ends on its own: it emits silence while the
//! buffer is empty, and terminates only when the `finished` signal is
//! raised at shutdown.

use super::RingBuffer;
use crate::Result;
use rodio::{OutputStream, Sink, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Audio source that drains the click ring buffer
struct ClickSource {
    ring_buffer: Arc<parking_lot::Mutex<RingBuffer>>,
    sample_rate: u32,
    channels: u16,
    finished: Arc<AtomicBool>,
    /// Batch read buffer (keeps lock contention off the per-sample path)
    buffer: Vec<f32>,
    buffer_pos: usize,
}

impl ClickSource {
    fn new(
        ring_buffer: Arc<parking_lot::Mutex<RingBuffer>>,
        sample_rate: u32,
        channels: u16,
        finished: Arc<AtomicBool>,
    ) -> Self {
        let batch = 1024;
        ClickSource {
            ring_buffer,
            sample_rate,
            channels,
            finished,
            buffer: vec![0.0f32; batch],
            buffer_pos: batch, // force a refill on the first pull
        }
    }
}

impl Source for ClickSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.buffer.len())
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for ClickSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.finished.load(Ordering::Relaxed) {
            return None;
        }

        if self.buffer_pos >= self.buffer.len() {
            let mut ring_buffer = self.ring_buffer.lock();
            let read = ring_buffer.read(&mut self.buffer);
            drop(ring_buffer);

            // pad the rest with silence so the stream stays alive between clicks
            if read < self.buffer.len() {
                self.buffer[read..].fill(0.0);
            }
            self.buffer_pos = 0;
        }

        let sample = self.buffer[self.buffer_pos];
        self.buffer_pos += 1;
        Some(sample)
    }
}

/// Click playback device using rodio
pub struct AudioDevice {
    _stream: OutputStream,
    sink: Sink,
    finished: Arc<AtomicBool>,
}

impl AudioDevice {
    /// Open the default output device and start draining the ring buffer.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz (typically 44100)
    /// * `channels` - Number of audio channels (1 for the mono click)
    /// * `ring_buffer` - Shared buffer the feedback stream writes into
    pub fn new(
        sample_rate: u32,
        channels: u16,
        ring_buffer: Arc<parking_lot::Mutex<RingBuffer>>,
    ) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to create audio stream: {}", e))?;

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| format!("Failed to create audio sink: {}", e))?;

        let finished = Arc::new(AtomicBool::new(false));
        let source = ClickSource::new(ring_buffer, sample_rate, channels, Arc::clone(&finished));
        sink.append(source);

        Ok(AudioDevice {
            _stream: stream,
            sink,
            finished,
        })
    }

    /// Pause playback
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume playback
    pub fn play(&self) {
        self.sink.play();
    }

    /// Signal shutdown: the source stops instead of playing silence forever
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.finish();
        self.sink.pause();
    }
}
