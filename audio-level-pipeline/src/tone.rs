use std::f64::consts::TAU;

use audio_level_core::models::buffer::MediaBuffer;
use audio_level_core::models::format::{AudioFormat, MediaFormat};

/// Sine tone source producing signed 16-bit little-endian PCM frames.
///
/// Phase, sequence numbers, and timestamps carry over between frames.
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    format: AudioFormat,
    frequency: f64,
    amplitude: f64,
    phase: f64,
    sequence_number: u64,
    timestamp_ns: u64,
}

impl ToneGenerator {
    /// `amplitude` is relative to full scale and clamped to `0.0..=1.0`.
    pub fn new(sample_rate: f64, channels: u16, frequency: f64, amplitude: f64) -> Self {
        Self {
            format: AudioFormat::linear_16(sample_rate, channels.max(1)),
            frequency,
            amplitude: amplitude.clamp(0.0, 1.0),
            phase: 0.0,
            sequence_number: 0,
            timestamp_ns: 0,
        }
    }

    pub fn format(&self) -> MediaFormat {
        self.format.clone().into()
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Produce the next `duration_ms` of tone.
    pub fn next_frame(&mut self, duration_ms: u32) -> MediaBuffer {
        let amplitude = self.amplitude;
        self.frame(duration_ms, amplitude)
    }

    /// Produce `duration_ms` of silence, advancing time like a tone frame.
    pub fn silence(&mut self, duration_ms: u32) -> MediaBuffer {
        self.frame(duration_ms, 0.0)
    }

    fn frame(&mut self, duration_ms: u32, amplitude: f64) -> MediaBuffer {
        let frames = (self.format.sample_rate * duration_ms as f64 / 1000.0) as usize;
        let channels = self.format.channels as usize;
        let step = TAU * self.frequency / self.format.sample_rate;

        let mut data = Vec::with_capacity(frames * channels * 2);
        for _ in 0..frames {
            let sample = (amplitude * i16::MAX as f64 * self.phase.sin()) as i16;
            for _ in 0..channels {
                data.extend_from_slice(&sample.to_le_bytes());
            }
            self.phase = (self.phase + step) % TAU;
        }

        let mut buffer = MediaBuffer::new(data, self.format());
        buffer.sequence_number = self.sequence_number;
        buffer.timestamp_ns = self.timestamp_ns;
        self.sequence_number += 1;
        self.timestamp_ns += duration_ms as u64 * 1_000_000;
        buffer
    }
}
