use crate::models::config::LevelEffectConfig;
use crate::models::format::{AudioFormat, Endian};
use crate::models::levels::{MAX_LEVEL, MIN_LEVEL};

/// Converts PCM frames into audio levels on the `MIN_LEVEL..=MAX_LEVEL` scale.
///
/// One level step is one dB: `MAX_LEVEL` is a full-scale signal (0 dBov) and
/// `MIN_LEVEL` is -127 dBov or quieter. Keeps the last reported level so that
/// falling levels can be animated.
#[derive(Debug, Clone)]
pub struct LevelCalculator {
    config: LevelEffectConfig,
    last_level: Option<i32>,
}

impl LevelCalculator {
    pub fn new(config: LevelEffectConfig) -> Self {
        Self {
            config,
            last_level: None,
        }
    }

    pub fn config(&self) -> &LevelEffectConfig {
        &self.config
    }

    /// The most recently reported level, if any frame has been measured.
    pub fn last_level(&self) -> Option<i32> {
        self.last_level
    }

    pub fn reset(&mut self) {
        self.last_level = None;
    }

    /// Measure one frame and return the level to report.
    ///
    /// Returns `None` (and leaves state untouched) when the frame cannot be
    /// measured: non-linear encodings, unsupported sample sizes, or no samples.
    pub fn measure(&mut self, data: &[u8], format: &AudioFormat) -> Option<i32> {
        let rms = Self::signal_power(data, format)?;
        let raw = Self::level_from_rms(rms);
        let level = if self.config.animate {
            Self::animate(self.last_level, raw, self.config.max_decrement_per_frame)
        } else {
            raw
        };
        self.last_level = Some(level);
        Some(level)
    }

    /// RMS of the frame, normalized so that full scale is 1.0.
    ///
    /// Supports linear 8-bit (signed or unsigned) and 16-bit (either byte
    /// order, signed or unsigned) samples. Channels are measured together.
    pub fn signal_power(data: &[u8], format: &AudioFormat) -> Option<f64> {
        if !format.is_linear() {
            return None;
        }

        let (sum_sq, count) = match format.sample_size_bits {
            8 => data
                .iter()
                .map(|&b| {
                    let s = if format.signed {
                        b as i8 as f64
                    } else {
                        b as f64 - 128.0
                    };
                    s / 128.0
                })
                .fold((0.0, 0usize), |(sum, n), s| (sum + s * s, n + 1)),
            16 => data
                .chunks_exact(2)
                .map(|pair| {
                    let bytes = [pair[0], pair[1]];
                    let s = match (format.endian, format.signed) {
                        (Endian::Little, true) => i16::from_le_bytes(bytes) as f64,
                        (Endian::Big, true) => i16::from_be_bytes(bytes) as f64,
                        (Endian::Little, false) => u16::from_le_bytes(bytes) as f64 - 32768.0,
                        (Endian::Big, false) => u16::from_be_bytes(bytes) as f64 - 32768.0,
                    };
                    s / 32768.0
                })
                .fold((0.0, 0usize), |(sum, n), s| (sum + s * s, n + 1)),
            _ => return None,
        };

        if count == 0 {
            return None;
        }
        Some((sum_sq / count as f64).sqrt())
    }

    /// Map a normalized RMS value to a level: `MAX_LEVEL + 20·log10(rms)`, clamped.
    pub fn level_from_rms(rms: f64) -> i32 {
        if rms <= 0.0 || !rms.is_finite() {
            return MIN_LEVEL;
        }
        let dbov = 20.0 * rms.log10();
        let level = (MAX_LEVEL as f64 + dbov).round();
        (level as i32).clamp(MIN_LEVEL, MAX_LEVEL)
    }

    /// Rises are reported immediately; falls drop by at most `max_decrement` per frame.
    pub fn animate(last: Option<i32>, new: i32, max_decrement: i32) -> i32 {
        match last {
            Some(last) if new < last => new.max(last - max_decrement),
            _ => new,
        }
    }
}

impl Default for LevelCalculator {
    fn default() -> Self {
        Self::new(LevelEffectConfig::default())
    }
}
