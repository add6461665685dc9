use serde::{Deserialize, Serialize};

/// Audio sample encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioEncoding {
    /// Uncompressed PCM.
    Linear,
    Ulaw,
    Alaw,
    Other(String),
}

/// Byte order of multi-byte samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Little,
    Big,
}

/// Description of an audio track's samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub encoding: AudioEncoding,
    pub sample_rate: f64,
    pub sample_size_bits: u16,
    pub channels: u16,
    pub endian: Endian,
    pub signed: bool,
}

impl AudioFormat {
    /// Signed little-endian 16-bit PCM.
    pub fn linear_16(sample_rate: f64, channels: u16) -> Self {
        Self {
            encoding: AudioEncoding::Linear,
            sample_rate,
            sample_size_bits: 16,
            channels,
            endian: Endian::Little,
            signed: true,
        }
    }

    /// 8 kHz mono G.711 mu-law.
    pub fn ulaw() -> Self {
        Self {
            encoding: AudioEncoding::Ulaw,
            sample_rate: 8000.0,
            sample_size_bits: 8,
            channels: 1,
            endian: Endian::Little,
            signed: false,
        }
    }

    pub fn is_linear(&self) -> bool {
        self.encoding == AudioEncoding::Linear
    }

    /// Bytes per single-channel sample, rounded up.
    pub fn bytes_per_sample(&self) -> usize {
        (self.sample_size_bits as usize).div_ceil(8)
    }
}

/// Description of a video track's frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFormat {
    pub encoding: String,
    pub width: u32,
    pub height: u32,
}

/// Format of the media carried by a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaFormat {
    Audio(AudioFormat),
    Video(VideoFormat),
}

impl MediaFormat {
    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Audio(_))
    }

    pub fn as_audio(&self) -> Option<&AudioFormat> {
        match self {
            Self::Audio(format) => Some(format),
            Self::Video(_) => None,
        }
    }
}

impl From<AudioFormat> for MediaFormat {
    fn from(format: AudioFormat) -> Self {
        Self::Audio(format)
    }
}

impl From<VideoFormat> for MediaFormat {
    fn from(format: VideoFormat) -> Self {
        Self::Video(format)
    }
}
