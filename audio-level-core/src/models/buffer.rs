use super::format::MediaFormat;

/// One frame of media flowing through a track's codec chain.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaBuffer {
    pub data: Vec<u8>,
    pub format: MediaFormat,
    pub timestamp_ns: u64,
    pub sequence_number: u64,
    /// Set when the frame carries no usable media and should be skipped.
    pub discard: bool,
    /// Set on the last frame of a stream.
    pub eom: bool,
}

impl MediaBuffer {
    pub fn new(data: Vec<u8>, format: MediaFormat) -> Self {
        Self {
            data,
            format,
            timestamp_ns: 0,
            sequence_number: 0,
            discard: false,
            eom: false,
        }
    }

    /// An empty buffer of the given format, used as a codec output slot.
    pub fn empty(format: MediaFormat) -> Self {
        Self::new(Vec::new(), format)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy everything from `other` into this buffer, reusing the allocation.
    pub fn copy_from(&mut self, other: &MediaBuffer) {
        self.data.clear();
        self.data.extend_from_slice(&other.data);
        self.format = other.format.clone();
        self.timestamp_ns = other.timestamp_ns;
        self.sequence_number = other.sequence_number;
        self.discard = other.discard;
        self.eom = other.eom;
    }
}
