use std::fmt;

/// Lowest reportable audio level (silence, -127 dBov or below).
pub const MIN_LEVEL: i32 = 0;

/// Highest reportable audio level (full scale, 0 dBov).
pub const MAX_LEVEL: i32 = 127;

/// Last level reported by each of a session's effects.
///
/// `None` until the effect has measured at least one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioLevels {
    pub local: Option<i32>,
    pub stream: Option<i32>,
}

/// The audio device a session represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

impl AudioDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_default: false,
        }
    }

    /// The device the system uses when none is chosen explicitly.
    pub fn system_default(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            is_default: true,
            ..Self::new(id, name)
        }
    }
}

impl fmt::Display for AudioDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)?;
        if self.is_default {
            f.write_str(" [default]")?;
        }
        Ok(())
    }
}
