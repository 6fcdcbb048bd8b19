use crate::config::{MESSAGE_SIZE, PAYLOAD_SIZE};

/// Physical telemetry stream. The discriminant is the tag byte the framer
/// stores in front of every line received on that stream.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryChannel {
    Voltage = 1,
    Temperature = 2,
}

impl TelemetryChannel {
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TelemetryChannel {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TelemetryChannel::Voltage),
            2 => Ok(TelemetryChannel::Temperature),
            other => Err(other),
        }
    }
}

/// One complete telemetry line: tag byte followed by a NUL terminated payload.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Message {
    bytes: [u8; MESSAGE_SIZE],
}

impl Message {
    pub const fn from_bytes(bytes: [u8; MESSAGE_SIZE]) -> Self {
        Self { bytes }
    }

    /// Builds a message the way the framer would for `payload`. The payload is
    /// cut so that the terminating NUL always fits.
    pub fn with_tag(tag: u8, payload: &[u8]) -> Self {
        let mut bytes = [0u8; MESSAGE_SIZE];
        bytes[0] = tag;
        let len = payload.len().min(PAYLOAD_SIZE);
        bytes[1..1 + len].copy_from_slice(&payload[..len]);
        Self { bytes }
    }

    #[inline]
    pub fn tag(&self) -> u8 {
        self.bytes[0]
    }

    /// Payload bytes up to, not including, the first NUL.
    pub fn payload(&self) -> &[u8] {
        let body = &self.bytes[1..];
        let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
        &body[..end]
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; MESSAGE_SIZE] {
        &self.bytes
    }
}

impl core::fmt::Debug for Message {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Message")
            .field("tag", &self.tag())
            .field("payload", &self.payload())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Message {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Message {{ tag: {}, payload: {=[u8]} }}", self.tag(), self.payload())
    }
}
