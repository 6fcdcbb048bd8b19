use crate::config::{MESSAGE_SIZE, PAYLOAD_SIZE};
use crate::message::{Message, TelemetryChannel};
use crate::message_queue::MessageProducer;

/// What happened to a byte handed to [`LineFramer::on_byte_received`].
///
/// Nothing is reported back to the sender; the event only tells the caller
/// what the framer did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameEvent {
    /// Byte appended to the current line.
    Stored,
    /// Line completed and queued.
    Queued,
    /// Line completed but the queue was full, the line is lost.
    QueueFull,
    /// Terminator without payload, ignored.
    EmptyLine,
    /// Line buffer full, byte dropped.
    Overflow,
}

/// Accumulates the bytes of one telemetry UART into lines and pushes every
/// completed, non-empty line onto the message queue.
///
/// Index 0 of the line buffer holds the channel tag and is never overwritten.
/// The framer is owned by the reception task of its channel, the consumer
/// never sees it.
pub struct LineFramer<'a, const CAPACITY: usize> {
    buf: [u8; MESSAGE_SIZE],
    pos: usize,
    producer: MessageProducer<'a, CAPACITY>,
}

impl<'a, const CAPACITY: usize> LineFramer<'a, CAPACITY> {
    pub fn new(channel: TelemetryChannel, producer: MessageProducer<'a, CAPACITY>) -> Self {
        let mut buf = [0u8; MESSAGE_SIZE];
        buf[0] = channel.tag();
        Self {
            buf,
            pos: 1,
            producer,
        }
    }

    #[inline]
    pub fn channel_tag(&self) -> u8 {
        self.buf[0]
    }

    /// Number of payload bytes accumulated for the current line.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pos - 1
    }

    pub fn on_byte_received(&mut self, byte: u8) -> FrameEvent {
        if (byte == b'\n' || byte == b'\r') && self.pos > 1 {
            self.buf[self.pos] = 0;
            let queued = self.producer.try_put(Message::from_bytes(self.buf));
            self.pos = 1;
            if queued {
                FrameEvent::Queued
            } else {
                FrameEvent::QueueFull
            }
        } else if byte == b'\n' || byte == b'\r' {
            FrameEvent::EmptyLine
        } else if self.pos <= PAYLOAD_SIZE {
            self.buf[self.pos] = byte;
            self.pos += 1;
            FrameEvent::Stored
        } else {
            FrameEvent::Overflow
        }
    }

    /// Feeds a burst of bytes, e.g. everything drained from the UART FIFO in
    /// one interrupt. Returns how many lines were queued.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        bytes
            .iter()
            .filter(|&&b| self.on_byte_received(b) == FrameEvent::Queued)
            .count()
    }
}
