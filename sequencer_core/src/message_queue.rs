use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, ReceiveFuture, Receiver, Sender},
};

use crate::message::Message;

type MessageChannel<const CAPACITY: usize> = Channel<CriticalSectionRawMutex, Message, CAPACITY>;

/// Bounded FIFO between the reception tasks (interrupt priority) and the
/// sequencer task (thread mode). Messages are copied in and out by value.
pub struct MessageQueue<const CAPACITY: usize> {
    channel: MessageChannel<CAPACITY>,
}

impl<const CAPACITY: usize> MessageQueue<CAPACITY> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    pub fn producer(&self) -> MessageProducer<'_, CAPACITY> {
        MessageProducer {
            sender: self.channel.sender(),
        }
    }

    pub fn consumer(&self) -> MessageConsumer<'_, CAPACITY> {
        MessageConsumer {
            receiver: self.channel.receiver(),
        }
    }
}

impl<const CAPACITY: usize> Default for MessageQueue<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half. Never waits, so it is safe to use from interrupt context.
#[derive(Clone, Copy)]
pub struct MessageProducer<'a, const CAPACITY: usize> {
    sender: Sender<'a, CriticalSectionRawMutex, Message, CAPACITY>,
}

impl<'a, const CAPACITY: usize> MessageProducer<'a, CAPACITY> {
    /// Enqueues `message` unless the queue is full, in which case the message
    /// is dropped and `false` is returned.
    #[inline]
    pub fn try_put(&self, message: Message) -> bool {
        self.sender.try_send(message).is_ok()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.sender.is_full()
    }
}

/// Receiving half, owned by the single consumer task.
pub struct MessageConsumer<'a, const CAPACITY: usize> {
    receiver: Receiver<'a, CriticalSectionRawMutex, Message, CAPACITY>,
}

impl<'a, const CAPACITY: usize> MessageConsumer<'a, CAPACITY> {
    /// Waits until a message is available and removes it from the queue.
    #[inline]
    pub fn get(&self) -> ReceiveFuture<'_, CriticalSectionRawMutex, Message, CAPACITY> {
        self.receiver.receive()
    }

    #[inline]
    pub fn try_get(&self) -> Option<Message> {
        self.receiver.try_receive().ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
