use defmt_or_log as log;
use embedded_hal::digital::OutputPin;

use crate::config::{SequencerConfig, UnknownTagPolicy};
use crate::dispatcher::dispatch;
use crate::error::SequencerError;
use crate::message::Message;
use crate::message_queue::MessageConsumer;
use crate::threshold::{ThresholdMonitor, ThresholdOutcome};

/// Consumer side of the pipeline: takes messages off the queue, parses them
/// and feeds the threshold monitor.
pub struct Sequencer<'a, Trigger, Status, const CAPACITY: usize> {
    consumer: MessageConsumer<'a, CAPACITY>,
    monitor: ThresholdMonitor<Trigger, Status>,
    unknown_tag_policy: UnknownTagPolicy,
}

impl<'a, Trigger, Status, const CAPACITY: usize> Sequencer<'a, Trigger, Status, CAPACITY>
where
    Trigger: OutputPin,
    Status: OutputPin,
{
    pub fn new(
        consumer: MessageConsumer<'a, CAPACITY>,
        trigger: Trigger,
        status: Status,
        config: SequencerConfig,
    ) -> Self {
        Self {
            consumer,
            monitor: ThresholdMonitor::new(trigger, status, config.thresholds),
            unknown_tag_policy: config.unknown_tag_policy,
        }
    }

    #[inline]
    pub fn monitor(&self) -> &ThresholdMonitor<Trigger, Status> {
        &self.monitor
    }

    /// Drives the outputs to their start-up levels.
    pub fn prime(&mut self) -> Result<(), SequencerError> {
        self.monitor.prime()
    }

    /// Handles a single dequeued message.
    ///
    /// Returns `Ok(None)` when the message was discarded because of the
    /// [`UnknownTagPolicy::Discard`] policy.
    pub fn process(
        &mut self,
        message: &Message,
    ) -> Result<Option<ThresholdOutcome>, SequencerError> {
        match dispatch(message) {
            Ok(update) => Ok(Some(self.monitor.apply(update))),
            Err(e) => {
                log::error!("{} (tag {})", e.error_description(), message.tag());
                match self.unknown_tag_policy {
                    UnknownTagPolicy::Halt => Err(e.into()),
                    UnknownTagPolicy::Discard => {
                        log::warn!("Discarding message with unknown tag");
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Runs the monitoring loop. Only returns when a fatal error stops it.
    pub async fn run(&mut self) -> SequencerError {
        loop {
            let message = self.consumer.get().await;
            if let Err(e) = self.process(&message) {
                return e;
            }
        }
    }
}
