//! Hardware independent core of the power sequencer firmware.
//!
//! Raw telemetry bytes from the voltage and temperature UARTs are framed into
//! tagged [`Message`]s by a per-channel [`LineFramer`], handed over to the
//! consumer task through a bounded [`MessageQueue`], parsed by the
//! [`dispatch`] function and finally evaluated by the [`ThresholdMonitor`],
//! which latches the compute module power trigger and drives the status
//! indicator. [`Sequencer`] ties the consumer side together.
//!
//! The [`reporter`] module holds the logic shared by the standalone voltage and
//! temperature reporter firmwares.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod line_framer;
pub mod message;
pub mod message_queue;
pub mod numeric;
pub mod reporter;
pub mod sequencer;
pub mod threshold;

pub use config::{SequencerConfig, Thresholds, UnknownTagPolicy};
pub use dispatcher::{SampleUpdate, dispatch};
pub use error::{DispatchError, OutputKind, SequencerError};
pub use line_framer::{FrameEvent, LineFramer};
pub use message::{Message, TelemetryChannel};
pub use message_queue::{MessageConsumer, MessageProducer, MessageQueue};
pub use sequencer::Sequencer;
pub use threshold::{SystemState, ThresholdMonitor, ThresholdOutcome, TriggerPhase};
