//! Peripheral assignments and shared types of the power management controller.
use embassy_rp::gpio::Output;
use embassy_rp::uart;
use sequencer_core::Sequencer;
use sequencer_core::config::{QUEUE_CAPACITY, SequencerConfig, Thresholds, UnknownTagPolicy};

pub const TELEMETRY_BAUD_RATE: u32 = 115_200;

/// Ring buffer size of each buffered telemetry UART.
pub const RX_BUFFER_SIZE: usize = 64;

pub type PowerTrigger = Output<'static>;
pub type StatusLed = Output<'static>;
pub type PmcSequencer = Sequencer<'static, PowerTrigger, StatusLed, QUEUE_CAPACITY>;

pub fn telemetry_uart_config() -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = TELEMETRY_BAUD_RATE;
    config
}

pub fn sequencer_config() -> SequencerConfig {
    #[cfg(feature_discard_unknown_tags)]
    let unknown_tag_policy = UnknownTagPolicy::Discard;
    #[cfg(not(feature_discard_unknown_tags))]
    let unknown_tag_policy = UnknownTagPolicy::Halt;

    SequencerConfig {
        thresholds: Thresholds::default(),
        unknown_tag_policy,
    }
}
