use defmt_or_log as log;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use sequencer_core::config::QUEUE_CAPACITY;
use sequencer_core::{FrameEvent, LineFramer};

const RX_CHUNK_SIZE: usize = 16;

/// Drains one buffered telemetry UART into its line framer.
///
/// Runs on the interrupt executor, so the framer is only ever touched from
/// this task and the queue is only ever written without waiting.
pub struct TelemetryUartRunner {
    rx: BufferedUartRx,
    framer: LineFramer<'static, QUEUE_CAPACITY>,
}

impl TelemetryUartRunner {
    pub fn new(rx: BufferedUartRx, framer: LineFramer<'static, QUEUE_CAPACITY>) -> Self {
        Self { rx, framer }
    }

    pub async fn run(mut self) -> ! {
        let mut chunk = [0u8; RX_CHUNK_SIZE];
        loop {
            let len = match self.rx.read(&mut chunk).await {
                Ok(len) => len,
                Err(e) => {
                    log::warn!(
                        "Telemetry UART {} receive error: {:?}",
                        self.framer.channel_tag(),
                        e
                    );
                    continue;
                }
            };

            for &byte in &chunk[..len] {
                if self.framer.on_byte_received(byte) == FrameEvent::QueueFull {
                    log::debug!("Message queue full, line {} dropped", self.framer.channel_tag());
                }
            }
        }
    }
}
