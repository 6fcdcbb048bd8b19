//! Voltage reporter.
//!
//! Reads raw samples from a binary voltage monitor and forwards the latest one
//! as a text line to the power management controller every 500 ms.
#![no_std]
#![no_main]

use defmt_or_log as log;
use embassy_executor::Executor;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUartRx, UartTx};
use embassy_time::{Duration, Ticker};
use embedded_io_async::Read;
use portable_atomic::{AtomicI32, Ordering};
use sequencer_core::config::VOLTAGE_REPORT_PERIOD_MS;
use sequencer_core::reporter::{SampleAssembler, format_voltage_line};
use static_cell::StaticCell;

// Configure panic behavior based on features
#[cfg(not(any(feature = "defmt", feature = "log")))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};
#[cfg(all(feature = "log", not(feature = "defmt")))]
use {panic_rtt_target as _, rtt_target as _};

const MONITOR_RX_BUFFER_SIZE: usize = 32;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// Latest complete sample from the voltage monitor.
static VOLTAGE: AtomicI32 = AtomicI32::new(0);

static MONITOR_RX_BUFFER: StaticCell<[u8; MONITOR_RX_BUFFER_SIZE]> = StaticCell::new();
static EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    let p: embassy_rp::Peripherals = embassy_rp::init(Default::default());

    let monitor_rx = BufferedUartRx::new(
        p.UART1,
        Irqs,
        p.PIN_9, // Voltage monitor RX
        MONITOR_RX_BUFFER.init([0; MONITOR_RX_BUFFER_SIZE]),
        uart::Config::default(),
    );
    // Telemetry line to the power management controller
    let telemetry_tx = UartTx::new_blocking(p.UART0, p.PIN_0, uart::Config::default());

    let executor = EXECUTOR.init(Executor::new());
    executor.run(move |spawner| {
        spawner.spawn(voltage_monitor_task(monitor_rx)).unwrap();
        spawner.spawn(report_task(telemetry_tx)).unwrap();
    });
}

#[embassy_executor::task]
async fn voltage_monitor_task(mut monitor_rx: BufferedUartRx) -> ! {
    log::debug!("Starting voltage monitor task...");
    let mut assembler = SampleAssembler::new();
    let mut chunk = [0u8; 8];
    loop {
        match monitor_rx.read(&mut chunk).await {
            Ok(len) => {
                for &byte in &chunk[..len] {
                    if let Some(sample) = assembler.push(byte) {
                        VOLTAGE.store(sample, Ordering::Relaxed);
                    }
                }
            }
            Err(e) => log::warn!("Voltage monitor receive error: {:?}", e),
        }
    }
}

#[embassy_executor::task]
async fn report_task(mut telemetry_tx: UartTx<'static, uart::Blocking>) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(VOLTAGE_REPORT_PERIOD_MS));
    loop {
        let sample = VOLTAGE.load(Ordering::Relaxed);
        match format_voltage_line(sample) {
            Ok(line) => {
                if let Err(e) = telemetry_tx.blocking_write(line.as_bytes()) {
                    log::warn!("Telemetry transmit error: {:?}", e);
                }
            }
            Err(_) => log::error!("Voltage line does not fit the message size"),
        }
        log::info!("Voltage Monitor: {}mV", sample);

        ticker.next().await;
    }
}
