//! Power management controller.
//!
//! Listens to the voltage and temperature telemetry UARTs and switches the
//! compute module on once both readings reach their thresholds.
#![no_std]
#![no_main]

mod board;
mod telemetry_uart;

use defmt_or_log as log;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartRx};
use embassy_rp::{bind_interrupts, interrupt};
use sequencer_core::config::QUEUE_CAPACITY;
use sequencer_core::{LineFramer, MessageQueue, Sequencer, TelemetryChannel};
use static_cell::StaticCell;

use crate::board::*;
use crate::telemetry_uart::TelemetryUartRunner;

// Configure panic behavior based on features
#[cfg(not(any(feature = "defmt", feature = "log")))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};
#[cfg(all(feature = "log", not(feature = "defmt")))]
use {panic_rtt_target as _, rtt_target as _};

// Interrupt handlers
bind_interrupts!(struct UartIrqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static resources
static MESSAGE_QUEUE: MessageQueue<QUEUE_CAPACITY> = MessageQueue::new();
static VOLTAGE_RX_BUFFER: StaticCell<[u8; RX_BUFFER_SIZE]> = StaticCell::new();
static TEMPERATURE_RX_BUFFER: StaticCell<[u8; RX_BUFFER_SIZE]> = StaticCell::new();
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

#[cortex_m_rt::entry]
fn main() -> ! {
    let p: embassy_rp::Peripherals = embassy_rp::init(Default::default());

    // Compute module stays off and "not ready" is shown until the sequencer runs
    let trigger = Output::new(p.PIN_15, Level::Low);
    let status_led = Output::new(p.PIN_25, Level::High);

    let voltage_rx = BufferedUartRx::new(
        p.UART1,
        UartIrqs,
        p.PIN_9, // Voltage telemetry RX
        VOLTAGE_RX_BUFFER.init([0; RX_BUFFER_SIZE]),
        telemetry_uart_config(),
    );
    let temperature_rx = BufferedUartRx::new(
        p.UART0,
        UartIrqs,
        p.PIN_1, // Temperature telemetry RX
        TEMPERATURE_RX_BUFFER.init([0; RX_BUFFER_SIZE]),
        telemetry_uart_config(),
    );

    let voltage_runner = TelemetryUartRunner::new(
        voltage_rx,
        LineFramer::new(TelemetryChannel::Voltage, MESSAGE_QUEUE.producer()),
    );
    let temperature_runner = TelemetryUartRunner::new(
        temperature_rx,
        LineFramer::new(TelemetryChannel::Temperature, MESSAGE_QUEUE.producer()),
    );

    let sequencer: PmcSequencer = Sequencer::new(
        MESSAGE_QUEUE.consumer(),
        trigger,
        status_led,
        sequencer_config(),
    );

    // Reception runs above thread mode so lines are framed while the sequencer is busy
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    log::debug!("Spawn telemetry reception tasks");
    spawner.spawn(telemetry_uart_task(voltage_runner)).unwrap();
    spawner.spawn(telemetry_uart_task(temperature_runner)).unwrap();

    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(move |spawner| {
        log::debug!("Spawn sequencer task");
        spawner.spawn(sequencer_task(sequencer)).unwrap();
    });
}

#[embassy_executor::task(pool_size = 2)]
async fn telemetry_uart_task(runner: TelemetryUartRunner) -> ! {
    log::debug!("Starting telemetry UART task...");
    runner.run().await
}

#[embassy_executor::task]
async fn sequencer_task(mut sequencer: PmcSequencer) {
    if let Err(e) = sequencer.prime() {
        log::error!("{}", e.error_description());
        return;
    }

    log::info!("Waiting for telemetry");
    let error = sequencer.run().await;
    log::error!("Sequencer stopped: {}", error.error_description());
}
