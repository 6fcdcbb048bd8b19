//! Temperature reporter.
//!
//! Samples the RP2040 on-die temperature sensor once a second, sends the value
//! as a text line to the power management controller and blinks the on-board
//! LED. The LED stays lit while the temperature is over the limit.
#![no_std]
#![no_main]

use defmt_or_log as log;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::uart::{self, UartTx};
use embassy_time::{Duration, Ticker};
use embedded_hal::digital::{OutputPin, PinState};
use sequencer_core::config::TEMPERATURE_REPORT_PERIOD_MS;
use sequencer_core::reporter::{Heartbeat, format_temperature_line, rp2040_temperature_celsius};

// Configure panic behavior based on features
#[cfg(not(any(feature = "defmt", feature = "log")))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};
#[cfg(all(feature = "log", not(feature = "defmt")))]
use {panic_rtt_target as _, rtt_target as _};

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p: embassy_rp::Peripherals = embassy_rp::init(Default::default());

    let mut led = Output::new(p.PIN_25, Level::High);
    let mut telemetry_tx = UartTx::new_blocking(p.UART0, p.PIN_0, uart::Config::default());
    let mut adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let mut sensor = adc::Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);

    let mut heartbeat = Heartbeat::default();
    let mut ticker = Ticker::every(Duration::from_millis(TEMPERATURE_REPORT_PERIOD_MS));
    loop {
        let raw = match adc.read(&mut sensor).await {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to read temperature: {:?}", e);
                break;
            }
        };
        let temperature = rp2040_temperature_celsius(raw);

        match format_temperature_line(temperature) {
            Ok(line) => {
                if let Err(e) = telemetry_tx.blocking_write(line.as_bytes()) {
                    log::warn!("Telemetry transmit error: {:?}", e);
                }
            }
            Err(_) => log::error!("Temperature line does not fit the message size"),
        }
        log::info!("Temperature sensor: {}°C", temperature);

        let level = heartbeat.next_level(temperature);
        if led.set_state(PinState::from(level)).is_err() {
            log::error!("Failed to set LED state");
        }

        ticker.next().await;
    }
}
