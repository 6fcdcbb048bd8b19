use core::fmt::Write;

use defmt_or_log as log;
use embedded_hal::digital::{OutputPin, PinState};

use crate::config::Thresholds;
use crate::dispatcher::{Celsius, Millivolts, SampleUpdate};
use crate::error::{OutputKind, SequencerError};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerPhase {
    Waiting,
    /// Terminal, the power trigger stays asserted for good.
    Triggered,
}

/// Last known value of each channel plus the trigger latch.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemState {
    pub last_voltage: Millivolts,
    pub last_temperature: Celsius,
    pub trigger_latched: bool,
}

impl SystemState {
    pub const fn new() -> Self {
        Self {
            last_voltage: 0,
            last_temperature: 0.0,
            trigger_latched: false,
        }
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of feeding one sample into the monitor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThresholdOutcome {
    /// Both channels currently satisfy their thresholds.
    pub condition_met: bool,
    /// This sample latched the power trigger.
    pub triggered: bool,
}

/// Threshold state machine driving the compute module power trigger and the
/// "not ready" status indicator.
///
/// The trigger output latches: it is asserted the first time both channels
/// are at or above their thresholds and never released afterwards. The status
/// output follows the combined condition on every sample, before and after
/// latching.
pub struct ThresholdMonitor<Trigger, Status> {
    trigger: Trigger,
    status: Status,
    thresholds: Thresholds,
    state: SystemState,
}

impl<Trigger, Status> ThresholdMonitor<Trigger, Status>
where
    Trigger: OutputPin,
    Status: OutputPin,
{
    pub fn new(trigger: Trigger, status: Status, thresholds: Thresholds) -> Self {
        Self {
            trigger,
            status,
            thresholds,
            state: SystemState::new(),
        }
    }

    /// Drives the start-up levels: trigger released, status asserted.
    pub fn prime(&mut self) -> Result<(), SequencerError> {
        self.trigger
            .set_low()
            .map_err(|_| SequencerError::Output(OutputKind::PowerTrigger))?;
        self.status
            .set_high()
            .map_err(|_| SequencerError::Output(OutputKind::StatusIndicator))?;
        Ok(())
    }

    #[inline]
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    #[inline]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn phase(&self) -> TriggerPhase {
        if self.state.trigger_latched {
            TriggerPhase::Triggered
        } else {
            TriggerPhase::Waiting
        }
    }

    pub fn apply(&mut self, update: SampleUpdate) -> ThresholdOutcome {
        match update {
            SampleUpdate::Voltage(mv) => {
                log::info!("voltage: {}mV", mv);
                self.state.last_voltage = mv;
            }
            SampleUpdate::Temperature(deg) => {
                log::info!("temperature: {}°C", one_decimal(deg).as_str());
                self.state.last_temperature = deg;
            }
        }

        let condition_met = self
            .thresholds
            .is_met(self.state.last_voltage, self.state.last_temperature);

        let mut triggered = false;
        if !self.state.trigger_latched && condition_met {
            if let Err(e) = self.assert_trigger() {
                log::error!("{}", e.error_description());
            } else {
                log::info!("Compute module started");
            }
            // The latch holds even if the pin write failed, there is no retry
            self.state.trigger_latched = true;
            triggered = true;
        }

        if let Err(e) = self.update_status(condition_met) {
            log::error!("{}", e.error_description());
        }

        ThresholdOutcome {
            condition_met,
            triggered,
        }
    }

    fn assert_trigger(&mut self) -> Result<(), SequencerError> {
        self.trigger
            .set_high()
            .map_err(|_| SequencerError::Output(OutputKind::PowerTrigger))
    }

    fn update_status(&mut self, condition_met: bool) -> Result<(), SequencerError> {
        self.status
            .set_state(PinState::from(!condition_met))
            .map_err(|_| SequencerError::Output(OutputKind::StatusIndicator))
    }
}

/// Renders `value` with a single decimal for the log.
#[cfg_attr(not(any(feature = "defmt", feature = "log")), allow(dead_code))]
fn one_decimal(value: Celsius) -> heapless::String<32> {
    let mut text = heapless::String::new();
    // Values too wide for the buffer are cut short, which is fine for a log line
    let _ = write!(text, "{:.1}", value);
    text
}


#[cfg(test)]
mod tests {
    use super::test_pins::RecordingPin;
    use super::*;

    fn monitor() -> (
        ThresholdMonitor<RecordingPin, RecordingPin>,
        RecordingPin,
        RecordingPin,
    ) {
        let trigger = RecordingPin::new();
        let status = RecordingPin::new();
        let monitor = ThresholdMonitor::new(trigger.clone(), status.clone(), Thresholds::default());
        (monitor, trigger, status)
    }

    #[test]
    fn test_prime_sets_startup_levels() {
        let (mut monitor, trigger, status) = monitor();
        monitor.prime().unwrap();
        assert_eq!(trigger.level(), Some(false));
        assert_eq!(status.level(), Some(true));
        assert_eq!(monitor.phase(), TriggerPhase::Waiting);
        assert_eq!(*monitor.state(), SystemState::default());
    }

    #[test]
    fn test_prime_reports_pin_failure() {
        let (mut monitor, trigger, _status) = monitor();
        trigger.set_failing(true);
        assert_eq!(
            monitor.prime(),
            Err(SequencerError::Output(OutputKind::PowerTrigger))
        );
    }

    #[test]
    fn test_triggers_on_exact_boundary() {
        let (mut monitor, trigger, status) = monitor();

        let first = monitor.apply(SampleUpdate::Voltage(2000));
        assert_eq!(
            first,
            ThresholdOutcome {
                condition_met: false,
                triggered: false
            }
        );
        assert_eq!(status.level(), Some(true));

        let second = monitor.apply(SampleUpdate::Temperature(10.0));
        assert_eq!(
            second,
            ThresholdOutcome {
                condition_met: true,
                triggered: true
            }
        );
        assert_eq!(monitor.phase(), TriggerPhase::Triggered);
        assert_eq!(trigger.level(), Some(true));
        assert_eq!(status.level(), Some(false));
    }

    #[test]
    fn test_just_below_voltage_keeps_waiting() {
        let (mut monitor, trigger, status) = monitor();

        monitor.apply(SampleUpdate::Voltage(1999));
        let outcome = monitor.apply(SampleUpdate::Temperature(10.0));

        assert!(!outcome.condition_met);
        assert_eq!(monitor.phase(), TriggerPhase::Waiting);
        assert!(trigger.levels().is_empty());
        assert_eq!(status.levels(), [true, true]);
    }

    #[test]
    fn test_temperature_just_below_limit_keeps_waiting() {
        let (mut monitor, trigger, status) = monitor();

        monitor.apply(SampleUpdate::Voltage(2500));
        let reading = crate::numeric::parse_decimal_prefix(b"9.9999999");
        let outcome = monitor.apply(SampleUpdate::Temperature(reading));

        assert!(!outcome.condition_met);
        assert_eq!(monitor.phase(), TriggerPhase::Waiting);
        assert!(trigger.levels().is_empty());
        assert_eq!(status.level(), Some(true));
    }

    #[test]
    fn test_temperature_log_uses_one_decimal() {
        assert_eq!(one_decimal(12.54).as_str(), "12.5");
        assert_eq!(one_decimal(9.0).as_str(), "9.0");
        assert_eq!(one_decimal(-4.26).as_str(), "-4.3");
    }

    #[test]
    fn test_trigger_latches_while_status_follows_condition() {
        let (mut monitor, trigger, status) = monitor();

        monitor.apply(SampleUpdate::Voltage(2500));
        monitor.apply(SampleUpdate::Temperature(12.5));
        assert_eq!(trigger.rising_edges(), 1);

        let dropped = monitor.apply(SampleUpdate::Voltage(1200));
        assert_eq!(
            dropped,
            ThresholdOutcome {
                condition_met: false,
                triggered: false
            }
        );
        assert_eq!(monitor.phase(), TriggerPhase::Triggered);
        assert_eq!(status.level(), Some(true));

        let recovered = monitor.apply(SampleUpdate::Voltage(2600));
        assert!(recovered.condition_met);
        assert!(!recovered.triggered);
        assert_eq!(status.level(), Some(false));

        // Never released, never pulsed again
        assert_eq!(trigger.levels(), [true]);
    }

    #[test]
    fn test_uses_latest_value_per_channel() {
        let (mut monitor, trigger, _status) = monitor();

        for mv in [100, 500, 1500, 2100] {
            monitor.apply(SampleUpdate::Voltage(mv));
        }
        assert_eq!(monitor.state().last_voltage, 2100);
        assert_eq!(monitor.phase(), TriggerPhase::Waiting);

        monitor.apply(SampleUpdate::Temperature(25.0));
        assert_eq!(monitor.state().last_temperature, 25.0);
        assert_eq!(trigger.rising_edges(), 1);
    }

    #[test]
    fn test_pin_failure_does_not_stop_latching() {
        let (mut monitor, trigger, status) = monitor();
        trigger.set_failing(true);
        status.set_failing(true);

        monitor.apply(SampleUpdate::Voltage(3000));
        let outcome = monitor.apply(SampleUpdate::Temperature(30.0));

        assert!(outcome.triggered);
        assert!(monitor.state().trigger_latched);
        assert!(trigger.levels().is_empty());

        trigger.set_failing(false);
        let again = monitor.apply(SampleUpdate::Temperature(31.0));
        assert!(!again.triggered);
        assert!(trigger.levels().is_empty());
    }
}
