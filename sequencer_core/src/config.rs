/// Size of a queued message: one tag byte followed by a NUL terminated payload.
pub const MESSAGE_SIZE: usize = 32;
/// Longest payload a single telemetry line can carry.
pub const PAYLOAD_SIZE: usize = MESSAGE_SIZE - 2;
/// Number of messages the interrupt to thread queue can hold.
pub const QUEUE_CAPACITY: usize = 10;

pub const MIN_VOLTAGE_MV: i32 = 2000;
pub const MIN_TEMPERATURE: f64 = 10.0;

/// Temperature at which the temperature reporter keeps its LED lit.
pub const OVER_TEMPERATURE_LIMIT: f64 = 40.0;

pub const VOLTAGE_REPORT_PERIOD_MS: u64 = 500;
pub const TEMPERATURE_REPORT_PERIOD_MS: u64 = 1000;

macro_rules! finite_f64 {
    ($value:expr) => {{
        const _: () = core::assert!($value > f64::MIN && $value < f64::MAX, "Value must be finite");
        $value
    }};
}

/// What the consumer loop does with a message whose tag is not a known channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnknownTagPolicy {
    /// Stop the monitoring loop. An unknown tag means the framing or the queue
    /// is corrupted.
    Halt,
    /// Log and drop the offending message, keep monitoring.
    Discard,
}

/// Minimum values both channels must reach before the compute module is powered.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    min_voltage_mv: i32,
    min_temperature: f64,
}

impl Thresholds {
    pub fn new(min_voltage_mv: i32, min_temperature: f64) -> Result<Self, &'static str> {
        if !min_temperature.is_finite() {
            return Err("Temperature threshold must be finite");
        }
        Ok(Self {
            min_voltage_mv,
            min_temperature,
        })
    }

    #[inline]
    pub fn min_voltage_mv(&self) -> i32 {
        self.min_voltage_mv
    }

    #[inline]
    pub fn min_temperature(&self) -> f64 {
        self.min_temperature
    }

    /// Combined start-up condition.
    pub fn is_met(&self, voltage_mv: i32, temperature: f64) -> bool {
        voltage_mv >= self.min_voltage_mv && temperature >= self.min_temperature
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_voltage_mv: MIN_VOLTAGE_MV,
            min_temperature: finite_f64!(MIN_TEMPERATURE),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequencerConfig {
    pub thresholds: Thresholds,
    pub unknown_tag_policy: UnknownTagPolicy,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            unknown_tag_policy: UnknownTagPolicy::Halt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_values() {
        let config = SequencerConfig::default();
        assert_eq!(config.thresholds.min_voltage_mv(), 2000);
        assert_eq!(config.thresholds.min_temperature(), 10.0);
        assert_eq!(config.unknown_tag_policy, UnknownTagPolicy::Halt);
    }

    #[test]
    fn test_thresholds_reject_non_finite_temperature() {
        assert!(Thresholds::new(2000, f64::NAN).is_err());
        assert!(Thresholds::new(2000, f64::INFINITY).is_err());
        assert!(Thresholds::new(1500, 5.0).is_ok());
    }

    #[test]
    fn test_condition_is_inclusive_on_both_limits() {
        let thresholds = Thresholds::default();
        assert!(thresholds.is_met(2000, 10.0));
        assert!(!thresholds.is_met(1999, 10.0));
        assert!(!thresholds.is_met(2000, 9.99));
        assert!(!thresholds.is_met(2000, f64::NAN));
    }
}
